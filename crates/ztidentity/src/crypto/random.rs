//! Secure random number generation.
//!
//! Callers pass the random source in as a `RngCore + CryptoRng` handle.
//! Production code hands in [`OsRng`]; tests can hand in a seeded generator.
//! A source that fails to deliver bytes is fatal: there is no retry and no
//! fallback to a weaker generator.

pub use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};

use crate::error::{IdentityError, Result};

/// Fill a buffer from a cryptographically secure random source.
pub fn fill_random<R: RngCore + CryptoRng + ?Sized>(rng: &mut R, buf: &mut [u8]) -> Result<()> {
    rng.try_fill_bytes(buf)
        .map_err(|e| IdentityError::EntropyUnavailable(e.to_string()))
}

/// Generate a fixed-size array of cryptographically secure random bytes.
pub fn random_bytes<const N: usize, R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    fill_random(rng, &mut buf)?;
    Ok(buf)
}
