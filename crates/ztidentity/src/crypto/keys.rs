//! Dual Curve25519 key pair generation.
//!
//! Every identity carries two key pairs packed side by side:
//! X25519 for key agreement and Ed25519 for signing.
//!
//! ```text
//! public  = x25519 public (32) || ed25519 verifying key (32)
//! private = x25519 scalar (32) || ed25519 seed (32)
//! ```

use ed25519_dalek::SigningKey;
use rand_core::{CryptoRng, RngCore};
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::random;
use crate::error::{IdentityError, Result};

/// Length of both the public and the private key blobs.
pub const KEY_MATERIAL_LEN: usize = 64;

/// Length of each half of a key blob.
pub const HALF_KEY_LEN: usize = 32;

/// Packed public keys: agreement public key followed by signing public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKeyMaterial([u8; KEY_MATERIAL_LEN]);

impl PublicKeyMaterial {
    pub fn from_bytes(bytes: [u8; KEY_MATERIAL_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_MATERIAL_LEN] {
        &self.0
    }

    /// The X25519 half.
    pub fn agreement_key(&self) -> [u8; HALF_KEY_LEN] {
        split_half(&self.0, 0)
    }

    /// The Ed25519 half.
    pub fn signing_key(&self) -> [u8; HALF_KEY_LEN] {
        split_half(&self.0, HALF_KEY_LEN)
    }

    /// Lowercase hex, 128 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for PublicKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKeyMaterial({})", self.to_hex())
    }
}

/// Packed secret keys, same layout as [`PublicKeyMaterial`].
///
/// Zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKeyMaterial([u8; KEY_MATERIAL_LEN]);

impl PrivateKeyMaterial {
    pub fn from_bytes(bytes: [u8; KEY_MATERIAL_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_MATERIAL_LEN] {
        &self.0
    }

    /// The X25519 scalar as drawn (unclamped).
    pub fn agreement_secret(&self) -> Zeroizing<[u8; HALF_KEY_LEN]> {
        Zeroizing::new(split_half(&self.0, 0))
    }

    /// The Ed25519 seed.
    pub fn signing_seed(&self) -> Zeroizing<[u8; HALF_KEY_LEN]> {
        Zeroizing::new(split_half(&self.0, HALF_KEY_LEN))
    }

    /// Lowercase hex, 128 characters. Caller owns the secret string.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.0))
    }
}

impl std::fmt::Debug for PrivateKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKeyMaterial(<redacted>)")
    }
}

fn split_half(blob: &[u8; KEY_MATERIAL_LEN], start: usize) -> [u8; HALF_KEY_LEN] {
    let mut half = [0u8; HALF_KEY_LEN];
    half.copy_from_slice(&blob[start..start + HALF_KEY_LEN]);
    half
}

/// An agreement key pair and a signing key pair generated together.
pub struct DualKeyPair {
    public: PublicKeyMaterial,
    private: PrivateKeyMaterial,
}

impl DualKeyPair {
    /// Generate both key pairs from the given secure random source.
    ///
    /// Fails only if the random source cannot deliver bytes.
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Result<Self> {
        let signing_seed = Zeroizing::new(random::random_bytes::<HALF_KEY_LEN, R>(rng)?);
        let agreement_secret = Zeroizing::new(random::random_bytes::<HALF_KEY_LEN, R>(rng)?);
        Ok(Self::from_secrets(&agreement_secret, &signing_seed))
    }

    /// Rebuild the key pairs from a packed private blob, recomputing the
    /// public halves.
    pub fn from_private(private: &PrivateKeyMaterial) -> Self {
        Self::from_secrets(&private.agreement_secret(), &private.signing_seed())
    }

    fn from_secrets(
        agreement_secret: &[u8; HALF_KEY_LEN],
        signing_seed: &[u8; HALF_KEY_LEN],
    ) -> Self {
        let secret = StaticSecret::from(*agreement_secret);
        let agreement_public = X25519PublicKey::from(&secret);
        let signing_key = SigningKey::from_bytes(signing_seed);
        let verifying_key = signing_key.verifying_key();

        let mut public = [0u8; KEY_MATERIAL_LEN];
        public[..HALF_KEY_LEN].copy_from_slice(agreement_public.as_bytes());
        public[HALF_KEY_LEN..].copy_from_slice(verifying_key.as_bytes());

        let mut private = Zeroizing::new([0u8; KEY_MATERIAL_LEN]);
        private[..HALF_KEY_LEN].copy_from_slice(agreement_secret);
        private[HALF_KEY_LEN..].copy_from_slice(signing_seed);

        Self {
            public: PublicKeyMaterial(public),
            private: PrivateKeyMaterial(*private),
        }
    }

    /// Return the packed public keys.
    pub fn public(&self) -> &PublicKeyMaterial {
        &self.public
    }

    /// Return the packed private keys.
    pub fn private(&self) -> &PrivateKeyMaterial {
        &self.private
    }

    /// Split into the packed public and private blobs.
    pub fn into_parts(self) -> (PublicKeyMaterial, PrivateKeyMaterial) {
        (self.public, self.private)
    }
}

/// Generate an agreement key pair and a signing key pair, packed.
pub fn generate_dual_keypair<R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
) -> Result<(PublicKeyMaterial, PrivateKeyMaterial)> {
    DualKeyPair::generate(rng).map(DualKeyPair::into_parts)
}

/// Parse a 128-character hex string into 64 bytes of key material.
pub(crate) fn decode_key_hex(field: &str, what: &str) -> Result<[u8; KEY_MATERIAL_LEN]> {
    let mut bytes = [0u8; KEY_MATERIAL_LEN];
    hex::decode_to_slice(field, &mut bytes)
        .map_err(|e| IdentityError::InvalidKey(format!("invalid {what} hex: {e}")))?;
    Ok(bytes)
}
