//! Memory-hard digest used as the identity proof of work.
//!
//! The 64-byte input is hashed with SHA-512. The first half of that digest
//! keys a Salsa20/20 stream and bytes 32..40 become its nonce. A 2 MiB
//! scratch buffer is then filled block by block, each block being the
//! previous one run through the stream, so the whole buffer has to exist
//! before the mix phase can start. The mix phase walks the buffer in
//! 16-byte steps, swapping 8-byte words between the running digest and
//! pseudo-randomly chosen buffer offsets, and re-encrypts the digest after
//! every swap.
//!
//! The Salsa20 block counter starts at zero and advances once per 64-byte
//! block across both phases. Changing [`SCRATCH_SIZE`] or the block order
//! changes every address ever derived.

use salsa20::cipher::{KeyIvInit, StreamCipher};
use salsa20::Salsa20;
use sha2::{Digest, Sha512};

use crate::error::{IdentityError, Result};

/// Size of the scratch buffer in bytes.
pub const SCRATCH_SIZE: usize = 2_097_152;

/// Length of the input and of the output digest.
pub const DIGEST_LEN: usize = 64;

const BLOCK_LEN: usize = 64;
const WORD_LEN: usize = 8;
const SCRATCH_WORDS: u64 = (SCRATCH_SIZE / WORD_LEN) as u64;

/// Output of [`memory_hard_hash`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryHardDigest([u8; DIGEST_LEN]);

impl MemoryHardDigest {
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::ops::Index<usize> for MemoryHardDigest {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.0[index]
    }
}

impl std::fmt::Debug for MemoryHardDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MemoryHardDigest({})", self.to_hex())
    }
}

/// Compute the memory-hard digest of a 64-byte input.
///
/// Deterministic and side-effect free apart from the transient scratch
/// allocation. Fails only if that allocation cannot be made.
pub fn memory_hard_hash(input: &[u8; DIGEST_LEN]) -> Result<MemoryHardDigest> {
    let mut state = [0u8; DIGEST_LEN];
    state.copy_from_slice(&Sha512::digest(input));

    let mut key = [0u8; 32];
    key.copy_from_slice(&state[..32]);
    let mut nonce = [0u8; 8];
    nonce.copy_from_slice(&state[32..40]);
    let mut stream = Salsa20::new(&key.into(), &nonce.into());

    let mut scratch = allocate_scratch()?;

    stream.apply_keystream(&mut scratch[..BLOCK_LEN]);
    for offset in (BLOCK_LEN..SCRATCH_SIZE).step_by(BLOCK_LEN) {
        scratch.copy_within(offset - BLOCK_LEN..offset, offset);
        stream.apply_keystream(&mut scratch[offset..offset + BLOCK_LEN]);
    }

    for offset in (0..SCRATCH_SIZE).step_by(2 * WORD_LEN) {
        let idx1 = (read_be_u64(&scratch, offset) % 8) as usize * WORD_LEN;
        let idx2 = (read_be_u64(&scratch, offset + WORD_LEN) % SCRATCH_WORDS) as usize * WORD_LEN;
        state[idx1..idx1 + WORD_LEN].swap_with_slice(&mut scratch[idx2..idx2 + WORD_LEN]);
        stream.apply_keystream(&mut state);
    }

    Ok(MemoryHardDigest(state))
}

fn allocate_scratch() -> Result<Vec<u8>> {
    let mut scratch = Vec::new();
    scratch
        .try_reserve_exact(SCRATCH_SIZE)
        .map_err(|_| IdentityError::AllocationFailure(SCRATCH_SIZE))?;
    scratch.resize(SCRATCH_SIZE, 0);
    Ok(scratch)
}

fn read_be_u64(buf: &[u8], at: usize) -> u64 {
    let mut word = [0u8; WORD_LEN];
    word.copy_from_slice(&buf[at..at + WORD_LEN]);
    u64::from_be_bytes(word)
}
