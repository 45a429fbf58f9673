//! ztidentity — mined identities for virtual-network overlay peers.
//!
//! An identity pairs an X25519 agreement key and an Ed25519 signing key
//! with a 40-bit node address. The address is read out of a memory-hard
//! digest of the public keys, and keys are regenerated until that digest
//! passes a small proof-of-work test, so every identity costs a few
//! hundred milliseconds and 2 MiB of memory to mint.

pub mod crypto;
pub mod error;
pub mod identity;
pub mod storage;


// Re-export primary types
pub use crypto::keys::{PrivateKeyMaterial, PublicKeyMaterial};
pub use crypto::memory_hard::{memory_hard_hash, MemoryHardDigest};
pub use error::{IdentityError, Result};
pub use identity::{
    mine_identities, mine_identities_with, mine_identity, mine_identity_with, Identity,
    IdentityMiner, NodeAddress,
};
pub use storage::{load_identity, save_identity};
