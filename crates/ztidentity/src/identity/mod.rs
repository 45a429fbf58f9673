//! Identity management — mining, encoding, parsing, validation.
//!
//! The identity module provides the core `Identity` type, the 40-bit
//! `NodeAddress` it is known by, and the miner that produces both.

pub mod address;
pub mod miner;
pub mod value;

pub use address::NodeAddress;
pub use miner::{
    accept_digest, mine_identities, mine_identities_with, mine_identity, mine_identity_with,
    IdentityMiner, MinerState,
};
pub use value::{Identity, FORMAT_MARKER};
