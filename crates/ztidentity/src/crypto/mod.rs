//! Cryptographic primitives for ztidentity.
//!
//! This module provides:
//! - Dual X25519 / Ed25519 key pair generation
//! - The Salsa20-based memory-hard digest behind address mining
//! - Cryptographically secure random number generation

pub mod keys;
pub mod memory_hard;
pub mod random;
