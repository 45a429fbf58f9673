//! 40-bit node addresses.
//!
//! An address is never chosen. It is read from the last five bytes of an
//! identity's memory-hard digest. Zero is invalid and any address whose top
//! byte is `0xff` is reserved.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::crypto::memory_hard::MemoryHardDigest;
use crate::error::{IdentityError, Result};

/// Number of bytes in an address.
pub const ADDRESS_LEN: usize = 5;

/// Number of hex digits in a rendered address.
pub const ADDRESS_HEX_LEN: usize = 2 * ADDRESS_LEN;

/// Largest value representable in 40 bits.
pub const ADDRESS_MAX: u64 = (1 << 40) - 1;

/// Top byte value that may never start an address.
pub const RESERVED_PREFIX: u8 = 0xff;

/// Offset of the address bytes within a memory-hard digest.
const DIGEST_ADDRESS_OFFSET: usize = 59;

/// A nonzero, non-reserved 40-bit node address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeAddress(u64);

impl NodeAddress {
    /// Build an address from five big-endian bytes.
    ///
    /// Returns `None` for zero or for a reserved top byte.
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Option<Self> {
        if bytes[0] == RESERVED_PREFIX {
            return None;
        }
        let value = bytes
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        (value != 0).then_some(Self(value))
    }

    /// Read the address out of bytes 59..64 of a memory-hard digest.
    pub fn from_digest(digest: &MemoryHardDigest) -> Option<Self> {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&digest.as_bytes()[DIGEST_ADDRESS_OFFSET..]);
        Self::from_bytes(bytes)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Big-endian bytes.
    pub fn to_bytes(&self) -> [u8; ADDRESS_LEN] {
        let be = self.0.to_be_bytes();
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&be[8 - ADDRESS_LEN..]);
        bytes
    }
}

impl TryFrom<u64> for NodeAddress {
    type Error = IdentityError;

    fn try_from(value: u64) -> Result<Self> {
        if value > ADDRESS_MAX {
            return Err(IdentityError::InvalidFormat(format!(
                "address {value:#x} exceeds 40 bits"
            )));
        }
        let be = value.to_be_bytes();
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&be[8 - ADDRESS_LEN..]);
        Self::from_bytes(bytes).ok_or_else(|| {
            IdentityError::InvalidFormat(format!("address {value:010x} is zero or reserved"))
        })
    }
}

impl FromStr for NodeAddress {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != ADDRESS_HEX_LEN {
            return Err(IdentityError::InvalidFormat(format!(
                "address must be {ADDRESS_HEX_LEN} hex digits, got {}",
                s.len()
            )));
        }
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| IdentityError::InvalidFormat(format!("invalid address hex: {e}")))?;
        Self::from_bytes(bytes).ok_or_else(|| {
            IdentityError::InvalidFormat(format!("address {s} is zero or reserved"))
        })
    }
}

impl std::fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:010x}", self.0)
    }
}

impl std::fmt::Debug for NodeAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeAddress({self})")
    }
}

impl Serialize for NodeAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
