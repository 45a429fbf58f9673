//! The identity value and its string encodings.
//!
//! ```text
//! public:  <address:10 hex>:0:<public keys:128 hex>
//! secret:  <address:10 hex>:0:<public keys:128 hex>:<private keys:128 hex>
//! ```
//!
//! The `0` field is a fixed marker carried verbatim.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroizing;

use crate::crypto::keys::{
    decode_key_hex, DualKeyPair, PrivateKeyMaterial, PublicKeyMaterial, HALF_KEY_LEN,
};
use crate::crypto::memory_hard::memory_hard_hash;
use crate::error::{IdentityError, Result};
use crate::identity::address::NodeAddress;
use crate::identity::miner::accept_digest;

/// The fixed marker field between the address and the key material.
pub const FORMAT_MARKER: &str = "0";

const FIELD_SEPARATOR: char = ':';

/// A mined overlay identity.
///
/// Immutable once built. The private half is optional: a public-only
/// identity is what gets handed to other peers.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    address: NodeAddress,
    public_key: PublicKeyMaterial,
    private_key: Option<PrivateKeyMaterial>,
}

impl Identity {
    /// Assemble an identity from parts the miner has already checked.
    pub(crate) fn from_parts(
        address: NodeAddress,
        public_key: PublicKeyMaterial,
        private_key: Option<PrivateKeyMaterial>,
    ) -> Self {
        Self {
            address,
            public_key,
            private_key,
        }
    }

    pub fn address(&self) -> NodeAddress {
        self.address
    }

    pub fn public_key(&self) -> &PublicKeyMaterial {
        &self.public_key
    }

    pub fn private_key(&self) -> Option<&PrivateKeyMaterial> {
        self.private_key.as_ref()
    }

    pub fn has_private_key(&self) -> bool {
        self.private_key.is_some()
    }

    /// The X25519 public key.
    pub fn agreement_public_key(&self) -> [u8; HALF_KEY_LEN] {
        self.public_key.agreement_key()
    }

    /// The Ed25519 verifying key.
    pub fn signing_public_key(&self) -> [u8; HALF_KEY_LEN] {
        self.public_key.signing_key()
    }

    /// The same identity without its private keys.
    pub fn to_public(&self) -> Self {
        Self {
            address: self.address,
            public_key: self.public_key,
            private_key: None,
        }
    }

    /// The address as 10 lowercase hex digits.
    pub fn id_string(&self) -> String {
        self.address.to_string()
    }

    /// `address:0:public-keys`, all lowercase hex.
    pub fn public_key_string(&self) -> String {
        format!(
            "{}{FIELD_SEPARATOR}{FORMAT_MARKER}{FIELD_SEPARATOR}{}",
            self.address,
            self.public_key.to_hex()
        )
    }

    /// `address:0:public-keys:private-keys`, or an empty string when this
    /// identity has no private keys.
    pub fn private_key_string(&self) -> String {
        match &self.private_key {
            Some(private) => format!(
                "{}{FIELD_SEPARATOR}{}",
                self.public_key_string(),
                private.to_hex().as_str()
            ),
            None => String::new(),
        }
    }

    /// Recompute the proof of work and check it still yields this address.
    ///
    /// When private keys are present they must also reproduce the public
    /// keys. This costs one full memory-hard hash.
    pub fn validate(&self) -> Result<()> {
        let digest = memory_hard_hash(self.public_key.as_bytes())?;
        match accept_digest(&digest) {
            Some(derived) if derived == self.address => {}
            Some(derived) => {
                return Err(IdentityError::ValidationFailed(format!(
                    "address {} does not match derived address {derived}",
                    self.address
                )))
            }
            None => {
                return Err(IdentityError::ValidationFailed(format!(
                    "public key of {} does not satisfy the address proof of work",
                    self.address
                )))
            }
        }

        if let Some(private) = &self.private_key {
            let rebuilt = DualKeyPair::from_private(private);
            if rebuilt.public() != &self.public_key {
                return Err(IdentityError::ValidationFailed(format!(
                    "private keys of {} do not match its public keys",
                    self.address
                )));
            }
        }

        Ok(())
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    /// Parse either the public or the secret encoding.
    ///
    /// Only the syntax is checked here; use [`Identity::validate`] to
    /// recompute the proof of work.
    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.trim().split(FIELD_SEPARATOR).collect();
        if fields.len() != 3 && fields.len() != 4 {
            return Err(IdentityError::InvalidFormat(format!(
                "expected 3 or 4 colon-separated fields, got {}",
                fields.len()
            )));
        }

        let address: NodeAddress = fields[0].parse()?;

        if fields[1] != FORMAT_MARKER {
            return Err(IdentityError::InvalidFormat(format!(
                "unsupported marker field {:?}",
                fields[1]
            )));
        }

        let public_key = PublicKeyMaterial::from_bytes(decode_key_hex(fields[2], "public key")?);

        let private_key = match fields.get(3) {
            Some(field) => {
                let bytes = Zeroizing::new(decode_key_hex(field, "private key")?);
                Some(PrivateKeyMaterial::from_bytes(*bytes))
            }
            None => None,
        };

        Ok(Self {
            address,
            public_key,
            private_key,
        })
    }
}

impl std::fmt::Display for Identity {
    /// Renders the public encoding only.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.public_key_string())
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .field("private_key", &self.private_key)
            .finish()
    }
}

impl Serialize for Identity {
    /// Serializes to the secret encoding when private keys are present.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.has_private_key() {
            let secret = Zeroizing::new(self.private_key_string());
            serializer.serialize_str(&secret)
        } else {
            serializer.serialize_str(&self.public_key_string())
        }
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = Zeroizing::new(String::deserialize(deserializer)?);
        s.parse().map_err(serde::de::Error::custom)
    }
}
