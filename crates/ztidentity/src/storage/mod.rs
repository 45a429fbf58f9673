//! Storage layer for identity files.
//!
//! Identities are stored as their string encodings, one per file, in a
//! directory per identity:
//!
//! ```text
//! <dir>/
//! ├── identity.public
//! └── identity.secret
//! ```
//!
//! # Modules
//!
//! - [`identity_file`] — save/load of an identity directory.

pub mod identity_file;

pub use identity_file::{
    ensure_vacant, load_identity, read_identity_file, save_identity, PUBLIC_FILE, SECRET_FILE,
};
