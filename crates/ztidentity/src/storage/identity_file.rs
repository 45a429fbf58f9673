//! Identity directory layout — `identity.public` / `identity.secret`.
//!
//! An identity directory holds up to two one-line text files:
//!
//! ```text
//! <dir>/
//! ├── identity.public   address:0:public-keys
//! └── identity.secret   address:0:public-keys:private-keys   (mode 0600)
//! ```
//!
//! A public-only identity is stored without `identity.secret`.

use std::io::Write;
use std::path::Path;

use zeroize::Zeroizing;

use crate::error::{IdentityError, Result};
use crate::identity::Identity;

/// File holding the public encoding.
pub const PUBLIC_FILE: &str = "identity.public";

/// File holding the secret encoding.
pub const SECRET_FILE: &str = "identity.secret";

/// Save an identity into `dir`, creating the directory if needed.
///
/// Both files are written atomically: the contents go to a temporary file in
/// the same directory which is then renamed, so a concurrent reader never
/// sees a partial write.
///
/// # Errors
///
/// Returns `IdentityError::AlreadyExists` if either file is already present,
/// or `IdentityError::Io` for filesystem errors.
pub fn save_identity(identity: &Identity, dir: &Path) -> Result<()> {
    ensure_vacant(dir)?;
    let public_path = dir.join(PUBLIC_FILE);
    let secret_path = dir.join(SECRET_FILE);

    std::fs::create_dir_all(dir)?;

    if identity.has_private_key() {
        let secret = Zeroizing::new(format!("{}\n", identity.private_key_string()));
        write_atomic(&secret_path, secret.as_bytes(), true)?;
        log::debug!("wrote {}", secret_path.display());
    }

    let public = format!("{}\n", identity.public_key_string());
    write_atomic(&public_path, public.as_bytes(), false)?;
    log::debug!("wrote {}", public_path.display());

    Ok(())
}

/// Check that `dir` holds no identity files, so [`save_identity`] would not
/// be refused.
///
/// # Errors
///
/// Returns `IdentityError::AlreadyExists` naming the first file found.
pub fn ensure_vacant(dir: &Path) -> Result<()> {
    for name in [PUBLIC_FILE, SECRET_FILE] {
        let path = dir.join(name);
        if path.exists() {
            return Err(IdentityError::AlreadyExists(path.display().to_string()));
        }
    }
    Ok(())
}

/// Load the identity stored in `dir`.
///
/// Prefers `identity.secret`; falls back to `identity.public` for a
/// public-only identity. The proof of work is not recomputed.
///
/// # Errors
///
/// Returns `IdentityError::InvalidFormat` for malformed contents or
/// `IdentityError::Io` if neither file can be read.
pub fn load_identity(dir: &Path) -> Result<Identity> {
    let secret_path = dir.join(SECRET_FILE);
    if secret_path.exists() {
        return read_identity_file(&secret_path);
    }
    read_identity_file(&dir.join(PUBLIC_FILE))
}

/// Read a single identity file in either encoding.
pub fn read_identity_file(path: &Path) -> Result<Identity> {
    let contents = Zeroizing::new(std::fs::read_to_string(path)?);
    contents.parse()
}

/// Write `data` to `path` atomically (temp file + rename).
fn write_atomic(path: &Path, data: &[u8], secret: bool) -> Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    if secret {
        owner_only(&mut options);
    }

    let mut file = options.open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(unix)]
fn owner_only(options: &mut std::fs::OpenOptions) {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(0o600);
}

#[cfg(not(unix))]
fn owner_only(_options: &mut std::fs::OpenOptions) {}

// ── Tests ─────────────────────────────────────────────────────────────────────
