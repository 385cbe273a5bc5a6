//! SSH host key persistence.
//!
//! The server identifies itself with one ed25519 key. It is read from disk
//! on startup; on first run (no file at the path) a fresh key is generated
//! and written there so that clients see the same host key next time.

use std::{
    fs::{self, File},
    io::ErrorKind,
    path::Path,
};

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use russh_keys::key::KeyPair;

use crate::ServerError;

/// Load the host key at `path`, generating and saving one if absent.
pub fn load_or_generate(path: &Path) -> Result<KeyPair, ServerError> {
    match fs::metadata(path) {
        Ok(_) => load(path),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "generating new host key");
            generate(path)
        },
        Err(e) => Err(host_key_error(path, e)),
    }
}

fn load(path: &Path) -> Result<KeyPair, ServerError> {
    let key = russh_keys::load_secret_key(path, None).map_err(|e| host_key_error(path, e))?;
    tracing::debug!(path = %path.display(), "loaded host key");
    Ok(key)
}

fn generate(path: &Path) -> Result<KeyPair, ServerError> {
    let key = KeyPair::Ed25519(SigningKey::generate(&mut OsRng));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    restrict_permissions(&file)?;
    russh_keys::encode_pkcs8_pem(&key, file).map_err(|e| host_key_error(path, e))?;

    Ok(key)
}

#[cfg(unix)]
fn restrict_permissions(file: &File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &File) -> std::io::Result<()> {
    Ok(())
}

fn host_key_error(path: &Path, err: impl std::fmt::Display) -> ServerError {
    ServerError::HostKey { path: path.to_path_buf(), reason: err.to_string() }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn generates_missing_key_then_reloads_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".ssh").join("host_ed25519");

        let generated = load_or_generate(&path).unwrap();
        assert!(path.exists());

        let loaded = load_or_generate(&path).unwrap();
        assert_eq!(
            generated.clone_public_key().unwrap().fingerprint(),
            loaded.clone_public_key().unwrap().fingerprint()
        );
    }

    #[test]
    fn garbage_key_file_is_host_key_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host_ed25519");
        fs::write(&path, "not a key").unwrap();

        let err = load_or_generate(&path).unwrap_err();

        assert!(matches!(err, ServerError::HostKey { .. }));
    }
}
