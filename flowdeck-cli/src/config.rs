//! CLI configuration and token storage
//!
//! The session token lives in a plain file under the user's config
//! directory. Login and logout are the only writers; every authenticated
//! command reads it.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the backend API
    pub api_url: String,
}

/// Path to the stored session token.
///
/// `$XDG_CONFIG_HOME/flowdeck/token`, falling back to
/// `~/.config/flowdeck/token`.
pub fn token_path() -> Result<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let home = std::env::var_os("HOME").context("HOME is not set")?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(base.join("flowdeck").join("token"))
}

/// Read the stored token, if any.
pub fn load_token() -> Result<Option<String>> {
    let path = token_path()?;
    match fs::read_to_string(&path) {
        Ok(raw) => {
            let token = raw.trim().to_string();
            Ok(if token.is_empty() { None } else { Some(token) })
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Persist a token, creating the config directory if needed.
///
/// The file is readable by the owner only; the token is a credential.
pub fn save_token(token: &str) -> Result<PathBuf> {
    let path = token_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    write_owner_only(&path, token.trim())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(unix)]
fn write_owner_only(path: &std::path::Path, contents: &str) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies at creation; tighten a pre-existing file too.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents.as_bytes())
}

#[cfg(not(unix))]
fn write_owner_only(path: &std::path::Path, contents: &str) -> std::io::Result<()> {
    fs::write(path, contents)
}

/// Delete the stored token. Returns false if none was stored.
pub fn delete_token() -> Result<bool> {
    let path = token_path()?;
    match fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

/// Load the token, or fail with a hint to run login.
pub fn require_token() -> Result<String> {
    load_token()?.context("Not logged in. Run `flowdeck auth login` first.")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn token_file_is_owner_only() {
        let dir = std::env::temp_dir().join(format!("flowdeck-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("token");

        write_owner_only(&path, "gh-token").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        // An existing file with looser permissions is tightened on rewrite.
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        write_owner_only(&path, "gh-token-2").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        fs::remove_dir_all(&dir).unwrap();
    }
}
