//! API credentials from `~/.smartsense/.env`.
//!
//! The file is optional. When present it must be private to the owner
//! (`0600` on unix), since it holds the remote model API key.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::config::runtime_paths;

/// Key/value pairs read from a dotenv file. `Debug` never shows values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    entries: BTreeMap<String, String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

impl FromIterator<(String, String)> for Credentials {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Credentials {
    /// Wrap an existing map.
    pub fn from_map(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Names of the loaded keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Whether nothing was loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse the dotenv file at `path`.
///
/// # Errors
///
/// Fails when the file is missing, readable by group or others, or
/// malformed.
pub fn load_credentials(path: &Path) -> anyhow::Result<Credentials> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("credentials file not readable: {}", path.display()))?;
    if let Some(mode) = shared_mode(&metadata) {
        anyhow::bail!(
            "credentials file {} must be 0600, found {mode:o}",
            path.display()
        );
    }

    let entries = dotenvy::from_path_iter(path)
        .with_context(|| format!("failed to open credentials {}", path.display()))?
        .collect::<Result<BTreeMap<String, String>, _>>()
        .with_context(|| format!("malformed entry in credentials {}", path.display()))?;

    debug!(path = %path.display(), keys = entries.len(), "credentials loaded");
    Ok(Credentials { entries })
}

/// Load the default credentials file; a missing file yields no credentials.
///
/// # Errors
///
/// Fails when the home directory is unknown or an existing file is rejected
/// by [`load_credentials`].
pub fn load_default_credentials() -> anyhow::Result<Credentials> {
    let env_file = runtime_paths()?.env_file;
    if env_file.exists() {
        load_credentials(&env_file)
    } else {
        debug!(path = %env_file.display(), "no credentials file");
        Ok(Credentials::default())
    }
}

/// API key for `key`: credentials first, then the process environment.
/// Values are trimmed and blank values count as missing.
pub fn resolve_api_key(credentials: &Credentials, key: &str) -> Option<String> {
    resolve_api_key_with(credentials, key, |k| std::env::var(k).ok())
}

/// [`resolve_api_key`] with an injectable environment.
pub fn resolve_api_key_with(
    credentials: &Credentials,
    key: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    let non_blank = |value: &str| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    };
    credentials
        .get(key)
        .and_then(non_blank)
        .or_else(|| env(key).as_deref().and_then(non_blank))
}

/// Permission bits when group or others can access the file.
#[cfg(unix)]
fn shared_mode(metadata: &std::fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;

    let mode = metadata.permissions().mode() & 0o777;
    (mode & 0o077 != 0).then_some(mode)
}

#[cfg(not(unix))]
fn shared_mode(_metadata: &std::fs::Metadata) -> Option<u32> {
    None
}
