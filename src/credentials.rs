//! Credential loading from a runtime `.env` file and the process environment.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::config::{config_dir, GatewayConfig};

/// Raw credential values keyed by variable name.
#[derive(Clone, Default)]
pub struct Credentials {
    vars: BTreeMap<String, String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("keys", &self.vars.keys().collect::<Vec<_>>())
            .field("values", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Build credentials from a key-value map.
    pub fn from_map(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }

    /// Capture the named variables from the process environment.
    ///
    /// Unset or non-UTF-8 variables are skipped.
    pub fn from_process_env<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let vars = keys
            .into_iter()
            .filter_map(|key| std::env::var(key).ok().map(|value| (key.to_owned(), value)))
            .collect();
        Self { vars }
    }

    /// Overlay `other` on top of `self`; keys present in both take `other`'s value.
    #[must_use]
    pub fn merge(mut self, other: Credentials) -> Self {
        self.vars.extend(other.vars);
        self
    }

    /// Returns a credential value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Returns a required, non-empty credential or an error when missing.
    ///
    /// # Errors
    ///
    /// Returns an error when the key is absent or blank.
    pub fn require(&self, key: &str) -> anyhow::Result<String> {
        self.vars
            .get(key)
            .filter(|value| !value.trim().is_empty())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("missing required credential: {key}"))
    }
}

/// Load credentials from a specific `.env` path.
///
/// # Errors
///
/// Returns an error if the file does not exist, permissions are too broad,
/// or parsing fails.
pub fn load_credentials(path: &Path) -> anyhow::Result<Credentials> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "credentials file does not exist: {}",
            path.display()
        ));
    }

    validate_private_permissions(path)?;

    let mut vars = BTreeMap::new();
    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("failed to read credentials at {}", path.display()))?;

    for item in iter {
        let (key, value) = item.with_context(|| {
            format!(
                "failed to parse key-value entry in credentials file {}",
                path.display()
            )
        })?;
        vars.insert(key, value);
    }

    Ok(Credentials { vars })
}

/// Resolve gateway credentials the way the CLI does.
///
/// Reads `~/.tasksms/.env` when it exists, then lets the process environment
/// override it.
///
/// # Errors
///
/// Returns an error if the `.env` file exists but is invalid.
pub fn load_default_credentials(gateway: &GatewayConfig) -> anyhow::Result<Credentials> {
    let env_file = config_dir()?.join(".env");
    let from_file = if env_file.exists() {
        load_credentials(&env_file)?
    } else {
        Credentials::default()
    };
    let from_env = Credentials::from_process_env([
        gateway.identity_env.as_str(),
        gateway.secret_env.as_str(),
    ]);
    Ok(from_file.merge(from_env))
}

#[cfg(unix)]
fn validate_private_permissions(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path)
        .with_context(|| format!("failed to inspect credentials file {}", path.display()))?;
    let mode = metadata.permissions().mode() & 0o777;

    if mode & 0o077 != 0 {
        return Err(anyhow::anyhow!(
            "credentials file {} must be 0600, found {:o}",
            path.display(),
            mode
        ));
    }

    Ok(())
}

#[cfg(not(unix))]
fn validate_private_permissions(_path: &Path) -> anyhow::Result<()> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Gateway account
// ---------------------------------------------------------------------------

/// Account identity and secret for the SMS gateway.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayCredentials {
    identity: String,
    secret: String,
}

impl std::fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("identity", &self.identity)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl GatewayCredentials {
    /// Build from explicit values.
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            secret: secret.into(),
        }
    }

    /// Look up both values under the variable names the gateway config names.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing or blank variable.
    pub fn resolve(credentials: &Credentials, gateway: &GatewayConfig) -> anyhow::Result<Self> {
        let identity = credentials
            .require(&gateway.identity_env)
            .context("SMS gateway identity is not configured")?;
        let secret = credentials
            .require(&gateway.secret_env)
            .context("SMS gateway secret is not configured")?;
        Ok(Self { identity, secret })
    }

    /// Whether both variables are present and non-blank.
    pub fn is_configured(credentials: &Credentials, gateway: &GatewayConfig) -> bool {
        Self::resolve(credentials, gateway).is_ok()
    }

    /// Account identity (e.g. the account e-mail).
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Account secret.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Values that must never appear in logs or error bodies.
    pub fn secret_values(&self) -> Vec<String> {
        if self.secret.is_empty() {
            Vec::new()
        } else {
            vec![self.secret.clone()]
        }
    }
}
