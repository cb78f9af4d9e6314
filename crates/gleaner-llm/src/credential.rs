//! API credential loading
//!
//! The credential is read once when the client is built and then held by the
//! client. A missing credential is not an error here; the first call fails
//! with an authentication error instead.

use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Secret API key
///
/// `Debug` is redacted so the key never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for the authorization header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

/// The credential a client was built with, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
    key: Option<ApiKey>,
}

impl Credential {
    /// Credential holding `key`
    pub fn from_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(ApiKey::new(key)),
        }
    }

    /// No credential
    pub fn missing() -> Self {
        Self::default()
    }

    /// Load from a secret file, falling back to an environment variable
    ///
    /// The file is scanned for a `VAR=value` line where `VAR` is `var`. If
    /// the file is absent or has no such line, the environment variable of
    /// the same name is consulted.
    pub fn load(path: &Path, var: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                if let Some(key) = parse_key_line(&content, var) {
                    debug!("Loaded API key from {}", path.display());
                    return Self::from_key(key);
                }
                warn!("No {} line found in {}", var, path.display());
            }
            Err(e) => debug!("Could not read secret file {}: {}", path.display(), e),
        }

        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Self::from_key(key.trim()),
            _ => {
                warn!("No API key configured; classifier calls will fail authentication");
                Self::missing()
            }
        }
    }

    /// The key, if one was found
    pub fn key(&self) -> Option<&ApiKey> {
        self.key.as_ref()
    }
}

fn parse_key_line(content: &str, var: &str) -> Option<String> {
    let marker = format!("{}=", var);
    content.lines().find_map(|line| {
        let start = line.find(&marker)? + marker.len();
        let value = line[start..].trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}
