//! Server endpoints and user credentials.

use roibridge_core::SessionError;
use roibridge_settings::ServerSettings;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// Connection timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A remote server, identified by host and port
///
/// Hosts compare case-insensitively; they are stored lowercased. The
/// timeout travels with the endpoint to the client but is not part of its
/// identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    host: String,
    port: u16,
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

impl Endpoint {
    pub fn new(host: impl AsRef<str>, port: u16) -> Self {
        Self {
            host: host.as_ref().trim().to_ascii_lowercase(),
            port,
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// How long the client may take to connect and authenticate
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host && self.port == other.port
    }
}

impl Eq for Endpoint {}

impl Hash for Endpoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.host.hash(state);
        self.port.hash(state);
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl From<&ServerSettings> for Endpoint {
    fn from(settings: &ServerSettings) -> Self {
        Endpoint::new(&settings.host, settings.port)
            .with_timeout(Duration::from_millis(settings.timeout_ms))
    }
}

/// User name and password for one server
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    password: String,
    encrypted: bool,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            encrypted: false,
        }
    }

    /// Ask the transport for an encrypted channel
    pub fn encrypted(mut self, encrypted: bool) -> Self {
        self.encrypted = encrypted;
        self
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Both user and password must be present
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.user.trim().is_empty() {
            return Err(SessionError::InvalidCredentials {
                reason: "missing user name".to_string(),
            });
        }
        if self.password.is_empty() {
            return Err(SessionError::InvalidCredentials {
                reason: format!("missing password for user {}", self.user),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .field("encrypted", &self.encrypted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_normalizes_host() {
        let a = Endpoint::new(" OMERO.Example.org ", 4064);
        let b = Endpoint::new("omero.example.org", 4064);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "omero.example.org:4064");
        assert_ne!(a, Endpoint::new("omero.example.org", 4080));
    }

    #[test]
    fn test_endpoint_from_settings() {
        let settings = ServerSettings::new("lab", "imaging.lab").with_port(14064);
        assert_eq!(Endpoint::from(&settings), Endpoint::new("imaging.lab", 14064));
    }

    #[test]
    fn test_timeout_carried_from_settings_but_not_identity() {
        let mut settings = ServerSettings::new("lab", "imaging.lab");
        settings.timeout_ms = 1_500;
        let endpoint = Endpoint::from(&settings);
        assert_eq!(endpoint.timeout(), Duration::from_millis(1_500));
        assert_eq!(endpoint, Endpoint::new("imaging.lab", roibridge_settings::DEFAULT_PORT));
        assert_eq!(Endpoint::new("a", 1).timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_credentials_validation() {
        assert!(Credentials::new("alice", "secret").validate().is_ok());
        assert!(Credentials::new("", "secret").validate().is_err());
        assert!(Credentials::new("  ", "secret").validate().is_err());
        assert!(Credentials::new("alice", "").validate().is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::new("alice", "hunter2").encrypted(true);
        let text = format!("{creds:?}");
        assert!(!text.contains("hunter2"));
        assert!(creds.is_encrypted());
    }
}
