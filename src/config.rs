//! Client configuration
//!
//! Configuration is assembled once at startup and is immutable for the
//! life of the process: the backend choice (remote base URL vs. local data
//! directory), the optional session token, the auth-required switch, and
//! the request deadlines all live here and are passed explicitly to the
//! components that need them. Nothing reads ambient environment state at
//! call time.

use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Environment variable naming the remote backend base URL. Empty or
/// absent means local-only mode.
pub const ENV_API_URL: &str = "HRMS_API_URL";
/// Environment variable carrying a session token for authenticated requests.
pub const ENV_AUTH_TOKEN: &str = "HRMS_AUTH_TOKEN";
/// Environment variable naming the local store directory.
pub const ENV_DATA_DIR: &str = "HRMS_DATA_DIR";
/// Environment variable enabling the fully authenticated mode. Anything
/// but `true` keeps the default single-admin mode, where auth is bypassed.
pub const ENV_REQUIRE_AUTH: &str = "HRMS_REQUIRE_AUTH";

const DEFAULT_DATA_DIR: &str = ".hrms";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone)]
pub(crate) enum Backend {
    Remote { base_url: String },
    Local { data_dir: PathBuf },
}

/// Configuration for the HRMS client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    backend: Backend,
    auth_token: Option<String>,
    require_auth: bool,
    request_timeout: Duration,
    auth_timeout: Duration,
}

impl Default for ClientConfig {
    /// Local-only single-admin mode with the `.hrms` data directory.
    fn default() -> Self {
        Self::local(DEFAULT_DATA_DIR)
    }
}

impl ClientConfig {
    /// Remote mode: every record operation goes to the HTTP API under
    /// `base_url`. Trailing slashes are stripped; the URL must parse.
    pub fn remote(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(Error::config("Remote base URL must not be empty."));
        }
        Url::parse(trimmed)
            .map_err(|e| Error::config(format!("Invalid remote base URL {trimmed:?}: {e}")))?;

        Ok(Self {
            backend: Backend::Remote {
                base_url: trimmed.to_string(),
            },
            auth_token: None,
            require_auth: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            auth_timeout: DEFAULT_AUTH_TIMEOUT,
        })
    }

    /// Local mode: records persist in JSON files under `data_dir`; no
    /// network is touched.
    pub fn local(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::Local {
                data_dir: data_dir.into(),
            },
            auth_token: None,
            require_auth: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            auth_timeout: DEFAULT_AUTH_TIMEOUT,
        }
    }

    /// Read the configuration from the environment, once.
    ///
    /// `HRMS_API_URL` picks the mode exactly like the reference deployment:
    /// non-empty means remote, empty or absent means local with
    /// `HRMS_DATA_DIR` (default `.hrms`).
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(ENV_API_URL).unwrap_or_default();
        let mut config = if base_url.trim().is_empty() {
            let data_dir =
                std::env::var(ENV_DATA_DIR).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
            Self::local(data_dir)
        } else {
            Self::remote(&base_url)?
        };

        if let Ok(token) = std::env::var(ENV_AUTH_TOKEN) {
            if !token.is_empty() {
                config = config.with_auth_token(token);
            }
        }
        config.require_auth = std::env::var(ENV_REQUIRE_AUTH)
            .map(|v| v == "true")
            .unwrap_or(false);

        Ok(config)
    }

    /// Attach a session token, sent as `Authorization: Token <value>` on
    /// every remote request.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the bound applied to every non-auth remote call.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the bound applied to the session-bootstrap calls, which may hit
    /// a backend that is still waking up.
    pub fn with_auth_timeout(mut self, timeout: Duration) -> Self {
        self.auth_timeout = timeout;
        self
    }

    /// Flip between single-admin mode (`false`, the default: auth is
    /// bypassed) and fully authenticated mode. The library only records
    /// the switch; gating screens on it is the embedding application's
    /// concern.
    pub fn with_auth_required(mut self, required: bool) -> Self {
        self.require_auth = required;
        self
    }

    pub(crate) fn backend(&self) -> &Backend {
        &self.backend
    }

    /// The remote base URL, when operating in remote mode.
    pub fn base_url(&self) -> Option<&str> {
        match &self.backend {
            Backend::Remote { base_url } => Some(base_url),
            Backend::Local { .. } => None,
        }
    }

    /// The local store directory, when operating in local mode.
    pub fn data_dir(&self) -> Option<&Path> {
        match &self.backend {
            Backend::Remote { .. } => None,
            Backend::Local { data_dir } => Some(data_dir),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.backend, Backend::Remote { .. })
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn auth_required(&self) -> bool {
        self.require_auth
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn auth_timeout(&self) -> Duration {
        self.auth_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_strips_trailing_slash() {
        let config = ClientConfig::remote("https://api.example.com/").unwrap();
        assert_eq!(config.base_url(), Some("https://api.example.com"));
        assert!(config.is_remote());
        assert!(config.data_dir().is_none());
    }

    #[test]
    fn remote_rejects_empty_and_invalid_urls() {
        assert!(matches!(ClientConfig::remote(""), Err(Error::Config(_))));
        assert!(matches!(ClientConfig::remote("   "), Err(Error::Config(_))));
        assert!(matches!(
            ClientConfig::remote("not a url"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn local_mode_has_no_base_url() {
        let config = ClientConfig::local("/tmp/hrms-data");
        assert!(!config.is_remote());
        assert_eq!(config.base_url(), None);
        assert_eq!(config.data_dir(), Some(Path::new("/tmp/hrms-data")));
        assert!(!config.auth_required());
    }

    #[test]
    fn auth_required_switch_is_recorded() {
        let config = ClientConfig::local("/tmp/hrms-data").with_auth_required(true);
        assert!(config.auth_required());
    }

    #[test]
    fn timeouts_default_per_policy() {
        let config = ClientConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.auth_timeout(), Duration::from_secs(90));

        let config = config.with_request_timeout(Duration::from_millis(250));
        assert_eq!(config.request_timeout(), Duration::from_millis(250));
    }
}
