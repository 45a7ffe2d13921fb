//! Session bootstrap against the backend's token-auth endpoints
//!
//! Only meaningful in remote mode; in local (single-admin) mode there is
//! nothing to authenticate against and `login`/`register` fail with
//! [`Error::Config`]. The backend may be cold-starting when these calls
//! arrive, so they get a longer deadline than record operations and their
//! own timeout wording.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::fetch::Fetch;

const AUTH_TIMEOUT_MESSAGE: &str =
    "Request timed out. The server may be waking up—please try again.";

/// A bootstrapped session: the token sent as `Authorization: Token <value>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
}

/// Client for the session-bootstrap endpoints
pub struct Auth {
    /// HTTP client used for requests
    client: Client,

    /// Remote base URL; `None` in local mode.
    base_url: Option<String>,

    /// Deadline for login/register/logout calls.
    timeout: Duration,

    /// The current session, shared with clones of this client.
    session: Arc<Mutex<Option<AuthSession>>>,
}

impl Auth {
    /// Create a new auth client. A token already present in the
    /// configuration seeds the session cache, so `logout` can revoke it.
    pub(crate) fn new(config: &ClientConfig, client: Client) -> Self {
        let session = config.auth_token().map(|token| AuthSession {
            token: token.to_string(),
        });

        Self {
            client,
            base_url: config.base_url().map(str::to_owned),
            timeout: config.auth_timeout(),
            session: Arc::new(Mutex::new(session)),
        }
    }

    fn auth_url(&self, path: &str) -> Result<String> {
        match &self.base_url {
            Some(base) => Ok(format!("{base}/api/auth/{path}/")),
            None => Err(Error::config("Backend not configured.")),
        }
    }

    /// Exchange credentials for a session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let url = self.auth_url("login")?;

        let mut body = HashMap::new();
        body.insert("email", email);
        body.insert("password", password);

        let session = Fetch::post(&self.client, &url)
            .timeout(self.timeout)
            .timeout_message(AUTH_TIMEOUT_MESSAGE)
            .fallback("Login failed.")
            .json(&body)?
            .execute::<AuthSession>()
            .await?;

        let mut current = self.session.lock().unwrap();
        *current = Some(session.clone());

        Ok(session)
    }

    /// Create an account and return its session token.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthSession> {
        let url = self.auth_url("register")?;

        let mut body = HashMap::new();
        body.insert("name", name);
        body.insert("email", email);
        body.insert("password", password);

        let session = Fetch::post(&self.client, &url)
            .timeout(self.timeout)
            .timeout_message(AUTH_TIMEOUT_MESSAGE)
            .fallback("Signup failed.")
            .json(&body)?
            .execute::<AuthSession>()
            .await?;

        let mut current = self.session.lock().unwrap();
        *current = Some(session.clone());

        Ok(session)
    }

    /// Revoke the current session token server-side.
    ///
    /// The cached session is cleared no matter what; with no backend or no
    /// token there is nothing to revoke and the call is a silent no-op, and
    /// a failed revocation request is logged and swallowed rather than
    /// surfaced.
    pub async fn logout(&self) -> Result<()> {
        let token = {
            let mut current = self.session.lock().unwrap();
            match current.take() {
                Some(session) => session.token,
                None => return Ok(()),
            }
        };

        let base = match &self.base_url {
            Some(base) => base,
            None => return Ok(()),
        };

        let result = Fetch::post(&self.client, &format!("{base}/api/auth/logout/"))
            .token_auth(Some(&token))
            .timeout(self.timeout)
            .timeout_message(AUTH_TIMEOUT_MESSAGE)
            .execute_unit()
            .await;

        if let Err(e) = result {
            log::debug!("logout request failed, session dropped anyway: {e}");
        }

        Ok(())
    }

    /// Get the current session
    pub fn get_session(&self) -> Option<AuthSession> {
        let current = self.session.lock().unwrap();
        current.clone()
    }

    /// Replace the current session, e.g. one restored from the caller's
    /// own storage. `None` drops the cached session without a logout call.
    pub fn set_session(&self, session: Option<AuthSession>) {
        let mut current = self.session.lock().unwrap();
        *current = session;
    }
}
