//! HRMS Record-Keeping Client Library
//!
//! A Rust client for an HRMS backend, providing employee roster and
//! attendance log access over either a remote HTTP API or an embedded
//! local JSON-file store, plus session bootstrap for the authenticated
//! deployment mode.
//!
//! The backend is chosen once, from [`config::ClientConfig`]: a remote
//! base URL routes every record operation to the HTTP API, no base URL
//! routes them to JSON files on disk (single-admin mode, no network).
//! Callers work against the [`store::RecordStore`] trait either way.

pub mod auth;
pub mod config;
pub mod error;
mod fetch;
pub mod models;
pub mod store;

use reqwest::Client;

use crate::auth::{Auth, AuthSession};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::store::RecordStore;

/// The main entry point for the HRMS client
pub struct Hrms {
    /// Resolved configuration; immutable for the life of the client.
    config: ClientConfig,
    /// HTTP client shared by the record store and the auth client.
    http_client: Client,
    /// Auth client for session bootstrap
    auth: Auth,
    /// Record store for the configured backend
    store: Box<dyn RecordStore>,
}

impl Hrms {
    /// Create a new HRMS client for the given configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use hrms_client::prelude::*;
    ///
    /// let hrms = Hrms::new(ClientConfig::local(".hrms-data")).unwrap();
    /// assert!(!hrms.config().is_remote());
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http_client = Client::new();

        let auth = Auth::new(&config, http_client.clone());
        let store = store::open(&config, http_client.clone())?;

        Ok(Self {
            config,
            http_client,
            auth,
            store,
        })
    }

    /// Create a client from the `HRMS_*` environment variables.
    ///
    /// See [`config::ClientConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Rebuild the client with `session`'s token attached to every record
    /// operation, typically right after [`Auth::login`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hrms_client::prelude::*;
    ///
    /// # async fn bootstrap() -> Result<()> {
    /// let hrms = Hrms::new(ClientConfig::remote("https://hrms.example.com")?)?;
    /// let session = hrms.auth().login("admin@example.com", "secret").await?;
    /// let hrms = hrms.with_session(&session)?;
    /// let employees = hrms.store().list_employees().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_session(self, session: &AuthSession) -> Result<Self> {
        Self::new(self.config.with_auth_token(session.token.as_str()))
    }

    /// Get a reference to the record store for the configured backend
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Get a reference to the auth client for session bootstrap
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying HTTP client, shared by both remote components.
    pub fn http_client(&self) -> &Client {
        &self.http_client
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{Auth, AuthSession};
    pub use crate::config::ClientConfig;
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        AttendanceEntry, AttendanceFilter, AttendanceRecord, AttendanceStatus, Employee,
        EmployeeDraft,
    };
    pub use crate::store::RecordStore;
    pub use crate::Hrms;
}
