//! HTTP record store
//!
//! Every operation maps one-to-one onto a backend REST endpoint. The
//! server owns validation and id assignment; this side owns deadlines,
//! the `Token` authorization header, and normalizing whatever error body
//! comes back into a single human-readable message.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::RecordStore;
use crate::config::{Backend, ClientConfig};
use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::models::{
    AttendanceEntry, AttendanceFilter, AttendanceRecord, Employee, EmployeeDraft,
};

const FETCH_EMPLOYEES_FALLBACK: &str = "Failed to fetch employees ({status}). Check backend URL.";
const FETCH_ATTENDANCE_FALLBACK: &str = "Failed to fetch attendance ({status}). Check backend URL.";
const DELETE_EMPLOYEE_FALLBACK: &str = "Failed to delete employee";

/// Record store backed by the HTTP API.
pub struct RemoteRecordStore {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
    timeout: Duration,
}

impl RemoteRecordStore {
    /// Build a store over the remote backend named by `config`.
    ///
    /// Fails with [`Error::Config`] when `config` is in local mode; use
    /// [`store::open`](super::open) to dispatch on the backend instead of
    /// constructing an implementation directly.
    pub fn new(config: &ClientConfig, http_client: Client) -> Result<Self> {
        let base_url = match config.backend() {
            Backend::Remote { base_url } => base_url.clone(),
            Backend::Local { .. } => return Err(Error::config("Backend not configured.")),
        };

        Ok(Self {
            client: http_client,
            base_url,
            auth_token: config.auth_token().map(str::to_owned),
            timeout: config.request_timeout(),
        })
    }

    fn employees_url(&self) -> String {
        format!("{}/api/employees/", self.base_url)
    }

    fn employee_url(&self, id: &str) -> String {
        format!("{}/api/employees/{}/", self.base_url, id)
    }

    fn attendance_url(&self) -> String {
        format!("{}/api/attendance/", self.base_url)
    }
}

#[async_trait]
impl RecordStore for RemoteRecordStore {
    async fn list_employees(&self) -> Result<Vec<Employee>> {
        Fetch::get(&self.client, &self.employees_url())
            .token_auth(self.auth_token.as_deref())
            .timeout(self.timeout)
            .fallback(FETCH_EMPLOYEES_FALLBACK)
            .execute()
            .await
    }

    async fn create_employee(&self, draft: &EmployeeDraft) -> Result<Employee> {
        // The draft goes out as entered; the server trims and validates.
        Fetch::post(&self.client, &self.employees_url())
            .token_auth(self.auth_token.as_deref())
            .timeout(self.timeout)
            .json(draft)?
            .execute()
            .await
    }

    async fn update_employee(&self, id: &str, draft: &EmployeeDraft) -> Result<Employee> {
        Fetch::put(&self.client, &self.employee_url(id))
            .token_auth(self.auth_token.as_deref())
            .timeout(self.timeout)
            .json(draft)?
            .execute()
            .await
    }

    async fn delete_employee(&self, id: &str) -> Result<()> {
        Fetch::delete(&self.client, &self.employee_url(id))
            .token_auth(self.auth_token.as_deref())
            .timeout(self.timeout)
            .fallback(DELETE_EMPLOYEE_FALLBACK)
            .execute_unit()
            .await
    }

    async fn list_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>> {
        Fetch::get(&self.client, &self.attendance_url())
            .token_auth(self.auth_token.as_deref())
            .query(&filter.query_pairs())
            .timeout(self.timeout)
            .fallback(FETCH_ATTENDANCE_FALLBACK)
            .execute()
            .await
    }

    async fn mark_attendance(&self, entry: &AttendanceEntry) -> Result<AttendanceRecord> {
        Fetch::post(&self.client, &self.attendance_url())
            .token_auth(self.auth_token.as_deref())
            .timeout(self.timeout)
            .json(entry)?
            .execute()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RemoteRecordStore {
        let config = ClientConfig::remote("https://api.example.com/").unwrap();
        RemoteRecordStore::new(&config, Client::new()).unwrap()
    }

    #[test]
    fn urls_follow_the_api_layout() {
        let store = store();
        assert_eq!(
            store.employees_url(),
            "https://api.example.com/api/employees/"
        );
        assert_eq!(
            store.employee_url("42"),
            "https://api.example.com/api/employees/42/"
        );
        assert_eq!(
            store.attendance_url(),
            "https://api.example.com/api/attendance/"
        );
    }

    #[test]
    fn constructor_rejects_local_configuration() {
        let config = ClientConfig::local("/tmp/hrms-data");
        let result = RemoteRecordStore::new(&config, Client::new());
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
