//! Record store backends
//!
//! One capability trait, two implementations: [`RemoteRecordStore`] talks
//! to the HTTP API, [`LocalRecordStore`] persists JSON files for running
//! without any backend. The choice is made once, from the configuration;
//! callers only ever see the trait.

mod local;
mod remote;

pub use local::LocalRecordStore;
pub use remote::RemoteRecordStore;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{Backend, ClientConfig};
use crate::error::Result;
use crate::models::{
    AttendanceEntry, AttendanceFilter, AttendanceRecord, Employee, EmployeeDraft,
};

/// Uniform create/read/update/delete surface over the employee roster and
/// the attendance log.
///
/// Both backends present identical signatures and the same error contract;
/// which rules are enforced where differs (the local store checks drafts
/// and `employee_id` uniqueness itself, the remote backend trusts the
/// server to do so).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The full roster. An empty roster is a valid, non-error result.
    async fn list_employees(&self) -> Result<Vec<Employee>>;

    /// Create a roster record from `draft` and return it with its assigned
    /// record id.
    async fn create_employee(&self, draft: &EmployeeDraft) -> Result<Employee>;

    /// Replace the mutable fields of the employee with record id `id`.
    async fn update_employee(&self, id: &str, draft: &EmployeeDraft) -> Result<Employee>;

    /// Remove the employee with record id `id`. Attendance records that
    /// reference the employee's code are left in place by the local store.
    async fn delete_employee(&self, id: &str) -> Result<()>;

    /// Attendance records matching `filter`; provided fields combine with
    /// logical AND, no filter returns the full log.
    async fn list_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>>;

    /// Append one attendance entry and return it with its assigned record
    /// id. Duplicate (employee, date) pairs are not rejected.
    async fn mark_attendance(&self, entry: &AttendanceEntry) -> Result<AttendanceRecord>;
}

/// Select the backend the configuration names: remote when a base URL is
/// configured, the embedded local store otherwise.
pub fn open(config: &ClientConfig, http_client: Client) -> Result<Box<dyn RecordStore>> {
    match config.backend() {
        Backend::Remote { .. } => Ok(Box::new(RemoteRecordStore::new(config, http_client)?)),
        Backend::Local { data_dir } => Ok(Box::new(LocalRecordStore::new(data_dir))),
    }
}
