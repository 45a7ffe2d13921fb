//! Embedded JSON-file fallback store
//!
//! Active when no remote base URL is configured, which is how single-admin
//! mode runs without any backend at all. Each collection is one JSON array
//! in the data directory under a fixed file name. Every operation re-reads
//! its collection from disk and mutations re-write the whole array; that
//! read-modify-write cycle is serialized behind a store-wide async lock,
//! so callers inside one process cannot interleave writes. Across
//! processes the single-user assumption stands.
//!
//! A missing or unreadable collection file reads as an empty collection.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use super::RecordStore;
use crate::error::{Error, Result};
use crate::models::{
    AttendanceEntry, AttendanceFilter, AttendanceRecord, Employee, EmployeeDraft,
};

/// Well-known file name of the employee collection.
const EMPLOYEES_FILE: &str = "hrms_employees.json";
/// Well-known file name of the attendance collection.
const ATTENDANCE_FILE: &str = "hrms_attendance.json";

/// Record store persisting to JSON files in a data directory.
pub struct LocalRecordStore {
    data_dir: PathBuf,
    /// Single-writer lock; also carries the floor for minted record ids.
    state: Mutex<MintState>,
}

#[derive(Default)]
struct MintState {
    last_id: u64,
}

impl MintState {
    /// Timestamp-derived record id, kept strictly increasing within this
    /// store so that rapid creations in the same millisecond stay unique.
    fn mint_id(&mut self) -> String {
        let now_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.last_id = now_millis.max(self.last_id + 1);
        self.last_id.to_string()
    }
}

impl LocalRecordStore {
    /// Open the store over `data_dir`. The directory is created lazily on
    /// the first write, so a store that is only ever read never touches
    /// the filesystem beyond reads.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            state: Mutex::new(MintState::default()),
        }
    }

    /// The directory the collections live in.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn read_collection<T: DeserializeOwned>(&self, file: &str) -> Vec<T> {
        let path = self.data_dir.join(file);
        match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(records) => records,
                Err(e) => {
                    log::warn!(
                        "{} is not a valid record array, treating it as empty: {e}",
                        path.display()
                    );
                    Vec::new()
                }
            },
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("failed to read {}: {e}", path.display());
                }
                Vec::new()
            }
        }
    }

    fn write_collection<T: Serialize>(&self, file: &str, records: &[T]) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| {
            Error::storage(format!(
                "Failed to create data directory {}: {e}",
                self.data_dir.display()
            ))
        })?;
        let path = self.data_dir.join(file);
        let json = serde_json::to_vec(records)
            .map_err(|e| Error::storage(format!("Failed to encode {file}: {e}")))?;
        std::fs::write(&path, json)
            .map_err(|e| Error::storage(format!("Failed to write {}: {e}", path.display())))
    }
}

#[async_trait]
impl RecordStore for LocalRecordStore {
    async fn list_employees(&self) -> Result<Vec<Employee>> {
        let _guard = self.state.lock().await;
        Ok(self.read_collection(EMPLOYEES_FILE))
    }

    async fn create_employee(&self, draft: &EmployeeDraft) -> Result<Employee> {
        let draft = draft.trimmed();
        draft.validate()?;

        let mut state = self.state.lock().await;
        let mut employees: Vec<Employee> = self.read_collection(EMPLOYEES_FILE);

        if employees.iter().any(|e| e.employee_id == draft.employee_id) {
            return Err(Error::duplicate_key("Employee ID already exists"));
        }

        let employee = Employee {
            id: state.mint_id(),
            employee_id: draft.employee_id,
            full_name: draft.full_name,
            email: draft.email,
            department: draft.department,
        };
        employees.push(employee.clone());
        self.write_collection(EMPLOYEES_FILE, &employees)?;
        Ok(employee)
    }

    async fn update_employee(&self, id: &str, draft: &EmployeeDraft) -> Result<Employee> {
        let _guard = self.state.lock().await;
        let mut employees: Vec<Employee> = self.read_collection(EMPLOYEES_FILE);

        let index = employees
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| Error::not_found("Employee not found."))?;

        let draft = draft.trimmed();
        draft.validate()?;

        // The code may collide with any record other than the one being
        // replaced.
        if employees
            .iter()
            .any(|e| e.id != id && e.employee_id == draft.employee_id)
        {
            return Err(Error::duplicate_key("Employee ID already exists"));
        }

        let updated = Employee {
            id: employees[index].id.clone(),
            employee_id: draft.employee_id,
            full_name: draft.full_name,
            email: draft.email,
            department: draft.department,
        };
        employees[index] = updated.clone();
        self.write_collection(EMPLOYEES_FILE, &employees)?;
        Ok(updated)
    }

    async fn delete_employee(&self, id: &str) -> Result<()> {
        let _guard = self.state.lock().await;
        let mut employees: Vec<Employee> = self.read_collection(EMPLOYEES_FILE);

        let before = employees.len();
        employees.retain(|e| e.id != id);
        if employees.len() == before {
            // Unknown id: a silent no-op, and nothing is rewritten.
            return Ok(());
        }
        self.write_collection(EMPLOYEES_FILE, &employees)
    }

    async fn list_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>> {
        let _guard = self.state.lock().await;
        let mut records: Vec<AttendanceRecord> = self.read_collection(ATTENDANCE_FILE);
        records.retain(|r| filter.matches(r));
        Ok(records)
    }

    async fn mark_attendance(&self, entry: &AttendanceEntry) -> Result<AttendanceRecord> {
        let mut state = self.state.lock().await;
        let mut records: Vec<AttendanceRecord> = self.read_collection(ATTENDANCE_FILE);

        let record = AttendanceRecord {
            id: state.mint_id(),
            employee_id: entry.employee_id.clone(),
            date: entry.date.clone(),
            status: entry.status,
        };
        records.push(record.clone());
        self.write_collection(ATTENDANCE_FILE, &records)?;
        Ok(record)
    }
}
