//! Record types for the employee roster and attendance log
//!
//! Field names match the backend's wire format (and the on-disk layout of
//! the local store) exactly, so no renaming happens at the serde boundary.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// The `local@domain.tld` shape check. Anything stricter is the server's
/// business.
static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// A roster record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Record identifier. Servers assign numeric ids, the local store
    /// assigns timestamp-derived strings; both normalize to a string here.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Organization-chosen employee code, unique across the roster
    /// (case-sensitive).
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
}

/// Payload for creating or updating an [`Employee`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
}

impl EmployeeDraft {
    /// Create a draft from the four required fields.
    pub fn new(
        employee_id: impl Into<String>,
        full_name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            full_name: full_name.into(),
            email: email.into(),
            department: department.into(),
        }
    }

    /// A copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            employee_id: self.employee_id.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            department: self.department.trim().to_string(),
        }
    }

    /// Check the draft against the data-model invariants: every field
    /// non-empty after trimming, email of `local@domain.tld` shape.
    ///
    /// The local store enforces this; the remote backend validates
    /// server-side and receives the draft untouched.
    pub fn validate(&self) -> Result<()> {
        if self.employee_id.trim().is_empty() {
            return Err(Error::validation("Employee ID is required."));
        }
        if self.full_name.trim().is_empty() {
            return Err(Error::validation("Full name is required."));
        }
        if self.email.trim().is_empty() {
            return Err(Error::validation("Email is required."));
        }
        if !EMAIL_SHAPE.is_match(self.email.trim()) {
            return Err(Error::validation("Enter a valid email address."));
        }
        if self.department.trim().is_empty() {
            return Err(Error::validation("Department is required."));
        }
        Ok(())
    }
}

/// Present/absent marker for one employee on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    /// The wire form, identical to the display form.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            s if s.eq_ignore_ascii_case("present") => Ok(AttendanceStatus::Present),
            s if s.eq_ignore_ascii_case("absent") => Ok(AttendanceStatus::Absent),
            other => Err(Error::validation(format!(
                "Status must be Present or Absent, got \"{other}\"."
            ))),
        }
    }
}

/// One attendance entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Soft reference to [`Employee::employee_id`]; a dangling code is
    /// tolerated and rendered as-is (see [`employee_name_for`]).
    pub employee_id: String,
    /// Calendar date in `YYYY-MM-DD` form, compared by exact equality.
    pub date: String,
    pub status: AttendanceStatus,
}

/// Payload for marking attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub employee_id: String,
    pub date: String,
    pub status: AttendanceStatus,
}

impl AttendanceEntry {
    pub fn new(
        employee_id: impl Into<String>,
        date: impl Into<String>,
        status: AttendanceStatus,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            date: date.into(),
            status,
        }
    }
}

/// Optional attendance filters; provided fields combine with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub date: Option<String>,
    pub employee_id: Option<String>,
}

impl AttendanceFilter {
    /// Restrict to records on the given date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Restrict to records for the given employee code.
    pub fn with_employee_id(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    /// Exact-equality match on every provided field.
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        if let Some(date) = &self.date {
            if &record.date != date {
                return false;
            }
        }
        if let Some(employee_id) = &self.employee_id {
            if &record.employee_id != employee_id {
                return false;
            }
        }
        true
    }

    /// Query-parameter form used by the remote backend.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(date) = &self.date {
            pairs.push(("date", date.as_str()));
        }
        if let Some(employee_id) = &self.employee_id {
            pairs.push(("employee_id", employee_id.as_str()));
        }
        pairs
    }
}

/// Resolve an employee code to the employee's full name, falling back to
/// the raw code when the reference dangles.
pub fn employee_name_for<'a>(employees: &'a [Employee], employee_id: &'a str) -> &'a str {
    employees
        .iter()
        .find(|e| e.employee_id == employee_id)
        .map(|e| e.full_name.as_str())
        .unwrap_or(employee_id)
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "record id must be a string or number, got {other}"
        ))),
    }
}
