//! Common data types used throughout the application
//!
//! Wire representations follow the backend's JSON conventions: camelCase
//! field names, SCREAMING_SNAKE_CASE status tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Triage status assigned to a report that has never been triaged.
pub const DEFAULT_TRIAGE_STATUS: &str = "PENDING";

/// Reporter-submitted condition of a device/vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionStatus {
    Working,
    NotWorking,
    NeedsMaintenance,
}

impl ConditionStatus {
    /// Lenient parser matching the backend's normalization: surrounding
    /// whitespace and casing are ignored.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_uppercase().as_str() {
            "WORKING" => Some(Self::Working),
            "NOT_WORKING" => Some(Self::NotWorking),
            "NEEDS_MAINTENANCE" => Some(Self::NeedsMaintenance),
            _ => None,
        }
    }

    /// Wire token for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Working => "WORKING",
            Self::NotWorking => "NOT_WORKING",
            Self::NeedsMaintenance => "NEEDS_MAINTENANCE",
        }
    }
}

/// Field-submitted device/vehicle status report.
///
/// Created by a driver submission, mutated only by administrator triage
/// updates, never deleted by this client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub driver_profile_id: Option<String>,
    pub status: ConditionStatus,
    /// Administrator-assigned triage status. A non-empty uppercase token
    /// once set (e.g. PENDING, NEEDS_CHECK, IN_PROGRESS, RESOLVED, OK).
    #[serde(default)]
    pub admin_status: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Display fields the backend denormalizes onto list rows.
    #[serde(default)]
    pub vehicle_number: Option<String>,
    #[serde(default)]
    pub vehicle_plate: Option<String>,
    #[serde(default)]
    pub driver_name: Option<String>,
}

impl StatusReport {
    /// Effective triage status: a report without an explicit non-empty
    /// triage status is treated as `PENDING`.
    pub fn triage_status(&self) -> &str {
        match self.admin_status.as_deref() {
            Some(status) if !status.trim().is_empty() => status,
            _ => DEFAULT_TRIAGE_STATUS,
        }
    }
}

/// IoT device registered against a vehicle.
///
/// Read-only from this subsystem's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub last_seen_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Lifecycle state of a vehicle trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    Ongoing,
    Completed,
    Cancelled,
}

/// Completed or in-flight vehicle trip.
///
/// Read-only from this subsystem's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    pub status: TripStatus,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub driver_profile_id: Option<String>,
}

/// Backend role attached to an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Driver,
}

/// Identity of the authenticated user, as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<String>,
    pub email: String,
    pub role: Role,
}
