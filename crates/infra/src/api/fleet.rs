//! Typed fleet operations
//!
//! High-level commands the monitoring and trip-history views consume:
//! device listings, status-report listing and triage, the driver-side field
//! submission, and trip history. Each operation names its candidate paths in
//! priority order and delegates the probing to the endpoint resolver.

use std::sync::Arc;

use fleetwatch_domain::{ConditionStatus, Device, StatusReport, Trip};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};
use urlencoding::encode;

use super::client::ApiClient;
use super::errors::ApiError;
use super::resolver::RequestSpec;

const DEVICE_PATHS: [&str; 4] =
    ["/admin/iot/devices", "/iot/devices", "/admin/devices", "/devices"];

const STATUS_REPORT_PATHS: [&str; 3] =
    ["/admin/iot/status-reports", "/iot/status-reports", "/admin/iot/reports"];

const TRIP_PATHS: [&str; 2] = ["/admin/trips", "/trips"];

const SUBMIT_REPORT_PATH: &str = "/driver/iot/report";

/// Administrator triage update for a status report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusReport {
    pub admin_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Driver-side field submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitStatusReport {
    pub status: ConditionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Success envelope for mutations: `{ message, item }`.
#[derive(Debug, Deserialize)]
struct MutationEnvelope {
    #[allow(dead_code)]
    #[serde(default)]
    message: Option<String>,
    item: StatusReport,
}

/// Fleet operations over an [`ApiClient`]
pub struct FleetCommands {
    client: Arc<ApiClient>,
}

impl FleetCommands {
    /// Create a new commands instance
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    // === Device operations ===

    /// List registered IoT devices.
    ///
    /// # Errors
    ///
    /// Returns error if a candidate fails with anything other than 404.
    #[instrument(skip(self, query))]
    pub async fn list_devices(&self, query: &[(String, String)]) -> Result<Vec<Device>, ApiError> {
        let spec = RequestSpec::get().with_query(query.to_vec());
        let rows = self.client.resolve_list(&paths(&DEVICE_PATHS), &spec).await?;

        debug!(count = rows.len(), "devices listed");
        decode_rows(rows)
    }

    // === Status report operations ===

    /// List field-submitted status reports for the monitoring view.
    ///
    /// # Errors
    ///
    /// Returns error if a candidate fails with anything other than 404.
    #[instrument(skip(self, query))]
    pub async fn list_status_reports(
        &self,
        query: &[(String, String)],
    ) -> Result<Vec<StatusReport>, ApiError> {
        let spec = RequestSpec::get().with_query(query.to_vec());
        let rows = self.client.resolve_list(&paths(&STATUS_REPORT_PATHS), &spec).await?;

        debug!(count = rows.len(), "status reports listed");
        decode_rows(rows)
    }

    /// Apply an administrator triage update to a status report.
    ///
    /// The triage status is trimmed and uppercased; an empty value is
    /// rejected before any network call.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty triage status, `RouteNotFound` when
    /// no deployment route accepts the update, or the first terminal error.
    #[instrument(skip(self, update), fields(report_id = %id))]
    pub async fn update_status_report(
        &self,
        id: &str,
        update: UpdateStatusReport,
    ) -> Result<StatusReport, ApiError> {
        let admin_status = update.admin_status.trim().to_uppercase();
        if admin_status.is_empty() {
            return Err(ApiError::Validation("adminStatus is required".to_string()));
        }

        let body = serde_json::to_value(UpdateStatusReport { admin_status, note: update.note })
            .map_err(|e| ApiError::Validation(format!("failed to encode update: {e}")))?;

        let candidates: Vec<String> = STATUS_REPORT_PATHS
            .iter()
            .map(|base| format!("{}/{}", base, encode(id)))
            .collect();

        let payload = self.client.resolve_write(&candidates, &RequestSpec::patch(body)).await?;
        let envelope: MutationEnvelope = decode_envelope(payload)?;

        debug!(report_id = %envelope.item.id, triage = envelope.item.triage_status(), "status report updated");
        Ok(envelope.item)
    }

    /// Submit a field status report (driver side). Single route, no fallback.
    ///
    /// # Errors
    ///
    /// Returns error if the submission is rejected or the route is absent.
    #[instrument(skip(self, submission))]
    pub async fn submit_status_report(
        &self,
        submission: SubmitStatusReport,
    ) -> Result<StatusReport, ApiError> {
        let body = serde_json::to_value(&submission)
            .map_err(|e| ApiError::Validation(format!("failed to encode submission: {e}")))?;

        let candidates = vec![SUBMIT_REPORT_PATH.to_string()];
        let payload = self.client.resolve_write(&candidates, &RequestSpec::post(body)).await?;
        let envelope: MutationEnvelope = decode_envelope(payload)?;

        debug!(report_id = %envelope.item.id, "status report submitted");
        Ok(envelope.item)
    }

    // === Trip operations ===

    /// List vehicle trips for the trip-history view.
    ///
    /// # Errors
    ///
    /// Returns error if a candidate fails with anything other than 404.
    #[instrument(skip(self, query))]
    pub async fn list_trips(&self, query: &[(String, String)]) -> Result<Vec<Trip>, ApiError> {
        let spec = RequestSpec::get().with_query(query.to_vec());
        let rows = self.client.resolve_list(&paths(&TRIP_PATHS), &spec).await?;

        debug!(count = rows.len(), "trips listed");
        decode_rows(rows)
    }
}

fn paths(candidates: &[&str]) -> Vec<String> {
    candidates.iter().map(|path| (*path).to_string()).collect()
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, ApiError> {
    serde_json::from_value(Value::Array(rows))
        .map_err(|e| ApiError::Backend(format!("malformed list row: {e}")))
}

fn decode_envelope(payload: Value) -> Result<MutationEnvelope, ApiError> {
    serde_json::from_value(payload)
        .map_err(|e| ApiError::Backend(format!("malformed mutation envelope: {e}")))
}
