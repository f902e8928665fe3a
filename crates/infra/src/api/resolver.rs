//! Endpoint resolution with ordered fallback
//!
//! Backend deployments have drifted on route naming, so one logical
//! operation maps to several candidate concrete paths. The resolver probes
//! candidates strictly in priority order and returns the first success,
//! masking the drift from callers.
//!
//! Classification is asymmetric on purpose: a 404 means "this candidate does
//! not exist on this deployment" and is recoverable by trying the next known
//! path, while any other failure (network, 4xx, 5xx) is a real error that
//! must surface immediately rather than be masked by further probing.
//! Candidates are awaited one at a time — probing in parallel would fire
//! duplicate side effects for write operations.

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument};

use super::client::ApiClient;
use super::errors::ApiError;

/// Method, query parameters, and body shared by every candidate probe.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn get() -> Self {
        Self { method: Method::GET, query: Vec::new(), body: None }
    }

    pub fn post(body: Value) -> Self {
        Self { method: Method::POST, query: Vec::new(), body: Some(body) }
    }

    pub fn patch(body: Value) -> Self {
        Self { method: Method::PATCH, query: Vec::new(), body: Some(body) }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

impl ApiClient {
    /// Resolve a read operation across candidate paths.
    ///
    /// Probes candidates in order; the first success short-circuits and its
    /// body is normalized into a uniform row sequence. If every candidate
    /// answers 404, the read resolves to an empty sequence.
    ///
    /// # Errors
    ///
    /// Returns the first non-404 error observed; later candidates are never
    /// tried past a real failure.
    #[instrument(skip(self, spec), fields(candidates = candidates.len()))]
    pub async fn resolve_list(
        &self,
        candidates: &[String],
        spec: &RequestSpec,
    ) -> Result<Vec<Value>, ApiError> {
        match self.probe(candidates, spec).await? {
            Some((path, payload)) => {
                let items = normalize_items(payload);
                debug!(path, rows = items.len(), "list resolved");
                Ok(items)
            }
            None => {
                debug!("all candidates answered 404, resolving to empty list");
                Ok(Vec::new())
            }
        }
    }

    /// Resolve a write operation across candidate paths.
    ///
    /// Same probing semantics as [`resolve_list`](Self::resolve_list), except
    /// exhausting every candidate is an error: a write that found no route
    /// must never report success.
    ///
    /// # Errors
    ///
    /// Returns the first non-404 error observed, or `RouteNotFound` when
    /// every candidate answered 404.
    #[instrument(skip(self, spec), fields(candidates = candidates.len()))]
    pub async fn resolve_write(
        &self,
        candidates: &[String],
        spec: &RequestSpec,
    ) -> Result<Value, ApiError> {
        match self.probe(candidates, spec).await? {
            Some((path, payload)) => {
                debug!(path, "write resolved");
                Ok(payload)
            }
            None => Err(ApiError::RouteNotFound {
                path: candidates.last().cloned().unwrap_or_default(),
            }),
        }
    }

    /// Sequential probe loop shared by reads and writes.
    ///
    /// `Ok(None)` means every candidate answered 404. Each candidate is
    /// tried exactly once, in order, awaited to completion before the next.
    async fn probe(
        &self,
        candidates: &[String],
        spec: &RequestSpec,
    ) -> Result<Option<(String, Value)>, ApiError> {
        for path in candidates {
            match self
                .send(spec.method.clone(), path, &spec.query, spec.body.as_ref())
                .await
            {
                Ok(payload) => return Ok(Some((path.clone(), payload))),
                Err(err) if err.is_route_not_found() => {
                    debug!(path, "candidate not present, trying next");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(None)
    }
}

/// Normalize a heterogeneous response body into a uniform row sequence.
///
/// Pure function over the body: an array is returned verbatim; an object
/// carrying an `items` or `devices` array yields that array; anything else
/// yields an empty sequence, so callers never branch on backend envelope
/// convention.
pub fn normalize_items(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for key in ["items", "devices"] {
                if let Some(Value::Array(items)) = map.remove(key) {
                    return items;
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}
