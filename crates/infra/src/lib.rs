//! # Fleetwatch Infrastructure
//!
//! HTTP transport and API client for the Fleetwatch backend.
//!
//! This crate contains:
//! - The HTTP transport (`http`) — a thin reqwest wrapper, no retries
//! - The API layer (`api`) — session handling, endpoint resolution with
//!   ordered fallback across candidate routes, and typed fleet operations
//!
//! ## Architecture
//! - Depends on `fleetwatch-domain` for wire types and the domain error
//! - Contains all "impure" code (network I/O)

pub mod api;
pub mod http;

// Re-export commonly used items
pub use api::{
    normalize_items, AccessTokenProvider, ApiClient, ApiClientConfig, ApiError, ApiErrorCategory,
    FleetCommands, RequestSpec, Session, SessionService, SubmitStatusReport, UpdateStatusReport,
};
pub use http::{HttpClient, HttpClientBuilder};
