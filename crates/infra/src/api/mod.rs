//! API client for the Fleetwatch backend
//!
//! This module provides the HTTP-based client the admin and driver views
//! consume. It handles session state, endpoint resolution across candidate
//! route paths, and the typed fleet operations.
//!
//! # Architecture
//!
//! - Uses the crate's `HttpClient` (no direct reqwest at call sites)
//! - Explicit session object, created at login, cleared at logout or on 401
//! - Ordered-fallback endpoint resolution masking backend route drift
//! - Typed commands for devices, status reports, and trips

pub mod client;
pub mod errors;
pub mod fleet;
pub mod resolver;
pub mod session;

pub use client::{ApiClient, ApiClientConfig};
pub use errors::{ApiError, ApiErrorCategory};
pub use fleet::{FleetCommands, SubmitStatusReport, UpdateStatusReport};
pub use resolver::{normalize_items, RequestSpec};
pub use session::{AccessTokenProvider, Session, SessionService};
