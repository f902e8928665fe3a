//! HTTP transport
//!
//! Thin wrapper around `reqwest` used by the API layer. Requests are issued
//! exactly once; retry policy (the candidate-path fallback sequence) lives in
//! the API layer, never here.

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
