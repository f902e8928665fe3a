//! # Fleetwatch Domain
//!
//! Business domain types and models for Fleetwatch.
//!
//! This crate contains:
//! - Domain data types (StatusReport, Device, Trip, session types)
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other Fleetwatch crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
