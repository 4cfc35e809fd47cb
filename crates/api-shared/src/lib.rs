//! # API Shared
//!
//! Shared definitions for the SmartBridge HTTP API.
//!
//! Contains:
//! - request and response types with OpenAPI schemas (`models` module)
//! - shared services like `HealthService`
//!
//! Used by `api-rest` and the workspace's main binary.

pub mod health;
pub mod models;

pub use health::HealthService;
pub use models::*;
