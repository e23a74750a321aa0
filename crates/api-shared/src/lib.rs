//! # API Shared
//!
//! Shared definitions for the SIDIA APIs.
//!
//! Contains:
//! - Request/response bodies (`dto` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and by clients that want typed bodies.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
