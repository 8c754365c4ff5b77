//! Core types and utilities for the dish dashboard
//!
//! # Modules
//!
//! - `config`: Environment file loading and endpoint configuration
//! - `error`: Error types and Result alias
//! - `traits`: Network seams used by the sync controller
//! - `types`: Dish records and push-channel envelopes

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

// Re-exports
pub use config::DashboardConfig;
pub use error::{Error, Result};
pub use traits::{DishApi, PushChannel, PushConnector};
pub use types::*;
