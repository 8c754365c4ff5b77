//! Dish store and sync controller
//!
//! Keeps the dashboard's dish snapshot in step with the dish service:
//! - one bulk fetch on start
//! - a supervised push channel that replaces the snapshot on every
//!   `UPDATE_DISHES` event and reconnects after a fixed delay when it closes
//! - optimistic local toggles forwarded to the service
//!
//! The network is reached through the `dish_core` traits; `http` and `ws`
//! hold the real adapters.

pub mod connection;
pub mod controller;
pub mod http;
pub mod store;
pub mod ws;

pub use connection::{ConnectionState, ShutdownToken};
pub use controller::{SyncConfig, SyncController, ToggleOutcome};
pub use http::HttpDishApi;
pub use store::DishStore;
pub use ws::WsPushConnector;
