//! Network seams for the dish dashboard
//!
//! The sync controller only talks to the dish service through these traits,
//! so the HTTP/WebSocket adapters can be swapped for in-memory doubles.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::{Dish, DishId};

/// REST side of the dish service
#[async_trait]
pub trait DishApi: Send + Sync {
    /// Fetch the full dish collection
    async fn fetch_all(&self) -> Result<Vec<Dish>>;

    /// Ask the service to flip the published flag of a dish.
    ///
    /// The returned body is informational only.
    async fn toggle_status(&self, id: &DishId) -> Result<Value>;
}

/// Opens push-channel connections
#[async_trait]
pub trait PushConnector: Send + Sync {
    /// Establish a new connection. An error here counts as an error
    /// immediately followed by a close.
    async fn connect(&self) -> Result<Box<dyn PushChannel>>;
}

/// One live push-channel connection
#[async_trait]
pub trait PushChannel: Send {
    /// Next inbound text frame.
    ///
    /// `None` means the channel is closed. An `Err` is a transport error and
    /// must be followed by `None` on the next call.
    async fn next_frame(&mut self) -> Option<Result<String>>;

    /// Close the connection from our side
    async fn close(&mut self);
}
