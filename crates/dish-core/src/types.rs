//! Dish records and push-channel envelopes

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::{Error, Result};

/// Envelope tag carrying a full replacement of the dish list
pub const UPDATE_DISHES: &str = "UPDATE_DISHES";

/// Dish identifier as assigned by the dish service
///
/// The service may send either numeric or string identifiers; the original
/// form is kept so it round-trips into request paths unchanged. Numbers are
/// held as JSON numbers, so ids outside `i64` or with a fraction still decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DishId {
    Number(Number),
    Text(String),
}

impl DishId {
    /// Parse a typed identifier: numeric when it reads as a JSON number
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<Number>() {
            Ok(n) => DishId::Number(n),
            Err(_) => DishId::Text(raw.to_string()),
        }
    }
}

impl std::fmt::Display for DishId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DishId::Number(n) => write!(f, "{}", n),
            DishId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for DishId {
    fn from(id: i64) -> Self {
        DishId::Number(id.into())
    }
}

impl From<&str> for DishId {
    fn from(id: &str) -> Self {
        DishId::Text(id.to_string())
    }
}

impl From<String> for DishId {
    fn from(id: String) -> Self {
        DishId::Text(id)
    }
}

/// A menu item as served by `GET /dishes/getAll`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub dish_id: DishId,
    pub dish_name: String,
    pub image_url: String,
    pub is_published: bool,
}

impl Dish {
    pub fn new(
        dish_id: impl Into<DishId>,
        dish_name: impl Into<String>,
        image_url: impl Into<String>,
        is_published: bool,
    ) -> Self {
        Self {
            dish_id: dish_id.into(),
            dish_name: dish_name.into(),
            image_url: image_url.into(),
            is_published,
        }
    }
}

/// Raw `{type, data}` envelope received on the push channel
#[derive(Debug, Clone, Deserialize)]
pub struct PushEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

/// Decoded push-channel event
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    /// Full replacement of the dish list
    UpdateDishes(Vec<Dish>),
    /// Any other tag; carried only for diagnostics
    Other(String),
}

impl PushEvent {
    /// Decode a text frame from the push channel.
    ///
    /// Fails when the frame is not a `{type, data}` object or when an
    /// `UPDATE_DISHES` payload is not a list of dishes. Unknown tags are not
    /// errors.
    pub fn decode(frame: &str) -> Result<Self> {
        let envelope: PushEnvelope = serde_json::from_str(frame)?;
        match envelope.kind.as_str() {
            UPDATE_DISHES => {
                let dishes: Vec<Dish> = serde_json::from_value(envelope.data)
                    .map_err(|e| Error::malformed(format!("{} payload: {}", UPDATE_DISHES, e)))?;
                Ok(PushEvent::UpdateDishes(dishes))
            }
            other => Ok(PushEvent::Other(other.to_string())),
        }
    }
}

/// Everything the presentation layer observes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    /// Current snapshot, in the order the service sent it
    pub dishes: Vec<Dish>,
    /// True until the initial fetch has settled
    pub loading: bool,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            dishes: Vec::new(),
            loading: true,
        }
    }

    /// Find a dish by identifier
    pub fn dish(&self, id: &DishId) -> Option<&Dish> {
        self.dishes.iter().find(|d| &d.dish_id == id)
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}
