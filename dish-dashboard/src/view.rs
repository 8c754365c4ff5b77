//! Dashboard view model
//!
//! Pure mapping from `DashboardState` to what gets drawn. Holds no state of
//! its own; rebuilt on every change.

use dish_core::{DashboardState, Dish, DishId};

/// Page heading
pub const TITLE: &str = "Dish List";

pub const PUBLISHED: &str = "Published";
pub const NOT_PUBLISHED: &str = "Not Published";
pub const PUBLISH: &str = "Publish";
pub const UNPUBLISH: &str = "Unpublish";

/// Button emphasis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonColor {
    Primary,
    Secondary,
}

impl std::fmt::Display for ButtonColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ButtonColor::Primary => write!(f, "primary"),
            ButtonColor::Secondary => write!(f, "secondary"),
        }
    }
}

/// The toggle button on a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleAction {
    /// Identifier forwarded to the controller when invoked
    pub dish_id: DishId,
    pub label: &'static str,
    pub color: ButtonColor,
}

/// One rendered dish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishCard {
    pub dish_id: DishId,
    pub name: String,
    pub image_url: String,
    pub image_alt: String,
    pub status_label: &'static str,
    pub action: ToggleAction,
}

impl DishCard {
    pub fn from_dish(dish: &Dish) -> Self {
        let (status_label, label, color) = if dish.is_published {
            (PUBLISHED, UNPUBLISH, ButtonColor::Secondary)
        } else {
            (NOT_PUBLISHED, PUBLISH, ButtonColor::Primary)
        };

        Self {
            dish_id: dish.dish_id.clone(),
            name: dish.dish_name.clone(),
            image_url: dish.image_url.clone(),
            image_alt: dish.dish_name.clone(),
            status_label,
            action: ToggleAction {
                dish_id: dish.dish_id.clone(),
                label,
                color,
            },
        }
    }
}

/// Everything on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardView {
    /// Initial fetch still outstanding
    Loading,
    /// One card per dish, in snapshot order
    Loaded { cards: Vec<DishCard> },
}

impl DashboardView {
    pub fn from_state(state: &DashboardState) -> Self {
        if state.loading {
            return DashboardView::Loading;
        }
        DashboardView::Loaded {
            cards: state.dishes.iter().map(DishCard::from_dish).collect(),
        }
    }
}
