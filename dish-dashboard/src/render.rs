//! Text rendering of the dashboard view

use std::fmt::Write;

use crate::view::{DashboardView, DishCard, TITLE};

/// Render the whole dashboard as text
pub fn render(view: &DashboardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", TITLE);
    let _ = writeln!(out, "{}", "=".repeat(TITLE.len()));

    match view {
        DashboardView::Loading => {
            let _ = writeln!(out, "Loading dishes...");
        }
        DashboardView::Loaded { cards } if cards.is_empty() => {
            let _ = writeln!(out, "No dishes to show.");
        }
        DashboardView::Loaded { cards } => {
            for card in cards {
                render_card(&mut out, card);
            }
        }
    }
    out
}

fn render_card(out: &mut String, card: &DishCard) {
    let _ = writeln!(out);
    let _ = writeln!(out, "[{}] {}", card.dish_id, card.name);
    let _ = writeln!(out, "    image:  {} ({})", card.image_url, card.image_alt);
    let _ = writeln!(out, "    status: {}", card.status_label);
    let _ = writeln!(
        out,
        "    action: [{}] ({}) -> toggle {}",
        card.action.label, card.action.color, card.action.dish_id
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use dish_core::{DashboardState, Dish};

    fn loaded(dishes: Vec<Dish>) -> DashboardView {
        DashboardView::from_state(&DashboardState {
            dishes,
            loading: false,
        })
    }

    #[test]
    fn test_render_loading() {
        let text = render(&DashboardView::Loading);
        assert!(text.starts_with("Dish List\n=========\n"));
        assert!(text.contains("Loading dishes..."));
    }

    #[test]
    fn test_render_soup_card() {
        let text = render(&loaded(vec![Dish::new(1, "Soup", "a", false)]));

        assert!(text.contains("[1] Soup"));
        assert!(text.contains("image:  a (Soup)"));
        assert!(text.contains("status: Not Published"));
        assert!(text.contains("action: [Publish] (primary) -> toggle 1"));
        assert!(!text.contains("Loading"));
    }

    #[test]
    fn test_render_published_card() {
        let text = render(&loaded(vec![Dish::new(2, "Salad", "b", true)]));
        assert!(text.contains("status: Published"));
        assert!(text.contains("action: [Unpublish] (secondary) -> toggle 2"));
    }

    #[test]
    fn test_render_empty() {
        let text = render(&loaded(vec![]));
        assert!(text.contains("No dishes to show."));
    }
}
