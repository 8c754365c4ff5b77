//! Dish snapshot store
//!
//! Holds the last-known `DashboardState` in a `watch` channel. Every write is
//! a single `send_modify`, so the most recently applied fetch, push or toggle
//! is what observers see.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use dish_core::{DashboardState, Dish, DishId};

/// Shared handle to the dish snapshot
#[derive(Clone)]
pub struct DishStore {
    state: Arc<watch::Sender<DashboardState>>,
}

impl DishStore {
    /// Create an empty store in the loading state
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(DashboardState::new());
        Self { state: Arc::new(tx) }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every change
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    /// Replace the whole dish list.
    ///
    /// Order is kept as received. Duplicate identifiers keep their first
    /// occurrence.
    pub fn replace(&self, dishes: Vec<Dish>) {
        let dishes = dedupe(dishes);
        debug!("Replacing snapshot with {} dishes", dishes.len());
        self.state.send_modify(|state| state.dishes = dishes);
    }

    /// Mark the initial fetch as settled
    pub fn finish_loading(&self) {
        self.state.send_if_modified(|state| {
            let was_loading = state.loading;
            state.loading = false;
            was_loading
        });
    }

    /// Flip the published flag of one dish.
    ///
    /// Returns false when the dish is not in the snapshot.
    pub fn toggle_local(&self, id: &DishId) -> bool {
        self.state.send_if_modified(|state| {
            match state.dishes.iter_mut().find(|d| &d.dish_id == id) {
                Some(dish) => {
                    dish.is_published = !dish.is_published;
                    true
                }
                None => false,
            }
        })
    }
}

impl Default for DishStore {
    fn default() -> Self {
        Self::new()
    }
}

fn dedupe(dishes: Vec<Dish>) -> Vec<Dish> {
    let mut seen = HashSet::with_capacity(dishes.len());
    let before = dishes.len();
    let kept: Vec<Dish> = dishes
        .into_iter()
        .filter(|d| seen.insert(d.dish_id.clone()))
        .collect();

    if kept.len() != before {
        warn!(
            "Dropped {} dishes with duplicate identifiers",
            before - kept.len()
        );
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soup() -> Dish {
        Dish::new(1, "Soup", "a", false)
    }

    fn salad() -> Dish {
        Dish::new(2, "Salad", "b", true)
    }

    #[test]
    fn test_new_store_is_loading_and_empty() {
        let store = DishStore::new();
        let state = store.snapshot();
        assert!(state.loading);
        assert!(state.dishes.is_empty());
    }

    #[test]
    fn test_replace_keeps_order() {
        let store = DishStore::new();
        store.replace(vec![salad(), soup()]);
        assert_eq!(store.snapshot().dishes, vec![salad(), soup()]);

        store.replace(vec![soup()]);
        assert_eq!(store.snapshot().dishes, vec![soup()]);
    }

    #[test]
    fn test_replace_drops_duplicate_ids() {
        let store = DishStore::new();
        let renamed = Dish::new(1, "Stew", "z", true);
        store.replace(vec![soup(), salad(), renamed]);
        assert_eq!(store.snapshot().dishes, vec![soup(), salad()]);
    }

    #[test]
    fn test_toggle_flips_only_target() {
        let store = DishStore::new();
        store.replace(vec![soup(), salad()]);

        assert!(store.toggle_local(&DishId::from(1)));
        let state = store.snapshot();
        assert!(state.dishes[0].is_published);
        assert_eq!(state.dishes[1], salad());

        assert!(store.toggle_local(&DishId::from(1)));
        assert_eq!(store.snapshot().dishes, vec![soup(), salad()]);
    }

    #[test]
    fn test_toggle_unknown_dish() {
        let store = DishStore::new();
        store.replace(vec![soup()]);
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        assert!(!store.toggle_local(&DishId::from(99)));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.snapshot().dishes, vec![soup()]);
    }

    #[test]
    fn test_finish_loading_notifies_once() {
        let store = DishStore::new();
        let mut rx = store.subscribe();

        store.finish_loading();
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().loading);

        store.finish_loading();
        assert!(!rx.has_changed().unwrap());
    }
}
