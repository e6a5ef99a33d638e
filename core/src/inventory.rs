//! Player-owned items. Order is kept for display only.

use crate::{item::Item, types::Cash};

#[derive(Debug, Clone, Default)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Item> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Empty the inventory, handing back everything it held.
    pub fn take_all(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.items)
    }

    /// Replace everything (used by load).
    pub fn replace_all(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    /// Position of the first watch, if any.
    pub fn first_watch_index(&self) -> Option<usize> {
        self.items.iter().position(Item::is_watch)
    }

    /// Insert `parts` at `index`, shifting later items right.
    pub fn splice_in(&mut self, index: usize, parts: Vec<Item>) {
        let at = index.min(self.items.len());
        self.items.splice(at..at, parts);
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of current asks.
    pub fn book_value(&self) -> Cash {
        self.items.iter().map(|i| i.ask_price).fold(0, Cash::saturating_add)
    }

    /// Sum of what was paid.
    pub fn cost_basis(&self) -> Cash {
        self.items.iter().map(|i| i.acquisition_cost).fold(0, Cash::saturating_add)
    }
}
