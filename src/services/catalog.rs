//! Catalog inventory

use crate::{
    error::{AppError, AppResult},
    models::item::Item,
};

/// Owns every lendable item and its shelf count, in insertion order
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item. Ids must be unique, so a lookup never has to pick between matches.
    pub fn add(&mut self, item: Item) -> AppResult<()> {
        if self.items.iter().any(|i| i.id == item.id) {
            return Err(AppError::Conflict(format!(
                "Item with id {} already exists",
                item.id
            )));
        }
        if item.available < 0 || item.available > item.total_copies {
            return Err(AppError::Validation(format!(
                "Item {} has {} of {} copies available",
                item.id, item.available, item.total_copies
            )));
        }
        self.items.push(item);
        Ok(())
    }

    pub fn find_by_id(&self, id: i32) -> AppResult<&Item> {
        self.items
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    fn find_by_id_mut(&mut self, id: i32) -> AppResult<&mut Item> {
        self.items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    pub fn list(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Take one copy off the shelf
    pub fn decrement_availability(&mut self, id: i32) -> AppResult<&Item> {
        let item = self.find_by_id_mut(id)?;
        if item.available <= 0 {
            return Err(AppError::Unavailable(item.title.clone()));
        }
        item.available -= 1;
        Ok(item)
    }

    /// Put one copy back on the shelf.
    ///
    /// Only the return path calls this, after it has matched a loan, so a
    /// full shelf here means the books are out of balance.
    pub fn increment_availability(&mut self, id: i32) -> AppResult<&Item> {
        let item = self.find_by_id_mut(id)?;
        if item.available >= item.total_copies {
            return Err(AppError::Internal(format!(
                "Item {} already has all {} copies on the shelf",
                item.id, item.total_copies
            )));
        }
        item.available += 1;
        Ok(item)
    }
}

impl FromIterator<Item> for Catalog {
    /// Later duplicates of an id are dropped
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        let mut catalog = Catalog::new();
        for item in iter {
            if let Err(e) = catalog.add(item) {
                tracing::warn!("Skipping catalog entry: {}", e);
            }
        }
        catalog
    }
}
