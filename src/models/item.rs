//! Item (catalog entry) model and related types

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// A lendable title held by the catalog.
///
/// `available` is the number of copies currently on the shelf; it never drops
/// below zero and never exceeds `total_copies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub total_copies: i32,
    pub available: i32,
}

impl Item {
    /// A fully stocked item with every copy on the shelf
    pub fn new(id: i32, title: impl Into<String>, author: impl Into<String>, copies: i32) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            total_copies: copies,
            available: copies,
        }
    }

    /// Number of copies currently out on loan
    pub fn on_loan(&self) -> i32 {
        self.total_copies - self.available
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | Available: {}",
            self.id, self.title, self.author, self.available
        )
    }
}

/// Catalog row as shown in the catalog view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CatalogEntry {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub available: i32,
}

impl From<&Item> for CatalogEntry {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            author: item.author.clone(),
            available: item.available,
        }
    }
}

/// The titles every fresh desk starts with
pub fn seed_items() -> Vec<Item> {
    vec![
        Item::new(1, "The Great Gatsby", "F. Scott Fitzgerald", 5),
        Item::new(2, "1984", "George Orwell", 3),
        Item::new(3, "To Kill a Mockingbird", "Harper Lee", 2),
        Item::new(4, "Moby Dick", "Herman Melville", 4),
        Item::new(5, "Pride and Prejudice", "Jane Austen", 6),
        Item::new(6, "The Catcher in the Rye", "J.D. Salinger", 3),
        Item::new(7, "The Hobbit", "J.R.R. Tolkien", 5),
        Item::new(8, "Fahrenheit 451", "Ray Bradbury", 2),
        Item::new(9, "Brave New World", "Aldous Huxley", 4),
        Item::new(10, "The Lord of the Rings", "J.R.R. Tolkien", 1),
    ]
}
