//! Persistence layer
//!
//! The desk keeps its working state in memory and talks to storage only through
//! [`LibraryStore`]: everything is loaded once at startup, and each successful
//! mutation is saved right after it is applied.

pub mod items;
pub mod loans;
pub mod memory;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{item::Item, loan::Loan, patron::Patron},
};

pub use memory::MemoryStore;

/// Storage collaborator for catalog items, patrons and loans
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryStore: Send + Sync {
    async fn load_items(&self) -> AppResult<Vec<Item>>;

    async fn save_item(&self, item: &Item) -> AppResult<()>;

    /// Patrons with their active loans filled in
    async fn load_patrons(&self) -> AppResult<Vec<Patron>>;

    async fn save_patron(&self, patron: &Patron) -> AppResult<()>;

    async fn save_loan(&self, patron_id: i32, loan: &Loan) -> AppResult<()>;

    /// Remove one loan matching `loan` for the patron
    async fn delete_loan(&self, patron_id: i32, loan: &Loan) -> AppResult<()>;
}

pub type SharedStore = Arc<dyn LibraryStore>;

/// PostgreSQL-backed store holding the connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub items: items::ItemsRepository,
    pub users: users::UsersRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            items: items::ItemsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Hand each borrowed row to its patron, keeping row order within a patron
fn attach_loans(patrons: &mut [Patron], rows: Vec<loans::BorrowedRow>) {
    for row in rows {
        match patrons.iter_mut().find(|p| p.id == row.user_id) {
            Some(patron) => patron.active_loans.push(Loan {
                item_id: row.book_id,
                due_label: row.return_date,
            }),
            None => tracing::warn!(
                "Borrowed book {} refers to unknown user {}",
                row.book_id,
                row.user_id
            ),
        }
    }
}

#[async_trait]
impl LibraryStore for Repository {
    async fn load_items(&self) -> AppResult<Vec<Item>> {
        self.items.load_all().await
    }

    async fn save_item(&self, item: &Item) -> AppResult<()> {
        self.items.save(item).await
    }

    async fn load_patrons(&self) -> AppResult<Vec<Patron>> {
        let mut patrons = self.users.load_all().await?;
        attach_loans(&mut patrons, self.loans.load_all().await?);
        Ok(patrons)
    }

    async fn save_patron(&self, patron: &Patron) -> AppResult<()> {
        self.users.save(patron).await
    }

    async fn save_loan(&self, patron_id: i32, loan: &Loan) -> AppResult<()> {
        self.loans.create(patron_id, loan).await
    }

    async fn delete_loan(&self, patron_id: i32, loan: &Loan) -> AppResult<()> {
        self.loans.delete_one(patron_id, loan).await
    }
}
