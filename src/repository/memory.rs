//! In-memory store, used when no database is configured and in tests

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::LibraryStore;
use crate::{
    error::AppResult,
    models::{item::Item, loan::Loan, patron::Patron},
};

#[derive(Default)]
struct Tables {
    items: Vec<Item>,
    patrons: Vec<Patron>,
    loans: Vec<(i32, Loan)>,
}

/// Keeps records for the lifetime of the process only
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored loan rows
    pub async fn loan_count(&self) -> usize {
        self.tables.read().await.loans.len()
    }
}

#[async_trait]
impl LibraryStore for MemoryStore {
    async fn load_items(&self) -> AppResult<Vec<Item>> {
        Ok(self.tables.read().await.items.clone())
    }

    async fn save_item(&self, item: &Item) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        match tables.items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => tables.items.push(item.clone()),
        }
        Ok(())
    }

    async fn load_patrons(&self) -> AppResult<Vec<Patron>> {
        let tables = self.tables.read().await;
        let patrons = tables
            .patrons
            .iter()
            .map(|stored| {
                let mut patron = stored.clone();
                patron.active_loans = tables
                    .loans
                    .iter()
                    .filter(|(owner, _)| *owner == patron.id)
                    .map(|(_, loan)| loan.clone())
                    .collect();
                patron
            })
            .collect();
        Ok(patrons)
    }

    async fn save_patron(&self, patron: &Patron) -> AppResult<()> {
        let mut record = patron.clone();
        record.active_loans.clear();

        let mut tables = self.tables.write().await;
        match tables.patrons.iter_mut().find(|p| p.id == patron.id) {
            Some(existing) => *existing = record,
            None => tables.patrons.push(record),
        }
        Ok(())
    }

    async fn save_loan(&self, patron_id: i32, loan: &Loan) -> AppResult<()> {
        self.tables.write().await.loans.push((patron_id, loan.clone()));
        Ok(())
    }

    async fn delete_loan(&self, patron_id: i32, loan: &Loan) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(pos) = tables
            .loans
            .iter()
            .position(|(owner, l)| *owner == patron_id && l == loan)
        {
            tables.loans.remove(pos);
        }
        Ok(())
    }
}
