//! Business logic services

pub mod catalog;
pub mod loans;
pub mod patrons;
pub mod session;

use crate::{config::AppConfig, error::AppResult, repository::SharedStore};

/// The desk's working state: what is on the shelves and who may borrow it
#[derive(Debug, Default)]
pub struct Library {
    pub catalog: catalog::Catalog,
    pub patrons: patrons::PatronRegistry,
}

/// Container for all services
pub struct Services {
    pub session: session::SessionController,
}

impl Services {
    /// Create all services, loading the library from the given store
    pub async fn new(store: SharedStore, config: &AppConfig) -> AppResult<Self> {
        let session = session::SessionController::bootstrap(
            store,
            config.auth.clone(),
            config.loans.clone(),
        )
        .await?;

        Ok(Self { session })
    }
}
