//! Session controller
//!
//! Every command takes an explicit [`Session`]. The controller serializes all
//! mutations behind one lock on the [`Library`], and saves each mutation through
//! the store before releasing it.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{
    config::{AuthConfig, LoansConfig},
    error::{AppError, AppResult},
    models::{
        item::{seed_items, CatalogEntry},
        loan::{Loan, LoanSummary},
        patron::{seed_patrons, Credential, PatronShort, SessionClaims},
    },
    repository::SharedStore,
    services::{loans, Library},
};

/// Who is acting on a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Authenticated { patron_id: i32, session_id: Uuid },
}

impl Session {
    fn patron_id(&self, action: &'static str) -> AppResult<i32> {
        match self {
            Session::Authenticated { patron_id, .. } => Ok(*patron_id),
            Session::Anonymous => Err(AppError::NotLoggedIn(action)),
        }
    }
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub patron: PatronShort,
}

/// Result of a successful borrow or return
#[derive(Debug, Clone)]
pub struct LoanOutcome {
    pub item: CatalogEntry,
    pub loan: Loan,
}

/// A live session, valid until `expires_at` (unix seconds)
#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    patron_id: i32,
    expires_at: i64,
}

pub struct SessionController {
    library: Mutex<Library>,
    /// Live session ids; expired entries are pruned on every login
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    store: SharedStore,
    auth: AuthConfig,
    loans: LoansConfig,
}

impl SessionController {
    /// Load the library from the store, seeding it when the store is empty
    pub async fn bootstrap(
        store: SharedStore,
        auth: AuthConfig,
        loans: LoansConfig,
    ) -> AppResult<Self> {
        let mut items = store.load_items().await?;
        if items.is_empty() {
            items = seed_items();
            for item in &items {
                store.save_item(item).await?;
            }
            tracing::info!("Seeded catalog with {} items", items.len());
        }

        let mut patrons = store.load_patrons().await?;
        if patrons.is_empty() {
            patrons = seed_patrons();
            for patron in &patrons {
                store.save_patron(patron).await?;
            }
            tracing::info!("Seeded registry with {} patrons", patrons.len());
        }

        let mut library = Library::default();
        for item in items {
            library.catalog.add(item)?;
        }
        for patron in patrons {
            library.patrons.insert(patron)?;
        }

        tracing::info!(
            "Library loaded: {} items, {} patrons",
            library.catalog.len(),
            library.patrons.len()
        );

        Ok(Self::new(library, store, auth, loans))
    }

    pub fn new(
        library: Library,
        store: SharedStore,
        auth: AuthConfig,
        loans: LoansConfig,
    ) -> Self {
        Self {
            library: Mutex::new(library),
            sessions: RwLock::new(HashMap::new()),
            store,
            auth,
            loans,
        }
    }

    /// Authenticate and open a new session
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginOutcome> {
        let library = self.library.lock().await;
        let patron = match library.patrons.authenticate(username, password) {
            Ok(patron) => patron,
            Err(e) => {
                tracing::info!("Failed login for {}", username);
                return Err(e);
            }
        };

        let session_id = Uuid::new_v4();
        let claims = SessionClaims::new(patron, session_id, self.auth.session_hours);
        let token = claims
            .create_token(&self.auth.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        let mut sessions = self.sessions.write().await;
        let now = Utc::now().timestamp();
        sessions.retain(|_, entry| entry.expires_at > now);
        sessions.insert(
            session_id,
            SessionEntry {
                patron_id: patron.id,
                expires_at: claims.exp,
            },
        );
        tracing::info!("Patron {} logged in", patron);

        Ok(LoginOutcome {
            token,
            patron: PatronShort::from(patron),
        })
    }

    /// Turn a bearer token into a session. Anything that does not name a live
    /// session, including a logged-out one, is anonymous.
    pub async fn resolve(&self, token: Option<&str>) -> Session {
        let Some(token) = token else {
            return Session::Anonymous;
        };

        let claims = match SessionClaims::from_token(token, &self.auth.jwt_secret) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Rejected session token: {}", e);
                return Session::Anonymous;
            }
        };

        let now = Utc::now().timestamp();
        match self.sessions.read().await.get(&claims.sid) {
            Some(entry) if entry.patron_id == claims.patron_id && entry.expires_at > now => {
                Session::Authenticated {
                    patron_id: entry.patron_id,
                    session_id: claims.sid,
                }
            }
            _ => Session::Anonymous,
        }
    }

    pub async fn logout(&self, session: &Session) -> AppResult<()> {
        if let Session::Authenticated { patron_id, session_id } = session {
            self.sessions.write().await.remove(session_id);
            tracing::info!("Patron {} logged out", patron_id);
        }
        Ok(())
    }

    /// Register a new patron. Does not open a session.
    pub async fn register(&self, username: &str, password: &str) -> AppResult<PatronShort> {
        let mut library = self.library.lock().await;
        let patron = library.patrons.register(username, Credential::new(password))?;
        tracing::info!("Registered patron {}", patron);

        if let Err(e) = self.store.save_patron(patron).await {
            tracing::error!("Failed to save patron {}: {}", patron, e);
        }

        Ok(PatronShort::from(patron))
    }

    pub async fn list_catalog(&self) -> Vec<CatalogEntry> {
        let library = self.library.lock().await;
        library.catalog.list().map(CatalogEntry::from).collect()
    }

    pub async fn catalog_len(&self) -> usize {
        self.library.lock().await.catalog.len()
    }

    pub async fn get_item(&self, item_id: i32) -> AppResult<CatalogEntry> {
        let library = self.library.lock().await;
        library.catalog.find_by_id(item_id).map(CatalogEntry::from)
    }

    pub async fn borrow(
        &self,
        session: &Session,
        item_id: Option<i32>,
        due_label: Option<String>,
    ) -> AppResult<LoanOutcome> {
        let patron_id = session.patron_id("borrow books")?;
        let item_id = item_id.ok_or(AppError::NoSelection("borrow"))?;
        let due_label = due_label.unwrap_or_else(|| self.loans.default_due_label.clone());

        let mut guard = self.library.lock().await;
        let library = &mut *guard;
        let patron = library.patrons.find_by_id_mut(patron_id)?;
        let loan = loans::borrow(patron, &mut library.catalog, item_id, &due_label)?;
        let item = library.catalog.find_by_id(item_id)?;

        tracing::info!(
            "Patron {} borrowed item {} ({} left)",
            patron_id,
            item_id,
            item.available
        );

        if let Err(e) = self.store.save_item(item).await {
            tracing::error!("Failed to save item {}: {}", item_id, e);
        }
        if let Err(e) = self.store.save_loan(patron_id, &loan).await {
            tracing::error!("Failed to save loan of item {} to {}: {}", item_id, patron_id, e);
        }

        Ok(LoanOutcome {
            item: CatalogEntry::from(item),
            loan,
        })
    }

    pub async fn return_item(
        &self,
        session: &Session,
        item_id: Option<i32>,
    ) -> AppResult<LoanOutcome> {
        let patron_id = session.patron_id("return books")?;
        let item_id = item_id.ok_or(AppError::NoSelection("return"))?;

        let mut guard = self.library.lock().await;
        let library = &mut *guard;
        let patron = library.patrons.find_by_id_mut(patron_id)?;
        let loan = loans::return_item(patron, &mut library.catalog, item_id)?;
        let item = library.catalog.find_by_id(item_id)?;

        tracing::info!(
            "Patron {} returned item {} ({} left)",
            patron_id,
            item_id,
            item.available
        );

        if let Err(e) = self.store.save_item(item).await {
            tracing::error!("Failed to save item {}: {}", item_id, e);
        }
        if let Err(e) = self.store.delete_loan(patron_id, &loan).await {
            tracing::error!("Failed to delete loan of item {} to {}: {}", item_id, patron_id, e);
        }

        Ok(LoanOutcome {
            item: CatalogEntry::from(item),
            loan,
        })
    }

    pub async fn list_loans(&self, session: &Session) -> AppResult<Vec<LoanSummary>> {
        let patron_id = session.patron_id("view borrowed books")?;

        let library = self.library.lock().await;
        let patron = library.patrons.find_by_id(patron_id)?;
        Ok(loans::list_loans(patron, &library.catalog).collect())
    }
}
