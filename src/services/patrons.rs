//! Patron registry and authentication

use std::fmt;

use crate::{
    error::{AppError, AppResult},
    models::patron::{Credential, Patron},
};

/// Decides whether a presented secret matches the stored one.
///
/// The registry only ever compares credentials through this trait, so a
/// hashing scheme can be swapped in without touching the callers.
pub trait CredentialCheck: Send + Sync {
    fn matches(&self, stored: &Credential, presented: &str) -> bool;
}

/// Exact byte-for-byte comparison of clear-text secrets. No hashing, no lockout.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextCheck;

impl CredentialCheck for PlainTextCheck {
    fn matches(&self, stored: &Credential, presented: &str) -> bool {
        stored.expose() == presented
    }
}

/// Owns every patron identity
pub struct PatronRegistry {
    patrons: Vec<Patron>,
    check: Box<dyn CredentialCheck>,
}

impl Default for PatronRegistry {
    fn default() -> Self {
        Self::new(Box::new(PlainTextCheck))
    }
}

impl fmt::Debug for PatronRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatronRegistry")
            .field("patrons", &self.patrons)
            .finish_non_exhaustive()
    }
}

impl PatronRegistry {
    pub fn new(check: Box<dyn CredentialCheck>) -> Self {
        Self {
            patrons: Vec::new(),
            check,
        }
    }

    /// Register a new patron with the next sequential id.
    /// Usernames are compared case-sensitively.
    pub fn register(&mut self, username: &str, credential: Credential) -> AppResult<&Patron> {
        if self.patrons.iter().any(|p| p.username == username) {
            return Err(AppError::DuplicateUsername);
        }

        let id = self.next_id()?;
        self.patrons.push(Patron::new(id, username, credential));
        Ok(&self.patrons[self.patrons.len() - 1])
    }

    /// Count plus one, unless stored ids have gaps and that id is taken
    fn next_id(&self) -> AppResult<i32> {
        let count = i32::try_from(self.patrons.len())
            .map_err(|_| AppError::Internal("Patron registry is full".to_string()))?;
        let candidate = count + 1;
        if self.patrons.iter().all(|p| p.id != candidate) {
            return Ok(candidate);
        }

        let max = self.patrons.iter().map(|p| p.id).max().unwrap_or(0);
        max.checked_add(1)
            .ok_or_else(|| AppError::Internal("Patron ids exhausted".to_string()))
    }

    /// Insert a patron loaded from storage, keeping its id and loans
    pub fn insert(&mut self, patron: Patron) -> AppResult<()> {
        if self.patrons.iter().any(|p| p.username == patron.username || p.id == patron.id) {
            return Err(AppError::Conflict(format!(
                "Patron {} already registered",
                patron
            )));
        }
        self.patrons.push(patron);
        Ok(())
    }

    pub fn find_by_username(&self, username: &str) -> AppResult<&Patron> {
        self.patrons
            .iter()
            .find(|p| p.username == username)
            .ok_or_else(|| AppError::NotFound(format!("Patron {} not found", username)))
    }

    pub fn find_by_id(&self, id: i32) -> AppResult<&Patron> {
        self.patrons
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Patron with id {} not found", id)))
    }

    pub fn find_by_id_mut(&mut self, id: i32) -> AppResult<&mut Patron> {
        self.patrons
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Patron with id {} not found", id)))
    }

    /// Both username and credential must match exactly.
    /// An unknown username fails the same way as a wrong credential.
    pub fn authenticate(&self, username: &str, credential: &str) -> AppResult<&Patron> {
        self.patrons
            .iter()
            .find(|p| p.username == username)
            .filter(|p| self.check.matches(&p.credential, credential))
            .ok_or(AppError::AuthenticationFailed)
    }

    pub fn len(&self) -> usize {
        self.patrons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patrons.is_empty()
    }
}
