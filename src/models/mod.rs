//! Data models for the lending desk

pub mod item;
pub mod loan;
pub mod patron;

// Re-export commonly used types
pub use item::{CatalogEntry, Item};
pub use loan::{Loan, LoanSummary};
pub use patron::{Credential, Patron, PatronShort};
