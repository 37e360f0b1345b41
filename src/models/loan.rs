//! Loan model and related types

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// One copy of an item held by a patron.
///
/// The item itself stays owned by the catalog; a loan only names it by id.
/// The due label is opaque text, no date arithmetic is done on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub item_id: i32,
    pub due_label: String,
}

/// Loan row as shown in a patron's borrowed list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LoanSummary {
    pub title: String,
    pub due_label: String,
}

impl fmt::Display for LoanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Return by: {})", self.title, self.due_label)
    }
}
