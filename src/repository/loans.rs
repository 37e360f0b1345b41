//! Borrowed books table

use sqlx::{FromRow, Pool, Postgres};

use crate::{error::AppResult, models::loan::Loan};

#[derive(FromRow)]
pub struct BorrowedRow {
    pub user_id: i32,
    pub book_id: i32,
    pub return_date: String,
}

const INSERT_LOAN: &str =
    "INSERT INTO borrowed_books (user_id, book_id, return_date) VALUES ($1, $2, $3)";

/// Rows carry no key of their own, so the physical row id picks exactly one
const DELETE_ONE_LOAN: &str = r#"
    DELETE FROM borrowed_books
    WHERE ctid = (
        SELECT ctid FROM borrowed_books
        WHERE user_id = $1 AND book_id = $2 AND return_date = $3
        LIMIT 1
    )
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn load_all(&self) -> AppResult<Vec<BorrowedRow>> {
        let rows = sqlx::query_as::<_, BorrowedRow>(
            "SELECT user_id, book_id, return_date FROM borrowed_books ORDER BY user_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn create(&self, patron_id: i32, loan: &Loan) -> AppResult<()> {
        sqlx::query(INSERT_LOAN)
            .bind(patron_id)
            .bind(loan.item_id)
            .bind(&loan.due_label)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Removes one matching row even when the patron holds several identical loans
    pub async fn delete_one(&self, patron_id: i32, loan: &Loan) -> AppResult<()> {
        sqlx::query(DELETE_ONE_LOAN)
            .bind(patron_id)
            .bind(loan.item_id)
            .bind(&loan.due_label)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
