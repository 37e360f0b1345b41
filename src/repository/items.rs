//! Books table

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::item::Item,
};

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Load every book. `quantity` holds the shelf count, so the stocked
    /// count is rebuilt by adding the copies currently out on loan.
    pub async fn load_all(&self) -> AppResult<Vec<Item>> {
        let rows = sqlx::query(
            r#"
            SELECT b.book_id, b.title, b.author, b.quantity,
                   COALESCE((
                       SELECT COUNT(*) FROM borrowed_books bb WHERE bb.book_id = b.book_id
                   ), 0) AS on_loan
            FROM books b
            ORDER BY b.book_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                item_from_row(
                    row.get("book_id"),
                    row.get("title"),
                    row.get("author"),
                    row.get("quantity"),
                    row.get("on_loan"),
                )
            })
            .collect()
    }

    pub async fn save(&self, item: &Item) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO books (book_id, title, author, quantity)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (book_id) DO UPDATE
            SET title = EXCLUDED.title, author = EXCLUDED.author, quantity = EXCLUDED.quantity
            "#,
        )
        .bind(item.id)
        .bind(&item.title)
        .bind(&item.author)
        .bind(item.available)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Rebuild an item from its shelf count and the number of loan rows against it
fn item_from_row(
    id: i32,
    title: String,
    author: String,
    quantity: i32,
    on_loan: i64,
) -> AppResult<Item> {
    let total_copies = i32::try_from(on_loan)
        .ok()
        .and_then(|on_loan| quantity.checked_add(on_loan))
        .ok_or_else(|| {
            AppError::Internal(format!("Book {} has {} copies on loan", id, on_loan))
        })?;

    Ok(Item {
        id,
        title,
        author,
        total_copies,
        available: quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_is_shelf_plus_loans() {
        let item = item_from_row(3, "Mockingbird".into(), "Harper Lee".into(), 1, 1).unwrap();
        assert_eq!(item.total_copies, 2);
        assert_eq!(item.available, 1);
        assert_eq!(item.on_loan(), 1);
    }

    #[test]
    fn test_nothing_on_loan() {
        let item = item_from_row(1, "Dune".into(), "Frank Herbert".into(), 4, 0).unwrap();
        assert_eq!(item.total_copies, 4);
        assert_eq!(item.on_loan(), 0);
    }

    #[test]
    fn test_loan_count_overflow_is_internal() {
        let err = item_from_row(1, "Dune".into(), "F".into(), 0, i64::from(i32::MAX) + 1);
        assert!(matches!(err, Err(AppError::Internal(_))));

        let err = item_from_row(1, "Dune".into(), "F".into(), i32::MAX, 1);
        assert!(matches!(err, Err(AppError::Internal(_))));
    }
}
