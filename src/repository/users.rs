//! Users table

use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::AppResult,
    models::patron::{Credential, Patron},
};

#[derive(FromRow)]
struct UserRow {
    user_id: i32,
    username: String,
    password: String,
}

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Load every patron, without loans
    pub async fn load_all(&self) -> AppResult<Vec<Patron>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT user_id, username, password FROM users ORDER BY user_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Patron::new(row.user_id, row.username, Credential::new(row.password)))
            .collect())
    }

    pub async fn save(&self, patron: &Patron) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, username, password)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET username = EXCLUDED.username, password = EXCLUDED.password
            "#,
        )
        .bind(patron.id)
        .bind(&patron.username)
        .bind(patron.credential.expose())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
