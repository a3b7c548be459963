use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row};

use super::{format_timestamp, map_write_error, parse_timestamp, DbConnection};
use crate::domain::models::user::User;
use crate::storage::traits::UserStorage;

/// Repository for registered users and their session tokens
#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_user(row: &SqliteRow) -> Result<User> {
        Ok(User {
            id: row.get("id"),
            national_id: row.get("national_id"),
            full_name: row.get("full_name"),
            email: row.get("email"),
            created_at: parse_timestamp(row.get("created_at"))?,
        })
    }

    async fn find_user_where(&self, column: &str, value: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT id, national_id, full_name, email, created_at FROM users WHERE {} = ?",
            column
        ))
        .bind(value)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn store_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, national_id, full_name, email, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.national_id)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(format_timestamp(user.created_at))
        .execute(self.db.pool())
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.find_user_where("id", user_id).await
    }

    async fn find_user_by_national_id(&self, national_id: &str) -> Result<Option<User>> {
        self.find_user_where("national_id", national_id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_user_where("email", email).await
    }

    async fn store_session(&self, token: &str, user_id: &str) -> Result<()> {
        sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(token)
            .bind(user_id)
            .bind(format_timestamp(Utc::now()))
            .execute(self.db.pool())
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn find_session_user(&self, token: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT user_id FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.map(|r| r.get("user_id")))
    }
}
