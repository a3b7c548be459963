use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use super::{BirdRepository, CageRepository, NestRepository, UserRepository};
use crate::storage::traits::Connection;

/// DbConnection owns the SQLite pool and hands out repositories
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if missing) the database at `url` and apply the schema
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database url: {}", url))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database {}", url))?;

        Self::setup_schema(&pool).await?;
        info!("Database ready at {}", url);

        Ok(Self { pool: Arc::new(pool) })
    }

    /// A private in-memory database, used by tests.
    ///
    /// A single pooled connection that never expires keeps the data alive for
    /// the lifetime of the connection object.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;
        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                national_id TEXT NOT NULL UNIQUE,
                full_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                token TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Owners and sellers are identities from the session provider, so they
        // carry no foreign key. Parents may be deleted; the link is then cleared.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS birds (
                id TEXT PRIMARY KEY,
                identifier TEXT NOT NULL UNIQUE,
                species TEXT NOT NULL,
                gender TEXT NOT NULL,
                birth_date TEXT NOT NULL,
                status TEXT NOT NULL,
                ring TEXT,
                details TEXT,
                sold INTEGER NOT NULL DEFAULT 0,
                for_sale INTEGER NOT NULL DEFAULT 0,
                asking_price REAL,
                sold_date TEXT,
                sold_price REAL,
                buyer_national_id TEXT,
                buyer_full_name TEXT,
                buyer_phone TEXT,
                owner_id TEXT NOT NULL,
                seller_id TEXT,
                mother_id TEXT REFERENCES birds(id) ON DELETE SET NULL,
                father_id TEXT REFERENCES birds(id) ON DELETE SET NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                CHECK (NOT (sold = 1 AND for_sale = 1))
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cages (
                id TEXT PRIMARY KEY,
                cage_number TEXT NOT NULL UNIQUE,
                male_id TEXT NOT NULL REFERENCES birds(id) ON DELETE RESTRICT,
                female_id TEXT NOT NULL REFERENCES birds(id) ON DELETE RESTRICT,
                species TEXT NOT NULL,
                status TEXT NOT NULL,
                notes TEXT,
                owner_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                CHECK (male_id <> female_id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS nests (
                id TEXT PRIMARY KEY,
                cage_id TEXT NOT NULL REFERENCES cages(id) ON DELETE RESTRICT,
                cage_number TEXT NOT NULL,
                number_of_eggs INTEGER NOT NULL CHECK (number_of_eggs >= 0),
                fertilized_eggs INTEGER NOT NULL CHECK (fertilized_eggs >= 0),
                extracted_eggs INTEGER NOT NULL CHECK (extracted_eggs >= 0),
                birds_exited INTEGER NOT NULL DEFAULT 0 CHECK (birds_exited >= 0),
                exclusion_date TEXT NOT NULL,
                first_bird_exit_date TEXT,
                status TEXT NOT NULL,
                notes TEXT,
                owner_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        for statement in [
            "CREATE INDEX IF NOT EXISTS idx_birds_owner ON birds(owner_id);",
            "CREATE INDEX IF NOT EXISTS idx_birds_seller ON birds(seller_id);",
            "CREATE INDEX IF NOT EXISTS idx_cages_owner ON cages(owner_id);",
            "CREATE INDEX IF NOT EXISTS idx_nests_owner ON nests(owner_id);",
            "CREATE INDEX IF NOT EXISTS idx_nests_cage ON nests(cage_id);",
        ] {
            sqlx::query(statement).execute(pool).await?;
        }

        Ok(())
    }
}

impl Connection for DbConnection {
    type BirdRepository = BirdRepository;
    type CageRepository = CageRepository;
    type NestRepository = NestRepository;
    type UserRepository = UserRepository;

    fn create_bird_repository(&self) -> Self::BirdRepository {
        BirdRepository::new(self.clone())
    }

    fn create_cage_repository(&self) -> Self::CageRepository {
        CageRepository::new(self.clone())
    }

    fn create_nest_repository(&self) -> Self::NestRepository {
        NestRepository::new(self.clone())
    }

    fn create_user_repository(&self) -> Self::UserRepository {
        UserRepository::new(self.clone())
    }
}
