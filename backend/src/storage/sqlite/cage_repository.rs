use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use super::{format_timestamp, map_write_error, parse_timestamp, DbConnection};
use crate::domain::models::cage::{Cage, CageStatus};
use crate::storage::traits::CageStorage;

const CAGE_COLUMNS: &str =
    "id, cage_number, male_id, female_id, species, status, notes, owner_id, created_at, updated_at";

/// Repository for breeding cages
#[derive(Clone)]
pub struct CageRepository {
    db: DbConnection,
}

impl CageRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_cage(row: &SqliteRow) -> Result<Cage> {
        let status: String = row.get("status");
        Ok(Cage {
            id: row.get("id"),
            cage_number: row.get("cage_number"),
            male_id: row.get("male_id"),
            female_id: row.get("female_id"),
            species: row.get("species"),
            status: CageStatus::parse(&status)
                .map_err(|_| anyhow::anyhow!("Corrupt cage status in database: {}", status))?,
            notes: row.get("notes"),
            owner_id: row.get("owner_id"),
            created_at: parse_timestamp(row.get("created_at"))?,
            updated_at: parse_timestamp(row.get("updated_at"))?,
        })
    }
}

#[async_trait]
impl CageStorage for CageRepository {
    async fn store_cage(&self, cage: &Cage) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO cages ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            CAGE_COLUMNS
        ))
        .bind(&cage.id)
        .bind(&cage.cage_number)
        .bind(&cage.male_id)
        .bind(&cage.female_id)
        .bind(&cage.species)
        .bind(cage.status.as_str())
        .bind(&cage.notes)
        .bind(&cage.owner_id)
        .bind(format_timestamp(cage.created_at))
        .bind(format_timestamp(cage.updated_at))
        .execute(self.db.pool())
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn get_cage(&self, cage_id: &str) -> Result<Option<Cage>> {
        let row = sqlx::query(&format!("SELECT {} FROM cages WHERE id = ?", CAGE_COLUMNS))
            .bind(cage_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_cage).transpose()
    }

    async fn find_cage_by_number(&self, cage_number: &str) -> Result<Option<Cage>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM cages WHERE cage_number = ?",
            CAGE_COLUMNS
        ))
        .bind(cage_number)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_cage).transpose()
    }

    async fn find_owned_cage_by_number(&self, cage_number: &str, owner_id: &str) -> Result<Option<Cage>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM cages WHERE cage_number = ? AND owner_id = ?",
            CAGE_COLUMNS
        ))
        .bind(cage_number)
        .bind(owner_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_cage).transpose()
    }

    async fn update_cage(&self, cage: &Cage) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE cages
            SET cage_number = ?, male_id = ?, female_id = ?, species = ?, status = ?,
                notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&cage.cage_number)
        .bind(&cage.male_id)
        .bind(&cage.female_id)
        .bind(&cage.species)
        .bind(cage.status.as_str())
        .bind(&cage.notes)
        .bind(format_timestamp(cage.updated_at))
        .bind(&cage.id)
        .execute(self.db.pool())
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn delete_cage(&self, cage_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cages WHERE id = ?")
            .bind(cage_id)
            .execute(self.db.pool())
            .await
            .map_err(map_write_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_cages(&self, owner_id: &str) -> Result<Vec<Cage>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM cages WHERE owner_id = ? ORDER BY ROWID DESC",
            CAGE_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_cage).collect()
    }

    async fn count_cages_for_bird(&self, bird_id: &str) -> Result<u32> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM cages WHERE male_id = ? OR female_id = ?")
            .bind(bird_id)
            .bind(bird_id)
            .fetch_one(self.db.pool())
            .await?;
        Ok(row.get::<i64, _>("n") as u32)
    }
}
