use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use super::{format_date, format_timestamp, map_write_error, parse_date, parse_timestamp, DbConnection};
use crate::domain::models::nest::{Nest, NestStatus};
use crate::storage::traits::NestStorage;

// The stored cage_number is only a cache; reads prefer the cage's current number.
const NEST_SELECT: &str = r#"
    SELECT n.id, n.cage_id, COALESCE(c.cage_number, n.cage_number) AS cage_number,
           n.number_of_eggs, n.fertilized_eggs, n.extracted_eggs, n.birds_exited,
           n.exclusion_date, n.first_bird_exit_date, n.status, n.notes, n.owner_id,
           n.created_at, n.updated_at
    FROM nests n
    LEFT JOIN cages c ON c.id = n.cage_id
"#;

/// Repository for nests (clutch records)
#[derive(Clone)]
pub struct NestRepository {
    db: DbConnection,
}

impl NestRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_nest(row: &SqliteRow) -> Result<Nest> {
        let status: String = row.get("status");
        let first_exit: Option<String> = row.get("first_bird_exit_date");
        Ok(Nest {
            id: row.get("id"),
            cage_id: row.get("cage_id"),
            cage_number: row.get("cage_number"),
            number_of_eggs: row.get::<i64, _>("number_of_eggs") as u32,
            fertilized_eggs: row.get::<i64, _>("fertilized_eggs") as u32,
            extracted_eggs: row.get::<i64, _>("extracted_eggs") as u32,
            birds_exited: row.get::<i64, _>("birds_exited") as u32,
            exclusion_date: parse_date(row.get("exclusion_date"))?,
            first_bird_exit_date: first_exit.as_deref().map(parse_date).transpose()?,
            status: NestStatus::parse(&status)
                .map_err(|_| anyhow::anyhow!("Corrupt nest status in database: {}", status))?,
            notes: row.get("notes"),
            owner_id: row.get("owner_id"),
            created_at: parse_timestamp(row.get("created_at"))?,
            updated_at: parse_timestamp(row.get("updated_at"))?,
        })
    }
}

#[async_trait]
impl NestStorage for NestRepository {
    async fn store_nest(&self, nest: &Nest) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO nests (
                id, cage_id, cage_number, number_of_eggs, fertilized_eggs, extracted_eggs,
                birds_exited, exclusion_date, first_bird_exit_date, status, notes, owner_id,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&nest.id)
        .bind(&nest.cage_id)
        .bind(&nest.cage_number)
        .bind(nest.number_of_eggs as i64)
        .bind(nest.fertilized_eggs as i64)
        .bind(nest.extracted_eggs as i64)
        .bind(nest.birds_exited as i64)
        .bind(format_date(nest.exclusion_date))
        .bind(nest.first_bird_exit_date.map(format_date))
        .bind(nest.status.as_str())
        .bind(&nest.notes)
        .bind(&nest.owner_id)
        .bind(format_timestamp(nest.created_at))
        .bind(format_timestamp(nest.updated_at))
        .execute(self.db.pool())
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn get_nest(&self, nest_id: &str) -> Result<Option<Nest>> {
        let row = sqlx::query(&format!("{} WHERE n.id = ?", NEST_SELECT))
            .bind(nest_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_nest).transpose()
    }

    async fn update_nest(&self, nest: &Nest) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE nests
            SET cage_id = ?, cage_number = ?, number_of_eggs = ?, fertilized_eggs = ?,
                extracted_eggs = ?, birds_exited = ?, exclusion_date = ?,
                first_bird_exit_date = ?, status = ?, notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&nest.cage_id)
        .bind(&nest.cage_number)
        .bind(nest.number_of_eggs as i64)
        .bind(nest.fertilized_eggs as i64)
        .bind(nest.extracted_eggs as i64)
        .bind(nest.birds_exited as i64)
        .bind(format_date(nest.exclusion_date))
        .bind(nest.first_bird_exit_date.map(format_date))
        .bind(nest.status.as_str())
        .bind(&nest.notes)
        .bind(format_timestamp(nest.updated_at))
        .bind(&nest.id)
        .execute(self.db.pool())
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn delete_nest(&self, nest_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM nests WHERE id = ?")
            .bind(nest_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_nests(&self, owner_id: &str) -> Result<Vec<Nest>> {
        let rows = sqlx::query(&format!(
            "{} WHERE n.owner_id = ? ORDER BY n.ROWID DESC",
            NEST_SELECT
        ))
        .bind(owner_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_nest).collect()
    }

    async fn count_nests_for_cage(&self, cage_id: &str) -> Result<u32> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM nests WHERE cage_id = ?")
            .bind(cage_id)
            .fetch_one(self.db.pool())
            .await?;
        Ok(row.get::<i64, _>("n") as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::bird::{Bird, Gender};
    use crate::domain::models::cage::{Cage, CageStatus};
    use crate::storage::{is_integrity_violation, BirdStorage, CageStorage, Connection};
    use chrono::{NaiveDate, Utc};

    async fn setup_test() -> (NestRepository, DbConnection, Cage) {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        let now = Utc::now();

        let mut ids = Vec::new();
        for (identifier, gender) in [("B1", Gender::Male), ("B2", Gender::Female)] {
            let bird = Bird {
                id: Bird::generate_id(),
                identifier: identifier.to_string(),
                species: "Canary".to_string(),
                gender,
                birth_date: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
                status: "active".to_string(),
                ring: None,
                details: None,
                sold: false,
                for_sale: false,
                asking_price: None,
                sold_date: None,
                sold_price: None,
                buyer_info: None,
                owner_id: "alice".to_string(),
                seller_id: None,
                mother_id: None,
                father_id: None,
                created_at: now,
                updated_at: now,
            };
            db.create_bird_repository().store_bird(&bird).await.unwrap();
            ids.push(bird.id);
        }

        let cage = Cage {
            id: Cage::generate_id(),
            cage_number: "C-1".to_string(),
            male_id: ids[0].clone(),
            female_id: ids[1].clone(),
            species: "Canary".to_string(),
            status: CageStatus::Active,
            notes: None,
            owner_id: "alice".to_string(),
            created_at: now,
            updated_at: now,
        };
        db.create_cage_repository().store_cage(&cage).await.unwrap();

        (db.create_nest_repository(), db, cage)
    }

    fn nest(cage: &Cage) -> Nest {
        let now = Utc::now();
        Nest {
            id: Nest::generate_id(),
            cage_id: cage.id.clone(),
            cage_number: cage.cage_number.clone(),
            number_of_eggs: 5,
            fertilized_eggs: 4,
            extracted_eggs: 1,
            birds_exited: 0,
            exclusion_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            first_bird_exit_date: None,
            status: NestStatus::Active,
            notes: None,
            owner_id: "alice".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_store_get_and_list() {
        let (repo, _db, cage) = setup_test().await;
        let original = nest(&cage);
        repo.store_nest(&original).await.expect("Failed to store nest");

        let loaded = repo.get_nest(&original.id).await.unwrap().expect("nest should exist");
        assert_eq!(loaded.cage_id, cage.id);
        assert_eq!(loaded.number_of_eggs, 5);
        assert_eq!(loaded.exclusion_date, original.exclusion_date);
        assert_eq!(loaded.first_bird_exit_date, None);

        assert_eq!(repo.list_nests("alice").await.unwrap().len(), 1);
        assert!(repo.list_nests("bob").await.unwrap().is_empty());
        assert_eq!(repo.count_nests_for_cage(&cage.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_cage_number_follows_renamed_cage() {
        let (repo, db, mut cage) = setup_test().await;
        let original = nest(&cage);
        repo.store_nest(&original).await.unwrap();

        cage.cage_number = "C-9".to_string();
        db.create_cage_repository().update_cage(&cage).await.unwrap();

        let loaded = repo.get_nest(&original.id).await.unwrap().unwrap();
        assert_eq!(loaded.cage_number, "C-9");
    }

    #[tokio::test]
    async fn test_nest_blocks_cage_delete_and_needs_cage() {
        let (repo, db, cage) = setup_test().await;
        let original = nest(&cage);
        repo.store_nest(&original).await.unwrap();

        let err = db.create_cage_repository().delete_cage(&cage.id).await.unwrap_err();
        assert!(is_integrity_violation(&err), "unexpected error: {err:?}");

        let mut orphan = nest(&cage);
        orphan.cage_id = "missing-cage".to_string();
        let err = repo.store_nest(&orphan).await.unwrap_err();
        assert!(is_integrity_violation(&err), "unexpected error: {err:?}");

        assert!(repo.delete_nest(&original.id).await.unwrap());
        assert_eq!(repo.count_nests_for_cage(&cage.id).await.unwrap(), 0);
    }
}
