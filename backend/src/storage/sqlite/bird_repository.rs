use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use super::{format_date, format_timestamp, map_write_error, parse_date, parse_timestamp, DbConnection};
use crate::domain::models::bird::{Bird, BuyerInfo, Gender};
use crate::storage::traits::{BirdListing, BirdStorage, SoldTotals};

const BIRD_COLUMNS: &str = r#"
    id, identifier, species, gender, birth_date, status, ring, details,
    sold, for_sale, asking_price, sold_date, sold_price,
    buyer_national_id, buyer_full_name, buyer_phone,
    owner_id, seller_id, mother_id, father_id, created_at, updated_at
"#;

/// Repository for bird records
#[derive(Clone)]
pub struct BirdRepository {
    db: DbConnection,
}

impl BirdRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_bird(row: &SqliteRow) -> Result<Bird> {
        let gender: String = row.get("gender");
        let gender = Gender::normalize(Some(&gender))
            .map_err(|_| anyhow!("Corrupt gender in database: {}", gender))?;

        let sold_date: Option<String> = row.get("sold_date");
        let buyer_national_id: Option<String> = row.get("buyer_national_id");
        let buyer_info = buyer_national_id.map(|national_id| BuyerInfo {
            national_id,
            full_name: row.get::<Option<String>, _>("buyer_full_name").unwrap_or_default(),
            phone: row.get::<Option<String>, _>("buyer_phone").unwrap_or_default(),
        });

        Ok(Bird {
            id: row.get("id"),
            identifier: row.get("identifier"),
            species: row.get("species"),
            gender,
            birth_date: parse_date(row.get("birth_date"))?,
            status: row.get("status"),
            ring: row.get("ring"),
            details: row.get("details"),
            sold: row.get("sold"),
            for_sale: row.get("for_sale"),
            asking_price: row.get("asking_price"),
            sold_date: sold_date.as_deref().map(parse_timestamp).transpose()?,
            sold_price: row.get("sold_price"),
            buyer_info,
            owner_id: row.get("owner_id"),
            seller_id: row.get("seller_id"),
            mother_id: row.get("mother_id"),
            father_id: row.get("father_id"),
            created_at: parse_timestamp(row.get("created_at"))?,
            updated_at: parse_timestamp(row.get("updated_at"))?,
        })
    }
}

#[async_trait]
impl BirdStorage for BirdRepository {
    async fn store_bird(&self, bird: &Bird) -> Result<()> {
        let buyer = bird.buyer_info.as_ref();
        sqlx::query(&format!(
            "INSERT INTO birds ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            BIRD_COLUMNS
        ))
        .bind(&bird.id)
        .bind(&bird.identifier)
        .bind(&bird.species)
        .bind(bird.gender.as_str())
        .bind(format_date(bird.birth_date))
        .bind(&bird.status)
        .bind(&bird.ring)
        .bind(&bird.details)
        .bind(bird.sold)
        .bind(bird.for_sale)
        .bind(bird.asking_price)
        .bind(bird.sold_date.map(format_timestamp))
        .bind(bird.sold_price)
        .bind(buyer.map(|b| b.national_id.clone()))
        .bind(buyer.map(|b| b.full_name.clone()))
        .bind(buyer.map(|b| b.phone.clone()))
        .bind(&bird.owner_id)
        .bind(&bird.seller_id)
        .bind(&bird.mother_id)
        .bind(&bird.father_id)
        .bind(format_timestamp(bird.created_at))
        .bind(format_timestamp(bird.updated_at))
        .execute(self.db.pool())
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn get_bird(&self, bird_id: &str) -> Result<Option<Bird>> {
        let row = sqlx::query(&format!("SELECT {} FROM birds WHERE id = ?", BIRD_COLUMNS))
            .bind(bird_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_bird).transpose()
    }

    async fn get_owned_bird(&self, bird_id: &str, owner_id: &str) -> Result<Option<Bird>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM birds WHERE id = ? AND owner_id = ?",
            BIRD_COLUMNS
        ))
        .bind(bird_id)
        .bind(owner_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_bird).transpose()
    }

    async fn identifier_exists(&self, identifier: &str) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM birds WHERE identifier = ?")
            .bind(identifier)
            .fetch_one(self.db.pool())
            .await?;
        Ok(row.get::<i64, _>("n") > 0)
    }

    async fn update_bird(&self, bird: &Bird) -> Result<()> {
        let buyer = bird.buyer_info.as_ref();
        sqlx::query(
            r#"
            UPDATE birds
            SET identifier = ?, species = ?, gender = ?, birth_date = ?, status = ?,
                ring = ?, details = ?, sold = ?, for_sale = ?, asking_price = ?,
                sold_date = ?, sold_price = ?, buyer_national_id = ?, buyer_full_name = ?,
                buyer_phone = ?, owner_id = ?, seller_id = ?, mother_id = ?, father_id = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&bird.identifier)
        .bind(&bird.species)
        .bind(bird.gender.as_str())
        .bind(format_date(bird.birth_date))
        .bind(&bird.status)
        .bind(&bird.ring)
        .bind(&bird.details)
        .bind(bird.sold)
        .bind(bird.for_sale)
        .bind(bird.asking_price)
        .bind(bird.sold_date.map(format_timestamp))
        .bind(bird.sold_price)
        .bind(buyer.map(|b| b.national_id.clone()))
        .bind(buyer.map(|b| b.full_name.clone()))
        .bind(buyer.map(|b| b.phone.clone()))
        .bind(&bird.owner_id)
        .bind(&bird.seller_id)
        .bind(&bird.mother_id)
        .bind(&bird.father_id)
        .bind(format_timestamp(bird.updated_at))
        .bind(&bird.id)
        .execute(self.db.pool())
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn delete_bird(&self, bird_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM birds WHERE id = ?")
            .bind(bird_id)
            .execute(self.db.pool())
            .await
            .map_err(map_write_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_birds(&self, listing: &BirdListing) -> Result<Vec<Bird>> {
        let (filter, binds): (&str, Vec<&str>) = match listing {
            BirdListing::Holdings { owner_id } => (
                "(owner_id = ? OR seller_id = ?) AND for_sale = 0",
                vec![owner_id.as_str(), owner_id.as_str()],
            ),
            BirdListing::ForSale => ("for_sale = 1 AND sold = 0", vec![]),
            BirdListing::Available { owner_id } => (
                "owner_id = ? AND for_sale = 0 AND sold = 0",
                vec![owner_id.as_str()],
            ),
            BirdListing::Sold { owner_id } => (
                "seller_id = ? OR (owner_id = ? AND sold = 1)",
                vec![owner_id.as_str(), owner_id.as_str()],
            ),
            BirdListing::Unsold { owner_id } => ("owner_id = ? AND sold = 0", vec![owner_id.as_str()]),
        };

        let sql = format!(
            "SELECT {} FROM birds WHERE {} ORDER BY ROWID DESC",
            BIRD_COLUMNS, filter
        );
        let mut query = sqlx::query(&sql);
        for value in binds {
            query = query.bind(value);
        }

        let rows = query.fetch_all(self.db.pool()).await?;
        rows.iter().map(Self::row_to_bird).collect()
    }

    async fn sold_totals(&self, owner_id: &str) -> Result<SoldTotals> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS n, COALESCE(SUM(sold_price), 0.0) AS total
            FROM birds
            WHERE owner_id = ? AND sold = 1
            "#,
        )
        .bind(owner_id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(SoldTotals {
            count: row.get::<i64, _>("n") as u32,
            total_price: row.get("total"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{is_unique_violation, Connection};
    use chrono::{NaiveDate, Utc};

    async fn setup_test() -> BirdRepository {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        db.create_bird_repository()
    }

    fn bird(identifier: &str, owner: &str) -> Bird {
        let now = Utc::now();
        Bird {
            id: Bird::generate_id(),
            identifier: identifier.to_string(),
            species: "Canary".to_string(),
            gender: Gender::Female,
            birth_date: NaiveDate::from_ymd_opt(2023, 4, 2).unwrap(),
            status: "active".to_string(),
            ring: Some("R-1".to_string()),
            details: None,
            sold: false,
            for_sale: false,
            asking_price: None,
            sold_date: None,
            sold_price: None,
            buyer_info: None,
            owner_id: owner.to_string(),
            seller_id: None,
            mother_id: None,
            father_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_store_and_get_bird() {
        let repo = setup_test().await;
        let original = bird("B1", "alice");
        repo.store_bird(&original).await.expect("Failed to store bird");

        let loaded = repo.get_bird(&original.id).await.unwrap().expect("bird should exist");
        assert_eq!(loaded.identifier, "B1");
        assert_eq!(loaded.gender, Gender::Female);
        assert_eq!(loaded.birth_date, original.birth_date);
        assert_eq!(loaded.ring.as_deref(), Some("R-1"));
        assert!(repo.identifier_exists("B1").await.unwrap());
        assert!(!repo.identifier_exists("B2").await.unwrap());

        assert!(repo.get_owned_bird(&original.id, "bob").await.unwrap().is_none());
        assert!(repo.get_owned_bird(&original.id, "alice").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_identifier_is_rejected_by_storage() {
        let repo = setup_test().await;
        repo.store_bird(&bird("B1", "alice")).await.unwrap();

        let err = repo.store_bird(&bird("B1", "bob")).await.unwrap_err();
        assert!(is_unique_violation(&err), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn test_listings() {
        let repo = setup_test().await;

        let kept = bird("B1", "alice");
        let mut listed = bird("B2", "alice");
        listed.for_sale = true;
        let mut sold = bird("B3", "alice");
        sold.sold = true;
        sold.sold_price = Some(30.0);
        let mut transferred = bird("B4", "bob");
        transferred.seller_id = Some("alice".to_string());

        for b in [&kept, &listed, &sold, &transferred] {
            repo.store_bird(b).await.unwrap();
        }

        let ids = |birds: Vec<Bird>| birds.into_iter().map(|b| b.identifier).collect::<Vec<_>>();

        let holdings = repo
            .list_birds(&BirdListing::Holdings { owner_id: "alice".into() })
            .await
            .unwrap();
        assert_eq!(ids(holdings), vec!["B4", "B3", "B1"]);

        let for_sale = repo.list_birds(&BirdListing::ForSale).await.unwrap();
        assert_eq!(ids(for_sale), vec!["B2"]);

        let available = repo
            .list_birds(&BirdListing::Available { owner_id: "alice".into() })
            .await
            .unwrap();
        assert_eq!(ids(available), vec!["B1"]);

        let sold_list = repo
            .list_birds(&BirdListing::Sold { owner_id: "alice".into() })
            .await
            .unwrap();
        assert_eq!(ids(sold_list), vec!["B4", "B3"]);

        let unsold = repo
            .list_birds(&BirdListing::Unsold { owner_id: "alice".into() })
            .await
            .unwrap();
        assert_eq!(ids(unsold), vec!["B2", "B1"]);

        let totals = repo.sold_totals("alice").await.unwrap();
        assert_eq!(totals.count, 1);
        assert_eq!(totals.total_price, 30.0);
    }

    #[tokio::test]
    async fn test_update_and_delete_bird() {
        let repo = setup_test().await;
        let mut b = bird("B1", "alice");
        repo.store_bird(&b).await.unwrap();

        b.sold = true;
        b.status = "sold".to_string();
        b.sold_date = Some(Utc::now());
        b.buyer_info = Some(BuyerInfo {
            national_id: "12345678".to_string(),
            full_name: "Bob".to_string(),
            phone: String::new(),
        });
        repo.update_bird(&b).await.unwrap();

        let loaded = repo.get_bird(&b.id).await.unwrap().unwrap();
        assert!(loaded.sold);
        assert_eq!(loaded.buyer_info.unwrap().full_name, "Bob");

        assert!(repo.delete_bird(&b.id).await.unwrap());
        assert!(!repo.delete_bird(&b.id).await.unwrap());
    }
}
