//! Bird registry: records, ownership checks and the sale/transfer operations.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{
    commands::birds::{
        BuyerInfoInput, CreateBirdCommand, PurchaseBirdCommand, SellBirdCommand, UpdateBirdCommand,
    },
    error::{DomainError, DomainResult},
    models::bird::{Bird, BuyerInfo, Gender, DEFAULT_STATUS},
    transfer,
    validation::{non_negative_amount, optional_text, parse_date, required_text},
};
use crate::storage::{BirdListing, BirdStorage, CageStorage, Connection, SoldTotals, UserStorage};

#[derive(Clone)]
pub struct BirdService<C: Connection> {
    bird_repository: C::BirdRepository,
    cage_repository: C::CageRepository,
    user_repository: C::UserRepository,
}

impl<C: Connection> BirdService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            bird_repository: connection.create_bird_repository(),
            cage_repository: connection.create_cage_repository(),
            user_repository: connection.create_user_repository(),
        }
    }

    pub async fn create_bird(&self, owner_id: &str, command: CreateBirdCommand) -> DomainResult<Bird> {
        info!("Creating bird {} for owner {}", command.identifier, owner_id);

        let identifier = required_text("identifier", &command.identifier)?;
        let species = required_text("species", &command.species)?;
        let gender = Gender::normalize(command.gender.as_deref())?;
        let birth_date = parse_date("birthDate", &command.birth_date)?;
        let status = optional_text(command.status).unwrap_or_else(|| DEFAULT_STATUS.to_string());
        let mother_id = self.resolve_parent("Mother", command.mother_id, None).await?;
        let father_id = self.resolve_parent("Father", command.father_id, None).await?;

        if self.bird_repository.identifier_exists(&identifier).await? {
            warn!("Rejected duplicate bird identifier {}", identifier);
            return Err(DomainError::DuplicateIdentifier(identifier));
        }

        let now = Utc::now();
        let bird = Bird {
            id: Bird::generate_id(),
            identifier,
            species,
            gender,
            birth_date,
            status,
            ring: optional_text(command.ring),
            details: optional_text(command.details),
            sold: false,
            for_sale: false,
            asking_price: None,
            sold_date: None,
            sold_price: None,
            buyer_info: None,
            owner_id: owner_id.to_string(),
            seller_id: None,
            mother_id,
            father_id,
            created_at: now,
            updated_at: now,
        };

        self.bird_repository.store_bird(&bird).await.map_err(|e| {
            DomainError::from_write(
                e,
                || DomainError::DuplicateIdentifier(bird.identifier.clone()),
                || DomainError::not_found("Parent bird not found"),
            )
        })?;

        info!("Created bird {} with ID {}", bird.identifier, bird.id);
        Ok(bird)
    }

    pub async fn get_bird(&self, bird_id: &str) -> DomainResult<Bird> {
        self.bird_repository
            .get_bird(bird_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Bird not found"))
    }

    /// Birds held by the caller or sold on by them, minus their for-sale listings
    pub async fn list_birds(&self, owner_id: &str) -> DomainResult<Vec<Bird>> {
        self.list(BirdListing::Holdings { owner_id: owner_id.to_string() }).await
    }

    /// Marketplace view, visible to every caller
    pub async fn list_for_sale(&self) -> DomainResult<Vec<Bird>> {
        self.list(BirdListing::ForSale).await
    }

    pub async fn list_available(&self, owner_id: &str) -> DomainResult<Vec<Bird>> {
        self.list(BirdListing::Available { owner_id: owner_id.to_string() }).await
    }

    pub async fn list_sold(&self, owner_id: &str) -> DomainResult<Vec<Bird>> {
        self.list(BirdListing::Sold { owner_id: owner_id.to_string() }).await
    }

    pub async fn sold_totals(&self, owner_id: &str) -> DomainResult<SoldTotals> {
        Ok(self.bird_repository.sold_totals(owner_id).await?)
    }

    pub async fn update_bird(
        &self,
        bird_id: &str,
        owner_id: &str,
        command: UpdateBirdCommand,
    ) -> DomainResult<Bird> {
        info!("Updating bird {}", bird_id);
        let mut bird = self.owned_bird(bird_id, owner_id).await?;

        if let Some(identifier) = command.identifier {
            let identifier = required_text("identifier", &identifier)?;
            if identifier != bird.identifier
                && self.bird_repository.identifier_exists(&identifier).await?
            {
                warn!("Rejected duplicate bird identifier {}", identifier);
                return Err(DomainError::DuplicateIdentifier(identifier));
            }
            bird.identifier = identifier;
        }
        if let Some(species) = command.species {
            bird.species = required_text("species", &species)?;
        }
        if let Some(gender) = command.gender {
            bird.gender = Gender::normalize(Some(&gender))?;
        }
        if let Some(birth_date) = command.birth_date {
            bird.birth_date = parse_date("birthDate", &birth_date)?;
        }
        if let Some(status) = command.status {
            bird.status = required_text("status", &status)?;
        }
        if let Some(ring) = command.ring {
            bird.ring = optional_text(Some(ring));
        }
        if let Some(details) = command.details {
            bird.details = optional_text(Some(details));
        }
        if command.mother_id.is_some() {
            bird.mother_id = self.resolve_parent("Mother", command.mother_id, Some(&bird.id)).await?;
        }
        if command.father_id.is_some() {
            bird.father_id = self.resolve_parent("Father", command.father_id, Some(&bird.id)).await?;
        }

        bird.updated_at = Utc::now();
        self.save(&bird).await?;

        info!("Updated bird {}", bird.id);
        Ok(bird)
    }

    /// Delete an owned bird. Sold birds are kept as sale records and birds
    /// still paired in a cage cannot be deleted.
    pub async fn delete_bird(&self, bird_id: &str, owner_id: &str) -> DomainResult<()> {
        info!("Deleting bird {}", bird_id);
        let bird = self.owned_bird(bird_id, owner_id).await?;

        if bird.sold {
            warn!("Refused to delete sold bird {}", bird.id);
            return Err(DomainError::InvalidTransition(
                "A sold bird cannot be deleted".to_string(),
            ));
        }
        self.ensure_uncaged(&bird, "deleted").await?;

        self.bird_repository.delete_bird(&bird.id).await.map_err(|e| {
            DomainError::from_write(
                e,
                || DomainError::Internal(anyhow::anyhow!("Unexpected unique violation on delete")),
                || DomainError::InUse(format!("Bird {} is still paired in a cage", bird.identifier)),
            )
        })?;

        info!("Deleted bird {} ({})", bird.identifier, bird.id);
        Ok(())
    }

    pub async fn mark_for_sale(
        &self,
        bird_id: &str,
        owner_id: &str,
        asking_price: Option<f64>,
    ) -> DomainResult<Bird> {
        info!("Marking bird {} for sale", bird_id);
        let mut bird = self.owned_bird(bird_id, owner_id).await?;
        let asking_price = asking_price
            .map(|price| non_negative_amount("askingPrice", price))
            .transpose()?;

        transfer::mark_for_sale(&mut bird, asking_price, Utc::now()).map_err(|e| {
            warn!("Bird {} cannot be listed: {}", bird_id, e);
            e
        })?;
        self.ensure_uncaged(&bird, "listed for sale").await?;
        self.save(&bird).await?;

        info!("Bird {} listed for sale", bird.id);
        Ok(bird)
    }

    /// Record a sale to an external buyer. The declared national id must
    /// belong to a registered user.
    pub async fn sell_bird(
        &self,
        bird_id: &str,
        owner_id: &str,
        command: SellBirdCommand,
    ) -> DomainResult<Bird> {
        info!("Selling bird {}", bird_id);
        let mut bird = self.owned_bird(bird_id, owner_id).await?;
        if bird.sold {
            warn!("Bird {} was already sold", bird.id);
            return Err(DomainError::InvalidTransition(
                "Bird has already been sold".to_string(),
            ));
        }

        let price = non_negative_amount("price", command.price)?;
        let buyer = Self::validate_buyer(command.buyer_info)?;

        if self
            .user_repository
            .find_user_by_national_id(&buyer.national_id)
            .await?
            .is_none()
        {
            warn!("No registered buyer with national id {}", buyer.national_id);
            return Err(DomainError::not_found("Buyer not found"));
        }

        transfer::sell(&mut bird, price, buyer, Utc::now())?;
        self.save(&bird).await?;

        info!("Bird {} sold for {:.2}", bird.id, price);
        Ok(bird)
    }

    /// Transfer a listed bird to the calling registered user
    pub async fn purchase_bird(
        &self,
        bird_id: &str,
        buyer_id: &str,
        command: PurchaseBirdCommand,
    ) -> DomainResult<Bird> {
        info!("User {} purchasing bird {}", buyer_id, bird_id);
        let mut bird = self.get_bird(bird_id).await?;

        transfer::purchase(&mut bird, buyer_id, Utc::now()).map_err(|e| {
            warn!("Purchase of bird {} rejected: {}", bird_id, e);
            e
        })?;
        self.ensure_uncaged(&bird, "transferred").await?;

        if let Some(status) = optional_text(command.status) {
            bird.status = status;
        }
        if let Some(ring) = command.ring {
            bird.ring = optional_text(Some(ring));
        }
        if let Some(details) = command.details {
            bird.details = optional_text(Some(details));
        }

        self.save(&bird).await?;

        info!(
            "Bird {} transferred from {} to {}",
            bird.id,
            bird.seller_id.as_deref().unwrap_or_default(),
            bird.owner_id
        );
        Ok(bird)
    }

    async fn list(&self, listing: BirdListing) -> DomainResult<Vec<Bird>> {
        let birds = self.bird_repository.list_birds(&listing).await?;
        info!("Found {} birds for {:?}", birds.len(), listing);
        Ok(birds)
    }

    /// Birds paired in a cage stay with the cage owner until the cage is removed
    async fn ensure_uncaged(&self, bird: &Bird, action: &str) -> DomainResult<()> {
        let cages = self.cage_repository.count_cages_for_bird(&bird.id).await?;
        if cages > 0 {
            warn!("Bird {} cannot be {} while used by {} cage(s)", bird.id, action, cages);
            return Err(DomainError::InUse(format!(
                "Bird {} is still paired in {} cage(s)",
                bird.identifier, cages
            )));
        }
        Ok(())
    }

    async fn owned_bird(&self, bird_id: &str, owner_id: &str) -> DomainResult<Bird> {
        let bird = self.get_bird(bird_id).await?;
        if !bird.is_owned_by(owner_id) {
            warn!("User {} is not the owner of bird {}", owner_id, bird_id);
            return Err(DomainError::unauthorized("User not authorized"));
        }
        Ok(bird)
    }

    async fn save(&self, bird: &Bird) -> DomainResult<()> {
        self.bird_repository.update_bird(bird).await.map_err(|e| {
            DomainError::from_write(
                e,
                || DomainError::DuplicateIdentifier(bird.identifier.clone()),
                || DomainError::validation("Bird violates a storage constraint"),
            )
        })
    }

    /// Blank clears the link; anything else must name an existing bird other than `self_id`
    async fn resolve_parent(
        &self,
        role: &str,
        parent_id: Option<String>,
        self_id: Option<&str>,
    ) -> DomainResult<Option<String>> {
        let Some(parent_id) = optional_text(parent_id) else {
            return Ok(None);
        };
        if Some(parent_id.as_str()) == self_id {
            return Err(DomainError::validation(format!(
                "{} cannot be the bird itself",
                role
            )));
        }
        if self.bird_repository.get_bird(&parent_id).await?.is_none() {
            return Err(DomainError::not_found(format!("{} bird not found", role)));
        }
        Ok(Some(parent_id))
    }

    fn validate_buyer(input: Option<BuyerInfoInput>) -> DomainResult<BuyerInfo> {
        let input = input.unwrap_or_default();
        let national_id = optional_text(input.national_id);
        let full_name = optional_text(input.full_name);
        match (national_id, full_name) {
            (Some(national_id), Some(full_name)) => Ok(BuyerInfo {
                national_id,
                full_name,
                phone: optional_text(input.phone).unwrap_or_default(),
            }),
            _ => Err(DomainError::validation(
                "Price and buyer information (nationalId, fullName) are required",
            )),
        }
    }
}
