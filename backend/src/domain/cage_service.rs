use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{
    commands::cages::{CreateCageCommand, UpdateCageCommand},
    error::{DomainError, DomainResult},
    models::{
        bird::Bird,
        cage::{Cage, CageDetails, CageStatus},
    },
    validation::{optional_text, required_text},
};
use crate::storage::{BirdStorage, CageStorage, Connection, NestStorage};

/// Breeding cages: one male and one female held by the same owner
#[derive(Clone)]
pub struct CageService<C: Connection> {
    cage_repository: C::CageRepository,
    bird_repository: C::BirdRepository,
    nest_repository: C::NestRepository,
}

impl<C: Connection> CageService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            cage_repository: connection.create_cage_repository(),
            bird_repository: connection.create_bird_repository(),
            nest_repository: connection.create_nest_repository(),
        }
    }

    pub async fn create_cage(
        &self,
        owner_id: &str,
        command: CreateCageCommand,
    ) -> DomainResult<CageDetails> {
        info!("Creating cage {} for owner {}", command.cage_number, owner_id);

        let cage_number = required_text("cageNumber", &command.cage_number)?;
        let species = required_text("species", &command.species)?;
        let (male, female) = self
            .resolve_pair(owner_id, &command.male_id, &command.female_id)
            .await?;

        if self.cage_repository.find_cage_by_number(&cage_number).await?.is_some() {
            warn!("Rejected duplicate cage number {}", cage_number);
            return Err(DomainError::DuplicateCageNumber(cage_number));
        }
        if male.id == female.id {
            return Err(DomainError::validation(
                "Male and female must be different birds",
            ));
        }

        let now = Utc::now();
        let cage = Cage {
            id: Cage::generate_id(),
            cage_number,
            male_id: male.id.clone(),
            female_id: female.id.clone(),
            species,
            status: CageStatus::Active,
            notes: optional_text(command.notes),
            owner_id: owner_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.save(&cage, true).await?;

        info!("Created cage {} with ID {}", cage.cage_number, cage.id);
        Ok(CageDetails { cage, male, female })
    }

    pub async fn list_cages(&self, owner_id: &str) -> DomainResult<Vec<CageDetails>> {
        let cages = self.cage_repository.list_cages(owner_id).await?;
        info!("Found {} cages for owner {}", cages.len(), owner_id);

        let mut populated = Vec::with_capacity(cages.len());
        for cage in cages {
            populated.push(self.populate(cage).await?);
        }
        Ok(populated)
    }

    pub async fn update_cage(
        &self,
        cage_id: &str,
        owner_id: &str,
        command: UpdateCageCommand,
    ) -> DomainResult<CageDetails> {
        info!("Updating cage {}", cage_id);
        let mut cage = self.owned_cage(cage_id, owner_id).await?;

        if let Some(cage_number) = command.cage_number {
            let cage_number = required_text("cageNumber", &cage_number)?;
            if cage_number != cage.cage_number
                && self.cage_repository.find_cage_by_number(&cage_number).await?.is_some()
            {
                warn!("Rejected duplicate cage number {}", cage_number);
                return Err(DomainError::DuplicateCageNumber(cage_number));
            }
            cage.cage_number = cage_number;
        }

        if command.male_id.is_some() || command.female_id.is_some() {
            let male_id = command.male_id.unwrap_or_else(|| cage.male_id.clone());
            let female_id = command.female_id.unwrap_or_else(|| cage.female_id.clone());
            let (male, female) = self.resolve_pair(owner_id, &male_id, &female_id).await?;
            cage.male_id = male.id;
            cage.female_id = female.id;
        }
        if cage.male_id == cage.female_id {
            return Err(DomainError::validation(
                "Male and female must be different birds",
            ));
        }

        if let Some(species) = command.species {
            cage.species = required_text("species", &species)?;
        }
        if let Some(status) = command.status {
            cage.status = CageStatus::parse(&status)?;
        }
        if let Some(notes) = command.notes {
            cage.notes = optional_text(Some(notes));
        }

        cage.updated_at = Utc::now();
        self.save(&cage, false).await?;

        info!("Updated cage {}", cage.id);
        self.populate(cage).await
    }

    /// Delete an owned cage. Cages with recorded nests are kept.
    pub async fn delete_cage(&self, cage_id: &str, owner_id: &str) -> DomainResult<()> {
        info!("Deleting cage {}", cage_id);
        let cage = self.owned_cage(cage_id, owner_id).await?;

        let nests = self.nest_repository.count_nests_for_cage(&cage.id).await?;
        if nests > 0 {
            warn!("Refused to delete cage {} with {} nest(s)", cage.id, nests);
            return Err(DomainError::InUse(format!(
                "Cage {} still has {} nest(s)",
                cage.cage_number, nests
            )));
        }

        self.cage_repository.delete_cage(&cage.id).await.map_err(|e| {
            DomainError::from_write(
                e,
                || DomainError::Internal(anyhow::anyhow!("Unexpected unique violation on delete")),
                || DomainError::InUse(format!("Cage {} still has nests", cage.cage_number)),
            )
        })?;

        info!("Deleted cage {} ({})", cage.cage_number, cage.id);
        Ok(())
    }

    /// Look up a cage by its number among the owner's cages
    pub async fn find_owned_by_number(
        &self,
        cage_number: &str,
        owner_id: &str,
    ) -> DomainResult<Cage> {
        self.cage_repository
            .find_owned_cage_by_number(cage_number.trim(), owner_id)
            .await?
            .ok_or_else(|| {
                warn!("Cage {} not found for owner {}", cage_number, owner_id);
                DomainError::not_found("Cage not found")
            })
    }

    pub async fn get_details(&self, cage_id: &str) -> DomainResult<CageDetails> {
        let cage = self
            .cage_repository
            .get_cage(cage_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Cage not found"))?;
        self.populate(cage).await
    }

    pub async fn populate(&self, cage: Cage) -> DomainResult<CageDetails> {
        let male = self.load_bird(&cage.male_id).await?;
        let female = self.load_bird(&cage.female_id).await?;
        Ok(CageDetails { cage, male, female })
    }

    async fn owned_cage(&self, cage_id: &str, owner_id: &str) -> DomainResult<Cage> {
        let cage = self
            .cage_repository
            .get_cage(cage_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Cage not found"))?;
        if cage.owner_id != owner_id {
            warn!("User {} is not the owner of cage {}", owner_id, cage_id);
            return Err(DomainError::unauthorized("User not authorized"));
        }
        Ok(cage)
    }

    /// Both birds must exist among the owner's birds
    async fn resolve_pair(
        &self,
        owner_id: &str,
        male_id: &str,
        female_id: &str,
    ) -> DomainResult<(Bird, Bird)> {
        let male = self.bird_repository.get_owned_bird(male_id.trim(), owner_id).await?;
        let female = self.bird_repository.get_owned_bird(female_id.trim(), owner_id).await?;
        match (male, female) {
            (Some(male), Some(female)) => Ok((male, female)),
            _ => {
                warn!("Cage birds {} / {} not found for owner {}", male_id, female_id, owner_id);
                Err(DomainError::not_found("One or more birds not found"))
            }
        }
    }

    async fn load_bird(&self, bird_id: &str) -> DomainResult<Bird> {
        self.bird_repository.get_bird(bird_id).await?.ok_or_else(|| {
            DomainError::Internal(anyhow::anyhow!("Cage references missing bird {}", bird_id))
        })
    }

    async fn save(&self, cage: &Cage, is_new: bool) -> DomainResult<()> {
        let result = if is_new {
            self.cage_repository.store_cage(cage).await
        } else {
            self.cage_repository.update_cage(cage).await
        };
        result.map_err(|e| {
            DomainError::from_write(
                e,
                || DomainError::DuplicateCageNumber(cage.cage_number.clone()),
                || DomainError::not_found("One or more birds not found"),
            )
        })
    }
}
