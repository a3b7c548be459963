use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{
    cage_service::CageService,
    commands::nests::{CreateNestCommand, UpdateNestCommand},
    error::{DomainError, DomainResult},
    models::nest::{Nest, NestDetails, NestStatus},
    validation::{non_negative_count, optional_date, optional_text, parse_date, required_text},
};
use crate::storage::{Connection, NestStorage};

/// Clutch records bound to one of the owner's cages
#[derive(Clone)]
pub struct NestService<C: Connection> {
    nest_repository: C::NestRepository,
    cage_service: CageService<C>,
}

impl<C: Connection> NestService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            nest_repository: connection.create_nest_repository(),
            cage_service: CageService::new(connection),
        }
    }

    pub async fn create_nest(
        &self,
        owner_id: &str,
        command: CreateNestCommand,
    ) -> DomainResult<NestDetails> {
        info!("Creating nest in cage {} for owner {}", command.cage_number, owner_id);

        let cage_number = required_text("cageNumber", &command.cage_number)?;
        let cage = self.cage_service.find_owned_by_number(&cage_number, owner_id).await?;

        let status = match optional_text(command.status) {
            Some(status) => NestStatus::parse(&status)?,
            None => NestStatus::Active,
        };

        let now = Utc::now();
        let nest = Nest {
            id: Nest::generate_id(),
            cage_id: cage.id.clone(),
            cage_number: cage.cage_number.clone(),
            number_of_eggs: non_negative_count("numberOfEggs", command.number_of_eggs)?,
            fertilized_eggs: non_negative_count("fertilizedEggs", command.fertilized_eggs)?,
            extracted_eggs: non_negative_count("extractedEggs", command.extracted_eggs)?,
            birds_exited: non_negative_count("birdsExited", command.birds_exited.unwrap_or(0))?,
            exclusion_date: parse_date("exclusionDate", &command.exclusion_date)?,
            first_bird_exit_date: optional_date("firstBirdExitDate", command.first_bird_exit_date)?,
            status,
            notes: optional_text(command.notes),
            owner_id: owner_id.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.save(&nest, true).await?;
        info!("Created nest {} in cage {}", nest.id, nest.cage_number);

        let cage = self.cage_service.populate(cage).await?;
        Ok(NestDetails { nest, cage })
    }

    pub async fn get_nest(&self, nest_id: &str, owner_id: &str) -> DomainResult<NestDetails> {
        let nest = self.owned_nest(nest_id, owner_id).await?;
        self.populate(nest).await
    }

    pub async fn list_nests(&self, owner_id: &str) -> DomainResult<Vec<NestDetails>> {
        let nests = self.nest_repository.list_nests(owner_id).await?;
        info!("Found {} nests for owner {}", nests.len(), owner_id);

        let mut populated = Vec::with_capacity(nests.len());
        for nest in nests {
            populated.push(self.populate(nest).await?);
        }
        Ok(populated)
    }

    /// Apply a patch. A changed cage number moves the nest to that cage, which
    /// must belong to the owner; on any failure the stored nest is untouched.
    pub async fn update_nest(
        &self,
        nest_id: &str,
        owner_id: &str,
        command: UpdateNestCommand,
    ) -> DomainResult<NestDetails> {
        info!("Updating nest {}", nest_id);
        let mut nest = self.owned_nest(nest_id, owner_id).await?;

        if let Some(cage_number) = command.cage_number {
            let cage_number = required_text("cageNumber", &cage_number)?;
            if cage_number != nest.cage_number {
                let cage = self.cage_service.find_owned_by_number(&cage_number, owner_id).await?;
                info!("Moving nest {} from cage {} to {}", nest.id, nest.cage_number, cage.cage_number);
                nest.cage_id = cage.id;
                nest.cage_number = cage.cage_number;
            }
        }

        if let Some(value) = command.number_of_eggs {
            nest.number_of_eggs = non_negative_count("numberOfEggs", value)?;
        }
        if let Some(value) = command.fertilized_eggs {
            nest.fertilized_eggs = non_negative_count("fertilizedEggs", value)?;
        }
        if let Some(value) = command.extracted_eggs {
            nest.extracted_eggs = non_negative_count("extractedEggs", value)?;
        }
        if let Some(value) = command.birds_exited {
            nest.birds_exited = non_negative_count("birdsExited", value)?;
        }
        if let Some(date) = command.exclusion_date {
            nest.exclusion_date = parse_date("exclusionDate", &date)?;
        }
        if command.first_bird_exit_date.is_some() {
            nest.first_bird_exit_date =
                optional_date("firstBirdExitDate", command.first_bird_exit_date)?;
        }
        if let Some(status) = command.status {
            nest.status = NestStatus::parse(&status)?;
        }
        if let Some(notes) = command.notes {
            nest.notes = optional_text(Some(notes));
        }

        nest.updated_at = Utc::now();
        self.save(&nest, false).await?;

        info!("Updated nest {}", nest.id);
        self.populate(nest).await
    }

    pub async fn delete_nest(&self, nest_id: &str, owner_id: &str) -> DomainResult<()> {
        info!("Deleting nest {}", nest_id);
        let nest = self.owned_nest(nest_id, owner_id).await?;

        if !self.nest_repository.delete_nest(&nest.id).await? {
            return Err(DomainError::not_found("Nest not found"));
        }

        info!("Deleted nest {}", nest.id);
        Ok(())
    }

    async fn owned_nest(&self, nest_id: &str, owner_id: &str) -> DomainResult<Nest> {
        let nest = self
            .nest_repository
            .get_nest(nest_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Nest not found"))?;
        if nest.owner_id != owner_id {
            warn!("User {} is not the owner of nest {}", owner_id, nest_id);
            return Err(DomainError::unauthorized("User not authorized"));
        }
        Ok(nest)
    }

    async fn populate(&self, nest: Nest) -> DomainResult<NestDetails> {
        let cage = self.cage_service.get_details(&nest.cage_id).await?;
        Ok(NestDetails { nest, cage })
    }

    async fn save(&self, nest: &Nest, is_new: bool) -> DomainResult<()> {
        let result = if is_new {
            self.nest_repository.store_nest(nest).await
        } else {
            self.nest_repository.update_nest(nest).await
        };
        result.map_err(|e| {
            DomainError::from_write(
                e,
                || DomainError::Internal(anyhow::anyhow!("Unexpected unique violation on nest {}", nest.id)),
                || DomainError::not_found("Cage not found"),
            )
        })
    }
}
