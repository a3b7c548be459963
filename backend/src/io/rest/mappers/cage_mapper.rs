use crate::domain::commands::cages::{CreateCageCommand, UpdateCageCommand};
use crate::domain::models::cage::CageDetails;
use shared::{Cage as SharedCage, CreateCageRequest, UpdateCageRequest};

use super::bird_mapper::BirdMapper;

pub struct CageMapper;

impl CageMapper {
    pub fn to_dto(details: CageDetails) -> SharedCage {
        let CageDetails { cage, male, female } = details;
        SharedCage {
            id: cage.id,
            cage_number: cage.cage_number,
            male: BirdMapper::to_dto(male),
            female: BirdMapper::to_dto(female),
            species: cage.species,
            status: cage.status.as_str().to_string(),
            notes: cage.notes,
            owner: cage.owner_id,
            created_at: cage.created_at.to_rfc3339(),
            updated_at: cage.updated_at.to_rfc3339(),
        }
    }

    pub fn to_create_command(request: CreateCageRequest) -> CreateCageCommand {
        CreateCageCommand {
            cage_number: request.cage_number,
            male_id: request.male.id().to_string(),
            female_id: request.female.id().to_string(),
            species: request.species,
            notes: request.notes,
        }
    }

    pub fn to_update_command(request: UpdateCageRequest) -> UpdateCageCommand {
        UpdateCageCommand {
            cage_number: request.cage_number,
            male_id: request.male.map(|r| r.id().to_string()),
            female_id: request.female.map(|r| r.id().to_string()),
            species: request.species,
            status: request.status,
            notes: request.notes,
        }
    }
}
