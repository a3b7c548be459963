use crate::domain::commands::nests::{CreateNestCommand, UpdateNestCommand};
use crate::domain::models::nest::NestDetails;
use shared::{CreateNestRequest, Nest as SharedNest, UpdateNestRequest};

use super::cage_mapper::CageMapper;

pub struct NestMapper;

impl NestMapper {
    /// The nest carries its cage, with both birds resolved
    pub fn to_dto(details: NestDetails) -> SharedNest {
        let NestDetails { nest, cage } = details;
        SharedNest {
            id: nest.id,
            cage_number: nest.cage_number,
            cage: CageMapper::to_dto(cage),
            number_of_eggs: nest.number_of_eggs,
            fertilized_eggs: nest.fertilized_eggs,
            extracted_eggs: nest.extracted_eggs,
            birds_exited: nest.birds_exited,
            exclusion_date: nest.exclusion_date.format("%Y-%m-%d").to_string(),
            first_bird_exit_date: nest
                .first_bird_exit_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
            status: nest.status.as_str().to_string(),
            notes: nest.notes,
            owner: nest.owner_id,
            created_at: nest.created_at.to_rfc3339(),
            updated_at: nest.updated_at.to_rfc3339(),
        }
    }

    pub fn to_create_command(request: CreateNestRequest) -> CreateNestCommand {
        CreateNestCommand {
            cage_number: request.cage_number,
            number_of_eggs: request.number_of_eggs,
            fertilized_eggs: request.fertilized_eggs,
            extracted_eggs: request.extracted_eggs,
            birds_exited: request.birds_exited,
            exclusion_date: request.exclusion_date,
            first_bird_exit_date: request.first_bird_exit_date,
            status: request.status,
            notes: request.notes,
        }
    }

    pub fn to_update_command(request: UpdateNestRequest) -> UpdateNestCommand {
        UpdateNestCommand {
            cage_number: request.cage_number,
            number_of_eggs: request.number_of_eggs,
            fertilized_eggs: request.fertilized_eggs,
            extracted_eggs: request.extracted_eggs,
            birds_exited: request.birds_exited,
            exclusion_date: request.exclusion_date,
            first_bird_exit_date: request.first_bird_exit_date,
            status: request.status,
            notes: request.notes,
        }
    }
}
