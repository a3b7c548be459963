use crate::domain::commands::users::{RegisterUserCommand, RegisteredUser};
use crate::domain::models::user::User as DomainUser;
use shared::{RegisterUserRequest, RegisterUserResponse, User as SharedUser};

pub struct UserMapper;

impl UserMapper {
    pub fn to_dto(domain: DomainUser) -> SharedUser {
        SharedUser {
            id: domain.id,
            national_id: domain.national_id,
            full_name: domain.full_name,
            email: domain.email,
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn to_register_command(request: RegisterUserRequest) -> RegisterUserCommand {
        RegisterUserCommand {
            national_id: request.national_id,
            full_name: request.full_name,
            email: request.email,
        }
    }

    pub fn to_registered_dto(registered: RegisteredUser) -> RegisterUserResponse {
        RegisterUserResponse {
            user: Self::to_dto(registered.user),
            token: registered.token,
        }
    }
}
