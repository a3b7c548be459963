use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{
    commands::users::{RegisterUserCommand, RegisteredUser},
    error::{DomainError, DomainResult},
    identity::IdentityProvider,
    models::user::User,
    validation::required_text,
};
use crate::storage::{Connection, UserStorage};

const NATIONAL_ID_LENGTH: usize = 8;

/// Registered users and their session tokens
#[derive(Clone)]
pub struct UserService<C: Connection> {
    user_repository: C::UserRepository,
}

impl<C: Connection> UserService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            user_repository: connection.create_user_repository(),
        }
    }

    /// Create a user and open a session for them
    pub async fn register(&self, command: RegisterUserCommand) -> DomainResult<RegisteredUser> {
        let national_id = required_text("nationalId", &command.national_id)?;
        if national_id.chars().count() != NATIONAL_ID_LENGTH {
            return Err(DomainError::validation(format!(
                "nationalId must be exactly {} characters",
                NATIONAL_ID_LENGTH
            )));
        }
        let full_name = required_text("fullName", &command.full_name)?;
        let email = required_text("email", &command.email)?.to_lowercase();
        if !is_plausible_email(&email) {
            return Err(DomainError::validation("email is not a valid address"));
        }

        info!("Registering user with national id {}", national_id);

        if self.user_repository.find_user_by_national_id(&national_id).await?.is_some()
            || self.user_repository.find_user_by_email(&email).await?.is_some()
        {
            warn!("Rejected duplicate registration for {}", national_id);
            return Err(DomainError::DuplicateUser(
                "A user with this national id or email already exists".to_string(),
            ));
        }

        let user = User {
            id: User::generate_id(),
            national_id,
            full_name,
            email,
            created_at: Utc::now(),
        };
        self.user_repository.store_user(&user).await.map_err(|e| {
            DomainError::from_write(
                e,
                || DomainError::DuplicateUser("A user with this national id or email already exists".to_string()),
                || DomainError::validation("User violates a storage constraint"),
            )
        })?;

        let token = User::generate_session_token();
        self.user_repository.store_session(&token, &user.id).await?;

        info!("Registered user {}", user.id);
        Ok(RegisteredUser { user, token })
    }

    pub async fn me(&self, user_id: &str) -> DomainResult<User> {
        self.user_repository
            .get_user(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }
}

#[async_trait]
impl<C: Connection> IdentityProvider for UserService<C> {
    async fn resolve(&self, token: &str) -> DomainResult<Option<String>> {
        Ok(self.user_repository.find_session_user(token).await?)
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;

    async fn setup_test() -> UserService<DbConnection> {
        let connection = Arc::new(DbConnection::in_memory().await.expect("Failed to create test database"));
        UserService::new(connection)
    }

    fn register_command(national_id: &str, email: &str) -> RegisterUserCommand {
        RegisterUserCommand {
            national_id: national_id.to_string(),
            full_name: "Nadia Haddad".to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_issues_resolvable_token() {
        let service = setup_test().await;
        let registered = service
            .register(register_command("12345678", "Nadia@Example.com"))
            .await
            .unwrap();

        assert_eq!(registered.user.email, "nadia@example.com");
        let resolved = service.resolve(&registered.token).await.unwrap();
        assert_eq!(resolved.as_deref(), Some(registered.user.id.as_str()));
        assert_eq!(service.resolve("bogus").await.unwrap(), None);

        let me = service.me(&registered.user.id).await.unwrap();
        assert_eq!(me.national_id, "12345678");
    }

    #[tokio::test]
    async fn test_register_validation_and_duplicates() {
        let service = setup_test().await;

        assert!(matches!(
            service.register(register_command("1234", "a@example.com")).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.register(register_command("12345678", "not-an-email")).await,
            Err(DomainError::Validation(_))
        ));

        service.register(register_command("12345678", "a@example.com")).await.unwrap();
        assert!(matches!(
            service.register(register_command("12345678", "b@example.com")).await,
            Err(DomainError::DuplicateUser(_))
        ));
        assert!(matches!(
            service.register(register_command("87654321", "A@example.com")).await,
            Err(DomainError::DuplicateUser(_))
        ));
    }

    #[test]
    fn test_email_shape() {
        assert!(is_plausible_email("breeder@farm.io"));
        assert!(!is_plausible_email("breeder@farm"));
        assert!(!is_plausible_email("@farm.io"));
        assert!(!is_plausible_email("bre eder@farm.io"));
    }
}
