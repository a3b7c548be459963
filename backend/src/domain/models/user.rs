use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub national_id: String,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn generate_session_token() -> String {
        Uuid::new_v4().simple().to_string()
    }
}
