use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Envelope wrapped around every API response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Returned by delete endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub id: String,
}

// ---------------------------------------------------------------------------
// Birds
// ---------------------------------------------------------------------------

/// Contact data of an external buyer, recorded when a bird is sold
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerInfo {
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bird {
    pub id: String,
    /// Breeder-assigned tag, unique across all birds
    pub identifier: String,
    pub species: String,
    /// One of "male", "female", "unknown"
    pub gender: String,
    /// Calendar date (YYYY-MM-DD)
    pub birth_date: String,
    pub status: String,
    pub ring: Option<String>,
    pub details: Option<String>,
    pub sold: bool,
    pub for_sale: bool,
    pub asking_price: Option<f64>,
    /// RFC 3339 timestamp of the sale
    pub sold_date: Option<String>,
    pub sold_price: Option<f64>,
    pub buyer_info: Option<BuyerInfo>,
    /// Current holder
    pub owner: String,
    /// Previous holder, set by a purchase
    pub seller: Option<String>,
    pub mother: Option<String>,
    pub father: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBirdRequest {
    pub identifier: String,
    pub species: String,
    #[serde(default)]
    pub gender: Option<String>,
    /// YYYY-MM-DD or RFC 3339
    pub birth_date: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ring: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub mother: Option<String>,
    #[serde(default)]
    pub father: Option<String>,
}

/// Partial update of a bird's descriptive fields.
///
/// For `ring`, `details`, `mother` and `father` an empty string clears the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBirdRequest {
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ring: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub mother: Option<String>,
    #[serde(default)]
    pub father: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkForSaleRequest {
    #[serde(default)]
    pub asking_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellBirdRequest {
    pub price: f64,
    #[serde(default)]
    pub buyer_info: Option<BuyerInfo>,
}

/// Extra descriptive fields merged into the bird by its new owner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseBirdRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ring: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoldTotalsResponse {
    pub count: u32,
    pub total_price: f64,
}

// ---------------------------------------------------------------------------
// Cages
// ---------------------------------------------------------------------------

/// A bird reference as sent by clients: either the bare id or an object
/// carrying `id` (or `_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BirdRef {
    Id(String),
    Object {
        #[serde(alias = "_id")]
        id: String,
    },
}

impl BirdRef {
    pub fn id(&self) -> &str {
        match self {
            BirdRef::Id(id) => id,
            BirdRef::Object { id } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cage {
    pub id: String,
    pub cage_number: String,
    pub male: Bird,
    pub female: Bird,
    pub species: String,
    /// One of "active", "inactive"
    pub status: String,
    pub notes: Option<String>,
    pub owner: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCageRequest {
    pub cage_number: String,
    pub male: BirdRef,
    pub female: BirdRef,
    pub species: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCageRequest {
    #[serde(default)]
    pub cage_number: Option<String>,
    #[serde(default)]
    pub male: Option<BirdRef>,
    #[serde(default)]
    pub female: Option<BirdRef>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Nests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nest {
    pub id: String,
    pub cage_number: String,
    pub cage: Cage,
    pub number_of_eggs: u32,
    pub fertilized_eggs: u32,
    pub extracted_eggs: u32,
    pub birds_exited: u32,
    pub exclusion_date: String,
    pub first_bird_exit_date: Option<String>,
    /// One of "active", "completed", "cancelled"
    pub status: String,
    pub notes: Option<String>,
    pub owner: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNestRequest {
    pub cage_number: String,
    pub number_of_eggs: i64,
    pub fertilized_eggs: i64,
    pub extracted_eggs: i64,
    #[serde(default)]
    pub birds_exited: Option<i64>,
    pub exclusion_date: String,
    #[serde(default)]
    pub first_bird_exit_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNestRequest {
    #[serde(default)]
    pub cage_number: Option<String>,
    #[serde(default)]
    pub number_of_eggs: Option<i64>,
    #[serde(default)]
    pub fertilized_eggs: Option<i64>,
    #[serde(default)]
    pub extracted_eggs: Option<i64>,
    #[serde(default)]
    pub birds_exited: Option<i64>,
    #[serde(default)]
    pub exclusion_date: Option<String>,
    #[serde(default)]
    pub first_bird_exit_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Pairs (computed, never stored)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairGroup {
    pub males: Vec<Bird>,
    pub females: Vec<Bird>,
}

/// Unsold birds grouped by species
pub type PairsResponse = BTreeMap<String, PairGroup>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePairRequest {
    pub male_id: String,
    pub female_id: String,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedPair {
    pub male: Bird,
    pub female: Bird,
    pub species: String,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub national_id: String,
    pub full_name: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub national_id: String,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserResponse {
    pub user: User,
    /// Bearer token for the `Authorization` header
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bird_ref_accepts_plain_id_and_object() {
        let plain: BirdRef = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(plain.id(), "abc");

        let object: BirdRef = serde_json::from_str(r#"{"_id": "def"}"#).unwrap();
        assert_eq!(object.id(), "def");

        let object: BirdRef = serde_json::from_str(r#"{"id": "ghi", "identifier": "B1"}"#).unwrap();
        assert_eq!(object.id(), "ghi");
    }

    #[test]
    fn test_error_envelope_omits_data() {
        let response: ApiResponse<Bird> = ApiResponse::error("Bird not found");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Bird not found");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_create_bird_request_uses_camel_case() {
        let request: CreateBirdRequest = serde_json::from_str(
            r#"{"identifier": "B1", "species": "Canary", "gender": "Male", "birthDate": "2024-03-01"}"#,
        )
        .unwrap();
        assert_eq!(request.birth_date, "2024-03-01");
        assert_eq!(request.gender.as_deref(), Some("Male"));
        assert!(request.mother.is_none());
    }
}
