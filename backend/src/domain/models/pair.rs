use chrono::{DateTime, Utc};

use super::bird::Bird;

/// Unsold birds of one species, split by gender
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesPairs {
    pub males: Vec<Bird>,
    pub females: Vec<Bird>,
}

/// A candidate pairing checked against the registry but never stored
#[derive(Debug, Clone, PartialEq)]
pub struct ProposedPair {
    pub male: Bird,
    pub female: Bird,
    pub species: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
