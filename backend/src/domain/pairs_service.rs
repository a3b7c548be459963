//! Computed pairing view over the owner's unsold birds. Nothing here is stored;
//! persisted pairings are cages.

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{
    commands::pairs::ProposePairCommand,
    error::{DomainError, DomainResult},
    models::{
        bird::{Bird, Gender},
        pair::{ProposedPair, SpeciesPairs},
    },
    validation::optional_text,
};
use crate::storage::{BirdListing, BirdStorage, Connection};

#[derive(Clone)]
pub struct PairsService<C: Connection> {
    bird_repository: C::BirdRepository,
}

impl<C: Connection> PairsService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            bird_repository: connection.create_bird_repository(),
        }
    }

    /// Unsold birds keyed by species. Birds of unknown gender are left out.
    pub async fn group_by_species(&self, owner_id: &str) -> DomainResult<BTreeMap<String, SpeciesPairs>> {
        let birds = self
            .bird_repository
            .list_birds(&BirdListing::Unsold { owner_id: owner_id.to_string() })
            .await?;

        let mut groups: BTreeMap<String, SpeciesPairs> = BTreeMap::new();
        for bird in birds {
            match bird.gender {
                Gender::Male => groups.entry(bird.species.clone()).or_default().males.push(bird),
                Gender::Female => groups.entry(bird.species.clone()).or_default().females.push(bird),
                Gender::Unknown => {}
            }
        }

        info!("Grouped birds of owner {} into {} species", owner_id, groups.len());
        Ok(groups)
    }

    pub async fn propose_pair(
        &self,
        owner_id: &str,
        command: ProposePairCommand,
    ) -> DomainResult<ProposedPair> {
        let male = self.owned_bird(&command.male_id, owner_id).await?;
        let female = self.owned_bird(&command.female_id, owner_id).await?;
        if male.id == female.id {
            return Err(DomainError::validation(
                "Male and female must be different birds",
            ));
        }

        let species = optional_text(command.species).unwrap_or_else(|| male.species.clone());
        info!("Proposed pair {} x {} ({})", male.identifier, female.identifier, species);
        Ok(ProposedPair {
            male,
            female,
            species,
            notes: optional_text(command.notes),
            created_at: Utc::now(),
        })
    }

    async fn owned_bird(&self, bird_id: &str, owner_id: &str) -> DomainResult<Bird> {
        self.bird_repository
            .get_owned_bird(bird_id.trim(), owner_id)
            .await?
            .ok_or_else(|| {
                warn!("Bird {} not found for owner {}", bird_id, owner_id);
                DomainError::not_found("One or more birds not found")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bird_service::BirdService;
    use crate::domain::commands::birds::CreateBirdCommand;
    use crate::storage::DbConnection;

    async fn setup_test() -> (PairsService<DbConnection>, BirdService<DbConnection>) {
        let connection = Arc::new(DbConnection::in_memory().await.expect("Failed to create test database"));
        (PairsService::new(connection.clone()), BirdService::new(connection))
    }

    async fn add_bird(birds: &BirdService<DbConnection>, owner: &str, identifier: &str, species: &str, gender: &str) -> Bird {
        let command = CreateBirdCommand {
            identifier: identifier.to_string(),
            species: species.to_string(),
            gender: Some(gender.to_string()),
            birth_date: "2023-01-15".to_string(),
            ..Default::default()
        };
        birds.create_bird(owner, command).await.unwrap()
    }

    #[tokio::test]
    async fn test_group_by_species() {
        let (pairs, birds) = setup_test().await;
        add_bird(&birds, "alice", "G1", "Goldfinch", "male").await;
        add_bird(&birds, "alice", "C1", "Canary", "male").await;
        add_bird(&birds, "alice", "C2", "Canary", "female").await;
        add_bird(&birds, "alice", "C3", "Canary", "unknown").await;
        add_bird(&birds, "bob", "C4", "Canary", "female").await;

        let groups = pairs.group_by_species("alice").await.unwrap();
        let species: Vec<&String> = groups.keys().collect();
        assert_eq!(species, vec!["Canary", "Goldfinch"]);

        let canary = &groups["Canary"];
        assert_eq!(canary.males.len(), 1);
        assert_eq!(canary.females.len(), 1);
        assert_eq!(canary.females[0].identifier, "C2");
        assert!(groups["Goldfinch"].females.is_empty());
    }

    #[tokio::test]
    async fn test_propose_pair() {
        let (pairs, birds) = setup_test().await;
        let male = add_bird(&birds, "alice", "C1", "Canary", "male").await;
        let female = add_bird(&birds, "alice", "C2", "Canary", "female").await;
        let foreign = add_bird(&birds, "bob", "C3", "Canary", "female").await;

        let command = |female_id: &str| ProposePairCommand {
            male_id: male.id.clone(),
            female_id: female_id.to_string(),
            species: None,
            notes: Some("First season".to_string()),
        };

        let pair = pairs.propose_pair("alice", command(&female.id)).await.unwrap();
        assert_eq!(pair.species, "Canary");
        assert_eq!(pair.female.identifier, "C2");

        assert!(matches!(
            pairs.propose_pair("alice", command(&foreign.id)).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            pairs.propose_pair("alice", command(&male.id)).await,
            Err(DomainError::Validation(_))
        ));
    }
}
