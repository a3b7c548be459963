use std::collections::BTreeMap;

use crate::domain::commands::pairs::ProposePairCommand;
use crate::domain::models::pair::{ProposedPair as DomainProposedPair, SpeciesPairs};
use shared::{CreatePairRequest, PairGroup, PairsResponse, ProposedPair as SharedProposedPair};

use super::bird_mapper::BirdMapper;

const PROPOSED_PAIR_STATUS: &str = "active";

pub struct PairMapper;

impl PairMapper {
    pub fn to_groups_dto(groups: BTreeMap<String, SpeciesPairs>) -> PairsResponse {
        groups
            .into_iter()
            .map(|(species, pairs)| {
                let group = PairGroup {
                    males: BirdMapper::to_dto_list(pairs.males),
                    females: BirdMapper::to_dto_list(pairs.females),
                };
                (species, group)
            })
            .collect()
    }

    pub fn to_proposed_dto(pair: DomainProposedPair) -> SharedProposedPair {
        SharedProposedPair {
            male: BirdMapper::to_dto(pair.male),
            female: BirdMapper::to_dto(pair.female),
            species: pair.species,
            notes: pair.notes,
            status: PROPOSED_PAIR_STATUS.to_string(),
            created_at: pair.created_at.to_rfc3339(),
        }
    }

    pub fn to_propose_command(request: CreatePairRequest) -> ProposePairCommand {
        ProposePairCommand {
            male_id: request.male_id,
            female_id: request.female_id,
            species: request.species,
            notes: request.notes,
        }
    }
}
