//! Conversions between the shared bird DTOs and the domain bird model.

use crate::domain::commands::birds::{
    BuyerInfoInput, CreateBirdCommand, PurchaseBirdCommand, SellBirdCommand, UpdateBirdCommand,
};
use crate::domain::models::bird::{Bird as DomainBird, BuyerInfo as DomainBuyerInfo};
use crate::storage::SoldTotals;
use shared::{
    Bird as SharedBird, BuyerInfo as SharedBuyerInfo, CreateBirdRequest, PurchaseBirdRequest,
    SellBirdRequest, SoldTotalsResponse, UpdateBirdRequest,
};

pub struct BirdMapper;

impl BirdMapper {
    pub fn to_dto(domain: DomainBird) -> SharedBird {
        SharedBird {
            id: domain.id,
            identifier: domain.identifier,
            species: domain.species,
            gender: domain.gender.as_str().to_string(),
            birth_date: domain.birth_date.format("%Y-%m-%d").to_string(),
            status: domain.status,
            ring: domain.ring,
            details: domain.details,
            sold: domain.sold,
            for_sale: domain.for_sale,
            asking_price: domain.asking_price,
            sold_date: domain.sold_date.map(|d| d.to_rfc3339()),
            sold_price: domain.sold_price,
            buyer_info: domain.buyer_info.map(Self::buyer_to_dto),
            owner: domain.owner_id,
            seller: domain.seller_id,
            mother: domain.mother_id,
            father: domain.father_id,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(birds: Vec<DomainBird>) -> Vec<SharedBird> {
        birds.into_iter().map(Self::to_dto).collect()
    }

    fn buyer_to_dto(buyer: DomainBuyerInfo) -> SharedBuyerInfo {
        SharedBuyerInfo {
            national_id: Some(buyer.national_id),
            full_name: Some(buyer.full_name),
            phone: Some(buyer.phone),
        }
    }

    pub fn to_create_command(request: CreateBirdRequest) -> CreateBirdCommand {
        CreateBirdCommand {
            identifier: request.identifier,
            species: request.species,
            gender: request.gender,
            birth_date: request.birth_date,
            status: request.status,
            ring: request.ring,
            details: request.details,
            mother_id: request.mother,
            father_id: request.father,
        }
    }

    pub fn to_update_command(request: UpdateBirdRequest) -> UpdateBirdCommand {
        UpdateBirdCommand {
            identifier: request.identifier,
            species: request.species,
            gender: request.gender,
            birth_date: request.birth_date,
            status: request.status,
            ring: request.ring,
            details: request.details,
            mother_id: request.mother,
            father_id: request.father,
        }
    }

    pub fn to_sell_command(request: SellBirdRequest) -> SellBirdCommand {
        SellBirdCommand {
            price: request.price,
            buyer_info: request.buyer_info.map(|buyer| BuyerInfoInput {
                national_id: buyer.national_id,
                full_name: buyer.full_name,
                phone: buyer.phone,
            }),
        }
    }

    pub fn to_purchase_command(request: PurchaseBirdRequest) -> PurchaseBirdCommand {
        PurchaseBirdCommand {
            status: request.status,
            ring: request.ring,
            details: request.details,
        }
    }

    pub fn to_totals_dto(totals: SoldTotals) -> SoldTotalsResponse {
        SoldTotalsResponse {
            count: totals.count,
            total_price: totals.total_price,
        }
    }
}
