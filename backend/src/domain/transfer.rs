//! # Ownership and Transfer Rules
//!
//! The sale state machine of a bird, kept free of storage so the rules can be
//! checked in isolation:
//!
//! ```text
//! Active --mark_for_sale--> ListedForSale --sell-----> Sold (terminal)
//!                                         \--purchase--> Active (new owner)
//! ```
//!
//! Every transition is rejected once a bird is sold. The bird registry loads
//! the record, applies one of these functions and persists the result.

use chrono::{DateTime, Utc};

use super::error::{DomainError, DomainResult};
use super::models::bird::{Bird, BuyerInfo, Lifecycle, DEFAULT_STATUS, SOLD_STATUS};

/// List a bird on the marketplace, optionally with an asking price.
pub fn mark_for_sale(
    bird: &mut Bird,
    asking_price: Option<f64>,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    if bird.lifecycle() == Lifecycle::Sold {
        return Err(DomainError::InvalidTransition(
            "Cannot mark a sold bird for sale".to_string(),
        ));
    }

    bird.for_sale = true;
    if asking_price.is_some() {
        bird.asking_price = asking_price;
    }
    bird.updated_at = now;
    Ok(())
}

/// Record a sale to an external buyer. The bird stays with its owner as a
/// sold record and can no longer change hands.
pub fn sell(bird: &mut Bird, price: f64, buyer: BuyerInfo, now: DateTime<Utc>) -> DomainResult<()> {
    if bird.lifecycle() == Lifecycle::Sold {
        return Err(DomainError::InvalidTransition(
            "Bird has already been sold".to_string(),
        ));
    }

    bird.sold = true;
    bird.for_sale = false;
    bird.status = SOLD_STATUS.to_string();
    bird.sold_date = Some(now);
    bird.sold_price = Some(price);
    bird.buyer_info = Some(buyer);
    bird.updated_at = now;
    Ok(())
}

/// Hand a listed bird over to another registered user. The previous owner is
/// remembered as `seller` and the bird returns to `Active` for the buyer.
pub fn purchase(bird: &mut Bird, buyer_id: &str, now: DateTime<Utc>) -> DomainResult<()> {
    match bird.lifecycle() {
        Lifecycle::Sold => return Err(DomainError::AlreadySold),
        Lifecycle::Active => {
            return Err(DomainError::InvalidTransition(
                "Bird is not listed for sale".to_string(),
            ))
        }
        Lifecycle::ListedForSale => {}
    }
    if bird.is_owned_by(buyer_id) {
        return Err(DomainError::validation("You already own this bird"));
    }

    bird.seller_id = Some(std::mem::replace(&mut bird.owner_id, buyer_id.to_string()));
    bird.for_sale = false;
    bird.asking_price = None;
    if bird.status == SOLD_STATUS {
        bird.status = DEFAULT_STATUS.to_string();
    }
    bird.updated_at = now;
    Ok(())
}
