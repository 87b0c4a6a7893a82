// Negotiation engine: pure tiered decision over (listed, floor, offer)
use crate::model::NegotiationResponse;

/// Discount off the listed price used when a product records no floor.
pub const DEFAULT_FLOOR_RATIO: f64 = 0.85;

pub fn default_floor(listed_price: f64) -> f64 {
    DEFAULT_FLOOR_RATIO * listed_price
}

/// Tiers are evaluated in order; the first matching tier wins. Lower
/// bounds are inclusive. Total over all real inputs: a zero or negative
/// offer lands in the reject tier like any other lowball.
pub fn negotiate(listed_price: f64, floor_price: f64, offer: f64) -> NegotiationResponse {
    if offer >= listed_price {
        NegotiationResponse::AcceptListed {
            price: listed_price,
        }
    } else if offer >= 0.9 * listed_price {
        NegotiationResponse::AcceptOffer { price: offer }
    } else if offer >= 0.7 * listed_price {
        NegotiationResponse::Counter {
            price: ((offer + listed_price) / 2.0).max(floor_price),
        }
    } else {
        NegotiationResponse::Reject { floor: floor_price }
    }
}
