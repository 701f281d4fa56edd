use std::collections::HashMap;

use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use serde_json::json;

use crate::errors::ApiError;
use crate::models::guest_tier::GuestTier;
use crate::models::pricing::{DayType, PricingMatrixEntry};
use crate::models::resort::Resort;
use crate::models::time_slot::TimeSlot;

/// What both pricing modes produce: a total and the upfront share of it.
#[derive(Debug, Serialize, Clone, Copy)]
pub struct Quote {
    pub total_price: f64,
    pub downpayment_amount: f64,
    pub downpayment_percentage: f64,
}

/// Round-half-up in whole currency units. Prices in this domain carry no
/// fractional centavos.
pub fn downpayment(total_price: f64, percentage: f64) -> f64 {
    (total_price * percentage / 100.0).round()
}

fn quote(total_price: f64, percentage: f64) -> Quote {
    Quote {
        total_price,
        downpayment_amount: downpayment(total_price, percentage),
        downpayment_percentage: percentage,
    }
}

/// First tier (in configured sort order) whose inclusive range contains the
/// guest count. Gaps between tiers simply fail to match.
pub fn match_tier(guest_count: u32, tiers: &[GuestTier]) -> Option<&GuestTier> {
    tiers.iter().find(|t| t.matches(guest_count))
}

/// Matching failure is an owner-configuration gap, reported with the full
/// tier list so the client can show valid ranges.
pub fn match_tier_or_err(guest_count: u32, tiers: &[GuestTier]) -> Result<&GuestTier, ApiError> {
    match_tier(guest_count, tiers).ok_or_else(|| ApiError::Configuration {
        message: format!("No guest tier matches a party of {}", guest_count),
        detail: json!({
            "guest_count": guest_count,
            "available_tiers": tiers
                .iter()
                .map(|t| {
                    json!({
                        "label": t.label,
                        "min_guests": t.min_guests,
                        "max_guests": t.max_guests,
                    })
                })
                .collect::<Vec<_>>(),
        }),
    })
}

/// Sparse matrix keyed by (slot, tier, day type). Most cells are
/// unpopulated, so a map beats a dense 3-D structure.
#[derive(Debug, Default)]
pub struct PriceMatrix {
    cells: HashMap<(ObjectId, ObjectId, DayType), f64>,
}

impl PriceMatrix {
    pub fn from_entries(entries: impl IntoIterator<Item = PricingMatrixEntry>) -> Self {
        let cells = entries
            .into_iter()
            .map(|e| ((e.time_slot_id, e.guest_tier_id, e.day_type), e.price))
            .collect();
        Self { cells }
    }

    pub fn price_for(&self, slot_id: ObjectId, tier_id: ObjectId, day_type: DayType) -> Option<f64> {
        self.cells.get(&(slot_id, tier_id, day_type)).copied()
    }
}

/// Flat mode: the resort's single price. Unset means the owner has not
/// finished configuring pricing.
pub fn flat_quote(resort: &Resort) -> Result<Quote, ApiError> {
    let price = resort.price.ok_or_else(|| ApiError::Configuration {
        message: "Resort has no price configured".to_string(),
        detail: json!({ "resort": resort.name }),
    })?;
    Ok(quote(price, resort.downpayment_pct()))
}

/// Advanced mode: exact (slot, tier, day type) cell, already-resolved inputs.
/// A missing cell names all three dimensions so the owner knows which cell to
/// fill.
pub fn advanced_quote(
    resort: &Resort,
    slot: &TimeSlot,
    tier: &GuestTier,
    day_type: DayType,
    matrix: &PriceMatrix,
) -> Result<Quote, ApiError> {
    let slot_id = slot
        .id
        .ok_or_else(|| ApiError::not_found("Time slot"))?;
    let tier_id = tier
        .id
        .ok_or_else(|| ApiError::not_found("Guest tier"))?;

    let price = matrix
        .price_for(slot_id, tier_id, day_type)
        .ok_or_else(|| ApiError::Configuration {
            message: format!(
                "No price configured for {} / {} on a {}",
                slot.label, tier.label, day_type
            ),
            detail: json!({
                "time_slot": slot.label,
                "guest_tier": tier.label,
                "day_type": day_type,
            }),
        })?;

    Ok(quote(price, resort.downpayment_pct()))
}
