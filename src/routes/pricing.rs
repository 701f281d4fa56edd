use std::sync::Arc;

use actix_web::{web, HttpResponse};
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Client;
use serde::Deserialize;
use serde_json::json;

use crate::db::collections;
use crate::errors::{parse_object_id, ApiError};
use crate::models::guest_tier::GuestTier;
use crate::models::pricing::PricingMatrixEntry;
use crate::routes::parse_date_param;
use crate::services::day_classifier::{classify_day, HolidayCalendar};
use crate::services::pricing::{advanced_quote, flat_quote, match_tier_or_err, PriceMatrix};

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub date: Option<String>,
    pub time_slot_id: Option<String>,
    pub guest_count: Option<u32>,
}

/*
    GET /api/resorts/{id}/calculate-price?date=..&time_slot_id=..&guest_count=..

    Flat-price resorts answer from the single configured price and ignore
    the slot/guest parameters; advanced resorts resolve the full
    (slot, tier, day type) cell.
*/
pub async fn calculate_price(
    path: web::Path<String>,
    query: web::Query<PriceQuery>,
    data: web::Data<Arc<Client>>,
) -> Result<HttpResponse, ApiError> {
    let client = data.into_inner();
    let resort_id = parse_object_id(&path.into_inner(), "resort id")?;
    let date = parse_date_param(query.date.as_deref())?;

    let resort = collections::resorts(&client)
        .find_one(doc! { "_id": resort_id })
        .await?
        .ok_or_else(|| ApiError::not_found("Resort"))?;

    if !resort.use_advanced_pricing {
        let quote = flat_quote(&resort)?;
        return Ok(HttpResponse::Ok().json(json!({
            "use_advanced_pricing": false,
            "total_price": quote.total_price,
            "downpayment_amount": quote.downpayment_amount,
            "downpayment_percentage": quote.downpayment_percentage,
        })));
    }

    let slot_raw = query
        .time_slot_id
        .as_deref()
        .ok_or_else(|| ApiError::validation("time_slot_id query parameter is required"))?;
    let slot_id = parse_object_id(slot_raw, "time slot id")?;
    let guest_count = query
        .guest_count
        .ok_or_else(|| ApiError::validation("guest_count query parameter is required"))?;
    if guest_count == 0 {
        return Err(ApiError::validation("guest_count must be at least 1"));
    }

    let slot = collections::time_slots(&client)
        .find_one(doc! { "_id": slot_id, "resort_id": resort_id })
        .await?
        .ok_or_else(|| ApiError::not_found("Time slot"))?;

    let tiers: Vec<GuestTier> = collections::guest_tiers(&client)
        .find(doc! { "resort_id": resort_id, "is_active": true })
        .sort(doc! { "sort_order": 1 })
        .await?
        .try_collect()
        .await?;
    let tier = match_tier_or_err(guest_count, &tiers)?;

    let day_type = classify_day(date, &HolidayCalendar::from_env());

    let entries: Vec<PricingMatrixEntry> = collections::pricing_matrix(&client)
        .find(doc! { "resort_id": resort_id })
        .await?
        .try_collect()
        .await?;
    let matrix = PriceMatrix::from_entries(entries);

    let quote = advanced_quote(&resort, &slot, tier, day_type, &matrix)?;

    Ok(HttpResponse::Ok().json(json!({
        "use_advanced_pricing": true,
        "time_slot": {
            "slot_id": slot_id.to_hex(),
            "slot_type": slot.slot_type,
            "label": slot.label,
        },
        "guest_tier": {
            "label": tier.label,
            "min_guests": tier.min_guests,
            "max_guests": tier.max_guests,
        },
        "day_type": day_type,
        "guest_count": guest_count,
        "total_price": quote.total_price,
        "downpayment_amount": quote.downpayment_amount,
        "downpayment_percentage": quote.downpayment_percentage,
    })))
}
