use std::sync::Arc;

use actix_web::{web, HttpResponse};
use bson::{doc, DateTime};
use chrono::NaiveDate;
use futures::TryStreamExt;
use mongodb::Client;
use serde::Deserialize;
use serde_json::json;

use crate::db::collections;
use crate::errors::{parse_object_id, ApiError};
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::booking::{Booking, BookingStatus};
use crate::models::guest_tier::GuestTier;
use crate::models::pricing::PricingMatrixEntry;
use crate::models::resort::Resort;
use crate::models::time_slot::TimeSlot;
use crate::routes::availability::to_existing_bookings;
use crate::routes::date_key;
use crate::services::availability::{resolve_availability, AvailabilityContext};
use crate::services::clock::Clock;
use crate::services::day_classifier::{classify_day, HolidayCalendar};
use crate::services::pricing::{
    advanced_quote, downpayment, flat_quote, match_tier_or_err, PriceMatrix, Quote,
};

#[derive(Debug, Deserialize)]
pub struct BookingInput {
    pub date_from: String,
    /// Defaults to date_from (single-day booking).
    #[serde(default)]
    pub date_to: Option<String>,
    /// Required for single-day bookings; multi-day stays hold the whole
    /// resort and carry no slot.
    #[serde(default)]
    pub time_slot_id: Option<String>,
    pub guest_count: u32,
}

/*
    POST /api/resorts/{id}/bookings

    Availability and price are both re-validated server-side here; the quote
    the guest saw earlier is never trusted.
*/
pub async fn create_booking(
    path: web::Path<String>,
    input: web::Json<BookingInput>,
    data: web::Data<Arc<Client>>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let client = data.into_inner();
    let resort_id = parse_object_id(&path.into_inner(), "resort id")?;
    let input = input.into_inner();
    let guest_id = parse_object_id(&user.user_id, "user id")?;

    if input.guest_count == 0 {
        return Err(ApiError::validation("guest_count must be at least 1"));
    }

    let date_from = parse_booking_date(&input.date_from)?;
    let date_to = match input.date_to.as_deref() {
        Some(raw) => parse_booking_date(raw)?,
        None => date_from,
    };
    if date_to < date_from {
        return Err(ApiError::validation("date_to must not be before date_from"));
    }

    let resort = collections::resorts(&client)
        .find_one(doc! { "_id": resort_id })
        .await?
        .ok_or_else(|| ApiError::not_found("Resort"))?;

    let clock = Clock::from_env();
    if date_from < clock.today() {
        return Err(ApiError::validation("Cannot book past dates"));
    }

    let (quote, time_slot) = if date_from == date_to {
        let slot = validate_single_day(&client, &resort, date_from, &input, &clock).await?;
        let quote = quote_single_day(&client, &resort, date_from, &slot, input.guest_count).await?;
        (quote, Some(slot))
    } else {
        (
            validate_and_quote_multi_day(&client, &resort, date_from, date_to).await?,
            None,
        )
    };

    let now = DateTime::now();
    let booking = Booking {
        id: None,
        resort_id,
        guest_id,
        date_from: date_key(date_from),
        date_to: date_key(date_to),
        status: BookingStatus::Pending,
        time_slot_id: time_slot.as_ref().and_then(|s| s.id),
        booking_type: time_slot.as_ref().map(|s| s.slot_type),
        guest_count: input.guest_count,
        total_price: quote.total_price,
        downpayment_amount: quote.downpayment_amount,
        created_at: Some(now),
        updated_at: Some(now),
    };

    let insert_result = collections::bookings(&client).insert_one(&booking).await?;
    let booking_id = insert_result
        .inserted_id
        .as_object_id()
        .map(|id| id.to_hex())
        .unwrap_or_default();

    log::info!(
        "created pending booking {} for resort {}",
        booking_id,
        resort_id.to_hex()
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "booking_id": booking_id,
        "status": "pending",
        "total_price": quote.total_price,
        "downpayment_amount": quote.downpayment_amount,
        "downpayment_percentage": quote.downpayment_percentage,
    })))
}

/*
    GET /api/account/{user_id}/bookings
*/
pub async fn get_user_bookings(
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    if path.into_inner() != user.user_id {
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }
    let client = data.into_inner();
    let guest_id = parse_object_id(&user.user_id, "user id")?;

    let bookings: Vec<Booking> = collections::bookings(&client)
        .find(doc! { "guest_id": guest_id })
        .sort(doc! { "created_at": -1 })
        .await?
        .try_collect()
        .await?;

    Ok(HttpResponse::Ok().json(bookings))
}

fn parse_booking_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::validation("booking dates must be formatted YYYY-MM-DD"))
}

/// The requested slot must come out of the same resolver the availability
/// endpoint uses, so a guest cannot book around a rule by calling this
/// endpoint directly.
async fn validate_single_day(
    client: &Client,
    resort: &Resort,
    date: NaiveDate,
    input: &BookingInput,
    clock: &Clock,
) -> Result<TimeSlot, ApiError> {
    let resort_id = resort
        .id
        .ok_or_else(|| ApiError::not_found("Resort"))?;
    let slot_raw = input
        .time_slot_id
        .as_deref()
        .ok_or_else(|| ApiError::validation("time_slot_id is required for single-day bookings"))?;
    let slot_id = parse_object_id(slot_raw, "time slot id")?;

    let slots: Vec<TimeSlot> = collections::time_slots(client)
        .find(doc! { "resort_id": resort_id, "is_active": true })
        .sort(doc! { "sort_order": 1 })
        .await?
        .try_collect()
        .await?;
    let slot = slots
        .iter()
        .find(|s| s.id == Some(slot_id))
        .cloned()
        .ok_or_else(|| ApiError::not_found("Time slot"))?;

    let day = date_key(date);
    let bookings: Vec<Booking> = collections::bookings(client)
        .find(doc! {
            "resort_id": resort_id,
            "status": { "$in": BookingStatus::BLOCKING_WIRE_NAMES.to_vec() },
            "date_from": { "$lte": &day },
            "date_to": { "$gte": &day },
        })
        .await?
        .try_collect()
        .await?;
    let existing = to_existing_bookings(&bookings, &slots, &day);

    let ctx = AvailabilityContext {
        date,
        today: clock.today(),
        current_hour: clock.current_hour(),
        allow_split_day: resort.allow_split_day,
        bookings: &existing,
    };
    let results = resolve_availability(&slots, &ctx);
    let entry = results
        .iter()
        .find(|r| r.slot_id == slot_id.to_hex())
        .ok_or_else(|| ApiError::not_found("Time slot"))?;

    if !entry.is_available {
        let reason = entry
            .unavailable_reason
            .clone()
            .unwrap_or_else(|| "Slot is no longer available".to_string());
        return Err(ApiError::Conflict(reason));
    }

    Ok(slot)
}

async fn quote_single_day(
    client: &Client,
    resort: &Resort,
    date: NaiveDate,
    slot: &TimeSlot,
    guest_count: u32,
) -> Result<Quote, ApiError> {
    if !resort.use_advanced_pricing {
        return flat_quote(resort);
    }
    let resort_id = resort
        .id
        .ok_or_else(|| ApiError::not_found("Resort"))?;

    let tiers: Vec<GuestTier> = collections::guest_tiers(client)
        .find(doc! { "resort_id": resort_id, "is_active": true })
        .sort(doc! { "sort_order": 1 })
        .await?
        .try_collect()
        .await?;
    let tier = match_tier_or_err(guest_count, &tiers)?;

    let entries: Vec<PricingMatrixEntry> = collections::pricing_matrix(client)
        .find(doc! { "resort_id": resort_id })
        .await?
        .try_collect()
        .await?;
    let matrix = PriceMatrix::from_entries(entries);

    let day_type = classify_day(date, &HolidayCalendar::from_env());
    advanced_quote(resort, slot, tier, day_type, &matrix)
}

/// Multi-day stays hold every slot on every date in the range, so the range
/// must be completely free. They price off the flat rate per day; the slot
/// matrix has no multi-day cells.
async fn validate_and_quote_multi_day(
    client: &Client,
    resort: &Resort,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> Result<Quote, ApiError> {
    let resort_id = resort
        .id
        .ok_or_else(|| ApiError::not_found("Resort"))?;

    let conflict = collections::bookings(client)
        .find_one(doc! {
            "resort_id": resort_id,
            "status": { "$in": BookingStatus::BLOCKING_WIRE_NAMES.to_vec() },
            "date_from": { "$lte": date_key(date_to) },
            "date_to": { "$gte": date_key(date_from) },
        })
        .await?;
    if conflict.is_some() {
        return Err(ApiError::Conflict(
            "The requested dates are no longer available".to_string(),
        ));
    }

    let daily_rate = resort.price.ok_or_else(|| ApiError::Configuration {
        message: "Multi-day stays require a flat price".to_string(),
        detail: json!({ "resort": resort.name }),
    })?;
    let days = (date_to - date_from).num_days() + 1;
    let total = daily_rate * days as f64;
    let pct = resort.downpayment_pct();

    Ok(Quote {
        total_price: total,
        downpayment_amount: downpayment(total, pct),
        downpayment_percentage: pct,
    })
}
