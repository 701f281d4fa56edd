use std::sync::Arc;

use actix_web::{web, HttpResponse};
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Client;
use serde::Deserialize;
use serde_json::json;

use crate::db::collections;
use crate::errors::{parse_object_id, ApiError};
use crate::models::booking::{Booking, BookingStatus};
use crate::models::time_slot::TimeSlot;
use crate::routes::{date_key, parse_date_param};
use crate::services::availability::{resolve_availability, AvailabilityContext, ExistingBooking};
use crate::services::clock::Clock;
use crate::services::day_classifier::{classify_day, HolidayCalendar};

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
}

/*
    GET /api/resorts/{id}/availability?date=YYYY-MM-DD
*/
pub async fn get_availability(
    path: web::Path<String>,
    query: web::Query<AvailabilityQuery>,
    data: web::Data<Arc<Client>>,
) -> Result<HttpResponse, ApiError> {
    let client = data.into_inner();
    let resort_id = parse_object_id(&path.into_inner(), "resort id")?;
    let date = parse_date_param(query.date.as_deref())?;
    let day_key = date_key(date);

    let resort = collections::resorts(&client)
        .find_one(doc! { "_id": resort_id })
        .await?
        .ok_or_else(|| ApiError::not_found("Resort"))?;

    // A resort without configured slots is not an error; the response just
    // carries an empty slot list.
    let slots: Vec<TimeSlot> = collections::time_slots(&client)
        .find(doc! { "resort_id": resort_id, "is_active": true })
        .sort(doc! { "sort_order": 1 })
        .await?
        .try_collect()
        .await?;

    let bookings: Vec<Booking> = collections::bookings(&client)
        .find(doc! {
            "resort_id": resort_id,
            "status": { "$in": BookingStatus::BLOCKING_WIRE_NAMES.to_vec() },
            "date_from": { "$lte": &day_key },
            "date_to": { "$gte": &day_key },
        })
        .await?
        .try_collect()
        .await?;

    let existing = to_existing_bookings(&bookings, &slots, &day_key);

    let clock = Clock::from_env();
    let holidays = HolidayCalendar::from_env();
    let day_type = classify_day(date, &holidays);

    let ctx = AvailabilityContext {
        date,
        today: clock.today(),
        current_hour: clock.current_hour(),
        allow_split_day: resort.allow_split_day,
        bookings: &existing,
    };
    let available_slots = resolve_availability(&slots, &ctx);

    Ok(HttpResponse::Ok().json(json!({
        "resort_id": resort_id.to_hex(),
        "date": day_key,
        "day_type": day_type,
        "use_advanced_pricing": resort.use_advanced_pricing,
        "allow_split_day": resort.allow_split_day,
        "downpayment_percentage": resort.downpayment_pct(),
        "available_slots": available_slots,
    })))
}

/// Resolve each booking's slot type, falling back to the referenced slot's
/// type when the booking did not record one of its own. Bookings whose
/// inclusive range does not contain `day` are dropped here so the resolver
/// only ever sees conflicts for the requested date.
pub(crate) fn to_existing_bookings(
    bookings: &[Booking],
    slots: &[TimeSlot],
    day: &str,
) -> Vec<ExistingBooking> {
    bookings
        .iter()
        .filter(|b| b.covers(day))
        .map(|b| {
            let slot_type = b.booking_type.or_else(|| {
                b.time_slot_id
                    .and_then(|id| slots.iter().find(|s| s.id == Some(id)).map(|s| s.slot_type))
            });
            ExistingBooking {
                time_slot_id: b.time_slot_id,
                slot_type,
                multi_day: b.is_multi_day(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::BookingStatus;
    use crate::models::time_slot::SlotType;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_booking_type_falls_back_to_referenced_slot() {
        let resort_id = ObjectId::new();
        let slot = TimeSlot {
            id: Some(ObjectId::new()),
            resort_id,
            slot_type: SlotType::Overnight,
            label: "Overnight".to_string(),
            start_time: "19:00".to_string(),
            end_time: "08:00".to_string(),
            crosses_midnight: true,
            hours: 13.0,
            is_active: true,
            sort_order: 1,
        };
        let booking = Booking {
            id: Some(ObjectId::new()),
            resort_id,
            guest_id: ObjectId::new(),
            date_from: "2025-06-20".to_string(),
            date_to: "2025-06-20".to_string(),
            status: BookingStatus::Confirmed,
            time_slot_id: slot.id,
            booking_type: None,
            guest_count: 4,
            total_price: 5000.0,
            downpayment_amount: 2500.0,
            created_at: None,
            updated_at: None,
        };

        let existing = to_existing_bookings(&[booking], &[slot], "2025-06-20");
        assert_eq!(existing[0].slot_type, Some(SlotType::Overnight));
        assert!(!existing[0].multi_day);
    }

    #[test]
    fn test_multi_day_range_counts_on_interior_and_boundary_dates_only() {
        let booking = Booking {
            id: Some(ObjectId::new()),
            resort_id: ObjectId::new(),
            guest_id: ObjectId::new(),
            date_from: "2025-06-20".to_string(),
            date_to: "2025-06-23".to_string(),
            status: BookingStatus::Confirmed,
            time_slot_id: None,
            booking_type: None,
            guest_count: 6,
            total_price: 20000.0,
            downpayment_amount: 10000.0,
            created_at: None,
            updated_at: None,
        };

        let interior = to_existing_bookings(std::slice::from_ref(&booking), &[], "2025-06-21");
        assert_eq!(interior.len(), 1);
        assert!(interior[0].multi_day);

        let last_day = to_existing_bookings(std::slice::from_ref(&booking), &[], "2025-06-23");
        assert_eq!(last_day.len(), 1);

        let after = to_existing_bookings(&[booking], &[], "2025-06-24");
        assert!(after.is_empty());
    }
}
