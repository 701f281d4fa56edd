use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{web, HttpResponse};
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Client, ClientSession};
use serde::Deserialize;
use serde_json::json;

use crate::db::collections;
use crate::errors::{parse_object_id, ApiError};
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::guest_tier::GuestTier;
use crate::models::pricing::{DayType, PricingMatrixEntry};
use crate::models::time_slot::{SlotType, TimeSlot};

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct TimeSlotInput {
    /// Optional client-supplied id so a configuration export can be
    /// re-imported with its matrix id references intact.
    #[serde(default)]
    pub id: Option<String>,
    pub slot_type: SlotType,
    pub label: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub crosses_midnight: bool,
    pub hours: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
pub struct GuestTierInput {
    #[serde(default)]
    pub id: Option<String>,
    pub label: String,
    pub min_guests: u32,
    #[serde(default)]
    pub max_guests: Option<u32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

/// Matrix rows reference their slot and tier either by id or by label; both
/// are resolved against the rows in this same request.
#[derive(Debug, Deserialize)]
pub struct MatrixEntryInput {
    #[serde(default)]
    pub time_slot_id: Option<String>,
    #[serde(default)]
    pub time_slot_label: Option<String>,
    #[serde(default)]
    pub guest_tier_id: Option<String>,
    #[serde(default)]
    pub guest_tier_label: Option<String>,
    pub day_type: DayType,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
pub struct PricingConfigInput {
    pub time_slots: Vec<TimeSlotInput>,
    pub guest_tiers: Vec<GuestTierInput>,
    #[serde(default)]
    pub pricing_matrix: Vec<MatrixEntryInput>,
}

/*
    PUT /api/resorts/{id}/pricing-config (owner only)

    Bulk replace: the whole slot set, tier set, and matrix are deleted and
    re-inserted inside one transaction, so concurrent readers never observe a
    half-written configuration.
*/
pub async fn replace_pricing_config(
    path: web::Path<String>,
    input: web::Json<PricingConfigInput>,
    data: web::Data<Arc<Client>>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let client = data.into_inner();
    let resort_id = parse_object_id(&path.into_inner(), "resort id")?;
    let input = input.into_inner();

    let resort = collections::resorts(&client)
        .find_one(doc! { "_id": resort_id })
        .await?
        .ok_or_else(|| ApiError::not_found("Resort"))?;

    if resort.owner_id.to_hex() != user.user_id {
        return Err(ApiError::Forbidden(
            "Only the resort owner can change its pricing configuration".to_string(),
        ));
    }

    let slots = build_slots(resort_id, &input.time_slots)?;
    let tiers = build_tiers(resort_id, &input.guest_tiers)?;
    let entries = resolve_matrix(resort_id, &input.pricing_matrix, &slots, &tiers)?;

    let mut session = client.start_session().await?;
    session.start_transaction().await?;

    match write_config(&client, &mut session, resort_id, &slots, &tiers, &entries).await {
        Ok(()) => {
            session.commit_transaction().await?;
            log::info!(
                "replaced pricing config for resort {} ({} slots, {} tiers, {} matrix rows)",
                resort_id.to_hex(),
                slots.len(),
                tiers.len(),
                entries.len()
            );
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "time_slots": slots.len(),
                "guest_tiers": tiers.len(),
                "pricing_matrix": entries.len(),
            })))
        }
        Err(err) => {
            if let Err(abort_err) = session.abort_transaction().await {
                log::error!("failed to abort pricing config transaction: {:?}", abort_err);
            }
            Err(err)
        }
    }
}

async fn write_config(
    client: &Client,
    session: &mut ClientSession,
    resort_id: ObjectId,
    slots: &[TimeSlot],
    tiers: &[GuestTier],
    entries: &[PricingMatrixEntry],
) -> Result<(), ApiError> {
    let filter = doc! { "resort_id": resort_id };

    collections::time_slots(client)
        .delete_many(filter.clone())
        .session(&mut *session)
        .await?;
    collections::guest_tiers(client)
        .delete_many(filter.clone())
        .session(&mut *session)
        .await?;
    collections::pricing_matrix(client)
        .delete_many(filter)
        .session(&mut *session)
        .await?;

    if !slots.is_empty() {
        collections::time_slots(client)
            .insert_many(slots)
            .session(&mut *session)
            .await?;
    }
    if !tiers.is_empty() {
        collections::guest_tiers(client)
            .insert_many(tiers)
            .session(&mut *session)
            .await?;
    }
    if !entries.is_empty() {
        collections::pricing_matrix(client)
            .insert_many(entries)
            .session(&mut *session)
            .await?;
    }
    Ok(())
}

fn build_slots(resort_id: ObjectId, inputs: &[TimeSlotInput]) -> Result<Vec<TimeSlot>, ApiError> {
    let mut slots = Vec::with_capacity(inputs.len());
    for input in inputs {
        if input.hours <= 0.0 {
            return Err(ApiError::validation(format!(
                "Time slot '{}' must have a positive duration",
                input.label
            )));
        }
        let id = match &input.id {
            Some(raw) => parse_object_id(raw, "time slot id")?,
            None => ObjectId::new(),
        };
        slots.push(TimeSlot {
            id: Some(id),
            resort_id,
            slot_type: input.slot_type,
            label: input.label.clone(),
            start_time: input.start_time.clone(),
            end_time: input.end_time.clone(),
            crosses_midnight: input.crosses_midnight,
            hours: input.hours,
            is_active: input.is_active,
            sort_order: input.sort_order,
        });
    }
    ensure_unique_labels(slots.iter().map(|s| s.label.as_str()), "time slot")?;
    Ok(slots)
}

fn build_tiers(resort_id: ObjectId, inputs: &[GuestTierInput]) -> Result<Vec<GuestTier>, ApiError> {
    let mut tiers = Vec::with_capacity(inputs.len());
    for input in inputs {
        if let Some(max) = input.max_guests {
            if max < input.min_guests {
                return Err(ApiError::validation(format!(
                    "Guest tier '{}' has max_guests below min_guests",
                    input.label
                )));
            }
        }
        let id = match &input.id {
            Some(raw) => parse_object_id(raw, "guest tier id")?,
            None => ObjectId::new(),
        };
        tiers.push(GuestTier {
            id: Some(id),
            resort_id,
            label: input.label.clone(),
            min_guests: input.min_guests,
            max_guests: input.max_guests,
            is_active: input.is_active,
            sort_order: input.sort_order,
        });
    }
    ensure_unique_labels(tiers.iter().map(|t| t.label.as_str()), "guest tier")?;
    Ok(tiers)
}

/// Labels double as matrix references, so they must be unique per request.
fn ensure_unique_labels<'a>(
    labels: impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<(), ApiError> {
    let mut seen = std::collections::HashSet::new();
    for label in labels {
        if !seen.insert(label) {
            return Err(ApiError::validation(format!(
                "Duplicate {} label '{}'",
                what, label
            )));
        }
    }
    Ok(())
}

fn resolve_matrix(
    resort_id: ObjectId,
    inputs: &[MatrixEntryInput],
    slots: &[TimeSlot],
    tiers: &[GuestTier],
) -> Result<Vec<PricingMatrixEntry>, ApiError> {
    let slot_by_label: HashMap<&str, ObjectId> = slots
        .iter()
        .filter_map(|s| s.id.map(|id| (s.label.as_str(), id)))
        .collect();
    let tier_by_label: HashMap<&str, ObjectId> = tiers
        .iter()
        .filter_map(|t| t.id.map(|id| (t.label.as_str(), id)))
        .collect();
    let slot_ids: Vec<ObjectId> = slots.iter().filter_map(|s| s.id).collect();
    let tier_ids: Vec<ObjectId> = tiers.iter().filter_map(|t| t.id).collect();

    let mut entries = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        if input.price < 0.0 {
            return Err(ApiError::validation(format!(
                "Matrix row {} has a negative price",
                index
            )));
        }

        let time_slot_id = resolve_ref(
            index,
            input.time_slot_id.as_deref(),
            input.time_slot_label.as_deref(),
            &slot_by_label,
            &slot_ids,
            "time slot",
        )?;
        let guest_tier_id = resolve_ref(
            index,
            input.guest_tier_id.as_deref(),
            input.guest_tier_label.as_deref(),
            &tier_by_label,
            &tier_ids,
            "guest tier",
        )?;

        entries.push(PricingMatrixEntry {
            id: Some(ObjectId::new()),
            resort_id,
            time_slot_id,
            guest_tier_id,
            day_type: input.day_type,
            price: input.price,
        });
    }
    Ok(entries)
}

/// Ids win over labels when both are given; either way the reference must
/// land on a row from this same request, never on another resort's rows.
fn resolve_ref(
    index: usize,
    id: Option<&str>,
    label: Option<&str>,
    by_label: &HashMap<&str, ObjectId>,
    known_ids: &[ObjectId],
    what: &str,
) -> Result<ObjectId, ApiError> {
    if let Some(raw) = id {
        let oid = parse_object_id(raw, &format!("{} id", what))?;
        if !known_ids.contains(&oid) {
            return Err(ApiError::validation(format!(
                "Matrix row {} references a {} id not present in this configuration",
                index, what
            )));
        }
        return Ok(oid);
    }
    if let Some(label) = label {
        return by_label.get(label).copied().ok_or_else(|| {
            ApiError::validation(format!(
                "Matrix row {} references unknown {} label '{}'",
                index, what, label
            ))
        });
    }
    Err(ApiError::validation(format!(
        "Matrix row {} is missing a {} reference",
        index, what
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot_input(label: &str, id: Option<String>) -> TimeSlotInput {
        TimeSlotInput {
            id,
            slot_type: SlotType::Daytour,
            label: label.to_string(),
            start_time: "08:00".to_string(),
            end_time: "20:00".to_string(),
            crosses_midnight: false,
            hours: 12.0,
            is_active: true,
            sort_order: 0,
        }
    }

    fn tier_input(label: &str, min: u32, max: Option<u32>) -> GuestTierInput {
        GuestTierInput {
            id: None,
            label: label.to_string(),
            min_guests: min,
            max_guests: max,
            is_active: true,
            sort_order: 0,
        }
    }

    fn matrix_input(slot_label: &str, tier_label: &str, price: f64) -> MatrixEntryInput {
        MatrixEntryInput {
            time_slot_id: None,
            time_slot_label: Some(slot_label.to_string()),
            guest_tier_id: None,
            guest_tier_label: Some(tier_label.to_string()),
            day_type: DayType::Weekend,
            price,
        }
    }

    #[test]
    fn test_matrix_rows_resolve_by_label() {
        let resort_id = ObjectId::new();
        let slots = build_slots(resort_id, &[slot_input("Day Tour", None)]).unwrap();
        let tiers = build_tiers(resort_id, &[tier_input("1-4 guests", 1, Some(4))]).unwrap();

        let entries = resolve_matrix(
            resort_id,
            &[matrix_input("Day Tour", "1-4 guests", 3000.0)],
            &slots,
            &tiers,
        )
        .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].time_slot_id, slots[0].id.unwrap());
        assert_eq!(entries[0].guest_tier_id, tiers[0].id.unwrap());
        assert_eq!(entries[0].price, 3000.0);
    }

    #[test]
    fn test_matrix_rows_resolve_by_reimported_id() {
        let resort_id = ObjectId::new();
        let slot_id = ObjectId::new();
        let slots =
            build_slots(resort_id, &[slot_input("Day Tour", Some(slot_id.to_hex()))]).unwrap();
        let tiers = build_tiers(resort_id, &[tier_input("1-4 guests", 1, Some(4))]).unwrap();

        let entry = MatrixEntryInput {
            time_slot_id: Some(slot_id.to_hex()),
            time_slot_label: None,
            guest_tier_id: None,
            guest_tier_label: Some("1-4 guests".to_string()),
            day_type: DayType::Weekday,
            price: 2500.0,
        };
        let entries = resolve_matrix(resort_id, &[entry], &slots, &tiers).unwrap();
        assert_eq!(entries[0].time_slot_id, slot_id);
    }

    #[test]
    fn test_unknown_label_fails_the_whole_request() {
        let resort_id = ObjectId::new();
        let slots = build_slots(resort_id, &[slot_input("Day Tour", None)]).unwrap();
        let tiers = build_tiers(resort_id, &[tier_input("1-4 guests", 1, Some(4))]).unwrap();

        let err = resolve_matrix(
            resort_id,
            &[matrix_input("Night Tour", "1-4 guests", 3000.0)],
            &slots,
            &tiers,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Night Tour"));
    }

    #[test]
    fn test_foreign_id_reference_is_rejected() {
        let resort_id = ObjectId::new();
        let slots = build_slots(resort_id, &[slot_input("Day Tour", None)]).unwrap();
        let tiers = build_tiers(resort_id, &[tier_input("1-4 guests", 1, Some(4))]).unwrap();

        let entry = MatrixEntryInput {
            time_slot_id: Some(ObjectId::new().to_hex()),
            time_slot_label: None,
            guest_tier_id: None,
            guest_tier_label: Some("1-4 guests".to_string()),
            day_type: DayType::Weekday,
            price: 2500.0,
        };
        assert!(resolve_matrix(resort_id, &[entry], &slots, &tiers).is_err());
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let resort_id = ObjectId::new();
        let result = build_slots(
            resort_id,
            &[slot_input("Day Tour", None), slot_input("Day Tour", None)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_inverted_tier_bounds_rejected() {
        let resort_id = ObjectId::new();
        assert!(build_tiers(resort_id, &[tier_input("bad", 5, Some(2))]).is_err());
    }
}
