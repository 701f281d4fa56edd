use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::models::time_slot::{SlotType, TimeSlot};

/// A pending/confirmed booking overlapping the queried date, reduced to the
/// fields the conflict rules read. Callers resolve `slot_type` up front so
/// slot-less multi-day bookings and slot-referencing ones look the same here.
#[derive(Debug, Clone)]
pub struct ExistingBooking {
    pub time_slot_id: Option<ObjectId>,
    pub slot_type: Option<SlotType>,
    pub multi_day: bool,
}

pub struct AvailabilityContext<'a> {
    /// The date being queried.
    pub date: NaiveDate,
    /// "Today" and the current hour come from the injected clock, never from
    /// raw server-local time.
    pub today: NaiveDate,
    pub current_hour: u32,
    pub allow_split_day: bool,
    pub bookings: &'a [ExistingBooking],
}

impl AvailabilityContext<'_> {
    fn has_booking_of_type(&self, slot_type: SlotType) -> bool {
        self.bookings.iter().any(|b| b.slot_type == Some(slot_type))
    }
}

type RuleFn = fn(&TimeSlot, &AvailabilityContext) -> Option<String>;

struct Rule {
    name: &'static str,
    check: RuleFn,
}

/// The conflict rules, evaluated top to bottom. The first rule that fires
/// decides the slot's unavailable reason, so the order here is load-bearing.
const RULES: &[Rule] = &[
    Rule {
        name: "same_day_cutoff",
        check: same_day_cutoff,
    },
    Rule {
        name: "past_date",
        check: past_date,
    },
    Rule {
        name: "multi_day_booking",
        check: multi_day_booking,
    },
    Rule {
        name: "slot_already_booked",
        check: slot_already_booked,
    },
    Rule {
        name: "slot_type_taken",
        check: slot_type_taken,
    },
    Rule {
        name: "twenty_two_hour_exclusivity",
        check: twenty_two_hour_exclusivity,
    },
    Rule {
        name: "split_day_policy",
        check: split_day_policy,
    },
];

fn same_day_cutoff(slot: &TimeSlot, ctx: &AvailabilityContext) -> Option<String> {
    let cutoff = slot.slot_type.cutoff_hour();
    if ctx.date == ctx.today && ctx.current_hour >= cutoff {
        return Some(format!(
            "Same-day {} bookings close at {}:00",
            slot.slot_type, cutoff
        ));
    }
    None
}

fn past_date(_slot: &TimeSlot, ctx: &AvailabilityContext) -> Option<String> {
    if ctx.date < ctx.today {
        return Some("Cannot book past dates".to_string());
    }
    None
}

fn multi_day_booking(_slot: &TimeSlot, ctx: &AvailabilityContext) -> Option<String> {
    if ctx.bookings.iter().any(|b| b.multi_day) {
        return Some("Date is taken by a multi-day booking".to_string());
    }
    None
}

fn slot_already_booked(slot: &TimeSlot, ctx: &AvailabilityContext) -> Option<String> {
    let taken = ctx
        .bookings
        .iter()
        .any(|b| b.time_slot_id.is_some() && b.time_slot_id == slot.id);
    if taken {
        return Some("This time slot is already booked".to_string());
    }
    None
}

fn slot_type_taken(slot: &TimeSlot, ctx: &AvailabilityContext) -> Option<String> {
    if ctx.has_booking_of_type(slot.slot_type) {
        return Some(format!(
            "A {} booking already exists for this date",
            slot.slot_type
        ));
    }
    None
}

fn twenty_two_hour_exclusivity(slot: &TimeSlot, ctx: &AvailabilityContext) -> Option<String> {
    if ctx.has_booking_of_type(SlotType::TwentyTwoHours) {
        return Some("A 22-hour booking blocks this date".to_string());
    }
    if slot.slot_type == SlotType::TwentyTwoHours && !ctx.bookings.is_empty() {
        return Some("The 22-hour slot requires the date to have no other bookings".to_string());
    }
    None
}

fn split_day_policy(slot: &TimeSlot, ctx: &AvailabilityContext) -> Option<String> {
    if ctx.allow_split_day {
        return None;
    }
    match slot.slot_type {
        SlotType::Daytour if ctx.has_booking_of_type(SlotType::Overnight) => Some(
            "Day tour is not available alongside an overnight booking".to_string(),
        ),
        SlotType::Overnight if ctx.has_booking_of_type(SlotType::Daytour) => Some(
            "Overnight is not available alongside a day tour booking".to_string(),
        ),
        _ => None,
    }
}

/// Run the rule chain for one slot. None means the slot is bookable.
pub fn unavailable_reason(slot: &TimeSlot, ctx: &AvailabilityContext) -> Option<String> {
    for rule in RULES {
        if let Some(reason) = (rule.check)(slot, ctx) {
            log::debug!("slot '{}' blocked by rule {}", slot.label, rule.name);
            return Some(reason);
        }
    }
    None
}

/// Per-slot availability, shaped for the wire.
#[derive(Debug, Serialize, Clone)]
pub struct SlotAvailability {
    pub slot_id: String,
    pub slot_type: SlotType,
    pub label: String,
    pub start_time: String,
    pub end_time: String,
    pub hours: f64,
    pub crosses_midnight: bool,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unavailable_reason: Option<String>,
}

/// Evaluate every configured slot against the bookings already holding the
/// date. Pure: same inputs, same output.
pub fn resolve_availability(
    slots: &[TimeSlot],
    ctx: &AvailabilityContext,
) -> Vec<SlotAvailability> {
    slots
        .iter()
        .map(|slot| {
            let reason = unavailable_reason(slot, ctx);
            SlotAvailability {
                slot_id: slot.id.map(|id| id.to_hex()).unwrap_or_default(),
                slot_type: slot.slot_type,
                label: slot.label.clone(),
                start_time: slot.start_time.clone(),
                end_time: slot.end_time.clone(),
                hours: slot.hours,
                crosses_midnight: slot.crosses_midnight,
                is_available: reason.is_none(),
                unavailable_reason: reason,
            }
        })
        .collect()
}
