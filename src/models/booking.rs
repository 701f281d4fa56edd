use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::models::time_slot::SlotType;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "confirmed", alias = "approved")]
    Confirmed,
    #[serde(rename = "rejected")]
    Rejected,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl BookingStatus {
    /// Wire spellings of every status that holds a date. Older documents
    /// spell confirmed as "approved", so conflict queries must match both.
    pub const BLOCKING_WIRE_NAMES: &'static [&'static str] =
        &["pending", "confirmed", "approved"];

    /// Only these statuses hold a date against other guests.
    pub fn blocks_availability(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// Dates are stored as zero-padded "YYYY-MM-DD" strings so lexicographic
/// range filters in the store compare chronologically.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub resort_id: ObjectId,
    pub guest_id: ObjectId,
    pub date_from: String,
    /// Inclusive; same-day bookings have date_to == date_from.
    pub date_to: String,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot_id: Option<ObjectId>,
    /// Mirrors the slot's type so slot-less (multi-day) bookings still carry
    /// one.
    #[serde(default)]
    pub booking_type: Option<SlotType>,
    pub guest_count: u32,
    /// Quote snapshot taken at creation time.
    pub total_price: f64,
    pub downpayment_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

impl Booking {
    pub fn is_multi_day(&self) -> bool {
        self.date_from != self.date_to
    }

    /// True when `day` (a "YYYY-MM-DD" key) falls inside the booking's
    /// inclusive range. Zero-padded keys compare chronologically as strings.
    pub fn covers(&self, day: &str) -> bool {
        self.date_from.as_str() <= day && day <= self.date_to.as_str()
    }
}
