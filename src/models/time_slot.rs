use std::fmt;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// The fixed set of bookable slot shapes. Wire names match what the booking
/// clients send; the older `day_12h`/`overnight_22h` spellings are accepted
/// on input for backward compatibility.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotType {
    #[serde(rename = "daytour", alias = "day_12h")]
    Daytour,
    #[serde(rename = "overnight", alias = "overnight_22h")]
    Overnight,
    #[serde(rename = "22hrs")]
    TwentyTwoHours,
}

impl SlotType {
    /// Local hour after which same-day bookings of this type close.
    pub fn cutoff_hour(&self) -> u32 {
        match self {
            SlotType::Daytour => 12,
            SlotType::Overnight => 16,
            SlotType::TwentyTwoHours => 10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotType::Daytour => "daytour",
            SlotType::Overnight => "overnight",
            SlotType::TwentyTwoHours => "22hrs",
        }
    }
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TimeSlot {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub resort_id: ObjectId,
    pub slot_type: SlotType,
    pub label: String,
    /// "HH:MM", resort-local.
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

fn default_true() -> bool {
    true
}
