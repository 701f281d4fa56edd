use std::fmt;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayType {
    #[serde(rename = "weekday")]
    Weekday,
    #[serde(rename = "weekend")]
    Weekend,
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayType::Weekday => f.write_str("weekday"),
            DayType::Weekend => f.write_str("weekend"),
        }
    }
}

/// One cell of the sparse pricing matrix. The (slot, tier) pair must belong
/// to the same resort as the entry itself.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PricingMatrixEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub resort_id: ObjectId,
    pub time_slot_id: ObjectId,
    pub guest_tier_id: ObjectId,
    pub day_type: DayType,
    pub price: f64,
}
