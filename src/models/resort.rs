use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Applied whenever the owner has not set an explicit percentage.
pub const DEFAULT_DOWNPAYMENT_PERCENTAGE: f64 = 50.0;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Resort {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub owner_id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Flat price, used when advanced pricing is off. May be unset while the
    /// owner is still onboarding.
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub use_advanced_pricing: bool,
    #[serde(default)]
    pub allow_split_day: bool,
    /// 0-100. None means the platform default applies.
    #[serde(default)]
    pub downpayment_percentage: Option<f64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

fn default_true() -> bool {
    true
}

impl Resort {
    pub fn downpayment_pct(&self) -> f64 {
        self.downpayment_percentage
            .unwrap_or(DEFAULT_DOWNPAYMENT_PERCENTAGE)
    }
}
