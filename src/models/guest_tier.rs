use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GuestTier {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub resort_id: ObjectId,
    pub label: String,
    /// Inclusive lower bound.
    pub min_guests: u32,
    /// Inclusive upper bound; None means unbounded.
    #[serde(default)]
    pub max_guests: Option<u32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_true() -> bool {
    true
}

impl GuestTier {
    pub fn matches(&self, guest_count: u32) -> bool {
        guest_count >= self.min_guests
            && self.max_guests.map_or(true, |max| guest_count <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(min: u32, max: Option<u32>) -> GuestTier {
        GuestTier {
            id: None,
            resort_id: ObjectId::new(),
            label: format!("{}+", min),
            min_guests: min,
            max_guests: max,
            is_active: true,
            sort_order: 0,
        }
    }

    #[test]
    fn test_matches_inclusive_bounds() {
        let t = tier(5, Some(8));
        assert!(t.matches(5));
        assert!(t.matches(8));
        assert!(!t.matches(4));
        assert!(!t.matches(9));
    }

    #[test]
    fn test_unbounded_tier_matches_any_count_above_min() {
        let t = tier(13, None);
        assert!(t.matches(13));
        assert!(t.matches(500));
        assert!(!t.matches(12));
    }
}
