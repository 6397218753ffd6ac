//! Customer tier domain entity (pricing and priority band)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Tier {
    pub id: Uuid,
    pub tenant_id: Uuid,

    #[validate(length(min = 1, max = 60, message = "Name must be 1-60 characters"))]
    pub name: String,

    #[validate(range(min = 0, max = 100, message = "Discount must be 0-100 percent"))]
    pub discount_percent: i32,

    /// Lower rank sorts first in rep worklists.
    pub rank: i32,
    pub is_active: bool,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl Tier {
    pub fn new(
        tenant_id: Uuid,
        name: String,
        discount_percent: i32,
        rank: i32,
        created_by: Option<Uuid>,
    ) -> Result<Self, validator::ValidationErrors> {
        let tier = Self {
            id: Uuid::new_v4(),
            tenant_id,
            name,
            discount_percent,
            rank,
            is_active: true,
            created_at: Utc::now(),
            created_by,
            modified_at: None,
            modified_by: None,
            removed_at: None,
            removed_by: None,
        };

        tier.validate()?;
        Ok(tier)
    }

    pub fn is_deleted(&self) -> bool {
        self.removed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_out_of_range_is_rejected() {
        let tier = Tier::new(Uuid::new_v4(), "Gold".to_string(), 150, 1, None);
        assert!(tier.is_err());
    }
}
