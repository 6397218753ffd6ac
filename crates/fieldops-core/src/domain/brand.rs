//! Brand domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Brand {
    pub id: Uuid,
    pub tenant_id: Uuid,

    #[validate(length(min = 2, max = 120, message = "Name must be 2-120 characters"))]
    pub name: String,

    pub description: Option<String>,
    pub is_active: bool,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl Brand {
    pub fn new(
        tenant_id: Uuid,
        name: String,
        description: Option<String>,
        created_by: Option<Uuid>,
    ) -> Result<Self, validator::ValidationErrors> {
        let brand = Self {
            id: Uuid::new_v4(),
            tenant_id,
            name,
            description,
            is_active: true,
            created_at: Utc::now(),
            created_by,
            modified_at: None,
            modified_by: None,
            removed_at: None,
            removed_by: None,
        };

        brand.validate()?;
        Ok(brand)
    }

    pub fn is_deleted(&self) -> bool {
        self.removed_at.is_some()
    }
}
