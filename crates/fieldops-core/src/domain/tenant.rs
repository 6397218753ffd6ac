//! Tenant domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Tenant {
    pub id: Uuid,

    #[validate(length(min = 2, max = 120, message = "Name must be 2-120 characters"))]
    pub name: String,

    #[validate(length(min = 2, max = 60, message = "Slug must be 2-60 characters"))]
    pub slug: String,

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

impl Tenant {
    pub fn new(
        name: String,
        slug: String,
        description: Option<String>,
        created_by: Option<Uuid>,
    ) -> Result<Self, validator::ValidationErrors> {
        let tenant = Self {
            id: Uuid::new_v4(),
            name,
            slug,
            description,
            is_active: true,
            created_at: Utc::now(),
            created_by,
            modified_at: None,
            modified_by: None,
            removed_at: None,
            removed_by: None,
        };

        tenant.validate()?;
        Ok(tenant)
    }

    pub fn deactivate(&mut self, deactivated_by: Uuid) {
        self.is_active = false;
        self.modified_at = Some(Utc::now());
        self.modified_by = Some(deactivated_by);
    }

    pub fn is_deleted(&self) -> bool {
        self.removed_at.is_some()
    }
}
