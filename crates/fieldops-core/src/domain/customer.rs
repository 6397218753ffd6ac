//! Customer domain entity (a store or outlet served by the tenant)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Customer {
    pub id: Uuid,
    pub tenant_id: Uuid,

    #[validate(length(min = 2, max = 160, message = "Name must be 2-160 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,

    pub tier_id: Option<Uuid>,
    pub assigned_rep_id: Option<Uuid>,
    pub is_active: bool,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl Customer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: Uuid,
        name: String,
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
        city: Option<String>,
        tier_id: Option<Uuid>,
        assigned_rep_id: Option<Uuid>,
        created_by: Option<Uuid>,
    ) -> Result<Self, validator::ValidationErrors> {
        let customer = Self {
            id: Uuid::new_v4(),
            tenant_id,
            name,
            email,
            phone,
            address,
            city,
            tier_id,
            assigned_rep_id,
            is_active: true,
            created_at: Utc::now(),
            created_by,
            modified_at: None,
            modified_by: None,
            removed_at: None,
            removed_by: None,
        };

        customer.validate()?;
        Ok(customer)
    }

    pub fn is_deleted(&self) -> bool {
        self.removed_at.is_some()
    }
}
