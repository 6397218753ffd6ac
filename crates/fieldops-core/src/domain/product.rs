//! Product domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Product {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub brand_id: Option<Uuid>,

    #[validate(length(min = 1, max = 64, message = "SKU must be 1-64 characters"))]
    pub sku: String,

    #[validate(length(min = 2, max = 160, message = "Name must be 2-160 characters"))]
    pub name: String,

    pub description: Option<String>,

    /// Unit price in the tenant currency's smallest denomination.
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub unit_price_cents: i64,

    pub is_active: bool,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl Product {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: Uuid,
        brand_id: Option<Uuid>,
        sku: String,
        name: String,
        description: Option<String>,
        unit_price_cents: i64,
        created_by: Option<Uuid>,
    ) -> Result<Self, validator::ValidationErrors> {
        let product = Self {
            id: Uuid::new_v4(),
            tenant_id,
            brand_id,
            sku,
            name,
            description,
            unit_price_cents,
            is_active: true,
            created_at: Utc::now(),
            created_by,
            modified_at: None,
            modified_by: None,
            removed_at: None,
            removed_by: None,
        };

        product.validate()?;
        Ok(product)
    }

    pub fn is_deleted(&self) -> bool {
        self.removed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_is_rejected() {
        let product = Product::new(
            Uuid::new_v4(),
            None,
            "SKU-1".to_string(),
            "Sparkling Water 500ml".to_string(),
            None,
            -100,
            None,
        );
        assert!(product.is_err());
    }
}
