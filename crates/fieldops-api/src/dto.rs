//! DTOs shared across handlers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use fieldops_core::domain::visit::GeoPoint;
use fieldops_core::domain::User;
use fieldops_shared::types::Pagination;

/// `page` / `per_page` query parameters, clamped to shared limits.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn pagination(self) -> Pagination {
        Pagination {
            page: self.page.unwrap_or(1),
            per_page: self
                .per_page
                .unwrap_or(fieldops_shared::constants::DEFAULT_PAGE_SIZE),
        }
        .clamped()
    }
}

/// GPS coordinates in request payloads.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct LocationDto {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude out of range"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude out of range"))]
    pub longitude: f64,
}

impl From<LocationDto> for GeoPoint {
    fn from(dto: LocationDto) -> Self {
        GeoPoint {
            latitude: dto.latitude,
            longitude: dto.longitude,
        }
    }
}

/// User representation in responses. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            tenant_id: user.tenant_id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            role: user.role.as_str().to_string(),
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let p = PageQuery::default().pagination();
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, fieldops_shared::constants::DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_page_query_clamps_oversized_pages() {
        let q = PageQuery {
            page: Some(0),
            per_page: Some(9999),
        };
        let p = q.pagination();
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, fieldops_shared::constants::MAX_PAGE_SIZE);
    }

    #[test]
    fn test_location_dto_validates_range() {
        use validator::Validate;
        let bad = LocationDto {
            latitude: 123.0,
            longitude: 0.0,
        };
        assert!(bad.validate().is_err());

        let good = LocationDto {
            latitude: -6.2,
            longitude: 106.8,
        };
        assert!(good.validate().is_ok());
    }
}
