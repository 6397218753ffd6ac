//! User domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Platform role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Supervisor,
    SalesRep,
    Warehouse,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::SalesRep => "sales_rep",
            Role::Warehouse => "warehouse",
            Role::Customer => "customer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "super_admin" => Some(Role::SuperAdmin),
            "admin" => Some(Role::Admin),
            "supervisor" => Some(Role::Supervisor),
            "sales_rep" => Some(Role::SalesRep),
            "warehouse" => Some(Role::Warehouse),
            "customer" => Some(Role::Customer),
            _ => None,
        }
    }

    /// Roles allowed to act on visits they are not assigned to.
    pub fn is_supervising(&self) -> bool {
        matches!(self, Role::Admin | Role::Supervisor)
    }

    /// Everyone except portal customers counts as tenant staff.
    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Customer)
    }

    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::SalesRep
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User entity. `tenant_id` is None only for platform super admins.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,

    #[validate(length(min = 2, max = 120, message = "Display name must be 2-120 characters"))]
    pub display_name: String,

    pub role: Role,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl User {
    pub fn new(
        tenant_id: Option<Uuid>,
        email: String,
        password_hash: String,
        display_name: String,
        role: Role,
        created_by: Option<Uuid>,
    ) -> Result<Self, validator::ValidationErrors> {
        let user = Self {
            id: Uuid::new_v4(),
            tenant_id,
            email,
            password_hash,
            display_name,
            role,
            is_active: true,
            last_login_at: None,
            created_at: Utc::now(),
            created_by,
            modified_at: None,
            modified_by: None,
            removed_at: None,
            removed_by: None,
        };

        user.validate()?;
        Ok(user)
    }

    pub fn can_login(&self) -> bool {
        self.is_active && !self.is_deleted()
    }

    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }

    pub fn is_deleted(&self) -> bool {
        self.removed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_validates_email() {
        let user = User::new(
            Some(Uuid::new_v4()),
            "not-an-email".to_string(),
            "hash".to_string(),
            "Test Rep".to_string(),
            Role::SalesRep,
            None,
        );
        assert!(user.is_err());
    }

    #[test]
    fn test_inactive_user_cannot_login() {
        let mut user = User::new(
            Some(Uuid::new_v4()),
            "rep@example.com".to_string(),
            "hash".to_string(),
            "Test Rep".to_string(),
            Role::SalesRep,
            None,
        )
        .unwrap();
        assert!(user.can_login());

        user.is_active = false;
        assert!(!user.can_login());
    }

    #[test]
    fn test_role_string_round_trip() {
        for role in [
            Role::SuperAdmin,
            Role::Admin,
            Role::Supervisor,
            Role::SalesRep,
            Role::Warehouse,
            Role::Customer,
        ] {
            assert_eq!(Role::from_str(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_str("root"), None);
    }

    #[test]
    fn test_supervising_roles() {
        assert!(Role::Admin.is_supervising());
        assert!(Role::Supervisor.is_supervising());
        assert!(!Role::SalesRep.is_supervising());
        assert!(!Role::SuperAdmin.is_supervising());
    }
}
