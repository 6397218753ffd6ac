// ============================================================================
// FieldOps Core - User Service
// File: crates/fieldops-core/src/services/user_service.rs
// ============================================================================
//! User administration within a tenant

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use fieldops_security::password::PasswordService;
use fieldops_shared::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use fieldops_shared::types::Pagination;
use fieldops_shared::utils::mask_email;

use crate::domain::actor::Actor;
use crate::domain::user::{Role, User};
use crate::error::DomainError;
use crate::repositories::UserRepository;

/// Input for creating a user account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Target tenant. Only platform admins may set this; everyone else
    /// creates users in their own tenant.
    pub tenant_id: Option<Uuid>,
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: Role,
}

/// Partial update of a user account. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub display_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

pub struct UserService<R: UserRepository> {
    user_repo: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(user_repo: Arc<R>) -> Self {
        Self { user_repo }
    }

    pub async fn create_user(&self, actor: &Actor, input: NewUser) -> Result<User, DomainError> {
        // 1. Authorization: admins manage users, and never above their rank
        if !actor.role.can_manage_users() {
            return Err(DomainError::Forbidden(
                "User administration requires an admin".to_string(),
            ));
        }
        if matches!(input.role, Role::SuperAdmin | Role::Admin) && actor.role != Role::SuperAdmin {
            warn!(
                "User {} tried to create a {} account",
                actor.user_id, input.role
            );
            return Err(DomainError::Forbidden(
                "Only platform admins can create admin accounts".to_string(),
            ));
        }

        // 2. Resolve the target tenant
        let tenant_id = match actor.role {
            Role::SuperAdmin => input.tenant_id,
            _ => {
                let own = actor.tenant_scope()?;
                if input.tenant_id.is_some_and(|t| t != own) {
                    return Err(DomainError::Forbidden(
                        "Cannot create users in another tenant".to_string(),
                    ));
                }
                Some(own)
            }
        };

        // 3. Email is unique across the platform
        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            warn!("User creation failed: email taken: {}", mask_email(&input.email));
            return Err(DomainError::EmailAlreadyExists(input.email));
        }

        // 4. Hash the password
        ensure_password_length(&input.password)?;
        let password_hash = PasswordService::hash(&input.password)
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))?;

        // 5. Build and persist
        let user = User::new(
            tenant_id,
            input.email,
            password_hash,
            input.display_name,
            input.role,
            Some(actor.user_id),
        )
        .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        let created = self.user_repo.create(&user).await?;
        info!(
            "User {} ({}) created as {}",
            created.id,
            mask_email(&created.email),
            created.role
        );
        Ok(created)
    }

    pub async fn get_user(&self, actor: &Actor, user_id: &Uuid) -> Result<User, DomainError> {
        if !actor.role.can_manage_users() {
            return Err(DomainError::Forbidden(
                "User administration requires an admin".to_string(),
            ));
        }
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;
        self.ensure_same_tenant(actor, &user)?;
        Ok(user)
    }

    pub async fn list_users(
        &self,
        actor: &Actor,
        pagination: Pagination,
    ) -> Result<Vec<User>, DomainError> {
        if !actor.role.can_manage_users() {
            return Err(DomainError::Forbidden(
                "User administration requires an admin".to_string(),
            ));
        }
        let tenant_id = actor.tenant_scope()?;
        self.user_repo
            .list_by_tenant(&tenant_id, pagination.clamped())
            .await
    }

    pub async fn update_user(
        &self,
        actor: &Actor,
        user_id: &Uuid,
        changes: UserChanges,
    ) -> Result<User, DomainError> {
        if !actor.role.can_manage_users() {
            return Err(DomainError::Forbidden(
                "User administration requires an admin".to_string(),
            ));
        }
        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;
        self.ensure_same_tenant(actor, &user)?;

        if let Some(role) = changes.role {
            if matches!(role, Role::SuperAdmin | Role::Admin) && actor.role != Role::SuperAdmin {
                return Err(DomainError::Forbidden(
                    "Only platform admins can grant admin roles".to_string(),
                ));
            }
            user.role = role;
        }
        if let Some(display_name) = changes.display_name {
            user.display_name = display_name;
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }
        user.modified_at = Some(Utc::now());
        user.modified_by = Some(actor.user_id);

        self.user_repo.update(&user).await
    }

    pub async fn deactivate_user(&self, actor: &Actor, user_id: &Uuid) -> Result<User, DomainError> {
        if !actor.role.can_manage_users() {
            return Err(DomainError::Forbidden(
                "User administration requires an admin".to_string(),
            ));
        }
        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;
        self.ensure_same_tenant(actor, &user)?;

        user.is_active = false;
        user.modified_at = Some(Utc::now());
        user.modified_by = Some(actor.user_id);

        let updated = self.user_repo.update(&user).await?;
        info!("User {} deactivated by {}", updated.id, actor.user_id);
        Ok(updated)
    }

    /// Platform admins see everyone; tenant admins only their own tenant.
    fn ensure_same_tenant(&self, actor: &Actor, user: &User) -> Result<(), DomainError> {
        if actor.role == Role::SuperAdmin || actor.tenant_id == user.tenant_id {
            Ok(())
        } else {
            Err(DomainError::UserNotFound)
        }
    }
}

fn ensure_password_length(password: &str) -> Result<(), DomainError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH || len > MAX_PASSWORD_LENGTH {
        return Err(DomainError::ValidationError(format!(
            "Password must be {MIN_PASSWORD_LENGTH}-{MAX_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::user_repository::MockUserRepository;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn tenant_admin(tenant_id: Uuid) -> Actor {
        Actor {
            user_id: Uuid::new_v4(),
            tenant_id: Some(tenant_id),
            role: Role::Admin,
        }
    }

    fn new_user(role: Role) -> NewUser {
        NewUser {
            tenant_id: None,
            email: SafeEmail().fake(),
            password: "a-long-password".to_string(),
            display_name: Name().fake(),
            role,
        }
    }

    #[tokio::test]
    async fn test_admin_creates_rep_in_own_tenant() {
        let tenant_id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .withf(move |u| u.tenant_id == Some(tenant_id) && u.role == Role::SalesRep)
            .returning(|u| Ok(u.clone()));

        let service = UserService::new(Arc::new(repo));
        let created = service
            .create_user(&tenant_admin(tenant_id), new_user(Role::SalesRep))
            .await
            .unwrap();
        assert_eq!(created.tenant_id, Some(tenant_id));
    }

    #[tokio::test]
    async fn test_admin_cannot_create_admin() {
        let repo = MockUserRepository::new();
        let service = UserService::new(Arc::new(repo));
        let err = service
            .create_user(&tenant_admin(Uuid::new_v4()), new_user(Role::Admin))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_rep_cannot_create_users() {
        let rep = Actor {
            user_id: Uuid::new_v4(),
            tenant_id: Some(Uuid::new_v4()),
            role: Role::SalesRep,
        };
        let repo = MockUserRepository::new();
        let service = UserService::new(Arc::new(repo));
        let err = service
            .create_user(&rep, new_user(Role::SalesRep))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let tenant_id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|email| {
            Ok(Some(
                User::new(
                    None,
                    email.to_string(),
                    "hash".to_string(),
                    "Existing".to_string(),
                    Role::SalesRep,
                    None,
                )
                .unwrap(),
            ))
        });

        let service = UserService::new(Arc::new(repo));
        let err = service
            .create_user(&tenant_admin(tenant_id), new_user(Role::SalesRep))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::EmailAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_short_password_is_rejected() {
        let tenant_id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repo));
        let mut input = new_user(Role::SalesRep);
        input.password = "short".to_string();
        let err = service
            .create_user(&tenant_admin(tenant_id), input)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_admin_cannot_promote_to_admin() {
        let tenant_id = Uuid::new_v4();
        let rep = User::new(
            Some(tenant_id),
            "rep@example.com".to_string(),
            "hash".to_string(),
            "Rep".to_string(),
            Role::SalesRep,
            None,
        )
        .unwrap();
        let rep_id = rep.id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(rep.clone())));

        let service = UserService::new(Arc::new(repo));
        let changes = UserChanges {
            role: Some(Role::Admin),
            ..Default::default()
        };
        let err = service
            .update_user(&tenant_admin(tenant_id), &rep_id, changes)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_update_user_changes_display_name() {
        let tenant_id = Uuid::new_v4();
        let rep = User::new(
            Some(tenant_id),
            "rep@example.com".to_string(),
            "hash".to_string(),
            "Old Name".to_string(),
            Role::SalesRep,
            None,
        )
        .unwrap();
        let rep_id = rep.id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(rep.clone())));
        repo.expect_update()
            .withf(|u| u.display_name == "New Name" && u.modified_by.is_some())
            .returning(|u| Ok(u.clone()));

        let service = UserService::new(Arc::new(repo));
        let changes = UserChanges {
            display_name: Some("New Name".to_string()),
            ..Default::default()
        };
        let updated = service
            .update_user(&tenant_admin(tenant_id), &rep_id, changes)
            .await
            .unwrap();
        assert_eq!(updated.display_name, "New Name");
    }

    #[tokio::test]
    async fn test_admin_cannot_reach_other_tenants_users() {
        let other_tenant_user = User::new(
            Some(Uuid::new_v4()),
            "other@example.com".to_string(),
            "hash".to_string(),
            "Other".to_string(),
            Role::SalesRep,
            None,
        )
        .unwrap();
        let target_id = other_tenant_user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(other_tenant_user.clone())));

        let service = UserService::new(Arc::new(repo));
        let err = service
            .get_user(&tenant_admin(Uuid::new_v4()), &target_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound));
    }
}
