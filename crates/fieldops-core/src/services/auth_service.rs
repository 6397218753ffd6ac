// ============================================================================
// FieldOps Core - Authentication Service
// File: crates/fieldops-core/src/services/auth_service.rs
// ============================================================================
//! Authentication service with login and token refresh

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use fieldops_security::jwt::JwtService;
use fieldops_security::password::PasswordService;
use fieldops_shared::utils::mask_email;

use crate::domain::User;
use crate::error::DomainError;
use crate::repositories::UserRepository;

/// Authentication service for handling login and refresh flows
pub struct AuthService<R: UserRepository> {
    user_repo: Arc<R>,
    jwt: JwtService,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repo: Arc<R>, jwt: JwtService) -> Self {
        Self { user_repo, jwt }
    }

    /// Login with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, DomainError> {
        info!("Login attempt for {}", mask_email(email));

        // 1. Find user by email
        let user = self.user_repo.find_by_email(email).await?.ok_or_else(|| {
            warn!("Login failed: unknown email {}", mask_email(email));
            DomainError::InvalidCredentials
        })?;

        // 2. Check if user can login
        if !user.can_login() {
            warn!("Login failed: user {} not active", user.id);
            return Err(DomainError::UserNotActive);
        }

        // 3. Verify password
        let password_valid = PasswordService::verify(password, &user.password_hash)
            .map_err(|_| DomainError::InvalidCredentials)?;
        if !password_valid {
            warn!("Login failed: bad password for {}", mask_email(email));
            return Err(DomainError::InvalidCredentials);
        }

        // 4. Generate token pair
        let access_token = self
            .jwt
            .generate_access_token(&user.id, user.tenant_id, user.role.as_str())
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;
        let refresh_token = self
            .jwt
            .generate_refresh_token(&user.id)
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        // 5. Update last login; login itself succeeds even if this write fails
        let mut updated_user = user.clone();
        updated_user.record_login();
        if let Err(e) = self.user_repo.update(&updated_user).await {
            error!("Failed to update last login for {}: {}", user.id, e);
        }

        info!("Login successful for {}", mask_email(email));

        Ok(LoginResult {
            user: UserInfo::from(&updated_user),
            access_token,
            refresh_token,
        })
    }

    /// Exchange a refresh token for a fresh token pair
    pub async fn refresh(&self, refresh_token: &str) -> Result<LoginResult, DomainError> {
        // 1. Validate and reject non-refresh tokens
        let claims = self
            .jwt
            .validate_token(refresh_token)
            .map_err(|_| DomainError::InvalidCredentials)?;
        if !claims.is_refresh() {
            warn!("Refresh rejected: token is not a refresh token");
            return Err(DomainError::InvalidCredentials);
        }
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::InvalidCredentials)?;

        // 2. The user must still exist and be active
        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;
        if !user.can_login() {
            return Err(DomainError::UserNotActive);
        }

        // 3. Rotate the pair
        let access_token = self
            .jwt
            .generate_access_token(&user.id, user.tenant_id, user.role.as_str())
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;
        let refresh_token = self
            .jwt
            .generate_refresh_token(&user.id)
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        info!("Token refreshed for user {}", user.id);

        Ok(LoginResult {
            user: UserInfo::from(&user),
            access_token,
            refresh_token,
        })
    }
}

/// Result of successful login or refresh
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: UserInfo,
    pub access_token: String,
    pub refresh_token: String,
}

/// User info returned in auth responses
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            tenant_id: user.tenant_id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            role: user.role.as_str().to_string(),
            last_login_at: user.last_login_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Role;
    use crate::repositories::user_repository::MockUserRepository;

    fn jwt() -> JwtService {
        JwtService::new("test-secret-at-least-32-chars-long".to_string(), 900, 3600)
    }

    fn user_with_password(password: &str) -> User {
        User::new(
            Some(Uuid::new_v4()),
            "rep@example.com".to_string(),
            PasswordService::hash(password).unwrap(),
            "Test Rep".to_string(),
            Role::SalesRep,
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_login_happy_path() {
        let user = user_with_password("correct horse battery");
        let mut repo = MockUserRepository::new();
        let found = user.clone();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(found.clone())));
        repo.expect_update().returning(|u| Ok(u.clone()));

        let service = AuthService::new(Arc::new(repo), jwt());
        let result = service
            .login("rep@example.com", "correct horse battery")
            .await
            .unwrap();

        assert_eq!(result.user.email, "rep@example.com");
        assert_eq!(result.user.role, "sales_rep");
        assert!(!result.access_token.is_empty());
        assert!(result.user.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = user_with_password("right");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(Arc::new(repo), jwt());
        let err = service
            .login("rep@example.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(repo), jwt());
        let err = service
            .login("ghost@example.com", "anything")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_inactive_user() {
        let mut user = user_with_password("secret123");
        user.is_active = false;
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(Arc::new(repo), jwt());
        let err = service
            .login("rep@example.com", "secret123")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UserNotActive));
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let user = user_with_password("secret123");
        let access = jwt()
            .generate_access_token(&user.id, user.tenant_id, "sales_rep")
            .unwrap();

        let repo = MockUserRepository::new();
        let service = AuthService::new(Arc::new(repo), jwt());
        let err = service.refresh(&access).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_refresh_rotates_pair() {
        let user = user_with_password("secret123");
        let refresh = jwt().generate_refresh_token(&user.id).unwrap();

        let mut repo = MockUserRepository::new();
        let found = user.clone();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));

        let service = AuthService::new(Arc::new(repo), jwt());
        let result = service.refresh(&refresh).await.unwrap();
        assert_eq!(result.user.id, user.id);
        assert!(!result.access_token.is_empty());
        assert!(!result.refresh_token.is_empty());
    }
}
