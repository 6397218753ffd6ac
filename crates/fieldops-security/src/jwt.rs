//! JWT token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use fieldops_shared::constants::{TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH};

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token creation failed: {0}")]
    CreationError(String),
    #[error("Token validation failed: {0}")]
    ValidationError(String),
    #[error("Token expired")]
    TokenExpired,
}

/// Claims carried by every fieldops token. Access tokens carry the caller's
/// tenant and role so handlers can authorize without a user lookup; refresh
/// tokens carry the subject only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub tenant_id: Option<Uuid>,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    pub token_type: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub)
            .map_err(|e| JwtError::ValidationError(format!("invalid subject: {}", e)))
    }

    pub fn is_access(&self) -> bool {
        self.token_type == TOKEN_TYPE_ACCESS
    }

    pub fn is_refresh(&self) -> bool {
        self.token_type == TOKEN_TYPE_REFRESH
    }
}

pub struct JwtService {
    secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

impl JwtService {
    pub fn new(secret: String, access_expiry: i64, refresh_expiry: i64) -> Self {
        Self {
            secret,
            access_token_expiry: access_expiry,
            refresh_token_expiry: refresh_expiry,
        }
    }

    pub fn generate_access_token(
        &self,
        user_id: &Uuid,
        tenant_id: Option<Uuid>,
        role: &str,
    ) -> Result<String, JwtError> {
        self.generate_token(
            user_id,
            tenant_id,
            role,
            TOKEN_TYPE_ACCESS,
            self.access_token_expiry,
        )
    }

    pub fn generate_refresh_token(&self, user_id: &Uuid) -> Result<String, JwtError> {
        self.generate_token(user_id, None, "", TOKEN_TYPE_REFRESH, self.refresh_token_expiry)
    }

    fn generate_token(
        &self,
        user_id: &Uuid,
        tenant_id: Option<Uuid>,
        role: &str,
        token_type: &str,
        expiry: i64,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            tenant_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expiry)).timestamp(),
            token_type: token_type.to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| JwtError::CreationError(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            _ => JwtError::ValidationError(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret".to_string(), 900, 604800)
    }

    #[test]
    fn test_access_token_round_trip() {
        let svc = service();
        let user_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();

        let token = svc
            .generate_access_token(&user_id, Some(tenant_id), "sales_rep")
            .unwrap();
        let claims = svc.validate_token(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.tenant_id, Some(tenant_id));
        assert_eq!(claims.role, "sales_rep");
        assert!(claims.is_access());
        assert!(!claims.is_refresh());
    }

    #[test]
    fn test_refresh_token_carries_subject_only() {
        let svc = service();
        let user_id = Uuid::new_v4();

        let token = svc.generate_refresh_token(&user_id).unwrap();
        let claims = svc.validate_token(&token).unwrap();

        assert!(claims.is_refresh());
        assert_eq!(claims.tenant_id, None);
        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Expired well past the default validation leeway.
        let svc = JwtService::new("test-secret".to_string(), -300, -300);
        let token = svc
            .generate_access_token(&Uuid::new_v4(), None, "admin")
            .unwrap();

        match svc.validate_token(&token) {
            Err(JwtError::TokenExpired) => {}
            other => panic!("expected TokenExpired, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let svc = service();
        let other = JwtService::new("other-secret".to_string(), 900, 604800);
        let token = svc
            .generate_access_token(&Uuid::new_v4(), None, "admin")
            .unwrap();

        assert!(other.validate_token(&token).is_err());
    }
}
