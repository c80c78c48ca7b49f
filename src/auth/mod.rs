use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

/// Route permissions carried in a bearer token's `permissions` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    GetDrinksDetail,
    PostDrinks,
    PatchDrinks,
    DeleteDrinks,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::GetDrinksDetail => "get:drinks-detail",
            Permission::PostDrinks => "post:drinks",
            Permission::PatchDrinks => "patch:drinks",
            Permission::DeleteDrinks => "delete:drinks",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header must use Bearer token format")]
    MalformedHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token is missing the permissions claim")]
    PermissionsClaimMissing,

    #[error("Permission '{0}' not present in token")]
    PermissionDenied(Permission),

    #[error("JWT secret not configured")]
    SecretMissing,

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),
}

impl AuthError {
    /// HTTP status this failure maps to. A token without a permissions claim
    /// is a malformed-claims 400; a valid token lacking the required
    /// permission is 403; everything else about the token itself is 401.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::PermissionsClaimMissing => 400,
            AuthError::PermissionDenied(_) => 403,
            AuthError::SecretMissing | AuthError::TokenGeneration(_) => 500,
            _ => 401,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    /// Permission strings granted by the identity provider. Absent when the
    /// provider was not asked to include them, which protected routes reject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl Claims {
    pub fn new(sub: String, permissions: Vec<String>) -> Self {
        let security = &config::config().security;
        let now = Utc::now();
        let exp = (now + Duration::hours(security.jwt_expiry_hours as i64)).timestamp();

        Self {
            iss: security.jwt_issuer.clone(),
            sub,
            aud: security.jwt_audience.clone(),
            iat: now.timestamp(),
            exp,
            permissions: Some(permissions),
        }
    }

    /// Confirms the required permission string is present in the token's
    /// permission set.
    pub fn require(&self, permission: Permission) -> Result<(), AuthError> {
        let permissions = self
            .permissions
            .as_ref()
            .ok_or(AuthError::PermissionsClaimMissing)?;

        if permissions.iter().any(|p| p == permission.as_str()) {
            Ok(())
        } else {
            Err(AuthError::PermissionDenied(permission))
        }
    }
}

/// Decodes and validates a bearer token: signature, expiry, issuer, audience.
pub fn verify_token(token: &str) -> Result<Claims, AuthError> {
    let security = &config::config().security;
    if security.jwt_secret.is_empty() {
        return Err(AuthError::SecretMissing);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&security.jwt_issuer]);
    validation.set_audience(&[&security.jwt_audience]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(security.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// Signs a token with the configured secret. The deployed system receives
/// tokens from an external identity provider; this exists for tests and
/// local tooling.
pub fn issue_token(claims: &Claims) -> Result<String, AuthError> {
    let security = &config::config().security;
    if security.jwt_secret.is_empty() {
        return Err(AuthError::SecretMissing);
    }

    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(security.jwt_secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}
