use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::auth::{self, AuthError, Claims};
use crate::error::ApiError;

/// Verified bearer-token claims for a protected route.
///
/// Extraction pulls the token from the Authorization header and validates
/// signature, expiry, issuer and audience. Permission checks stay with the
/// handler, which knows its required scope.
#[derive(Debug, Clone)]
pub struct BearerClaims(pub Claims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for BearerClaims
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;
        let claims = auth::verify_token(&token)?;
        Ok(BearerClaims(claims))
    }
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let auth_header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?;

    if token.trim().is_empty() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token.to_string())
}
