use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use shared_models::auth::{AuthUser, JwtClaims};

pub fn issue_token(
    user_id: &str,
    email: &str,
    jwt_secret: &str,
    expires_in_hours: i64,
) -> Result<String, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let now = Utc::now();
    let expires_at = Duration::try_hours(expires_in_hours)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| format!("Token lifetime of {} hours is out of range", expires_in_hours))?;

    let claims = JwtClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| format!("Failed to sign token: {}", e))
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<AuthUser, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        debug!("Token validation failed: {}", e);
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expired".to_string(),
            jsonwebtoken::errors::ErrorKind::InvalidSignature => "Invalid token signature".to_string(),
            _ => "Invalid token".to_string(),
        }
    })?;

    let user = AuthUser::from(data.claims);
    debug!("Token validated successfully for user: {}", user.id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "jwt-unit-test-secret";

    #[test]
    fn test_issue_then_validate() {
        let token = issue_token("user-1", "ana@x.com", SECRET, 1).unwrap();
        let user = validate_token(&token, SECRET).unwrap();
        assert_eq!(user.id, "user-1");
        assert_eq!(user.email, "ana@x.com");
    }

    #[test]
    fn test_rejects_wrong_secret_and_expired() {
        let token = issue_token("user-1", "ana@x.com", SECRET, 1).unwrap();
        assert_eq!(validate_token(&token, "other").unwrap_err(), "Invalid token signature");

        let expired = issue_token("user-1", "ana@x.com", SECRET, -1).unwrap();
        assert_eq!(validate_token(&expired, SECRET).unwrap_err(), "Token expired");

        assert!(validate_token("invalid.token.format", SECRET).is_err());
    }

    #[test]
    fn test_out_of_range_lifetime_is_an_error() {
        assert!(issue_token("user-1", "ana@x.com", SECRET, i64::MAX).is_err());
        assert!(issue_token("user-1", "ana@x.com", SECRET, 24 * 365 * 1_000_000).is_err());
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        assert!(issue_token("user-1", "ana@x.com", "", 1).is_err());
        assert!(validate_token("a.b.c", "").is_err());
    }
}
