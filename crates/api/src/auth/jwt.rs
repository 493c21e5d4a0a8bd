//! Admin session tokens.
//!
//! Sessions are HS256-signed JWTs containing a [`Claims`] payload. There are
//! no user accounts; the subject is always the admin principal.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subject written into every admin session token.
pub const ADMIN_SUBJECT: &str = "admin";

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    /// Role name (only `"admin"` is issued).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier, logged on login.
    pub jti: String,
}

/// Configuration for session token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Session lifetime in hours (default: 24).
    pub session_hours: i64,
}

const DEFAULT_SESSION_HOURS: i64 = 24;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var               | Required | Default |
    /// |-----------------------|----------|---------|
    /// | `JWT_SECRET`          | **yes**  | --      |
    /// | `ADMIN_SESSION_HOURS` | no       | `24`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let session_hours: i64 = std::env::var("ADMIN_SESSION_HOURS")
            .unwrap_or_else(|_| DEFAULT_SESSION_HOURS.to_string())
            .parse()
            .expect("ADMIN_SESSION_HOURS must be a valid i64");

        Self {
            secret,
            session_hours,
        }
    }

    /// Session lifetime in seconds, as used for the cookie `Max-Age`.
    pub fn session_secs(&self) -> i64 {
        self.session_hours * 3600
    }
}

/// Generate an HS256 session token carrying `role`.
pub fn generate_session_token(
    role: &str,
    config: &JwtConfig,
) -> Result<(String, Claims), jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: ADMIN_SUBJECT.to_string(),
        role: role.to_string(),
        exp: now + config.session_secs(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok((token, claims))
}

/// Validate and decode a session token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use nomnomchow_core::roles::ROLE_ADMIN;

    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            session_hours: 24,
        }
    }

    #[test]
    fn test_generate_and_validate_session_token() {
        let config = test_config();
        let (token, issued) =
            generate_session_token(ROLE_ADMIN, &config).expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, ADMIN_SUBJECT);
        assert_eq!(claims.role, ROLE_ADMIN);
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: ADMIN_SUBJECT.to_string(),
            role: ROLE_ADMIN.to_string(),
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = JwtConfig {
            secret: "secret-alpha".to_string(),
            session_hours: 1,
        };
        let config_b = JwtConfig {
            secret: "secret-bravo".to_string(),
            session_hours: 1,
        };

        let (token, _) = generate_session_token(ROLE_ADMIN, &config_a).unwrap();
        assert!(validate_token(&token, &config_b).is_err());
    }
}
