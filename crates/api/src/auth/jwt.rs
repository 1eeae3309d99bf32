//! Bearer token validation.
//!
//! Tokens are HS256-signed JWTs issued by the external identity provider
//! using a shared secret. The server verifies signature, expiry and audience
//! before trusting any claim, including `user_metadata.is_admin`.

use gearlog_core::types::DbId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Audience stamped on tokens for signed-in users.
pub const DEFAULT_AUDIENCE: &str = "authenticated";

/// Provider-managed profile fields embedded in the token.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserMetadata {
    /// Grants access to the admin write endpoints.
    #[serde(default)]
    pub is_admin: bool,
}

/// JWT claims read from every bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id at the identity provider.
    pub sub: DbId,
    /// Intended audience.
    pub aud: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    #[serde(default)]
    pub iat: i64,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Configuration for JWT validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the identity provider.
    pub secret: String,
    /// Required `aud` claim.
    pub audience: String,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var        | Required | Default         |
    /// |----------------|----------|-----------------|
    /// | `JWT_SECRET`   | **yes**  | --              |
    /// | `JWT_AUDIENCE` | no       | `authenticated` |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let audience =
            std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| DEFAULT_AUDIENCE.to_string());

        Self { secret, audience }
    }
}

/// Validate and decode a bearer token, returning the embedded [`Claims`].
///
/// Checks the HS256 signature, `exp` and `aud`.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.audience.as_str()]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// Sign a token in the identity provider's format.
///
/// The server never issues tokens to clients; this exists for local tooling
/// and tests.
pub fn issue_token(
    user_id: DbId,
    is_admin: bool,
    ttl_secs: i64,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        aud: config.audience.clone(),
        exp: now + ttl_secs,
        iat: now,
        user_metadata: UserMetadata { is_admin },
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
        }
    }

    #[test]
    fn test_issue_and_validate_token() {
        let config = test_config();
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, true, 3600, &config).expect("signing should succeed");

        let claims = validate_token(&token, &config).expect("validation should succeed");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.aud, DEFAULT_AUDIENCE);
        assert!(claims.user_metadata.is_admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();
        // Well beyond the default 60-second leeway.
        let token = issue_token(Uuid::new_v4(), false, -300, &config).unwrap();

        let result = validate_token(&token, &config);
        assert!(result.is_err(), "expired token must fail validation");
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = test_config();
        let config_b = JwtConfig {
            secret: "another-secret".to_string(),
            ..test_config()
        };

        let token = issue_token(Uuid::new_v4(), true, 3600, &config_a).unwrap();
        assert!(validate_token(&token, &config_b).is_err());
    }

    #[test]
    fn test_wrong_audience_fails() {
        let token = issue_token(Uuid::new_v4(), true, 3600, &test_config()).unwrap();
        let config = JwtConfig {
            audience: "service_role".to_string(),
            ..test_config()
        };
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_missing_metadata_defaults_to_non_admin() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let claims = serde_json::json!({
            "sub": Uuid::new_v4(),
            "aud": DEFAULT_AUDIENCE,
            "exp": now + 3600,
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let decoded = validate_token(&token, &config).unwrap();
        assert!(!decoded.user_metadata.is_admin);
        assert_eq!(decoded.iat, 0);
    }
}
