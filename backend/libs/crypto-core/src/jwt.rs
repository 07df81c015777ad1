/// Shared JWT issuing and validation for Volontär services
///
/// Tokens are signed with RS256 only. Keys are loaded once at startup into
/// process-wide cells and are immutable afterwards.
///
/// ## Usage
///
/// ```rust,no_run
/// use crypto_core::jwt;
///
/// let private_key = std::env::var("JWT_PRIVATE_KEY_PEM").unwrap();
/// let public_key = std::env::var("JWT_PUBLIC_KEY_PEM").unwrap();
/// jwt::initialize_jwt_keys(&private_key, &public_key).unwrap();
/// ```
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

/// Session lifetime handed to the mobile app.
pub const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 12;

const JWT_ALGORITHM: Algorithm = Algorithm::RS256;

// ============================================================================
// Data Structures
// ============================================================================

/// JWT claims: standard registered claims plus the caller's email and role.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type, always "access" for now
    pub token_type: String,
    pub email: String,
    /// Role tag, e.g. "volunteer" or "organization"
    pub role: String,
}

// ============================================================================
// Key Storage
// ============================================================================

static JWT_ENCODING_KEY: OnceCell<EncodingKey> = OnceCell::new();
static JWT_DECODING_KEY: OnceCell<DecodingKey> = OnceCell::new();

/// Initialize JWT keys from PEM-formatted strings
///
/// Must be called once during startup, before any token is issued or checked.
/// A second call returns an error and leaves the first keys in place.
pub fn initialize_jwt_keys(private_key_pem: &str, public_key_pem: &str) -> Result<()> {
    let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA private key: {e}"))?;

    let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA public key: {e}"))?;

    JWT_ENCODING_KEY
        .set(encoding_key)
        .map_err(|_| anyhow!("JWT encoding key already initialized"))?;

    JWT_DECODING_KEY
        .set(decoding_key)
        .map_err(|_| anyhow!("JWT decoding key already initialized"))?;

    Ok(())
}

fn get_encoding_key() -> Result<&'static EncodingKey> {
    JWT_ENCODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT keys not initialized. Call initialize_jwt_keys() during startup.")
    })
}

fn get_decoding_key() -> Result<&'static DecodingKey> {
    JWT_DECODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT keys not initialized. Call initialize_jwt_keys() during startup.")
    })
}

// ============================================================================
// Token Generation
// ============================================================================

/// Issue an access token carrying the user's id, email and role.
pub fn generate_access_token(user_id: Uuid, email: &str, role: &str) -> Result<String> {
    let now = Utc::now();
    let expiry = now + Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS);

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
        token_type: "access".to_string(),
        email: email.to_string(),
        role: role.to_string(),
    };

    let encoding_key = get_encoding_key()?;
    encode(&Header::new(JWT_ALGORITHM), &claims, encoding_key)
        .map_err(|e| anyhow!("Failed to generate access token: {e}"))
}

// ============================================================================
// Token Validation
// ============================================================================

/// Validate signature and expiry, returning the decoded claims.
///
/// `token` is the raw JWT without the "Bearer " prefix.
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let decoding_key = get_decoding_key()?;

    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    decode::<Claims>(token, decoding_key, &validation)
        .map_err(|e| anyhow!("Token validation failed: {e}"))
}

/// Validate a token and parse its subject as a user id.
pub fn get_user_id_from_token(token: &str) -> Result<Uuid> {
    let token_data = validate_token(token)?;
    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|e| anyhow!("Invalid user ID format in token: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::init_test_keys;

    #[test]
    fn test_generate_access_token() {
        init_test_keys();

        let token = generate_access_token(Uuid::new_v4(), "test@example.com", "volunteer")
            .expect("Failed to generate token");
        assert_eq!(token.matches('.').count(), 2);
    }

    #[test]
    fn test_validate_valid_token() {
        init_test_keys();

        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, "org@example.com", "organization")
            .expect("Failed to generate token");

        let token_data = validate_token(&token).expect("token should validate");
        assert_eq!(token_data.claims.sub, user_id.to_string());
        assert_eq!(token_data.claims.email, "org@example.com");
        assert_eq!(token_data.claims.role, "organization");
        assert_eq!(token_data.claims.token_type, "access");
        assert_eq!(
            token_data.claims.exp - token_data.claims.iat,
            ACCESS_TOKEN_EXPIRY_HOURS * 3600
        );
    }

    #[test]
    fn test_validate_invalid_token() {
        init_test_keys();

        assert!(validate_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_validate_tampered_token() {
        init_test_keys();

        let token = generate_access_token(Uuid::new_v4(), "test@example.com", "volunteer")
            .expect("Failed to generate token");

        // Splice another token's payload (different role) onto this signature
        let forged = generate_access_token(Uuid::new_v4(), "test@example.com", "organization")
            .expect("Failed to generate token");
        let forged_payload = forged.split('.').nth(1).unwrap().to_string();
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = &forged_payload;
        assert!(validate_token(&parts.join(".")).is_err());
    }

    #[test]
    fn test_extract_user_id() {
        init_test_keys();

        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, "test@example.com", "volunteer")
            .expect("Failed to generate token");

        assert_eq!(get_user_id_from_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_second_initialization_is_rejected() {
        init_test_keys();

        let result = initialize_jwt_keys(
            crate::testing::TEST_PRIVATE_KEY,
            crate::testing::TEST_PUBLIC_KEY,
        );
        assert!(result.is_err());
    }
}
