// Bearer token signing and verification
// Tokens carry the user id in `sub` and expire after TOKEN_TTL_HOURS

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TOKEN_TTL_HOURS: i64 = 8;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID (subject)
    pub sub: Uuid,
    /// Expiry timestamp (seconds since epoch)
    pub exp: usize,
}

/// HS256 keys derived once from the shared secret
///
/// Tokens are normally issued by the identity service in front of this API;
/// [`JwtKeys::issue`] exists for tooling and tests.
///
/// # Example
/// ```
/// use promptdeck_api::auth::jwt::JwtKeys;
/// use uuid::Uuid;
///
/// let keys = JwtKeys::new("your-secret-key");
/// let user_id = Uuid::new_v4();
/// let token = keys.issue(user_id).expect("valid token");
///
/// let claims = keys.verify(&token).expect("valid token");
/// assert_eq!(claims.sub, user_id);
/// ```
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Signs a token for `user_id`
    pub fn issue(&self, user_id: Uuid) -> Result<String, String> {
        let expiry = Utc::now() + Duration::hours(TOKEN_TTL_HOURS);
        let claims = Claims {
            sub: user_id,
            exp: expiry.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|e| e.to_string())
    }

    /// Checks signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<Claims, String> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-unit-tests";

    #[test]
    fn issued_token_verifies() {
        let keys = JwtKeys::new(TEST_SECRET);
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id).expect("valid token");

        let claims = keys.verify(&token).expect("valid verification");
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn other_secret_rejects() {
        let token = JwtKeys::new(TEST_SECRET).issue(Uuid::new_v4()).unwrap();

        assert!(JwtKeys::new("wrong-secret").verify(&token).is_err());
    }

    #[test]
    fn garbage_rejects() {
        assert!(JwtKeys::new(TEST_SECRET).verify("invalid.token.string").is_err());
    }

    #[test]
    fn expiry_within_ttl() {
        let keys = JwtKeys::new(TEST_SECRET);
        let token = keys.issue(Uuid::new_v4()).unwrap();

        let exp = keys.verify(&token).unwrap().exp as i64;
        let now = Utc::now().timestamp();
        assert!(exp > now);
        assert!(exp <= now + TOKEN_TTL_HOURS * 3600 + 10);
    }
}
