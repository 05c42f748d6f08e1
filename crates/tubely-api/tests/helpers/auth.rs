use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-with-32-plus-characters";
pub const TEST_JWT_ISSUER: &str = "tubely-access";

#[derive(Serialize)]
struct Claims {
    sub: Uuid,
    iss: String,
    iat: i64,
    exp: i64,
}

/// Mint an HS256 access token for `user_id`.
pub fn mint_token(user_id: Uuid) -> String {
    mint_token_with(user_id, TEST_JWT_SECRET, 3600)
}

pub fn mint_token_with(user_id: Uuid, secret: &str, expires_in_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        iss: TEST_JWT_ISSUER.to_string(),
        iat: now,
        exp: now + expires_in_secs,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign token")
}

pub fn bearer(user_id: Uuid) -> String {
    format!("Bearer {}", mint_token(user_id))
}
