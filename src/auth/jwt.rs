use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Claims carried by tokens from the external identity provider. Only the
/// subject and expiry are checked here.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
pub fn issue_test_token(sub: &str, secret: &str, ttl_secs: i64) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let exp = (chrono::Utc::now().timestamp() + ttl_secs).max(0) as usize;
    encode(
        &Header::default(),
        &Claims {
            sub: sub.to_string(),
            exp,
        },
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
