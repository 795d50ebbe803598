use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64::{
    alphabet,
    engine::{self, general_purpose},
    Engine,
};
use chrono::Utc;

use crate::error::AppError;

/// Standard-alphabet engine for tokens and the mock password "hash".
pub const TOKEN_ENGINE: engine::GeneralPurpose =
    engine::GeneralPurpose::new(&alphabet::STANDARD, general_purpose::PAD);

/// Demo session token: base64 of `userId:identifier:timestampMillis`.
/// Not signed, not verifiable; the decoded user id is trusted as-is.
pub fn issue_token(user_id: u32, identifier: &str) -> String {
    let input = format!("{}:{}:{}", user_id, identifier, Utc::now().timestamp_millis());
    TOKEN_ENGINE.encode(input)
}

pub fn decode_user_id(token: &str) -> Result<u32, AppError> {
    let invalid = || AppError::unauthorized("Invalid token");
    let raw = TOKEN_ENGINE.decode(token).map_err(|_| invalid())?;
    let decoded = String::from_utf8(raw).map_err(|_| invalid())?;
    decoded
        .split(':')
        .next()
        .and_then(|id| id.parse().ok())
        .ok_or_else(invalid)
}

/// Pulls the caller id out of the `Authorization: Bearer ...` header.
pub fn bearer_user_id(headers: &HeaderMap) -> Result<u32, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Authorization token required"))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized("Authorization token required"))?;
    decode_user_id(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn token_round_trip() {
        let token = issue_token(7, "9876543210");
        assert_eq!(decode_user_id(&token).unwrap(), 7);
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(decode_user_id("not base64 at all!!").is_err());
        let no_id = TOKEN_ENGINE.encode("abc:def");
        assert!(decode_user_id(&no_id).is_err());
    }

    #[test]
    fn bearer_header_required() {
        let headers = HeaderMap::new();
        assert!(bearer_user_id(&headers).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_user_id(&headers).is_err());

        let token = issue_token(3, "me@example.com");
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        assert_eq!(bearer_user_id(&headers).unwrap(), 3);
    }
}
