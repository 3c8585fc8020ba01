use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::warn;
use uuid::Uuid;

use crate::auth::repo::Session;
use crate::error::AppError;
use crate::state::AppState;

/// Session token prefix, handy for spotting tokens in logs and configs.
const TOKEN_PREFIX: &str = "cv_";

/// Length of the random part of the token (characters).
const TOKEN_RANDOM_LENGTH: usize = 32;

/// Mints a new opaque session token. Returns the plaintext (sent to the
/// client exactly once) and the SHA-256 hex hash (stored in the DB).
pub fn generate_token() -> (String, String) {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    let random_part: String = (0..TOKEN_RANDOM_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();
    let token = format!("{}{}", TOKEN_PREFIX, random_part);
    let hash = hash_token(&token);
    (token, hash)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Authenticated caller, resolved from the bearer token against the
/// sessions table. Carries the session id so logout can delete the row.
pub struct SessionUser {
    pub user_id: Uuid,
    pub session_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("please login to continue".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| AppError::Unauthorized("invalid authorization header".into()))?;

        let session = Session::find_valid(&state.db, &hash_token(token)).await?;
        let session = session.ok_or_else(|| {
            warn!("unknown or expired session token");
            AppError::Unauthorized("invalid or expired session".into())
        })?;

        Ok(SessionUser {
            user_id: session.user_id,
            session_id: session.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_has_prefix_and_length() {
        let (token, _) = generate_token();
        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(token.len(), TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH);
        assert!(token
            .chars()
            .skip(TOKEN_PREFIX.len())
            .all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn hash_is_deterministic_and_matches() {
        let (token, hash) = generate_token();
        assert_eq!(hash, hash_token(&token));
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn distinct_tokens_per_call() {
        let (a, _) = generate_token();
        let (b, _) = generate_token();
        assert_ne!(a, b);
    }
}
