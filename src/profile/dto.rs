use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// Profile as returned to its owner. The avatar is exposed as a
/// presigned URL, never as the raw storage key.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub city: String,
    pub gender: String,
    pub avatar_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
