use anyhow::Context;
use bytes::Bytes;
use tracing::warn;
use uuid::Uuid;

use crate::state::AppState;
use crate::validation::avatar_ext_from_mime;

const AVATAR_URL_TTL_SECS: u64 = 30 * 60;

/// Upload an avatar image and return its storage key.
pub async fn store_avatar(
    st: &AppState,
    user_id: Uuid,
    body: Bytes,
    content_type: &str,
) -> anyhow::Result<String> {
    let ext = avatar_ext_from_mime(content_type).unwrap_or("bin");
    let key = format!("avatars/{}/{}.{}", user_id, Uuid::new_v4(), ext);
    st.storage
        .put_object(&key, body, content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;
    Ok(key)
}

pub async fn presign_avatar(st: &AppState, key: &str) -> anyhow::Result<String> {
    st.storage
        .presign_get(key, AVATAR_URL_TTL_SECS)
        .await
        .with_context(|| format!("presign url for avatar {}", key))
}

/// Best-effort removal of a replaced avatar object. A dangling object
/// is preferable to failing the profile update.
pub async fn discard_avatar(st: &AppState, key: &str) {
    if let Err(e) = st.storage.delete_object(key).await {
        warn!(error = %e, key, "failed to delete replaced avatar");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[tokio::test]
    async fn store_avatar_keys_by_user_and_extension() {
        let state = AppState::fake();
        let user_id = Uuid::new_v4();
        let key = store_avatar(&state, user_id, Bytes::from_static(b"img"), "image/png")
            .await
            .unwrap();
        assert!(key.starts_with(&format!("avatars/{}/", user_id)));
        assert!(key.ends_with(".png"));
    }

    #[tokio::test]
    async fn store_avatar_falls_back_to_bin_extension() {
        let state = AppState::fake();
        let key = store_avatar(
            &state,
            Uuid::new_v4(),
            Bytes::from_static(b"img"),
            "application/octet-stream",
        )
        .await
        .unwrap();
        assert!(key.ends_with(".bin"));
    }

    #[tokio::test]
    async fn presign_returns_url_containing_key() {
        let state = AppState::fake();
        let url = presign_avatar(&state, "avatars/u/a.jpg").await.unwrap();
        assert!(url.contains("avatars/u/a.jpg"));
    }
}
