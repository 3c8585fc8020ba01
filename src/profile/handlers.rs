use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::{info, instrument, warn};

use crate::{
    auth::session::SessionUser,
    error::{AppError, AppResult},
    state::AppState,
    validation,
};

use super::dto::ProfileResponse;
use super::repo::Profile;
use super::services::{discard_avatar, presign_avatar, store_avatar};

/// Fields accepted by the add/edit forms. An empty avatar part (a file
/// input left blank by the browser) counts as "not supplied".
struct ProfileForm {
    city: Option<String>,
    gender: Option<String>,
    avatar: Option<(Bytes, String)>,
}

async fn read_profile_form(mp: &mut Multipart) -> AppResult<ProfileForm> {
    let mut form = ProfileForm {
        city: None,
        gender: None,
        avatar: None,
    };
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|_| AppError::Validation("malformed multipart body".into()))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("city") => {
                form.city = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| AppError::Validation("city must be text".into()))?,
                );
            }
            Some("gender") => {
                form.gender = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| AppError::Validation("gender must be text".into()))?,
                );
            }
            Some("avatar") => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::Validation("avatar upload failed".into()))?;
                if !data.is_empty() {
                    form.avatar = Some((data, content_type));
                }
            }
            _ => {}
        }
    }
    Ok(form)
}

fn require_city_and_gender(form: &ProfileForm) -> AppResult<(String, String)> {
    let city = form
        .city
        .clone()
        .ok_or_else(|| AppError::Validation("city is required".into()))?;
    let gender = form
        .gender
        .clone()
        .ok_or_else(|| AppError::Validation("gender is required".into()))?;
    if !validation::is_valid_city(&city) {
        return Err(AppError::Validation("invalid city".into()));
    }
    Ok((city, gender))
}

fn check_avatar_type(content_type: &str) -> AppResult<()> {
    if validation::avatar_ext_from_mime(content_type).is_none() {
        warn!(content_type, "rejected avatar content type");
        return Err(AppError::Validation("invalid avatar file".into()));
    }
    Ok(())
}

async fn to_response(state: &AppState, profile: Profile) -> AppResult<ProfileResponse> {
    let avatar_url = presign_avatar(state, &profile.avatar).await?;
    Ok(ProfileResponse {
        id: profile.id,
        city: profile.city,
        gender: profile.gender,
        avatar_url,
        created_at: profile.created_at,
        updated_at: profile.updated_at,
    })
}

#[instrument(skip(state, caller, mp))]
pub async fn add_profile(
    State(state): State<AppState>,
    caller: SessionUser,
    mut mp: Multipart,
) -> AppResult<(StatusCode, Json<ProfileResponse>)> {
    let form = read_profile_form(&mut mp).await?;
    let (city, gender) = require_city_and_gender(&form)?;
    let (avatar_body, avatar_ct) = form
        .avatar
        .ok_or_else(|| AppError::Validation("avatar file is required".into()))?;
    check_avatar_type(&avatar_ct)?;

    if Profile::find_by_user(&state.db, caller.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("profile already exists".into()));
    }

    let key = store_avatar(&state, caller.user_id, avatar_body, &avatar_ct).await?;
    let profile = Profile::create(&state.db, caller.user_id, &city, &gender, &key).await?;

    info!(user_id = %caller.user_id, profile_id = %profile.id, "profile added");
    let resp = to_response(&state, profile).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[instrument(skip(state, caller, mp))]
pub async fn edit_profile(
    State(state): State<AppState>,
    caller: SessionUser,
    mut mp: Multipart,
) -> AppResult<Json<ProfileResponse>> {
    let existing = Profile::find_by_user(&state.db, caller.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("no profile yet; create one first".into()))?;

    let form = read_profile_form(&mut mp).await?;
    let (city, gender) = require_city_and_gender(&form)?;

    let new_key = match form.avatar {
        Some((body, ct)) => {
            check_avatar_type(&ct)?;
            Some(store_avatar(&state, caller.user_id, body, &ct).await?)
        }
        None => None,
    };

    let profile =
        Profile::update(&state.db, caller.user_id, &city, &gender, new_key.as_deref()).await?;

    if new_key.is_some() && existing.avatar != profile.avatar {
        discard_avatar(&state, &existing.avatar).await;
    }

    info!(user_id = %caller.user_id, profile_id = %profile.id, "profile updated");
    let resp = to_response(&state, profile).await?;
    Ok(Json(resp))
}

#[instrument(skip(state, caller))]
pub async fn view_profile(
    State(state): State<AppState>,
    caller: SessionUser,
) -> AppResult<Json<ProfileResponse>> {
    let profile = Profile::find_by_user(&state.db, caller.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("create a profile to continue".into()))?;
    let resp = to_response(&state, profile).await?;
    Ok(Json(resp))
}
