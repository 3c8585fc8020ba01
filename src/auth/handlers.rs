use axum::{
    extract::State,
    routing::{get, post},
    Form, Json, Router,
};
use time::{Duration, OffsetDateTime};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{DashboardResponse, LoginForm, MessageResponse, PublicUser, RegisterForm,
              SessionResponse},
        password::{hash_password, verify_password},
        repo::{Session, User},
        session::{generate_token, SessionUser},
    },
    error::{AppError, AppResult},
    profile::repo::Profile,
    state::AppState,
    validation,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/dashboard", get(dashboard))
}

#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(mut form): Form<RegisterForm>,
) -> AppResult<Json<MessageResponse>> {
    form.email = form.email.trim().to_lowercase();

    if !validation::is_valid_username(&form.username) {
        warn!(username = %form.username, "invalid username");
        return Err(AppError::Validation("invalid username".into()));
    }
    if !validation::is_valid_email(&form.email) {
        warn!(email = %form.email, "invalid email");
        return Err(AppError::Validation("invalid email".into()));
    }
    if !validation::is_valid_password(&form.password) {
        warn!("invalid password");
        return Err(AppError::Validation("invalid password".into()));
    }
    if form.password != form.cpassword {
        return Err(AppError::Validation("passwords do not match".into()));
    }

    if User::find_by_email(&state.db, &form.email).await?.is_some() {
        warn!(email = %form.email, "email already registered");
        return Err(AppError::Conflict("email already exists".into()));
    }
    if User::find_by_name(&state.db, &form.username).await?.is_some() {
        warn!(username = %form.username, "username already taken");
        return Err(AppError::Conflict("username already exists".into()));
    }

    let hash = hash_password(&form.password)?;
    let user = User::create(&state.db, &form.username, &form.email, &hash).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(MessageResponse {
        message: "user registered successfully".into(),
    }))
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Form(mut form): Form<LoginForm>,
) -> AppResult<Json<SessionResponse>> {
    form.email = form.email.trim().to_lowercase();

    if !validation::is_valid_email(&form.email) {
        warn!(email = %form.email, "invalid email");
        return Err(AppError::Validation("invalid email".into()));
    }
    if !validation::is_valid_password(&form.password) {
        warn!("invalid password format");
        return Err(AppError::Validation("invalid password".into()));
    }

    let user = User::find_by_email(&state.db, &form.email).await?;
    let user = match user {
        Some(u) => u,
        None => {
            warn!(email = %form.email, "login unknown email");
            return Err(AppError::Unauthorized("invalid email or password".into()));
        }
    };

    if !verify_password(&form.password, &user.password_hash)? {
        warn!(email = %form.email, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized("invalid email or password".into()));
    }

    let (token, token_hash) = generate_token();
    let expires_at =
        OffsetDateTime::now_utc() + Duration::minutes(state.config.session_ttl_minutes);
    Session::create(&state.db, user.id, &token_hash, expires_at).await?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(SessionResponse {
        token,
        user: PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
        },
    }))
}

#[instrument(skip(state, caller))]
pub async fn logout(
    State(state): State<AppState>,
    caller: SessionUser,
) -> AppResult<Json<MessageResponse>> {
    Session::delete(&state.db, caller.session_id).await?;
    info!(user_id = %caller.user_id, "user logged out");
    Ok(Json(MessageResponse {
        message: "logged out successfully".into(),
    }))
}

#[instrument(skip(state, caller))]
pub async fn dashboard(
    State(state): State<AppState>,
    caller: SessionUser,
) -> AppResult<Json<DashboardResponse>> {
    let user = User::find_by_id(&state.db, caller.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("user no longer exists".into()))?;

    let has_profile = Profile::find_by_user(&state.db, user.id).await?.is_some();

    Ok(Json(DashboardResponse {
        user: PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
        },
        has_profile,
    }))
}
