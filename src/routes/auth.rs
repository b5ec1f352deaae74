use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

use crate::{
    auth::password::{hash_password, verify_password},
    domain::aggregates::User,
    error::AppError,
    state::AppState,
    store::StoreError,
};

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    pub name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

pub async fn signup(State(s): State<AppState>, Json(r): Json<SignupRequest>) -> Result<(StatusCode, Json<Value>), AppError> {
    if r.email.trim().is_empty() || r.password.is_empty() {
        return Err(AppError::Validation("Missing fields".into()));
    }
    r.validate()?;
    let hash = hash_password(&r.password)?;
    let user = User::register(r.name, r.email.trim().to_string(), hash);
    match s.store.insert_user(&user).await {
        Ok(()) => {}
        Err(StoreError::Duplicate(_)) => return Err(AppError::Conflict("User already exists".into())),
        Err(e) => return Err(e.into()),
    }
    info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
}

pub async fn login(State(s): State<AppState>, Json(r): Json<LoginRequest>) -> Result<Json<LoginResponse>, AppError> {
    if r.email.is_empty() || r.password.is_empty() {
        return Err(AppError::Unauthorized);
    }
    let user = s.store.user_by_email(r.email.trim()).await?.ok_or(AppError::Unauthorized)?;
    if !verify_password(&r.password, &user.password_hash) {
        return Err(AppError::Unauthorized);
    }
    let token = s.tokens.issue(&user)?;
    Ok(Json(LoginResponse { token, user }))
}
