use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use tracing::info;

use edusync_types::api::{LoginRequest, LoginResponse, SignupRequest, SignupResponse};

use crate::error::ApiError;
use crate::middleware::create_token;
use crate::state::{AppState, with_db};

/// Treat absent and empty fields alike. Whitespace is a legal password.
fn required(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

pub async fn signup(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<SignupRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(username), Some(password)) = (required(req.username), required(req.password)) else {
        return Err(ApiError::BadRequest("Username and password required".into()));
    };

    let name = username.clone();
    let user_id = with_db(&state, move |db| db.create_user(&username, &password)).await?;

    info!("User '{}' signed up with id {}", name, user_id);
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully".into(),
            user_id,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let invalid = || ApiError::Unauthorized("Invalid credentials".into());

    let (Some(username), Some(password)) = (required(req.username), required(req.password)) else {
        return Err(invalid());
    };

    let user = with_db(&state, move |db| db.find_user(&username, &password))
        .await?
        .ok_or_else(invalid)?
        .into_user();

    let token = create_token(&state.jwt_secret, user.id, &user.username)?;

    info!("User {} logged in", user.id);
    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        user_id: user.id,
        username: user.username,
        token,
    }))
}
