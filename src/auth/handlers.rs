use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{MessageResponse, SignInRequest, SignUpRequest},
        extractors::SessionUser,
        services,
    },
    error::ApiError,
    state::AppState,
    users::repo_types::User,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/signin", post(sign_in))
        .route("/user/signup", post(sign_up))
        .route("/user/signout", post(sign_out))
        .route("/user/profile/personalInfo", get(personal_info))
}

const INVALID_BODY: &str = "Invalid request body";

/// Serde's rejection text can quote submitted values (passwords included), so only
/// the status is logged and the client gets a fixed message.
fn bad_body(e: JsonRejection) -> ApiError {
    warn!(status = %e.status(), "rejected request body");
    ApiError::Validation(INVALID_BODY.to_string())
}

#[instrument(skip(state, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(bad_body)?;

    let user = services::authenticate(
        state.users.as_ref(),
        state.hasher.as_ref(),
        &payload.email,
        &payload.password,
    )
    .await?;

    let token = state.keys.sign(&user)?;
    let cookie = state.cookies.issue(token);

    info!(user_id = %user.id, "user signed in");
    Ok((
        AppendHeaders([(SET_COOKIE, cookie.to_string())]),
        Json(MessageResponse::ok("Login successful")),
    ))
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(bad_body)?;

    let today = OffsetDateTime::now_utc().date();
    let user = services::register(
        state.users.as_ref(),
        state.hasher.as_ref(),
        payload,
        today,
    )
    .await?;

    info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(MessageResponse::ok("Success"))))
}

/// Always succeeds, with or without a session.
#[instrument(skip(state))]
pub async fn sign_out(State(state): State<AppState>) -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, state.cookies.clear().to_string())]),
        Json(MessageResponse::ok("Logout successful")),
    )
}

/// Current store record for the session's email; the token only proves identity.
#[instrument(skip_all)]
pub async fn personal_info(
    State(state): State<AppState>,
    SessionUser(claims): SessionUser,
) -> Result<Json<User>, ApiError> {
    let user = state
        .users
        .find_by_email(&claims.email)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %claims.sub, "session refers to a missing user");
            ApiError::Unauthorized
        })?;
    Ok(Json(user))
}
