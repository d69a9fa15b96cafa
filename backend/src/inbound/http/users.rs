//! Profile handlers for the signed-in user.
//!
//! ```text
//! GET /api/v1/users/me
//! PUT /api/v1/users/me/avatar {"avatarUrl":"https://placehold.co/100x100/F87171/FFFFFF.png"}
//! PUT /api/v1/users/me/password {"newPassword":"...","confirmPassword":"..."}
//! PUT /api/v1/users/me/steps {"steps":8500}
//! ```
//!
//! Every mutation acts on the resolved current user, so an admin viewing as
//! the test user edits the test user's profile.

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{CurrentUserBody, UserBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_avatar, parse_password_change, parse_steps};

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvatarPayload {
    pub avatar_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordPayload {
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

/// Today's step count. Signed so negative input yields a validation error
/// rather than a body error.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepsPayload {
    #[schema(example = 8500)]
    pub steps: Option<i64>,
}

/// Fetch the acting user and the admin behind any view override.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = CurrentUserBody),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CurrentUserBody>> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let can_switch = state.sessions.may_switch_to_user_view(resolved.logged_in());
    Ok(web::Json(CurrentUserBody::new(&resolved, can_switch)))
}

/// Pick one of the predefined avatars.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/avatar",
    request_body = AvatarPayload,
    responses(
        (status = 200, description = "Avatar updated", body = UserBody),
        (status = 400, description = "Unknown avatar", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
    ),
    tags = ["users"],
    operation_id = "updateAvatar"
)]
#[put("/users/me/avatar")]
pub async fn update_avatar(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AvatarPayload>,
) -> ApiResult<web::Json<UserBody>> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let avatar = parse_avatar(payload.into_inner().avatar_url)?;
    let user = state
        .accounts
        .update_avatar(resolved.current.id(), avatar)
        .await?;
    Ok(web::Json(UserBody::from(&user)))
}

/// Replace the password and clear the forced-change flag.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/password",
    request_body = PasswordPayload,
    responses(
        (status = 200, description = "Password updated", body = UserBody),
        (status = 400, description = "Password policy violated", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
    ),
    tags = ["users"],
    operation_id = "updatePassword"
)]
#[put("/users/me/password")]
pub async fn update_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PasswordPayload>,
) -> ApiResult<web::Json<UserBody>> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let PasswordPayload {
        new_password,
        confirm_password,
    } = payload.into_inner();
    let change = parse_password_change(new_password, confirm_password)?;
    let user = state
        .accounts
        .update_password(resolved.current.id(), change)
        .await?;
    info!(user = %user.id(), "password changed");
    Ok(web::Json(UserBody::from(&user)))
}

/// Record today's steps, adjusting the weekly and total counters by the
/// difference.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/steps",
    request_body = StepsPayload,
    responses(
        (status = 200, description = "Steps recorded", body = UserBody),
        (status = 400, description = "Invalid step count", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Stored counters are inconsistent", body = ErrorSchema),
    ),
    tags = ["users"],
    operation_id = "updateSteps"
)]
#[put("/users/me/steps")]
pub async fn update_steps(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<StepsPayload>,
) -> ApiResult<web::Json<UserBody>> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let steps = parse_steps(payload.into_inner().steps)?;
    let user = state
        .accounts
        .update_steps(resolved.current.id(), steps)
        .await?;
    Ok(web::Json(UserBody::from(&user)))
}
