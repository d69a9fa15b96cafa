//! Admin view override toggles.
//!
//! ```text
//! POST /api/v1/view/user
//! POST /api/v1/view/admin
//! ```
//!
//! Only the designated admin may switch to the test user's view. The flag
//! lives in the session cookie and is re-checked on every request.

use actix_web::{post, web};
use tracing::{info, warn};

use crate::domain::{Error, UNAUTHORIZED_ACTION};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::CurrentUserBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

async fn switch(
    state: &HttpState,
    session: &SessionContext,
    view_as_user: bool,
) -> ApiResult<CurrentUserBody> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let logged_in = resolved.logged_in();
    let can_switch = state.sessions.may_switch_to_user_view(logged_in);
    if view_as_user && !can_switch {
        warn!(user = %logged_in.id(), "view override refused");
        return Err(Error::forbidden(UNAUTHORIZED_ACTION));
    }

    session.set_view_as_user(view_as_user)?;
    info!(user = %logged_in.id(), view_as_user, "view override toggled");
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    Ok(CurrentUserBody::new(&resolved, can_switch))
}

/// Act as the designated test user.
#[utoipa::path(
    post,
    path = "/api/v1/view/user",
    responses(
        (status = 200, description = "Now viewing as the test user", body = CurrentUserBody),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the designated admin", body = ErrorSchema),
    ),
    tags = ["view"],
    operation_id = "switchToUserView"
)]
#[post("/view/user")]
pub async fn switch_to_user_view(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CurrentUserBody>> {
    switch(&state, &session, true).await.map(web::Json)
}

/// Drop the override. Harmless when none is active.
#[utoipa::path(
    post,
    path = "/api/v1/view/admin",
    responses(
        (status = 200, description = "Back to the logged-in identity", body = CurrentUserBody),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
    ),
    tags = ["view"],
    operation_id = "switchToAdminView"
)]
#[post("/view/admin")]
pub async fn switch_to_admin_view(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CurrentUserBody>> {
    switch(&state, &session, false).await.map(web::Json)
}
