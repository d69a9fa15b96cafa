//! Signup, email verification, login and logout.
//!
//! ```text
//! POST /api/v1/signup {"name":"Jane Doe","email":"jane@dhs.lacounty.gov",...}
//! POST /api/v1/verify-email {"email":"jane@dhs.lacounty.gov","code":"123456"}
//! POST /api/v1/login {"email":"jane@dhs.lacounty.gov","password":"password123"}
//! POST /api/v1/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{SignupRequest, VerifyEmailRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{PendingSignupBody, UserBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    DEPARTMENT_ID, EMAIL, parse_department_id, parse_display_name, parse_email, parse_login,
    parse_password, parse_verification_code,
};

/// Signup form. Every field is required.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub department_id: Option<String>,
}

impl TryFrom<SignupPayload> for SignupRequest {
    type Error = Error;

    fn try_from(payload: SignupPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            name: parse_display_name(payload.name)?,
            email: parse_email(payload.email, EMAIL)?,
            password: parse_password(payload.password)?,
            department_id: parse_department_id(payload.department_id, DEPARTMENT_ID)?,
        })
    }
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailPayload {
    pub email: Option<String>,
    #[schema(example = "123456")]
    pub code: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Park a signup and send its verification code.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignupPayload,
    responses(
        (status = 202, description = "Verification code sent", body = PendingSignupBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown department", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
    ),
    tags = ["accounts"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupPayload>,
) -> ApiResult<HttpResponse> {
    let request = SignupRequest::try_from(payload.into_inner())?;
    let pending = state.accounts.signup(request).await?;
    Ok(HttpResponse::Accepted().json(PendingSignupBody::from(pending)))
}

/// Redeem a verification code and create the account.
#[utoipa::path(
    post,
    path = "/api/v1/verify-email",
    request_body = VerifyEmailPayload,
    responses(
        (status = 201, description = "Account created", body = UserBody),
        (status = 400, description = "Invalid or expired code", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
    ),
    tags = ["accounts"],
    operation_id = "verifyEmail",
    security([])
)]
#[post("/verify-email")]
pub async fn verify_email(
    state: web::Data<HttpState>,
    payload: web::Json<VerifyEmailPayload>,
) -> ApiResult<HttpResponse> {
    let VerifyEmailPayload { email, code } = payload.into_inner();
    let request = VerifyEmailRequest {
        email: parse_email(email, EMAIL)?,
        code: parse_verification_code(code)?,
    };
    let user = state.accounts.verify_email(request).await?;
    Ok(HttpResponse::Created().json(UserBody::from(&user)))
}

/// Authenticate and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login success", body = UserBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginPayload>,
) -> ApiResult<web::Json<UserBody>> {
    let LoginPayload { email, password } = payload.into_inner();
    let credentials = parse_login(email, password)?;
    let user = state.accounts.login(credentials).await?;
    session.persist_login(user.id())?;
    Ok(web::Json(UserBody::from(&user)))
}

/// End the session. Always succeeds.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["accounts"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    if let Ok(Some(user_id)) = session.user_id() {
        info!(user = %user_id, "logout");
    }
    session.purge();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
