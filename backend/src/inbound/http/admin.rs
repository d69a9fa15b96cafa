//! Roster, department and support-desk administration.
//!
//! ```text
//! GET    /api/v1/admin/users
//! POST   /api/v1/admin/users {"firstName":"Jane","lastName":"Doe",...}
//! PUT    /api/v1/admin/users/{id} {"departmentId":"eng","role":"manager"}
//! DELETE /api/v1/admin/users/{id}
//! POST   /api/v1/admin/users/{id}/password-reset
//! POST   /api/v1/admin/departments {"name":"Human Resources"}
//! GET    /api/v1/admin/support/threads
//! POST   /api/v1/admin/support/threads/{userId}/messages {"content":"On it."}
//! ```
//!
//! Handlers only parse input; the admin and messaging services consult the
//! capability table for the acting user.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{CreateUserRequest, UpdateUserRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    DepartmentBody, PasswordResetBody, RemovedUserBody, SupportThreadBody, UserBody,
};
use crate::inbound::http::messaging::MessagePayload;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    DEPARTMENT_ID, EMAIL, parse_content, parse_department_id, parse_department_name,
    parse_email, parse_name_parts, parse_optional_role, parse_password, parse_path_user_id,
    parse_role,
};

/// New account created on someone's behalf. `role` defaults to `user`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub department_id: Option<String>,
    #[schema(example = "manager")]
    pub role: Option<String>,
}

impl TryFrom<CreateUserPayload> for CreateUserRequest {
    type Error = Error;

    fn try_from(payload: CreateUserPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            name: parse_name_parts(payload.first_name, payload.last_name)?,
            email: parse_email(payload.email, EMAIL)?,
            password: parse_password(payload.password)?,
            department_id: parse_department_id(payload.department_id, DEPARTMENT_ID)?,
            role: parse_optional_role(payload.role)?,
        })
    }
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    pub department_id: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentPayload {
    #[schema(example = "Human Resources")]
    pub name: Option<String>,
}

/// Full roster.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    responses(
        (status = 200, description = "All users", body = [UserBody]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
    ),
    tags = ["admin"],
    operation_id = "listUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserBody>>> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let users = state.admin.list_users(&resolved.current).await?;
    Ok(web::Json(users.iter().map(UserBody::from).collect()))
}

/// Create an account that must change its password on first login.
#[utoipa::path(
    post,
    path = "/api/v1/admin/users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "User created", body = UserBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Unknown department", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
    ),
    tags = ["admin"],
    operation_id = "adminCreateUser"
)]
#[post("/admin/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateUserPayload>,
) -> ApiResult<HttpResponse> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let request = CreateUserRequest::try_from(payload.into_inner())?;
    let user = state.admin.create_user(&resolved.current, request).await?;
    Ok(HttpResponse::Created().json(UserBody::from(&user)))
}

/// Move a user between departments and set their role.
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}",
    params(("id" = String, Path, description = "User email")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "User updated", body = UserBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Unknown user or department", body = ErrorSchema),
        (status = 409, description = "Would remove the last admin", body = ErrorSchema),
    ),
    tags = ["admin"],
    operation_id = "adminUpdateUser"
)]
#[put("/admin/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateUserPayload>,
) -> ApiResult<web::Json<UserBody>> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let UpdateUserPayload {
        department_id,
        role,
    } = payload.into_inner();
    let request = UpdateUserRequest {
        user_id: parse_path_user_id(path.into_inner())?,
        department_id: parse_department_id(department_id, DEPARTMENT_ID)?,
        role: parse_role(role)?,
    };
    let user = state.admin.update_user(&resolved.current, request).await?;
    Ok(web::Json(UserBody::from(&user)))
}

/// Delete a user together with their chat messages and support thread.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    params(("id" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "User removed", body = RemovedUserBody),
        (status = 403, description = "Forbidden or deleting yourself", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
    ),
    tags = ["admin"],
    operation_id = "deleteUser"
)]
#[delete("/admin/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RemovedUserBody>> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let user_id = parse_path_user_id(path.into_inner())?;
    let removed = state.admin.delete_user(&resolved.current, &user_id).await?;
    Ok(web::Json(RemovedUserBody::from(removed)))
}

/// Issue a temporary password. It is returned once and never stored in
/// clear.
#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/password-reset",
    params(("id" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Temporary password issued", body = PasswordResetBody),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
    ),
    tags = ["admin"],
    operation_id = "resetPassword"
)]
#[post("/admin/users/{id}/password-reset")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let user_id = parse_path_user_id(path.into_inner())?;
    let reset = state
        .admin
        .reset_password(&resolved.current, &user_id)
        .await?;
    info!(actor = %resolved.current.id(), user = %user_id, "temporary password issued");
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "no-store"))
        .json(PasswordResetBody::from(reset)))
}

/// Add a department. The identifier is derived from the name.
#[utoipa::path(
    post,
    path = "/api/v1/admin/departments",
    request_body = CreateDepartmentPayload,
    responses(
        (status = 201, description = "Department created", body = DepartmentBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 409, description = "Department already exists", body = ErrorSchema),
    ),
    tags = ["admin"],
    operation_id = "adminCreateDepartment"
)]
#[post("/admin/departments")]
pub async fn create_department(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateDepartmentPayload>,
) -> ApiResult<HttpResponse> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let name = parse_department_name(payload.into_inner().name)?;
    let department = state
        .admin
        .create_department(&resolved.current, name)
        .await?;
    Ok(HttpResponse::Created().json(DepartmentBody::from(&department)))
}

/// Every support thread in triage order.
#[utoipa::path(
    get,
    path = "/api/v1/admin/support/threads",
    responses(
        (status = 200, description = "Support threads", body = [SupportThreadBody]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
    ),
    tags = ["admin"],
    operation_id = "getAllSupportThreads"
)]
#[get("/admin/support/threads")]
pub async fn support_threads(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<SupportThreadBody>>> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let threads = state.messaging.all_support_threads(&resolved.current).await?;
    Ok(web::Json(
        threads.into_iter().map(SupportThreadBody::from).collect(),
    ))
}

/// Reply to a user's support thread.
#[utoipa::path(
    post,
    path = "/api/v1/admin/support/threads/{userId}/messages",
    params(("userId" = String, Path, description = "Thread owner's email")),
    request_body = MessagePayload,
    responses(
        (status = 201, description = "Reply posted", body = SupportThreadBody),
        (status = 400, description = "Empty message", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "No such thread", body = ErrorSchema),
    ),
    tags = ["admin"],
    operation_id = "sendAdminSupportReply"
)]
#[post("/admin/support/threads/{userId}/messages")]
pub async fn reply_to_support_thread(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<MessagePayload>,
) -> ApiResult<HttpResponse> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let user_id = parse_path_user_id(path.into_inner())?;
    let content = parse_content(payload.into_inner().content)?;
    let thread = state
        .messaging
        .reply_to_support_thread(&resolved.current, &user_id, content)
        .await?;
    Ok(HttpResponse::Created().json(SupportThreadBody::from(thread)))
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
