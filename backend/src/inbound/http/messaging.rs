//! Department chat and the user side of the support desk.
//!
//! ```text
//! GET  /api/v1/departments/{id}/messages
//! POST /api/v1/departments/{id}/messages {"content":"Lunch walk at noon?"}
//! GET  /api/v1/support/thread
//! POST /api/v1/support/thread/messages {"content":"Help!"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{DepartmentMessageBody, SupportThreadBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{DEPARTMENT_ID, parse_content, parse_department_id};

/// Body of any posted message.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    #[schema(example = "Lunch walk at noon?")]
    pub content: Option<String>,
}

/// Chat history of the caller's own department, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/departments/{id}/messages",
    params(("id" = String, Path, description = "Department identifier")),
    responses(
        (status = 200, description = "Department chat", body = [DepartmentMessageBody]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a member of the department", body = ErrorSchema),
    ),
    tags = ["messaging"],
    operation_id = "getDepartmentMessages"
)]
#[get("/departments/{id}/messages")]
pub async fn department_messages(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<DepartmentMessageBody>>> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let department_id = parse_department_id(Some(path.into_inner()), DEPARTMENT_ID)?;
    let messages = state
        .messaging
        .department_messages(&resolved.current, &department_id)
        .await?;
    Ok(web::Json(
        messages.into_iter().map(DepartmentMessageBody::from).collect(),
    ))
}

/// Post to the caller's own department chat.
#[utoipa::path(
    post,
    path = "/api/v1/departments/{id}/messages",
    params(("id" = String, Path, description = "Department identifier")),
    request_body = MessagePayload,
    responses(
        (status = 201, description = "Message posted", body = DepartmentMessageBody),
        (status = 400, description = "Empty message", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a member of the department", body = ErrorSchema),
    ),
    tags = ["messaging"],
    operation_id = "sendDepartmentMessage"
)]
#[post("/departments/{id}/messages")]
pub async fn send_department_message(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<MessagePayload>,
) -> ApiResult<HttpResponse> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let department_id = parse_department_id(Some(path.into_inner()), DEPARTMENT_ID)?;
    let content = parse_content(payload.into_inner().content)?;
    let message = state
        .messaging
        .send_department_message(&resolved.current, &department_id, content)
        .await?;
    Ok(HttpResponse::Created().json(DepartmentMessageBody::from(message)))
}

/// The caller's support thread. Opening it marks admin replies as read.
#[utoipa::path(
    get,
    path = "/api/v1/support/thread",
    responses(
        (status = 200, description = "Support thread", body = SupportThreadBody),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
    ),
    tags = ["messaging"],
    operation_id = "getSupportThread"
)]
#[get("/support/thread")]
pub async fn support_thread(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SupportThreadBody>> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let thread = state.messaging.support_thread(&resolved.current).await?;
    Ok(web::Json(SupportThreadBody::from(thread)))
}

/// Write to the support desk. The first message gets an automatic reply.
#[utoipa::path(
    post,
    path = "/api/v1/support/thread/messages",
    request_body = MessagePayload,
    responses(
        (status = 201, description = "Message posted", body = SupportThreadBody),
        (status = 400, description = "Empty message", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
    ),
    tags = ["messaging"],
    operation_id = "sendSupportMessage"
)]
#[post("/support/thread/messages")]
pub async fn send_support_message(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<MessagePayload>,
) -> ApiResult<HttpResponse> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let content = parse_content(payload.into_inner().content)?;
    let thread = state
        .messaging
        .send_support_message(&resolved.current, content)
        .await?;
    Ok(HttpResponse::Created().json(SupportThreadBody::from(thread)))
}
