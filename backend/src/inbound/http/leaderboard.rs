//! Dashboard, leaderboard and department directory.
//!
//! ```text
//! GET /api/v1/dashboard
//! GET /api/v1/leaderboard?timeframe=weekly
//! GET /api/v1/departments
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{DashboardBody, DepartmentBody, LeaderboardBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_timeframe;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardParams {
    /// `daily`, `weekly` or `total`. Defaults to `total`.
    #[param(example = "weekly")]
    pub timeframe: Option<String>,
}

/// Personal progress and department standing of the acting user.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = DashboardBody),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
    ),
    tags = ["leaderboard"],
    operation_id = "getDashboard"
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardBody>> {
    let resolved = session.resolve(state.sessions.as_ref()).await?;
    let dashboard = state.leaderboard.dashboard(&resolved.current).await?;
    Ok(web::Json(DashboardBody::from(dashboard)))
}

/// Departments ranked by summed steps for one timeframe.
#[utoipa::path(
    get,
    path = "/api/v1/leaderboard",
    params(LeaderboardParams),
    responses(
        (status = 200, description = "Ranked departments", body = LeaderboardBody),
        (status = 400, description = "Unknown timeframe", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
    ),
    tags = ["leaderboard"],
    operation_id = "getLeaderboard"
)]
#[get("/leaderboard")]
pub async fn leaderboard(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<LeaderboardParams>,
) -> ApiResult<web::Json<LeaderboardBody>> {
    session.resolve(state.sessions.as_ref()).await?;
    let timeframe = parse_timeframe(query.into_inner().timeframe)?;
    let standings = state.leaderboard.leaderboard(timeframe).await?;
    Ok(web::Json(LeaderboardBody::new(timeframe, standings)))
}

/// Every department. Public so the signup form can list them.
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses((status = 200, description = "Departments", body = [DepartmentBody])),
    tags = ["leaderboard"],
    operation_id = "listDepartments",
    security([])
)]
#[get("/departments")]
pub async fn list_departments(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<DepartmentBody>>> {
    let departments = state.leaderboard.departments().await?;
    Ok(web::Json(
        departments.iter().map(DepartmentBody::from).collect(),
    ))
}
