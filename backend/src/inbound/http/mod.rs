//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod admin;
pub mod dto;
pub mod error;
pub mod health;
pub mod leaderboard;
pub mod messaging;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod view;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler plus the extractor error handlers.
///
/// Mount inside the versioned scope:
///
/// ```ignore
/// App::new().service(web::scope("/api/v1").configure(configure_api))
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(accounts::signup)
        .service(accounts::verify_email)
        .service(accounts::login)
        .service(accounts::logout)
        .service(users::current_user)
        .service(users::update_avatar)
        .service(users::update_password)
        .service(users::update_steps)
        .service(view::switch_to_user_view)
        .service(view::switch_to_admin_view)
        .service(leaderboard::dashboard)
        .service(leaderboard::leaderboard)
        .service(leaderboard::list_departments)
        .service(messaging::department_messages)
        .service(messaging::send_department_message)
        .service(messaging::support_thread)
        .service(messaging::send_support_message)
        .service(admin::list_users)
        .service(admin::create_user)
        .service(admin::update_user)
        .service(admin::delete_user)
        .service(admin::reset_password)
        .service(admin::create_department)
        .service(admin::support_threads)
        .service(admin::reply_to_support_thread);
}
