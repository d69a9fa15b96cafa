//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use crate::domain::ports::{
    MockAccountCommand, MockAdminCommand, MockLeaderboardQuery, MockMessagingCommand,
    MockSessionResolver,
};
use crate::domain::{ResolvedSession, User, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{ApiResult, configure_api};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// One mock per driving port. Set expectations, then call
/// [`TestPorts::into_state`].
#[derive(Default)]
pub struct TestPorts {
    pub accounts: MockAccountCommand,
    pub admin: MockAdminCommand,
    pub messaging: MockMessagingCommand,
    pub leaderboard: MockLeaderboardQuery,
    pub sessions: MockSessionResolver,
}

impl TestPorts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every session to `user` with no view override.
    pub fn acting_as(self, user: User) -> Self {
        self.resolving_to(ResolvedSession {
            current: user,
            original: None,
        })
    }

    pub fn resolving_to(mut self, resolved: ResolvedSession) -> Self {
        self.sessions
            .expect_resolve()
            .returning(move |_, _| Ok(Some(resolved.clone())));
        self
    }

    pub fn into_state(self) -> HttpState {
        HttpState {
            accounts: Arc::new(self.accounts),
            admin: Arc::new(self.admin),
            messaging: Arc::new(self.messaging),
            leaderboard: Arc::new(self.leaderboard),
            sessions: Arc::new(self.sessions),
        }
    }
}

/// Test-only route that stores `user_id` in the session without a password.
async fn force_login(session: SessionContext, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let user_id = UserId::new(path.into_inner())
        .map_err(|error| crate::domain::Error::invalid_request(error.to_string()))?;
    session.persist_login(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// The full `/api/v1` surface over `state`, plus `POST /test/login/{id}`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .route("/test/login/{user_id}", web::post().to(force_login))
        .service(web::scope("/api/v1").configure(configure_api))
}

/// Extract the `session` cookie set by `res`.
pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Log `user_id` in through the test route and return the session cookie.
pub async fn login_cookie(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    user_id: &str,
) -> Cookie<'static> {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/test/login/{user_id}"))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "test login failed: {}", res.status());
    session_cookie(&res)
}
