//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie carries exactly two keys: the logged-in user id and the
//! view-as-user flag. Everything else is re-resolved per request through the
//! [`SessionResolver`] port, so a deleted account or a changed role takes
//! effect on the next call.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::SessionResolver;
use crate::domain::{Error, ResolvedSession, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const VIEW_AS_USER_KEY: &str = "view_as_user";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Start a fresh session for `user_id`, dropping any view override.
    pub fn persist_login(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0.remove(VIEW_AS_USER_KEY);
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Toggle the view override flag.
    pub fn set_view_as_user(&self, enabled: bool) -> Result<(), Error> {
        if !enabled {
            self.0.remove(VIEW_AS_USER_KEY);
            return Ok(());
        }
        self.0
            .insert(VIEW_AS_USER_KEY, true)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop both keys and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Whether the view override flag is set.
    pub fn view_as_user(&self) -> Result<bool, Error> {
        self.0
            .get::<bool>(VIEW_AS_USER_KEY)
            .map(Option::unwrap_or_default)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Resolve the acting user for this request.
    ///
    /// A session that points at a user who no longer exists is purged and
    /// reported as `stale_session` so clients log out instead of retrying.
    pub async fn resolve(&self, resolver: &dyn SessionResolver) -> Result<ResolvedSession, Error> {
        let user_id = self.require_user_id()?;
        let view_as_user = self.view_as_user()?;
        match resolver.resolve(&user_id, view_as_user).await? {
            Some(resolved) => Ok(resolved),
            None => {
                warn!(user = %user_id, "purging session of missing user");
                self.purge();
                Err(Error::unauthorized("session is no longer valid")
                    .with_details(json!({ "code": "stale_session" })))
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use serde_json::Value;

    use crate::domain::Role;
    use crate::domain::ports::MockSessionResolver;
    use crate::test_support::member;

    const JANE: &str = "jane@dhs.lacounty.gov";

    fn session_test_app(
        resolver: MockSessionResolver,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let resolver: Arc<dyn SessionResolver> = Arc::new(resolver);
        App::new()
            .app_data(web::Data::new(resolver))
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .route(
                "/login",
                web::get().to(|session: SessionContext| async move {
                    let id = UserId::new(JANE).expect("fixture id");
                    session.persist_login(&id)?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/view",
                web::get().to(|session: SessionContext| async move {
                    session.set_view_as_user(true)?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/tampered",
                web::get().to(|session: Session| async move {
                    session
                        .insert(USER_ID_KEY, "not-an-email")
                        .expect("set invalid user id");
                    HttpResponse::Ok()
                }),
            )
            .route(
                "/whoami",
                web::get().to(
                    |session: SessionContext,
                     resolver: web::Data<Arc<dyn SessionResolver>>| async move {
                        let resolved = session.resolve(resolver.get_ref().as_ref()).await?;
                        Ok::<_, Error>(HttpResponse::Ok().body(format!(
                            "{}:{}",
                            resolved.current.id(),
                            resolved.is_viewing_as_user()
                        )))
                    },
                ),
            )
    }

    fn session_cookie(
        res: &actix_web::dev::ServiceResponse,
    ) -> actix_web::cookie::Cookie<'static> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    fn resolving_jane() -> MockSessionResolver {
        let mut resolver = MockSessionResolver::new();
        resolver
            .expect_resolve()
            .returning(|user_id, view_as_user| {
                assert_eq!(user_id.as_ref(), JANE);
                Ok(Some(ResolvedSession {
                    current: member(JANE, "eng", Role::User),
                    original: view_as_user.then(|| member(JANE, "eng", Role::Admin)),
                }))
            });
        resolver
    }

    #[actix_web::test]
    async fn login_round_trips_user_id() {
        let app = test::init_service(session_test_app(resolving_jane())).await;

        let login = test::call_service(&app, test::TestRequest::get().uri("/login").to_request())
            .await;
        let cookie = session_cookie(&login);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, format!("{JANE}:false"));
    }

    #[actix_web::test]
    async fn view_flag_is_forwarded_to_the_resolver() {
        let app = test::init_service(session_test_app(resolving_jane())).await;
        let login = test::call_service(&app, test::TestRequest::get().uri("/login").to_request())
            .await;
        let view = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/view")
                .cookie(session_cookie(&login))
                .to_request(),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(session_cookie(&view))
                .to_request(),
        )
        .await;
        let body = test::read_body(res).await;
        assert_eq!(body, format!("{JANE}:true"));
    }

    #[actix_web::test]
    async fn missing_session_is_unauthorised() {
        let mut resolver = MockSessionResolver::new();
        resolver.expect_resolve().never();
        let app = test::init_service(session_test_app(resolver)).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Error = test::read_body_json(res).await;
        assert_eq!(body.message(), "login required");
    }

    #[actix_web::test]
    async fn tampered_user_id_is_unauthorised() {
        let mut resolver = MockSessionResolver::new();
        resolver.expect_resolve().never();
        let app = test::init_service(session_test_app(resolver)).await;
        let set = test::call_service(
            &app,
            test::TestRequest::get().uri("/tampered").to_request(),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(session_cookie(&set))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn stale_session_is_purged() {
        let mut resolver = MockSessionResolver::new();
        resolver.expect_resolve().times(1).returning(|_, _| Ok(None));
        let app = test::init_service(session_test_app(resolver)).await;
        let login = test::call_service(&app, test::TestRequest::get().uri("/login").to_request())
            .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(session_cookie(&login))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let removal = session_cookie(&res);
        assert_eq!(removal.value(), "");
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["code"], "stale_session");
    }
}
