//! Shared harness for end-to-end flows through the HTTP app.
//!
//! Wires the real services over one in-memory store seeded with the demo
//! roster. Hashing, time and code delivery use the test-support doubles so
//! flows stay fast and deterministic.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::{Value, json};

use step_challenge::Trace;
use step_challenge::demo_data::{DEMO_PASSWORD, seed_demo_data};
use step_challenge::domain::ports::RecordingVerificationNotifier;
use step_challenge::domain::{
    AccountService, AdminService, DEFAULT_VIEW_ADMIN, DEFAULT_VIEW_TEST_USER,
    LeaderboardService, MessagingService, SessionResolverService, UserId, VerificationCode,
    ViewOverride,
};
use step_challenge::inbound::http::configure_api;
use step_challenge::inbound::http::state::HttpState;
use step_challenge::outbound::memory::InMemoryStore;
use step_challenge::test_support::{FixturePasswordHasher, MutableClock};

pub const ADMIN: &str = DEFAULT_VIEW_ADMIN;
pub const TEST_USER: &str = DEFAULT_VIEW_TEST_USER;
pub const MANAGER: &str = "diana.prince@dhs.lacounty.gov";
pub const PASSWORD: &str = DEMO_PASSWORD;

/// Store and doubles behind one app instance.
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MutableClock>,
    pub notifier: Arc<RecordingVerificationNotifier>,
}

impl Harness {
    /// A demo-seeded store at the start of the challenge.
    pub async fn seeded() -> Self {
        let store = Arc::new(InMemoryStore::default());
        seed_demo_data(store.as_ref(), &FixturePasswordHasher)
            .await
            .expect("demo data seeds");
        Self {
            store,
            clock: Arc::new(MutableClock::at_challenge_start()),
            notifier: Arc::new(RecordingVerificationNotifier::default()),
        }
    }

    fn state(&self) -> HttpState {
        let store = &self.store;
        let hasher = Arc::new(FixturePasswordHasher);
        let view = ViewOverride::new(
            UserId::new(ADMIN).expect("admin id"),
            UserId::new(TEST_USER).expect("test user id"),
        );
        HttpState {
            accounts: Arc::new(AccountService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                self.notifier.clone(),
                hasher.clone(),
                self.clock.clone(),
            )),
            admin: Arc::new(AdminService::new(store.clone(), store.clone(), hasher)),
            messaging: Arc::new(MessagingService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                self.clock.clone(),
            )),
            leaderboard: Arc::new(LeaderboardService::new(store.clone(), store.clone())),
            sessions: Arc::new(SessionResolverService::new(store.clone(), view)),
        }
    }

    /// Initialise the app with the production middleware stack.
    pub async fn app(
        &self,
    ) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
    {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
            .cookie_name("session".into())
            .cookie_secure(false)
            .build();
        test::init_service(
            App::new()
                .app_data(web::Data::new(self.state()))
                .wrap(Trace)
                .service(web::scope("/api/v1").wrap(session).configure(configure_api)),
        )
        .await
    }

    /// The code most recently sent to `email`.
    pub fn code_for(&self, email: &str) -> VerificationCode {
        self.notifier
            .last_code(&UserId::new(email).expect("email"))
            .expect("a code was sent")
    }
}

/// A response reduced to what flows assert on.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

/// A browser-like client that keeps the latest session cookie.
#[derive(Default)]
pub struct Client {
    cookie: Option<Cookie<'static>>,
}

impl Client {
    pub fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    pub async fn send<S, B>(&mut self, app: &S, request: TestRequest) -> Reply
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let request = match &self.cookie {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        };
        let res = test::call_service(app, request.to_request()).await;
        if let Some(cookie) = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
        {
            self.cookie = (!cookie.value().is_empty()).then(|| cookie.into_owned());
        }
        let status = res.status();
        let bytes = test::read_body(res).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        Reply { status, body }
    }

    pub async fn get<S, B>(&mut self, app: &S, uri: &str) -> Reply
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.send(app, TestRequest::get().uri(uri)).await
    }

    pub async fn post<S, B>(&mut self, app: &S, uri: &str, body: Value) -> Reply
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.send(app, TestRequest::post().uri(uri).set_json(body))
            .await
    }

    pub async fn put<S, B>(&mut self, app: &S, uri: &str, body: Value) -> Reply
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.send(app, TestRequest::put().uri(uri).set_json(body))
            .await
    }

    /// Log in and keep the issued cookie.
    pub async fn login<S, B>(app: &S, email: &str, password: &str) -> Self
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let mut client = Self::default();
        let reply = client
            .post(
                app,
                "/api/v1/login",
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "login failed: {}", reply.body);
        client
    }
}
