//! Builders wiring the in-memory store and adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use step_challenge::domain::ports::{PasswordHasher, VerificationNotifier};
use step_challenge::domain::{
    AccountService, AdminService, LeaderboardService, MessagingService, SessionResolverService,
};
use step_challenge::inbound::http::state::HttpState;
use step_challenge::outbound::memory::InMemoryStore;
use step_challenge::outbound::notifier::TracingVerificationNotifier;

use super::ServerConfig;

/// Outbound adapters shared by every service.
#[derive(Clone)]
pub(crate) struct Adapters {
    pub(crate) store: Arc<InMemoryStore>,
    pub(crate) hasher: Arc<dyn PasswordHasher>,
    pub(crate) notifier: Arc<dyn VerificationNotifier>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl Adapters {
    /// Production adapters around `store`.
    pub(crate) fn new(store: Arc<InMemoryStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            store,
            hasher,
            notifier: Arc::new(TracingVerificationNotifier),
            clock: Arc::new(DefaultClock),
        }
    }
}

/// Assemble the driving-port services over one shared store.
pub(crate) fn build_http_state(config: &ServerConfig, adapters: &Adapters) -> web::Data<HttpState> {
    let Adapters {
        store,
        hasher,
        notifier,
        clock,
    } = adapters;

    let accounts = AccountService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        notifier.clone(),
        hasher.clone(),
        clock.clone(),
    )
    .with_settings(config.account_settings);
    let admin = AdminService::new(store.clone(), store.clone(), hasher.clone());
    let messaging = MessagingService::new(store.clone(), store.clone(), store.clone(), clock.clone());
    let leaderboard = LeaderboardService::new(store.clone(), store.clone());
    let sessions = SessionResolverService::new(store.clone(), config.view_override.clone());

    web::Data::new(HttpState {
        accounts: Arc::new(accounts),
        admin: Arc::new(admin),
        messaging: Arc::new(messaging),
        leaderboard: Arc::new(leaderboard),
        sessions: Arc::new(sessions),
    })
}
