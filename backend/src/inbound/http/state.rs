//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without a store.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AdminCommand, LeaderboardQuery, MessagingCommand, SessionResolver,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub admin: Arc<dyn AdminCommand>,
    pub messaging: Arc<dyn MessagingCommand>,
    pub leaderboard: Arc<dyn LeaderboardQuery>,
    pub sessions: Arc<dyn SessionResolver>,
}
