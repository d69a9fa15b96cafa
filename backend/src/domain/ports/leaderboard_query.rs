//! Driving port for read-only standings.

use async_trait::async_trait;

use crate::domain::{Dashboard, Department, DepartmentStanding, Error, Timeframe, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaderboardQuery: Send + Sync {
    /// Department board for `timeframe`.
    async fn leaderboard(&self, timeframe: Timeframe) -> Result<Vec<DepartmentStanding>, Error>;

    /// Personal dashboard for `user`.
    async fn dashboard(&self, user: &User) -> Result<Dashboard, Error>;

    /// All departments.
    async fn departments(&self) -> Result<Vec<Department>, Error>;
}
