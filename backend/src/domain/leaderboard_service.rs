//! Read-only standings for the leaderboard and dashboard screens.

use std::sync::Arc;

use async_trait::async_trait;

use super::ports::{DepartmentRepository, LeaderboardQuery, UserRepository};
use super::service_support::{map_department_error, map_user_error};
use super::{
    Dashboard, Department, DepartmentStanding, Error, Timeframe, User, rank_departments,
};

/// Leaderboard service implementing the [`LeaderboardQuery`] driving port.
#[derive(Clone)]
pub struct LeaderboardService<U, D> {
    users: Arc<U>,
    departments: Arc<D>,
}

impl<U, D> LeaderboardService<U, D> {
    pub fn new(users: Arc<U>, departments: Arc<D>) -> Self {
        Self { users, departments }
    }
}

impl<U, D> LeaderboardService<U, D>
where
    U: UserRepository,
    D: DepartmentRepository,
{
    async fn snapshot(&self) -> Result<(Vec<Department>, Vec<User>), Error> {
        let departments = self
            .departments
            .list()
            .await
            .map_err(map_department_error)?;
        let users = self.users.list().await.map_err(map_user_error)?;
        Ok((departments, users))
    }
}

#[async_trait]
impl<U, D> LeaderboardQuery for LeaderboardService<U, D>
where
    U: UserRepository,
    D: DepartmentRepository,
{
    async fn leaderboard(&self, timeframe: Timeframe) -> Result<Vec<DepartmentStanding>, Error> {
        let (departments, users) = self.snapshot().await?;
        Ok(rank_departments(&departments, &users, timeframe))
    }

    async fn dashboard(&self, user: &User) -> Result<Dashboard, Error> {
        let (departments, users) = self.snapshot().await?;
        Ok(Dashboard::build(user, &departments, &users))
    }

    async fn departments(&self) -> Result<Vec<Department>, Error> {
        self.departments
            .list()
            .await
            .map_err(map_department_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, StepCounts};
    use crate::outbound::memory::InMemoryStore;
    use crate::test_support::{department, member_with_steps};
    use rstest::{fixture, rstest};

    #[fixture]
    async fn service() -> (LeaderboardService<InMemoryStore, InMemoryStore>, User) {
        let store = Arc::new(InMemoryStore::default());
        for (id, name) in [("eng", "Engineering"), ("hr", "Human Resources")] {
            DepartmentRepository::insert(store.as_ref(), &department(id, name))
                .await
                .expect("seed department");
        }
        let caller = member_with_steps(
            "jane@dhs.lacounty.gov",
            "hr",
            Role::User,
            StepCounts::new(6_000, 30_000, 60_000, 5_000, 28_000),
        );
        let rows = [
            caller.clone(),
            member_with_steps(
                "joe@dhs.lacounty.gov",
                "eng",
                Role::User,
                StepCounts::new(9_000, 40_000, 100_000, 8_000, 41_000),
            ),
        ];
        for user in &rows {
            UserRepository::insert(store.as_ref(), user)
                .await
                .expect("seed user");
        }
        (
            LeaderboardService::new(Arc::clone(&store), Arc::clone(&store)),
            caller,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn leaderboard_reads_the_live_roster(
        #[future] service: (LeaderboardService<InMemoryStore, InMemoryStore>, User),
    ) {
        let (service, _) = service.await;
        let board = service
            .leaderboard(Timeframe::Daily)
            .await
            .expect("board");
        let ids: Vec<&str> = board.iter().map(|s| s.department.id().as_ref()).collect();
        assert_eq!(ids, ["eng", "hr"]);
        assert_eq!(board[0].steps, 9_000);
    }

    #[rstest]
    #[tokio::test]
    async fn dashboard_names_the_department_ahead(
        #[future] service: (LeaderboardService<InMemoryStore, InMemoryStore>, User),
    ) {
        let (service, caller) = service.await;
        let dashboard = service.dashboard(&caller).await.expect("dashboard");
        let rival = dashboard.rival.expect("eng leads");
        assert_eq!(rival.department.id().as_ref(), "eng");
        assert_eq!(rival.steps_to_overtake, 40_001);
        assert_eq!(dashboard.department.expect("ranked").rank, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn departments_are_listed(
        #[future] service: (LeaderboardService<InMemoryStore, InMemoryStore>, User),
    ) {
        let (service, _) = service.await;
        let departments = service.departments().await.expect("departments");
        assert_eq!(departments.len(), 2);
    }
}
