//! Department standings and the personal dashboard.
//!
//! Pure read models computed from a snapshot of departments and users.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::department::Department;
use super::steps::{CHALLENGE_TARGET_STEPS, StepCounts};
use super::user::{AvatarUrl, DisplayName, User, UserId};

/// Counter a leaderboard ranks by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Daily,
    Weekly,
    #[default]
    Total,
}

/// Error for unknown timeframe strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("timeframe must be one of daily, weekly, total")]
pub struct UnknownTimeframe;

impl Timeframe {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Total => "total",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = UnknownTimeframe;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "total" => Ok(Self::Total),
            _ => Err(UnknownTimeframe),
        }
    }
}

impl StepCounts {
    /// The counter matching `timeframe`.
    pub fn for_timeframe(&self, timeframe: Timeframe) -> u64 {
        match timeframe {
            Timeframe::Daily => self.daily(),
            Timeframe::Weekly => self.weekly(),
            Timeframe::Total => self.total(),
        }
    }
}

/// One member row on a department board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberStanding {
    pub user_id: UserId,
    pub name: DisplayName,
    pub avatar: AvatarUrl,
    pub steps: u64,
}

/// One department row with its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentStanding {
    pub department: Department,
    pub steps: u64,
    pub members: Vec<MemberStanding>,
}

/// Rank departments by the summed counter for `timeframe`.
///
/// Departments sort by steps descending then id; members likewise by steps
/// then id. Users whose department is unknown are left out.
pub fn rank_departments(
    departments: &[Department],
    users: &[User],
    timeframe: Timeframe,
) -> Vec<DepartmentStanding> {
    let mut standings: Vec<DepartmentStanding> = departments
        .iter()
        .map(|department| {
            let mut members: Vec<MemberStanding> = users
                .iter()
                .filter(|user| user.department_id() == department.id())
                .map(|user| MemberStanding {
                    user_id: user.id().clone(),
                    name: user.name().clone(),
                    avatar: user.avatar().clone(),
                    steps: user.steps().for_timeframe(timeframe),
                })
                .collect();
            members.sort_by(|a, b| b.steps.cmp(&a.steps).then_with(|| a.user_id.cmp(&b.user_id)));
            let steps = members
                .iter()
                .fold(0_u64, |sum, member| sum.saturating_add(member.steps));
            DepartmentStanding {
                department: department.clone(),
                steps,
                members,
            }
        })
        .collect();
    standings.sort_by(by_steps_then_id);
    standings
}

fn by_steps_then_id(a: &DepartmentStanding, b: &DepartmentStanding) -> Ordering {
    b.steps
        .cmp(&a.steps)
        .then_with(|| a.department.id().cmp(b.department.id()))
}

/// The caller's department on the overall board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentSummary {
    pub department: Department,
    /// 1-based position on the total board.
    pub rank: usize,
    pub total_steps: u64,
    pub weekly_steps: u64,
    pub previous_weekly_steps: u64,
    pub weekly_trend: i64,
}

/// The department directly ahead of the caller's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rival {
    pub department: Department,
    pub total_steps: u64,
    /// Steps needed to move strictly ahead.
    pub steps_to_overtake: u64,
}

/// Personal dashboard for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub steps: StepCounts,
    pub daily_goal: u64,
    /// `daily / goal` as a percentage, capped at 100.
    pub goal_progress_percent: u8,
    pub goal_met: bool,
    /// Today's steps minus yesterday's.
    pub daily_trend: i64,
    /// `None` when the user's department no longer exists.
    pub department: Option<DepartmentSummary>,
    /// `None` when the user's department leads.
    pub rival: Option<Rival>,
    pub challenge_target_steps: u64,
}

impl Dashboard {
    /// Compute the dashboard for `user` against the full roster.
    pub fn build(user: &User, departments: &[Department], users: &[User]) -> Self {
        let steps = *user.steps();
        let daily_goal = user.daily_goal().max(1);
        let totals = rank_departments(departments, users, Timeframe::Total);
        let position = totals
            .iter()
            .position(|standing| standing.department.id() == user.department_id());

        let department = position.and_then(|index| {
            let standing = totals.get(index)?;
            let (weekly, previous_weekly) = users
                .iter()
                .filter(|member| member.department_id() == user.department_id())
                .fold((0_u64, 0_u64), |(weekly, previous), member| {
                    (
                        weekly.saturating_add(member.steps().weekly()),
                        previous.saturating_add(member.steps().previous_weekly()),
                    )
                });
            Some(DepartmentSummary {
                department: standing.department.clone(),
                rank: index.saturating_add(1),
                total_steps: standing.steps,
                weekly_steps: weekly,
                previous_weekly_steps: previous_weekly,
                weekly_trend: signed_delta(weekly, previous_weekly),
            })
        });

        let rival = position
            .and_then(|index| index.checked_sub(1))
            .and_then(|ahead| totals.get(ahead))
            .zip(department.as_ref())
            .map(|(ahead, own)| Rival {
                department: ahead.department.clone(),
                total_steps: ahead.steps,
                steps_to_overtake: ahead.steps.saturating_sub(own.total_steps).saturating_add(1),
            });

        Self {
            steps,
            daily_goal,
            goal_progress_percent: progress_percent(steps.daily(), daily_goal),
            goal_met: steps.daily() >= daily_goal,
            daily_trend: signed_delta(steps.daily(), steps.previous_daily()),
            department,
            rival,
            challenge_target_steps: CHALLENGE_TARGET_STEPS,
        }
    }
}

fn progress_percent(daily: u64, goal: u64) -> u8 {
    let percent = u128::from(daily)
        .saturating_mul(100)
        .checked_div(u128::from(goal))
        .unwrap_or(100)
        .min(100);
    u8::try_from(percent).unwrap_or(100)
}

fn signed_delta(current: u64, previous: u64) -> i64 {
    let delta = i128::from(current).saturating_sub(i128::from(previous));
    i64::try_from(delta).unwrap_or(if delta.is_negative() { i64::MIN } else { i64::MAX })
}
