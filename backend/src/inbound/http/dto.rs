//! Response payloads shared by the HTTP handlers.
//!
//! Domain types stay free of serialisation concerns; these camelCase views
//! are built from them at the edge and documented through utoipa.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    DepartmentMessageView, PasswordReset, PendingSignup, RemovedUser, SupportThreadView,
};
use crate::domain::{
    Dashboard, Department, DepartmentStanding, MemberStanding, ResolvedSession, StepCounts,
    SupportMessage, Timeframe, User,
};

/// Step counters of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepsBody {
    pub daily: u64,
    pub weekly: u64,
    pub total: u64,
    pub previous_daily: u64,
    pub previous_weekly: u64,
}

impl From<&StepCounts> for StepsBody {
    fn from(steps: &StepCounts) -> Self {
        Self {
            daily: steps.daily(),
            weekly: steps.weekly(),
            total: steps.total(),
            previous_daily: steps.previous_daily(),
            previous_weekly: steps.previous_weekly(),
        }
    }
}

/// Public profile of a user. The credential hash never leaves the domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    #[schema(example = "jane.doe@dhs.lacounty.gov")]
    pub id: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub avatar: String,
    #[schema(example = "eng")]
    pub department_id: String,
    #[schema(example = "user")]
    pub role: String,
    pub steps: StepsBody,
    pub daily_goal: u64,
    pub must_change_password: bool,
}

impl From<&User> for UserBody {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_string(),
            avatar: user.avatar().as_ref().to_owned(),
            department_id: user.department_id().to_string(),
            role: user.role().to_string(),
            steps: StepsBody::from(user.steps()),
            daily_goal: user.daily_goal(),
            must_change_password: user.must_change_password(),
        }
    }
}

/// The acting user plus the admin behind a view override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserBody {
    pub user: UserBody,
    pub original_user: Option<UserBody>,
    pub is_viewing_as_user: bool,
    pub can_switch_to_user_view: bool,
}

impl CurrentUserBody {
    pub fn new(session: &ResolvedSession, can_switch_to_user_view: bool) -> Self {
        Self {
            user: UserBody::from(&session.current),
            original_user: session.original.as_ref().map(UserBody::from),
            is_viewing_as_user: session.is_viewing_as_user(),
            can_switch_to_user_view,
        }
    }
}

/// Acknowledgement of a parked signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingSignupBody {
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl From<PendingSignup> for PendingSignupBody {
    fn from(pending: PendingSignup) -> Self {
        Self {
            email: pending.email.to_string(),
            expires_at: pending.expires_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentBody {
    #[schema(example = "human-resources")]
    pub id: String,
    #[schema(example = "Human Resources")]
    pub name: String,
}

impl From<&Department> for DepartmentBody {
    fn from(department: &Department) -> Self {
        Self {
            id: department.id().to_string(),
            name: department.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberStandingBody {
    pub user_id: String,
    pub name: String,
    pub avatar: String,
    pub steps: u64,
}

impl From<MemberStanding> for MemberStandingBody {
    fn from(member: MemberStanding) -> Self {
        Self {
            user_id: member.user_id.to_string(),
            name: member.name.to_string(),
            avatar: member.avatar.as_ref().to_owned(),
            steps: member.steps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStandingBody {
    pub rank: usize,
    pub department: DepartmentBody,
    pub steps: u64,
    pub members: Vec<MemberStandingBody>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardBody {
    #[schema(example = "total")]
    pub timeframe: String,
    pub departments: Vec<DepartmentStandingBody>,
}

impl LeaderboardBody {
    pub fn new(timeframe: Timeframe, standings: Vec<DepartmentStanding>) -> Self {
        let departments = standings
            .into_iter()
            .enumerate()
            .map(|(index, standing)| DepartmentStandingBody {
                rank: index.saturating_add(1),
                department: DepartmentBody::from(&standing.department),
                steps: standing.steps,
                members: standing
                    .members
                    .into_iter()
                    .map(MemberStandingBody::from)
                    .collect(),
            })
            .collect();
        Self {
            timeframe: timeframe.to_string(),
            departments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummaryBody {
    pub department: DepartmentBody,
    pub rank: usize,
    pub total_steps: u64,
    pub weekly_steps: u64,
    pub previous_weekly_steps: u64,
    pub weekly_trend: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RivalBody {
    pub department: DepartmentBody,
    pub total_steps: u64,
    pub steps_to_overtake: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardBody {
    pub steps: StepsBody,
    pub daily_goal: u64,
    pub goal_progress_percent: u8,
    pub goal_met: bool,
    pub daily_trend: i64,
    pub department: Option<DepartmentSummaryBody>,
    pub rival: Option<RivalBody>,
    pub challenge_target_steps: u64,
}

impl From<Dashboard> for DashboardBody {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            steps: StepsBody::from(&dashboard.steps),
            daily_goal: dashboard.daily_goal,
            goal_progress_percent: dashboard.goal_progress_percent,
            goal_met: dashboard.goal_met,
            daily_trend: dashboard.daily_trend,
            department: dashboard.department.map(|summary| DepartmentSummaryBody {
                department: DepartmentBody::from(&summary.department),
                rank: summary.rank,
                total_steps: summary.total_steps,
                weekly_steps: summary.weekly_steps,
                previous_weekly_steps: summary.previous_weekly_steps,
                weekly_trend: summary.weekly_trend,
            }),
            rival: dashboard.rival.map(|rival| RivalBody {
                department: DepartmentBody::from(&rival.department),
                total_steps: rival.total_steps,
                steps_to_overtake: rival.steps_to_overtake,
            }),
            challenge_target_steps: dashboard.challenge_target_steps,
        }
    }
}

/// A department chat message with its sender's current profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentMessageBody {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_avatar: String,
    pub department_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<DepartmentMessageView> for DepartmentMessageBody {
    fn from(view: DepartmentMessageView) -> Self {
        let DepartmentMessageView {
            message,
            sender_name,
            sender_avatar,
        } = view;
        Self {
            id: message.id().to_string(),
            sender_id: message.sender_id().to_string(),
            sender_name: sender_name.to_string(),
            sender_avatar: sender_avatar.as_ref().to_owned(),
            department_id: message.department_id().to_string(),
            content: message.content().as_ref().to_owned(),
            timestamp: message.timestamp(),
        }
    }
}

/// One entry of a support thread. `senderId` is the owner's email or
/// `admin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupportMessageBody {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&SupportMessage> for SupportMessageBody {
    fn from(message: &SupportMessage) -> Self {
        Self {
            id: message.id().to_string(),
            sender_id: message.sender().as_str().to_owned(),
            sender_name: message.sender_name().to_owned(),
            content: message.content().as_ref().to_owned(),
            timestamp: message.timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupportThreadBody {
    pub user_id: String,
    pub user_name: String,
    pub user_avatar: String,
    pub messages: Vec<SupportMessageBody>,
    pub has_unread_admin_messages: bool,
    pub has_unread_user_messages: bool,
}

impl From<SupportThreadView> for SupportThreadBody {
    fn from(view: SupportThreadView) -> Self {
        let thread = &view.thread;
        Self {
            user_id: thread.user_id().to_string(),
            user_name: view.user_name.to_string(),
            user_avatar: view.user_avatar.as_ref().to_owned(),
            messages: thread
                .messages()
                .iter()
                .map(SupportMessageBody::from)
                .collect(),
            has_unread_admin_messages: thread.has_unread_admin_messages(),
            has_unread_user_messages: thread.has_unread_user_messages(),
        }
    }
}

/// Summary of a deletion cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemovedUserBody {
    pub user_id: String,
    pub department_messages_removed: usize,
    pub support_thread_removed: bool,
}

impl From<RemovedUser> for RemovedUserBody {
    fn from(removed: RemovedUser) -> Self {
        Self {
            user_id: removed.user.id().to_string(),
            department_messages_removed: removed.department_messages,
            support_thread_removed: removed.support_thread,
        }
    }
}

/// Result of an admin password reset. Shown once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetBody {
    pub user: UserBody,
    pub temporary_password: String,
}

impl From<PasswordReset> for PasswordResetBody {
    fn from(reset: PasswordReset) -> Self {
        Self {
            user: UserBody::from(&reset.user),
            temporary_password: reset.temporary_password.expose().to_owned(),
        }
    }
}
