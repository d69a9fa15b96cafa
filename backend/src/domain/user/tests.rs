//! Tests for the domain user model.

use super::*;
use crate::domain::password::PasswordHash;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rstest::{fixture, rstest};

#[fixture]
fn user() -> User {
    User::builder(
        UserId::new("ian.malcolm@dhs.lacounty.gov").expect("valid id"),
        DisplayName::new("Ian Malcolm").expect("valid name"),
        DepartmentId::new("hr").expect("valid department"),
        PasswordHash::from_phc("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"),
    )
    .build()
}

#[rstest]
#[case("jane.doe@dhs.lacounty.gov", "jane.doe@dhs.lacounty.gov")]
#[case("  JANE.DOE@dhs.lacounty.gov\t", "jane.doe@dhs.lacounty.gov")]
fn user_id_normalises(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(UserId::new(raw).expect("valid id").as_ref(), expected);
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("   ", UserValidationError::EmptyEmail)]
#[case("no-at-sign", UserValidationError::InvalidEmail)]
#[case("@dhs.lacounty.gov", UserValidationError::InvalidEmail)]
#[case("jane@", UserValidationError::InvalidEmail)]
#[case("jane doe@dhs.lacounty.gov", UserValidationError::InvalidEmail)]
#[case("a@b@dhs.lacounty.gov", UserValidationError::InvalidEmail)]
fn user_id_rejects_malformed(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
}

#[rstest]
#[case("john.doe@dhs.lacounty.gov", true)]
#[case("john.doe@gmail.com", false)]
#[case("john@lacounty.gov", false)]
#[case("dhs.lacounty.gov@example.com", false)]
fn corporate_domain_is_a_suffix_check(#[case] raw: &str, #[case] corporate: bool) {
    let id = UserId::new(raw).expect("valid id");
    assert_eq!(id.is_corporate(), corporate);
    assert_eq!(id.ensure_corporate().is_ok(), corporate);
}

#[rstest]
fn display_name_trims_and_bounds() {
    assert_eq!(DisplayName::new("  Ada  ").expect("valid").as_ref(), "Ada");
    assert_eq!(
        DisplayName::new(" \t ").expect_err("blank"),
        UserValidationError::EmptyDisplayName
    );
    assert_eq!(
        DisplayName::new("a".repeat(DISPLAY_NAME_MAX + 1)).expect_err("too long"),
        UserValidationError::DisplayNameTooLong {
            max: DISPLAY_NAME_MAX
        }
    );
}

#[rstest]
fn display_name_from_parts_joins_with_space() {
    let name = DisplayName::from_parts(" Jane ", "Doe").expect("valid");
    assert_eq!(name.as_ref(), "Jane Doe");
}

#[rstest]
#[case("user", Role::User)]
#[case("manager", Role::Manager)]
#[case("admin", Role::Admin)]
fn role_parses_and_displays(#[case] raw: &str, #[case] expected: Role) {
    let role: Role = raw.parse().expect("known role");
    assert_eq!(role, expected);
    assert_eq!(role.to_string(), raw);
}

#[rstest]
#[case("Admin")]
#[case("superuser")]
#[case("")]
fn role_rejects_unknown(#[case] raw: &str) {
    assert_eq!(
        raw.parse::<Role>().expect_err("unknown"),
        UserValidationError::UnknownRole
    );
}

#[rstest]
fn avatar_accepts_only_predefined() {
    assert!(AvatarUrl::new(PREDEFINED_AVATARS[3]).is_ok());
    assert_eq!(
        AvatarUrl::new("https://example.com/me.png").expect_err("foreign avatar"),
        UserValidationError::UnknownAvatar
    );
}

#[rstest]
fn random_avatar_is_predefined() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let avatar = AvatarUrl::random(&mut rng);
        assert!(PREDEFINED_AVATARS.contains(&avatar.as_ref()));
    }
}

#[rstest]
fn builder_defaults(user: User) {
    assert_eq!(user.role(), Role::User);
    assert_eq!(user.daily_goal(), DEFAULT_DAILY_GOAL);
    assert_eq!(user.steps(), &StepCounts::default());
    assert!(!user.must_change_password());
}

#[rstest]
fn zero_daily_goal_is_raised(user: User) {
    let adjusted = User::builder(
        user.id().clone(),
        user.name().clone(),
        user.department_id().clone(),
        user.password_hash().clone(),
    )
    .daily_goal(0)
    .build();
    assert_eq!(adjusted.daily_goal(), 1);
}

#[rstest]
fn rejected_step_update_leaves_user_untouched(mut user: User) {
    let inconsistent = StepCounts::new(500, 100, 100, 0, 0);
    user = User::builder(
        user.id().clone(),
        user.name().clone(),
        user.department_id().clone(),
        user.password_hash().clone(),
    )
    .steps(inconsistent)
    .build();
    let before = user.clone();
    let result = user.record_daily_steps(DailySteps::new(10));
    assert!(result.is_err());
    assert_eq!(user, before);
}

#[rstest]
fn serde_round_trips_through_strings() {
    let id: UserId = serde_json::from_str("\"Jane@dhs.lacounty.gov\"").expect("deserialise");
    assert_eq!(id.as_ref(), "jane@dhs.lacounty.gov");
    let role = serde_json::to_string(&Role::Manager).expect("serialise");
    assert_eq!(role, "\"manager\"");
}
