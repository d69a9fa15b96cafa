//! Tests for the account service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::RecordingVerificationNotifier;
use crate::domain::{DepartmentId, DisplayName, ErrorCode, Password, Role, StepCounts};
use crate::outbound::memory::InMemoryStore;
use crate::test_support::{
    FixturePasswordHasher, MutableClock, department, member, member_with_steps, user_id,
};

type Service = AccountService<InMemoryStore, InMemoryStore, InMemoryStore>;

struct Harness {
    store: Arc<InMemoryStore>,
    notifier: Arc<RecordingVerificationNotifier>,
    clock: Arc<MutableClock>,
    service: Service,
}

impl Harness {
    async fn with_user(self, user: User) -> Self {
        UserRepository::insert(self.store.as_ref(), &user)
            .await
            .expect("seed user");
        self
    }

    async fn stored(&self, email: &str) -> Option<User> {
        UserRepository::find_by_id(self.store.as_ref(), &user_id(email))
            .await
            .expect("store reachable")
    }
}

#[fixture]
async fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::default());
    DepartmentRepository::insert(store.as_ref(), &department("eng", "Engineering"))
        .await
        .expect("seed department");
    let notifier = Arc::new(RecordingVerificationNotifier::default());
    let clock = Arc::new(MutableClock::at_challenge_start());
    let service = AccountService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        notifier.clone(),
        Arc::new(FixturePasswordHasher),
        clock.clone(),
    );
    Harness {
        store,
        notifier,
        clock,
        service,
    }
}

fn signup_request(email: &str, department_id: &str) -> SignupRequest {
    SignupRequest {
        name: DisplayName::new("John Doe").expect("valid name"),
        email: user_id(email),
        password: Password::new("password123").expect("valid password"),
        department_id: DepartmentId::new(department_id).expect("valid department"),
    }
}

async fn signed_up(harness: &Harness, email: &str) -> VerificationCode {
    harness
        .service
        .signup(signup_request(email, "eng"))
        .await
        .expect("signup accepted");
    harness
        .notifier
        .last_code(&user_id(email))
        .expect("code delivered")
}

#[rstest]
#[tokio::test]
async fn signup_rejects_foreign_domain(#[future] harness: Harness) {
    let harness = harness.await;
    let err = harness
        .service
        .signup(signup_request("john.doe@gmail.com", "eng"))
        .await
        .expect_err("foreign domain");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Only @dhs.lacounty.gov emails are allowed.");
    assert!(!harness.store.has_pending(&user_id("john.doe@gmail.com")));
}

#[rstest]
#[tokio::test]
async fn signup_parks_a_pending_record_without_creating_a_user(#[future] harness: Harness) {
    let harness = harness.await;
    let pending = harness
        .service
        .signup(signup_request("john.doe@dhs.lacounty.gov", "eng"))
        .await
        .expect("signup accepted");

    let email = user_id("john.doe@dhs.lacounty.gov");
    assert_eq!(pending.email, email);
    assert_eq!(
        pending.expires_at,
        harness.clock.utc() + chrono::Duration::seconds(300)
    );
    assert!(harness.store.has_pending(&email));
    assert!(harness.notifier.last_code(&email).is_some());
    assert!(harness.stored("john.doe@dhs.lacounty.gov").await.is_none());
}

#[rstest]
#[tokio::test]
async fn signup_rejects_existing_email(#[future] harness: Harness) {
    let harness = harness
        .await
        .with_user(member("jane@dhs.lacounty.gov", "eng", Role::User))
        .await;
    let err = harness
        .service
        .signup(signup_request("jane@dhs.lacounty.gov", "eng"))
        .await
        .expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "User with this email already exists.");
}

#[rstest]
#[tokio::test]
async fn signup_requires_known_department(#[future] harness: Harness) {
    let harness = harness.await;
    let err = harness
        .service
        .signup(signup_request("john.doe@dhs.lacounty.gov", "finance"))
        .await
        .expect_err("unknown department");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Department not found.");
}

#[rstest]
#[tokio::test]
async fn correct_code_commits_a_plain_user(#[future] harness: Harness) {
    let harness = harness.await;
    let code = signed_up(&harness, "john.doe@dhs.lacounty.gov").await;

    let user = harness
        .service
        .verify_email(VerifyEmailRequest {
            email: user_id("john.doe@dhs.lacounty.gov"),
            code,
        })
        .await
        .expect("verified");

    assert_eq!(user.role(), Role::User);
    assert_eq!(user.steps(), &StepCounts::default());
    assert!(!user.must_change_password());
    assert_eq!(
        harness.stored("john.doe@dhs.lacounty.gov").await.as_ref(),
        Some(&user)
    );
    assert!(!harness.store.has_pending(user.id()));
}

#[rstest]
#[tokio::test]
async fn wrong_code_keeps_the_pending_record(#[future] harness: Harness) {
    let harness = harness.await;
    let code = signed_up(&harness, "john.doe@dhs.lacounty.gov").await;
    let wrong: VerificationCode = if code.as_ref() == "000000" {
        "000001"
    } else {
        "000000"
    }
    .parse()
    .expect("code");

    let err = harness
        .service
        .verify_email(VerifyEmailRequest {
            email: user_id("john.doe@dhs.lacounty.gov"),
            code: wrong,
        })
        .await
        .expect_err("wrong code");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Invalid verification code.");
    assert!(harness.store.has_pending(&user_id("john.doe@dhs.lacounty.gov")));
}

#[rstest]
#[tokio::test]
async fn expired_code_discards_the_pending_record(#[future] harness: Harness) {
    let harness = harness.await;
    let code = signed_up(&harness, "john.doe@dhs.lacounty.gov").await;
    harness.clock.advance_seconds(301);

    let err = harness
        .service
        .verify_email(VerifyEmailRequest {
            email: user_id("john.doe@dhs.lacounty.gov"),
            code,
        })
        .await
        .expect_err("expired");

    assert_eq!(err.message(), "Verification code expired.");
    assert!(!harness.store.has_pending(&user_id("john.doe@dhs.lacounty.gov")));
    assert!(harness.stored("john.doe@dhs.lacounty.gov").await.is_none());
}

#[rstest]
#[tokio::test]
async fn configured_ttl_is_honoured(#[future] harness: Harness) {
    let harness = harness.await;
    let Harness {
        store,
        notifier,
        clock,
        service,
    } = harness;
    let harness = Harness {
        service: service.with_settings(AccountSettings {
            verification_ttl: Duration::from_secs(3_600),
        }),
        store,
        notifier,
        clock,
    };
    let code = signed_up(&harness, "john.doe@dhs.lacounty.gov").await;
    harness.clock.advance_seconds(1_800);

    harness
        .service
        .verify_email(VerifyEmailRequest {
            email: user_id("john.doe@dhs.lacounty.gov"),
            code,
        })
        .await
        .expect("still valid");
}

#[rstest]
#[tokio::test]
async fn unknown_email_is_an_invalid_code(#[future] harness: Harness) {
    let harness = harness.await;
    let err = harness
        .service
        .verify_email(VerifyEmailRequest {
            email: user_id("nobody@dhs.lacounty.gov"),
            code: "123456".parse().expect("code"),
        })
        .await
        .expect_err("unknown email");
    assert_eq!(err.message(), "Invalid verification code.");
}

#[rstest]
#[tokio::test]
async fn user_created_meanwhile_is_a_conflict(#[future] harness: Harness) {
    let harness = harness.await;
    let code = signed_up(&harness, "john.doe@dhs.lacounty.gov").await;
    UserRepository::insert(
        harness.store.as_ref(),
        &member("john.doe@dhs.lacounty.gov", "eng", Role::User),
    )
    .await
    .expect("admin created the account");

    let err = harness
        .service
        .verify_email(VerifyEmailRequest {
            email: user_id("john.doe@dhs.lacounty.gov"),
            code,
        })
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case("jane@dhs.lacounty.gov", "password123", true)]
#[case("JANE@dhs.lacounty.gov ", "password123", true)]
#[case("jane@dhs.lacounty.gov", "password124", false)]
#[case("ghost@dhs.lacounty.gov", "password123", false)]
#[tokio::test]
async fn login_checks_credentials(
    #[future] harness: Harness,
    #[case] email: &str,
    #[case] password: &str,
    #[case] accepted: bool,
) {
    let harness = harness
        .await
        .with_user(member("jane@dhs.lacounty.gov", "eng", Role::User))
        .await;
    let credentials = LoginCredentials::try_from_parts(email, password).expect("well formed");

    let result = harness.service.login(credentials).await;

    if accepted {
        let user = result.expect("login accepted");
        assert_eq!(user.id().as_ref(), "jane@dhs.lacounty.gov");
    } else {
        let err = result.expect_err("login refused");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "Invalid email or password.");
    }
}

#[rstest]
#[case(0)]
#[case(500)]
#[case(12_000)]
#[tokio::test]
async fn step_update_shifts_weekly_and_total_by_the_delta(
    #[future] harness: Harness,
    #[case] new_daily: u64,
) {
    let before = StepCounts::new(4_000, 20_000, 90_000, 3_000, 18_000);
    let harness = harness
        .await
        .with_user(member_with_steps(
            "jane@dhs.lacounty.gov",
            "eng",
            Role::User,
            before,
        ))
        .await;

    let user = harness
        .service
        .update_steps(&user_id("jane@dhs.lacounty.gov"), DailySteps::new(new_daily))
        .await
        .expect("steps recorded");

    let after = user.steps();
    let delta = i128::from(new_daily) - i128::from(before.daily());
    assert_eq!(i128::from(after.total()) - i128::from(before.total()), delta);
    assert_eq!(i128::from(after.weekly()) - i128::from(before.weekly()), delta);
    assert_eq!(after.daily(), new_daily);
    assert_eq!(after.previous_daily(), before.previous_daily());
    assert_eq!(after.previous_weekly(), before.previous_weekly());
}

#[rstest]
#[tokio::test]
async fn inconsistent_counters_are_left_untouched(#[future] harness: Harness) {
    let corrupt = StepCounts::new(5_000, 1_000, 2_000, 0, 0);
    let harness = harness
        .await
        .with_user(member_with_steps(
            "jane@dhs.lacounty.gov",
            "eng",
            Role::User,
            corrupt,
        ))
        .await;

    let err = harness
        .service
        .update_steps(&user_id("jane@dhs.lacounty.gov"), DailySteps::new(100))
        .await
        .expect_err("invariant violation");

    assert_eq!(err.code(), ErrorCode::Conflict);
    let stored = harness
        .stored("jane@dhs.lacounty.gov")
        .await
        .expect("present");
    assert_eq!(stored.steps(), &corrupt);
}

#[rstest]
#[tokio::test]
async fn password_change_clears_the_forced_change_flag(#[future] harness: Harness) {
    let flagged = User::builder(
        user_id("jane@dhs.lacounty.gov"),
        DisplayName::new("Jane").expect("valid"),
        DepartmentId::new("eng").expect("valid"),
        crate::test_support::fixture_hash("Temp0rary123"),
    )
    .must_change_password(true)
    .build();
    let harness = harness.await.with_user(flagged).await;

    let change = PasswordChange::try_from_parts("n3w-password", "n3w-password").expect("valid");
    let user = harness
        .service
        .update_password(&user_id("jane@dhs.lacounty.gov"), change)
        .await
        .expect("changed");

    assert!(!user.must_change_password());
    let relogin = harness
        .service
        .login(
            LoginCredentials::try_from_parts("jane@dhs.lacounty.gov", "n3w-password")
                .expect("well formed"),
        )
        .await
        .expect("new password works");
    assert_eq!(relogin.id(), user.id());
}

#[rstest]
#[tokio::test]
async fn avatar_update_persists(#[future] harness: Harness) {
    let harness = harness
        .await
        .with_user(member("jane@dhs.lacounty.gov", "eng", Role::User))
        .await;
    let avatar = AvatarUrl::new(crate::domain::PREDEFINED_AVATARS[5]).expect("predefined");

    let user = harness
        .service
        .update_avatar(&user_id("jane@dhs.lacounty.gov"), avatar.clone())
        .await
        .expect("updated");

    assert_eq!(user.avatar(), &avatar);
    assert_eq!(
        harness
            .stored("jane@dhs.lacounty.gov")
            .await
            .expect("present")
            .avatar(),
        &avatar
    );
}

#[rstest]
#[tokio::test]
async fn updates_for_missing_users_are_not_found(#[future] harness: Harness) {
    let harness = harness.await;
    let err = harness
        .service
        .update_steps(&user_id("ghost@dhs.lacounty.gov"), DailySteps::new(10))
        .await
        .expect_err("missing user");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "User not found.");
}
