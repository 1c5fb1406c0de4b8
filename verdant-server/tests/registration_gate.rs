//! Verification gate scenarios
//!
//! Drives real registrations through `ServerState::initialize`, so the
//! migrations and the whole persistence path are in play.

mod common;

use chrono::Days;
use common::{born_years_ago, register, submission, test_state};
use shared::models::VerificationStatus;
use verdant_server::AppError;
use verdant_server::verification;

#[tokio::test]
async fn law_enforcement_is_denied_before_anything_else() {
    let (_dir, state) = test_state().await;

    // Every other field is garbage; the policy deny must still win.
    let mut sub = submission("", born_years_ago(5));
    sub.email = "not-an-email".to_string();
    sub.id_front_ref = String::new();
    sub.law_enforcement = true;

    let err = verification::register(state.pool(), &state.jwt_service(), sub)
        .await
        .expect_err("must be denied");

    assert!(matches!(err, AppError::Policy(_)), "got {err:?}");
}

#[tokio::test]
async fn under_eighteen_is_rejected() {
    let (_dir, state) = test_state().await;

    let sub = submission("kid", born_years_ago(17));
    let err = verification::register(state.pool(), &state.jwt_service(), sub)
        .await
        .expect_err("must be rejected");

    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn nineteen_year_old_needs_medical_document_and_guardian() {
    let (_dir, state) = test_state().await;

    // Without the medical document the submission fails outright.
    let bare = submission("teen", born_years_ago(19));
    let err = verification::register(state.pool(), &state.jwt_service(), bare)
        .await
        .expect_err("missing medical document");
    assert!(matches!(err, AppError::Validation(_)));

    // Medical document alone is still not enough.
    let mut partial = submission("teen", born_years_ago(19));
    partial.medical_ref = Some("medical-blob-token".to_string());
    let err = verification::register(state.pool(), &state.jwt_service(), partial)
        .await
        .expect_err("missing guardian email");
    assert!(matches!(err, AppError::Validation(_)));

    // With both, the member lands in the medical review queue.
    let mut full = submission("teen", born_years_ago(19));
    full.medical_ref = Some("medical-blob-token".to_string());
    full.guardian_email = Some("guardian@example.com".to_string());
    let registered = register(&state, full).await;

    assert!(registered.identity.requires_medical);
    assert_eq!(registered.identity.status, VerificationStatus::NeedsMedical);
    assert_eq!(
        registered.identity.guardian_email.as_deref(),
        Some("guardian@example.com")
    );
}

#[tokio::test]
async fn twenty_first_birthday_is_the_exact_medical_boundary() {
    let (_dir, state) = test_state().await;

    // Turns 21 today: no medical requirement.
    let registered = register(&state, submission("birthday", born_years_ago(21))).await;
    assert!(!registered.identity.requires_medical);
    assert_eq!(registered.identity.status, VerificationStatus::Pending);

    // Born one day later, so still 20 today: medical branch applies.
    let dob = born_years_ago(21).checked_add_days(Days::new(1)).unwrap();
    let still_twenty = submission("almost", dob);
    let err = verification::register(state.pool(), &state.jwt_service(), still_twenty)
        .await
        .expect_err("20-year-old without medical document");
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn initial_status_is_never_approved() {
    let (_dir, state) = test_state().await;

    let adult = register(&state, submission("adult", born_years_ago(40))).await;
    assert_eq!(adult.identity.status, VerificationStatus::Pending);
    assert!(adult.identity.verified_at.is_none());

    let mut minor_sub = submission("minor", born_years_ago(18));
    minor_sub.medical_ref = Some("medical-blob-token".to_string());
    minor_sub.guardian_email = Some("parent@example.com".to_string());
    let minor = register(&state, minor_sub).await;
    assert_eq!(minor.identity.status, VerificationStatus::NeedsMedical);
    assert!(minor.identity.verified_at.is_none());
}

#[tokio::test]
async fn duplicate_email_or_username_is_rejected() {
    let (_dir, state) = test_state().await;

    register(&state, submission("first", born_years_ago(30))).await;

    let mut same_email = submission("second", born_years_ago(30));
    same_email.email = "first@example.com".to_string();
    let err = verification::register(state.pool(), &state.jwt_service(), same_email)
        .await
        .expect_err("duplicate email");
    assert!(matches!(err, AppError::Validation(_)));

    // Same username, different case. Usernames collate case-insensitively.
    let mut same_name = submission("FIRST", born_years_ago(30));
    same_name.email = "unique@example.com".to_string();
    let err = verification::register(state.pool(), &state.jwt_service(), same_name)
        .await
        .expect_err("duplicate username");
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn racing_username_registrations_admit_exactly_one() {
    let (_dir, state) = test_state().await;

    // Same username, distinct emails: whichever insert loses must name
    // the username as the collision, not the email.
    let mut a = submission("contested", born_years_ago(30));
    a.email = "a-side@example.com".to_string();
    let mut b = submission("contested", born_years_ago(30));
    b.email = "b-side@example.com".to_string();

    let jwt = state.jwt_service();
    let (ra, rb) = tokio::join!(
        verification::register(state.pool(), &jwt, a),
        verification::register(state.pool(), &jwt, b),
    );

    let errs: Vec<AppError> = [ra, rb].into_iter().filter_map(Result::err).collect();
    assert_eq!(errs.len(), 1, "exactly one registration must lose");
    match &errs[0] {
        AppError::Validation(msg) => {
            assert!(msg.contains("username is already registered"), "{msg}");
        }
        other => panic!("got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_reentry_code_is_rejected() {
    let (_dir, state) = test_state().await;

    for bad in ["123", "123456789", "12ab56", ""] {
        let mut sub = submission("codes", born_years_ago(30));
        sub.reentry_code = bad.to_string();
        let err = verification::register(state.pool(), &state.jwt_service(), sub)
            .await
            .expect_err("bad re-entry code");
        assert!(matches!(err, AppError::Validation(_)), "code {bad:?}");
    }
}
