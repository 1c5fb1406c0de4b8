//! Admin review process and the approved-member access gate

mod common;

use common::{born_years_ago, register, seed_admin, seed_product, submission, test_state};
use shared::client::CartItemInput;
use shared::models::{PaymentMethod, VerificationStatus};
use verdant_server::db::repository::{identity, txn};
use verdant_server::verification::review;
use verdant_server::{AppError, access, transactions};

#[tokio::test]
async fn approve_flips_status_and_is_idempotent() {
    let (_dir, state) = test_state().await;
    let registered = register(&state, submission("applicant", born_years_ago(30))).await;
    let reviewer = seed_admin(state.pool(), "reviewer").await;

    let approved = review::approve(state.pool(), reviewer.id, registered.member.id)
        .await
        .expect("approve");
    assert_eq!(approved.status, VerificationStatus::Approved);
    assert!(approved.verified_at.is_some());

    // Approving again changes nothing and reports the same record.
    let again = review::approve(state.pool(), reviewer.id, registered.member.id)
        .await
        .expect("re-approve");
    assert_eq!(again.status, VerificationStatus::Approved);
    assert_eq!(again.verified_at, approved.verified_at);
}

#[tokio::test]
async fn reject_requires_a_reason_and_records_it() {
    let (_dir, state) = test_state().await;
    let registered = register(&state, submission("applicant", born_years_ago(30))).await;
    let reviewer = seed_admin(state.pool(), "reviewer").await;

    let err = review::reject(state.pool(), reviewer.id, registered.member.id, "  ")
        .await
        .expect_err("blank reason");
    assert!(matches!(err, AppError::Validation(_)));

    let rejected = review::reject(
        state.pool(),
        reviewer.id,
        registered.member.id,
        "ID document unreadable",
    )
    .await
    .expect("reject");
    assert_eq!(rejected.status, VerificationStatus::Rejected);
    assert_eq!(
        rejected.rejected_reason.as_deref(),
        Some("ID document unreadable")
    );

    // A re-review after resubmission can still approve.
    let approved = review::approve(state.pool(), reviewer.id, registered.member.id)
        .await
        .expect("later approve");
    assert_eq!(approved.status, VerificationStatus::Approved);
    assert!(approved.rejected_reason.is_none());
}

#[tokio::test]
async fn review_of_unknown_member_is_not_found() {
    let (_dir, state) = test_state().await;
    let reviewer = seed_admin(state.pool(), "reviewer").await;

    let err = review::approve(state.pool(), reviewer.id, 123456789)
        .await
        .expect_err("no record");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn access_gate_denies_every_non_approved_status_with_distinct_reasons() {
    let (_dir, state) = test_state().await;
    let reviewer = seed_admin(state.pool(), "reviewer").await;

    // Pending adult
    let pending = register(&state, submission("pending", born_years_ago(30))).await;
    let AppError::Policy(pending_reason) =
        access::ensure_member_approved(state.pool(), pending.member.id)
            .await
            .expect_err("pending denied")
    else {
        panic!("expected policy denial");
    };

    // Needs-medical minor
    let mut minor_sub = submission("minor", born_years_ago(19));
    minor_sub.medical_ref = Some("medical-blob-token".to_string());
    minor_sub.guardian_email = Some("parent@example.com".to_string());
    let minor = register(&state, minor_sub).await;
    let AppError::Policy(medical_reason) =
        access::ensure_member_approved(state.pool(), minor.member.id)
            .await
            .expect_err("needs-medical denied")
    else {
        panic!("expected policy denial");
    };

    // Rejected member gets a different reason than the waiting ones.
    let rejected = register(&state, submission("rejected", born_years_ago(30))).await;
    review::reject(state.pool(), reviewer.id, rejected.member.id, "blurry scan")
        .await
        .expect("reject");
    let AppError::Policy(rejected_reason) =
        access::ensure_member_approved(state.pool(), rejected.member.id)
            .await
            .expect_err("rejected denied")
    else {
        panic!("expected policy denial");
    };

    assert_eq!(pending_reason, medical_reason);
    assert_ne!(rejected_reason, pending_reason);

    // Approval opens the gate.
    review::approve(state.pool(), reviewer.id, pending.member.id)
        .await
        .expect("approve");
    access::ensure_member_approved(state.pool(), pending.member.id)
        .await
        .expect("approved member passes");
}

#[tokio::test]
async fn unapproved_member_leaves_no_transaction_behind() {
    let (_dir, state) = test_state().await;
    let registered = register(&state, submission("eager", born_years_ago(30))).await;
    let product = seed_product(state.pool(), "Gift Box", 25.0, 10).await;

    // The handler path runs the gate before the coordinator; mirror it.
    let gate = access::ensure_member_approved(state.pool(), registered.member.id).await;
    assert!(gate.is_err());

    if gate.is_ok() {
        let _ = transactions::create_transaction(
            state.pool(),
            registered.member.id,
            &[CartItemInput {
                product_id: product.id,
                quantity: 1,
            }],
            PaymentMethod::CashInStore,
        )
        .await;
    }

    let rows = txn::list_by_member(state.pool(), registered.member.id)
        .await
        .expect("list");
    assert!(rows.is_empty());

    let record = identity::find_by_member(state.pool(), registered.member.id)
        .await
        .expect("record")
        .expect("exists");
    assert_eq!(record.status, VerificationStatus::Pending);
}
