//! Pickup reconciler
//!
//! Admin-facing close of the transaction lifecycle, at-most-once. The
//! transition itself is a conditional UPDATE predicated on the current
//! status (and payment method), so of two admins racing on the same code
//! exactly one succeeds; the other gets a `Conflict` telling them whether
//! they hit the wrong channel or a code that was already honored.

use sqlx::SqlitePool;

use crate::db::repository::txn;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};
use shared::models::{PaymentMethod, PickupAction, Transaction, TransactionStatus};

/// Apply a reconciliation action to the transaction behind `payment_code`.
pub async fn reconcile(
    pool: &SqlitePool,
    admin_id: i64,
    payment_code: &str,
    action: PickupAction,
    notes: Option<String>,
) -> AppResult<Transaction> {
    validate_optional_text(&notes, "notes", MAX_NOTE_LEN)?;

    let (from, to, required_method) = match action {
        PickupAction::MarkPickedUp => (
            TransactionStatus::PaidInApp,
            TransactionStatus::PickedUp,
            Some(PaymentMethod::InApp),
        ),
        PickupAction::MarkCashPaid => (
            TransactionStatus::Pending,
            TransactionStatus::CashPaidInStore,
            None,
        ),
    };

    let changed = txn::transition(
        pool,
        payment_code,
        from,
        to,
        required_method,
        admin_id,
        notes.as_deref(),
    )
    .await?;

    if changed == 0 {
        // The predicate did not hold. Re-read once to tell the admin
        // exactly why: unknown code, wrong channel, or already handled.
        return Err(classify_failure(pool, payment_code, action).await?);
    }

    tracing::info!(
        payment_code,
        admin_id,
        action = ?action,
        "Transaction reconciled"
    );

    txn::find_by_code(pool, payment_code)
        .await?
        .ok_or_else(|| AppError::internal("Transaction vanished after reconciliation"))
}

/// Cancel a non-terminal transaction.
pub async fn cancel(
    pool: &SqlitePool,
    admin_id: i64,
    payment_code: &str,
    notes: Option<String>,
) -> AppResult<Transaction> {
    validate_optional_text(&notes, "notes", MAX_NOTE_LEN)?;

    let changed = txn::cancel(pool, payment_code, admin_id, notes.as_deref()).await?;
    if changed == 0 {
        let existing = txn::find_by_code(pool, payment_code)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payment code {payment_code}")))?;
        return Err(AppError::conflict(format!(
            "Transaction already {}; cancellation is not possible",
            existing.status
        )));
    }

    tracing::info!(payment_code, admin_id, "Transaction cancelled");

    txn::find_by_code(pool, payment_code)
        .await?
        .ok_or_else(|| AppError::internal("Transaction vanished after cancellation"))
}

/// Explain a failed conditional transition. Distinguishing "that code does
/// not exist" from "you're too late" is the point: the admin's follow-up
/// differs completely.
async fn classify_failure(
    pool: &SqlitePool,
    payment_code: &str,
    action: PickupAction,
) -> Result<AppError, AppError> {
    let Some(existing) = txn::find_by_code(pool, payment_code).await? else {
        return Ok(AppError::not_found(format!("Payment code {payment_code}")));
    };

    let err = match action {
        PickupAction::MarkPickedUp if existing.payment_method != PaymentMethod::InApp => {
            AppError::conflict("wrong payment method for this action")
        }
        PickupAction::MarkCashPaid if existing.payment_method != PaymentMethod::CashInStore => {
            AppError::conflict("wrong payment method for this action")
        }
        _ if existing.status.is_terminal() => AppError::conflict(format!(
            "already processed (status: {})",
            existing.status
        )),
        _ => AppError::conflict(format!(
            "transaction is in status {} and cannot be reconciled with this action",
            existing.status
        )),
    };
    Ok(err)
}
