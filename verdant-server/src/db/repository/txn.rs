//! Transaction Repository
//!
//! The ledger table. Two invariants live here rather than in application
//! code:
//!
//! - payment-code uniqueness: the UNIQUE index on `txn.payment_code`
//!   arbitrates concurrent inserts; a collision surfaces as
//!   [`RepoError::Duplicate`] and the coordinator regenerates.
//! - at-most-once reconciliation: every status transition is a single
//!   conditional UPDATE predicated on the current status, so of two racing
//!   admins exactly one sees `rows_affected == 1`.

use super::RepoResult;
use shared::models::{LineItem, PaymentMethod, Transaction, TransactionStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const TXN_SELECT: &str = "SELECT id, member_id, total, payment_method, payment_code, status, processed_by, completed_at, notes, created_at FROM txn";

/// A line to persist; prices already captured from the catalog.
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub product_id: i64,
    pub name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub tier: shared::models::MembershipTier,
}

/// Insert a transaction and its line items atomically.
///
/// Fails with [`RepoError::Duplicate`] when the candidate `payment_code`
/// (or, far less likely, a generated row ID) is already taken; the caller
/// retries with fresh values.
pub async fn insert(
    pool: &SqlitePool,
    member_id: i64,
    total: f64,
    payment_method: PaymentMethod,
    payment_code: &str,
    status: TransactionStatus,
    items: &[NewLineItem],
) -> RepoResult<Transaction> {
    let id = snowflake_id();
    let now = now_millis();

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO txn (id, member_id, total, payment_method, payment_code, status, notes, created_at) VALUES (?, ?, ?, ?, ?, ?, '', ?)",
    )
    .bind(id)
    .bind(member_id)
    .bind(total)
    .bind(payment_method)
    .bind(payment_code)
    .bind(status)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for item in items {
        sqlx::query(
            "INSERT INTO txn_item (id, txn_id, product_id, name, unit_price, quantity, tier) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(snowflake_id())
        .bind(id)
        .bind(item.product_id)
        .bind(&item.name)
        .bind(item.unit_price)
        .bind(item.quantity)
        .bind(item.tier)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(Transaction {
        id,
        member_id,
        total,
        payment_method,
        payment_code: payment_code.to_string(),
        status,
        processed_by: None,
        completed_at: None,
        notes: String::new(),
        created_at: now,
    })
}

pub async fn find_by_code(pool: &SqlitePool, code: &str) -> RepoResult<Option<Transaction>> {
    let sql = format!("{TXN_SELECT} WHERE payment_code = ?");
    let row = sqlx::query_as::<_, Transaction>(&sql)
        .bind(code)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list_by_member(pool: &SqlitePool, member_id: i64) -> RepoResult<Vec<Transaction>> {
    let sql = format!("{TXN_SELECT} WHERE member_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Transaction>(&sql)
        .bind(member_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn list_items(pool: &SqlitePool, txn_id: i64) -> RepoResult<Vec<LineItem>> {
    let rows = sqlx::query_as::<_, LineItem>(
        "SELECT id, txn_id, product_id, name, unit_price, quantity, tier FROM txn_item WHERE txn_id = ? ORDER BY id ASC",
    )
    .bind(txn_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Conditionally advance a transaction: "set status to `to` only if the
/// current status is `from`" (optionally also predicated on the payment
/// method). Returns rows affected; 0 means the predicate did not hold and
/// the caller re-reads to classify the failure.
pub async fn transition(
    pool: &SqlitePool,
    payment_code: &str,
    from: TransactionStatus,
    to: TransactionStatus,
    required_method: Option<PaymentMethod>,
    admin_id: i64,
    notes: Option<&str>,
) -> RepoResult<u64> {
    let now = now_millis();
    // Notes append; everything else is a terminal stamp.
    let sql = match required_method {
        Some(_) => {
            "UPDATE txn SET status = ?1, completed_at = ?2, processed_by = ?3, notes = CASE WHEN ?4 IS NULL OR ?4 = '' THEN notes WHEN notes = '' THEN ?4 ELSE notes || char(10) || ?4 END WHERE payment_code = ?5 AND status = ?6 AND payment_method = ?7"
        }
        None => {
            "UPDATE txn SET status = ?1, completed_at = ?2, processed_by = ?3, notes = CASE WHEN ?4 IS NULL OR ?4 = '' THEN notes WHEN notes = '' THEN ?4 ELSE notes || char(10) || ?4 END WHERE payment_code = ?5 AND status = ?6"
        }
    };

    let mut query = sqlx::query(sql)
        .bind(to)
        .bind(now)
        .bind(admin_id)
        .bind(notes)
        .bind(payment_code)
        .bind(from);
    if let Some(method) = required_method {
        query = query.bind(method);
    }

    let rows = query.execute(pool).await?;
    Ok(rows.rows_affected())
}

/// Cancel a non-terminal transaction (pending or paid_in_app).
pub async fn cancel(
    pool: &SqlitePool,
    payment_code: &str,
    admin_id: i64,
    notes: Option<&str>,
) -> RepoResult<u64> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE txn SET status = 'cancelled', completed_at = ?1, processed_by = ?2, notes = CASE WHEN ?3 IS NULL OR ?3 = '' THEN notes WHEN notes = '' THEN ?3 ELSE notes || char(10) || ?3 END WHERE payment_code = ?4 AND status IN ('pending', 'paid_in_app')",
    )
    .bind(now)
    .bind(admin_id)
    .bind(notes)
    .bind(payment_code)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

/// Append a note to any transaction, terminal or not. Notes are the one
/// field a terminal row may still change.
pub async fn append_note(pool: &SqlitePool, payment_code: &str, note: &str) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE txn SET notes = CASE WHEN notes = '' THEN ?1 ELSE notes || char(10) || ?1 END WHERE payment_code = ?2",
    )
    .bind(note)
    .bind(payment_code)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}
