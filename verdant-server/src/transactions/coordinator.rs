//! Transaction coordinator
//!
//! Turns an authorized cart into a persisted transaction: validates every
//! line against live catalog state, captures unit prices, computes the
//! total server-side, allocates a collision-free payment code and writes
//! the transaction in its initial status. All-or-nothing: the first
//! violation fails the whole request and nothing is persisted.

use ring::rand::SystemRandom;
use sqlx::SqlitePool;

use crate::db::repository::txn::{self, NewLineItem};
use crate::db::repository::{RepoError, product};
use crate::transactions::money::{MAX_PRICE, MAX_QUANTITY, cart_total, to_f64};
use crate::transactions::payment_code;
use crate::utils::{AppError, AppResult};
use shared::client::CartItemInput;
use shared::models::{PaymentMethod, Transaction, TransactionStatus};

/// Bounded retry count for the generate-and-insert loop. At realistic
/// code-space occupancy a single retry is already rare; exhausting all of
/// them means the code space itself is the problem.
const MAX_CODE_ATTEMPTS: u32 = 16;

/// Create a transaction for an approved member.
///
/// The caller is responsible for having passed the member through the
/// access gate first; this function only owns cart validation, pricing
/// and code allocation.
pub async fn create_transaction(
    pool: &SqlitePool,
    member_id: i64,
    items: &[CartItemInput],
    payment_method: PaymentMethod,
) -> AppResult<Transaction> {
    if items.is_empty() {
        return Err(AppError::validation("cart must not be empty"));
    }

    // Validate lines and capture prices at this instant
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity <= 0 {
            return Err(AppError::validation(format!(
                "quantity must be positive for product {}",
                item.product_id
            )));
        }
        if item.quantity > MAX_QUANTITY {
            return Err(AppError::validation(format!(
                "quantity exceeds maximum allowed ({MAX_QUANTITY})"
            )));
        }

        let product = product::find_by_id(pool, item.product_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {}", item.product_id)))?;

        if !(0.0..=MAX_PRICE).contains(&product.price) {
            return Err(AppError::validation(format!(
                "Product {} has an invalid price",
                product.name
            )));
        }

        if product.stock < item.quantity {
            return Err(AppError::conflict(format!(
                "Product {} is out of stock",
                product.name
            )));
        }

        lines.push(NewLineItem {
            product_id: product.id,
            name: product.name,
            unit_price: product.price,
            quantity: item.quantity,
            tier: product.tier,
        });
    }

    let total = to_f64(cart_total(
        lines.iter().map(|l| (l.unit_price, l.quantity)),
    ));

    // Initial status is decided by the payment channel: in_app money is
    // already captured upstream, cash is captured in person later.
    let status = match payment_method {
        PaymentMethod::InApp => TransactionStatus::PaidInApp,
        PaymentMethod::CashInStore => TransactionStatus::Pending,
    };

    // Generate-and-insert: the UNIQUE index arbitrates, not an existence
    // check, because two requests can both pass a read before either
    // writes. On a duplicate we draw a fresh candidate and try again.
    let rng = SystemRandom::new();
    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let code = payment_code::generate(&rng, payment_method)?;

        match txn::insert(pool, member_id, total, payment_method, &code, status, &lines).await {
            Ok(transaction) => {
                tracing::info!(
                    txn_id = transaction.id,
                    member_id,
                    payment_code = %transaction.payment_code,
                    method = payment_method.as_str(),
                    total,
                    "Transaction created"
                );
                return Ok(transaction);
            }
            Err(RepoError::Duplicate(_)) => {
                tracing::debug!(attempt, "Payment code collision, regenerating");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::error!(
        member_id,
        method = payment_method.as_str(),
        attempts = MAX_CODE_ATTEMPTS,
        "Payment code space exhausted"
    );
    Err(AppError::ResourceExhausted(format!(
        "could not allocate a unique payment code after {MAX_CODE_ATTEMPTS} attempts"
    )))
}
