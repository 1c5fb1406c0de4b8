//! Transaction models
//!
//! A transaction is an append-only ledger row. Line items capture the unit
//! price at creation time; a later catalog price change never touches them.
//! Once the status is terminal, only `notes` may change.

use serde::{Deserialize, Serialize};

use super::MembershipTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PaymentMethod {
    /// Pre-paid through the app; money captured before the transaction exists
    InApp,
    /// Cash handed over at the counter on pickup
    CashInStore,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InApp => "in_app",
            Self::CashInStore => "cash_in_store",
        }
    }
}

/// Transaction state machine.
///
/// ```text
/// pending      ──► cash_paid_in_store | cancelled
/// paid_in_app  ──► picked_up          | cancelled
/// ```
///
/// `cash_paid_in_store`, `picked_up` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum TransactionStatus {
    Pending,
    PaidInApp,
    CashPaidInStore,
    PickedUp,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::PaidInApp => "paid_in_app",
            Self::CashPaidInStore => "cash_paid_in_store",
            Self::PickedUp => "picked_up",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::CashPaidInStore | Self::PickedUp | Self::Cancelled
        )
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin reconciliation action at the point of physical pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupAction {
    /// Pre-paid order handed over
    MarkPickedUp,
    /// Cash received for a pending order
    MarkCashPaid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: i64,
    pub member_id: i64,
    /// Server-computed Σ(unit_price × quantity), rounded to 2 decimals
    pub total: f64,
    pub payment_method: PaymentMethod,
    /// Short, human-speakable, unique within the collection
    pub payment_code: String,
    pub status: TransactionStatus,
    pub processed_by: Option<i64>,
    pub completed_at: Option<i64>,
    pub notes: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LineItem {
    pub id: i64,
    pub txn_id: i64,
    pub product_id: i64,
    pub name: String,
    /// Price captured at transaction creation
    pub unit_price: f64,
    pub quantity: i64,
    pub tier: MembershipTier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(!TransactionStatus::PaidInApp.is_terminal());
        assert!(TransactionStatus::CashPaidInStore.is_terminal());
        assert!(TransactionStatus::PickedUp.is_terminal());
        assert!(TransactionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn status_round_trips_through_serde() {
        let json = serde_json::to_string(&TransactionStatus::CashPaidInStore).unwrap();
        assert_eq!(json, "\"cash_paid_in_store\"");
        let back: TransactionStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TransactionStatus::CashPaidInStore);
    }
}
