//! Product model
//!
//! The coordinator consults this table for existence, live price and stock
//! only. Catalog browsing/search belongs to another subsystem.

use serde::{Deserialize, Serialize};

use super::MembershipTier;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub tier: MembershipTier,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
