//! Payment code generation
//!
//! Two code families, one per payment channel, drawn from the system RNG
//! so codes are non-enumerable:
//!
//! - cash pickups: 6 decimal digits, easy to read over a counter
//! - pre-paid orders: `P` + 6 uppercase alphanumerics
//!
//! Uniqueness is NOT guaranteed here. The caller inserts the candidate and
//! lets the UNIQUE index on `txn.payment_code` arbitrate, regenerating on
//! collision.

use ring::rand::{SecureRandom, SystemRandom};

use crate::utils::{AppError, AppResult};
use shared::models::PaymentMethod;

const DIGITS: &[u8] = b"0123456789";
const ALPHANUMERIC: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

const CODE_LEN: usize = 6;

/// Prefix distinguishing the pre-paid family.
pub const PREPAID_PREFIX: char = 'P';

fn random_string(rng: &SystemRandom, charset: &[u8], len: usize) -> AppResult<String> {
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|_| AppError::internal("System RNG failure"))?;
    Ok(bytes
        .iter()
        .map(|b| charset[*b as usize % charset.len()] as char)
        .collect())
}

/// Draw one candidate code for the given payment channel.
pub fn generate(rng: &SystemRandom, method: PaymentMethod) -> AppResult<String> {
    match method {
        PaymentMethod::CashInStore => random_string(rng, DIGITS, CODE_LEN),
        PaymentMethod::InApp => {
            let body = random_string(rng, ALPHANUMERIC, CODE_LEN)?;
            Ok(format!("{PREPAID_PREFIX}{body}"))
        }
    }
}
