//! Exact-age arithmetic
//!
//! Whole years between a birth date and a reference date, decremented by
//! one when the reference (month, day) precedes the birth (month, day).
//! A plain year subtraction would let someone in up to 364 days early.

use chrono::{Datelike, NaiveDate};

/// Platform absolute minimum age.
pub const MIN_AGE: i32 = 18;

/// Below this age a medical document and guardian contact are mandatory.
pub const MEDICAL_AGE: i32 = 21;

/// Compute exact age in whole years at `today`.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Exact age as of the current UTC date.
pub fn current_age(date_of_birth: NaiveDate) -> i32 {
    age_on(date_of_birth, chrono::Utc::now().date_naive())
}
