//! Shared helpers for integration tests
//!
//! Every test works against a fully initialized [`ServerState`] over a
//! temporary working directory, so migrations and first-run
//! provisioning are exercised on each run.

// Not every test binary uses every helper.
#![allow(dead_code)]

use chrono::{Datelike, NaiveDate, Utc};
use shared::models::{Admin, AdminRole, MembershipTier, Product};
use sqlx::SqlitePool;
use tempfile::TempDir;
use verdant_server::db::repository::{admin, product};
use verdant_server::verification::{self, RegisterSubmission, RegisteredMember};
use verdant_server::{Config, ServerState};

pub async fn test_state() -> (TempDir, ServerState) {
    let dir = tempfile::tempdir().expect("create temp workspace");
    let config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
    let state = ServerState::initialize(&config)
        .await
        .expect("initialize server state");
    (dir, state)
}

/// Date of birth such that the person's exact age today is `years`.
///
/// Uses today's month/day shifted back, falling back to Feb 28 when the
/// birthday would land on a nonexistent Feb 29.
pub fn born_years_ago(years: i32) -> NaiveDate {
    let today = Utc::now().date_naive();
    today
        .with_year(today.year() - years)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(today.year() - years, 2, 28).unwrap())
}

/// A registration submission that passes every gate check for an adult
/// of 21 or over. Tests mutate the fields they care about.
pub fn submission(username: &str, dob: NaiveDate) -> RegisterSubmission {
    RegisterSubmission {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "correct horse battery".to_string(),
        date_of_birth: dob,
        reentry_code: "482913".to_string(),
        id_front_ref: "front-blob-token".to_string(),
        id_back_ref: "back-blob-token".to_string(),
        medical_ref: None,
        guardian_email: None,
        law_enforcement: false,
    }
}

/// Register a member through the real gate.
pub async fn register(state: &ServerState, sub: RegisterSubmission) -> RegisteredMember {
    verification::register(state.pool(), &state.jwt_service(), sub)
        .await
        .expect("registration should pass the gate")
}

/// Register an adult member and have an admin approve them in one step.
pub async fn approved_member(state: &ServerState, username: &str) -> RegisteredMember {
    let registered = register(state, submission(username, born_years_ago(30))).await;
    let reviewer = seed_admin(state.pool(), &format!("reviewer_{username}")).await;
    verdant_server::verification::review::approve(state.pool(), reviewer.id, registered.member.id)
        .await
        .expect("approve member");
    registered
}

pub async fn seed_admin(pool: &SqlitePool, username: &str) -> Admin {
    let hash = verification::hash_password("admin password").expect("hash");
    admin::create(pool, username, "Test Admin", &hash, AdminRole::Admin)
        .await
        .expect("create admin")
}

pub async fn seed_product(pool: &SqlitePool, name: &str, price: f64, stock: i64) -> Product {
    product::create(pool, name, price, stock, MembershipTier::Basic)
        .await
        .expect("create product")
}
