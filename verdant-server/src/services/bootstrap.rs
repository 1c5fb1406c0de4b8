//! First-run provisioning
//!
//! When the admin table is empty, create the initial super-admin from the
//! environment. Without at least one active admin the review queue can
//! never drain, so production refuses to start unprovisioned.

use sqlx::SqlitePool;

use crate::db::repository::admin;
use crate::utils::{AppError, AppResult};
use crate::verification::gate::hash_password;
use shared::models::AdminRole;

pub async fn ensure_initial_admin(pool: &SqlitePool, is_production: bool) -> AppResult<()> {
    if admin::count(pool).await? > 0 {
        return Ok(());
    }

    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let password = match std::env::var("ADMIN_INITIAL_PASSWORD") {
        Ok(p) if !p.is_empty() => p,
        _ if is_production => {
            return Err(AppError::internal(
                "No admin exists and ADMIN_INITIAL_PASSWORD is not set",
            ));
        }
        _ => {
            let generated = crate::auth::jwt::generate_printable_jwt_secret();
            let short = generated[..16].to_string();
            tracing::warn!(
                username = %username,
                password = %short,
                "No admin configured; generated a development super-admin. \
                 Set ADMIN_INITIAL_PASSWORD to control this."
            );
            short
        }
    };

    let hash = hash_password(&password)?;
    admin::create(pool, &username, "Initial Admin", &hash, AdminRole::SuperAdmin).await?;
    tracing::info!(username = %username, "Initial super-admin created");
    Ok(())
}
