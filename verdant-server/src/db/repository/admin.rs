//! Admin Repository

use super::RepoResult;
use shared::models::{Admin, AdminRole};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const ADMIN_SELECT: &str =
    "SELECT id, username, display_name, hash_pass, role, is_active, created_at FROM admin";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Admin>> {
    let sql = format!("{ADMIN_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Admin>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<Admin>> {
    let sql = format!("{ADMIN_SELECT} WHERE username = ?");
    let row = sqlx::query_as::<_, Admin>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    display_name: &str,
    hash_pass: &str,
    role: AdminRole,
) -> RepoResult<Admin> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO admin (id, username, display_name, hash_pass, role, is_active, created_at) VALUES (?, ?, ?, ?, ?, 1, ?)",
    )
    .bind(id)
    .bind(username)
    .bind(display_name)
    .bind(hash_pass)
    .bind(role)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Admin {
        id,
        username: username.to_string(),
        display_name: display_name.to_string(),
        hash_pass: hash_pass.to_string(),
        role,
        is_active: true,
        created_at: now,
    })
}
