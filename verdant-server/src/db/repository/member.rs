//! Member Repository

use super::RepoResult;
use shared::models::Member;
use sqlx::SqlitePool;

const MEMBER_SELECT: &str = "SELECT id, username, email, hash_pass, date_of_birth, membership_tier, created_at, updated_at FROM member";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Member>> {
    let sql = format!("{MEMBER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Member>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<Member>> {
    // COLLATE NOCASE column makes this case-insensitive
    let sql = format!("{MEMBER_SELECT} WHERE username = ?");
    let row = sqlx::query_as::<_, Member>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn email_exists(pool: &SqlitePool, email: &str) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn username_exists(pool: &SqlitePool, username: &str) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}
