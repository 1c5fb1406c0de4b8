//! Product Repository
//!
//! The coordinator's view of the catalog: existence, live price, stock.

use super::RepoResult;
use shared::models::{MembershipTier, Product};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const PRODUCT_SELECT: &str =
    "SELECT id, name, price, stock, tier, is_active, created_at, updated_at FROM product";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ? AND is_active = 1");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    name: &str,
    price: f64,
    stock: i64,
    tier: MembershipTier,
) -> RepoResult<Product> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO product (id, name, price, stock, tier, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(price)
    .bind(stock)
    .bind(tier)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Product {
        id,
        name: name.to_string(),
        price,
        stock,
        tier,
        is_active: true,
        created_at: now,
        updated_at: now,
    })
}

pub async fn update_price(pool: &SqlitePool, id: i64, price: f64) -> RepoResult<()> {
    sqlx::query("UPDATE product SET price = ?, updated_at = ? WHERE id = ?")
        .bind(price)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
