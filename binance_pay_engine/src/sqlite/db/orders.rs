use chrono::{DateTime, Utc};
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderId, GATEWAY_ID},
    traits::OrderStoreError,
};

/// Inserts a new order in the on-hold state. Not atomic on its own; run inside a transaction if
/// needed by passing `&mut *tx` as the connection.
pub async fn insert_order(
    order: NewOrder,
    memo: &str,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Order, sqlx::Error> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_id,
                order_key,
                customer_id,
                payment_method,
                memo,
                asset,
                amount,
                qr_ref,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *;
        "#,
    )
    .bind(order.order_id)
    .bind(order.order_key)
    .bind(order.customer_id)
    .bind(GATEWAY_ID)
    .bind(memo)
    .bind(order.asset)
    .bind(order.amount)
    .bind(order.qr_ref)
    .bind(now)
    .fetch_one(conn)
    .await?;
    debug!("Order [{}] inserted with id {}", order.order_id, order.id);
    Ok(order)
}

pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("SELECT * FROM orders WHERE order_id = $1").bind(order_id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

/// Version-guarded update. The row is written only if its stored version still equals
/// `order.version`; no row coming back means a concurrent check won the race.
pub async fn update_order(order: &Order, conn: &mut SqliteConnection) -> Result<Order, OrderStoreError> {
    let updated: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders SET
                status = $1,
                locked = $2,
                checked = $3,
                txid = $4,
                paid_at = $5,
                version = version + 1,
                updated_at = $6
            WHERE order_id = $7 AND version = $8
            RETURNING *;
        "#,
    )
    .bind(order.status)
    .bind(order.locked)
    .bind(order.checked)
    .bind(order.txid.as_deref())
    .bind(order.paid_at)
    .bind(Utc::now())
    .bind(order.order_id.as_str())
    .bind(order.version)
    .fetch_optional(conn)
    .await
    .map_err(|e| OrderStoreError::DatabaseError(e.to_string()))?;
    updated.ok_or(OrderStoreError::ConcurrentModification)
}

pub async fn insert_order_note(order_id: &OrderId, note: &str, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO order_notes (order_id, note) VALUES ($1, $2)")
        .bind(order_id.as_str())
        .bind(note)
        .execute(conn)
        .await?;
    Ok(())
}
