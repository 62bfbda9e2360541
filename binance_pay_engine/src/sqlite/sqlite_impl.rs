//! `SqliteOrderStore` is the concrete order-store backend.

use std::fmt::Debug;

use chrono::{DateTime, Utc};

use super::db::{create_schema, new_pool, orders};
use crate::{
    db_types::{NewOrder, Order, OrderId},
    traits::{OrderStore, OrderStoreError},
};

#[derive(Clone)]
pub struct SqliteOrderStore {
    pool: sqlx::SqlitePool,
}

impl Debug for SqliteOrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteOrderStore ({:?})", self.pool)
    }
}

impl SqliteOrderStore {
    pub async fn new(url: &str) -> Result<Self, OrderStoreError> {
        let pool = new_pool(url, 5).await?;
        create_schema(&pool).await?;
        Ok(Self { pool })
    }
}

impl From<sqlx::Error> for OrderStoreError {
    fn from(e: sqlx::Error) -> Self {
        OrderStoreError::DatabaseError(e.to_string())
    }
}

impl OrderStore for SqliteOrderStore {
    async fn insert_order(&self, order: NewOrder, memo: &str, now: DateTime<Utc>) -> Result<Order, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::insert_order(order, memo, now, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_order_id(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn update_order(&self, order: &Order) -> Result<Order, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::update_order(order, &mut conn).await
    }

    async fn append_order_note(&self, order_id: &OrderId, note: &str) -> Result<(), OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order_note(order_id, note, &mut conn).await?;
        Ok(())
    }
}
