use binance_pay_engine::{
    db_types::{NewOrder, Order, OrderId},
    traits::{OrderStore, OrderStoreError, TransactionSource, TransactionSourceError},
};
use chrono::{DateTime, Utc};
use mockall::mock;
use serde_json::Value;

mock! {
    pub Store {}
    impl OrderStore for Store {
        async fn insert_order(&self, order: NewOrder, memo: &str, now: DateTime<Utc>) -> Result<Order, OrderStoreError>;
        async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError>;
        async fn update_order(&self, order: &Order) -> Result<Order, OrderStoreError>;
        async fn append_order_note(&self, order_id: &OrderId, note: &str) -> Result<(), OrderStoreError>;
    }
}

mock! {
    pub Source {}
    impl TransactionSource for Source {
        async fn fetch_transactions(&self, window: Option<(i64, i64)>, limit: usize) -> Result<Vec<Value>, TransactionSourceError>;
        fn is_configured(&self) -> bool;
    }
}
