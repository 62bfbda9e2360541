//! SQLite backend for the [`OrderStore`](crate::traits::OrderStore) seam.

pub mod db;
mod sqlite_impl;

pub use sqlite_impl::SqliteOrderStore;
