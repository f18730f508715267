//! SQLite backend for the order sync engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
