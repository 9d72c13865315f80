//! Database layer for Spotter

mod connection;
mod local_state;
mod migrations;
mod record_store;

pub use connection::Database;
pub use local_state::{LibSqlLocalStateRepository, LocalStateRepository};
pub use record_store::LibSqlRecordStore;
