mod notifier;
mod remote_api;
mod sync_database;

pub use notifier::{LogNotifier, Notifier};
pub use remote_api::RemoteOrderApi;
pub use sync_database::{SyncDatabase, SyncDatabaseError};
