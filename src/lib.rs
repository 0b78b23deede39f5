pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::notifier::{ChangeNotifier, ListenerHandle, ListenerStream};
pub use app::store_service::{ServiceError, StoreService};
pub use domain::model::{Client, Document, LineItem, Product, StoreRecord, Transaction};
pub use storage::{BackupManager, JsonStore};
