pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod model;
pub mod notifier;
pub mod storage;
pub mod store;
pub mod view;

pub use config::AppConfig;
pub use controller::{Controller, Effects, Interaction, PendingAction};
pub use error::{FilterError, StorageError, StoreError, ValidationError};
pub use filter::FilterSelector;
pub use model::*;
pub use notifier::{Notification, NotificationKind, Notifier};
pub use storage::{FileStore, KeyValueStore, MemoryStore, TaskStorage, STORAGE_KEY};
pub use store::{ClearAllOutcome, EditOutcome, TaskStore};
pub use view::{render, EmptyState, FilterLabel, Intent, TaskRow, ViewBody, ViewModel};
