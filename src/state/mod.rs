pub mod app_state;
pub mod index;
pub mod snapshot_store;

pub use app_state::{AppState, ConnectionStatus, InputMode, PendingAction, ViewMode};
pub use snapshot_store::SnapshotStore;
