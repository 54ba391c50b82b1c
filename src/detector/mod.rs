pub mod changes;

pub use changes::{change_note, detect_changes, previous_lookup, ChangeSet};
