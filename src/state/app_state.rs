use std::borrow::Cow;
use std::collections::HashMap;

use tracing::{error, info, warn};

use crate::client::BackendClient;
use crate::compare::{build_pairs, CompareSide, MatchPair};
use crate::detector::{detect_changes, previous_lookup, ChangeSet};
use crate::filter::{competition_suggestions, filter_matches, FilterOptions};
use crate::state::SnapshotStore;
use crate::types::{MatchRecord, Snapshot};

// ---------------------------------------------------------------------------
// UI modes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// One snapshot, highlighted against the one before it.
    #[default]
    Table,
    /// Latest-wins aggregate across all snapshots.
    Index,
    /// Side-by-side pairs of two datasets.
    Compare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    DeleteCurrent,
    ClearAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a search token.
    Search,
    /// Waiting for y/n on a destructive action.
    Confirm(PendingAction),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Error(String),
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

/// Everything the dashboard shows is derived from this value. Key presses and
/// backend results are the only things that change it.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: SnapshotStore,
    /// Arrival position of the snapshot shown in the table view.
    pub selected: usize,
    pub selected_row: usize,
    pub view: ViewMode,
    pub filters: FilterOptions,
    pub input: InputMode,
    pub search_buffer: String,
    pub compare_a: CompareSide,
    pub compare_b: Option<usize>,
    /// Set while a backend request is in flight; data views are not rendered.
    pub loading: bool,
    pub status: ConnectionStatus,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            store: SnapshotStore::new(),
            selected: 0,
            selected_row: 0,
            view: ViewMode::Table,
            filters: FilterOptions::default(),
            input: InputMode::Normal,
            search_buffer: String::new(),
            compare_a: CompareSide::Index,
            compare_b: None,
            loading: false,
            status: ConnectionStatus::Connecting,
        }
    }

    // -----------------------------------------------------------------------
    // Derived views
    // -----------------------------------------------------------------------

    pub fn current_snapshot(&self) -> Option<&Snapshot> {
        self.store.get(self.selected)
    }

    pub fn previous_snapshot(&self) -> Option<&Snapshot> {
        self.store.previous(self.selected)
    }

    /// Unfiltered records for the active view's primary dataset.
    pub fn base_data(&self) -> Cow<'_, [MatchRecord]> {
        match self.view {
            ViewMode::Table => Cow::Borrowed(self.current_snapshot().map(|s| s.data.as_slice()).unwrap_or_default()),
            ViewMode::Index => Cow::Owned(self.store.index()),
            ViewMode::Compare => self.compare_a_data(),
        }
    }

    pub fn visible_rows<'a>(&self, base: &'a [MatchRecord]) -> Vec<&'a MatchRecord> {
        filter_matches(base, &self.filters)
    }

    /// `row_id` → record in the previous snapshot; empty outside the table view.
    pub fn previous_rows(&self) -> HashMap<&str, &MatchRecord> {
        match (self.view, self.previous_snapshot()) {
            (ViewMode::Table, Some(prev)) => previous_lookup(&prev.data),
            _ => HashMap::new(),
        }
    }

    pub fn changes_for(&self, m: &MatchRecord, previous: &HashMap<&str, &MatchRecord>) -> ChangeSet {
        detect_changes(m, previous.get(m.row_id.as_str()).copied())
    }

    pub fn compare_a_data(&self) -> Cow<'_, [MatchRecord]> {
        match self.compare_a {
            CompareSide::Index => Cow::Owned(self.store.index()),
            CompareSide::Snapshot(i) => Cow::Borrowed(self.store.get(i).map(|s| s.data.as_slice()).unwrap_or_default()),
        }
    }

    pub fn compare_b_data(&self) -> Option<&[MatchRecord]> {
        self.compare_b.and_then(|i| self.store.get(i)).map(|s| s.data.as_slice())
    }

    /// Filtered side A joined against side B.
    pub fn compare_pairs<'a>(&self, a: &'a [MatchRecord], b: &'a [MatchRecord]) -> Vec<MatchPair<'a>> {
        build_pairs(self.visible_rows(a), b)
    }

    pub fn compare_a_label(&self) -> String {
        match self.compare_a {
            CompareSide::Index => "Index".to_string(),
            CompareSide::Snapshot(i) => self.snapshot_label(i),
        }
    }

    pub fn snapshot_label(&self, position: usize) -> String {
        match self.store.get(position) {
            Some(s) => format!("Table {} ({})", position + 1, s.scraped_at_cst),
            None => "—".to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // Backend round trips
    // -----------------------------------------------------------------------

    /// Re-fetch the canonical list. On failure the current data stays as is.
    pub async fn refresh(&mut self, client: &BackendClient) {
        self.loading = true;
        let result = client.list_snapshots().await;
        self.loading = false;

        match result {
            Ok(snapshots) => {
                self.apply_snapshot_list(snapshots);
                self.status = ConnectionStatus::Connected;
            }
            Err(e) => {
                error!(error = %e, "failed to fetch snapshots");
                self.status = ConnectionStatus::Error(e.to_string());
            }
        }
    }

    pub async fn scrape(&mut self, client: &BackendClient) {
        self.loading = true;
        let result = client.scrape().await;
        self.loading = false;

        match result {
            Ok(snapshot) => {
                self.apply_scraped(snapshot);
                self.status = ConnectionStatus::Connected;
            }
            Err(e) => {
                error!(error = %e, "scrape failed");
                self.status = ConnectionStatus::Error(e.to_string());
            }
        }
    }

    /// Delete the selected snapshot, then re-fetch whatever the backend now holds.
    pub async fn delete_current(&mut self, client: &BackendClient) {
        let Some(id) = self.current_snapshot().map(|s| s.id.clone()) else {
            return;
        };
        let position = self.selected;

        self.loading = true;
        let result = client.delete_snapshot(&id).await;
        self.loading = false;

        let failure = match result {
            Ok(()) => {
                self.after_delete(position);
                None
            }
            Err(e) => {
                warn!(id = %id, error = %e, "delete failed, re-fetching");
                Some(e.to_string())
            }
        };
        self.refresh_keeping_error(client, failure).await;
    }

    pub async fn clear_all(&mut self, client: &BackendClient) {
        self.loading = true;
        let result = client.clear_all().await;
        self.loading = false;

        let failure = match result {
            Ok(()) => {
                self.after_clear();
                None
            }
            Err(e) => {
                error!(error = %e, "clear all failed");
                Some(e.to_string())
            }
        };
        self.refresh_keeping_error(client, failure).await;
    }

    /// Re-fetch after a mutation. A failed mutation stays the reported status
    /// even when the re-fetch itself succeeds.
    async fn refresh_keeping_error(&mut self, client: &BackendClient, failure: Option<String>) {
        self.refresh(client).await;
        if let (Some(msg), ConnectionStatus::Connected) = (failure, &self.status) {
            self.status = ConnectionStatus::Error(msg);
        }
    }

    // -----------------------------------------------------------------------
    // State transitions
    // -----------------------------------------------------------------------

    pub fn apply_snapshot_list(&mut self, snapshots: Vec<Snapshot>) {
        self.store.replace_all(snapshots);
        self.selected = self.selected.min(self.store.len().saturating_sub(1));
        self.selected_row = 0;
        self.fix_compare_sides();
    }

    /// A fresh scrape is appended and becomes the selected snapshot.
    pub fn apply_scraped(&mut self, snapshot: Snapshot) {
        self.store.append(snapshot);
        self.selected = self.store.len() - 1;
        self.selected_row = 0;
        self.fix_compare_sides();
    }

    fn after_delete(&mut self, position: usize) {
        if self.selected >= position && self.selected > 0 {
            self.selected -= 1;
        }
    }

    fn after_clear(&mut self) {
        info!("local snapshot list cleared");
        self.store.clear();
        self.selected = 0;
        self.selected_row = 0;
        self.fix_compare_sides();
    }

    pub fn select_next_snapshot(&mut self) {
        if self.selected + 1 < self.store.len() {
            self.selected += 1;
            self.selected_row = 0;
        }
    }

    pub fn select_prev_snapshot(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.selected_row = 0;
        }
    }

    pub fn select_next_row(&mut self, row_count: usize) {
        self.selected_row = (self.selected_row + 1).min(row_count.saturating_sub(1));
    }

    pub fn select_prev_row(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
        self.selected_row = 0;
        self.fix_compare_sides();
    }

    pub fn toggle_live_only(&mut self) {
        self.filters.live_only = !self.filters.live_only;
        self.selected_row = 0;
    }

    pub fn cycle_scope(&mut self) {
        self.filters.scope = self.filters.scope.next();
        self.selected_row = 0;
    }

    /// Turn the search buffer into a token and leave search mode.
    pub fn commit_search(&mut self) {
        let raw = std::mem::take(&mut self.search_buffer);
        if self.filters.tokens.add(&raw) {
            self.selected_row = 0;
        }
        self.input = InputMode::Normal;
    }

    pub fn cancel_search(&mut self) {
        self.search_buffer.clear();
        self.input = InputMode::Normal;
    }

    pub fn pop_token(&mut self) {
        if self.filters.tokens.pop().is_some() {
            self.selected_row = 0;
        }
    }

    /// Drop every search token and pinned competition.
    pub fn clear_filters(&mut self) {
        self.filters.tokens.clear();
        self.filters.competitions.clear();
        self.selected_row = 0;
    }

    /// Competitions in the active dataset matching what is being typed.
    pub fn suggestions(&self) -> Vec<String> {
        competition_suggestions(&self.base_data(), &self.search_buffer)
    }

    /// Pin the first suggestion as an exact competition filter and leave search mode.
    pub fn pin_first_suggestion(&mut self) {
        let Some(competition) = self.suggestions().into_iter().next() else {
            return;
        };
        self.filters.competitions.insert(competition);
        self.search_buffer.clear();
        self.input = InputMode::Normal;
        self.selected_row = 0;
    }

    /// Index → Table 1 → … → second-to-last table → Index. The last table has no later partner.
    pub fn cycle_compare_a(&mut self) {
        let last_with_partner = self.store.len().checked_sub(2);
        self.compare_a = match (self.compare_a, last_with_partner) {
            (_, None) => CompareSide::Index,
            (CompareSide::Index, Some(_)) => CompareSide::Snapshot(0),
            (CompareSide::Snapshot(i), Some(last)) if i < last => CompareSide::Snapshot(i + 1),
            (CompareSide::Snapshot(_), Some(_)) => CompareSide::Index,
        };
        self.compare_b = None;
        self.selected_row = 0;
        self.fix_compare_sides();
    }

    pub fn cycle_compare_b(&mut self) {
        let allowed = self.compare_a.allowed_targets(self.store.len());
        if allowed.is_empty() {
            self.compare_b = None;
            return;
        }
        self.compare_b = Some(match self.compare_b {
            Some(b) if b + 1 < allowed.end => b + 1,
            _ => allowed.start,
        });
        self.selected_row = 0;
    }

    /// Keep both comparison sides pointing at snapshots that exist, with B after A.
    fn fix_compare_sides(&mut self) {
        if let CompareSide::Snapshot(a) = self.compare_a {
            if a + 1 >= self.store.len() {
                self.compare_a = CompareSide::Index;
            }
        }
        let allowed = self.compare_a.allowed_targets(self.store.len());
        self.compare_b = match self.compare_b {
            Some(b) if allowed.contains(&b) => Some(b),
            _ => allowed.last(),
        };
    }
}
