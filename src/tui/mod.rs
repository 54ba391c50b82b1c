pub mod format;
pub mod render;

use crossterm::event::{KeyCode, KeyEvent};

use crate::client::BackendClient;
use crate::state::{AppState, InputMode, PendingAction, ViewMode};

pub use render::render;

/// Backend work requested by a key press; everything else is applied to the state directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    None,
    Quit,
    Refresh,
    Scrape,
    DeleteCurrent,
    ClearAll,
}

impl Command {
    pub fn needs_backend(self) -> bool {
        !matches!(self, Command::None | Command::Quit)
    }
}

pub async fn run_command(app: &mut AppState, client: &BackendClient, command: Command) {
    match command {
        Command::Refresh => app.refresh(client).await,
        Command::Scrape => app.scrape(client).await,
        Command::DeleteCurrent => app.delete_current(client).await,
        Command::ClearAll => app.clear_all(client).await,
        Command::None | Command::Quit => {}
    }
}

/// Rows in the active view after filtering, for cursor clamping.
fn row_count(app: &AppState) -> usize {
    match app.view {
        ViewMode::Table | ViewMode::Index => {
            let base = app.base_data();
            app.visible_rows(&base).len()
        }
        ViewMode::Compare => {
            let a = app.compare_a_data();
            app.compare_b_data().map_or(0, |b| app.compare_pairs(&a, b).len())
        }
    }
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Command {
    match app.input {
        InputMode::Search => {
            match key.code {
                KeyCode::Enter => app.commit_search(),
                KeyCode::Esc => app.cancel_search(),
                KeyCode::Tab => app.pin_first_suggestion(),
                KeyCode::Backspace => {
                    app.search_buffer.pop();
                }
                KeyCode::Char(c) => app.search_buffer.push(c),
                _ => {}
            }
            Command::None
        }
        InputMode::Confirm(action) => {
            app.input = InputMode::Normal;
            match (key.code, action) {
                (KeyCode::Char('y') | KeyCode::Char('Y'), PendingAction::DeleteCurrent) => Command::DeleteCurrent,
                (KeyCode::Char('y') | KeyCode::Char('Y'), PendingAction::ClearAll) => Command::ClearAll,
                _ => Command::None,
            }
        }
        InputMode::Normal => handle_normal_key(app, key),
    }
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> Command {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Command::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') => return Command::Refresh,
        KeyCode::Char('s') | KeyCode::Char('S') => return Command::Scrape,
        KeyCode::Char('d') | KeyCode::Char('D') if app.current_snapshot().is_some() => {
            app.input = InputMode::Confirm(PendingAction::DeleteCurrent);
        }
        KeyCode::Char('c') | KeyCode::Char('C') => app.input = InputMode::Confirm(PendingAction::ClearAll),
        KeyCode::Char('/') => app.input = InputMode::Search,
        KeyCode::Char('l') | KeyCode::Char('L') => app.toggle_live_only(),
        KeyCode::Char('x') | KeyCode::Char('X') => app.clear_filters(),
        KeyCode::Backspace => app.pop_token(),
        KeyCode::Tab => app.cycle_scope(),
        KeyCode::Char('1') => app.set_view(ViewMode::Table),
        KeyCode::Char('2') => app.set_view(ViewMode::Index),
        KeyCode::Char('3') => app.set_view(ViewMode::Compare),
        KeyCode::Char('a') | KeyCode::Char('A') if app.view == ViewMode::Compare => app.cycle_compare_a(),
        KeyCode::Char('b') | KeyCode::Char('B') if app.view == ViewMode::Compare => app.cycle_compare_b(),
        KeyCode::Left => app.select_prev_snapshot(),
        KeyCode::Right => app.select_next_snapshot(),
        KeyCode::Down | KeyCode::Char('j') => {
            let rows = row_count(app);
            app.select_next_row(rows);
        }
        KeyCode::Up | KeyCode::Char('k') => app.select_prev_row(),
        _ => {}
    }
    Command::None
}
