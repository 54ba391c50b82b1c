use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::compare::{MatchPair, OddsDelta};
use crate::detector::{change_note, ChangeSet};
use crate::state::{AppState, ConnectionStatus, InputMode, PendingAction, ViewMode};
use crate::tui::format::{fixture, odds_cell, on_off, score_cell, truncate};
use crate::types::{FieldKey, MarketKind, MatchRecord};

const HEADER_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const CHANGED_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Yellow);

pub fn render(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(3), // filters
            Constraint::Min(0),    // body
            Constraint::Length(4), // detail
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_filters(f, app, chunks[1]);

    if app.loading {
        render_loading(f, chunks[2]);
    } else {
        match app.view {
            ViewMode::Table | ViewMode::Index => render_matches(f, app, chunks[2], chunks[3]),
            ViewMode::Compare => render_compare(f, app, chunks[2], chunks[3]),
        }
    }

    render_footer(f, app, chunks[4]);

    if let InputMode::Confirm(action) = app.input {
        render_confirm(f, action);
    }
}

// ---------------------------------------------------------------------------
// Header & filters
// ---------------------------------------------------------------------------

fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let (status_text, status_color) = match &app.status {
        ConnectionStatus::Connected => ("● connected".to_string(), Color::Green),
        ConnectionStatus::Connecting => ("◌ connecting".to_string(), Color::Yellow),
        ConnectionStatus::Error(e) => (format!("✗ {}", truncate(e, 50)), Color::Red),
    };

    let view_text = match app.view {
        ViewMode::Table => match app.current_snapshot() {
            Some(_) => format!("{} of {}", app.snapshot_label(app.selected), app.store.len()),
            None => "no tables".to_string(),
        },
        ViewMode::Index => format!("Index across {} tables", app.store.len()),
        ViewMode::Compare => {
            let b = app.compare_b.map_or("—".to_string(), |i| app.snapshot_label(i));
            format!("{} → {}", app.compare_a_label(), b)
        }
    };

    let line = Line::from(vec![
        Span::styled(" Odds Dashboard  ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw("  │  "),
        Span::styled(view_text, Style::default().fg(Color::White)),
    ]);
    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    f.render_widget(paragraph, area);
}

fn render_filters(f: &mut Frame, app: &AppState, area: Rect) {
    let mut spans = vec![
        Span::styled(" live: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            on_off(app.filters.live_only),
            Style::default().fg(if app.filters.live_only { Color::Green } else { Color::White }),
        ),
        Span::styled("  scope: ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.filters.scope.to_string()),
        Span::styled("  tokens: ", Style::default().fg(Color::DarkGray)),
    ];

    if app.filters.tokens.is_empty() {
        spans.push(Span::styled("none", Style::default().fg(Color::DarkGray)));
    }
    for token in app.filters.tokens.iter() {
        spans.push(Span::styled(format!("[{token}] "), Style::default().fg(Color::Cyan)));
    }
    for competition in &app.filters.competitions {
        spans.push(Span::styled(format!("={competition} "), Style::default().fg(Color::Magenta)));
    }

    if app.input == InputMode::Search {
        spans.push(Span::styled("  search: ", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!("{}▏", app.search_buffer)));
        let suggestions = app.suggestions();
        if !suggestions.is_empty() {
            spans.push(Span::styled(
                format!("  ⇥ {}", suggestions.join(", ")),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    f.render_widget(paragraph, area);
}

fn render_loading(f: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        " Loading…",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    f.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Table & index views
// ---------------------------------------------------------------------------

fn market_color(key: FieldKey) -> Color {
    match key.market() {
        MarketKind::AsianHandicap => Color::Red,
        MarketKind::OverUnder => Color::LightBlue,
    }
}

fn render_matches(f: &mut Frame, app: &AppState, area: Rect, detail_area: Rect) {
    let base = app.base_data();
    let rows = app.visible_rows(&base);
    let previous = app.previous_rows();
    let changes: Vec<ChangeSet> = rows.iter().map(|m| app.changes_for(m, &previous)).collect();

    let mut headers = vec!["Competition", "Time", "Home", "Score", "Away"];
    headers.extend(FieldKey::ALL.iter().map(|k| k.header()));
    let header = Row::new(headers.into_iter().map(|h| Cell::from(h).style(HEADER_STYLE))).height(1);

    let body: Vec<Row> = rows
        .iter()
        .zip(&changes)
        .map(|(m, changed)| {
            let time_style = if m.is_live() {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let mut cells = vec![
                Cell::from(truncate(&m.competition, 10)),
                Cell::from(m.time_or_status.clone()).style(time_style),
                Cell::from(truncate(&m.home_team, 22)),
                Cell::from(score_cell(&m.score).to_string()),
                Cell::from(truncate(&m.away_team, 22)),
            ];
            cells.extend(FieldKey::ALL.iter().map(|&key| {
                let value = m.field(key);
                let style = if changed.contains_key(&key) && odds_cell(value) != "-" {
                    CHANGED_STYLE
                } else {
                    Style::default().fg(market_color(key))
                };
                Cell::from(odds_cell(value).to_string()).style(style)
            }));
            Row::new(cells)
        })
        .collect();

    let title = match app.view {
        ViewMode::Index => format!(" INDEX · {} matches ", rows.len()),
        _ => format!(" MATCHES · {} matches ", rows.len()),
    };

    let mut widths = vec![
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Min(12),
        Constraint::Length(7),
        Constraint::Min(12),
    ];
    widths.extend([Constraint::Length(7); 6]);

    let table = Table::new(body, widths)
        .header(header)
        .block(titled_block(title))
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let selected = app.selected_row.min(rows.len().saturating_sub(1));
    let mut state = TableState::default().with_selected((!rows.is_empty()).then_some(selected));
    f.render_stateful_widget(table, area, &mut state);

    let detail = match rows.get(selected) {
        Some(m) => match_detail(m, &changes[selected]),
        None if app.store.is_empty() => vec![Line::raw(" No table data available. Press [s] to scrape the first table.")],
        None => vec![Line::raw(" No matches found matching your criteria")],
    };
    render_detail(f, detail, detail_area);
}

fn match_detail<'a>(m: &'a MatchRecord, changes: &ChangeSet) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {} ", m.competition), Style::default().fg(Color::Cyan)),
        Span::raw(fixture(&m.home_team, &m.away_team)),
        Span::styled(format!("  [{}]", m.row_id), Style::default().fg(Color::DarkGray)),
    ])];
    if changes.is_empty() {
        lines.push(Line::styled(" no odds changes since the previous table", Style::default().fg(Color::DarkGray)));
    } else {
        let notes: Vec<Span> = changes
            .iter()
            .map(|(key, prev)| Span::styled(format!(" {key}: {}  ", change_note(prev)), CHANGED_STYLE))
            .collect();
        lines.push(Line::from(notes));
    }
    lines
}

// ---------------------------------------------------------------------------
// Compare view
// ---------------------------------------------------------------------------

fn delta_style(delta: OddsDelta) -> Style {
    match delta {
        OddsDelta::Up(_) => Style::default().fg(Color::Green),
        OddsDelta::Down(_) => Style::default().fg(Color::Red),
        OddsDelta::Unchanged | OddsDelta::Unavailable => Style::default().fg(Color::DarkGray),
    }
}

fn render_compare(f: &mut Frame, app: &AppState, area: Rect, detail_area: Rect) {
    let a = app.compare_a_data();
    let Some(b) = app.compare_b_data() else {
        let paragraph = Paragraph::new(" Need a later table to compare against. Press [a] / [b] to pick sides.")
            .block(titled_block(" COMPARE ".to_string()));
        f.render_widget(paragraph, area);
        render_detail(f, Vec::new(), detail_area);
        return;
    };
    let pairs = app.compare_pairs(&a, b);

    let mut headers = vec!["Competition", "Match", "Time A", "Time B", "Score A", "Score B"];
    headers.extend(FieldKey::ALL.iter().map(|k| k.header()));
    let header = Row::new(headers.into_iter().map(|h| Cell::from(h).style(HEADER_STYLE))).height(1);

    let body: Vec<Row> = pairs
        .iter()
        .map(|p| {
            let mut cells = vec![
                Cell::from(truncate(&p.a.competition, 10)),
                Cell::from(truncate(&fixture(&p.a.home_team, &p.a.away_team), 30)),
                Cell::from(p.a.time_or_status.clone()),
                Cell::from(p.b.time_or_status.clone()),
                Cell::from(score_cell(&p.a.score).to_string()),
                Cell::from(score_cell(&p.b.score).to_string()),
            ];
            cells.extend(FieldKey::ALL.iter().map(|&key| {
                let delta = p.delta(key);
                Cell::from(delta.to_string()).style(delta_style(delta))
            }));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![
        Constraint::Length(10),
        Constraint::Min(16),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(7),
    ];
    widths.extend([Constraint::Length(9); 6]);

    let table = Table::new(body, widths)
        .header(header)
        .block(titled_block(format!(" COMPARE · {} paired ", pairs.len())))
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let selected = app.selected_row.min(pairs.len().saturating_sub(1));
    let mut state = TableState::default().with_selected((!pairs.is_empty()).then_some(selected));
    f.render_stateful_widget(table, area, &mut state);

    let detail = pairs.get(selected).map(pair_detail).unwrap_or_default();
    render_detail(f, detail, detail_area);
}

fn pair_detail<'a>(p: &MatchPair<'a>) -> Vec<Line<'a>> {
    let header = Line::from(vec![
        Span::styled(format!(" {} ", p.a.competition), Style::default().fg(Color::Cyan)),
        Span::raw(fixture(&p.a.home_team, &p.a.away_team)),
    ]);
    let values: Vec<Span> = FieldKey::ALL
        .iter()
        .map(|&key| {
            let delta = p.delta(key);
            Span::styled(
                format!(" {} {} → {} ({delta}) ", key.header(), odds_cell(p.a.field(key)), odds_cell(p.b.field(key))),
                delta_style(delta),
            )
        })
        .collect();
    vec![header, Line::from(values)]
}

// ---------------------------------------------------------------------------
// Detail, footer, dialogs
// ---------------------------------------------------------------------------

fn titled_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(title, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)))
}

fn render_detail(f: &mut Frame, lines: Vec<Line>, area: Rect) {
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::TOP).border_style(Style::default().fg(Color::DarkGray)));
    f.render_widget(paragraph, area);
}

fn render_footer(f: &mut Frame, app: &AppState, area: Rect) {
    let keys: &[(&str, &str)] = match (app.input, app.view) {
        (InputMode::Search, _) => &[("[enter] ", "add token  "), ("[tab] ", "pin competition  "), ("[esc] ", "cancel")],
        (InputMode::Confirm(_), _) => &[("[y] ", "confirm  "), ("[n] ", "cancel")],
        (InputMode::Normal, ViewMode::Compare) => &[
            ("[q] ", "quit  "),
            ("[1/2/3] ", "table/index/compare  "),
            ("[a] ", "side A  "),
            ("[b] ", "side B  "),
            ("[/] ", "search  "),
            ("[l] ", "live  "),
            ("[tab] ", "scope  "),
        ],
        (InputMode::Normal, _) => &[
            ("[q] ", "quit  "),
            ("[r] ", "refresh  "),
            ("[s] ", "scrape  "),
            ("[d] ", "delete  "),
            ("[c] ", "clear  "),
            ("[←→] ", "table  "),
            ("[1/2/3] ", "table/index/compare  "),
            ("[/] ", "search  "),
            ("[l] ", "live  "),
            ("[tab] ", "scope  "),
            ("[x] ", "reset filters"),
        ],
    };
    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, label)| [Span::styled(*key, Style::default().fg(Color::Yellow)), Span::raw(*label)])
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_confirm(f: &mut Frame, action: PendingAction) {
    let (title, message) = match action {
        PendingAction::DeleteCurrent => (" Delete Table ", "Delete the current table from the backend? [y/n]"),
        PendingAction::ClearAll => (
            " Clear All Data ",
            "Are you sure you want to clear all table data? This action cannot be undone. [y/n]",
        ),
    };
    let area = centered_rect(60, 5, f.area());
    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(message).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(Span::styled(title, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))),
    );
    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(height), Constraint::Fill(1)])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
