use crate::types::is_present;

/// Odds cell text; missing values show as "-".
pub fn odds_cell(value: &str) -> &str {
    if is_present(value) {
        value
    } else {
        "-"
    }
}

pub fn score_cell(score: &str) -> &str {
    if score.is_empty() {
        "-"
    } else {
        score
    }
}

pub fn fixture(home: &str, away: &str) -> String {
    format!("{home} v {away}")
}

pub fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Char-aware truncation with a trailing ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
