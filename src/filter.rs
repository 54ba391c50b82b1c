use std::collections::BTreeSet;

use crate::config::MAX_COMPETITION_SUGGESTIONS;
use crate::types::MatchRecord;

// ---------------------------------------------------------------------------
// Search scope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    #[default]
    Competition,
    /// "<home_team> <away_team>"
    Team,
    Both,
}

impl SearchScope {
    pub fn next(self) -> Self {
        match self {
            SearchScope::Competition => SearchScope::Team,
            SearchScope::Team => SearchScope::Both,
            SearchScope::Both => SearchScope::Competition,
        }
    }

    /// `token` must already be lower-cased.
    fn matches(self, m: &MatchRecord, token: &str) -> bool {
        let in_competition = || m.competition.to_lowercase().contains(token);
        let in_teams = || format!("{} {}", m.home_team, m.away_team).to_lowercase().contains(token);
        match self {
            SearchScope::Competition => in_competition(),
            SearchScope::Team => in_teams(),
            SearchScope::Both => in_competition() || in_teams(),
        }
    }
}

impl std::fmt::Display for SearchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SearchScope::Competition => "competition",
            SearchScope::Team => "team",
            SearchScope::Both => "both",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Search tokens
// ---------------------------------------------------------------------------

/// Insertion-ordered, trimmed, case-insensitively unique search tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTokens {
    tokens: Vec<String>,
}

impl SearchTokens {
    /// Returns false when the input is blank or already present.
    pub fn add(&mut self, raw: &str) -> bool {
        let token = raw.trim();
        if token.is_empty() {
            return false;
        }
        let lowered = token.to_lowercase();
        if self.tokens.iter().any(|t| t.to_lowercase() == lowered) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    pub fn pop(&mut self) -> Option<String> {
        self.tokens.pop()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for SearchTokens {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tokens = SearchTokens::default();
        for t in iter {
            tokens.add(t);
        }
        tokens
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub live_only: bool,
    pub tokens: SearchTokens,
    pub scope: SearchScope,
    /// Exact competition names; empty means no restriction.
    pub competitions: BTreeSet<String>,
}

/// Records with valid odds that pass the live, competition, and token filters.
/// Tokens are OR'd: any hit admits the record.
pub fn filter_matches<'a>(base: &'a [MatchRecord], opts: &FilterOptions) -> Vec<&'a MatchRecord> {
    let lowered: Vec<String> = opts.tokens.iter().map(str::to_lowercase).collect();

    base.iter()
        .filter(|m| m.has_valid_odds())
        .filter(|m| !opts.live_only || m.is_live())
        .filter(|m| opts.competitions.is_empty() || opts.competitions.contains(&m.competition))
        .filter(|m| lowered.is_empty() || lowered.iter().any(|t| opts.scope.matches(m, t)))
        .collect()
}

/// Sorted distinct competitions containing `input` (case-insensitive), capped.
pub fn competition_suggestions(base: &[MatchRecord], input: &str) -> Vec<String> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    base.iter()
        .map(|m| m.competition.as_str())
        .filter(|c| c.to_lowercase().contains(&needle))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .take(MAX_COMPETITION_SUGGESTIONS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{priced, record, teams};

    fn sample() -> Vec<MatchRecord> {
        vec![
            teams(priced("1", "0.80"), "ENG PR", "Arsenal", "Spurs"),
            teams(priced("2", "0.81"), "ENG PR", "Chelsea", "Fulham"),
            teams(priced("3", "0.82"), "ESP LL", "Sevilla", "Betis"),
        ]
    }

    fn ids(v: &[&MatchRecord]) -> Vec<String> {
        v.iter().map(|m| m.row_id.clone()).collect()
    }

    #[test]
    fn tokens_are_or_combined() {
        let data = sample();
        let opts = FilterOptions {
            tokens: ["arsenal", "chelsea"].into_iter().collect(),
            scope: SearchScope::Team,
            ..Default::default()
        };
        assert_eq!(ids(&filter_matches(&data, &opts)), ["1", "2"]);
    }

    #[test]
    fn competition_scope_ignores_team_names() {
        let data = sample();
        let opts = FilterOptions {
            tokens: ["chelsea", "esp"].into_iter().collect(),
            scope: SearchScope::Competition,
            ..Default::default()
        };
        assert_eq!(ids(&filter_matches(&data, &opts)), ["3"]);
    }

    #[test]
    fn both_scope_matches_either_side() {
        let data = sample();
        let opts = FilterOptions {
            tokens: ["chelsea", "esp"].into_iter().collect(),
            scope: SearchScope::Both,
            ..Default::default()
        };
        assert_eq!(ids(&filter_matches(&data, &opts)), ["2", "3"]);
    }

    #[test]
    fn team_scope_spans_home_and_away() {
        let data = sample();
        let opts = FilterOptions {
            tokens: ["arsenal spurs"].into_iter().collect(),
            scope: SearchScope::Team,
            ..Default::default()
        };
        assert_eq!(ids(&filter_matches(&data, &opts)), ["1"]);
    }

    #[test]
    fn records_without_valid_odds_are_always_dropped() {
        let mut data = sample();
        data.push(record("4", "FT"));
        assert_eq!(filter_matches(&data, &FilterOptions::default()).len(), 3);
    }

    #[test]
    fn live_only_keeps_in_play() {
        let mut data = sample();
        data[0].time_or_status = "45+2".to_string();
        data[1].time_or_status = "N/A".to_string();
        let opts = FilterOptions { live_only: true, ..Default::default() };
        assert_eq!(ids(&filter_matches(&data, &opts)), ["1"]);
    }

    #[test]
    fn exact_competition_filter() {
        let data = sample();
        let opts = FilterOptions {
            competitions: BTreeSet::from(["ESP LL".to_string()]),
            ..Default::default()
        };
        assert_eq!(ids(&filter_matches(&data, &opts)), ["3"]);
    }

    #[test]
    fn blank_and_duplicate_tokens_are_ignored() {
        let mut tokens = SearchTokens::default();
        assert!(tokens.add("  Arsenal "));
        assert!(!tokens.add("arsenal"));
        assert!(!tokens.add("   "));
        assert_eq!(tokens.iter().collect::<Vec<_>>(), ["Arsenal"]);
        assert_eq!(tokens.pop().as_deref(), Some("Arsenal"));
        assert!(tokens.is_empty());
    }

    #[test]
    fn suggestions_are_sorted_and_unique() {
        let data = sample();
        assert_eq!(competition_suggestions(&data, "e"), ["ENG PR", "ESP LL"]);
        assert!(competition_suggestions(&data, "").is_empty());
    }
}
