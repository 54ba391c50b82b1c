use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::config::NOT_AVAILABLE;

// ---------------------------------------------------------------------------
// Match records
// ---------------------------------------------------------------------------

/// One scraped row of betting data. `row_id` correlates the same match across snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub competition: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time_or_status: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub home_team: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub score: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub away_team: String,
    #[serde(default, deserialize_with = "lenient_object")]
    pub odds: Odds,
    #[serde(default, deserialize_with = "lenient_string")]
    pub row_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub data_league: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub data_index: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Odds {
    #[serde(default, deserialize_with = "lenient_object")]
    pub ah: AsianHandicap,
    #[serde(default, deserialize_with = "lenient_object")]
    pub ou: OverUnder,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsianHandicap {
    #[serde(default, deserialize_with = "lenient_string")]
    pub home_odds: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub line: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub away_odds: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverUnder {
    #[serde(default, deserialize_with = "lenient_string")]
    pub over_odds: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub total_line: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub under_odds: String,
}

impl MatchRecord {
    pub fn field(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::AhHomeOdds => &self.odds.ah.home_odds,
            FieldKey::AhLine => &self.odds.ah.line,
            FieldKey::AhAwayOdds => &self.odds.ah.away_odds,
            FieldKey::OuOverOdds => &self.odds.ou.over_odds,
            FieldKey::OuTotalLine => &self.odds.ou.total_line,
            FieldKey::OuUnderOdds => &self.odds.ou.under_odds,
        }
    }

    /// At least one headline price (AH home or OU over) is present.
    pub fn has_valid_odds(&self) -> bool {
        is_present(&self.odds.ah.home_odds) || is_present(&self.odds.ou.over_odds)
    }

    pub fn has_any_odds(&self) -> bool {
        FieldKey::ALL.iter().any(|&k| is_present(self.field(k)))
    }

    /// In-play: status is a minute counter or code ("82", "90+5", "FT"), not a kickoff "HH:MM".
    pub fn is_live(&self) -> bool {
        !self.time_or_status.contains(':') && self.time_or_status != NOT_AVAILABLE
    }

    /// Scheduled: status still carries a kickoff "HH:MM".
    pub fn has_kickoff_time(&self) -> bool {
        self.time_or_status.contains(':')
    }
}

/// Empty strings and the "N/A" sentinel both mean "no value".
pub fn is_present(value: &str) -> bool {
    !value.is_empty() && value != NOT_AVAILABLE
}

// ---------------------------------------------------------------------------
// Odds field keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    AhHomeOdds,
    AhLine,
    AhAwayOdds,
    OuOverOdds,
    OuTotalLine,
    OuUnderOdds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketKind {
    AsianHandicap,
    OverUnder,
}

impl FieldKey {
    /// Column order: AH home, line, away, then OU over, total, under.
    pub const ALL: [FieldKey; 6] = [
        FieldKey::AhHomeOdds,
        FieldKey::AhLine,
        FieldKey::AhAwayOdds,
        FieldKey::OuOverOdds,
        FieldKey::OuTotalLine,
        FieldKey::OuUnderOdds,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FieldKey::AhHomeOdds => "ah_home_odds",
            FieldKey::AhLine => "ah_line",
            FieldKey::AhAwayOdds => "ah_away_odds",
            FieldKey::OuOverOdds => "ou_over_odds",
            FieldKey::OuTotalLine => "ou_total_line",
            FieldKey::OuUnderOdds => "ou_under_odds",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            FieldKey::AhHomeOdds => "Home",
            FieldKey::AhLine => "Line",
            FieldKey::AhAwayOdds => "Away",
            FieldKey::OuOverOdds => "Over",
            FieldKey::OuTotalLine => "Total",
            FieldKey::OuUnderOdds => "Under",
        }
    }

    pub fn market(self) -> MarketKind {
        match self {
            FieldKey::AhHomeOdds | FieldKey::AhLine | FieldKey::AhAwayOdds => MarketKind::AsianHandicap,
            FieldKey::OuOverOdds | FieldKey::OuTotalLine | FieldKey::OuUnderOdds => MarketKind::OverUnder,
        }
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// One scrape result ("table"). Ordering is by arrival position, never by timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "_id", default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub scraped_at_cst: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_at_utc: Option<String>,
    #[serde(default, deserialize_with = "flatten_rows")]
    pub data: Vec<MatchRecord>,
}

/// Strings pass through, numbers keep their JSON spelling, anything else is "".
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// `null` or a value of the wrong shape falls back to the default.
fn lenient_object<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(T::deserialize(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// `data` arrives either flat or as an array of row arrays; flatten one level.
/// Anything that is not an array yields no rows, and unreadable rows are skipped.
fn flatten_rows<'de, D>(deserializer: D) -> std::result::Result<Vec<MatchRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Array(inner) => rows.extend(inner.into_iter().filter_map(parse_row)),
            other => rows.extend(parse_row(other)),
        }
    }
    Ok(rows)
}

fn parse_row(value: Value) -> Option<MatchRecord> {
    match serde_json::from_value(value) {
        Ok(row) => Some(row),
        Err(e) => {
            warn!(error = %e, "skipping unreadable match row");
            None
        }
    }
}
