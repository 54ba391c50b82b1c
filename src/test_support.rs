//! Fixture builders shared by the unit tests.

use crate::types::{FieldKey, MatchRecord, Snapshot};

pub fn record(row_id: &str, time_or_status: &str) -> MatchRecord {
    MatchRecord {
        competition: "ENG PR".to_string(),
        time_or_status: time_or_status.to_string(),
        home_team: "Home FC".to_string(),
        away_team: "Away FC".to_string(),
        row_id: row_id.to_string(),
        ..MatchRecord::default()
    }
}

/// A kickoff-time record with a full set of prices.
pub fn priced(row_id: &str, home_odds: &str) -> MatchRecord {
    let mut m = record(row_id, "22:00");
    m.odds.ah.home_odds = home_odds.to_string();
    m.odds.ah.line = "-1/4".to_string();
    m.odds.ah.away_odds = "0.95".to_string();
    m.odds.ou.over_odds = "0.90".to_string();
    m.odds.ou.total_line = "2.5".to_string();
    m.odds.ou.under_odds = "0.90".to_string();
    m
}

pub fn teams(mut m: MatchRecord, competition: &str, home: &str, away: &str) -> MatchRecord {
    m.competition = competition.to_string();
    m.home_team = home.to_string();
    m.away_team = away.to_string();
    m
}

pub fn set(mut m: MatchRecord, key: FieldKey, value: &str) -> MatchRecord {
    let slot = match key {
        FieldKey::AhHomeOdds => &mut m.odds.ah.home_odds,
        FieldKey::AhLine => &mut m.odds.ah.line,
        FieldKey::AhAwayOdds => &mut m.odds.ah.away_odds,
        FieldKey::OuOverOdds => &mut m.odds.ou.over_odds,
        FieldKey::OuTotalLine => &mut m.odds.ou.total_line,
        FieldKey::OuUnderOdds => &mut m.odds.ou.under_odds,
    };
    *slot = value.to_string();
    m
}

pub fn snapshot(id: &str, data: Vec<MatchRecord>) -> Snapshot {
    Snapshot {
        id: id.to_string(),
        scraped_at_cst: format!("CST {id}"),
        scraped_at_utc: None,
        data,
    }
}
