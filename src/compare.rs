use std::collections::HashMap;
use std::ops::Range;

use crate::types::{FieldKey, MatchRecord};

// ---------------------------------------------------------------------------
// Comparison sides
// ---------------------------------------------------------------------------

/// Left-hand side of a comparison. The right-hand side is always a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareSide {
    Index,
    Snapshot(usize),
}

impl CompareSide {
    /// Snapshot positions allowed on the right: any for the index, strictly later otherwise.
    pub fn allowed_targets(self, snapshot_count: usize) -> Range<usize> {
        match self {
            CompareSide::Index => 0..snapshot_count,
            CompareSide::Snapshot(a) => (a + 1).min(snapshot_count)..snapshot_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Pairing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct MatchPair<'a> {
    pub a: &'a MatchRecord,
    pub b: &'a MatchRecord,
}

impl MatchPair<'_> {
    pub fn delta(&self, key: FieldKey) -> OddsDelta {
        OddsDelta::between(self.a.field(key), self.b.field(key))
    }
}

/// Inner join of `a` against `b` on `row_id`, in `a` order. When `b` repeats
/// a `row_id`, its first record is used.
pub fn build_pairs<'a, I>(a: I, b: &'a [MatchRecord]) -> Vec<MatchPair<'a>>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut lookup: HashMap<&str, &MatchRecord> = HashMap::with_capacity(b.len());
    for m in b {
        lookup.entry(m.row_id.as_str()).or_insert(m);
    }

    a.into_iter()
        .filter_map(|ma| lookup.get(ma.row_id.as_str()).map(|&mb| MatchPair { a: ma, b: mb }))
        .collect()
}

// ---------------------------------------------------------------------------
// Deltas
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OddsDelta {
    /// One side did not parse to a finite number.
    Unavailable,
    Unchanged,
    Up(f64),
    Down(f64),
}

impl OddsDelta {
    /// `b - a`, rounded to 2 decimals.
    pub fn between(a: &str, b: &str) -> Self {
        let (Some(a), Some(b)) = (parse_numeric(a), parse_numeric(b)) else {
            return OddsDelta::Unavailable;
        };
        let delta = ((b - a) * 100.0).round() / 100.0;
        if delta > 0.0 {
            OddsDelta::Up(delta)
        } else if delta < 0.0 {
            OddsDelta::Down(delta)
        } else {
            OddsDelta::Unchanged
        }
    }
}

impl std::fmt::Display for OddsDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OddsDelta::Unavailable => write!(f, "—"),
            OddsDelta::Unchanged => write!(f, "no change"),
            OddsDelta::Up(d) => write!(f, "+{d:.2} ▲"),
            OddsDelta::Down(d) => write!(f, "{d:.2} ▼"),
        }
    }
}

/// Keep only digits, '.', and '-', then parse. "+1/4" becomes 14; "N/A" fails.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{priced, record};

    #[test]
    fn inner_join_drops_unmatched_left_rows() {
        let a = vec![record("1", "20:00"), record("2", "20:00")];
        let b = vec![record("2", "21:00")];
        let pairs = build_pairs(&a, &b);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].a.row_id, "2");
        assert_eq!(pairs[0].b.time_or_status, "21:00");
    }

    #[test]
    fn pairs_follow_left_order() {
        let a = vec![record("3", ""), record("1", ""), record("2", "")];
        let b = vec![record("1", ""), record("2", ""), record("3", "")];
        let ids: Vec<_> = build_pairs(&a, &b).iter().map(|p| p.a.row_id.clone()).collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }

    #[test]
    fn delta_rounds_to_cents() {
        let d = OddsDelta::between("0.75", "0.80");
        assert_eq!(d, OddsDelta::Up(0.05));
        assert_eq!(d.to_string(), "+0.05 ▲");
    }

    #[test]
    fn negative_and_zero_deltas() {
        assert_eq!(OddsDelta::between("1.05", "0.95").to_string(), "-0.10 ▼");
        assert_eq!(OddsDelta::between("0.90", "0.9"), OddsDelta::Unchanged);
        assert_eq!(OddsDelta::between("0.901", "0.899"), OddsDelta::Unchanged);
        assert_eq!(OddsDelta::between("0.80", "0.80").to_string(), "no change");
    }

    #[test]
    fn unparsable_sides_are_unavailable() {
        assert_eq!(OddsDelta::between("N/A", "0.80"), OddsDelta::Unavailable);
        assert_eq!(OddsDelta::between("0.80", ""), OddsDelta::Unavailable);
        assert_eq!(OddsDelta::between("-", "0.80"), OddsDelta::Unavailable);
        assert_eq!(OddsDelta::Unavailable.to_string(), "—");
    }

    #[test]
    fn signed_lines_parse_after_stripping() {
        assert_eq!(parse_numeric("-1"), Some(-1.0));
        assert_eq!(parse_numeric("+0"), Some(0.0));
        assert_eq!(parse_numeric("2.5"), Some(2.5));
    }

    #[test]
    fn pair_delta_uses_field() {
        let a = vec![priced("1", "0.75")];
        let b = vec![priced("1", "0.80")];
        let pairs = build_pairs(&a, &b);
        assert_eq!(pairs[0].delta(FieldKey::AhHomeOdds), OddsDelta::Up(0.05));
        assert_eq!(pairs[0].delta(FieldKey::OuTotalLine), OddsDelta::Unchanged);
    }

    #[test]
    fn allowed_targets() {
        assert_eq!(CompareSide::Index.allowed_targets(3), 0..3);
        assert_eq!(CompareSide::Snapshot(0).allowed_targets(3), 1..3);
        assert!(CompareSide::Snapshot(2).allowed_targets(3).is_empty());
    }
}
