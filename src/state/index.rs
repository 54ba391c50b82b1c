use std::collections::HashSet;

use crate::types::{MatchRecord, Snapshot};

/// Collapse all snapshots into one latest-wins list keyed by `row_id`.
///
/// Walks newest → oldest. A record is admitted only while it still shows a
/// kickoff "HH:MM" and carries at least one odds value; the admission check
/// runs before the seen check, so an older admissible occurrence wins over a
/// newer one that no longer qualifies. Output is in discovery order.
pub fn build_index(snapshots: &[Snapshot]) -> Vec<MatchRecord> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();

    for snapshot in snapshots.iter().rev() {
        for m in &snapshot.data {
            if !m.has_kickoff_time() || !m.has_any_odds() {
                continue;
            }
            if seen.insert(m.row_id.as_str()) {
                out.push(m.clone());
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{priced, record, set, snapshot};
    use crate::types::FieldKey;

    #[test]
    fn latest_occurrence_wins() {
        let s1 = snapshot("s1", vec![priced("X", "0.70")]);
        let s2 = snapshot("s2", vec![priced("X", "0.75")]);
        let s3 = snapshot("s3", vec![priced("X", "0.80")]);

        let index = build_index(&[s1, s2, s3]);
        let xs: Vec<_> = index.iter().filter(|m| m.row_id == "X").collect();
        assert_eq!(xs.len(), 1);
        assert_eq!(xs[0].odds.ah.home_odds, "0.80");
    }

    #[test]
    fn rebuilding_is_deterministic() {
        let snaps = vec![
            snapshot("s1", vec![priced("A", "0.70"), priced("B", "0.80")]),
            snapshot("s2", vec![priced("C", "0.90"), priced("A", "0.72")]),
        ];
        assert_eq!(build_index(&snaps), build_index(&snaps));
    }

    #[test]
    fn output_is_reverse_chronological_discovery_order() {
        let snaps = vec![
            snapshot("s1", vec![priced("A", "0.70"), priced("B", "0.80")]),
            snapshot("s2", vec![priced("C", "0.90"), priced("A", "0.72")]),
        ];
        let ids: Vec<_> = build_index(&snaps).into_iter().map(|m| m.row_id).collect();
        assert_eq!(ids, ["C", "A", "B"]);
    }

    #[test]
    fn live_and_unpriced_records_are_excluded() {
        let live = {
            let mut m = priced("L", "0.80");
            m.time_or_status = "67".to_string();
            m
        };
        let unpriced = record("U", "20:00");
        let only_under = set(record("O", "20:00"), FieldKey::OuUnderOdds, "0.95");

        let ids: Vec<_> = build_index(&[snapshot("s1", vec![live, unpriced, only_under])])
            .into_iter()
            .map(|m| m.row_id)
            .collect();
        assert_eq!(ids, ["O"]);
    }

    #[test]
    fn older_qualifying_occurrence_survives_when_newest_goes_live() {
        let mut now_live = priced("X", "0.85");
        now_live.time_or_status = "12".to_string();
        let snaps = vec![snapshot("s1", vec![priced("X", "0.80")]), snapshot("s2", vec![now_live])];

        let index = build_index(&snaps);
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].odds.ah.home_odds, "0.80");
    }

    #[test]
    fn empty_sequence_gives_empty_index() {
        assert!(build_index(&[]).is_empty());
    }
}
