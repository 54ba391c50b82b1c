use std::collections::{BTreeMap, HashMap};

use crate::types::{FieldKey, MatchRecord};

/// Changed odds fields mapped to their *previous* value.
pub type ChangeSet = BTreeMap<FieldKey, String>;

/// Compare the six odds fields of `current` against its counterpart in the
/// preceding snapshot. Exact string comparison: "0.90" vs "0.9" is a change.
pub fn detect_changes(current: &MatchRecord, previous: Option<&MatchRecord>) -> ChangeSet {
    let Some(previous) = previous else {
        return ChangeSet::new();
    };

    FieldKey::ALL
        .iter()
        .copied()
        .filter(|&key| current.field(key) != previous.field(key))
        .map(|key| (key, previous.field(key).to_string()))
        .collect()
}

/// `row_id` → first record carrying it in the previous snapshot.
pub fn previous_lookup(previous: &[MatchRecord]) -> HashMap<&str, &MatchRecord> {
    let mut lookup = HashMap::with_capacity(previous.len());
    for m in previous {
        lookup.entry(m.row_id.as_str()).or_insert(m);
    }
    lookup
}

pub fn change_note(previous_value: &str) -> String {
    format!("previous value was: {previous_value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{priced, record, set, snapshot};

    #[test]
    fn no_previous_means_no_changes() {
        assert!(detect_changes(&priced("1", "0.80"), None).is_empty());
        assert!(detect_changes(&record("2", "FT"), None).is_empty());
    }

    #[test]
    fn identical_records_have_no_changes() {
        let m = priced("1", "0.80");
        assert!(detect_changes(&m, Some(&m.clone())).is_empty());
    }

    #[test]
    fn each_single_field_change_is_reported_with_previous_value() {
        let prev = priced("1", "0.80");
        for key in FieldKey::ALL {
            let cur = set(prev.clone(), key, "9.99");
            let changes = detect_changes(&cur, Some(&prev));
            assert_eq!(changes.len(), 1, "{key}");
            assert_eq!(changes.get(&key).map(String::as_str), Some(prev.field(key)));
        }
    }

    #[test]
    fn formatting_only_difference_counts_as_change() {
        let prev = set(priced("1", "0.80"), FieldKey::OuOverOdds, "0.90");
        let cur = set(prev.clone(), FieldKey::OuOverOdds, "0.9");
        let changes = detect_changes(&cur, Some(&prev));
        assert_eq!(changes.get(&FieldKey::OuOverOdds).map(String::as_str), Some("0.90"));
    }

    #[test]
    fn score_and_status_are_not_compared() {
        let prev = priced("1", "0.80");
        let mut cur = prev.clone();
        cur.score = "1 - 0".to_string();
        cur.time_or_status = "12".to_string();
        assert!(detect_changes(&cur, Some(&prev)).is_empty());
    }

    #[test]
    fn total_line_move_between_snapshots() {
        let s1 = snapshot("s1", vec![set(priced("tb_1", "0.80"), FieldKey::OuTotalLine, "2.5")]);
        let s2 = snapshot("s2", vec![set(priced("tb_1", "0.80"), FieldKey::OuTotalLine, "3")]);

        let lookup = previous_lookup(&s1.data);
        let current = &s2.data[0];
        let changes = detect_changes(current, lookup.get(current.row_id.as_str()).copied());

        assert_eq!(changes.len(), 1);
        let prev = &changes[&FieldKey::OuTotalLine];
        assert_eq!(FieldKey::OuTotalLine.label(), "ou_total_line");
        assert_eq!(change_note(prev), "previous value was: 2.5");
    }

    #[test]
    fn lookup_keeps_first_duplicate() {
        let data = vec![priced("1", "0.70"), priced("1", "0.99")];
        let lookup = previous_lookup(&data);
        assert_eq!(lookup["1"].odds.ah.home_odds, "0.70");
    }
}
