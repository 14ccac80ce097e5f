//! Multi-series alignment onto a common period axis.
//!
//! Rows are the *union* of every series' period keys: a series missing a
//! period contributes `None` for that row but never removes it.

use std::collections::{BTreeMap, HashMap};

use crate::analytics::changes::compute_changes;
use crate::domain::{AlignedRow, ChangeSet, LatestObservation, NamedSeries, SortOrder};
use crate::period::PeriodKey;

/// Align `series` into one row per distinct period key.
///
/// - `cutoff_year`: keep keys with `year >= cutoff`; `None` or `Some(0)` keeps all
/// - label tie-break: when series disagree on a key's label, the first series wins
/// - changes come from each series' own timeline (see [`compute_changes`])
pub fn align(series: &[NamedSeries], cutoff_year: Option<i32>, order: SortOrder) -> Vec<AlignedRow> {
    let cutoff = cutoff_year.filter(|&y| y != 0);
    let keep = |key: &PeriodKey| cutoff.is_none_or(|c| key.year >= c);

    // Distinct keys in chronological order, first label wins.
    let mut axis: BTreeMap<&PeriodKey, &str> = BTreeMap::new();
    for s in series {
        for p in s.points.iter().filter(|p| keep(&p.key)) {
            axis.entry(&p.key).or_insert(&p.label);
        }
    }

    // Per-series index lookup (first occurrence of a key wins).
    let lookups: Vec<HashMap<&PeriodKey, usize>> = series
        .iter()
        .map(|s| {
            let mut idx = HashMap::with_capacity(s.points.len());
            for (i, p) in s.points.iter().enumerate() {
                idx.entry(&p.key).or_insert(i);
            }
            idx
        })
        .collect();

    let mut rows: Vec<AlignedRow> = axis
        .into_iter()
        .map(|(key, label)| {
            let mut values = BTreeMap::new();
            let mut changes = BTreeMap::new();
            for (s, lookup) in series.iter().zip(&lookups) {
                let (value, change) = match lookup.get(key) {
                    Some(&i) => (
                        s.points[i].value,
                        compute_changes(&s.points, i, s.periods_per_year(), s.is_percent_type),
                    ),
                    None => (None, ChangeSet::default()),
                };
                values.insert(s.id.clone(), value);
                changes.insert(s.id.clone(), change);
            }
            AlignedRow {
                key: key.clone(),
                label: label.to_string(),
                values,
                changes,
            }
        })
        .collect();

    if order == SortOrder::Desc {
        rows.reverse();
    }
    rows
}

/// Cutoff year for a trailing window of `years_back` years; 0 means all time.
pub fn cutoff_year(reference_year: i32, years_back: u32) -> Option<i32> {
    if years_back == 0 {
        return None;
    }
    i32::try_from(years_back)
        .ok()
        .map(|n| reference_year.saturating_sub(n))
}

/// `(label, value)` pairs for one series, in row order (chart feed).
pub fn column(rows: &[AlignedRow], id: &str) -> Vec<(String, Option<f64>)> {
    rows.iter()
        .map(|r| (r.label.clone(), r.values.get(id).copied().flatten()))
        .collect()
}

/// The most recent non-null observation of `series`, with its changes.
pub fn latest_observation(series: &NamedSeries) -> Option<LatestObservation> {
    let (index, point) = series
        .points
        .iter()
        .enumerate()
        .rev()
        .find(|(_, p)| p.value.is_some())?;

    Some(LatestObservation {
        label: point.label.clone(),
        value: point.value?,
        changes: compute_changes(
            &series.points,
            index,
            series.periods_per_year(),
            series.is_percent_type,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Frequency, SeriesPoint};

    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    fn monthly(id: &str, year: i32, start_month: u8, values: &[Option<f64>]) -> NamedSeries {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let m0 = usize::from(start_month - 1) + i;
                let y = year + (m0 / 12) as i32;
                let m = (m0 % 12) as u8 + 1;
                SeriesPoint {
                    key: PeriodKey::month(y, m),
                    label: format!("{} {y}", MONTHS[usize::from(m - 1)]),
                    value: *v,
                }
            })
            .collect();
        NamedSeries {
            id: id.to_string(),
            display_name: id.to_uppercase(),
            unit: None,
            unit_scale: None,
            is_percent_type: false,
            frequency: Frequency::Monthly,
            points,
        }
    }

    #[test]
    fn union_of_overlapping_ranges() {
        let a = monthly("a", 2024, 1, &[Some(1.0), Some(2.0), Some(3.0)]);
        let b = monthly("b", 2024, 2, &[Some(20.0), Some(30.0), Some(40.0)]);

        let rows = align(&[a, b], Some(0), SortOrder::Asc);
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Jan 2024", "Feb 2024", "Mar 2024", "Apr 2024"]);

        assert_eq!(rows[3].values["a"], None);
        assert_eq!(rows[0].values["b"], None);
        assert_eq!(rows[3].values["b"], Some(40.0));
        assert_eq!(rows[3].changes["a"], ChangeSet::default());
    }

    #[test]
    fn row_count_is_distinct_key_count() {
        let a = monthly("a", 2020, 1, &[Some(1.0); 30]);
        let b = monthly("b", 2021, 7, &[Some(1.0); 30]);
        let c = monthly("c", 2019, 6, &[Some(1.0); 3]);

        let mut keys: Vec<&PeriodKey> = [&a, &b, &c]
            .into_iter()
            .flat_map(|s| s.points.iter().map(|p| &p.key))
            .collect();
        keys.sort();
        keys.dedup();

        let rows = align(&[a.clone(), b.clone(), c.clone()], None, SortOrder::Asc);
        assert_eq!(rows.len(), keys.len());
    }

    #[test]
    fn changes_follow_each_series_own_timeline() {
        // `b` skips March entirely; its April change compares against February.
        let a = monthly("a", 2024, 1, &[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        let mut b = monthly("b", 2024, 1, &[Some(10.0), Some(20.0), Some(30.0), Some(40.0)]);
        b.points.remove(2);

        let rows = align(&[a, b], None, SortOrder::Asc);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2].values["b"], None);
        assert_eq!(rows[3].changes["b"].prior_delta, Some(20.0));
        assert_eq!(rows[3].changes["a"].prior_delta, Some(1.0));
    }

    #[test]
    fn cutoff_and_order() {
        let a = monthly("a", 2022, 11, &[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        let rows = align(&[a.clone()], Some(2023), SortOrder::Desc);
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Feb 2023", "Jan 2023"]);

        // Filtering the axis does not change the change-calculation history.
        assert_eq!(rows[1].changes["a"].prior_delta, Some(1.0));
    }

    #[test]
    fn first_series_label_wins() {
        let a = monthly("a", 2024, 1, &[Some(1.0)]);
        let mut b = monthly("b", 2024, 1, &[Some(2.0)]);
        b.points[0].label = "2024-01-01".to_string();

        let rows = align(&[a.clone(), b.clone()], None, SortOrder::Asc);
        assert_eq!(rows[0].label, "Jan 2024");
        let rows = align(&[b, a], None, SortOrder::Asc);
        assert_eq!(rows[0].label, "2024-01-01");
    }

    #[test]
    fn align_is_idempotent() {
        let a = monthly("a", 2023, 1, &[Some(1.0), None, Some(3.0), Some(0.0), Some(2.0)]);
        let b = monthly("b", 2023, 3, &[Some(5.0), Some(6.0)]);
        let input = vec![a, b];
        assert_eq!(
            align(&input, Some(2023), SortOrder::Desc),
            align(&input, Some(2023), SortOrder::Desc)
        );
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(align(&[], None, SortOrder::Asc).is_empty());
        let empty = monthly("a", 2024, 1, &[]);
        assert!(align(&[empty], None, SortOrder::Asc).is_empty());
    }

    #[test]
    fn cutoff_year_window() {
        assert_eq!(cutoff_year(2026, 0), None);
        assert_eq!(cutoff_year(2026, 5), Some(2021));
    }

    #[test]
    fn column_and_latest() {
        let a = monthly("a", 2024, 1, &[Some(100.0), Some(110.0), None]);
        let rows = align(&[a.clone()], None, SortOrder::Asc);
        let col = column(&rows, "a");
        assert_eq!(col[1], ("Feb 2024".to_string(), Some(110.0)));
        assert_eq!(col[2].1, None);
        assert!(column(&rows, "missing").iter().all(|(_, v)| v.is_none()));

        let latest = latest_observation(&a).unwrap();
        assert_eq!(latest.label, "Feb 2024");
        assert_eq!(latest.value, 110.0);
        assert_eq!(latest.changes.prior_delta, Some(10.0));

        let none = monthly("n", 2024, 1, &[None, None]);
        assert!(latest_observation(&none).is_none());
    }

    #[test]
    fn months_and_quarters_keep_separate_rows() {
        let m = monthly("m", 2024, 6, &[Some(1.0), Some(2.0), Some(3.0)]);
        let q = NamedSeries {
            id: "q".to_string(),
            display_name: "Q".to_string(),
            unit: None,
            unit_scale: None,
            is_percent_type: false,
            frequency: Frequency::Quarterly,
            points: vec![
                SeriesPoint {
                    key: PeriodKey::quarter(2024, 2),
                    label: "Q2 2024".to_string(),
                    value: Some(10.0),
                },
                SeriesPoint {
                    key: PeriodKey::quarter(2024, 3),
                    label: "Q3 2024".to_string(),
                    value: Some(11.0),
                },
            ],
        };

        let rows = align(&[m, q], None, SortOrder::Asc);
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        // A quarter sorts on its first month, after that month itself.
        assert_eq!(labels, vec!["Q2 2024", "Jun 2024", "Jul 2024", "Q3 2024", "Aug 2024"]);

        assert_eq!(rows[2].values["m"], Some(2.0));
        assert_eq!(rows[2].values["q"], None);
        assert_eq!(rows[3].values["m"], None);
        assert_eq!(rows[3].values["q"], Some(11.0));
        assert_eq!(rows[3].changes["q"].prior_delta, Some(1.0));
    }
}
