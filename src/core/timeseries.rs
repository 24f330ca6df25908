use crate::models::IndicatorSeries;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// How rows from several series are matched by date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinMethod {
    /// Only dates present in every series.
    Inner,
    /// Dates of the first series; other series matched exactly, missing as `None`.
    Left,
}

/// One row of a multi-series alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

impl AlignedRow {
    /// Every column, or `None` if any column is a gap.
    pub fn complete(&self) -> Option<Vec<f64>> {
        self.values.iter().copied().collect()
    }
}

/// Aligns two series by date. Returns `(date, value_a, value_b)` rows.
pub fn align_series(
    series_a: &IndicatorSeries,
    series_b: &IndicatorSeries,
    method: JoinMethod,
) -> Vec<(NaiveDate, Option<f64>, Option<f64>)> {
    align_series_multi(&[series_a, series_b], method)
        .into_iter()
        .map(|row| (row.date, row.values[0], row.values[1]))
        .collect()
}

/// Aligns any number of series by date.
///
/// Duplicate dates inside one series resolve to the last row for that date.
pub fn align_series_multi(series_list: &[&IndicatorSeries], method: JoinMethod) -> Vec<AlignedRow> {
    if series_list.is_empty() {
        return Vec::new();
    }

    // 1. Date -> value maps for lookup
    let maps: Vec<BTreeMap<NaiveDate, Option<f64>>> = series_list
        .iter()
        .map(|s| s.points().iter().map(|p| (p.date, p.value)).collect())
        .collect();

    match method {
        JoinMethod::Inner => {
            let mut dates: BTreeSet<NaiveDate> = maps[0].keys().copied().collect();
            for map in &maps[1..] {
                dates.retain(|d| map.contains_key(d));
            }
            dates
                .into_iter()
                .map(|date| AlignedRow {
                    date,
                    values: maps.iter().map(|m| m.get(&date).copied().flatten()).collect(),
                })
                .collect()
        }
        JoinMethod::Left => maps[0]
            .keys()
            .map(|&date| AlignedRow {
                date,
                values: maps.iter().map(|m| m.get(&date).copied().flatten()).collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Observation;

    fn d(month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, 1).unwrap()
    }

    fn series(slug: &str, points: &[(u32, Option<f64>)]) -> IndicatorSeries {
        IndicatorSeries::new(
            slug,
            points.iter().map(|(m, v)| Observation::new(d(*m), *v)).collect(),
        )
    }

    #[test]
    fn test_inner_join_keeps_shared_dates() {
        let a = series("a", &[(1, Some(1.0)), (2, Some(2.0)), (3, Some(3.0))]);
        let b = series("b", &[(2, Some(20.0)), (3, None), (4, Some(40.0))]);

        let rows = align_series(&a, &b, JoinMethod::Inner);
        assert_eq!(rows, vec![(d(2), Some(2.0), Some(20.0)), (d(3), Some(3.0), None)]);
    }

    #[test]
    fn test_left_join_keeps_master_dates() {
        let a = series("a", &[(1, Some(1.0)), (2, Some(2.0))]);
        let b = series("b", &[(2, Some(20.0))]);

        let rows = align_series(&a, &b, JoinMethod::Left);
        assert_eq!(rows, vec![(d(1), Some(1.0), None), (d(2), Some(2.0), Some(20.0))]);
    }

    #[test]
    fn test_complete_row() {
        let row = AlignedRow { date: d(1), values: vec![Some(1.0), None] };
        assert_eq!(row.complete(), None);
        let row = AlignedRow { date: d(1), values: vec![Some(1.0), Some(2.0)] };
        assert_eq!(row.complete(), Some(vec![1.0, 2.0]));
    }
}
