//! Group-by aggregation of worksheet rows
//!
//! Rows are grouped by the string form of one or more grouping fields, and each value
//! field is reduced per group with an [`Aggregation`].
//!
//! # Ordering
//! Groups are emitted in the order their key was first seen in the input, never sorted.
//! Re-running an aggregation on the same rows always yields the same row order.
//!
//! # Malformed cells
//! A value cell that does not parse as a number is skipped: it adds nothing to the sum
//! and no sample, but the row is still counted in its group.
//! This means `mean` divides by the number of rows in the group, not the number of
//! numeric cells, so a group with unparsable cells reports a lower mean than its
//! numeric cells alone would give.
//!
//! ```rust
//! use pivotfit::{aggregate, row, Aggregation, Cell};
//!
//! let rows = vec![
//!     row! { "cat" => "A", "v" => 10.0 },
//!     row! { "cat" => "A", "v" => 20.0 },
//!     row! { "cat" => "B", "v" => 5.0 },
//! ];
//!
//! let out = aggregate(&rows, &["cat"], &["v"], Aggregation::Mean);
//! assert_eq!(out.len(), 2);
//! assert_eq!(out[0].get("cat"), &Cell::from("A"));
//! assert_eq!(out[0].value("v"), Some(15.0));
//! assert_eq!(out[1].value("v"), Some(5.0));
//! ```
use std::{fmt::Display, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    cell::Cell,
    dataset::{cell, Row},
    error::Error,
};

/// Separator placed between the stringified grouping values of a [`GroupKey`]
pub const KEY_SEPARATOR: &str = "||";

/// Reduction applied to a value field within each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// No grouping; rows pass through unchanged
    #[default]
    None,

    /// Sum of the numeric cells
    Sum,

    /// Sum of the numeric cells divided by the number of rows in the group
    Mean,

    /// Number of rows in the group
    Count,

    /// Smallest numeric cell, or 0 if there is none
    Min,

    /// Largest numeric cell, or 0 if there is none
    Max,
}

impl Aggregation {
    /// All supported modes, in the order a picker would list them
    pub const ALL: [Aggregation; 6] = [
        Aggregation::None,
        Aggregation::Sum,
        Aggregation::Mean,
        Aggregation::Count,
        Aggregation::Min,
        Aggregation::Max,
    ];

    /// Returns the configuration name of this mode
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Aggregation::None => "none",
            Aggregation::Sum => "sum",
            Aggregation::Mean => "mean",
            Aggregation::Count => "count",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
        }
    }
}

impl Display for Aggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Aggregation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| Error::UnknownOption {
                kind: "aggregation",
                value: s.to_string(),
            })
    }
}

/// Composite grouping key: the grouping values of a row, stringified and joined with [`KEY_SEPARATOR`].
///
/// Two rows share a group iff every grouping value has the same string form,
/// so the number `10` and the text `"10"` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(String);

impl GroupKey {
    /// Builds the key of `row` over `fields`. Missing fields count as `null`.
    pub fn new<S: AsRef<str>>(row: &Row, fields: &[S]) -> Self {
        let parts: Vec<String> = fields
            .iter()
            .map(|f| cell(row, f.as_ref()).key_string())
            .collect();
        Self(parts.join(KEY_SEPARATOR))
    }

    /// Returns the joined key
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Running totals for one group, built up while rows stream in.
#[derive(Debug, Clone)]
pub struct GroupAccumulator {
    keys: Vec<Cell>,
    count: usize,
    sums: Vec<f64>,
    samples: Vec<Vec<f64>>,
}

impl GroupAccumulator {
    /// Starts a group, taking the representative key values from its first row.
    fn new<S: AsRef<str>>(row: &Row, group_fields: &[S], n_values: usize) -> Self {
        Self {
            keys: group_fields
                .iter()
                .map(|f| cell(row, f.as_ref()).clone())
                .collect(),
            count: 0,
            sums: vec![0.0; n_values],
            samples: vec![Vec::new(); n_values],
        }
    }

    /// Adds one member row.
    fn push<S: AsRef<str>>(&mut self, row: &Row, value_fields: &[S]) {
        self.count += 1;
        for (i, field) in value_fields.iter().enumerate() {
            if let Some(v) = cell(row, field.as_ref()).number() {
                self.sums[i] += v;
                self.samples[i].push(v);
            }
        }
    }

    /// Number of member rows
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Reduces value field `i` with `mode`.
    #[allow(clippy::cast_precision_loss)]
    fn reduce(&self, i: usize, mode: Aggregation) -> f64 {
        let samples = &self.samples[i];
        match mode {
            Aggregation::Count => self.count as f64,
            Aggregation::Mean => self.sums[i] / self.count as f64,
            Aggregation::Min => samples.iter().copied().reduce(f64::min).unwrap_or(0.0),
            Aggregation::Max => samples.iter().copied().reduce(f64::max).unwrap_or(0.0),
            Aggregation::Sum | Aggregation::None => self.sums[i],
        }
    }

    /// Finalizes the group into its output row.
    fn finish<S: AsRef<str>>(
        self,
        group_fields: &[S],
        value_fields: &[S],
        mode: Aggregation,
    ) -> AggregatedRow {
        let mut row = Row::with_capacity(group_fields.len() + value_fields.len());
        for (field, key) in group_fields.iter().zip(&self.keys) {
            row.insert(field.as_ref().to_string(), key.clone());
        }

        let mut samples = IndexMap::with_capacity(value_fields.len());
        for (i, field) in value_fields.iter().enumerate() {
            row.insert(field.as_ref().to_string(), Cell::Number(self.reduce(i, mode)));
            samples.insert(field.as_ref().to_string(), self.samples[i].clone());
        }

        AggregatedRow {
            row,
            count: self.count,
            samples,
        }
    }
}

/// One output row: the grouping values, the reduced value fields, and the raw samples
/// kept for error bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRow {
    row: Row,
    count: usize,
    samples: IndexMap<String, Vec<f64>>,
}

impl AggregatedRow {
    /// Wraps an input row unchanged, for pass-through aggregation.
    fn single<S: AsRef<str>>(row: &Row, value_fields: &[S]) -> Self {
        let samples = value_fields
            .iter()
            .map(|f| {
                let f = f.as_ref();
                (f.to_string(), cell(row, f).number().into_iter().collect())
            })
            .collect();

        Self {
            row: row.clone(),
            count: 1,
            samples,
        }
    }

    /// Returns the output row, grouping fields first
    #[must_use]
    pub fn row(&self) -> &Row {
        &self.row
    }

    /// Consumes this and returns the output row
    #[must_use]
    pub fn into_row(self) -> Row {
        self.row
    }

    /// Returns a cell of the output row; missing fields are [`Cell::Absent`]
    #[must_use]
    pub fn get(&self, field: &str) -> &Cell {
        cell(&self.row, field)
    }

    /// Returns a field of the output row as a number
    #[must_use]
    pub fn value(&self, field: &str) -> Option<f64> {
        self.get(field).number()
    }

    /// Number of input rows folded into this one
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Numeric samples retained for a value field, in input order
    #[must_use]
    pub fn samples(&self, field: &str) -> &[f64] {
        self.samples.get(field).map_or(&[], Vec::as_slice)
    }
}

/// Groups `rows` by `group_fields` and reduces each of `value_fields` with `mode`.
///
/// If `group_fields` is empty or `mode` is [`Aggregation::None`], every row passes
/// through unchanged, wrapped as an [`AggregatedRow`] with a count of 1.
///
/// # Parameters
/// - `rows`: Input rows, in sheet order.
/// - `group_fields`: Fields whose stringified values form the group key.
/// - `value_fields`: Fields to reduce.
/// - `mode`: Reduction to apply.
///
/// # Returns
/// One row per distinct key, in first-seen order. Empty input gives empty output.
pub fn aggregate<S: AsRef<str>>(
    rows: &[Row],
    group_fields: &[S],
    value_fields: &[S],
    mode: Aggregation,
) -> Vec<AggregatedRow> {
    if group_fields.is_empty() || mode == Aggregation::None {
        tracing::debug!(rows = rows.len(), %mode, "passing rows through without grouping");
        return rows
            .iter()
            .map(|row| AggregatedRow::single(row, value_fields))
            .collect();
    }

    let mut groups: IndexMap<GroupKey, GroupAccumulator> = IndexMap::new();
    for row in rows {
        groups
            .entry(GroupKey::new(row, group_fields))
            .or_insert_with(|| GroupAccumulator::new(row, group_fields, value_fields.len()))
            .push(row, value_fields);
    }

    tracing::debug!(rows = rows.len(), groups = groups.len(), %mode, "aggregated rows");
    groups
        .into_values()
        .map(|group| group.finish(group_fields, value_fields, mode))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{assert_close, row};

    fn sales() -> Vec<Row> {
        vec![
            row! { "region" => "N", "year" => 2020.0, "v" => 1.0, "w" => 10.0 },
            row! { "region" => "S", "year" => 2020.0, "v" => 2.0, "w" => 20.0 },
            row! { "region" => "N", "year" => 2021.0, "v" => 3.0, "w" => "n/a" },
            row! { "region" => "N", "year" => "2020", "v" => 4.0, "w" => 40.0 },
            row! { "region" => "S", "year" => 2020.0, "v" => 5.0, "w" => 50.0 },
        ]
    }

    #[test]
    fn test_mean_groups_in_first_seen_order() {
        let rows = vec![
            row! { "cat" => "A", "v" => 10.0 },
            row! { "cat" => "A", "v" => 20.0 },
            row! { "cat" => "B", "v" => 5.0 },
        ];
        let out = aggregate(&rows, &["cat"], &["v"], Aggregation::Mean);
        let rows: Vec<Row> = out.into_iter().map(AggregatedRow::into_row).collect();
        assert_eq!(
            rows,
            vec![row! { "cat" => "A", "v" => 15.0 }, row! { "cat" => "B", "v" => 5.0 }]
        );
    }

    #[test]
    fn test_non_numeric_cell_underweights_mean() {
        let rows = vec![
            row! { "cat" => "A", "v" => 10.0 },
            row! { "cat" => "A", "v" => "abc" },
        ];

        let sum = aggregate(&rows, &["cat"], &["v"], Aggregation::Sum);
        let count = aggregate(&rows, &["cat"], &["v"], Aggregation::Count);
        let mean = aggregate(&rows, &["cat"], &["v"], Aggregation::Mean);

        assert_eq!(count[0].value("v"), Some(2.0));
        assert_eq!(sum[0].value("v"), Some(10.0));
        // Divides by both rows, not just the numeric one
        assert_eq!(mean[0].value("v"), Some(5.0));
        assert_eq!(mean[0].count(), 2);
        assert_eq!(mean[0].samples("v"), &[10.0]);
    }

    #[test]
    fn test_composite_key_and_loose_equality() {
        let out = aggregate(&sales(), &["region", "year"], &["v"], Aggregation::Sum);

        // 2020.0 and "2020" share a key
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].get("region"), &Cell::from("N"));
        assert_eq!(out[0].get("year"), &Cell::Number(2020.0));
        assert_eq!(out[0].value("v"), Some(5.0));
        assert_eq!(out[0].count(), 2);
        assert_eq!(out[1].value("v"), Some(7.0));
        assert_eq!(out[2].value("v"), Some(3.0));
    }

    #[test]
    fn test_group_count_matches_distinct_keys() {
        let rows = sales();
        let fields = ["region", "year"];
        let distinct: HashSet<GroupKey> = rows.iter().map(|r| GroupKey::new(r, &fields)).collect();

        let out = aggregate(&rows, &fields, &["v"], Aggregation::Count);
        assert_eq!(out.len(), distinct.len());
        assert_eq!(out.iter().map(AggregatedRow::count).sum::<usize>(), rows.len());
    }

    #[test]
    fn test_order_is_first_seen_and_stable() {
        let rows = vec![
            row! { "k" => "z", "v" => 1.0 },
            row! { "k" => "a", "v" => 1.0 },
            row! { "k" => "m", "v" => 1.0 },
            row! { "k" => "a", "v" => 1.0 },
        ];
        let first = aggregate(&rows, &["k"], &["v"], Aggregation::Sum);
        let keys: Vec<String> = first.iter().map(|r| r.get("k").key_string()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);

        let second = aggregate(&rows, &["k"], &["v"], Aggregation::Sum);
        assert_eq!(first, second);
    }

    #[test]
    fn test_mean_is_sum_over_count() {
        let rows = sales();
        let sum = aggregate(&rows, &["region"], &["v"], Aggregation::Sum);
        let count = aggregate(&rows, &["region"], &["v"], Aggregation::Count);
        let mean = aggregate(&rows, &["region"], &["v"], Aggregation::Mean);

        for ((s, c), m) in sum.iter().zip(&count).zip(&mean) {
            let expected = s.value("v").unwrap() / c.value("v").unwrap();
            assert_close!(m.value("v").unwrap(), expected);
        }
    }

    #[test]
    fn test_min_max_and_multiple_value_fields() {
        let rows = sales();
        let min = aggregate(&rows, &["region"], &["v", "w"], Aggregation::Min);
        let max = aggregate(&rows, &["region"], &["v", "w"], Aggregation::Max);

        assert_eq!(min[0].value("v"), Some(1.0));
        assert_eq!(max[0].value("v"), Some(4.0));
        assert_eq!(min[0].value("w"), Some(10.0));
        assert_eq!(max[1].value("w"), Some(50.0));
        assert_eq!(min[0].samples("w"), &[10.0, 40.0]);

        let columns: Vec<&String> = min[0].row().keys().collect();
        assert_eq!(columns, vec!["region", "v", "w"]);
    }

    #[test]
    fn test_min_max_without_samples_is_zero() {
        let rows = vec![row! { "k" => "a", "v" => "x" }, row! { "k" => "a" }];
        let min = aggregate(&rows, &["k"], &["v"], Aggregation::Min);
        let max = aggregate(&rows, &["k"], &["v"], Aggregation::Max);
        let mean = aggregate(&rows, &["k"], &["v"], Aggregation::Mean);
        assert_eq!(min[0].value("v"), Some(0.0));
        assert_eq!(max[0].value("v"), Some(0.0));
        assert_eq!(mean[0].value("v"), Some(0.0));
    }

    #[test]
    fn test_missing_group_field_groups_as_null() {
        let rows = vec![row! { "v" => 1.0 }, row! { "k" => None::<f64>, "v" => 2.0 }];
        let out = aggregate(&rows, &["k"], &["v"], Aggregation::Sum);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get("k"), &Cell::Absent);
        assert_eq!(out[0].value("v"), Some(3.0));
    }

    #[test]
    fn test_pass_through() {
        let rows = sales();
        let none = aggregate(&rows, &["region"], &["v"], Aggregation::None);
        let ungrouped: Vec<AggregatedRow> =
            aggregate(&rows, &[] as &[&str], &["v"], Aggregation::Sum);

        for out in [none, ungrouped] {
            assert_eq!(out.len(), rows.len());
            for (a, r) in out.iter().zip(&rows) {
                assert_eq!(a.row(), r);
                assert_eq!(a.count(), 1);
            }
        }

        let out = aggregate(&rows, &["region"], &["w"], Aggregation::None);
        assert_eq!(out[0].samples("w"), &[10.0]);
        assert!(out[2].samples("w").is_empty());
    }

    #[test]
    fn test_empty_input() {
        let out = aggregate(&[], &["k"], &["v"], Aggregation::Sum);
        assert!(out.is_empty());
    }

    #[test]
    fn test_parse_aggregation() {
        for mode in Aggregation::ALL {
            assert_eq!(mode.to_string().parse::<Aggregation>().unwrap(), mode);
        }
        assert!(matches!(
            "median".parse::<Aggregation>(),
            Err(Error::UnknownOption { kind: "aggregation", .. })
        ));
    }
}
