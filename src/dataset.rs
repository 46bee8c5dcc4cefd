//! Rows and datasets as produced by a worksheet parser
//!
//! A [`Row`] maps column names to [`Cell`]s, keeping the column order of the sheet.
//! A [`Dataset`] is the ordered list of rows for one worksheet; the first row's keys
//! define the columns offered to the user.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{cell::Cell, error::Result};

/// One worksheet row: column name to cell, in column order.
pub type Row = IndexMap<String, Cell>;

/// Builds a [`Row`] from `(column, value)` pairs.
///
/// ```rust
/// # use pivotfit::{row, Cell};
/// let r = row! { "cat" => "A", "v" => 10.0 };
/// assert_eq!(r["v"], Cell::Number(10.0));
/// ```
#[macro_export]
macro_rules! row {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut row = $crate::Row::new();
        $( row.insert(($key).to_string(), $crate::Cell::from($value)); )*
        row
    }};
}

/// Looks up a cell, treating a missing column as [`Cell::Absent`].
#[must_use]
pub fn cell<'r>(row: &'r Row, field: &str) -> &'r Cell {
    const ABSENT: &Cell = &Cell::Absent;
    row.get(field).unwrap_or(ABSENT)
}

/// The rows of a single worksheet.
///
/// The dataset is owned by the caller; every aggregation or fit borrows it
/// and returns fresh output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    /// Creates a dataset from already-parsed rows
    #[must_use]
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Parses a JSON array of objects, one object per row.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::Json`] if the text is not an array of objects.
    ///
    /// ```rust
    /// # use pivotfit::Dataset;
    /// let data = Dataset::from_json(r#"[{"cat": "A", "v": 10}, {"cat": "B", "v": null}]"#).unwrap();
    /// assert_eq!(data.len(), 2);
    /// assert_eq!(data.columns(), vec!["cat", "v"]);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the dataset back to a JSON array of objects.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Returns the column names, taken from the first row.
    ///
    /// Later rows may hold `null` for any of these; columns that only appear in later rows are not listed.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|row| row.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns the rows
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if there are no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Row>> for Dataset {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

impl FromIterator<Row> for Dataset {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    #[test]
    fn test_columns_follow_first_row() {
        let data = Dataset::new(vec![
            row! { "b" => 1.0, "a" => "x" },
            row! { "a" => "y", "c" => 3.0 },
        ]);
        assert_eq!(data.columns(), vec!["b", "a"]);
        assert!(Dataset::default().columns().is_empty());
    }

    #[test]
    fn test_missing_cell_is_absent() {
        let r = row! { "a" => 1.0 };
        assert_eq!(cell(&r, "a"), &Cell::Number(1.0));
        assert_eq!(cell(&r, "zzz"), &Cell::Absent);
    }

    #[test]
    fn test_json_keeps_order() {
        let json = r#"[{"z": 1, "a": "2", "m": null}]"#;
        let data = Dataset::from_json(json).unwrap();
        assert_eq!(data.columns(), vec!["z", "a", "m"]);
        assert_eq!(data.to_json().unwrap(), r#"[{"z":1.0,"a":"2","m":null}]"#);
    }

    #[test]
    fn test_bad_json() {
        assert!(Dataset::from_json("{}").is_err());
        assert!(Dataset::from_json("[1, 2]").is_err());
    }
}
