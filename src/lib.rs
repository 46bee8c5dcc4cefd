//! # Pivotfit
//! ## Spreadsheet rows in, chart series out
//!
//! Every chart built from a worksheet goes through the same few steps: pick a column or two
//! to group by, reduce the numbers in each group, and hand the result to a plotting library,
//! maybe with a trendline or some error bars on top. This crate is those steps, without the plotting.
//!
//! - [`aggregate()`] groups rows by the string form of one or more fields and reduces each value
//!   field with `sum`, `mean`, `count`, `min` or `max`, keeping groups in first-seen order.
//! - [`trend`] fits least-squares lines and polynomials, with R² and a readable equation.
//! - [`error_bars`] turns the samples retained for each group into error magnitudes.
//! - [`Pipeline`] runs all of the above from one [`PipelineConfig`] and returns plot-ready [`PlotSeries`].
//!
//! ```rust
//! use pivotfit::{Dataset, Pipeline};
//!
//! let data = Dataset::from_json(r#"[
//!     {"region": "North", "sales": 120},
//!     {"region": "South", "sales": "95"},
//!     {"region": "North", "sales": 80}
//! ]"#).unwrap();
//!
//! let pipeline = Pipeline::from_json(r#"{
//!     "group_fields": ["region"],
//!     "value_fields": ["sales"],
//!     "aggregation": "sum",
//!     "error_bars": { "type": "stdev" }
//! }"#).unwrap();
//!
//! let output = pipeline.run(&data);
//! let sales = &output.series[0];
//! assert_eq!(sales.tick_labels, vec!["North", "South"]);
//! assert_eq!(sales.y, vec![200.0, 95.0]);
//! assert_eq!(sales.errors.as_deref().unwrap()[1], 0.0);
//! ```
//!
//! # Core Concepts
//! - A [`Cell`] is a loosely typed spreadsheet value: a number, some text, or nothing.
//!     - Text is read as a number by its longest numeric prefix, so `"12kg"` is `12`.
//!     - Cells that are not numbers at all are skipped when summing, but their rows still count.
//! - A group key is the string form of the grouping cells, so the number `10` and the text `"10"`
//!   land in the same group.
//! - Trendlines are fitted against the point positions `0, 1, 2, ...`, or against the first group
//!   field when it is numeric and `numeric_x` is set.
//!
//! # Implementation Details
//!
//! Trendlines are solved with `nalgebra`, through the normal equations by default or an opt-in QR
//! decomposition for better conditioned results. Diagnostics are emitted through `tracing`;
//! the crate never installs a subscriber itself.
//!
//! # Testing utilities
//!
//! Assertion macros for comparing floating-point results are exported from [`test`].
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod test;

pub mod aggregate;
pub mod cell;
pub mod config;
pub mod dataset;
pub mod display;
pub mod error;
pub mod error_bars;
pub mod pipeline;
pub mod series;
pub mod statistics;
pub mod trend;
pub mod value;

pub use nalgebra;

pub use aggregate::{aggregate, AggregatedRow, Aggregation, GroupKey};
pub use cell::Cell;
pub use config::{DataLabels, PipelineConfig};
pub use dataset::{Dataset, Row};
pub use error::{Error, Result};
pub use error_bars::{compute_errors, ErrorBar};
pub use pipeline::{Pipeline, PipelineOutput};
pub use series::{build_series, Axis, ChartKind, PlotSeries};
pub use trend::{fit_linear, fit_polynomial, PolynomialSolver, TrendResult, Trendline};
