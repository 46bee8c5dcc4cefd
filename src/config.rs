//! Pipeline configuration
//!
//! Every choice the pipeline makes is carried by one immutable [`PipelineConfig`],
//! which round-trips through JSON so a chart setup can be saved and loaded again.
//!
//! ```rust
//! use pivotfit::{Aggregation, PipelineConfig, Trendline};
//!
//! let config = PipelineConfig::from_json(r#"{
//!     "group_fields": ["region"],
//!     "value_fields": ["sales"],
//!     "aggregation": "mean",
//!     "trendline": { "type": "poly", "degree": 2 }
//! }"#).unwrap();
//!
//! assert_eq!(config.aggregation, Aggregation::Mean);
//! assert_eq!(config.trendline, Trendline::Poly { degree: 2 });
//! assert_eq!(config.labels.decimals, 2);
//! ```
use serde::{Deserialize, Serialize};

use crate::{
    aggregate::Aggregation,
    error::{Error, Result},
    error_bars::ErrorBar,
    series::ChartKind,
    trend::{PolynomialSolver, Trendline},
};

/// Value text drawn next to each point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataLabels {
    /// Whether labels are produced at all
    pub enabled: bool,

    /// Digits after the decimal point
    pub decimals: usize,
}

impl Default for DataLabels {
    fn default() -> Self {
        Self {
            enabled: false,
            decimals: 2,
        }
    }
}

/// Field selection and chart options for one pipeline run.
///
/// Missing JSON keys take their [`Default`] values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Fields whose values form the group key; also the x axis ticks
    pub group_fields: Vec<String>,

    /// Fields to reduce and plot, one series each
    pub value_fields: Vec<String>,

    /// Reduction applied to the value fields
    pub aggregation: Aggregation,

    /// How the series will be drawn
    pub chart: ChartKind,

    /// Trendline overlay
    pub trendline: Trendline,

    /// Solver for polynomial trendlines
    pub solver: PolynomialSolver,

    /// Error-bar overlay
    pub error_bars: ErrorBar,

    /// Data labels
    pub labels: DataLabels,

    /// Use the first group field as a numeric x coordinate instead of the row position
    pub numeric_x: bool,

    /// Sort points by x before plotting
    pub sort_by_x: bool,

    /// Exchange x and y in the output series
    pub swap_axes: bool,
}

impl PipelineConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    /// Returns [`Error::Json`] if the text is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the configuration as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that the configuration can drive a pipeline run.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if there are no value fields, or a polynomial
    /// trendline has degree 0.
    pub fn validate(&self) -> Result<()> {
        if self.value_fields.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one value field is required".to_string(),
            ));
        }

        if self.trendline == (Trendline::Poly { degree: 0 }) {
            return Err(Error::InvalidConfig(
                "polynomial trendline degree must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.chart, ChartKind::Scatter);
        assert_eq!(config.aggregation, Aggregation::None);
        assert_eq!(config.trendline, Trendline::None);
        assert_eq!(config.solver, PolynomialSolver::NormalEquations);
        assert_eq!(config.error_bars, ErrorBar::None);
        assert_eq!(config.labels, DataLabels::default());
        assert!(!config.swap_axes);

        assert_eq!(PipelineConfig::from_json("{}").unwrap(), config);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = PipelineConfig {
            group_fields: vec!["region".into(), "year".into()],
            value_fields: vec!["sales".into()],
            aggregation: Aggregation::Sum,
            chart: ChartKind::Line,
            trendline: Trendline::Linear,
            solver: PolynomialSolver::Qr,
            error_bars: ErrorBar::Percent { value: 5.0 },
            labels: DataLabels {
                enabled: true,
                decimals: 0,
            },
            numeric_x: true,
            sort_by_x: true,
            swap_axes: true,
        };

        let json = config.to_json().unwrap();
        assert!(json.contains(r#""solver": "qr""#));
        assert_eq!(PipelineConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            PipelineConfig::from_json(r#"{"aggregation": "median"}"#),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            PipelineConfig::from_json("[1, 2"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_validate() {
        let mut config = PipelineConfig::default();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        config.value_fields.push("v".into());
        assert!(config.validate().is_ok());

        config.trendline = Trendline::Poly { degree: 0 };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        config.trendline = Trendline::Poly { degree: 3 };
        assert!(config.validate().is_ok());
    }
}
