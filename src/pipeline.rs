//! End-to-end pipeline: aggregate, then build plot series
//!
//! A [`Pipeline`] is a validated [`PipelineConfig`]. It holds no other state, so one
//! pipeline can be run against any number of datasets, from any number of threads.
//!
//! ```rust
//! use pivotfit::{row, Aggregation, Dataset, Pipeline, PipelineConfig, Trendline};
//!
//! let data = Dataset::new(vec![
//!     row! { "month" => "Jan", "sales" => 10.0 },
//!     row! { "month" => "Jan", "sales" => 14.0 },
//!     row! { "month" => "Feb", "sales" => 15.0 },
//!     row! { "month" => "Mar", "sales" => 20.0 },
//! ]);
//!
//! let pipeline = Pipeline::new(PipelineConfig {
//!     group_fields: vec!["month".into()],
//!     value_fields: vec!["sales".into()],
//!     aggregation: Aggregation::Mean,
//!     trendline: Trendline::Linear,
//!     ..PipelineConfig::default()
//! }).unwrap();
//!
//! let output = pipeline.run(&data);
//! assert_eq!(output.rows.len(), 3);
//!
//! let sales = &output.series[0];
//! assert_eq!(sales.y, vec![12.0, 15.0, 20.0]);
//! assert_eq!(sales.tick_labels, vec!["Jan", "Feb", "Mar"]);
//! assert_eq!(sales.trendline().unwrap().equation(3), "y = 4.000x + 11.667");
//! ```
use crate::{
    aggregate::{aggregate, AggregatedRow},
    config::PipelineConfig,
    dataset::Dataset,
    error::Result,
    series::{build_series, PlotSeries},
};

/// Result of one pipeline run.
#[derive(Debug)]
pub struct PipelineOutput {
    /// Aggregated rows, in first-seen group order
    pub rows: Vec<AggregatedRow>,

    /// One series per value field
    pub series: Vec<PlotSeries>,
}

/// A validated, reusable pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline from a configuration.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidConfig`] if the configuration fails [`PipelineConfig::validate`].
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Creates a pipeline from a JSON configuration.
    ///
    /// # Errors
    /// Returns [`crate::Error::Json`] if the JSON is malformed, or [`crate::Error::InvalidConfig`]
    /// if the configuration is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(PipelineConfig::from_json(json)?)
    }

    /// Returns the configuration
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the pipeline over one dataset.
    ///
    /// Fields named in the configuration but missing from the data are read as empty cells.
    /// A trendline that cannot be fitted is reported on its series and does not fail the run.
    #[must_use]
    pub fn run(&self, dataset: &Dataset) -> PipelineOutput {
        let config = &self.config;
        let _span = tracing::debug_span!(
            "pipeline",
            rows = dataset.len(),
            aggregation = %config.aggregation,
        )
        .entered();

        let rows = aggregate(
            dataset.rows(),
            &config.group_fields,
            &config.value_fields,
            config.aggregation,
        );
        let series = build_series(&rows, config);

        tracing::debug!(
            points = rows.len(),
            series = series.len(),
            "pipeline finished"
        );
        PipelineOutput { rows, series }
    }

    /// Runs the pipeline over several independent datasets, in parallel.
    #[cfg(feature = "parallel")]
    #[must_use]
    pub fn run_many(&self, datasets: &[Dataset]) -> Vec<PipelineOutput> {
        use rayon::prelude::*;
        datasets.par_iter().map(|d| self.run(d)).collect()
    }

    /// Runs the pipeline over several independent datasets.
    #[cfg(not(feature = "parallel"))]
    #[must_use]
    pub fn run_many(&self, datasets: &[Dataset]) -> Vec<PipelineOutput> {
        datasets.iter().map(|d| self.run(d)).collect()
    }
}
