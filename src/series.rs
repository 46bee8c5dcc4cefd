//! Plot-ready series built from aggregated rows
//!
//! This is the last pure step before rendering: every value field becomes one
//! [`PlotSeries`] with numeric `x`/`y` arrays, tick labels, and the optional overlays
//! (data labels, error bars, trendline). Nothing here knows how the chart is drawn.
//!
//! # Layout
//! - Points are placed at `x = 0, 1, 2, ...` in row order, and labelled with the
//!   stringified first group field. With `numeric_x`, the first group field is used
//!   as the x value instead, falling back to the position for cells that do not parse.
//! - The first value field is plotted on the [`Axis::Primary`] axis, every further one
//!   on the [`Axis::Secondary`] axis.
//! - With `swap_axes`, `x` and `y` are exchanged as the final step, so error bars and
//!   tick labels move to the other axis too.
use serde::{Deserialize, Serialize};

use crate::{
    aggregate::AggregatedRow,
    config::PipelineConfig,
    error::Result,
    error_bars::compute_errors,
    trend::TrendResult,
};

/// Chart type the series will be drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Markers only
    #[default]
    Scatter,

    /// Lines and markers
    Line,

    /// Vertical bars
    Bar,

    /// Filled line
    Area,
}

impl ChartKind {
    /// Trendlines are only overlaid on point-based charts
    #[must_use]
    pub fn supports_trendline(&self) -> bool {
        matches!(self, Self::Scatter | Self::Line)
    }
}

/// Value axis a series is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Left axis
    Primary,

    /// Right axis, for a second value field with a different scale
    Secondary,
}

/// One value field, ready to hand to a renderer.
#[derive(Debug)]
pub struct PlotSeries {
    /// Value field name
    pub name: String,

    /// Axis the values belong to
    pub axis: Axis,

    /// Horizontal coordinates, or vertical ones once `swapped`
    pub x: Vec<f64>,

    /// Vertical coordinates, or horizontal ones once `swapped`
    pub y: Vec<f64>,

    /// Tick text for each point, from the first group field
    pub tick_labels: Vec<String>,

    /// Secondary tick text for each point, from the second group field, if any
    pub secondary_labels: Option<Vec<String>>,

    /// Value text for each point, if data labels are enabled
    pub data_labels: Option<Vec<String>>,

    /// Error magnitude for each point, if error bars are enabled
    pub errors: Option<Vec<f64>>,

    /// Fitted trendline, if one was requested for this chart kind.
    ///
    /// A failed fit is kept here so the caller can omit the overlay and still draw the series.
    pub trend: Option<Result<TrendResult>>,

    /// True if x and y were exchanged
    pub swapped: bool,
}

impl PlotSeries {
    /// Number of points
    #[must_use]
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// True if the series has no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// The successfully fitted trendline, if any
    #[must_use]
    pub fn trendline(&self) -> Option<&TrendResult> {
        self.trend.as_ref().and_then(|t| t.as_ref().ok())
    }

    /// Trendline coordinates in the same orientation as the series, as `(x, y)`.
    #[must_use]
    pub fn trend_points(&self) -> Option<(Vec<f64>, Vec<f64>)> {
        let fit = self.trendline()?;
        let fitted = fit.fitted().to_vec();
        if self.swapped {
            Some((fitted, self.y.clone()))
        } else {
            Some((self.x.clone(), fitted))
        }
    }

    /// Exchanges the x and y coordinates.
    fn swap_axes(&mut self) {
        std::mem::swap(&mut self.x, &mut self.y);
        self.swapped = !self.swapped;
    }
}

/// Per-point layout shared by every series.
struct Layout {
    x: Vec<f64>,
    ticks: Vec<String>,
    secondary: Option<Vec<String>>,
    order: Vec<usize>,
}

impl Layout {
    #[allow(clippy::cast_precision_loss)]
    fn new(rows: &[AggregatedRow], config: &PipelineConfig) -> Self {
        let first = config.group_fields.first();
        let ticks = rows
            .iter()
            .enumerate()
            .map(|(i, row)| first.map_or_else(|| i.to_string(), |f| row.get(f).key_string()))
            .collect();
        let secondary = config
            .group_fields
            .get(1)
            .map(|f| rows.iter().map(|row| row.get(f).key_string()).collect());

        let x: Vec<f64> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| match first {
                Some(f) if config.numeric_x => row.get(f).number().unwrap_or(i as f64),
                _ => i as f64,
            })
            .collect();

        let mut order: Vec<usize> = (0..rows.len()).collect();
        if config.sort_by_x {
            order.sort_by(|&a, &b| x[a].total_cmp(&x[b]));
        }

        Self {
            x,
            ticks,
            secondary,
            order,
        }
    }

    fn permute<T: Clone>(&self, values: &[T]) -> Vec<T> {
        self.order.iter().map(|&i| values[i].clone()).collect()
    }
}

/// Builds one [`PlotSeries`] per value field of `config`.
///
/// # Parameters
/// - `rows`: Aggregated rows, in output order.
/// - `config`: Field selection and overlay settings.
///
/// # Returns
/// The series, in value-field order. Trendline failures are logged and kept on the
/// series rather than returned.
#[must_use]
pub fn build_series(rows: &[AggregatedRow], config: &PipelineConfig) -> Vec<PlotSeries> {
    let layout = Layout::new(rows, config);
    let x = layout.permute(&layout.x);
    let tick_labels = layout.permute(&layout.ticks);
    let secondary_labels = layout.secondary.as_ref().map(|s| layout.permute(s));

    config
        .value_fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let values: Vec<f64> = rows
                .iter()
                .map(|row| row.value(field).unwrap_or(0.0))
                .collect();
            let y = layout.permute(&values);

            let data_labels = config.labels.enabled.then(|| {
                let decimals = config.labels.decimals;
                y.iter().map(|v| format!("{v:.decimals$}")).collect()
            });

            let errors = config
                .error_bars
                .is_enabled()
                .then(|| layout.permute(&compute_errors(rows, field, config.error_bars)));

            let trend = if config.chart.supports_trendline() {
                config.trendline.fit(&x, &y, config.solver)
            } else {
                None
            };
            if let Some(Err(e)) = &trend {
                tracing::warn!(series = %field, error = %e, "trendline omitted");
            }

            let mut series = PlotSeries {
                name: field.clone(),
                axis: if i == 0 { Axis::Primary } else { Axis::Secondary },
                x: x.clone(),
                y,
                tick_labels: tick_labels.clone(),
                secondary_labels: secondary_labels.clone(),
                data_labels,
                errors,
                trend,
                swapped: false,
            };

            if config.swap_axes {
                series.swap_axes();
            }
            series
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        aggregate, assert_all_close, assert_close, row, Aggregation, DataLabels, Error, ErrorBar,
        Row, Trendline,
    };

    fn config(group: &[&str], values: &[&str]) -> PipelineConfig {
        PipelineConfig {
            group_fields: group.iter().map(ToString::to_string).collect(),
            value_fields: values.iter().map(ToString::to_string).collect(),
            ..PipelineConfig::default()
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            row! { "year" => 2022.0, "site" => "n", "sales" => 12.0, "cost" => "7" },
            row! { "year" => 2020.0, "site" => "s", "sales" => 10.0, "cost" => 5.0 },
            row! { "year" => "2021", "site" => "n", "sales" => "n/a", "cost" => 6.0 },
        ]
    }

    fn pass_through(rows: &[Row], config: &PipelineConfig) -> Vec<PlotSeries> {
        let out = aggregate(rows, &config.group_fields, &config.value_fields, Aggregation::None);
        build_series(&out, config)
    }

    #[test]
    fn test_positions_and_ticks() {
        let config = config(&["year", "site"], &["sales", "cost"]);
        let series = pass_through(&rows(), &config);

        assert_eq!(series.len(), 2);
        let sales = &series[0];
        assert_eq!(sales.axis, Axis::Primary);
        assert_eq!(sales.x, vec![0.0, 1.0, 2.0]);
        assert_eq!(sales.y, vec![12.0, 10.0, 0.0]);
        assert_eq!(sales.tick_labels, vec!["2022", "2020", "2021"]);
        assert_eq!(
            sales.secondary_labels.as_deref(),
            Some(&["n".to_string(), "s".to_string(), "n".to_string()][..])
        );

        let cost = &series[1];
        assert_eq!(cost.axis, Axis::Secondary);
        assert_eq!(cost.y, vec![7.0, 5.0, 6.0]);
        assert!(cost.trend.is_none());
        assert!(cost.errors.is_none());
    }

    #[test]
    fn test_ticks_without_group_field() {
        let config = config(&[], &["sales"]);
        let series = pass_through(&rows(), &config);
        assert_eq!(series[0].tick_labels, vec!["0", "1", "2"]);
        assert!(series[0].secondary_labels.is_none());
    }

    #[test]
    fn test_numeric_x_sorted() {
        let mut config = config(&["year"], &["sales"]);
        config.numeric_x = true;
        config.sort_by_x = true;
        config.error_bars = ErrorBar::Percent { value: 10.0 };

        let series = pass_through(&rows(), &config);
        let s = &series[0];
        assert_eq!(s.x, vec![2020.0, 2021.0, 2022.0]);
        assert_eq!(s.y, vec![10.0, 0.0, 12.0]);
        assert_eq!(s.tick_labels, vec!["2020", "2021", "2022"]);
        assert_all_close!(s.errors.as_deref().unwrap(), &[1.0, 0.0, 1.2]);
    }

    #[test]
    fn test_data_labels() {
        let mut config = config(&["site"], &["sales"]);
        config.labels = DataLabels {
            enabled: true,
            decimals: 1,
        };
        let series = pass_through(&rows(), &config);
        assert_eq!(
            series[0].data_labels.as_deref(),
            Some(&["12.0".to_string(), "10.0".to_string(), "0.0".to_string()][..])
        );
    }

    #[test]
    fn test_trend_only_for_point_charts() {
        let data: Vec<Row> = (0..5)
            .map(|i| row! { "v" => 2.0 * f64::from(i) + 3.0 })
            .collect();
        let mut config = config(&[], &["v"]);
        config.trendline = Trendline::Linear;

        for chart in [ChartKind::Scatter, ChartKind::Line] {
            config.chart = chart;
            let series = pass_through(&data, &config);
            let fit = series[0].trendline().unwrap();
            assert_close!(fit.slope(), 2.0);
            assert_close!(fit.intercept(), 3.0);
        }

        for chart in [ChartKind::Bar, ChartKind::Area] {
            config.chart = chart;
            let series = pass_through(&data, &config);
            assert!(series[0].trend.is_none());
        }
    }

    #[test]
    fn test_failed_trend_is_kept() {
        let data = vec![row! { "v" => 1.0 }];
        let mut config = config(&[], &["v"]);
        config.trendline = Trendline::Poly { degree: 2 };

        let series = pass_through(&data, &config);
        assert_eq!(series[0].y, vec![1.0]);
        assert!(matches!(
            series[0].trend,
            Some(Err(Error::InsufficientData { n: 1 }))
        ));
        assert!(series[0].trend_points().is_none());
    }

    #[test]
    fn test_swap_axes() {
        let data: Vec<Row> = (0..4).map(|i| row! { "v" => f64::from(i * i) }).collect();
        let mut config = config(&[], &["v"]);
        config.trendline = Trendline::Linear;
        config.swap_axes = true;

        let series = pass_through(&data, &config);
        let s = &series[0];
        assert!(s.swapped);
        assert_eq!(s.x, vec![0.0, 1.0, 4.0, 9.0]);
        assert_eq!(s.y, vec![0.0, 1.0, 2.0, 3.0]);

        let (tx, ty) = s.trend_points().unwrap();
        assert_eq!(ty, s.y);
        assert_eq!(tx.len(), 4);
    }

    #[test]
    fn test_empty_rows() {
        let config = config(&["k"], &["v"]);
        let series = build_series(&[], &config);
        assert_eq!(series.len(), 1);
        assert!(series[0].is_empty());
    }
}
