use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::core::services::DailyProfitSeries;
use crate::currency::CurrencyFormatter;

const DEFAULT_HEIGHT: usize = 8;
const POINT: char = '●';

#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub border_color: String,
    pub background_color: String,
    pub fill: bool,
    pub tension: f64,
    pub point_radius: u8,
    pub point_hover_radius: u8,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            border_color: "#84cc16".into(),
            background_color: "rgba(132,204,22,0.3)".into(),
            fill: true,
            tension: 0.3,
            point_radius: 5,
            point_hover_radius: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub style: ChartStyle,
}

/// Line chart description handed to a [`ChartBackend`]. Tooltip and axis
/// text come from the same currency formatter as the summary cards.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
    formatter: CurrencyFormatter,
}

impl ChartSpec {
    pub fn profit_line(series: &DailyProfitSeries, formatter: CurrencyFormatter) -> Self {
        Self {
            labels: series.labels(),
            datasets: vec![ChartDataset {
                label: "Profit".into(),
                data: series.profits.clone(),
                style: ChartStyle::default(),
            }],
            formatter,
        }
    }

    /// Values of the first dataset.
    pub fn data(&self) -> &[f64] {
        self.datasets
            .first()
            .map(|dataset| dataset.data.as_slice())
            .unwrap_or(&[])
    }

    pub fn tooltip(&self, index: usize) -> Option<String> {
        let label = self.labels.get(index)?;
        let value = self.data().get(index)?;
        Some(format!(
            "Date: {} | Profit: {}",
            label,
            self.formatter.format(*value)
        ))
    }

    pub fn axis_label(&self, value: f64) -> String {
        self.formatter.format(value)
    }
}

/// A drawn chart. Must be destroyed before a replacement is drawn.
pub trait ChartInstance {
    fn spec(&self) -> &ChartSpec;
    fn render(&self) -> String;
    fn destroy(&mut self);
    fn is_live(&self) -> bool;
}

pub trait ChartBackend {
    fn create(&mut self, spec: ChartSpec) -> Box<dyn ChartInstance>;
    /// Instances created and not yet destroyed.
    fn live_instances(&self) -> usize;
}

/// Draws charts as fixed-height text plots.
#[derive(Debug)]
pub struct TextChartBackend {
    live: Arc<AtomicUsize>,
    height: usize,
}

impl Default for TextChartBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TextChartBackend {
    pub fn new() -> Self {
        Self::with_height(DEFAULT_HEIGHT)
    }

    pub fn with_height(height: usize) -> Self {
        Self {
            live: Arc::new(AtomicUsize::new(0)),
            height: height.max(2),
        }
    }
}

impl ChartBackend for TextChartBackend {
    fn create(&mut self, spec: ChartSpec) -> Box<dyn ChartInstance> {
        self.live.fetch_add(1, Ordering::SeqCst);
        Box::new(TextChart {
            spec,
            height: self.height,
            live: Arc::clone(&self.live),
            destroyed: false,
        })
    }

    fn live_instances(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

pub struct TextChart {
    spec: ChartSpec,
    height: usize,
    live: Arc<AtomicUsize>,
    destroyed: bool,
}

impl TextChart {
    fn bounds(data: &[f64]) -> (f64, f64) {
        let min = data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if (max - min).abs() < f64::EPSILON {
            (min - 1.0, max + 1.0)
        } else {
            (min, max)
        }
    }

    fn row_of(&self, value: f64, min: f64, max: f64) -> usize {
        let steps = (self.height - 1) as f64;
        (((max - value) / (max - min)) * steps).round() as usize
    }
}

impl ChartInstance for TextChart {
    fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    fn render(&self) -> String {
        let data = self.spec.data();
        if data.is_empty() {
            return "Profit: no data for the selected period".into();
        }

        let (min, max) = Self::bounds(data);
        let top = self.spec.axis_label(max);
        let bottom = self.spec.axis_label(min);
        let gutter = top.chars().count().max(bottom.chars().count());

        let mut grid = vec![vec![' '; data.len() * 2]; self.height];
        for (idx, value) in data.iter().enumerate() {
            grid[self.row_of(*value, min, max)][idx * 2] = POINT;
        }

        let mut lines = vec!["Profit".to_string()];
        for (row_idx, row) in grid.iter().enumerate() {
            let label = if row_idx == 0 {
                top.as_str()
            } else if row_idx == self.height - 1 {
                bottom.as_str()
            } else {
                ""
            };
            let cells: String = row.iter().collect();
            lines.push(
                format!("{:>width$} │{}", label, cells, width = gutter)
                    .trim_end()
                    .to_string(),
            );
        }
        lines.push(format!(
            "{} └{}",
            " ".repeat(gutter),
            "─".repeat(data.len() * 2)
        ));

        let first = self.spec.labels.first().map(String::as_str).unwrap_or("");
        let last = self.spec.labels.last().map(String::as_str).unwrap_or("");
        if self.spec.labels.len() > 1 {
            lines.push(format!("{}  {} … {}", " ".repeat(gutter), first, last));
        } else {
            lines.push(format!("{}  {}", " ".repeat(gutter), first));
        }
        lines.join("\n")
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.live.fetch_sub(1, Ordering::SeqCst);
            tracing::debug!(points = self.spec.labels.len(), "chart destroyed");
        }
    }

    fn is_live(&self) -> bool {
        !self.destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(points: &[(u32, f64)]) -> DailyProfitSeries {
        DailyProfitSeries {
            dates: points
                .iter()
                .map(|(day, _)| NaiveDate::from_ymd_opt(2024, 3, *day).unwrap())
                .collect(),
            profits: points.iter().map(|(_, profit)| *profit).collect(),
        }
    }

    #[test]
    fn tooltip_and_axis_use_currency_format() {
        let spec = ChartSpec::profit_line(&series(&[(1, 123456.0)]), CurrencyFormatter::default());
        assert_eq!(
            spec.tooltip(0).as_deref(),
            Some("Date: 2024-03-01 | Profit: ₹1,23,456")
        );
        assert_eq!(spec.axis_label(-2500.0), "₹-2,500");
        assert!(spec.tooltip(1).is_none());
    }

    #[test]
    fn destroy_is_idempotent_and_releases_the_slot() {
        let mut backend = TextChartBackend::new();
        let mut chart = backend.create(ChartSpec::profit_line(
            &series(&[(1, 1.0)]),
            CurrencyFormatter::default(),
        ));
        assert_eq!(backend.live_instances(), 1);
        chart.destroy();
        chart.destroy();
        assert!(!chart.is_live());
        assert_eq!(backend.live_instances(), 0);
    }

    #[test]
    fn render_places_extremes_on_first_and_last_rows() {
        let mut backend = TextChartBackend::with_height(4);
        let chart = backend.create(ChartSpec::profit_line(
            &series(&[(1, 100.0), (2, -40.0)]),
            CurrencyFormatter::default(),
        ));
        let rendered = chart.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Profit");
        assert!(lines[1].starts_with("₹100 │●"));
        assert!(lines[4].starts_with("₹-40 │  ●"));
        assert!(rendered.contains("2024-03-01 … 2024-03-02"));
    }

    #[test]
    fn empty_series_renders_placeholder() {
        let mut backend = TextChartBackend::new();
        let chart = backend.create(ChartSpec::profit_line(
            &DailyProfitSeries::default(),
            CurrencyFormatter::default(),
        ));
        assert!(chart.render().contains("no data"));
    }
}
