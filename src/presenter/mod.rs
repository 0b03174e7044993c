//! Turns aggregation results into table rows, card text, and the profit
//! chart. The presenter owns the single live chart instance.

pub mod chart;
pub mod surface;
pub mod table;

use crate::core::services::{DailyProfitSeries, Dashboard, Summary, TodaySummary};
use crate::currency::CurrencyFormatter;
use crate::domain::Entry;

use chart::{ChartBackend, ChartInstance, ChartSpec};
use surface::{DisplaySurface, DisplayTarget};
use table::rows_by_date_desc;

pub struct Presenter {
    formatter: CurrencyFormatter,
    charts: Box<dyn ChartBackend>,
    chart: Option<Box<dyn ChartInstance>>,
}

impl Presenter {
    pub fn new(formatter: CurrencyFormatter, charts: Box<dyn ChartBackend>) -> Self {
        Self {
            formatter,
            charts,
            chart: None,
        }
    }

    pub fn formatter(&self) -> &CurrencyFormatter {
        &self.formatter
    }

    pub fn render_table(&self, surface: &mut dyn DisplaySurface, entries: &[Entry]) {
        if !surface.has_target(DisplayTarget::HistoryTable) {
            return;
        }
        surface.set_rows(rows_by_date_desc(entries));
    }

    /// Writes the summary cards and the table footer from the same totals.
    pub fn render_summary_cards(&self, surface: &mut dyn DisplaySurface, summary: &Summary) {
        let cash = self.formatter.format(summary.total_cash);
        let gpay = self.formatter.format(summary.total_gpay);
        let investment = self.formatter.format(summary.total_investment);
        let profit = self.formatter.format(summary.total_profit);

        surface.set_text(DisplayTarget::Cash, &cash);
        surface.set_text(DisplayTarget::GPay, &gpay);
        surface.set_text(
            DisplayTarget::Total,
            &self.formatter.format(summary.total_income()),
        );
        surface.set_text(DisplayTarget::TotalInvest, &investment);
        surface.set_text(DisplayTarget::TotalProfit, &profit);

        surface.set_text(DisplayTarget::FooterInvest, &investment);
        surface.set_text(DisplayTarget::FooterCash, &cash);
        surface.set_text(DisplayTarget::FooterGPay, &gpay);
        surface.set_text(DisplayTarget::FooterProfit, &profit);
    }

    pub fn render_today_card(&self, surface: &mut dyn DisplaySurface, today: &TodaySummary) {
        surface.set_text(
            DisplayTarget::TodayProfit,
            &self.formatter.format(today.profit),
        );
        surface.set_text(
            DisplayTarget::TodayInvest,
            &self.formatter.format(today.investment),
        );
    }

    /// Replaces the live chart: the previous instance is destroyed before the
    /// new one is created. Skipped when the surface has no chart slot.
    pub fn render_chart(&mut self, surface: &mut dyn DisplaySurface, series: &DailyProfitSeries) {
        if !surface.has_target(DisplayTarget::Chart) {
            return;
        }
        self.dispose_chart();
        let spec = ChartSpec::profit_line(series, self.formatter.clone());
        let chart = self.charts.create(spec);
        surface.set_text(DisplayTarget::Chart, &chart.render());
        tracing::debug!(points = series.len(), "chart replaced");
        self.chart = Some(chart);
    }

    /// Table, cards, footer, and chart for one filtered view.
    pub fn render_dashboard(&mut self, surface: &mut dyn DisplaySurface, dashboard: &Dashboard) {
        self.render_table(surface, &dashboard.entries);
        self.render_summary_cards(surface, &dashboard.summary);
        self.render_chart(surface, &dashboard.series);
    }

    pub fn chart(&self) -> Option<&dyn ChartInstance> {
        self.chart.as_deref()
    }

    pub fn live_charts(&self) -> usize {
        self.charts.live_instances()
    }

    pub fn dispose_chart(&mut self) {
        if let Some(mut previous) = self.chart.take() {
            previous.destroy();
        }
    }
}

impl Drop for Presenter {
    fn drop(&mut self) {
        self.dispose_chart();
    }
}
