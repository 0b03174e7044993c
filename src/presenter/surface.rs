use std::collections::BTreeMap;

use crate::presenter::table::{history_table, TableRow};

/// Named display slots a surface may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DisplayTarget {
    Cash,
    GPay,
    Total,
    TotalInvest,
    TotalProfit,
    FooterInvest,
    FooterCash,
    FooterGPay,
    FooterProfit,
    TodayProfit,
    TodayInvest,
    ClockTime,
    ClockDate,
    HistoryTable,
    Chart,
}

impl DisplayTarget {
    pub const ALL: [DisplayTarget; 15] = [
        DisplayTarget::Cash,
        DisplayTarget::GPay,
        DisplayTarget::Total,
        DisplayTarget::TotalInvest,
        DisplayTarget::TotalProfit,
        DisplayTarget::FooterInvest,
        DisplayTarget::FooterCash,
        DisplayTarget::FooterGPay,
        DisplayTarget::FooterProfit,
        DisplayTarget::TodayProfit,
        DisplayTarget::TodayInvest,
        DisplayTarget::ClockTime,
        DisplayTarget::ClockDate,
        DisplayTarget::HistoryTable,
        DisplayTarget::Chart,
    ];

    pub const SUMMARY_CARDS: [DisplayTarget; 5] = [
        DisplayTarget::Cash,
        DisplayTarget::GPay,
        DisplayTarget::Total,
        DisplayTarget::TotalInvest,
        DisplayTarget::TotalProfit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DisplayTarget::Cash => "Cash",
            DisplayTarget::GPay => "GPay",
            DisplayTarget::Total => "Total income",
            DisplayTarget::TotalInvest => "Investment",
            DisplayTarget::TotalProfit => "Profit",
            DisplayTarget::FooterInvest => "Footer investment",
            DisplayTarget::FooterCash => "Footer cash",
            DisplayTarget::FooterGPay => "Footer gpay",
            DisplayTarget::FooterProfit => "Footer profit",
            DisplayTarget::TodayProfit => "Today's profit",
            DisplayTarget::TodayInvest => "Today's investment",
            DisplayTarget::ClockTime => "Time",
            DisplayTarget::ClockDate => "Date",
            DisplayTarget::HistoryTable => "History",
            DisplayTarget::Chart => "Chart",
        }
    }
}

/// Output surface with optional targets. Writing to a target the surface
/// does not expose is a no-op, so partial layouts still render.
pub trait DisplaySurface {
    fn has_target(&self, target: DisplayTarget) -> bool;
    fn set_text(&mut self, target: DisplayTarget, text: &str);
    fn set_rows(&mut self, rows: Vec<TableRow>);
}

/// In-memory surface the terminal front end prints from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerminalSurface {
    values: BTreeMap<DisplayTarget, Option<String>>,
    rows: Option<Vec<TableRow>>,
}

impl TerminalSurface {
    /// Surface exposing every target.
    pub fn dashboard() -> Self {
        Self::with_targets(DisplayTarget::ALL)
    }

    pub fn with_targets(targets: impl IntoIterator<Item = DisplayTarget>) -> Self {
        let mut surface = Self::default();
        for target in targets {
            if target == DisplayTarget::HistoryTable {
                surface.rows = Some(Vec::new());
            }
            surface.values.insert(target, None);
        }
        surface
    }

    pub fn text(&self, target: DisplayTarget) -> Option<&str> {
        self.values.get(&target).and_then(|value| value.as_deref())
    }

    pub fn rows(&self) -> Option<&[TableRow]> {
        self.rows.as_deref()
    }

    fn text_or_blank(&self, target: DisplayTarget) -> &str {
        self.text(target).unwrap_or("-")
    }

    fn card_lines(&self, targets: &[DisplayTarget]) -> Vec<String> {
        targets
            .iter()
            .filter(|target| self.has_target(**target))
            .map(|target| format!("  {:<20} {}", target.label(), self.text_or_blank(*target)))
            .collect()
    }

    pub fn render_summary(&self) -> String {
        self.card_lines(&DisplayTarget::SUMMARY_CARDS).join("\n")
    }

    pub fn render_today(&self) -> String {
        self.card_lines(&[DisplayTarget::TodayProfit, DisplayTarget::TodayInvest])
            .join("\n")
    }

    pub fn render_clock(&self) -> String {
        match (self.text(DisplayTarget::ClockTime), self.text(DisplayTarget::ClockDate)) {
            (Some(time), Some(date)) => format!("{}  {}", time, date),
            (Some(time), None) => time.to_string(),
            (None, Some(date)) => date.to_string(),
            (None, None) => String::new(),
        }
    }

    /// History rows with the footer totals underneath.
    pub fn render_table(&self, plain: bool) -> String {
        let Some(rows) = self.rows.as_deref() else {
            return String::new();
        };
        let footer = [
            DisplayTarget::FooterInvest,
            DisplayTarget::FooterCash,
            DisplayTarget::FooterGPay,
            DisplayTarget::FooterProfit,
        ]
        .iter()
        .map(|target| self.text(*target).unwrap_or("").to_string())
        .collect::<Vec<_>>();
        let has_footer = footer.iter().any(|cell| !cell.is_empty());
        history_table(rows, has_footer.then_some(footer), plain).render()
    }

    pub fn render_chart(&self) -> String {
        self.text(DisplayTarget::Chart).unwrap_or("").to_string()
    }
}

impl DisplaySurface for TerminalSurface {
    fn has_target(&self, target: DisplayTarget) -> bool {
        self.values.contains_key(&target)
    }

    fn set_text(&mut self, target: DisplayTarget, text: &str) {
        if let Some(slot) = self.values.get_mut(&target) {
            *slot = Some(text.to_string());
        }
    }

    fn set_rows(&mut self, rows: Vec<TableRow>) {
        if let Some(slot) = self.rows.as_mut() {
            *slot = rows;
        }
    }
}
