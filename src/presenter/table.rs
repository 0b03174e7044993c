use chrono::NaiveDate;
use colored::Colorize;

use crate::domain::{Entry, EntryId, ProfitClass};

/// One history row as shown to the user, with its delete affordance.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: EntryId,
    pub date: NaiveDate,
    pub investment: f64,
    pub cash: f64,
    pub gpay: f64,
    pub profit: f64,
    pub class: ProfitClass,
}

impl From<&Entry> for TableRow {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id,
            date: entry.date,
            investment: entry.investment,
            cash: entry.cash,
            gpay: entry.gpay,
            profit: entry.profit,
            class: entry.profit_class(),
        }
    }
}

impl TableRow {
    /// Shell command that deletes this row.
    pub fn delete_action(&self) -> String {
        format!("delete {}", self.id)
    }
}

/// Rows for `entries`, most recent date first. Same-day rows keep their
/// relative order.
pub fn rows_by_date_desc(entries: &[Entry]) -> Vec<TableRow> {
    let mut rows: Vec<TableRow> = entries.iter().map(TableRow::from).collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub min_width: usize,
    pub alignment: Alignment,
}

impl TableColumn {
    fn new(header: &str, alignment: Alignment) -> Self {
        Self {
            header: header.into(),
            min_width: 4,
            alignment,
        }
    }
}

/// Column metadata plus body and optional footer rows.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub footer: Option<Vec<String>>,
    pub padding: usize,
    pub plain: bool,
}

impl Table {
    /// Content width per column: the widest of header, body, footer, and
    /// `min_width`.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = visible_width(&column.header).max(column.min_width);
                for row in self.rows.iter().chain(self.footer.iter()) {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(visible_width(cell));
                    }
                }
                width
            })
            .collect()
    }

    pub fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, widths[idx], column.alignment, self.padding)
            })
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let rule = horizontal_rule(&widths, self.padding, self.plain);

        let mut lines = vec![self.render_row(&header, &widths), rule.clone()];
        if self.rows.is_empty() {
            lines.push(format!("{}(no entries)", " ".repeat(self.padding)));
        }
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        if let Some(footer) = &self.footer {
            lines.push(rule);
            lines.push(self.render_row(footer, &widths));
        }
        lines.join("\n")
    }
}

/// History table: date, amounts, classified profit, and the delete id.
pub fn history_table(rows: &[TableRow], totals: Option<Vec<String>>, plain: bool) -> Table {
    let columns = vec![
        TableColumn::new("Date", Alignment::Left),
        TableColumn::new("Investment", Alignment::Right),
        TableColumn::new("Cash", Alignment::Right),
        TableColumn::new("GPay", Alignment::Right),
        TableColumn::new("Profit", Alignment::Right),
        TableColumn::new("Delete", Alignment::Left),
    ];

    let body = rows
        .iter()
        .map(|row| {
            vec![
                row.date.format("%Y-%m-%d").to_string(),
                row.investment.to_string(),
                row.cash.to_string(),
                row.gpay.to_string(),
                profit_cell(row, plain),
                row.delete_action(),
            ]
        })
        .collect();

    let footer = totals.map(|totals| {
        let mut cells = vec!["Total".to_string()];
        cells.extend(totals);
        cells
    });

    Table {
        columns,
        rows: body,
        footer,
        padding: 1,
        plain,
    }
}

fn profit_cell(row: &TableRow, plain: bool) -> String {
    let text = row.profit.to_string();
    if plain {
        return text;
    }
    match row.class {
        ProfitClass::Positive => text.green().to_string(),
        ProfitClass::Negative => text.red().to_string(),
    }
}

/// Character count ignoring ANSI escape sequences.
fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            for next in chars.by_ref() {
                if ('@'..='~').contains(&next) && next != '[' {
                    break;
                }
            }
            continue;
        }
        width += 1;
    }
    width
}

pub fn render_cell(text: &str, width: usize, alignment: Alignment, padding: usize) -> String {
    let remaining = width.saturating_sub(visible_width(text));
    let (left, right) = match alignment {
        Alignment::Left => (0, remaining),
        Alignment::Right => (remaining, 0),
    };
    format!(
        "{pad}{}{text}{}{pad}",
        " ".repeat(left),
        " ".repeat(right),
        pad = " ".repeat(padding)
    )
}

pub fn horizontal_rule(widths: &[usize], padding: usize, plain: bool) -> String {
    if widths.is_empty() {
        return String::new();
    }
    let total: usize =
        widths.iter().map(|w| w + padding * 2).sum::<usize>() + widths.len().saturating_sub(1);
    let ch = if plain { '-' } else { '─' };
    ch.to_string().repeat(total)
}
