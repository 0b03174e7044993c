//! Shell command registry and handlers.

use strsim::levenshtein;
use thiserror::Error;

use crate::{
    core::services::PeriodFilter,
    domain::{EntryId, EntryInput},
    errors::LedgerError,
    presenter::chart::ChartInstance,
};

use super::help;
use super::io::prompt_text;
use super::output;
use super::shell_context::{CliMode, ShellContext};
use super::watch::run_watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<LoopControl, CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Usage(String),
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl CommandError {
    /// Mistakes the user can fix by retyping, reported as warnings.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CommandError::Usage(_)
                | CommandError::Unknown(_)
                | CommandError::Ledger(LedgerError::Validation(_))
                | CommandError::Ledger(LedgerError::InvalidInput(_))
                | CommandError::Ledger(LedgerError::ConfigError(_))
        )
    }
}

pub type Handler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    pub handler: Handler,
}

#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn register(&mut self, entry: CommandEntry) {
        self.entries.push(entry);
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn list(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }

    /// Closest registered name within two edits.
    pub fn suggest(&self, name: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .map(|entry| (levenshtein(name, entry.name), entry.name))
            .filter(|(distance, _)| *distance <= 2)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }

    pub fn default_commands() -> Self {
        let mut registry = Self::default();
        let commands: [(&'static str, &'static str, &'static str, Handler); 12] = [
            ("add", "add <YYYY-MM-DD|today> <investment> <cash> <gpay>", "Record a day's investment and income", cmd_add),
            ("delete", "delete <id>", "Delete an entry after confirmation", cmd_delete),
            ("list", "list", "Show the history table for the active filter", cmd_list),
            ("filter", "filter [month=MM] [year=YYYY] | filter clear", "Narrow totals, table, and chart to a month and/or year", cmd_filter),
            ("show", "show", "Print the full dashboard", cmd_show),
            ("today", "today", "Show today's profit and investment", cmd_today),
            ("clock", "clock", "Show the current time and date", cmd_clock),
            ("chart", "chart", "Show the profit chart with per-day values", cmd_chart),
            ("watch", "watch", "Live dashboard with ticking clock (q to quit)", cmd_watch),
            ("config", "config show | config set <field> <value>", "Inspect or change settings", cmd_config),
            ("help", "help [command]", "List commands or describe one", cmd_help),
            ("exit", "exit", "Leave the shell", cmd_exit),
        ];
        for (name, usage, description, handler) in commands {
            registry.register(CommandEntry {
                name,
                usage,
                description,
                handler,
            });
        }
        registry
    }
}

impl ShellContext {
    pub fn dispatch(&mut self, command: &str, args: &[&str]) -> CommandResult {
        let command = match command {
            "quit" | "q" => "exit",
            "rm" => "delete",
            other => other,
        };
        let Some(entry) = self.registry.get(command) else {
            let hint = self
                .registry
                .suggest(command)
                .map(|name| format!(" (did you mean `{}`?)", name))
                .unwrap_or_default();
            return Err(CommandError::Usage(format!(
                "unknown command `{}`{}; type `help` for a list",
                command, hint
            )));
        };
        let handler = entry.handler;
        handler(self, args)
    }
}

fn usage(context: &ShellContext, name: &str) -> CommandError {
    let text = context
        .registry
        .get(name)
        .map(|entry| entry.usage)
        .unwrap_or(name);
    CommandError::Usage(format!("usage: {}", text))
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let input = match args {
        [date, investment, cash, gpay] => EntryInput::new(*date, *investment, *cash, *gpay),
        [] if context.mode == CliMode::Interactive => prompt_entry(context)?,
        _ => return Err(usage(context, "add")),
    };
    let input = EntryInput {
        date: resolve_date(context, &input.date),
        ..input
    };

    // A failed save still leaves the entry in memory; show it before reporting.
    let saved = context.store.add(&input);
    context.refresh();
    let entry = saved?;
    output::success(format!(
        "Entry {} saved for {} (profit {}).",
        entry.id,
        entry.date,
        context.presenter.formatter().format(entry.profit)
    ));
    Ok(LoopControl::Continue)
}

fn prompt_entry(context: &ShellContext) -> Result<EntryInput, CommandError> {
    let today = context.store.clock().today().format("%Y-%m-%d").to_string();
    Ok(EntryInput {
        date: prompt_text(&context.theme, "Date", Some(&today))?,
        investment: prompt_text(&context.theme, "Investment", None)?,
        cash: prompt_text(&context.theme, "Cash", None)?,
        gpay: prompt_text(&context.theme, "GPay", None)?,
    })
}

fn resolve_date(context: &ShellContext, raw: &str) -> String {
    if raw.trim().eq_ignore_ascii_case("today") {
        context.store.clock().today().format("%Y-%m-%d").to_string()
    } else {
        raw.to_string()
    }
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw_id] = args else {
        return Err(usage(context, "delete"));
    };
    let id: EntryId = raw_id
        .trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::Usage(format!("`{}` is not an entry id", raw_id)))?;

    let Some(entry) = context.store.get(id) else {
        output::info(format!("No entry with id {}.", id));
        return Ok(LoopControl::Continue);
    };
    let prompt = format!(
        "Delete the {} entry (profit {})?",
        entry.date,
        context.presenter.formatter().format(entry.profit)
    );
    if !context.confirm(&prompt)? {
        output::info("Delete cancelled.");
        return Ok(LoopControl::Continue);
    }

    let removed = context.store.remove(id);
    context.refresh();
    match removed? {
        Some(entry) => output::success(format!("Deleted entry {} ({}).", entry.id, entry.date)),
        None => output::info(format!("No entry with id {}.", id)),
    }
    Ok(LoopControl::Continue)
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.refresh();
    output::section(format!("History ({})", context.filter.label()));
    output::block(&context.surface.render_table(context.plain()));
    Ok(LoopControl::Continue)
}

fn cmd_filter(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut month = context.filter.month.map(|m| format!("{:02}", m));
    let mut year = context.filter.year.map(|y| format!("{:04}", y));

    match args {
        [] => {
            output::info(format!("Active filter: {}", context.filter.label()));
            return Ok(LoopControl::Continue);
        }
        ["clear"] => {
            month = None;
            year = None;
        }
        pairs => {
            for pair in pairs {
                match pair.split_once('=') {
                    Some(("month", value)) => month = Some(value.to_string()),
                    Some(("year", value)) => year = Some(value.to_string()),
                    _ => return Err(usage(context, "filter")),
                }
            }
        }
    }

    context.filter = PeriodFilter::parse(month.as_deref(), year.as_deref())?;
    context.refresh();
    output::section(format!("Summary ({})", context.filter.label()));
    output::block(&context.surface.render_summary());
    Ok(LoopControl::Continue)
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.refresh();
    output::block(&context.dashboard_text());
    Ok(LoopControl::Continue)
}

fn cmd_today(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.refresh_today();
    output::section(format!("Today ({})", context.store.clock().today()));
    output::block(&context.surface.render_today());
    Ok(LoopControl::Continue)
}

fn cmd_clock(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.tick_clock();
    output::block(&context.surface.render_clock());
    Ok(LoopControl::Continue)
}

fn cmd_chart(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.refresh();
    output::section(format!("Profit by day ({})", context.filter.label()));
    output::block(&context.surface.render_chart());
    if let Some(chart) = context.presenter.chart() {
        print_tooltips(chart);
    }
    Ok(LoopControl::Continue)
}

fn print_tooltips(chart: &dyn ChartInstance) {
    let spec = chart.spec();
    for index in 0..spec.labels.len() {
        if let Some(line) = spec.tooltip(index) {
            output::info(format!("  {}", line));
        }
    }
}

fn cmd_watch(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.mode == CliMode::Script {
        return Err(CommandError::Usage(
            "watch needs an interactive terminal".into(),
        ));
    }
    run_watch(context)?;
    Ok(LoopControl::Continue)
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            output::section("Configuration");
            let rendered = serde_json::to_string_pretty(&context.config)
                .map_err(LedgerError::from)?;
            output::block(&rendered);
            output::info(format!("Stored at {}", context.config_manager.path().display()));
        }
        ["set", field, value] => {
            context.config.set_field(field, value)?;
            context.save_config()?;
            output::success(format!("Set {} = {}.", field, value));
        }
        _ => return Err(usage(context, "config")),
    }
    Ok(LoopControl::Continue)
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => help::print_overview(&context.registry),
        [name] => match context.registry.get(name) {
            Some(entry) => help::print_command(entry),
            None => return Err(CommandError::Unknown(name.to_string())),
        },
        _ => return Err(usage(context, "help")),
    }
    Ok(LoopControl::Continue)
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info("Goodbye.");
    Ok(LoopControl::Exit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::FixedClock,
        errors::Result as LedgerResult,
        ledger::EntryStore,
        presenter::surface::DisplayTarget,
        storage::KeyValueStore,
    };
    use tempfile::TempDir;

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> LedgerResult<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> LedgerResult<()> {
            Err(LedgerError::StorageError("disk full".into()))
        }
    }

    fn context() -> (TempDir, ShellContext) {
        let temp = TempDir::new().unwrap();
        let context =
            ShellContext::with_base_dir(CliMode::Script, temp.path().to_path_buf()).unwrap();
        (temp, context)
    }

    #[test]
    fn suggests_near_misses() {
        let registry = CommandRegistry::default_commands();
        assert_eq!(registry.suggest("delet"), Some("delete"));
        assert_eq!(registry.suggest("zzzzzzz"), None);
    }

    #[test]
    fn add_then_delete_round_trips_through_the_store() {
        let (_temp, mut context) = context();
        context
            .dispatch("add", &["2024-05-01", "100", "60", "50"])
            .unwrap();
        assert_eq!(context.store.len(), 1);
        let id = context.store.all()[0].id.to_string();

        context.dispatch("delete", &[id.as_str()]).unwrap();
        assert!(context.store.is_empty());
    }

    #[test]
    fn invalid_add_is_a_user_error() {
        let (_temp, mut context) = context();
        let err = context
            .dispatch("add", &["2024-05-01", "100", "abc", "50"])
            .expect_err("non-numeric cash");
        assert!(err.is_user_error());
        assert!(context.store.is_empty());
    }

    #[test]
    fn filter_updates_totals_but_not_today() {
        let (_temp, mut context) = context();
        context.dispatch("add", &["today", "10", "30", "0"]).unwrap();
        context.dispatch("add", &["1999-01-01", "0", "5", "0"]).unwrap();
        let today_before = context
            .surface
            .text(DisplayTarget::TodayProfit)
            .map(str::to_string);

        context.dispatch("filter", &["year=1999"]).unwrap();
        assert_eq!(context.filter.year, Some(1999));
        assert_eq!(context.surface.text(DisplayTarget::TotalProfit), Some("₹5"));
        assert_eq!(
            context
                .surface
                .text(DisplayTarget::TodayProfit)
                .map(str::to_string),
            today_before
        );

        context.dispatch("filter", &["clear"]).unwrap();
        assert!(context.filter.is_empty());
    }

    #[test]
    fn bad_filter_values_keep_previous_filter() {
        let (_temp, mut context) = context();
        context.dispatch("filter", &["month=03"]).unwrap();
        assert!(context.dispatch("filter", &["month=13"]).is_err());
        assert_eq!(context.filter.month, Some(3));
    }

    #[test]
    fn failed_save_still_shows_the_entry() {
        let (_temp, mut context) = context();
        let clock = FixedClock::at(2024, 5, 1, 9, 0, 0).unwrap();
        context.store = EntryStore::new(Box::new(ReadOnlyStore), Box::new(clock), "k");

        let err = context
            .dispatch("add", &["2024-05-01", "100", "60", "50"])
            .unwrap_err();
        assert!(matches!(err, CommandError::Ledger(LedgerError::StorageError(_))));
        assert!(!err.is_user_error());
        assert_eq!(context.store.len(), 1);
        assert_eq!(context.surface.rows().map(|rows| rows.len()), Some(1));
        assert_eq!(context.surface.text(DisplayTarget::TotalProfit), Some("₹10"));
    }

    #[test]
    fn exit_stops_the_loop() {
        let (_temp, mut context) = context();
        assert_eq!(context.dispatch("quit", &[]).unwrap(), LoopControl::Exit);
    }
}
