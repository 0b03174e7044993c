use std::path::PathBuf;

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::{
    config::{Config, ConfigManager},
    core::{
        services::{PeriodFilter, SummaryService},
        Clock, ClockFace, SystemClock,
    },
    currency::CurrencyFormatter,
    errors::{CliError, LedgerError},
    ledger::EntryStore,
    presenter::{chart::TextChartBackend, surface::TerminalSurface, Presenter},
    storage::JsonFileStore,
    utils::paths::{app_data_dir, store_dir_in},
};

use super::commands::{CommandError, CommandRegistry};
use super::output::{self, OutputPreferences};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Everything one shell session works with: the entry store, the active
/// filter, and the presenter with its surface.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub store: EntryStore,
    pub presenter: Presenter,
    pub surface: TerminalSurface,
    pub filter: PeriodFilter,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub base_dir: PathBuf,
    pub theme: ColorfulTheme,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, app_data_dir())
    }

    /// Session rooted at `base`: `config.json` plus the `store/` directory.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        let store = open_store(&base, &config, Box::new(SystemClock))?;

        let mut context = ShellContext {
            mode,
            registry: CommandRegistry::default_commands(),
            store,
            presenter: build_presenter(&config),
            surface: TerminalSurface::dashboard(),
            filter: PeriodFilter::all(),
            config,
            config_manager,
            base_dir: base,
            theme: ColorfulTheme::default(),
            running: true,
        };
        context.apply_output_preferences();
        context.refresh();
        Ok(context)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    pub fn prompt(&self) -> String {
        if self.filter.is_empty() {
            "ledger> ".into()
        } else {
            format!("ledger [{}]> ", self.filter.label())
        }
    }

    pub fn plain(&self) -> bool {
        self.config.plain_output
    }

    /// Recomputes the filtered dashboard from the full list and re-renders
    /// every panel.
    pub fn refresh(&mut self) {
        let dashboard = SummaryService::summarize(self.store.all(), &self.filter);
        self.presenter.render_dashboard(&mut self.surface, &dashboard);
        self.refresh_today();
        self.tick_clock();
    }

    pub fn refresh_today(&mut self) {
        let today = SummaryService::today(self.store.all(), self.store.clock().today());
        self.presenter.render_today_card(&mut self.surface, &today);
    }

    pub fn tick_clock(&mut self) {
        ClockFace::tick(self.store.clock(), &mut self.surface);
    }

    pub fn dashboard_text(&self) -> String {
        let prefs = output::current_preferences();
        let heading = |title: String| output::format_message(output::MessageKind::Section, title, &prefs);
        let mut sections = vec![self.surface.render_clock()];
        sections.push(heading(format!("Summary ({})", self.filter.label())));
        sections.push(self.surface.render_summary());
        sections.push(heading("Today".into()));
        sections.push(self.surface.render_today());
        sections.push(heading("History".into()));
        sections.push(self.surface.render_table(self.plain()));
        sections.push(heading("Profit by day".into()));
        sections.push(self.surface.render_chart());
        sections.join("\n")
    }

    /// Yes/no confirmation. Script mode answers yes without prompting.
    pub fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }

    pub fn confirm_exit(&self) -> Result<bool, CommandError> {
        self.confirm("Exit the ledger shell?")
    }

    pub fn report_error(&self, err: CommandError) {
        if err.is_user_error() {
            output::warning(err);
        } else {
            tracing::error!(error = %err, "command failed");
            output::error(err);
        }
    }

    /// Persists the configuration and applies it to the running session.
    pub fn save_config(&mut self) -> Result<(), CommandError> {
        self.config_manager.save(&self.config)?;
        if self.store.key() != self.config.storage_key {
            let clock: Box<dyn Clock> = Box::new(SystemClock);
            self.store = open_store(&self.base_dir, &self.config, clock)?;
        }
        self.presenter = build_presenter(&self.config);
        self.apply_output_preferences();
        self.refresh();
        Ok(())
    }

    fn apply_output_preferences(&self) {
        output::set_preferences(OutputPreferences {
            plain_mode: self.config.plain_output,
            quiet_mode: false,
        });
    }
}

fn open_store(
    base: &std::path::Path,
    config: &Config,
    clock: Box<dyn Clock>,
) -> Result<EntryStore, LedgerError> {
    let backend = JsonFileStore::new(store_dir_in(base))?;
    let mut store = EntryStore::new(Box::new(backend), clock, config.storage_key.clone());
    store.load();
    Ok(store)
}

fn build_presenter(config: &Config) -> Presenter {
    Presenter::new(
        CurrencyFormatter::from_config(config),
        Box::new(TextChartBackend::new()),
    )
}
