pub mod commands;
pub mod help;
pub mod io;
pub mod output;
mod shell;
pub mod shell_context;
pub mod watch;

pub use commands::{CommandError, CommandRegistry, LoopControl};
pub use shell::run_cli;
pub use shell_context::{CliMode, ShellContext};
