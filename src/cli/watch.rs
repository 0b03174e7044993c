//! Live dashboard: a single-threaded loop driving the clock tick and the
//! today-card refresh from one [`Schedule`].

use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType},
};

use crate::core::{Schedule, ScheduledTask};

use super::commands::CommandError;
use super::shell_context::ShellContext;

pub fn run_watch(context: &mut ShellContext) -> Result<(), CommandError> {
    let mut schedule = Schedule::new(
        Duration::from_secs(context.config.clock_interval_secs),
        Duration::from_secs(context.config.today_refresh_secs),
        Instant::now(),
    );
    context.refresh();

    terminal::enable_raw_mode()?;
    let result = watch_loop(context, &mut schedule);
    terminal::disable_raw_mode()?;
    println!();
    result
}

fn watch_loop(context: &mut ShellContext, schedule: &mut Schedule) -> Result<(), CommandError> {
    let mut stdout = io::stdout();
    loop {
        let due = schedule.poll(Instant::now());
        if !due.is_empty() {
            for task in due {
                match task {
                    ScheduledTask::ClockTick => context.tick_clock(),
                    ScheduledTask::TodayRefresh => context.refresh_today(),
                }
            }
            draw(&mut stdout, context)?;
        }

        if event::poll(schedule.until_next(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                if is_quit(&key) {
                    return Ok(());
                }
            }
        }
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn draw(stdout: &mut io::Stdout, context: &ShellContext) -> io::Result<()> {
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    let text = context.dashboard_text();
    // Raw mode needs explicit carriage returns.
    for line in text.lines() {
        write!(stdout, "{}\r\n", line)?;
    }
    write!(stdout, "\r\n(q to quit)\r\n")?;
    stdout.flush()
}
