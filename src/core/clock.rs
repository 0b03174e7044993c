use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::presenter::surface::{DisplaySurface, DisplayTarget};

const TIME_FORMAT: &str = "%I:%M:%S %p";
const DATE_FORMAT: &str = "%A %d %b %Y";

/// Clock abstracts access to the current local time so services remain
/// deterministic in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// Current local calendar date. Defaults to `now().date_naive()`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Real-time clock backed by the system local time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Local>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now }
    }

    /// Local wall-clock time; `None` when the time does not exist in the
    /// local zone (DST gaps).
    pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        Local
            .with_ymd_and_hms(year, month, day, hour, min, sec)
            .earliest()
            .map(Self::new)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.now
    }
}

/// Renders the time-of-day and long date into the clock display targets.
/// Never touches entry data.
pub struct ClockFace;

impl ClockFace {
    pub fn tick(clock: &dyn Clock, surface: &mut dyn DisplaySurface) {
        let now = clock.now();
        surface.set_text(DisplayTarget::ClockTime, &Self::time_text(&now));
        surface.set_text(DisplayTarget::ClockDate, &Self::date_text(&now));
    }

    pub fn time_text(now: &DateTime<Local>) -> String {
        now.format(TIME_FORMAT).to_string()
    }

    pub fn date_text(now: &DateTime<Local>) -> String {
        now.format(DATE_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::surface::TerminalSurface;

    #[test]
    fn tick_writes_twelve_hour_time_and_long_date() {
        let clock = FixedClock::at(2024, 5, 1, 14, 5, 9).unwrap();
        let mut surface = TerminalSurface::dashboard();
        ClockFace::tick(&clock, &mut surface);
        assert_eq!(surface.text(DisplayTarget::ClockTime), Some("02:05:09 PM"));
        assert_eq!(
            surface.text(DisplayTarget::ClockDate),
            Some("Wednesday 01 May 2024")
        );
    }

    #[test]
    fn tick_without_clock_targets_is_a_no_op() {
        let clock = FixedClock::at(2024, 5, 1, 9, 0, 0).unwrap();
        let mut surface = TerminalSurface::with_targets([DisplayTarget::Cash]);
        ClockFace::tick(&clock, &mut surface);
        assert_eq!(surface.text(DisplayTarget::ClockTime), None);
    }

    #[test]
    fn fixed_clock_reports_local_date() {
        let clock = FixedClock::at(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }
}
