use std::time::{Duration, Instant};

/// A repeating deadline. Fires once at its start instant, then every `period`.
/// Missed periods are coalesced into a single firing.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    period: Duration,
    next_due: Instant,
}

impl Interval {
    pub fn starting_at(period: Duration, start: Instant) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            next_due: start,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns true when the deadline has passed and advances it past `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        while self.next_due <= now {
            self.next_due += self.period;
        }
        true
    }

    pub fn until_next(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    ClockTick,
    TodayRefresh,
}

/// The two independent timers of the dashboard: the clock tick and the
/// today-card refresh.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    clock: Interval,
    today: Interval,
}

impl Schedule {
    pub fn new(clock_period: Duration, today_period: Duration, start: Instant) -> Self {
        Self {
            clock: Interval::starting_at(clock_period, start),
            today: Interval::starting_at(today_period, start),
        }
    }

    /// Tasks due at `now`, clock first.
    pub fn poll(&mut self, now: Instant) -> Vec<ScheduledTask> {
        let mut due = Vec::new();
        if self.clock.poll(now) {
            due.push(ScheduledTask::ClockTick);
        }
        if self.today.poll(now) {
            due.push(ScheduledTask::TodayRefresh);
        }
        due
    }

    pub fn until_next(&self, now: Instant) -> Duration {
        self.clock.until_next(now).min(self.today.until_next(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_fires_at_start_then_each_period() {
        let start = Instant::now();
        let mut interval = Interval::starting_at(Duration::from_secs(1), start);
        assert!(interval.poll(start));
        assert!(!interval.poll(start + Duration::from_millis(500)));
        assert!(interval.poll(start + Duration::from_secs(1)));
    }

    #[test]
    fn missed_periods_coalesce() {
        let start = Instant::now();
        let mut interval = Interval::starting_at(Duration::from_secs(1), start);
        assert!(interval.poll(start + Duration::from_millis(3500)));
        assert!(!interval.poll(start + Duration::from_millis(3600)));
        assert_eq!(
            interval.until_next(start + Duration::from_millis(3600)),
            Duration::from_millis(400)
        );
    }

    #[test]
    fn schedule_runs_timers_independently() {
        let start = Instant::now();
        let mut schedule = Schedule::new(Duration::from_secs(1), Duration::from_secs(60), start);
        assert_eq!(
            schedule.poll(start),
            vec![ScheduledTask::ClockTick, ScheduledTask::TodayRefresh]
        );

        let mut clock_ticks = 0;
        let mut refreshes = 0;
        for second in 1..=120 {
            for task in schedule.poll(start + Duration::from_secs(second)) {
                match task {
                    ScheduledTask::ClockTick => clock_ticks += 1,
                    ScheduledTask::TodayRefresh => refreshes += 1,
                }
            }
        }
        assert_eq!(clock_ticks, 120);
        assert_eq!(refreshes, 2);
    }
}
