pub mod clock;
pub mod schedule;
pub mod services;

pub use clock::{Clock, ClockFace, FixedClock, SystemClock};
pub use schedule::{Interval, Schedule, ScheduledTask};
