//! # clock
//!
//! two cadences run off the same wall clock: instruction fetch (nominally
//! 700 per second) and the 60Hz display/timer interrupt. each keeps its own
//! accumulator so neither drifts and neither drags the other along.
use std::time::{Duration, Instant};

/// a fixed-rate trigger fed with elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    period: Duration,
    accumulated: Duration,
}

impl Cadence {
    /// `hz` of zero is treated as one
    pub fn from_hz(hz: u64) -> Self {
        Cadence {
            period: Duration::from_nanos(1_000_000_000 / hz.max(1)),
            accumulated: Duration::ZERO,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// add elapsed time; returns how many whole periods fired, keeping the
    /// remainder for next time
    pub fn accumulate(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;
        let mut fired = 0;
        while self.accumulated >= self.period {
            self.accumulated -= self.period;
            fired += 1;
        }
        fired
    }

    /// time left until the next firing
    pub fn remaining(&self) -> Duration {
        self.period - self.accumulated
    }
}

/// most wall-clock time one poll will account for; after a longer stall
/// (suspend, SIGSTOP) the machine resumes instead of replaying the gap
pub const MAX_CATCH_UP: Duration = Duration::from_millis(100);

/// how many of each event are due
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ticks {
    pub cpu: u32,
    pub frame: u32,
}

pub struct Scheduler {
    cpu: Cadence,
    frame: Cadence,
    last: Instant,
}

impl Scheduler {
    pub fn new(instructions_per_second: u64, frame_rate: u64, start: Instant) -> Self {
        Scheduler {
            cpu: Cadence::from_hz(instructions_per_second),
            frame: Cadence::from_hz(frame_rate),
            last: start,
        }
    }

    /// measure the wall clock once and feed both cadences from it
    pub fn poll(&mut self, now: Instant) -> Ticks {
        let elapsed = now.saturating_duration_since(self.last).min(MAX_CATCH_UP);
        self.last = now;
        Ticks {
            cpu: self.cpu.accumulate(elapsed),
            frame: self.frame.accumulate(elapsed),
        }
    }

    /// how long the host can sleep before either cadence is due
    pub fn until_next(&self) -> Duration {
        self.cpu.remaining().min(self.frame.remaining())
    }
}
