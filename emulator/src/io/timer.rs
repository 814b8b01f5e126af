use std::time::{Duration, Instant};

// Source of timer events. The clock driver polls it once per cycle and raises
// the timer interrupt line when it returns true.
pub trait TimerSource: Send {
    fn poll(&mut self) -> bool;

    fn reset(&mut self) {}
}


// Fires once per period of real time.
pub struct WallClockTimer {
    period: Duration,
    next: Instant,
}

impl WallClockTimer {
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "WallClockTimer period must be non-zero");
        Self {
            period,
            next: Instant::now() + period,
        }
    }
}

impl Default for WallClockTimer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERIOD)
    }
}

impl TimerSource for WallClockTimer {
    fn poll(&mut self) -> bool {
        let now = Instant::now();
        if now < self.next {
            return false;
        }
        // Missed periods collapse into one event; IS only latches a single bit.
        while self.next <= now {
            self.next += self.period;
        }
        true
    }

    fn reset(&mut self) {
        self.next = Instant::now() + self.period;
    }
}


// Fires every `period` polls, independent of real time.
pub struct CycleTimer {
    period: usize,
    polls_until_ready: usize,
}

impl CycleTimer {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "CycleTimer period must be non-zero");
        Self {
            period,
            polls_until_ready: period,
        }
    }
}

impl TimerSource for CycleTimer {
    fn poll(&mut self) -> bool {
        self.polls_until_ready -= 1;
        if self.polls_until_ready == 0 {
            self.polls_until_ready = self.period;
            return true;
        }
        false
    }

    fn reset(&mut self) {
        self.polls_until_ready = self.period;
    }
}


// Never fires.
#[derive(Default, Clone, Copy)]
pub struct NoTimer();

impl TimerSource for NoTimer {
    fn poll(&mut self) -> bool {
        false
    }
}
