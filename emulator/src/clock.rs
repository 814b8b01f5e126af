use crate::{Emulator, Fault};
use crate::io::timer::{TimerSource, WallClockTimer};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Halted,
    Stopped,
    CycleLimit,
}

// Drives an Emulator one cycle at a time, polling a timer source before each
// cycle. Stopping the clock stops the timer with it.
pub struct Clock {
    cycle_period: Duration,
    timer: Box<dyn TimerSource>,
    max_cycles: Option<usize>,
    stop: Arc<AtomicBool>,
}

impl Clock {
    pub const DEFAULT_CYCLE_PERIOD: Duration = Duration::from_millis(1);

    pub fn new(cycle_period: Duration, timer: Box<dyn TimerSource>) -> Self {
        Self {
            cycle_period,
            timer,
            max_cycles: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_max_cycles(&mut self, max_cycles: Option<usize>) {
        self.max_cycles = max_cycles;
    }

    // Setting the flag stops run() before its next cycle.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn run(&mut self, emu: &mut Emulator) -> Result<StopReason, Fault> {
        self.timer.reset();
        let mut cycles = 0usize;
        loop {
            if self.stop.load(Ordering::Relaxed) {
                debug!("Clock stopped after {cycles} cycles");
                return Ok(StopReason::Stopped);
            }
            if self.max_cycles.is_some_and(|max| cycles >= max) {
                debug!("Clock reached cycle limit {cycles}");
                return Ok(StopReason::CycleLimit);
            }

            if self.timer.poll() {
                trace!("Timer tick");
                emu.raise_timer_interrupt();
            }
            if emu.step()?.is_halt() {
                return Ok(StopReason::Halted);
            }
            cycles += 1;

            if !self.cycle_period.is_zero() {
                thread::sleep(self.cycle_period);
            }
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CYCLE_PERIOD, Box::new(WallClockTimer::default()))
    }
}
