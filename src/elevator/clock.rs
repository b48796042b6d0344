/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::ElevatorError;

/***************************************/
/*             Public API              */
/***************************************/
/// Time source of an interpreter, as time elapsed since the clock started.
pub trait Clock {
    fn time(&self) -> Duration;
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep a handle and advance the
/// clock owned by an interpreter.
#[derive(Debug, Clone, Default)]
pub struct SimulatedClock {
    time: Arc<Mutex<Duration>>,
}

impl SimulatedClock {
    pub fn new() -> SimulatedClock {
        SimulatedClock::default()
    }

    pub fn advance(&self, delta: Duration) -> Result<(), ElevatorError> {
        let mut time = self.time.lock().unwrap_or_else(|e| e.into_inner());
        *time = time
            .checked_add(delta)
            .ok_or(ElevatorError::DelayOutOfRange(delta))?;
        Ok(())
    }

    pub fn set(&self, new_time: Duration) -> Result<(), ElevatorError> {
        let mut time = self.time.lock().unwrap_or_else(|e| e.into_inner());
        if new_time < *time {
            return Err(ElevatorError::ClockWentBackwards);
        }
        *time = new_time;
        Ok(())
    }
}

impl Clock for SimulatedClock {
    fn time(&self) -> Duration {
        *self.time.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Real time elapsed since construction.
#[derive(Debug, Clone)]
pub struct WallClock {
    start: Instant,
}

impl WallClock {
    pub fn new() -> WallClock {
        WallClock {
            start: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        WallClock::new()
    }
}

impl Clock for WallClock {
    fn time(&self) -> Duration {
        self.start.elapsed()
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
