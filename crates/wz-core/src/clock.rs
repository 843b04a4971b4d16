use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// In-world seconds that pass during one combat round.
pub const SECONDS_PER_ROUND: f64 = 6.0;

/// Anything that can report the current in-world time.
///
/// World time is a continuous in-fiction clock measured in seconds. It is
/// independent of wall-clock time and never decreases.
pub trait ClockProvider {
    /// Current in-world timestamp in seconds.
    fn world_time(&self) -> f64;
}

/// A monotonic in-world clock.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldClock {
    world_time: f64,
}

impl WorldClock {
    /// Create a clock positioned at the given world time.
    pub fn new(world_time: f64) -> Self {
        Self { world_time }
    }

    /// Move the clock forward by `seconds`. Returns the new world time.
    pub fn advance(&mut self, seconds: f64) -> CoreResult<f64> {
        if seconds < 0.0 || seconds.is_nan() {
            return Err(CoreError::ClockRewind(seconds));
        }
        self.world_time += seconds;
        tracing::trace!(world_time = self.world_time, "clock advanced");
        Ok(self.world_time)
    }

    /// Move the clock forward by whole combat rounds.
    pub fn advance_rounds(&mut self, rounds: u32) -> f64 {
        self.world_time += f64::from(rounds) * SECONDS_PER_ROUND;
        self.world_time
    }
}

impl ClockProvider for WorldClock {
    fn world_time(&self) -> f64 {
        self.world_time
    }
}

impl ClockProvider for f64 {
    fn world_time(&self) -> f64 {
        *self
    }
}
