use serde::{Deserialize, Serialize};
use wz_core::{ClockProvider, TurnOrder};

/// When an effect began: the world time and the acting combatant's initiative.
///
/// Stamped once at creation. Fields are read-only after that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StartRecord {
    value: f64,
    #[serde(default)]
    initiative: Option<f64>,
}

impl StartRecord {
    /// Rebuild a start record from stored data.
    pub fn new(value: f64, initiative: Option<f64>) -> Self {
        Self { value, initiative }
    }

    /// Stamp a start record from the current clock and encounter.
    ///
    /// The initiative is taken from the turn-pointer slot whenever an
    /// encounter exists and the pointer is in range, running or not.
    pub fn capture(clock: &impl ClockProvider, combat: Option<&dyn TurnOrder>) -> Self {
        let initiative = combat
            .filter(|c| c.turns().len() > c.turn())
            .and_then(|c| c.turns()[c.turn()].initiative);
        let record = Self {
            value: clock.world_time(),
            initiative,
        };
        tracing::debug!(
            world_time = record.value,
            initiative = ?record.initiative,
            "captured effect start"
        );
        record
    }

    /// World time at creation.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Initiative of the combatant acting at creation, if any.
    pub fn initiative(&self) -> Option<f64> {
        self.initiative
    }
}
