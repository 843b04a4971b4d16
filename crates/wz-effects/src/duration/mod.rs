//! Effect durations: units, expiry modes, and normalization.
//!
//! A [`DurationConfig`] is always kept normalized. Unlimited and encounter
//! durations never carry an [`Expiry`], concrete time units always do, and
//! the `-1` "one indefinite unit" sentinel is stored as `1`.

pub mod evaluate;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use evaluate::{EvaluationContext, Expiration, remaining_duration, total_duration};

/// The unit an effect's duration is measured in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DurationUnit {
    /// Never expires on its own.
    Unlimited,
    /// Lasts until the encounter ends.
    Encounter,
    /// Combat rounds of 6 seconds.
    Rounds,
    /// Minutes of world time.
    Minutes,
    /// Hours of world time.
    Hours,
    /// Days of world time.
    Days,
    /// A unit this crate does not know. Its multiplier is 0.
    Unrecognized(String),
}

impl DurationUnit {
    /// Parse a unit name. Unknown names are preserved as [`Self::Unrecognized`].
    pub fn parse(s: &str) -> Self {
        match s {
            "unlimited" => Self::Unlimited,
            "encounter" => Self::Encounter,
            "rounds" => Self::Rounds,
            "minutes" => Self::Minutes,
            "hours" => Self::Hours,
            "days" => Self::Days,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// The unit's name as written in effect data.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unlimited => "unlimited",
            Self::Encounter => "encounter",
            Self::Rounds => "rounds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Unrecognized(s) => s,
        }
    }

    /// Returns true for units measured against the world clock.
    ///
    /// Unrecognized units count as concrete: they are normalized like one
    /// and simply evaluate with a zero multiplier.
    pub fn is_concrete(&self) -> bool {
        !matches!(self, Self::Unlimited | Self::Encounter)
    }
}

impl From<String> for DurationUnit {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<DurationUnit> for String {
    fn from(unit: DurationUnit) -> Self {
        unit.as_str().to_string()
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a timed effect ends at the start or the end of the qualifying turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Expiry {
    /// Expires as the qualifying turn begins.
    TurnStart,
    /// Expires once the qualifying turn is over.
    TurnEnd,
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TurnStart => write!(f, "turn-start"),
            Self::TurnEnd => write!(f, "turn-end"),
        }
    }
}

/// How long an effect lasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DurationSource")]
pub struct DurationConfig {
    unit: DurationUnit,
    value: f64,
    expiry: Option<Expiry>,
}

/// Unnormalized duration data as it appears on the wire.
#[derive(Deserialize)]
struct DurationSource {
    unit: DurationUnit,
    #[serde(default)]
    value: f64,
    #[serde(default)]
    expiry: Option<Expiry>,
}

impl From<DurationSource> for DurationConfig {
    fn from(src: DurationSource) -> Self {
        Self::with_expiry(src.unit, src.value, src.expiry)
    }
}

impl DurationConfig {
    /// Create a normalized duration with the default expiry for its unit.
    pub fn new(unit: DurationUnit, value: f64) -> Self {
        Self::with_expiry(unit, value, None)
    }

    /// Create a normalized duration with an explicit expiry mode.
    ///
    /// The expiry is dropped for unlimited and encounter units.
    pub fn with_expiry(unit: DurationUnit, value: f64, expiry: Option<Expiry>) -> Self {
        let mut duration = Self {
            unit,
            value: normalize_value(value),
            expiry,
        };
        duration.prepare_base();
        duration
    }

    /// A duration that never runs out.
    pub fn unlimited() -> Self {
        Self::new(DurationUnit::Unlimited, 0.0)
    }

    /// A duration bound to the current encounter.
    pub fn encounter() -> Self {
        Self::new(DurationUnit::Encounter, 0.0)
    }

    /// The duration unit.
    pub fn unit(&self) -> &DurationUnit {
        &self.unit
    }

    /// The magnitude. Meaningless for unlimited and encounter units.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The expiry mode, present only for concrete units.
    pub fn expiry(&self) -> Option<Expiry> {
        self.expiry
    }

    /// Enforce the expiry invariant for the current unit.
    ///
    /// Runs on every data preparation pass.
    pub fn prepare_base(&mut self) {
        if self.unit.is_concrete() {
            self.expiry.get_or_insert(Expiry::TurnStart);
        } else {
            self.expiry = None;
        }
    }

    /// Apply a partial edit, re-normalizing the result.
    pub fn apply_update(&mut self, update: DurationUpdate) {
        if let Some(unit) = update.unit {
            self.unit = unit;
        }
        if let Some(expiry) = update.expiry {
            self.expiry = expiry;
        }
        if let Some(value) = update.value {
            self.value = normalize_value(value);
        }
        if self.unit == DurationUnit::Unlimited {
            self.expiry = None;
        }
        self.prepare_base();
        tracing::debug!(
            unit = %self.unit,
            value = self.value,
            expiry = ?self.expiry,
            "duration updated"
        );
    }
}

impl fmt::Display for DurationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.unit, self.expiry) {
            (DurationUnit::Unlimited | DurationUnit::Encounter, _) => write!(f, "{}", self.unit),
            (unit, Some(expiry)) => write!(f, "{} {unit} ({expiry})", self.value),
            (unit, None) => write!(f, "{} {unit}", self.value),
        }
    }
}

/// A partial edit to a [`DurationConfig`]. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DurationUpdate {
    /// New unit.
    #[serde(default)]
    pub unit: Option<DurationUnit>,
    /// New magnitude. `-1` is stored as `1`.
    #[serde(default)]
    pub value: Option<f64>,
    /// New expiry mode. `Some(None)` clears it.
    #[serde(default)]
    pub expiry: Option<Option<Expiry>>,
}

impl DurationUpdate {
    /// Change the unit.
    pub fn unit(mut self, unit: DurationUnit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Change the magnitude.
    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Change the expiry mode.
    pub fn expiry(mut self, expiry: Option<Expiry>) -> Self {
        self.expiry = Some(expiry);
        self
    }
}

/// `-1` means "one indefinite unit"; other negatives and NaN collapse to 0.
fn normalize_value(value: f64) -> f64 {
    if value == -1.0 {
        1.0
    } else if value.is_nan() || value < 0.0 {
        0.0
    } else {
        value
    }
}
