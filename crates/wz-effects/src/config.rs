/// Configuration for an [`EffectTracker`](crate::tracker::EffectTracker).
#[derive(Debug, Clone, Default)]
pub struct TrackerConfig {
    /// Drop effects from the tracker as soon as they are reported expired.
    pub auto_remove_expired: bool,
}

impl TrackerConfig {
    /// Set whether expired effects are dropped after being reported.
    pub fn with_auto_remove_expired(mut self, enabled: bool) -> Self {
        self.auto_remove_expired = enabled;
        self
    }
}
