use crate::entity::EntityId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the clock and combat model.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// World time only moves forward.
    #[error("world time cannot move backwards (advance by {0})")]
    ClockRewind(f64),

    /// The requested combatant is not part of the encounter.
    #[error("combatant not found: {0}")]
    CombatantNotFound(EntityId),

    /// A turn operation was attempted before the encounter started.
    #[error("combat has not started")]
    CombatNotStarted,

    /// The encounter has nobody in it.
    #[error("combat has no combatants")]
    EmptyCombat,
}
