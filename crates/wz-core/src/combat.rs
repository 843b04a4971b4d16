//! Combat encounters and turn order.
//!
//! A [`Combat`] keeps its combatants sorted by initiative and exposes the
//! resulting order through the [`TurnOrder`] trait, which is all the effect
//! evaluator ever sees of an encounter.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::error::{CoreError, CoreResult};

/// One slot in the turn order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// The combatant acting in this slot.
    pub combatant: EntityId,
    /// Display name of the combatant.
    pub name: String,
    /// Initiative score, if one has been rolled or set.
    pub initiative: Option<f64>,
}

/// Read access to an encounter's turn order.
pub trait TurnOrder {
    /// Whether the encounter is currently running.
    fn is_active(&self) -> bool;

    /// The turn list in acting order.
    fn turns(&self) -> &[Turn];

    /// Index of the current turn. May point past the end of [`Self::turns`].
    fn turn(&self) -> usize;

    /// The combatant whose turn it is, if the pointer is in range.
    fn current_combatant(&self) -> Option<&Turn> {
        self.turns().get(self.turn())
    }
}

/// A participant in an encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    /// Unique identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Initiative score (higher goes first). `None` until rolled.
    pub initiative: Option<f64>,
    /// Bonus added to the d20 when initiative is rolled.
    pub initiative_modifier: i32,
}

impl Combatant {
    /// Create a combatant with no initiative yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            initiative: None,
            initiative_modifier: 0,
        }
    }

    /// Set a fixed initiative score.
    pub fn with_initiative(mut self, initiative: f64) -> Self {
        self.initiative = Some(initiative);
        self
    }

    /// Set the modifier used when initiative is rolled.
    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.initiative_modifier = modifier;
        self
    }
}

/// The state of a combat encounter.
#[derive(Debug, Clone, Default)]
pub struct Combat {
    combatants: Vec<Combatant>,
    /// Turn list sorted by initiative (descending, unrolled last).
    turns: Vec<Turn>,
    /// Current round number (1-based, 0 = not started).
    round: u32,
    turn: usize,
    active: bool,
}

impl Combat {
    /// Create an empty, inactive encounter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a combatant. Returns its id.
    pub fn add_combatant(&mut self, combatant: Combatant) -> EntityId {
        let id = combatant.id;
        self.combatants.push(combatant);
        self.sort_initiative();
        id
    }

    /// Look up a combatant by id.
    pub fn combatant(&self, id: EntityId) -> CoreResult<&Combatant> {
        self.combatants
            .iter()
            .find(|c| c.id == id)
            .ok_or(CoreError::CombatantNotFound(id))
    }

    /// All combatants in insertion order.
    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    /// Set (or clear) a combatant's initiative and re-sort the turn order.
    pub fn set_initiative(&mut self, id: EntityId, initiative: Option<f64>) -> CoreResult<()> {
        let combatant = self
            .combatants
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CoreError::CombatantNotFound(id))?;
        combatant.initiative = initiative;
        self.sort_initiative();
        Ok(())
    }

    /// Roll d20 + modifier for every combatant without an initiative score.
    ///
    /// Returns the rolled scores in insertion order. An encounter already
    /// under way keeps the current combatant's turn.
    pub fn roll_initiative<R: Rng>(&mut self, rng: &mut R) -> Vec<(EntityId, f64)> {
        let mut rolled = Vec::new();
        for combatant in self.combatants.iter_mut().filter(|c| c.initiative.is_none()) {
            let die: i32 = rng.random_range(1..=20);
            let score = f64::from(die + combatant.initiative_modifier);
            combatant.initiative = Some(score);
            tracing::debug!(combatant = %combatant.name, die, score, "rolled initiative");
            rolled.push((combatant.id, score));
        }
        self.sort_initiative();
        rolled
    }

    /// Begin the encounter at round 1 with the highest initiative acting.
    pub fn start(&mut self) -> CoreResult<()> {
        if self.combatants.is_empty() {
            return Err(CoreError::EmptyCombat);
        }
        self.sort_initiative();
        self.round = 1;
        self.turn = 0;
        self.active = true;
        Ok(())
    }

    /// Place the turn pointer directly, e.g. when restoring a saved encounter.
    ///
    /// The pointer is not bounds checked: a turn past the end of the list
    /// is a legal state meaning "between rounds".
    pub fn resume(&mut self, round: u32, turn: usize, active: bool) {
        self.sort_initiative();
        self.round = round;
        self.turn = turn;
        self.active = active;
    }

    /// Advance to the next turn. Returns true if a new round started.
    pub fn next_turn(&mut self) -> CoreResult<bool> {
        if !self.active {
            return Err(CoreError::CombatNotStarted);
        }
        if self.turns.is_empty() {
            return Err(CoreError::EmptyCombat);
        }
        self.turn += 1;
        if self.turn >= self.turns.len() {
            self.turn = 0;
            self.round += 1;
            tracing::debug!(round = self.round, "new combat round");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Stop the encounter. The turn order is kept for inspection.
    pub fn end(&mut self) {
        self.active = false;
    }

    /// Get the current round number.
    pub fn current_round(&self) -> u32 {
        self.round
    }

    /// Rebuild the turn list. During an active encounter the pointer stays
    /// on whoever was acting.
    fn sort_initiative(&mut self) {
        let acting = self
            .turns
            .get(self.turn)
            .filter(|_| self.active)
            .map(|t| t.combatant);
        let mut order: Vec<&Combatant> = self.combatants.iter().collect();
        order.sort_by(|a, b| {
            let a = a.initiative.unwrap_or(f64::NEG_INFINITY);
            let b = b.initiative.unwrap_or(f64::NEG_INFINITY);
            b.total_cmp(&a)
        });
        self.turns = order
            .into_iter()
            .map(|c| Turn {
                combatant: c.id,
                name: c.name.clone(),
                initiative: c.initiative,
            })
            .collect();
        if let Some(pos) = acting.and_then(|id| self.turns.iter().position(|t| t.combatant == id)) {
            self.turn = pos;
        }
    }
}

impl TurnOrder for Combat {
    fn is_active(&self) -> bool {
        self.active
    }

    fn turns(&self) -> &[Turn] {
        &self.turns
    }

    fn turn(&self) -> usize {
        self.turn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn party() -> Combat {
        let mut combat = Combat::new();
        combat.add_combatant(Combatant::new("Alice").with_initiative(15.0));
        combat.add_combatant(Combatant::new("Bob").with_initiative(10.0));
        combat.add_combatant(Combatant::new("Charlie").with_initiative(20.0));
        combat
    }

    #[test]
    fn combat_lifecycle() {
        let mut combat = party();
        assert!(!combat.is_active());
        assert_eq!(combat.current_round(), 0);

        combat.start().unwrap();
        assert!(combat.is_active());
        assert_eq!(combat.current_round(), 1);

        // Charlie has highest initiative (20)
        assert_eq!(combat.current_combatant().unwrap().name, "Charlie");

        assert!(!combat.next_turn().unwrap());
        assert_eq!(combat.current_combatant().unwrap().name, "Alice");

        assert!(!combat.next_turn().unwrap());
        assert_eq!(combat.current_combatant().unwrap().name, "Bob");

        // Wraps to round 2
        assert!(combat.next_turn().unwrap());
        assert_eq!(combat.current_round(), 2);
        assert_eq!(combat.current_combatant().unwrap().name, "Charlie");

        combat.end();
        assert!(!combat.is_active());
    }

    #[test]
    fn unrolled_combatants_act_last() {
        let mut combat = party();
        combat.add_combatant(Combatant::new("Dana"));
        let names: Vec<_> = combat.turns().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Charlie", "Alice", "Bob", "Dana"]);
    }

    #[test]
    fn start_empty_combat_fails() {
        let mut combat = Combat::new();
        assert!(matches!(combat.start(), Err(CoreError::EmptyCombat)));
    }

    #[test]
    fn next_turn_requires_start() {
        let mut combat = party();
        assert!(matches!(
            combat.next_turn(),
            Err(CoreError::CombatNotStarted)
        ));
    }

    #[test]
    fn resume_allows_pointer_past_end() {
        let mut combat = party();
        combat.resume(2, 5, true);
        assert_eq!(combat.turn(), 5);
        assert!(combat.current_combatant().is_none());
    }

    #[test]
    fn set_initiative_resorts() {
        let mut combat = party();
        let bob = combat.turns()[2].combatant;
        combat.set_initiative(bob, Some(25.0)).unwrap();
        assert_eq!(combat.turns()[0].name, "Bob");
    }

    #[test]
    fn set_initiative_unknown_combatant() {
        let mut combat = party();
        let missing = EntityId::new();
        assert!(matches!(
            combat.set_initiative(missing, Some(1.0)),
            Err(CoreError::CombatantNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn roll_initiative_only_fills_missing_scores() {
        let mut combat = Combat::new();
        let fixed = combat.add_combatant(Combatant::new("Fixed").with_initiative(30.0));
        let rolled = combat.add_combatant(Combatant::new("Rolled").with_modifier(5));
        let mut rng = StdRng::seed_from_u64(42);

        let results = combat.roll_initiative(&mut rng);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, rolled);
        assert!((6.0..=25.0).contains(&results[0].1));
        assert_eq!(combat.combatant(fixed).unwrap().initiative, Some(30.0));
        assert_eq!(combat.turns()[0].combatant, fixed);
    }

    #[test]
    fn rolling_mid_combat_keeps_the_acting_combatant() {
        let mut combat = Combat::new();
        combat.add_combatant(Combatant::new("Valeros").with_initiative(18.0));
        combat.add_combatant(Combatant::new("Goblin").with_initiative(9.0));
        combat.add_combatant(Combatant::new("Latecomer").with_modifier(50));
        combat.resume(1, 1, true);
        assert_eq!(combat.current_combatant().unwrap().name, "Goblin");

        let mut rng = StdRng::seed_from_u64(42);
        combat.roll_initiative(&mut rng);
        assert_eq!(combat.turns()[0].name, "Latecomer");
        assert_eq!(combat.turn(), 2);
        assert_eq!(combat.current_combatant().unwrap().name, "Goblin");
    }

    #[test]
    fn set_initiative_keeps_the_acting_combatant() {
        let mut combat = party();
        combat.start().unwrap();
        let charlie = combat.current_combatant().unwrap().combatant;
        combat.set_initiative(charlie, Some(1.0)).unwrap();
        assert_eq!(combat.current_combatant().unwrap().name, "Charlie");
        assert_eq!(combat.turn(), 2);
    }

    #[test]
    fn roll_initiative_is_deterministic_per_seed() {
        let roll = || {
            let mut combat = Combat::new();
            combat.add_combatant(Combatant::new("A"));
            combat.add_combatant(Combatant::new("B").with_modifier(2));
            let mut rng = StdRng::seed_from_u64(7);
            combat
                .roll_initiative(&mut rng)
                .into_iter()
                .map(|(_, score)| score)
                .collect::<Vec<_>>()
        };
        assert_eq!(roll(), roll());
    }
}
