//! JSON scenario files: a world time, an optional encounter, and actors with effects.

use std::path::Path;

use serde::Deserialize;
use wz_core::{Combat, Combatant, WorldClock};
use wz_effects::Actor;

/// On-disk form of a scenario.
#[derive(Debug, Deserialize)]
struct ScenarioFile {
    #[serde(default)]
    world_time: f64,
    #[serde(default)]
    combat: Option<CombatFile>,
    #[serde(default)]
    actors: Vec<Actor>,
}

#[derive(Debug, Deserialize)]
struct CombatFile {
    #[serde(default)]
    active: bool,
    #[serde(default)]
    round: u32,
    #[serde(default)]
    turn: usize,
    #[serde(default)]
    combatants: Vec<CombatantFile>,
}

#[derive(Debug, Deserialize)]
struct CombatantFile {
    name: String,
    #[serde(default)]
    initiative: Option<f64>,
    #[serde(default)]
    modifier: i32,
}

/// A loaded, validated scenario.
#[derive(Debug)]
pub struct Scenario {
    pub clock: WorldClock,
    pub combat: Option<Combat>,
    pub actors: Vec<Actor>,
}

impl Scenario {
    /// Read and validate a scenario file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        Self::parse(&content).map_err(|e| format!("{}: {e}", path.display()))
    }

    /// Parse and validate scenario JSON.
    pub fn parse(content: &str) -> Result<Self, String> {
        let file: ScenarioFile =
            serde_json::from_str(content).map_err(|e| format!("invalid scenario: {e}"))?;

        if !file.world_time.is_finite() || file.world_time < 0.0 {
            return Err(format!(
                "world_time must be a non-negative number, got {}",
                file.world_time
            ));
        }

        let combat = file.combat.map(build_combat).transpose()?;

        let mut actors = file.actors;
        for actor in &mut actors {
            actor.claim_effects();
        }
        tracing::debug!(
            actors = actors.len(),
            combat = combat.is_some(),
            "scenario loaded"
        );

        Ok(Self {
            clock: WorldClock::new(file.world_time),
            combat,
            actors,
        })
    }

    /// Total number of effects across all actors.
    pub fn effect_count(&self) -> usize {
        self.actors.iter().map(|a| a.effects().len()).sum()
    }
}

fn build_combat(file: CombatFile) -> Result<Combat, String> {
    if file.active && file.combatants.is_empty() {
        return Err("combat is active but has no combatants".into());
    }
    let mut combat = Combat::new();
    for c in file.combatants {
        let mut combatant = Combatant::new(c.name).with_modifier(c.modifier);
        combatant.initiative = c.initiative;
        combat.add_combatant(combatant);
    }
    combat.resume(file.round, file.turn, file.active);
    Ok(combat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wz_core::{ClockProvider, TurnOrder};

    #[test]
    fn parse_full_scenario() {
        let scenario = Scenario::parse(
            r#"{
                "world_time": 12,
                "combat": {
                    "active": true, "round": 1, "turn": 1,
                    "combatants": [
                        { "name": "Valeros", "initiative": 18 },
                        { "name": "Goblin", "initiative": 9 }
                    ]
                },
                "actors": [{
                    "name": "Valeros",
                    "effects": [{
                        "name": "Bless",
                        "duration": { "unit": "minutes", "value": 1 },
                        "start": { "value": 0, "initiative": 18 }
                    }]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(scenario.clock.world_time(), 12.0);
        let combat = scenario.combat.as_ref().unwrap();
        assert!(combat.is_active());
        assert_eq!(combat.current_combatant().unwrap().name, "Goblin");
        assert_eq!(scenario.effect_count(), 1);
        let actor = &scenario.actors[0];
        assert_eq!(actor.effects()[0].actor, Some(actor.id));
    }

    #[test]
    fn empty_object_is_a_valid_scenario() {
        let scenario = Scenario::parse("{}").unwrap();
        assert!(scenario.combat.is_none());
        assert!(scenario.actors.is_empty());
    }

    #[test]
    fn rejects_negative_world_time() {
        let err = Scenario::parse(r#"{"world_time": -5}"#).unwrap_err();
        assert!(err.contains("non-negative"));
    }

    #[test]
    fn rejects_active_combat_without_combatants() {
        let err = Scenario::parse(r#"{"combat": {"active": true}}"#).unwrap_err();
        assert!(err.contains("no combatants"));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = Scenario::parse("{ not json").unwrap_err();
        assert!(err.starts_with("invalid scenario"));
    }
}
