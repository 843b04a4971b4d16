use std::collections::HashMap;
use std::path::Path;

use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wz_core::{ClockProvider, EntityId, TurnOrder};
use wz_effects::{EffectTracker, EvaluationContext, ExpiryNotice, Prepare, TrackerConfig};

use crate::scenario::Scenario;

/// Settings for a combat simulation run.
#[derive(Debug, Clone)]
pub struct SimulateOptions {
    /// Number of full rounds to play.
    pub rounds: u32,
    /// RNG seed for initiative rolls.
    pub seed: u64,
    /// Delete effects from their actors once they expire.
    pub remove_expired: bool,
}

pub fn run(path: &Path, options: &SimulateOptions) -> Result<(), String> {
    let Scenario {
        mut clock,
        combat,
        mut actors,
    } = Scenario::load(path)?;
    let mut combat = combat.ok_or("scenario has no combat to simulate")?;

    let mut rng = StdRng::seed_from_u64(options.seed);
    let rolled = combat.roll_initiative(&mut rng);
    for (id, score) in &rolled {
        if let Ok(c) = combat.combatant(*id) {
            println!("  {} rolls initiative {}", c.name, score);
        }
    }

    if !combat.is_active() {
        combat
            .start()
            .map_err(|e| format!("cannot start combat: {e}"))?;
    }

    let names: HashMap<EntityId, String> = actors.iter().map(|a| (a.id, a.name.clone())).collect();
    let mut tracker = EffectTracker::new(
        TrackerConfig::default().with_auto_remove_expired(options.remove_expired),
    );
    for actor in &mut actors {
        actor.prepare_data(&mut tracker);
    }

    println!(
        "  {} {}",
        "Simulation".bold(),
        format!(
            "({} rounds, seed={}, {} effects tracked)",
            options.rounds,
            options.seed,
            tracker.len()
        )
        .dimmed()
    );
    println!();

    let mut expired_total = 0;
    let mut rounds_played = 0;
    loop {
        let label = turn_label(&combat, clock.world_time());
        let ctx = EvaluationContext::new(&clock).with_combat(&combat);
        let notices = tracker.refresh(&ctx);
        expired_total += notices.len();
        report(&label, &notices, &names);
        if options.remove_expired {
            remove_expired(&mut actors, &notices, &mut tracker)?;
        }

        if rounds_played >= options.rounds {
            break;
        }
        let new_round = combat
            .next_turn()
            .map_err(|e| format!("combat error: {e}"))?;
        if new_round {
            clock.advance_rounds(1);
            rounds_played += 1;
        }
    }

    combat.end();
    let notices = tracker.end_encounter();
    expired_total += notices.len();
    for notice in &notices {
        if let Some(actor) = notice.actor.and_then(|id| actors.iter_mut().find(|a| a.id == id)) {
            if let Ok(effect) = actor.effect_mut(notice.effect) {
                effect.set_expired(true);
            }
        }
    }
    report("encounter ended", &notices, &names);
    if options.remove_expired {
        remove_expired(&mut actors, &notices, &mut tracker)?;
    }

    println!();
    println!(
        "  {} effects expired, world time now {}s",
        expired_total,
        clock.world_time()
    );

    if actors.iter().any(|a| !a.effects().is_empty()) {
        println!();
        println!("  {}", "Remaining Effects".bold().underline());
        println!();
        let ctx = EvaluationContext::new(&clock);
        println!("{}", super::effects_table(&actors, &ctx));
    }
    Ok(())
}

fn turn_label(combat: &impl TurnOrder, world_time: f64) -> String {
    let who = combat
        .current_combatant()
        .map(|t| match t.initiative {
            Some(init) => format!("{} ({init})", t.name),
            None => t.name.clone(),
        })
        .unwrap_or_else(|| "-".into());
    format!("t={world_time}s {who}")
}

fn report(label: &str, notices: &[ExpiryNotice], names: &HashMap<EntityId, String>) {
    for notice in notices {
        let owner = notice
            .actor
            .and_then(|id| names.get(&id))
            .map(String::as_str)
            .unwrap_or("?");
        println!(
            "  {} {}  {} on {}",
            format!("[{label}]").dimmed(),
            "EXPIRED".red().bold(),
            notice.name,
            owner
        );
    }
}

fn remove_expired(
    actors: &mut [wz_effects::Actor],
    notices: &[ExpiryNotice],
    tracker: &mut EffectTracker,
) -> Result<(), String> {
    for notice in notices {
        let Some(actor) = notice.actor.and_then(|id| actors.iter_mut().find(|a| a.id == id)) else {
            continue;
        };
        actor
            .delete_effect(notice.effect, tracker)
            .map_err(|e| format!("cannot remove {}: {e}", notice.name))?;
    }
    Ok(())
}
