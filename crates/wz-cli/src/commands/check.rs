use std::path::Path;

use colored::Colorize;
use wz_core::{ClockProvider, TurnOrder};

use crate::scenario::Scenario;

pub fn run(path: &Path) -> Result<(), String> {
    let scenario = Scenario::load(path)?;

    println!(
        "  {} {}",
        "Scenario".bold(),
        path.display().to_string().dimmed()
    );
    println!("  World time: {}s", scenario.clock.world_time());
    println!(
        "  {} actors, {} effects",
        scenario.actors.len(),
        scenario.effect_count()
    );
    match &scenario.combat {
        Some(combat) => println!(
            "  Combat: {} (round {}, {} combatants)",
            if combat.is_active() { "active" } else { "inactive" },
            combat.current_round(),
            combat.turns().len()
        ),
        None => println!("  Combat: none"),
    }
    println!();
    println!("  {}", "All checks passed.".green());
    Ok(())
}
