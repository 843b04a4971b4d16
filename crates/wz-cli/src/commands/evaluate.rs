use std::path::Path;

use colored::Colorize;
use wz_core::ClockProvider;
use wz_effects::EvaluationContext;

use crate::scenario::Scenario;

pub fn run(path: &Path, at: Option<f64>) -> Result<(), String> {
    let scenario = Scenario::load(path)?;

    if scenario.effect_count() == 0 {
        println!("  No effects found.");
        return Ok(());
    }

    let world_time = at.unwrap_or_else(|| scenario.clock.world_time());
    let mut ctx = EvaluationContext::new(&world_time);
    if let Some(combat) = &scenario.combat {
        ctx = ctx.with_combat(combat);
    }

    let expired = scenario
        .actors
        .iter()
        .flat_map(|a| a.effects())
        .filter(|e| e.remaining_duration(&ctx).expired)
        .count();

    println!(
        "  {} {}",
        "Effects".bold(),
        format!("(world time {world_time}s)").dimmed()
    );
    println!();
    println!("{}", super::effects_table(&scenario.actors, &ctx));
    println!();
    println!(
        "  {} effects, {} expired",
        scenario.effect_count(),
        expired
    );
    Ok(())
}
