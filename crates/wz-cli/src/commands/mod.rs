pub mod check;
pub mod evaluate;
pub mod simulate;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use wz_effects::{Actor, EvaluationContext};

/// Render seconds of world time compactly ("90s", "1h 30m", "unlimited").
fn format_seconds(seconds: f64) -> String {
    if seconds.is_infinite() {
        return "unlimited".into();
    }
    let sign = if seconds < 0.0 { "-" } else { "" };
    let total = seconds.abs();
    if total < 60.0 {
        return format!("{sign}{total}s");
    }
    let whole = total.floor() as u64;
    let (days, rest) = (whole / 86_400, whole % 86_400);
    let (hours, rest) = (rest / 3_600, rest % 3_600);
    let (minutes, secs) = (rest / 60, rest % 60);
    let parts: Vec<String> = [(days, "d"), (hours, "h"), (minutes, "m"), (secs, "s")]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| format!("{n}{unit}"))
        .collect();
    format!("{sign}{}", parts.join(" "))
}

/// Build a table of every effect on every actor, evaluated in `ctx`.
fn effects_table(actors: &[Actor], ctx: &EvaluationContext<'_>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Actor",
        "Effect",
        "Duration",
        "Total",
        "Remaining",
        "Status",
    ]);

    for actor in actors {
        for effect in actor.effects() {
            let expiration = effect.remaining_duration(ctx);
            let status = if expiration.expired {
                "expired".red().bold().to_string()
            } else {
                "active".green().to_string()
            };
            table.add_row(vec![
                actor.name.clone(),
                effect.name.clone(),
                effect.duration().to_string(),
                format_seconds(effect.total_duration()),
                format_seconds(expiration.remaining),
                status,
            ]);
        }
    }
    table
}
