//! `sphere ask` - one aggregation from the terminal.

use anyhow::{Result, anyhow};
use console::style;

use intelsphere_core::aggregate::{AggregateOptions, AggregateReport};
use intelsphere_core::prompt::Personality;

use crate::state::AppState;

/// Run `prompt` through every provider and print the combined answer.
///
/// Fails with the aggregate error (including per-provider credential hints)
/// when no provider answers.
pub async fn ask(state: &AppState, prompt: &str, personality: &str, json: bool) -> Result<()> {
    let personality: Personality = personality.parse().map_err(|e: String| anyhow!(e))?;

    let report = state
        .aggregator
        .run(
            prompt,
            &AggregateOptions::with_system(personality.system_prompt()),
        )
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report, personality);
    Ok(())
}

fn print_report(report: &AggregateReport, personality: Personality) {
    println!();
    println!(
        "  {} {}/{} providers responded {}",
        style("◆").cyan().bold(),
        style(report.successful_models).green().bold(),
        report.models_processed,
        style(format!("({personality}, {})", report.query_id)).dim()
    );

    for response in &report.responses {
        println!();
        println!(
            "  {} {}",
            style(&response.provider).cyan().bold(),
            style(format!("{} · {}ms", response.model, response.latency_ms)).dim()
        );
        for line in response.response.trim().lines() {
            println!("  {line}");
        }
    }

    if !report.failures.is_empty() {
        println!();
        println!("  {}", style("── Failed ──").dim());
        for failure in &report.failures {
            let marker = if failure.credential {
                style("✗").yellow()
            } else {
                style("✗").red()
            };
            println!(
                "  {} {}: {}",
                marker,
                failure.provider,
                style(&failure.error).dim()
            );
        }
    }
    println!();
}
