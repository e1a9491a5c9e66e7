//! `sphere providers` - roster and key presence.
//!
//! Reads the config and the environment only; no provider is called.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use intelsphere_infra::llm::provider_statuses;
use intelsphere_infra::secret::KeySource;
use intelsphere_types::config::GlobalConfig;
use intelsphere_types::llm::ProviderStatus;

/// Print every roster slot with its model, key env var and key presence.
pub fn list_providers(config: &GlobalConfig, keys: &dyn KeySource, json: bool) -> Result<()> {
    let statuses = provider_statuses(&config.providers, keys);

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("Provider Roster").bold());
    println!();
    println!("{}", roster_table(&statuses));
    println!();

    let ready = statuses.iter().filter(|s| s.enabled && s.key_present).count();
    let ready_styled = if ready == 0 {
        style(ready).red().bold()
    } else {
        style(ready).green().bold()
    };
    println!(
        "  {ready_styled} of {} provider{} ready",
        statuses.len(),
        if statuses.len() == 1 { "" } else { "s" }
    );
    if ready < statuses.len() {
        println!(
            "  {}",
            style("Set the missing environment variables to enable more providers.").dim()
        );
    }
    println!();

    Ok(())
}

fn roster_table(statuses: &[ProviderStatus]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Provider").fg(Color::White),
        Cell::new("Type").fg(Color::White),
        Cell::new("Model").fg(Color::White),
        Cell::new("Key").fg(Color::White),
        Cell::new("Status").fg(Color::White),
    ]);

    for status in statuses {
        let state_cell = match (status.enabled, status.key_present) {
            (false, _) => Cell::new("disabled").fg(Color::DarkGrey),
            (true, true) => Cell::new("ready").fg(Color::Green),
            (true, false) => Cell::new("no key").fg(Color::Red),
        };

        table.add_row(vec![
            Cell::new(&status.label).fg(Color::Cyan),
            Cell::new(status.kind.to_string()).fg(Color::DarkGrey),
            Cell::new(&status.model).fg(Color::DarkGrey),
            Cell::new(&status.api_key_env).fg(Color::White),
            state_cell,
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use intelsphere_infra::secret::StaticKeySource;

    #[test]
    fn test_roster_table_lists_every_slot() {
        let config = GlobalConfig::default();
        let keys = StaticKeySource::new().with_key("OPENAI_API_KEY", "sk-test");
        let statuses = provider_statuses(&config.providers, &keys);

        let rendered = roster_table(&statuses).to_string();
        for status in &statuses {
            assert!(rendered.contains(&status.label));
        }
        assert!(rendered.contains("ready"));
        assert!(rendered.contains("no key"));
    }
}
