//! Handler for the `config` command group.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Load the config file, or defaults when it does not exist.
#[allow(clippy::result_large_err)]
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path)
    } else {
        Config::parse_toml("")
    }
}

fn join_ids<T: ToString>(ids: &[T]) -> String {
    if ids.is_empty() {
        "(from fixture)".to_string()
    } else {
        ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    }
}

/// Execute `config show`.
#[allow(clippy::result_large_err)]
pub fn execute_show(path: &Path) -> Result<()> {
    let config = load_or_default(path)?;
    if !path.exists() {
        output::note(&format!("{} not found, showing defaults", path.display()));
    }
    show(&config)
}

#[allow(clippy::result_large_err)]
fn show(config: &Config) -> Result<()> {
    let policy = config.policy()?;

    output::section("Effective Configuration");
    output::field("Log level", &config.logging.level);
    output::field("Log format", &config.logging.format);

    output::section("Engine");
    output::field("Grouping mode", policy.grouping_mode);
    output::field("Volume ratio", policy.min_undercut_volume_ratio);
    output::field("Min units", policy.min_undercut_units);
    output::field("Expiry window", format!("{} days", policy.expiry_refresh_days));
    output::field("Max workers", config.engine.max_workers);

    output::section("Roster");
    output::field("Characters", join_ids(&config.roster.seller_characters));
    output::field("Stations", join_ids(&config.roster.tracked_stations));

    output::section("Structure");
    match config.structure.as_ref().map(|s| s.venue()) {
        Some(venue) => {
            output::field("Id", venue.id);
            output::field("Name", &venue.name);
            output::field(
                "Auth character",
                venue
                    .auth_character
                    .map_or_else(|| "(snapshot only)".to_string(), |c| c.to_string()),
            );
        }
        None => output::note("(none configured)"),
    }

    output::section("Fees");
    output::field("Sales tax", config.fees.sales_tax);
    output::field("Broker fee", config.fees.broker_fee);
    output::field("Contracts", config.fees.contracts);

    output::section("ESI");
    output::field("Base URL", &config.esi.base_url);
    output::field("User agent", &config.esi.user_agent);
    output::field("Timeout", format!("{}ms", config.esi.timeout_ms));
    output::field("Retries", config.esi.retry_max_attempts);
    if config.esi.access_token.is_some() {
        output::success("Access token loaded from ESI_ACCESS_TOKEN");
    } else {
        output::warning("ESI_ACCESS_TOKEN not set; structure books come from snapshots");
    }

    Ok(())
}

/// Execute `config validate`.
#[allow(clippy::result_large_err)]
pub fn execute_validate(path: &Path) -> Result<()> {
    output::section("Config Validation");
    output::field("Path", path.display());
    let config = Config::load(path)?;
    output::success("Config file is valid");

    if config.roster.seller_characters.is_empty() {
        output::warning("No seller characters in [roster]; runs cover every fixture character");
    }
    if config.roster.tracked_stations.is_empty() {
        output::warning("No tracked stations in [roster]; runs cover every fixture station");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn validate_accepts_minimal_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relister.toml");
        fs::write(&path, "[engine]\ngrouping_mode = \"global\"\n").unwrap();

        assert!(execute_validate(&path).is_ok());
    }

    #[test]
    fn validate_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(execute_validate(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn show_works_without_a_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(execute_show(&dir.path().join("absent.toml")).is_ok());
    }
}
