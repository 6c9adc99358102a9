use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use planet_finder::{
    AttributeKey, PlanetFinderConfig, QueryRecord, attribute_names, match_bulk_file, match_query,
};
use tracing_subscriber::EnvFilter;

/// Match partial exoplanet descriptions against a reference catalog.
#[derive(Debug, Parser)]
#[command(name = "planet-finder", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Find the catalog record closest to one query.
    Match {
        /// Catalog JSON file. Overrides `catalog.path` from the config.
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// YAML configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Query attribute, e.g. `--field planetName=Kepler-22b`. Repeatable.
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(AttributeKey, String)>,
    },
    /// Match every row of a CSV file.
    Bulk {
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// CSV file with a header row.
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the attribute keys in schema order.
    Schema,
}

fn parse_field(raw: &str) -> Result<(AttributeKey, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
    let key = key.parse::<AttributeKey>().map_err(|err| err.to_string())?;
    Ok((key, value.to_string()))
}

fn load_config(
    path: Option<&PathBuf>,
    catalog: Option<PathBuf>,
) -> anyhow::Result<PlanetFinderConfig> {
    let mut cfg = match path {
        Some(path) => PlanetFinderConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlanetFinderConfig::default(),
    };
    if let Some(catalog) = catalog {
        cfg.catalog.path = catalog;
    }
    Ok(cfg)
}

fn init_tracing(cfg: &PlanetFinderConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cfg.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Match {
            catalog,
            config,
            fields,
        } => {
            let cfg = load_config(config.as_ref(), catalog)?;
            init_tracing(&cfg);
            let query = QueryRecord::from_pairs(fields);
            let result = match_query(&cfg, &query)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Bulk {
            catalog,
            input,
            config,
        } => {
            let cfg = load_config(config.as_ref(), catalog)?;
            init_tracing(&cfg);
            let results = match_bulk_file(&cfg, &input)
                .with_context(|| format!("matching {}", input.display()))?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Schema => {
            for name in attribute_names() {
                println!("{name}");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn field_parses_key_and_value() {
        assert_eq!(
            parse_field("planetName=Kepler-22b"),
            Ok((AttributeKey::PlanetName, "Kepler-22b".to_string()))
        );
        assert_eq!(
            parse_field("hostName=a=b"),
            Ok((AttributeKey::HostName, "a=b".to_string()))
        );
    }

    #[test]
    fn unknown_field_rejected() {
        assert!(parse_field("koi_score=1").is_err());
        assert!(parse_field("planetName").is_err());
    }
}
