//! `catalogue`: offline maintenance for sample registries
//!
//! Usage:
//!   catalogue expand <registry.csv> <field> <value> [--refresh-mirror]
//!   catalogue mirror <file.csv> [file.html]
//!   catalogue list <kind>
//!   catalogue show <kind> <sample-id>

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sample_catalogue::logging::init_logging;
use sample_catalogue::registry::{self, SampleId, REGISTRY_HTML};
use sample_catalogue::config::log_level_from_env;
use sample_catalogue::CatalogueConfig;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "catalogue", about = "Inspect and maintain sample registries")]
struct Args {
    /// Results root (defaults to the environment configuration)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Log level override (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<tracing::Level>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a field to a registry, backfilling existing samples
    Expand {
        /// Path to registry.csv
        registry: PathBuf,
        /// New field name
        field: String,
        /// Value recorded for existing samples
        value: String,
        /// Regenerate registry.html afterwards
        #[arg(long)]
        refresh_mirror: bool,
    },
    /// Render a CSV file as an HTML table
    Mirror {
        /// CSV input
        csv: PathBuf,
        /// HTML output (defaults to the CSV path with an .html extension)
        html: Option<PathBuf>,
    },
    /// List every sample of a kind
    List {
        /// Kind name, e.g. random-gd
        kind: String,
    },
    /// Print one sample's parameters as JSON
    Show {
        /// Kind name, e.g. random-gd
        kind: String,
        /// Sample id, e.g. 10013
        sample: u64,
    },
}

/// Explicit `--root`, or the environment configuration when absent.
fn results_root<F>(explicit: Option<PathBuf>, lookup: F) -> Result<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    match explicit {
        Some(root) => Ok(root),
        None => Ok(CatalogueConfig::from_lookup(lookup)
            .context("resolving the results root (pass --root to override)")?
            .results_root()
            .to_path_buf()),
    }
}

fn kind_dir(root: Option<PathBuf>, kind: &str) -> Result<PathBuf> {
    let root = results_root(root, |key| std::env::var(key).ok())?;
    Ok(root.join(kind))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = match args.log_level {
        Some(level) => level,
        None => log_level_from_env()?,
    };
    init_logging(level);

    match args.command {
        Command::Expand {
            registry: file,
            field,
            value,
            refresh_mirror,
        } => {
            registry::expand_registry(&file, &field, &value)
                .with_context(|| format!("expanding {}", file.display()))?;
            if refresh_mirror {
                let html = file.with_file_name(REGISTRY_HTML);
                registry::refresh_mirror(&file, &html)?;
                info!("Mirror: {}", html.display());
            }
        }
        Command::Mirror { csv, html } => {
            let html = html.unwrap_or_else(|| csv.with_extension("html"));
            registry::csv_to_html(&csv, &html)
                .with_context(|| format!("mirroring {}", csv.display()))?;
            info!("Mirror: {}", html.display());
        }
        Command::List { kind } => {
            for record in registry::list_samples(&kind_dir(args.root, &kind)?)? {
                let values: Vec<String> = record
                    .values
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect();
                println!("{}  {}  {}", record.sample, record.time, values.join(" "));
            }
        }
        Command::Show { kind, sample } => {
            let dir = kind_dir(args.root, &kind)?;
            let record = registry::load_sample(&dir, SampleId::new(sample))?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_explicit_root_skips_environment() {
        let root = results_root(Some(PathBuf::from("/data/runs")), |_| None).unwrap();
        assert_eq!(root, Path::new("/data/runs"));
    }

    #[test]
    fn test_root_from_environment() {
        let root = results_root(None, |key| {
            (key == "CATALOGUE_RESULTS_DIR").then(|| "/srv/results".to_string())
        })
        .unwrap();
        assert_eq!(root, Path::new("/srv/results"));
        assert!(results_root(None, |_| None).is_err());
    }
}
