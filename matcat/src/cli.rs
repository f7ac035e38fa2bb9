//! CLI glue for matcat: command parsing, argument exposure and orchestration.
//! All business logic (mapping, synchronisation) lives in `matcat-core`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::load_config::load_config;
use matcat_core::contract::HttpFetcher;
use matcat_core::model::Materials;
use matcat_core::synchronise::synchronise;
use matcat_core::{de, ser};

/// CLI for matcat: synchronise and inspect producer material catalogs.
#[derive(Parser)]
#[clap(
    name = "matcat",
    version,
    about = "Synchronise the producer catalog cache and inspect material catalog documents"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one cache synchronisation pass against the configured index URL
    Sync {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Parse a catalog document and print a material summary
    Show {
        /// Catalog XML file
        file: PathBuf,
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Parse a catalog document and re-emit it (round trip)
    Export {
        /// Catalog XML file to read
        input: PathBuf,
        /// Destination file to write
        output: PathBuf,
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sync { config } => {
            let config = load_config(config)?;
            let sync_config = config.sync_config()?;
            sync_config.trace_loaded();
            tracing::info!(command = "sync", "Starting synchronisation run");
            let fetcher = HttpFetcher::new(sync_config.index_url.clone());
            let report = synchronise(&sync_config, &fetcher)
                .await
                .context("synchronisation run failed")?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Commands::Show { file, config } => {
            let config = load_config(config)?;
            let prefs = config.prefs();
            let parsed = de::from_xml_file::<Materials>(&file, &config.mapper_options())
                .with_context(|| format!("failed to parse catalog {}", file.display()))?;
            for problem in &parsed.recovered {
                eprintln!("warning: {problem}");
            }
            let catalog = parsed.value;
            if let Some(company) = catalog.company_name(&prefs) {
                println!("company: {company}");
            }
            println!(
                "signed: {}, materials: {}",
                catalog.is_signed(),
                catalog.materials.len()
            );
            for material in &catalog.materials {
                let name = material.display_name(&prefs).unwrap_or("(unnamed)");
                println!("  #{} {} ({} layers)", material.id, name, material.layers.len());
                for layer in &material.layers {
                    match layer.thickness_for(&prefs.country) {
                        Some(thickness) => {
                            println!("    layer {}: {:.1} mm [{}]", layer.number, thickness, prefs.country)
                        }
                        None => println!("    layer {}", layer.number),
                    }
                }
            }
            Ok(())
        }
        Commands::Export {
            input,
            output,
            config,
        } => {
            let config = load_config(config)?;
            let parsed = de::from_xml_file::<Materials>(&input, &config.mapper_options())
                .with_context(|| format!("failed to parse catalog {}", input.display()))?;
            for problem in &parsed.recovered {
                eprintln!("warning: {problem}");
            }
            ser::to_xml_file(&parsed.value, &output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            tracing::info!(command = "export", output = %output.display(), "Catalog re-emitted");
            println!("wrote {}", output.display());
            Ok(())
        }
    }
}
