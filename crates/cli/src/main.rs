use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tilevault_core::config;

mod commands;

#[derive(Parser)]
#[command(name = "tilevault")]
#[command(about = "Manage local mbtiles archives and their map locations", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List archives with modification time and stored location
    List {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Move picked files into the archive directory
    Import {
        /// Source files to import
        #[arg(required = true)]
        sources: Vec<PathBuf>,
        /// Output JSON report
        #[arg(long)]
        json: bool,
    },
    /// Delete an archive and its stored location
    Delete {
        /// Archive name, e.g. springdale.mbtiles
        name: String,
        /// Skip the confirmation prompt
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    /// Save a latitude/longitude pair for an archive
    SetLocation {
        /// Archive name
        name: String,
        latitude: String,
        longitude: String,
    },
    /// Open the map view on an archive (or the default map)
    Open {
        /// Archive name; omit for the built-in default map
        name: Option<String>,
        /// Latitude to center on; saved for the archive
        #[arg(long)]
        lat: Option<String>,
        /// Longitude to center on; saved for the archive
        #[arg(long)]
        lon: Option<String>,
    },
    /// Drop stored locations whose archive is gone
    Prune {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::List { json } => {
            let rows = commands::run_list(&cfg).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("no archives");
            } else {
                for row in rows {
                    let modified = row.modified.as_deref().unwrap_or("-");
                    let location = row
                        .location
                        .map(|l| format!("{}, {}", l.latitude, l.longitude))
                        .unwrap_or_else(|| "no location stored".to_string());
                    println!("{}\t{}\t{}", row.name, modified, location);
                }
            }
            Ok(())
        }
        Commands::Import { sources, json } => {
            let report = commands::run_import(&cfg, &sources).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "imported {} | discarded {} | failed {}",
                    report.imported.len(),
                    report.discarded.len(),
                    report.failed.len()
                );
                for name in &report.imported {
                    println!("  + {name}");
                }
                for source in &report.discarded {
                    println!("  - {} (not an mbtiles archive)", source.display());
                }
                for failure in &report.failed {
                    println!("  ! {}: {}", failure.source.display(), failure.reason);
                }
            }
            Ok(())
        }
        Commands::Delete { name, yes } => {
            if !yes && !confirm(&format!("Delete {name}? [y/N] "))? {
                println!("cancelled");
                return Ok(());
            }
            commands::run_delete(&cfg, &name).await?;
            println!("deleted {name}");
            Ok(())
        }
        Commands::SetLocation {
            name,
            latitude,
            longitude,
        } => {
            let location = commands::run_set_location(&cfg, &name, &latitude, &longitude).await?;
            println!("{name}: {}, {}", location.latitude, location.longitude);
            Ok(())
        }
        Commands::Open { name, lat, lon } => {
            let outcome =
                commands::run_open(&cfg, name.as_deref(), lat.as_deref(), lon.as_deref()).await?;
            println!(
                "{} (zoom {}..{}, {}) centered at {}, {}",
                outcome.scene.source_name,
                outcome.scene.min_zoom,
                outcome.scene.max_zoom,
                outcome.scene.coord_system,
                outcome.center.latitude,
                outcome.center.longitude
            );
            Ok(())
        }
        Commands::Prune { json } => {
            let pruned = commands::run_prune(&cfg).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&pruned)?);
            } else if pruned.is_empty() {
                println!("nothing to prune");
            } else {
                for name in pruned {
                    println!("pruned {name}");
                }
            }
            Ok(())
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
