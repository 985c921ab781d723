use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;
use std::path::PathBuf;

use civix_locate::acquire::{IpLocationSource, LocationSource};
use civix_locate::config::Config;
use civix_locate::coord::Coordinate;
use civix_locate::resolver::Resolver;

#[derive(Parser)]
#[command(version, about = "Resolve device coordinates into place names for Civix")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize with a default config file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,

        /// Path to config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Resolve explicit coordinates into a place name
    Resolve {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Path to config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Detect the current position and resolve it
    Locate {
        /// IP address to geolocate instead of the configured one
        #[arg(long)]
        ip: Option<String>,

        /// Path to config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { force, config } => init_config(config, *force),
        Commands::Resolve { lat, lon, config } => {
            let config_data = load_config(config)?;
            let coord = Coordinate::new(*lat, *lon)?;
            resolve_and_report(&config_data, coord).await
        }
        Commands::Locate { ip, config } => {
            let config_data = load_config(config)?;
            let ip = ip.clone().unwrap_or_else(|| config_data.geolocate_ip.clone());

            println!("Detecting your position...");
            let source = IpLocationSource::new(ip);
            let coord = source
                .current_position(&config_data.acquire_options())
                .await?;
            println!("Position fix: {coord}");

            // Diagnostic only; never gates acceptance.
            match config_data.reference_coordinate() {
                Ok(reference) => debug!(
                    "Position fix is {:.1} km from {}",
                    coord.distance_km(&reference),
                    config_data.reference_name
                ),
                Err(err) => debug!("Skipping reference distance: {err:#}"),
            }

            resolve_and_report(&config_data, coord).await
        }
    }
}

async fn resolve_and_report(config: &Config, coord: Coordinate) -> Result<()> {
    println!("Resolving {coord}...");

    let resolver = Resolver::from_config(config);
    let resolved = resolver.resolve(&coord).await;

    println!("Location: {resolved}");
    println!("Source: {}", resolved.source());

    Ok(())
}

fn init_config(config_path_opt: &Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = Config::get_config_path(config_path_opt);

    if config_path.exists() && !force {
        println!("Config file already exists at {}", config_path.display());
        println!("Use --force to overwrite");
        return Ok(());
    }

    let config = Config::default();
    config
        .save_to_file(&config_path)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!("Created config file at {}", config_path.display());
    Ok(())
}

fn load_config(config_path_opt: &Option<PathBuf>) -> Result<Config> {
    let config_path = Config::get_config_path(config_path_opt);

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Run 'civix-locate init' to create one.",
            config_path.display()
        );
    }

    Config::load_from_file(&config_path)
}
