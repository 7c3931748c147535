#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the flood map toolchain.
//!
//! Starts the server, fetches the live alert feed once, or prints the
//! hotspot catalog and risk classification. Without a subcommand the user
//! picks a tool from an interactive menu.

use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};
use flood_map_alerts::{AlertFeedConfig, AlertRecord, AlertSource, CkanAlertSource};
use flood_map_flood_models::{Hotspot, catalog, classify, total_incidents};
use flood_map_server::{ServerConfig, config::parse_adapter};

#[derive(Parser)]
#[command(name = "flood_map_cli", about = "Singapore flood risk map toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Address to bind (overrides `BIND_ADDR`)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides `PORT`)
        #[arg(long)]
        port: Option<u16>,
        /// Map adapter, "leaflet" or "static" (overrides `FLOOD_MAP_ADAPTER`)
        #[arg(long)]
        adapter: Option<String>,
    },
    /// Fetch the live flood alert feed once and print it
    Alerts {
        /// Maximum number of records to request
        #[arg(long)]
        limit: Option<u32>,
        /// Datastore search endpoint (overrides `FLOOD_ALERTS_URL`)
        #[arg(long)]
        url: Option<String>,
    },
    /// Classify an incident frequency into a risk tier
    Classify {
        /// Number of recorded flood incidents
        #[arg(allow_hyphen_values = true)]
        frequency: i64,
    },
    /// List the tracked flood hotspots
    Hotspots,
}

/// Top-level tool selection for the interactive menu.
enum Tool {
    Serve,
    Alerts,
    Classify,
    Hotspots,
}

impl Tool {
    const ALL: &[Self] = &[Self::Serve, Self::Alerts, Self::Classify, Self::Hotspots];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Serve => "Start server",
            Self::Alerts => "Fetch live flood alerts",
            Self::Classify => "Classify an incident frequency",
            Self::Hotspots => "List flood hotspots",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive().await;
    };

    match command {
        Commands::Serve {
            bind,
            port,
            adapter,
        } => {
            let mut config = ServerConfig::from_env()?;
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(adapter) = adapter {
                config.adapter = parse_adapter(&adapter)?;
            }
            serve(config).await?;
        }
        Commands::Alerts { limit, url } => {
            let mut config = AlertFeedConfig::from_env();
            if let Some(limit) = limit {
                config.limit = limit;
            }
            if let Some(url) = url {
                config.api_url = url;
            }
            print_alerts(config).await?;
        }
        Commands::Classify { frequency } => println!("{}", describe_frequency(frequency)),
        Commands::Hotspots => print_hotspots(),
    }

    Ok(())
}

async fn interactive() -> Result<(), Box<dyn std::error::Error>> {
    println!("Singapore Flood Risk Map");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Serve => {
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(flood_map_server::interactive::run())
            })
            .await??;
        }
        Tool::Alerts => print_alerts(AlertFeedConfig::from_env()).await?,
        Tool::Classify => {
            let frequency: i64 = Input::new()
                .with_prompt("Incident frequency")
                .default(0)
                .interact_text()?;
            println!("{}", describe_frequency(frequency));
        }
        Tool::Hotspots => print_hotspots(),
    }

    Ok(())
}

/// Runs the server on its own actix system, off the tokio runtime.
async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(flood_map_server::run_server(config))
    })
    .await??;
    Ok(())
}

async fn print_alerts(config: AlertFeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let source = CkanAlertSource::new(config)?;
    log::info!("Fetching alerts from {}", source.label());

    let records = source.try_fetch().await?;
    if records.is_empty() {
        println!("No active flood alerts");
        return Ok(());
    }

    for record in &records {
        println!("{}", format_alert(record));
    }
    println!();
    println!("{} active alert(s)", records.len());

    Ok(())
}

fn print_hotspots() {
    for hotspot in catalog() {
        println!("{}", format_hotspot(hotspot));
    }
    println!();
    println!(
        "{} hotspots, {} incidents in 10 years",
        catalog().len(),
        total_incidents()
    );
}

fn describe_frequency(frequency: i64) -> String {
    let risk = classify(frequency);
    format!("{frequency} incident(s): {} ({})", risk.label, risk.color_token)
}

fn format_hotspot(hotspot: &Hotspot) -> String {
    format!(
        "{:<14} {:>8.4}, {:>9.4}  {:>2} incidents  severity {:<6}  {}",
        hotspot.name,
        hotspot.latitude,
        hotspot.longitude,
        hotspot.incident_frequency,
        hotspot.severity,
        hotspot.risk().label,
    )
}

fn format_alert(record: &AlertRecord) -> String {
    let mut line = format!(
        "{}: {}",
        record.location_or_placeholder(),
        record.status_or_placeholder()
    );
    if let Some((lat, lng)) = record.coordinates() {
        line.push_str(&format!(" ({lat:.4}, {lng:.4})"));
    }
    line
}
