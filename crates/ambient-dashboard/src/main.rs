//! Ambient Twin command line
//!
//! Drives the dashboard view models from a terminal: the fleet feed, a
//! live detail panel for one system, the triage queue, the sales pipeline,
//! the cluster map and the home health certificate.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use ambient_core::config::LoggingConfig;
use ambient_core::context_error::{Result, ResultExt};
use ambient_core::types::PercentPoint;
use ambient_core::utils::format_dollars;
use ambient_core::{Catalog, Config, init_logging};
use ambient_dashboard::cluster_map::{self, MapEvent, MapState, Point, Target};
use ambient_dashboard::{
    AppState, Card, Certificate, DetailPanel, ForecastState, Message, PanelAction, PanelOptions,
    feed_cards, header_tiles,
};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

/// Command line interface for the Ambient Twin dashboard
#[derive(Parser)]
#[command(
    name = "ambient-twin",
    version = env!("CARGO_PKG_VERSION"),
    about = "HVAC fleet-monitoring dashboard",
    long_about = "Fleet dashboard for HVAC contractors: triage feed, live system telemetry, maintenance forecasts and home health certificates."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error), overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable structured JSON logging
    #[arg(long)]
    json: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format of listing commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Human-readable text
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Show the header tiles and the bucketed system feed
    Feed {
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },

    /// Open the detail panel of one system and watch it live
    Inspect {
        /// System to open
        #[arg(value_name = "SYSTEM_ID")]
        system_id: String,

        /// Number of live ticks to wait for
        #[arg(short, long, default_value = "3")]
        ticks: u32,

        /// Skip the maintenance forecast
        #[arg(long)]
        no_forecast: bool,

        /// Generate the certificate from the panel when it is offered
        #[arg(long)]
        report: bool,
    },

    /// Show the cluster map
    Map {
        /// Zoom steps to apply, negative to zoom out
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        zoom: i32,

        /// Cluster to select
        #[arg(short, long, value_name = "CLUSTER_ID")]
        select: Option<String>,
    },

    /// Show the triage queue by priority
    Queue {
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },

    /// Show the sales pipeline by revenue
    Pipeline {
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },

    /// Issue a home health certificate
    Certificate {
        /// System to certify
        #[arg(value_name = "SYSTEM_ID")]
        system_id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },

    /// Validate or show configuration
    Config {
        /// Show resolved configuration
        #[arg(short, long)]
        show: bool,

        /// Validate configuration and seed data
        #[arg(short, long)]
        validate: bool,
    },
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_from(cli.config.as_deref())?;
    init_logging(&logging_settings(&cli, &config.logging))?;
    info!(version = env!("CARGO_PKG_VERSION"), "Ambient Twin starting");

    let catalog = Catalog::seed();
    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::Feed { format }) => show_feed(&catalog, today, format),
        None => show_feed(&catalog, today, Format::default()),
        Some(Commands::Inspect {
            system_id,
            ticks,
            no_forecast,
            report,
        }) => inspect(&catalog, &config, &system_id, ticks, no_forecast, report, today).await,
        Some(Commands::Map { zoom, select }) => show_map(&catalog, zoom, select),
        Some(Commands::Queue { format }) => show_queue(&catalog, format),
        Some(Commands::Pipeline { format }) => show_pipeline(&catalog, format),
        Some(Commands::Certificate { system_id, format }) => {
            let system = catalog.require_system(&system_id)?;
            let certificate =
                Certificate::issue(system, config.certificate.service_life_years, today);
            match format {
                Format::Table => println!("{certificate}"),
                Format::Json => print_json(&certificate)?,
            }
            Ok(())
        }
        Some(Commands::Config { show, validate }) => {
            handle_config_command(&config, &catalog, show, validate)
        }
    }
}

/// Logging settings with the command-line overrides applied
fn logging_settings(cli: &Cli, configured: &LoggingConfig) -> LoggingConfig {
    let mut logging = configured.clone();
    if let Some(level) = &cli.log_level {
        logging.level.clone_from(level);
    }
    if cli.json {
        logging.format = "json".to_string();
    }
    logging
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn show_feed(catalog: &Catalog, today: NaiveDate, format: Format) -> Result<()> {
    let tiles = header_tiles(catalog);
    let cards = feed_cards(&catalog.systems, today);

    if format == Format::Json {
        let ids: Vec<_> = cards
            .iter()
            .map(|card| serde_json::json!({ "bucket": card.bucket(), "system_id": card.system_id() }))
            .collect();
        return print_json(&serde_json::json!({ "tiles": tiles, "feed": ids }));
    }

    for tile in &tiles {
        match &tile.trend {
            Some(trend) => println!("{:<16} {:>10}  [{trend}]", tile.label, tile.value),
            None => println!("{:<16} {:>10}", tile.label, tile.value),
        }
    }

    let mut heading = None;
    for card in &cards {
        if heading != Some(card.bucket()) {
            heading = Some(card.bucket());
            println!("\n== {} ==", card.bucket().heading());
        }
        match card {
            Card::Lead(lead) => {
                println!(
                    "* {:<8} {} ({}) heating {}%{}{}",
                    lead.system_id,
                    lead.address,
                    lead.owner_name,
                    lead.heating_percent,
                    lead.badge
                        .as_ref()
                        .map(|badge| format!(" [{badge}]"))
                        .unwrap_or_default(),
                    if lead.end_of_life {
                        format!(" end of life ({} yrs)", lead.age_years)
                    } else {
                        String::new()
                    },
                );
            }
            Card::Nuisance(nuisance) => println!(
                "  {:<8} {} {}: {} ({})",
                nuisance.system_id,
                nuisance.address,
                nuisance.title,
                nuisance.description,
                nuisance.hint
            ),
            Card::Standard(standard) => println!(
                "  {:<8} {} {} {} ({}), airflow {}",
                standard.system_id,
                standard.address,
                standard.gauge.label(),
                standard.gauge.percent_label(),
                standard.gauge.status(),
                standard.breathing
            ),
        }
    }
    Ok(())
}

async fn inspect(
    catalog: &Catalog,
    config: &Config,
    system_id: &str,
    ticks: u32,
    no_forecast: bool,
    report: bool,
    today: NaiveDate,
) -> Result<()> {
    let system = catalog.require_system(system_id)?.clone();
    let mut options =
        PanelOptions::from_config(config).with_context(|| "failed to set up forecast backend")?;
    if no_forecast {
        options.forecast = None;
    }

    let mut app = AppState::new();
    app.reduce(Message::OpenSystem(system.id.clone()));

    let (intents, mut inbox) = mpsc::unbounded_channel();
    let mut panel = DetailPanel::mount(system, options, intents);

    let period = config.telemetry.tick_interval();
    for _ in 0..ticks {
        sleep(period).await;
        let snapshot = panel.snapshot();
        let heating = &snapshot.system.metrics.heating_power;
        println!(
            "tick {:>3}  {} {} ({}{})  synced {}",
            snapshot.ticks,
            heating.label,
            heating.display_value(),
            heating.status,
            heating
                .trend
                .map(|trend| format!(", {trend}"))
                .unwrap_or_default(),
            snapshot
                .last_synced
                .map_or_else(|| "never".to_string(), |at| at.format("%H:%M:%S").to_string()),
        );
    }

    let deadline = Instant::now() + config.forecast.timeout() + Duration::from_secs(1);
    while panel.forecast_pending() && Instant::now() < deadline {
        sleep(Duration::from_millis(50)).await;
    }
    match panel.snapshot().forecast {
        ForecastState::Ready(forecast) => println!(
            "forecast: {} by {} ({}% confidence)\n  {}",
            forecast.maintenance_type, forecast.predicted_date, forecast.confidence, forecast.reasoning
        ),
        ForecastState::Loading => println!("forecast: still loading"),
        ForecastState::Unavailable { reason } => {
            debug!(%reason, "forecast unavailable");
            println!("forecast: unavailable");
        }
        ForecastState::Disabled | ForecastState::Idle => {}
    }

    let actions = panel.available_actions();
    let labels: Vec<_> = actions.iter().map(ToString::to_string).collect();
    println!("actions: {}", labels.join(" | "));

    if report {
        if actions.contains(&PanelAction::GenerateReport) {
            panel.trigger(PanelAction::GenerateReport);
        } else {
            warn!(system_id, "certificate is only offered for healthy systems");
        }
    }

    panel.unmount();
    while let Ok(intent) = inbox.try_recv() {
        app.reduce(Message::Intent(intent));
    }
    if app.show_certificate() {
        let system = catalog.require_system(system_id)?;
        println!(
            "\n{}",
            Certificate::issue(system, config.certificate.service_life_years, today)
        );
    }
    Ok(())
}

fn show_map(catalog: &Catalog, zoom: i32, select: Option<String>) -> Result<()> {
    let mut map = MapState::new();
    let step = if zoom < 0 {
        MapEvent::ZoomOut
    } else {
        MapEvent::ZoomIn
    };
    for _ in 0..zoom.unsigned_abs() {
        map.apply(step.clone());
    }

    if let Some(id) = select {
        let cluster = catalog
            .cluster(&id)
            .ok_or_else(|| ambient_core::Error::not_found(format!("cluster {id}")))?;
        map.apply(MapEvent::PointerDown {
            at: Point::default(),
            target: Target::Marker(cluster.id.clone()),
        });
        map.apply(MapEvent::PointerUp);
    }

    println!("transform: {}", map.transform_css());
    for cluster in &catalog.clusters {
        let marker = if map.selected() == Some(cluster.id.as_str()) {
            '>'
        } else {
            ' '
        };
        println!(
            "{marker} {:<12} {:<8} at ({:>4}%, {:>4}%)",
            cluster.name,
            cluster.color.hex(),
            cluster.position.left,
            cluster.position.top
        );
    }

    if let Some(cluster) = map.selected_cluster(&catalog.clusters) {
        println!(
            "\n{}: {} critical, {} revenue, average age {} yrs",
            cluster.name,
            cluster.stats.critical_count,
            format_dollars(u64::from(cluster.stats.revenue)),
            cluster.stats.average_age_years
        );
        let probe = PercentPoint {
            top: cluster.position.top,
            left: cluster.position.left,
        };
        debug!(hit = ?cluster_map::hit_test(&catalog.clusters, probe).map(|c| &c.id), "marker probe");
    }
    Ok(())
}

fn show_queue(catalog: &Catalog, format: Format) -> Result<()> {
    let queue = catalog.queue_by_priority();
    if format == Format::Json {
        return print_json(&queue);
    }
    for case in queue {
        println!(
            "P{} {:<10} {:<16} {:<12} {} -> {}",
            case.priority,
            case.id,
            case.source,
            case.status.to_string(),
            case.reason,
            case.suggested_outcome
        );
    }
    Ok(())
}

fn show_pipeline(catalog: &Catalog, format: Format) -> Result<()> {
    let pipeline = catalog.pipeline_by_revenue();
    if format == Format::Json {
        return print_json(&pipeline);
    }
    for opportunity in pipeline {
        println!(
            "{:>9} {:<18} {:<30} {:<12} {}",
            format_dollars(u64::from(opportunity.estimated_revenue)),
            opportunity.customer,
            opportunity.address,
            opportunity.contract_status.to_string(),
            opportunity.next_action
        );
    }
    Ok(())
}

/// Handle config command
fn handle_config_command(
    config: &Config,
    catalog: &Catalog,
    show: bool,
    validate: bool,
) -> Result<()> {
    if validate {
        config.validate()?;
        catalog.validate()?;
        println!("Configuration is valid");
    }

    if show || !validate {
        let mut shown = config.clone();
        if shown.forecast.api_key.is_some() {
            shown.forecast.api_key = Some("********".to_string());
        }
        print_json(&shown)?;
    }

    Ok(())
}
