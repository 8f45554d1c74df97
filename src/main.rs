use clap::Parser;
use fleetpick::SourceKind;
use fleetpick::core::config::{FleetpickConfig, load_config, resolve};
use fleetpick::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "fleetpick", about = "Searchable, incrementally loaded vehicle selector")]
struct Args {
    /// Page source to query (overrides config and FLEETPICK_SOURCE)
    #[arg(short, long, value_enum)]
    source: Option<SourceKind>,

    /// Rows requested per page
    #[arg(long)]
    page_size: Option<usize>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to fleetpick.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("fleetpick.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let config = load_config().unwrap_or_else(|e| {
        log::warn!("{}; using defaults", e);
        FleetpickConfig::default()
    });
    let resolved = resolve(
        &config,
        args.source.map(|s| s.as_str()),
        args.page_size,
    );

    log::info!(
        "Fleetpick starting up with source: {} (page size {})",
        resolved.source,
        resolved.page_size
    );

    tui::run(resolved)
}
