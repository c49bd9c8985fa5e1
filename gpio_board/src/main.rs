//! # Custom Linux Board Binary
//!
//! Loads a board component config, builds the GPIO mapping from its
//! pin-definition file and reports the result. Exits non-zero with an
//! aggregated error message if any pin definition is invalid.
//!
//! # Usage
//!
//! ```bash
//! # Validate the board described by /etc/gpio/board.toml
//! gpio_board --config /etc/gpio/board.toml
//!
//! # Try a different pin file and print the resolved mapping as JSON
//! gpio_board -c board.toml --pins ./candidate_pins.json --print
//!
//! # Verbose, machine-readable logs
//! gpio_board -c board.toml -v --json
//! ```

use clap::Parser;
use gpio_board::{BoardConfig, BoardError, LinuxBoardConfig, linux_board_config, pin_defs_from_file};
use std::path::PathBuf;
use tracing::{Level, debug, error, info};
use tracing_subscriber::EnvFilter;

/// Custom Linux board - GPIO pin-definition loader
#[derive(Parser, Debug)]
#[command(name = "gpio_board")]
#[command(version)]
#[command(about = "Loads and validates GPIO pin definitions for a custom Linux board")]
#[command(long_about = None)]
struct Args {
    /// Path to the board component configuration (board.toml).
    #[arg(short, long, default_value = "/etc/gpio/board.toml")]
    config: PathBuf,

    /// Use this pin-definition file instead of `board_defs_file_path`.
    #[arg(short, long, value_name = "FILE")]
    pins: Option<PathBuf>,

    /// Print the resolved GPIO mapping as JSON on stdout
    #[arg(long)]
    print: bool,

    /// Enable verbose logging (overrides the configured log level)
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(e) = run() {
        error!("Board initialization failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Config is read before tracing so its log level can apply; a load
    // failure is reported once the subscriber is up.
    let config = BoardConfig::from_file(&args.config);
    let level = match (&config, args.verbose) {
        (_, true) => Level::DEBUG,
        (Ok(c), false) => c.shared.log_level.into(),
        (Err(_), false) => Level::INFO,
    };
    setup_tracing(level, args.json);

    info!("GPIO board v{} starting...", env!("CARGO_PKG_VERSION"));
    let config = config.map_err(BoardError::from)?;

    let board = match &args.pins {
        Some(pins) => {
            info!("Pin definitions overridden from CLI: {}", pins.display());
            pin_defs_from_file(pins, config.board.mapping_builder()).map_err(BoardError::from)?
        }
        None => linux_board_config(&config)?,
    };

    report(&board);

    if args.print {
        println!("{}", serde_json::to_string_pretty(&board.gpio_mappings)?);
    }

    info!("{} ready", config.shared.service_name);
    Ok(())
}

fn report(board: &LinuxBoardConfig) {
    let mapping = &board.gpio_mappings;
    info!(
        "GPIO mapping built: {} pins, {} with hardware PWM",
        mapping.len(),
        mapping.pwm_count()
    );
    for (key, pin) in mapping.iter() {
        debug!(
            "  #{:<3} {:<16} {} line {}",
            pin.ordinal,
            key,
            pin.chip_path().display(),
            pin.line
        );
    }
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(level: Level, json: bool) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
