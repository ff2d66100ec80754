use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use hilo_core::AppInfo;
use hilo_guide::config::GuideConfig;
use hilo_guide::logging::init_logging;
use hilo_guide::session::{OutputFormat, Session};

/// Exact outcome probabilities and break-even prices for Exchange Hi Lo.
///
/// Reads `deck_size number_lower` pairs from stdin and prints one line per
/// remaining outcome.
#[derive(Debug, Parser)]
#[command(
    name = "hilo-guide",
    author,
    version,
    about = "Exact odds guide for Exchange Hi Lo"
)]
struct Cli {
    /// Path to an optional YAML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format for each answered query.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Override the largest accepted deck size.
    #[arg(long, value_name = "CARDS")]
    max_deck_size: Option<usize>,

    /// Override the exchange commission (fraction of net winnings).
    #[arg(long, value_name = "RATE")]
    commission: Option<f64>,

    /// Override the number of memoised queries (0 disables the cache).
    #[arg(long, value_name = "COUNT")]
    cache_capacity: Option<usize>,

    /// Exit after validating the configuration (no input is read).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => GuideConfig::from_path(path)?,
        None => GuideConfig::default(),
    };

    if let Some(max_deck_size) = cli.max_deck_size {
        config.limits.max_deck_size = max_deck_size;
    }

    if let Some(commission) = cli.commission {
        config.pricing.commission = commission;
    }

    if let Some(capacity) = cli.cache_capacity {
        config.cache.capacity = capacity;
    }

    config.validate()?;

    if cli.validate_only {
        println!(
            "Configuration valid: commission {}, {} ticks per unit, decks up to {} cards.",
            config.pricing.commission, config.pricing.ticks_per_unit, config.limits.max_deck_size
        );
        return Ok(());
    }

    let _logging_guard = init_logging(&config.logging)?;
    info!(
        target: "hilo_guide",
        app = AppInfo::name(),
        version = AppInfo::version(),
        max_deck_size = config.limits.max_deck_size,
        commission = config.pricing.commission,
        "reading queries"
    );

    let mut session = Session::new(&config, cli.format);
    let summary = session.run(io::stdin().lock(), io::stdout().lock(), io::stderr().lock())?;

    info!(
        target: "hilo_guide",
        answered = summary.answered,
        rejected = summary.rejected,
        cache_hits = session.cache().hits(),
        "input exhausted"
    );
    Ok(())
}
