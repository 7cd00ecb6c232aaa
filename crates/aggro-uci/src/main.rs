// UCI (Universal Chess Interface) proxy

use std::io::{self, Write};
use std::path::PathBuf;

use aggro_core::config::EngineConfig;
use aggro_core::evaluator::HeuristicEvaluator;
use aggro_core::gateway::ProcessLauncher;
use aggro_uci::Dispatcher;
use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Wrapped UCI engine executable (default: stockfish, or engine_path from --config)
    engine: Option<String>,

    /// TOML file with configuration defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .write_style(env_logger::WriteStyle::Never)
    // stdout は UCI 専用
    .target(env_logger::Target::Stderr)
    .init();

    if let Err(e) = run(args) {
        log::error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("invalid config file {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(engine) = args.engine {
        config.engine_path = engine;
    }
    log::info!("Aggro {} starting, engine: {}", env!("CARGO_PKG_VERSION"), config.engine_path);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut dispatcher = Dispatcher::new(
        config,
        Box::new(ProcessLauncher),
        Box::new(HeuristicEvaluator),
        stdout.lock(),
    );
    dispatcher.run(stdin.lock()).context("protocol stream closed")?;
    log::info!("Shutting down");
    Ok(())
}
