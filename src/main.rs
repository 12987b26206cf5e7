//! 礼拝時刻ボードCLI
//!
//! `run` でボードを表示し続け、`show` で指定日の時刻表と状態を1回だけ表示する。

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use salat::board::{self, BoardEngine, BoardEvent, SystemClock};
use salat::cli::{completions, evaluate_day, Cli, Commands, Display, ShowArgs};
use salat::config::BoardConfig;
use salat::display::TerminalBoard;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let display = Display::new();

    match &cli.command {
        Commands::Run => {
            let config = load_config(&cli)?;
            run_board(config).await?;
        }
        Commands::Show(args) => {
            let config = load_config(&cli)?;
            if let Err(e) = show(&display, &config, args).await {
                display.show_error(&format!("{:#}", e));
                std::process::exit(1);
            }
        }
        Commands::Completions { shell } => {
            completions::generate_completions(*shell);
        }
    }

    Ok(())
}

/// ログはボードと混ざらないようstderrへ
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("salat=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<BoardConfig> {
    let config = match &cli.config {
        Some(path) => BoardConfig::load_from_file(path),
        None => BoardConfig::load(),
    };
    config.context("Failed to load configuration")
}

async fn run_board(config: BoardConfig) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    // イベントはログへ流す
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                BoardEvent::LoadFailed { date, kind } => {
                    warn!("schedule load failed for {} ({})", date, kind);
                }
                other => debug!("{:?}", other),
            }
        }
    });

    let engine = BoardEngine::new(
        SystemClock,
        TerminalBoard::new(),
        config.source.build(),
        config.resolver(),
        config.settings(),
        event_tx,
    );

    board::run(engine, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn show(display: &Display, config: &BoardConfig, args: &ShowArgs) -> Result<()> {
    let now = Local::now().naive_local();
    let report = evaluate_day(config, args, now).await?;
    display.show_day(report.date, &report.cards, &report.snapshot);
    Ok(())
}
