#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Adaptive Defence in a terminal.

mod config;
mod input;
mod terminal;

use std::{io, path::PathBuf};

use adaptive_defence_core::{Event, WavePhase, WaveRejection};
use adaptive_defence_gateway::{AttackAdvisor, HttpGateway, OfflineAdvisor};
use adaptive_defence_rendering::Presenter;
use adaptive_defence_session::{
    IntervalClock, ReportStatus, Session, TickClock, TickOutcome, WaveStart,
};
use adaptive_defence_world::query;
use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::AppConfig,
    input::{PlayerInput, HELP},
    terminal::{presentation, TerminalPresenter},
};

/// Defend the base against waves planned by an adaptive AI.
#[derive(Debug, Parser)]
#[command(name = "adaptive-defence", version, about)]
struct Args {
    /// TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Base URL of the AI service, overriding the configuration.
    #[arg(long, value_name = "URL")]
    server: Option<String>,
    /// Milliseconds between simulation ticks, overriding the configuration.
    #[arg(long, value_name = "MS")]
    tick_ms: Option<u64>,
    /// Play against the built-in opponent instead of the AI service.
    #[arg(long)]
    offline: bool,
    /// Seed for the built-in opponent; random when omitted.
    #[arg(long, requires = "offline")]
    seed: Option<u64>,
}

enum Step {
    Input(Option<String>),
    Tick,
}

/// Entry point for the Adaptive Defence command-line interface.
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(server) = args.server {
        config.gateway.base_url = server;
    }
    if let Some(tick_ms) = args.tick_ms {
        config.session.tick_interval_ms = tick_ms;
    }
    init_tracing(&config.logging.filter)?;

    if args.offline {
        let seed = args.seed.unwrap_or_else(rand::random);
        info!(seed, "playing against the offline opponent");
        play(Session::new(OfflineAdvisor::new(seed), config.session)).await
    } else {
        info!(server = %config.gateway.base_url, "playing against the AI service");
        let gateway = HttpGateway::new(&config.gateway).context("failed to set up AI gateway")?;
        play(Session::new(gateway, config.session)).await
    }
}

fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("invalid log filter `{default_filter}`"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

async fn play<A: AttackAdvisor>(mut session: Session<A>) -> Result<()> {
    let mut presenter = TerminalPresenter::new(io::stdout());
    let mut clock = IntervalClock::new(session.config().tick_interval());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    presenter.notice(query::welcome_banner(session.world()))?;
    presenter.notice(HELP)?;
    presenter.present(&presentation(session.world()))?;

    loop {
        let running = query::phase(session.world()) == WavePhase::Running;
        let step = tokio::select! {
            line = lines.next_line() => Step::Input(line.context("failed to read player input")?),
            () = clock.next_tick(), if running => Step::Tick,
        };

        match step {
            Step::Input(None) => break,
            Step::Input(Some(line)) => {
                let input = match PlayerInput::parse(&line) {
                    Ok(input) => input,
                    Err(error) => {
                        presenter.notice(&error.to_string())?;
                        continue;
                    }
                };
                match input {
                    PlayerInput::Quit => break,
                    PlayerInput::Help => {
                        presenter.notice(HELP)?;
                        continue;
                    }
                    PlayerInput::Status => {}
                    PlayerInput::TogglePlacement => log_events(&session.toggle_placement()),
                    PlayerInput::Select(cell) => log_events(&session.select_cell(cell)),
                    PlayerInput::Upgrade => log_events(&session.purchase_upgrade()),
                    PlayerInput::Start => {
                        presenter.notice("AI is planning the next wave...")?;
                        match session.start_wave().await {
                            WaveStart::Launched(_) => clock.restart(),
                            WaveStart::Rejected(WaveRejection::WaveInProgress) => {
                                presenter.notice("A wave is already in progress.")?;
                            }
                            WaveStart::Rejected(WaveRejection::BaseDestroyed) => {
                                presenter.notice("The base has fallen. Type `quit` to leave.")?;
                            }
                            WaveStart::Aborted(_) => {}
                        }
                    }
                }
            }
            Step::Tick => {
                let TickOutcome { events, outcome } = session.tick();
                log_events(&events);
                if let Some(outcome) = outcome {
                    presenter.present(&presentation(session.world()))?;
                    if let ReportStatus::Deferred { .. } = session.deliver(outcome).await {
                        presenter.notice(&format!(
                            "{} report(s) waiting for the AI service.",
                            session.backlog_len()
                        ))?;
                    }
                }
            }
        }

        presenter.present(&presentation(session.world()))?;
        if query::is_defeated(session.world())
            && query::phase(session.world()) == WavePhase::Idle
        {
            presenter.notice("The base has fallen.")?;
        }
    }

    info!(
        round = query::round(session.world()),
        health = query::health(session.world()),
        "session ended"
    );
    Ok(())
}

fn log_events(events: &[Event]) {
    for event in events {
        debug!(?event, "world event");
    }
}
