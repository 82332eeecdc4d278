//! Line-oriented front end: reads `message:send` events as JSON lines on stdin and writes
//! display events as JSON lines on stdout.

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{
    runtime, BuiltinCommands, LoopbackConnector, Orchestrator, SlashCommandPredicate, SystemClock,
};
use shared::protocol::{DisplayEvent, UiEvent};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

#[derive(Parser, Debug)]
struct Args {
    /// Config file; defaults to ./communique.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Additional server to connect to on startup. May be repeated.
    #[arg(long = "connect")]
    servers: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())?;

    let (display_tx, display_rx) = mpsc::unbounded_channel::<DisplayEvent>();
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (connection_tx, connection_rx) = mpsc::unbounded_channel();

    let mut orchestrator = Orchestrator::new_with_dependencies(
        Arc::new(display_tx),
        Arc::new(LoopbackConnector::new(connection_tx)),
        Arc::new(BuiltinCommands::new(settings.identity())),
        Arc::new(SlashCommandPredicate),
        Arc::new(SystemClock),
    );

    let identity = settings.identity();
    for server_id in settings.servers.iter().chain(&args.servers) {
        if let Err(err) = orchestrator.connect(server_id, &identity) {
            orchestrator.report(&err);
        }
    }

    let writer = tokio::spawn(write_display_events(display_rx));
    tokio::spawn(read_ui_events(ui_tx));

    let orchestrator = runtime::run(orchestrator, ui_rx, connection_rx).await;
    info!(
        buffers = orchestrator.buffers().len(),
        connections = orchestrator.connections().len(),
        "shutting down"
    );
    // Dropping the orchestrator closes the display channel and lets the writer finish.
    drop(orchestrator);
    writer.await??;
    Ok(())
}

async fn read_ui_events(ui_tx: mpsc::UnboundedSender<UiEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                warn!(%error, "failed to read stdin");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<UiEvent>(&line) {
            Ok(event) => {
                if ui_tx.send(event).is_err() {
                    break;
                }
            }
            Err(error) => warn!(%error, "ignoring malformed ui event"),
        }
    }
}

async fn write_display_events(mut display_rx: mpsc::UnboundedReceiver<DisplayEvent>) -> Result<()> {
    while let Some(event) = display_rx.recv().await {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
