//! Subcommand implementations.

use crate::input::{pump_lines, LineDecoder, ScanView};
use crate::terminal::TerminalPresenter;
use crate::{build_lookup, server};
use anyhow::Context;
use partscan_camera::{CameraController, ConstraintLadder, Negotiator};
use partscan_core::{AppConfig, PartToken};
use partscan_session::{ScanSession, SessionRunner, UserAction};
use std::path::Path;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::sync::{mpsc, watch};

const SCAN_HELP: &str = "Type decoded QR texts, one per line. \
Commands: :start :stop :switch :retry [TOKEN] :copy [N] :open [N] :quit";

/// `partscan extract`
pub fn extract(text: &str) -> anyhow::Result<()> {
    println!("{}", partscan_extract::extract(text));
    Ok(())
}

/// `partscan lookup`
pub async fn lookup(config: &AppConfig, token: &str, direct: bool) -> anyhow::Result<()> {
    let lookup = build_lookup(config, direct)?;
    let token = PartToken::new(token);

    let record = lookup
        .resolve(&token)
        .await
        .with_context(|| format!("lookup of {token} failed"))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

/// `partscan serve`
pub async fn serve(config: &AppConfig, bind: Option<String>) -> anyhow::Result<()> {
    if config.sheets.api_key.is_none() || config.sheets.spreadsheet_id.is_empty() {
        tracing::warn!("Spreadsheet credentials are not set, lookups will report a configuration error");
    }

    let addr = bind.unwrap_or_else(|| config.server.bind_addr.clone());
    let lookup = build_lookup(config, true)?;
    server::serve(&addr, lookup).await
}

/// `partscan scan`
pub async fn scan(config: &AppConfig, direct: bool) -> anyhow::Result<()> {
    let lookup = build_lookup(config, direct)?;

    let (frames_tx, frames_rx) = mpsc::unbounded_channel();
    let (actions_tx, actions_rx) = mpsc::channel(32);
    let (view_tx, view_rx) = watch::channel(ScanView::default());

    let negotiator = Negotiator::new(
        ConstraintLadder::from_config(&config.camera),
        config.camera.preferred_facing,
    );
    let camera = CameraController::new(
        LineDecoder::new(frames_rx),
        negotiator,
        Duration::from_millis(config.camera.settle_delay_ms),
    );
    let runner = SessionRunner::new(
        ScanSession::new(),
        camera,
        lookup,
        TerminalPresenter::new(std::io::stdout(), view_tx),
    );

    eprintln!("{SCAN_HELP}");
    let input = tokio::spawn(pump_lines(
        BufReader::new(tokio::io::stdin()),
        view_rx,
        actions_tx.clone(),
        frames_tx,
    ));
    actions_tx.send(UserAction::Start).await?;
    drop(actions_tx);

    let runner = runner.run(actions_rx).await?;
    input.abort();

    tracing::info!(
        scans = runner.session().history().len(),
        "Scan session finished"
    );
    Ok(())
}

/// `partscan config`
pub fn config(config: &AppConfig, path: Option<&Path>, save: bool) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);

    if save {
        match path {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }
        tracing::info!("Configuration saved");
    }
    Ok(())
}
