use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{
    config::{load_settings, load_settings_from},
    EventsSession, NotificationBoard,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::{debug, warn};

mod app;
mod render;
mod repl;

use app::{App, Outcome};

#[derive(Parser, Debug)]
struct Args {
    /// Settings file (defaults to ./events.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Catalog proxy base URL, overriding settings
    #[arg(long)]
    catalog_url: Option<String>,
    /// Start with location auto-detection on
    #[arg(long)]
    auto_detect: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => load_settings_from(path, |key| std::env::var(key).ok()),
        None => load_settings(),
    };
    if let Some(url) = args.catalog_url {
        settings.catalog_url = url.trim_end_matches('/').to_string();
    }

    let board = Arc::new(NotificationBoard::new());
    let session = EventsSession::from_settings(&settings, board.clone())?;

    let mut events = session.subscribe_events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => debug!(?event, "cli: session event"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "cli: session events dropped"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let app = App::new(session, board);
    let mut stdout = tokio::io::stdout();
    if args.auto_detect {
        let enable = repl::LineCommand::Auto {
            state: repl::Toggle::On,
        };
        if let Outcome::Render(screen) = app.execute(enable).await {
            stdout.write_all(format!("{screen}\n").as_bytes()).await?;
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"events> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match repl::parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                stdout.write_all(format!("{err}\n").as_bytes()).await?;
                continue;
            }
        };

        match app.execute(command).await {
            Outcome::Quit => break,
            Outcome::Render(screen) => {
                stdout.write_all(format!("{screen}\n").as_bytes()).await?;
            }
        }
    }
    Ok(())
}
