use anyhow::Result;
use clap::Parser;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::{DefaultTerminal, Frame};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use scrapetui::app::{Action, App, AppEvent, CommandOutcome};
use scrapetui::client::{HttpBackend, ScrapeBackend};
use scrapetui::client::stream::LogStream;
use scrapetui::config::Config;
use scrapetui::model::LogEvent;
use scrapetui::{logging, report, ui};

#[derive(Debug, Parser)]
#[command(name = "scrapetui", about = "Terminal dashboard for a live tweet scraper backend")]
struct Args {
    /// Backend base URL (overrides the config file).
    #[arg(long)]
    url: Option<String>,
    /// Poll interval in seconds (overrides the config file).
    #[arg(long)]
    interval: Option<u64>,
    /// Path to an explicit config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(url) = args.url {
        config.base_url = url;
    }
    if let Some(interval) = args.interval {
        config.poll_interval_secs = interval.max(1);
    }

    logging::init()?;
    tracing::info!(base_url = %config.base_url, "starting dashboard");

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, config).await;
    ratatui::restore();
    result
}

async fn run(terminal: &mut DefaultTerminal, config: Config) -> Result<()> {
    let backend: Arc<dyn ScrapeBackend> = Arc::new(HttpBackend::new(config.base_url.clone()));
    let mut app = App::new(config.default_max_tweets);

    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();
    let (log_tx, mut log_rx) = mpsc::unbounded_channel::<LogEvent>();

    let mut log_stream = LogStream::new(&config.base_url);
    log_stream.subscribe(log_tx.clone());

    // First tick fires immediately; the timer is never cancelled.
    let mut poll = tokio::time::interval(Duration::from_secs(config.poll_interval_secs));
    let mut keys = EventStream::new();

    loop {
        terminal.draw(|frame: &mut Frame| ui::draw(frame, &mut app))?;

        tokio::select! {
            _ = poll.tick() => {
                // Fire-and-forget: a slow fetch may overlap the next tick.
                let backend = backend.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    match backend.fetch_snapshot().await {
                        Ok(snapshot) => {
                            let _ = tx.send(AppEvent::Snapshot(snapshot));
                        }
                        Err(err) => tracing::warn!(%err, "data poll failed"),
                    }
                });
            }
            Some(event) = log_rx.recv() => {
                app.apply_event(AppEvent::Log(event));
            }
            Some(event) = rx.recv() => {
                app.apply_event(event);
            }
            maybe_key = keys.next() => {
                let Some(Ok(Event::Key(key))) = maybe_key else { continue };
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match app.handle_key(key) {
                    Some(Action::Quit) => break,
                    Some(Action::SubmitStart(request)) => {
                        let backend = backend.clone();
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            match backend.start(&request).await {
                                Ok(response) => {
                                    let _ = tx.send(AppEvent::Command(CommandOutcome::Started(response)));
                                }
                                // Transport failure: console-only, status label untouched.
                                Err(err) => tracing::warn!(%err, "start request failed"),
                            }
                        });
                    }
                    Some(Action::SubmitStop) => {
                        let backend = backend.clone();
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            match backend.stop().await {
                                Ok(response) => {
                                    let _ = tx.send(AppEvent::Command(CommandOutcome::Stopped(response)));
                                }
                                Err(err) => tracing::warn!(%err, "stop request failed"),
                            }
                        });
                    }
                    Some(Action::Download(format)) => {
                        let url = backend.export_url(format);
                        if let Err(err) = open::that(&url) {
                            tracing::warn!(%err, url, "failed to open download in browser");
                        }
                    }
                    Some(Action::SaveReport) => {
                        save_report(&app, &config, &tx);
                    }
                    Some(Action::ResubscribeLogs) => {
                        log_stream.subscribe(log_tx.clone());
                        app.apply_event(AppEvent::Log(LogEvent::now(
                            "INFO",
                            "Reconnecting log stream",
                        )));
                    }
                    None => {}
                }
            }
        }
    }

    Ok(())
}

/// Write the current snapshot as an HTML report and reflect the outcome on
/// the log panel.
fn save_report(app: &App, config: &Config, tx: &mpsc::UnboundedSender<AppEvent>) {
    let dir = config
        .report_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let name = format!(
        "tweets_{}.html",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(name);
    let html = report::render_report(&app.tweets);

    let event = match std::fs::write(&path, html) {
        Ok(()) => LogEvent::now("OK", format!("Report saved to {}", path.display())),
        Err(err) => {
            tracing::warn!(%err, path = %path.display(), "report write failed");
            LogEvent::now("ERROR", format!("Report write failed: {err}"))
        }
    };
    let _ = tx.send(AppEvent::Log(event));
}
