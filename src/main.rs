#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;
use url::Url;

use deadstock::config::{Settings, default_log_path};
use deadstock::model::FormController;
use deadstock::tui::{App, DeliveryWorker};
use deadstock::webhook::WebhookClient;

/// Record dead-stock customer enquiries and sync them to the enquiry sheet.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/deadstock/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Webhook URL; overrides the environment and the config file
    #[arg(long, value_name = "URL")]
    endpoint: Option<Url>,

    /// Log file (default: <data dir>/deadstock/deadstock.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_file)?;

    let settings = Settings::load(cli.config.as_deref(), cli.endpoint)?;
    let client = WebhookClient::new(settings.endpoint, settings.timeout, settings.delivery)?;
    tracing::info!(
        endpoint = %client.endpoint(),
        delivery = ?client.mode(),
        branches = settings.branches.len(),
        "starting"
    );
    let delivery = DeliveryWorker::spawn(client)?;
    let mut app = App::new(FormController::new(settings.branches), delivery);

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = app.run(&mut terminal);

    let restore_result = restore_terminal();
    match result {
        Err(e) => Err(e.into()),
        Ok(()) => restore_result.map_err(Into::into),
    }
}

/// Sends tracing output to a file; the terminal belongs to the UI.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn init_logging(path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let path = match path {
        Some(path) => path,
        None => default_log_path()?,
    };
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn restore_terminal() -> Result<(), io::Error> {
    let raw_result = disable_raw_mode();
    let screen_result = execute!(stdout(), LeaveAlternateScreen);
    raw_result.and(screen_result)
}
