use std::sync::mpsc;

use clap::Parser;
use tracing::info;

use mcquiz::cli::Cli;
use mcquiz::client::QuizClient;
use mcquiz::config::{self, Config};
use mcquiz::error::{Error, Result};
use mcquiz::state::AppState;
use mcquiz::tui::{self, Runtime};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli)?;

    let log_path = cli.log_file.clone().unwrap_or_else(config::default_log_path);
    let _log_guard = mcquiz::logging::init(&log_path, &config.log_filter)?;
    info!(server = %config.server_url, "mcquiz starting");

    let client = QuizClient::new(&config)?;

    // Handle --stats
    if cli.stats {
        let user = config
            .user_id
            .as_deref()
            .ok_or_else(|| {
                Error::Usage("--stats needs a user (--user or MCQUIZ_USER)".to_string())
            })?;
        let stats = client.user_stats(user)?;
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).unwrap_or_else(|_| stats.to_string())
        );
        return Ok(());
    }

    let file = cli
        .file
        .clone()
        .ok_or_else(|| Error::Usage("no file given".to_string()))?;
    if !file.is_file() {
        return Err(Error::Usage(format!("{} is not a readable file", file.display())));
    }

    let mut state = AppState::new(file);
    state.user_id = config.user_id.clone();
    state.export_path = cli.export.clone();

    let (tx, rx) = mpsc::channel();
    let state = tui::run_tui(state, Runtime { client, tx }, rx)?;

    if let Some(report) = state.session.report() {
        println!(
            "Your Score: {}/{} ({}%) - {}",
            report.score,
            report.total,
            mcquiz::ui::result::format_percentage(report.percentage),
            report.feedback_message()
        );
    }
    if let Some(path) = &state.exported_to {
        eprintln!("Report written to {}", path.display());
    }
    info!("mcquiz exiting");
    Ok(())
}
