//! Main entry point for pack3r-tui.
//!
//! Parses the command line, initializes the TUI terminal, runs the main
//! event loop and restores the terminal on exit.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use pack3r_tui::app::{App, AppConfig};
use pack3r_tui::event::init_user_event;
use pack3r_tui::settings::default_settings_path;
use pack3r_tui::utils;
use pack3r_tui::utils::terminal_guard::TerminalGuard;

/// Terminal front-end for the Pack3r map packager.
#[derive(Debug, Parser)]
#[command(name = "pack3r-tui", version)]
struct Cli {
    /// Map file to load on startup (.map or .reg inside a maps directory)
    map: Option<String>,

    /// Pack3r executable to use instead of the saved one
    #[arg(long, value_name = "PATH")]
    pack3r: Option<String>,

    /// Settings file
    #[arg(long, value_name = "FILE", env = "PACK3R_TUI_SETTINGS")]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging before anything else
    let _log_guard = utils::logger::init_logging();

    let config = AppConfig {
        settings_path: cli.settings.unwrap_or_else(default_settings_path),
        map: cli.map,
        pack3r: cli.pack3r,
    };

    let mut terminal = ratatui::init();
    // Restores the terminal on both normal exit and panic
    let _guard = TerminalGuard::new();

    let mut app = App::new(config, init_user_event());
    // draw 1st frame
    app.draw(&mut terminal)?;
    // run event-driven main loop of app
    app.run(&mut terminal).await
}
