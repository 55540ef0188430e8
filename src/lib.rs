//! pack3r-tui - a terminal front-end for the Pack3r map packager
//!
//! This library provides:
//! - Command assembly and validation for Pack3r runs
//! - A process supervisor that streams Pack3r's output and answers its
//!   overwrite prompt
//! - An output reassembler that rebuilds lines from raw chunks with `\r`/`\n`
//!   terminal semantics
//! - Persisted settings and the ratatui front-end
//!
//! # Example
//!
//! ```no_run
//! use pack3r_tui::command::{CommandBuilder, Pack3rOption};
//! use pack3r_tui::process::{ProcessHandler, ProcessUpdate};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut builder = CommandBuilder::new();
//!     builder.set_pack3r_path("/opt/pack3r/Pack3r");
//!     builder.load_map("/et/etmain/maps/te_valhalla.map")?;
//!     builder.set_enabled(Pack3rOption::DryRun, true);
//!     builder.validate()?;
//!
//!     let mut process = ProcessHandler::new();
//!     process.spawn(&builder.build(), builder.output_path())?;
//!
//!     while let Some(event) = process.recv_event().await {
//!         for update in process.handle_event(event) {
//!             match update {
//!                 ProcessUpdate::Line(line) => println!("{}", line),
//!                 ProcessUpdate::OverwritePrompt { .. } => {
//!                     process.answer_overwrite(false)?;
//!                 }
//!                 ProcessUpdate::Finished { .. } => return Ok(()),
//!                 _ => {}
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod command;
pub mod event;
pub mod output;
pub mod process;
pub mod settings;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use app::{App, AppConfig};
pub use command::{CommandBuilder, Pack3rCommand, Pack3rOption, ValidationError, Verbosity};
pub use event::{init_user_event, UserEvent};
pub use output::{parse_version, OutputParser};
pub use process::{ProcessHandler, ProcessUpdate};
pub use settings::{Settings, SettingsStore};
