//! Terminal input.
//!
//! User events (keyboard, resize) are read on a dedicated thread and
//! delivered over a channel, so the main loop can `select!` between them and
//! Pack3r's output without ever blocking on the terminal.
//!
//! # Submodules
//!
//! - `keys`: maps key presses to form actions, text edits and dialog answers

pub mod keys;

use std::io::Result;
use std::thread;

use tokio::sync::mpsc::{self, Receiver};

/// Input events from the terminal.
pub type UserEvent = crossterm::event::Event;

/// Starts the thread reading terminal events.
///
/// The thread ends once the returned receiver is dropped.
pub fn init_user_event() -> Receiver<Result<UserEvent>> {
    let (tx, rx) = mpsc::channel(64);
    thread::spawn(move || {
        loop {
            if tx.blocking_send(crossterm::event::read()).is_err() {
                break;
            }
        }
    });
    rx
}
