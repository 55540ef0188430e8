//! Utility modules: logging setup, clipboard access and terminal restore.

pub mod clipboard;
pub mod logger;
pub mod terminal_guard;
