//! Pack3r process execution and supervision.
//!
//! This module spawns Pack3r as a child process, streams its stdout/stderr
//! through the output parser, and answers Pack3r's overwrite prompt.

mod handler;

pub use handler::ProcessHandler;

/// Flag that makes Pack3r print its version and exit.
pub const VERSION_FLAG: &str = "--version";

/// Text Pack3r prints when the output file already exists.
pub const OVERWRITE_PROMPT_MARKER: &[u8] = b"Overwrite? Y/N";

/// Raw notification from the reader tasks of one process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEvent {
    /// Run that produced the event; events of older runs are dropped.
    pub run_id: u64,
    pub kind: ProcessEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEventKind {
    /// A chunk read from stdout
    Stdout(Vec<u8>),
    /// A chunk read from stderr
    Stderr(Vec<u8>),
    /// Reading one of the streams failed
    ReadError(String),
    /// Both streams closed and the child was reaped
    Exited(Option<i32>),
}

/// What the UI has to do after a process event was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessUpdate {
    /// A completed output line to append to the output pane
    Line(String),
    /// Version string parsed from a `--version` run
    Version(String),
    /// Pack3r is waiting for an answer to its overwrite prompt.
    ///
    /// The caller must stop feeding events until
    /// [`ProcessHandler::answer_overwrite`] has been called.
    OverwritePrompt { output_file: String },
    /// The process has exited
    Finished {
        exit_code: Option<i32>,
        version_check: bool,
    },
    /// Non-fatal error to show to the user
    Error(String),
}

/// Whether an argument list is exactly the version query.
pub fn is_version_query(args: &[String]) -> bool {
    matches!(args, [flag] if flag == VERSION_FLAG)
}
