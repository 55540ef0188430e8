//! Pack3r child process lifecycle and output routing.
//!
//! Each run owns three background tasks: one reader per output stream and a
//! stdin writer. Readers forward chunks through a single channel owned by
//! [`ProcessHandler`], so the event loop sees stdout and stderr in the order
//! they were read and handles one chunk at a time.

use std::io::ErrorKind;
use std::process::Stdio;

use anyhow::{anyhow, bail, Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStdin, Command};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use super::{is_version_query, ProcessEvent, ProcessEventKind, ProcessUpdate, OVERWRITE_PROMPT_MARKER};
use crate::command::Pack3rCommand;
use crate::output::{parse_version, OutputParser};

const PROCESS_READ_BUFFER: usize = 16384; // 16KB per read
const OPERATION_CANCELED: &[u8] = b"Operation canceled\n";

/// Runs Pack3r and turns its output into [`ProcessUpdate`]s.
pub struct ProcessHandler {
    parser: OutputParser,

    event_tx: UnboundedSender<ProcessEvent>,
    event_rx: UnboundedReceiver<ProcessEvent>,
    stdin_tx: Option<UnboundedSender<Vec<u8>>>,

    // Per-run state, reset in begin_run()
    run_id: u64,
    running: bool,
    is_version_check: bool,
    overwrite_prompted: bool,
    awaiting_answer: bool,
    output_file: String,
}

impl Default for ProcessHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessHandler {
    pub fn new() -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            parser: OutputParser::new(),
            event_tx,
            event_rx,
            stdin_tx: None,
            run_id: 0,
            running: false,
            is_version_check: false,
            overwrite_prompted: false,
            awaiting_answer: false,
            output_file: String::new(),
        }
    }

    /// Spawns Pack3r with the given command line.
    ///
    /// `output_file` is only used to tell the user which file Pack3r wants
    /// to overwrite. Fails if a run is still active or the executable could
    /// not be started.
    pub fn spawn(&mut self, command: &Pack3rCommand, output_file: &str) -> Result<()> {
        if self.running {
            bail!("Pack3r is already running");
        }

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start '{}'", command.program))?;

        let stdout = child.stdout.take().context("Pack3r stdout was not captured")?;
        let stderr = child.stderr.take().context("Pack3r stderr was not captured")?;
        let stdin = child.stdin.take().context("Pack3r stdin was not captured")?;

        let (stdin_tx, stdin_rx) = mpsc::unbounded_channel();
        let run_id = self.begin_run(&command.args, output_file, stdin_tx);

        info!(run_id, program = %command.program, args = ?command.args, "Spawned Pack3r");

        tokio::spawn(write_stdin(stdin, stdin_rx));

        let events = self.event_tx.clone();
        tokio::spawn(async move {
            let stdout_task = tokio::spawn(pump(stdout, events.clone(), run_id, ProcessEventKind::Stdout));
            let stderr_task = tokio::spawn(pump(stderr, events.clone(), run_id, ProcessEventKind::Stderr));

            // Exited must come after the last chunk of both streams
            for task in [stdout_task, stderr_task] {
                if let Err(e) = task.await {
                    error!("Pack3r output reader panicked: {}", e);
                }
            }

            let exit_code = match child.wait().await {
                Ok(status) => status.code(),
                Err(e) => {
                    error!("Failed to wait for Pack3r: {}", e);
                    None
                }
            };

            if events
                .send(ProcessEvent {
                    run_id,
                    kind: ProcessEventKind::Exited(exit_code),
                })
                .is_err()
            {
                debug!(run_id, "Process handler dropped before Pack3r exited");
            }
        });

        Ok(())
    }

    /// Resets per-run state and installs the stdin channel of a new run.
    pub(crate) fn begin_run(
        &mut self,
        args: &[String],
        output_file: &str,
        stdin_tx: UnboundedSender<Vec<u8>>,
    ) -> u64 {
        self.run_id += 1;
        self.running = true;
        self.is_version_check = is_version_query(args);
        self.overwrite_prompted = false;
        self.awaiting_answer = false;
        self.output_file = output_file.to_string();
        self.stdin_tx = Some(stdin_tx);
        self.parser.reset();
        self.run_id
    }

    /// Waits for the next chunk or exit notification from the child.
    pub async fn recv_event(&mut self) -> Option<ProcessEvent> {
        self.event_rx.recv().await
    }

    /// Routes one event through the parser and prompt detection.
    pub fn handle_event(&mut self, event: ProcessEvent) -> Vec<ProcessUpdate> {
        if event.run_id != self.run_id {
            debug!(stale = event.run_id, current = self.run_id, "Ignoring event from a previous run");
            return Vec::new();
        }

        match event.kind {
            ProcessEventKind::Stdout(data) => self.read_stdout(&data),
            ProcessEventKind::Stderr(data) => self.read_stderr(&data),
            ProcessEventKind::ReadError(message) => {
                warn!(run_id = self.run_id, "Pack3r output read error: {}", message);
                vec![ProcessUpdate::Error(format!("Failed to read Pack3r output: {}", message))]
            }
            ProcessEventKind::Exited(exit_code) => {
                self.running = false;
                self.awaiting_answer = false;
                self.stdin_tx = None;

                if !self.parser.partial_line().is_empty() {
                    debug!(
                        partial = %String::from_utf8_lossy(self.parser.partial_line()),
                        "Pack3r exited with an unterminated output line"
                    );
                }
                info!(run_id = self.run_id, ?exit_code, "Pack3r exited");

                vec![ProcessUpdate::Finished {
                    exit_code,
                    version_check: self.is_version_check,
                }]
            }
        }
    }

    fn read_stdout(&mut self, data: &[u8]) -> Vec<ProcessUpdate> {
        if self.is_version_check {
            return match parse_version(data) {
                Some(version) => {
                    info!(%version, "Parsed Pack3r version");
                    vec![ProcessUpdate::Version(version)]
                }
                None => Vec::new(),
            };
        }

        let mut updates = self.lines(data);

        if !self.overwrite_prompted && contains_prompt_marker(data) {
            self.overwrite_prompted = true;
            self.awaiting_answer = true;
            info!(output_file = %self.output_file, "Pack3r asks to overwrite existing output");
            updates.push(ProcessUpdate::OverwritePrompt {
                output_file: self.output_file.clone(),
            });
        }

        updates
    }

    // Pack3r doesn't write to stderr today, this keeps it working if it starts
    fn read_stderr(&mut self, data: &[u8]) -> Vec<ProcessUpdate> {
        self.lines(data)
    }

    fn lines(&mut self, data: &[u8]) -> Vec<ProcessUpdate> {
        self.parser
            .process_output(data)
            .into_iter()
            .map(ProcessUpdate::Line)
            .collect()
    }

    /// Answers a pending overwrite prompt.
    ///
    /// Writes `y\n` or `n\n` to Pack3r. Declining also appends an
    /// "Operation canceled" line to the output. Does nothing when no prompt
    /// is pending.
    pub fn answer_overwrite(&mut self, overwrite: bool) -> Result<Vec<ProcessUpdate>> {
        if !self.awaiting_answer {
            warn!("Overwrite answer without a pending prompt");
            return Ok(Vec::new());
        }
        self.awaiting_answer = false;

        let response: &[u8] = if overwrite { b"y\n" } else { b"n\n" };
        self.write(response)
            .context("Failed to answer Pack3r overwrite prompt")?;
        info!(overwrite, "Answered overwrite prompt");

        if overwrite {
            Ok(Vec::new())
        } else {
            Ok(self.lines(OPERATION_CANCELED))
        }
    }

    fn write(&self, data: &[u8]) -> Result<()> {
        let stdin = self.stdin_tx.as_ref().context("Pack3r is not running")?;
        stdin
            .send(data.to_vec())
            .map_err(|_| anyhow!("Pack3r stdin is closed"))?;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// True between an overwrite prompt and its answer.
    pub fn is_awaiting_answer(&self) -> bool {
        self.awaiting_answer
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }
}

fn contains_prompt_marker(data: &[u8]) -> bool {
    data.windows(OVERWRITE_PROMPT_MARKER.len())
        .any(|window| window == OVERWRITE_PROMPT_MARKER)
}

/// Forwards everything read from `reader` until EOF or a read error.
async fn pump<R>(
    mut reader: R,
    events: UnboundedSender<ProcessEvent>,
    run_id: u64,
    wrap: fn(Vec<u8>) -> ProcessEventKind,
) where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; PROCESS_READ_BUFFER];

    loop {
        let (kind, done) = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => (wrap(buf[..n].to_vec()), false),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => (ProcessEventKind::ReadError(e.to_string()), true),
        };

        if events.send(ProcessEvent { run_id, kind }).is_err() {
            // Handler dropped
            break;
        }
        if done {
            break;
        }
    }
}

async fn write_stdin(mut stdin: ChildStdin, mut input: UnboundedReceiver<Vec<u8>>) {
    while let Some(data) = input.recv().await {
        if let Err(e) = stdin.write_all(&data).await {
            warn!("Failed to write to Pack3r stdin: {}", e);
            break;
        }
        if let Err(e) = stdin.flush().await {
            warn!("Failed to flush Pack3r stdin: {}", e);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(handler: &mut ProcessHandler, args: &[&str]) -> UnboundedReceiver<Vec<u8>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        handler.begin_run(&args, "/q3/etmain/mymap.pk3", tx);
        rx
    }

    fn stdout(handler: &mut ProcessHandler, data: &[u8]) -> Vec<ProcessUpdate> {
        let run_id = handler.run_id();
        handler.handle_event(ProcessEvent {
            run_id,
            kind: ProcessEventKind::Stdout(data.to_vec()),
        })
    }

    fn prompts(updates: &[ProcessUpdate]) -> usize {
        updates
            .iter()
            .filter(|u| matches!(u, ProcessUpdate::OverwritePrompt { .. }))
            .count()
    }

    #[test]
    fn test_stdout_lines() {
        let mut handler = ProcessHandler::new();
        let _stdin = start(&mut handler, &["maps/mymap.map"]);

        assert!(stdout(&mut handler, b"Parsing ").is_empty());
        let updates = stdout(&mut handler, b"map\rPacking\n");

        // "Parsing map" overwritten from column 0, the tail survives
        assert_eq!(updates, vec![ProcessUpdate::Line("Packing map".to_string())]);
    }

    #[test]
    fn test_version_run_reports_version() {
        let mut handler = ProcessHandler::new();
        let _stdin = start(&mut handler, &["--version"]);

        let updates = stdout(&mut handler, b"1.4.0+5e1f2a9\n");
        assert_eq!(updates, vec![ProcessUpdate::Version("1.4.0".to_string())]);

        // trailing empty chunk keeps the version
        assert!(stdout(&mut handler, b"").is_empty());
    }

    #[test]
    fn test_version_run_ignores_prompt_marker() {
        let mut handler = ProcessHandler::new();
        let _stdin = start(&mut handler, &["--version"]);

        let updates = stdout(&mut handler, b"Overwrite? Y/N");

        assert_eq!(prompts(&updates), 0);
        assert!(!handler.is_awaiting_answer());
    }

    #[test]
    fn test_prompt_detected_without_newline() {
        let mut handler = ProcessHandler::new();
        let _stdin = start(&mut handler, &["maps/mymap.map"]);

        let updates = stdout(&mut handler, b"Output exists. Overwrite? Y/N ");

        assert_eq!(
            updates,
            vec![ProcessUpdate::OverwritePrompt {
                output_file: "/q3/etmain/mymap.pk3".to_string()
            }]
        );
        assert!(handler.is_awaiting_answer());
    }

    #[test]
    fn test_prompt_answered_once_per_run() {
        let mut handler = ProcessHandler::new();
        let _stdin = start(&mut handler, &["maps/mymap.map"]);

        let first = stdout(&mut handler, b"Overwrite? Y/N\nOverwrite? Y/N\n");
        assert_eq!(prompts(&first), 1);

        let answered = handler.answer_overwrite(true);
        assert!(answered.is_ok());

        let second = stdout(&mut handler, b"Overwrite? Y/N\n");
        assert_eq!(prompts(&second), 0);
        assert_eq!(second, vec![ProcessUpdate::Line("Overwrite? Y/N".to_string())]);
    }

    #[test]
    fn test_prompt_flag_resets_on_new_run() {
        let mut handler = ProcessHandler::new();
        let _first = start(&mut handler, &["maps/a.map"]);
        assert_eq!(prompts(&stdout(&mut handler, b"Overwrite? Y/N\n")), 1);

        let _second = start(&mut handler, &["maps/b.map"]);
        assert_eq!(prompts(&stdout(&mut handler, b"Overwrite? Y/N\n")), 1);
    }

    #[test]
    fn test_confirm_writes_yes() {
        let mut handler = ProcessHandler::new();
        let mut stdin = start(&mut handler, &["maps/mymap.map"]);
        stdout(&mut handler, b"Overwrite? Y/N\n");

        let updates = handler.answer_overwrite(true);

        assert!(matches!(updates.as_deref(), Ok([])));
        assert_eq!(stdin.try_recv().ok(), Some(b"y\n".to_vec()));
        assert!(!handler.is_awaiting_answer());
    }

    #[test]
    fn test_decline_writes_no_and_cancels() {
        let mut handler = ProcessHandler::new();
        let mut stdin = start(&mut handler, &["maps/mymap.map"]);
        stdout(&mut handler, b"Overwrite? Y/N\n");

        let updates = handler.answer_overwrite(false);

        assert_eq!(
            updates.ok(),
            Some(vec![ProcessUpdate::Line("Operation canceled".to_string())])
        );
        assert_eq!(stdin.try_recv().ok(), Some(b"n\n".to_vec()));
    }

    #[test]
    fn test_decline_after_unterminated_prompt_joins_line() {
        let mut handler = ProcessHandler::new();
        let _stdin = start(&mut handler, &["maps/mymap.map"]);
        stdout(&mut handler, b"Overwrite? Y/N ");

        let updates = handler.answer_overwrite(false);

        assert_eq!(
            updates.ok(),
            Some(vec![ProcessUpdate::Line("Overwrite? Y/N Operation canceled".to_string())])
        );
    }

    #[test]
    fn test_answer_without_prompt_is_noop() {
        let mut handler = ProcessHandler::new();
        let mut stdin = start(&mut handler, &["maps/mymap.map"]);

        let updates = handler.answer_overwrite(true);

        assert!(matches!(updates.as_deref(), Ok([])));
        assert!(stdin.try_recv().is_err());
    }

    #[test]
    fn test_stderr_is_not_scanned_for_prompt() {
        let mut handler = ProcessHandler::new();
        let _stdin = start(&mut handler, &["maps/mymap.map"]);

        let run_id = handler.run_id();
        let updates = handler.handle_event(ProcessEvent {
            run_id,
            kind: ProcessEventKind::Stderr(b"warning\rWARNING: Overwrite? Y/N\n".to_vec()),
        });

        assert_eq!(
            updates,
            vec![ProcessUpdate::Line("WARNING: Overwrite? Y/N".to_string())]
        );
    }

    #[test]
    fn test_stderr_in_version_run_is_displayed() {
        let mut handler = ProcessHandler::new();
        let _stdin = start(&mut handler, &["--version"]);

        let run_id = handler.run_id();
        let updates = handler.handle_event(ProcessEvent {
            run_id,
            kind: ProcessEventKind::Stderr(b"oops\n".to_vec()),
        });

        assert_eq!(updates, vec![ProcessUpdate::Line("oops".to_string())]);
    }

    #[test]
    fn test_stale_events_are_ignored() {
        let mut handler = ProcessHandler::new();
        let _first = start(&mut handler, &["maps/a.map"]);
        let stale = handler.run_id();
        let _second = start(&mut handler, &["maps/b.map"]);

        let updates = handler.handle_event(ProcessEvent {
            run_id: stale,
            kind: ProcessEventKind::Stdout(b"old\n".to_vec()),
        });

        assert!(updates.is_empty());
    }

    #[test]
    fn test_exit_finishes_run() {
        let mut handler = ProcessHandler::new();
        let _stdin = start(&mut handler, &["--version"]);
        assert!(handler.is_running());

        let run_id = handler.run_id();
        let updates = handler.handle_event(ProcessEvent {
            run_id,
            kind: ProcessEventKind::Exited(Some(0)),
        });

        assert_eq!(
            updates,
            vec![ProcessUpdate::Finished {
                exit_code: Some(0),
                version_check: true
            }]
        );
        assert!(!handler.is_running());
    }

    #[test]
    fn test_new_run_discards_partial_line() {
        let mut handler = ProcessHandler::new();
        let _first = start(&mut handler, &["maps/a.map"]);
        stdout(&mut handler, b"unterminated");

        let _second = start(&mut handler, &["maps/b.map"]);
        let updates = stdout(&mut handler, b"fresh\n");

        assert_eq!(updates, vec![ProcessUpdate::Line("fresh".to_string())]);
    }

    #[cfg(unix)]
    async fn collect_until_finished(handler: &mut ProcessHandler) -> Vec<ProcessUpdate> {
        let mut all = Vec::new();
        loop {
            let event = tokio::time::timeout(std::time::Duration::from_secs(10), handler.recv_event())
                .await
                .ok()
                .flatten();
            let Some(event) = event else {
                panic!("Timed out waiting for process events");
            };
            for update in handler.handle_event(event) {
                let finished = matches!(update, ProcessUpdate::Finished { .. });
                all.push(update);
                if finished {
                    return all;
                }
            }
        }
    }

    #[cfg(unix)]
    fn sh(script: &str) -> Pack3rCommand {
        Pack3rCommand {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawn_streams_output() {
        let mut handler = ProcessHandler::new();
        let spawned = handler.spawn(&sh("printf 'one\\ntw'; sleep 0.1; printf 'o\\n'"), "out.pk3");
        assert!(spawned.is_ok());

        let updates = collect_until_finished(&mut handler).await;

        assert_eq!(
            updates[..2],
            [
                ProcessUpdate::Line("one".to_string()),
                ProcessUpdate::Line("two".to_string())
            ]
        );
        assert_eq!(
            updates.last(),
            Some(&ProcessUpdate::Finished {
                exit_code: Some(0),
                version_check: false
            })
        );
        assert!(!handler.is_running());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawn_routes_stderr() {
        let mut handler = ProcessHandler::new();
        assert!(handler.spawn(&sh("printf 'err\\n' >&2; exit 3"), "out.pk3").is_ok());

        let updates = collect_until_finished(&mut handler).await;

        assert_eq!(
            updates,
            vec![
                ProcessUpdate::Line("err".to_string()),
                ProcessUpdate::Finished {
                    exit_code: Some(3),
                    version_check: false
                }
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawn_answers_prompt_through_stdin() {
        let mut handler = ProcessHandler::new();
        let script = "printf 'File exists. Overwrite? Y/N '; read answer; printf 'got %s\\n' \"$answer\"";
        assert!(handler.spawn(&sh(script), "out.pk3").is_ok());

        loop {
            let Some(event) = handler.recv_event().await else {
                panic!("Event channel closed");
            };
            let updates = handler.handle_event(event);
            if prompts(&updates) == 1 {
                break;
            }
        }

        assert!(handler.answer_overwrite(true).is_ok());
        let updates = collect_until_finished(&mut handler).await;

        assert!(updates.contains(&ProcessUpdate::Line("File exists. Overwrite? Y/N got y".to_string())));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawn_rejects_second_run() {
        let mut handler = ProcessHandler::new();
        assert!(handler.spawn(&sh("sleep 1"), "").is_ok());

        assert!(handler.spawn(&sh("true"), "").is_err());
    }

    #[tokio::test]
    async fn test_spawn_missing_executable_fails() {
        let mut handler = ProcessHandler::new();
        let command = Pack3rCommand {
            program: "/nonexistent/Pack3r".to_string(),
            args: vec!["--version".to_string()],
        };

        assert!(handler.spawn(&command, "").is_err());
        assert!(!handler.is_running());
    }
}
