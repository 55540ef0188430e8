//! Application state and the main loop.
//!
//! [`App`] owns the form ([`CommandBuilder`]), the Pack3r process and the
//! output pane. The loop waits on terminal input and process events at the
//! same time; while Pack3r waits for an overwrite answer, process events stay
//! queued until the user has answered the dialog.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use anyhow::{Context, Result};
use crossterm::event::KeyEventKind;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error, info, warn};

use crate::command::{paths, CommandBuilder, Pack3rCommand, Pack3rOption, ValidationError};
use crate::event::keys::{self, Action, DialogAnswer, EditOutcome};
use crate::event::UserEvent;
use crate::process::{ProcessEvent, ProcessHandler, ProcessUpdate};
use crate::settings::SettingsStore;
use crate::ui::dialog::Dialog;
use crate::ui::form::{FormField, FormState};
use crate::ui::input::LineInput;
use crate::ui::output::OutputView;
use crate::utils::clipboard::SystemClipboard;

const OUTPUT_SCROLL_STEP: usize = 10;

/// Startup options, usually from the command line.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub settings_path: PathBuf,
    /// Map to load on startup.
    pub map: Option<String>,
    /// Pack3r executable to use instead of the saved one.
    pub pack3r: Option<String>,
}

pub struct App {
    // backend
    process: ProcessHandler,
    settings: SettingsStore,
    clipboard: SystemClipboard,
    // Pack3r path changed during a run; query the version once it exits
    version_check_pending: bool,

    // they are public to ui module
    pub(in super) builder: CommandBuilder,
    pub(in super) form: FormState,
    pub(in super) output: OutputView,
    pub(in super) dialog: Option<Dialog>,
    // Dialog pushed aside by the overwrite prompt, shown again after it
    deferred_dialog: Option<Dialog>,
    pub(in super) pack3r_version: Option<String>,
    pub(in super) status: Option<String>,

    exit: bool,

    user_events: Receiver<std::io::Result<UserEvent>>,
}

impl App {
    pub fn new(config: AppConfig, user_events: Receiver<std::io::Result<UserEvent>>) -> Self {
        let settings = SettingsStore::open(config.settings_path);
        let mut builder = CommandBuilder::new();
        builder.set_pack3r_path(config.pack3r.unwrap_or_else(|| settings.get().pack3r_path.clone()));

        let mut app = Self {
            process: ProcessHandler::new(),
            output: OutputView::new(settings.get().wrap_output_lines),
            settings,
            clipboard: SystemClipboard::new(),
            version_check_pending: false,
            builder,
            form: FormState::default(),
            dialog: None,
            deferred_dialog: None,
            pack3r_version: None,
            status: None,
            exit: false,
            user_events,
        };

        app.check_pack3r_version();
        if let Some(map) = config.map {
            app.select_map(&map);
        }
        app
    }

    pub fn is_running(&self) -> bool {
        self.process.is_running()
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            if self.exit {
                break Ok(());
            }
            let paused = self.process.is_awaiting_answer();
            tokio::select! {
                res = self.user_events.recv() => {
                    let usr_evt = res.with_context(|| anyhow::anyhow!("User event stream is ended."))?;
                    self.handle_user_event(usr_evt?);
                }
                Some(event) = self.process.recv_event(), if !paused => {
                    self.handle_process_event(event);
                }
            }
            self.draw(terminal)?;
        }
    }

    pub fn draw(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        terminal.draw(|frame| {
            let area = frame.area();
            frame.render_widget(&*self, area);
            if let Some(position) = crate::ui::cursor_position(self, area) {
                frame.set_cursor_position(position);
            }
        })?;
        Ok(())
    }

    /// Runs `Pack3r --version` if a usable executable is selected.
    fn check_pack3r_version(&mut self) {
        self.pack3r_version = None;
        self.version_check_pending = false;

        let path = self.builder.pack3r_path().to_string();
        if path.is_empty() || !paths::is_valid_pack3r_binary(&path) {
            return;
        }
        if !paths::is_executable(&path) {
            warn!("Skipping version check, {} is not executable", path);
            return;
        }
        if self.process.is_running() {
            debug!("Deferring version check until Pack3r exits");
            self.version_check_pending = true;
            return;
        }

        if let Err(e) = self.process.spawn(&Pack3rCommand::version_query(path), "") {
            warn!("Version check failed: {:#}", e);
        }
    }

    fn handle_process_event(&mut self, event: ProcessEvent) {
        for update in self.process.handle_event(event) {
            self.apply_update(update);
        }
    }

    fn apply_update(&mut self, update: ProcessUpdate) {
        match update {
            ProcessUpdate::Line(line) => self.output.push(line),
            ProcessUpdate::Version(version) => {
                let version = version.trim();
                info!("Pack3r version {}", version);
                self.pack3r_version = (!version.is_empty()).then(|| version.to_string());
            }
            ProcessUpdate::OverwritePrompt { output_file } => {
                if let Some(open) = self.dialog.replace(Dialog::Overwrite { output_file }) {
                    debug!(?open, "Overwrite prompt shown over an open dialog");
                    self.deferred_dialog = Some(open);
                }
            }
            ProcessUpdate::Finished {
                exit_code,
                version_check,
            } => {
                if !version_check {
                    self.status = Some(match exit_code {
                        Some(0) => "Pack3r finished".to_string(),
                        Some(code) => format!("Pack3r exited with code {}", code),
                        None => "Pack3r was terminated".to_string(),
                    });
                }
                if self.version_check_pending {
                    self.check_pack3r_version();
                }
            }
            ProcessUpdate::Error(message) => {
                error!("Pack3r: {}", message);
                self.status = Some(message);
            }
        }
    }
}

impl App {
    fn handle_user_event(&mut self, event: UserEvent) {
        // Anything else (resize, focus) only needs the redraw
        let UserEvent::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        if let Some(dialog) = self.dialog.take() {
            self.handle_dialog_key(dialog, key);
            if self.dialog.is_none() {
                self.dialog = self.deferred_dialog.take();
            }
            return;
        }

        if let Some(mut input) = self.form.editing.take() {
            match keys::edit_key(&mut input, key) {
                EditOutcome::Continue => self.form.editing = Some(input),
                EditOutcome::Commit => self.commit_edit(input.into_text()),
                EditOutcome::Cancel => {}
            }
            return;
        }

        if let Some(action) = keys::form_action(key) {
            self.status = None;
            self.perform(action);
        }
    }

    fn handle_dialog_key(&mut self, dialog: Dialog, key: crossterm::event::KeyEvent) {
        if !dialog.is_question() {
            return;
        }
        let Some(answer) = keys::dialog_answer(key) else {
            self.dialog = Some(dialog);
            return;
        };
        let yes = answer == DialogAnswer::Yes;

        match dialog {
            Dialog::Overwrite { .. } => match self.process.answer_overwrite(yes) {
                Ok(updates) => {
                    for update in updates {
                        self.apply_update(update);
                    }
                }
                Err(e) => {
                    error!("Failed to answer overwrite prompt: {:#}", e);
                    self.status = Some(format!("{:#}", e));
                }
            },
            Dialog::SaveMapsPath { root } => {
                if yes {
                    info!("Saving maps path {}", root);
                    self.settings.update(|s| s.maps_path = root);
                }
            }
            Dialog::Error { .. } => {}
        }
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::Quit => self.exit = true,
            Action::Run => self.run_pack3r(),
            Action::FocusNext => self.form.focus_next(),
            Action::FocusPrev => self.form.focus_prev(),
            Action::Toggle => self.toggle_focused(),
            Action::Edit => {
                if self.form.focused().is_text() {
                    self.begin_edit();
                } else {
                    self.toggle_focused();
                }
            }
            Action::CopyCommand => {
                let command = self.builder.build().preview();
                self.copy(&command, "Command");
            }
            Action::CopyOutput => {
                let text = self.output.text();
                self.copy(&text, "Output");
            }
            Action::ClearOutput => self.output.clear(),
            Action::ToggleWrap => {
                let wrap = !self.output.wrap();
                self.output.set_wrap(wrap);
                self.settings.update(|s| s.wrap_output_lines = wrap);
            }
            Action::Reset => self.reset(),
            Action::ScrollUp => self.output.scroll_up(OUTPUT_SCROLL_STEP),
            Action::ScrollDown => self.output.scroll_down(OUTPUT_SCROLL_STEP),
        }
    }

    fn copy(&mut self, text: &str, what: &str) {
        self.status = Some(match self.clipboard.copy(text) {
            Ok(()) => format!("{} copied to clipboard", what),
            Err(e) => {
                warn!("{:#}", e);
                "Clipboard is not available".to_string()
            }
        });
    }

    fn toggle_focused(&mut self) {
        match self.form.focused() {
            FormField::Pack3rPath | FormField::MapPath => self.begin_edit(),
            FormField::Option(Pack3rOption::Verbosity) => self.builder.cycle_verbosity(),
            FormField::Option(option) => self.builder.toggle(option),
        }
    }

    fn begin_edit(&mut self) {
        let text = match self.form.focused() {
            FormField::Pack3rPath => self.builder.pack3r_path().to_string(),
            FormField::MapPath if self.builder.map_path().is_empty() => self.default_map_dir(),
            FormField::MapPath => self.builder.map_path().to_string(),
            FormField::Option(option) => {
                if !self.builder.is_enabled(option) {
                    self.status = Some(format!("Enable '{}' to edit its value", option.label()));
                    return;
                }
                self.builder.value(option).to_string()
            }
        };
        self.form.editing = Some(LineInput::new(text));
    }

    /// Where to start typing a map path: the saved maps directory.
    fn default_map_dir(&self) -> String {
        let maps_path = &self.settings.get().maps_path;
        if maps_path.is_empty() {
            String::new()
        } else {
            format!("{}maps{}", maps_path, MAIN_SEPARATOR)
        }
    }

    fn commit_edit(&mut self, text: String) {
        let text = text.trim();
        match self.form.focused() {
            FormField::Pack3rPath => self.select_pack3r(text),
            FormField::MapPath => self.select_map(text),
            FormField::Option(Pack3rOption::Output) if Path::new(text).is_dir() => {
                self.builder.set_output_directory(text);
            }
            FormField::Option(option) => self.builder.set_value(option, text),
        }
    }

    fn select_pack3r(&mut self, path: &str) {
        if path.is_empty() {
            self.builder.set_pack3r_path("");
            self.pack3r_version = None;
            return;
        }
        if !paths::is_valid_pack3r_binary(path) {
            self.dialog = Some(ValidationError::InvalidPack3rBinary(path.to_string()).into());
            return;
        }
        if !paths::is_executable(path) {
            self.dialog = Some(ValidationError::NotExecutable(path.to_string()).into());
            return;
        }

        self.builder.set_pack3r_path(path);
        self.settings.update(|s| s.pack3r_path = path.to_string());
        self.check_pack3r_version();
    }

    fn select_map(&mut self, path: &str) {
        if path.is_empty() {
            self.builder.set_map_path("");
            return;
        }
        if !paths::is_map_file(path) {
            self.dialog = Some(Dialog::error("Not a map file!", "Select a .map or .reg file."));
            return;
        }
        if let Err(e) = self.builder.load_map(path) {
            self.dialog = Some(e.into());
            return;
        }

        if self.settings.get().maps_path.is_empty() {
            if let Some(root) = paths::maps_root(path) {
                self.dialog = Some(Dialog::SaveMapsPath { root });
            }
        }
    }

    fn run_pack3r(&mut self) {
        if self.process.is_running() {
            self.status = Some("Pack3r is already running".to_string());
            return;
        }
        if let Err(e) = self.builder.validate() {
            info!("Not running Pack3r: {}", e);
            self.dialog = Some(e.into());
            return;
        }

        let command = self.builder.build();
        self.output.clear();
        match self.process.spawn(&command, self.builder.output_path()) {
            Ok(()) => self.status = Some("Running Pack3r...".to_string()),
            Err(e) => {
                error!("{:#}", e);
                self.dialog = Some(Dialog::error("Failed to start Pack3r", format!("{:#}", e)));
            }
        }
    }

    /// Clears the form, keeping the saved Pack3r executable.
    fn reset(&mut self) {
        self.builder.reset();
        self.builder.set_pack3r_path(self.settings.get().pack3r_path.clone());
        self.form.editing = None;
        self.status = Some("Options reset".to_string());
    }
}
