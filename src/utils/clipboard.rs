use anyhow::{Context, Result};
use arboard::Clipboard;

/// System clipboard, opened on first use and kept open afterwards.
///
/// On X11 and Wayland the copied text is served by the process owning the
/// `Clipboard`, so it has to stay open after `set_text`.
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `text` on the system clipboard.
    pub fn copy(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new().context("Failed to access clipboard")?,
        };
        self.clipboard
            .insert(clipboard)
            .set_text(text)
            .context("Failed to copy to clipboard")?;
        Ok(())
    }

    /// Whether a clipboard connection is currently held.
    pub fn is_open(&self) -> bool {
        self.clipboard.is_some()
    }
}
