/// Restores the terminal when dropped.
///
/// Created right after `ratatui::init()`. Dropping it on a normal return or
/// while unwinding from a panic leaves the user's shell in a usable state.
///
/// # Examples
///
/// ```no_run
/// use pack3r_tui::utils::terminal_guard::TerminalGuard;
///
/// let _terminal = ratatui::init();
/// let _guard = TerminalGuard::new();
/// // ratatui::restore() runs when _guard goes out of scope
/// ```
#[derive(Debug)]
pub struct TerminalGuard {
    restored: bool,
}

impl TerminalGuard {
    pub fn new() -> Self {
        Self { restored: false }
    }

    /// Restores the terminal now instead of on drop.
    pub fn restore(&mut self) {
        if !self.restored {
            self.restored = true;
            ratatui::restore();
        }
    }
}

impl Default for TerminalGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.restore();
    }
}
