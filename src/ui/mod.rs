//! User interface.
//!
//! The screen is split into the option form on the left, the command
//! preview and Pack3r's output on the right, and a status bar at the bottom.
//! Dialogs are drawn on top of everything else.

pub mod dialog;
pub mod form;
pub mod input;
pub mod output;

use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::prelude::Buffer;
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

use crate::app::App;
use form::{FormWidget, VALUE_COLUMN};

const KEY_HINTS: &str = " [r]un  [c]opy command  [y]ank output  [x] clear  [w]rap  [R]eset  [q]uit ";

/// Areas of the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub form: Rect,
    pub preview: Rect,
    pub output: Rect,
    pub status: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let [main, status] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        let [form, right] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(main);
        let [preview, output] = Layout::vertical([Constraint::Length(6), Constraint::Min(3)]).areas(right);

        Self {
            form,
            preview,
            output,
            status,
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = AppLayout::new(area);

        FormWidget {
            builder: &self.builder,
            state: &self.form,
            locked: self.is_running(),
        }
        .render(layout.form, buf);

        let preview = Block::default()
            .borders(Borders::ALL)
            .title(" Command ")
            .title_bottom(Line::from(KEY_HINTS).fg(Color::DarkGray));
        Paragraph::new(self.builder.build().preview())
            .wrap(Wrap { trim: false })
            .block(preview)
            .render(layout.preview, buf);

        self.output.render(layout.output, buf);

        render_status(self, layout.status, buf);

        if let Some(dialog) = &self.dialog {
            dialog.render(area, buf);
        }
    }
}

fn render_status(app: &App, area: Rect, buf: &mut Buffer) {
    let version = format!(
        " Pack3r {} | pack3r-tui {} ",
        app.pack3r_version.as_deref().unwrap_or("-"),
        env!("CARGO_PKG_VERSION")
    );
    let [message_area, version_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(u16::try_from(version.len()).unwrap_or(u16::MAX)),
    ])
    .areas(area);

    let message = match &app.status {
        Some(status) => Span::styled(format!(" {}", status), Style::default().fg(Color::Yellow)),
        None => Span::raw(format!(" {}", app.form.focused().help())).dark_gray(),
    };
    Line::from(message).render(message_area, buf);
    Line::from(version).reversed().render(version_area, buf);
}

/// Terminal cursor position while a form field is being edited.
pub fn cursor_position(app: &App, area: Rect) -> Option<Position> {
    if app.dialog.is_some() {
        return None;
    }
    let input = app.form.editing.as_ref()?;

    let form = AppLayout::new(area).form;
    let inner = Block::default().borders(Borders::ALL).inner(form);
    let row = u16::try_from(app.form.focus_index()).ok()?;
    if row >= inner.height {
        return None;
    }

    let right_edge = inner.x + inner.width.saturating_sub(1);
    let x = (inner.x + VALUE_COLUMN).saturating_add(input.cursor_column()).min(right_edge);
    Some(Position::new(x, inner.y + row))
}
