//! Modal dialogs drawn over the main view.

use ratatui::layout::{Constraint, Flex, Layout};
use ratatui::prelude::{Buffer, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use crate::command::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    /// Pack3r is waiting for an answer on stdin.
    Overwrite { output_file: String },
    Error { title: String, hint: String },
    /// Offer to remember the mapping install directory of a loaded map.
    SaveMapsPath { root: String },
}

impl Dialog {
    pub fn error(title: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Error {
            title: title.into(),
            hint: hint.into(),
        }
    }

    /// Yes/no dialogs need an explicit answer; the rest close on any key.
    pub fn is_question(&self) -> bool {
        !matches!(self, Self::Error { .. })
    }

    fn title(&self) -> String {
        match self {
            Self::Overwrite { .. } => " File exists ".to_string(),
            Self::Error { title, .. } => format!(" {} ", title),
            Self::SaveMapsPath { .. } => " Save maps path ".to_string(),
        }
    }

    fn body(&self) -> String {
        match self {
            Self::Overwrite { output_file } => {
                format!("The output file already exists:\n{}\n\nOverwrite?", output_file)
            }
            Self::Error { hint, .. } => hint.clone(),
            Self::SaveMapsPath { root } => {
                format!("Remember this mapping install path as the default?\n{}", root)
            }
        }
    }
}

impl From<ValidationError> for Dialog {
    fn from(e: ValidationError) -> Self {
        Self::error(e.to_string(), e.hint())
    }
}

/// `width` x `height` rect centered in `area`, clipped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

impl Widget for &Dialog {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = (area.width * 3 / 5).max(40);
        let body = self.body();
        let text_width = width.saturating_sub(4).max(1) as usize;
        let body_rows: usize = body
            .lines()
            .map(|line| textwrap::wrap(line, text_width).len().max(1))
            .sum();
        let height = u16::try_from(body_rows).unwrap_or(u16::MAX).saturating_add(5);

        let rect = centered(area, width, height);
        Clear.render(rect, buf);

        let color = match self {
            Dialog::Error { .. } => Color::Red,
            _ => Color::Yellow,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Line::from(self.title()).style(Style::default().add_modifier(Modifier::BOLD)));
        let inner = block.inner(rect);
        block.render(rect, buf);

        let footer = if self.is_question() {
            "[y] Yes   [n] No"
        } else {
            "Press any key"
        };
        let mut lines: Vec<Line> = body.lines().map(|l| Line::from(l.to_string())).collect();
        lines.push(Line::default());
        lines.push(Line::from(footer).style(Style::default().fg(Color::DarkGray)));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().padding(ratatui::widgets::Padding::horizontal(1)))
            .render(inner, buf);
    }
}
