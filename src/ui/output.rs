//! Output pane: the lines Pack3r has printed during the current run.

use std::cell::Cell;

use ratatui::prelude::{Buffer, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

/// Completed output lines, scroll position and wrapping mode.
#[derive(Debug, Default)]
pub struct OutputView {
    lines: Vec<String>,
    wrap: bool,
    // Rows scrolled up from the bottom; 0 follows new output
    scroll_back: usize,
    // Largest useful scroll_back, from the last render
    max_scroll: Cell<usize>,
}

impl OutputView {
    pub fn new(wrap: bool) -> Self {
        Self {
            wrap,
            ..Self::default()
        }
    }

    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.scroll_back = 0;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All output as one string, for the clipboard.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn wrap(&self) -> bool {
        self.wrap
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
        self.scroll_back = 0;
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll_back = (self.scroll_back + rows).min(self.max_scroll.get());
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(rows);
    }

    /// Screen rows for the output at the given width.
    fn rows(&self, width: usize) -> Vec<String> {
        if !self.wrap || width == 0 {
            return self.lines.clone();
        }

        let mut rows = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            let wrapped = textwrap::wrap(line, width);
            if wrapped.is_empty() {
                rows.push(String::new());
            }
            rows.extend(wrapped.into_iter().map(|row| row.into_owned()));
        }
        rows
    }
}

impl Widget for &OutputView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.wrap { " Output [wrap] " } else { " Output " };
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = self.rows(inner.width as usize);
        let height = inner.height as usize;
        let max_scroll = rows.len().saturating_sub(height);
        self.max_scroll.set(max_scroll);

        let back = self.scroll_back.min(max_scroll);
        let end = rows.len() - back;
        let start = end.saturating_sub(height);

        let visible: Vec<Line> = rows[start..end].iter().map(|row| Line::from(row.as_str())).collect();
        Paragraph::new(visible).render(inner, buf);

        if back > 0 {
            let marker = format!(" ↑{} ", back);
            let x = area.x + area.width.saturating_sub(marker.chars().count() as u16 + 1);
            buf.set_string(x, area.y, marker, Style::default().fg(Color::Yellow));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(lines: &[&str], wrap: bool) -> OutputView {
        let mut view = OutputView::new(wrap);
        for line in lines {
            view.push(line.to_string());
        }
        view
    }

    fn rendered(view: &OutputView, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);

        (1..height - 1)
            .map(|y| {
                (1..width - 1)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_follows_newest_lines() {
        let view = view(&["one", "two", "three", "four"], false);

        assert_eq!(rendered(&view, 12, 4), vec!["three", "four"]);
    }

    #[test]
    fn test_scroll_back_and_forward() {
        let mut view = view(&["one", "two", "three", "four"], false);
        rendered(&view, 12, 4);

        view.scroll_up(10);
        assert_eq!(rendered(&view, 12, 4), vec!["one", "two"]);

        view.scroll_down(1);
        assert_eq!(rendered(&view, 12, 4), vec!["two", "three"]);
    }

    #[test]
    fn test_wrap_splits_long_lines() {
        let view = view(&["Packing textures done"], true);

        assert_eq!(view.rows(10), vec!["Packing", "textures", "done"]);
    }

    #[test]
    fn test_wrap_keeps_empty_lines() {
        let view = view(&["a", "", "b"], true);

        assert_eq!(view.rows(10), vec!["a", "", "b"]);
    }

    #[test]
    fn test_text_and_clear() {
        let mut view = view(&["a", "b"], false);
        assert_eq!(view.text(), "a\nb");

        view.clear();
        assert!(view.lines().is_empty());
    }
}
