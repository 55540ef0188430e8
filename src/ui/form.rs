//! The option form: Pack3r path, map path and every Pack3r option.

use ratatui::prelude::{Buffer, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::command::{CommandBuilder, Pack3rOption};
use crate::ui::input::LineInput;

/// Width of `"> [x] Label             "` before a field's value.
pub const VALUE_COLUMN: u16 = 2 + 4 + LABEL_WIDTH as u16;
const LABEL_WIDTH: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Pack3rPath,
    MapPath,
    Option(Pack3rOption),
}

/// Rows of the form, top to bottom.
pub const FORM_FIELDS: [FormField; 15] = [
    FormField::Pack3rPath,
    FormField::MapPath,
    FormField::Option(Pack3rOption::Output),
    FormField::Option(Pack3rOption::DryRun),
    FormField::Option(Pack3rOption::Loose),
    FormField::Option(Pack3rOption::Source),
    FormField::Option(Pack3rOption::Overwrite),
    FormField::Option(Pack3rOption::IncludePk3),
    FormField::Option(Pack3rOption::Rename),
    FormField::Option(Pack3rOption::NoScan),
    FormField::Option(Pack3rOption::NoPack),
    FormField::Option(Pack3rOption::Mods),
    FormField::Option(Pack3rOption::Verbosity),
    FormField::Option(Pack3rOption::ShaderDebug),
    FormField::Option(Pack3rOption::RefDebug),
];

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pack3rPath => "Pack3r",
            Self::MapPath => "Map",
            Self::Option(option) => option.label(),
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Self::Pack3rPath => "Path to the Pack3r executable",
            Self::MapPath => "The .map or .reg file to pack, inside a maps directory",
            Self::Option(option) => option.help(),
        }
    }

    /// Fields edited as free text.
    pub fn is_text(self) -> bool {
        match self {
            Self::Pack3rPath | Self::MapPath => true,
            Self::Option(Pack3rOption::Verbosity) => false,
            Self::Option(option) => option.takes_value(),
        }
    }
}

/// Focused row and, while editing, the text being typed.
#[derive(Debug, Default)]
pub struct FormState {
    focus: usize,
    pub editing: Option<LineInput>,
}

impl FormState {
    pub fn focused(&self) -> FormField {
        FORM_FIELDS[self.focus]
    }

    pub fn focus_index(&self) -> usize {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FORM_FIELDS.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + FORM_FIELDS.len() - 1) % FORM_FIELDS.len();
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }
}

/// Renders the form for `builder`, showing `state.editing` in place of the
/// focused value.
pub struct FormWidget<'a> {
    pub builder: &'a CommandBuilder,
    pub state: &'a FormState,
    pub locked: bool,
}

impl FormWidget<'_> {
    fn value(&self, field: FormField) -> String {
        match field {
            FormField::Pack3rPath => self.builder.pack3r_path().to_string(),
            FormField::MapPath => self.builder.map_path().to_string(),
            FormField::Option(Pack3rOption::Verbosity) => {
                format!("< {} >", self.builder.verbosity().label())
            }
            FormField::Option(option) if option.takes_value() => self.builder.value(option).to_string(),
            FormField::Option(_) => String::new(),
        }
    }

    fn row(&self, index: usize, field: FormField) -> Line<'_> {
        let focused = index == self.state.focus_index();
        let marker = if focused { "> " } else { "  " };

        let (checkbox, enabled) = match field {
            FormField::Pack3rPath | FormField::MapPath => ("    ", true),
            FormField::Option(Pack3rOption::Verbosity) => ("    ", true),
            FormField::Option(option) if self.builder.is_enabled(option) => ("[x] ", true),
            FormField::Option(option) => ("[ ] ", !option.takes_value()),
        };

        let value = match (&self.state.editing, focused) {
            (Some(input), true) => input.text().to_string(),
            _ => self.value(field),
        };

        let mut label_style = Style::default();
        if focused {
            label_style = label_style.add_modifier(Modifier::BOLD).fg(Color::Cyan);
        }
        let mut value_style = Style::default();
        if !enabled {
            value_style = value_style.fg(Color::DarkGray);
        }
        if focused && self.state.is_editing() {
            value_style = value_style.add_modifier(Modifier::UNDERLINED);
        }

        Line::from(vec![
            Span::styled(marker, label_style),
            Span::raw(checkbox),
            Span::styled(format!("{:<width$}", field.label(), width = LABEL_WIDTH), label_style),
            Span::styled(value, value_style),
        ])
    }
}

impl Widget for FormWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.locked { " Options (running) " } else { " Options " };
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = FORM_FIELDS
            .iter()
            .enumerate()
            .map(|(i, field)| self.row(i, *field))
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}
