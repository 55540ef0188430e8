//! Key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::input::LineInput;

/// What a key press asks the form to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Run,
    FocusNext,
    FocusPrev,
    /// Space: toggle the focused option, cycle verbosity or edit a path.
    Toggle,
    /// Enter: edit the focused text field, otherwise same as `Toggle`.
    Edit,
    CopyCommand,
    CopyOutput,
    ClearOutput,
    ToggleWrap,
    Reset,
    ScrollUp,
    ScrollDown,
}

pub fn form_action(key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let action = match key.code {
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('r') | KeyCode::F(5) => Action::Run,
        KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => Action::FocusNext,
        KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => Action::FocusPrev,
        KeyCode::Char(' ') => Action::Toggle,
        KeyCode::Enter => Action::Edit,
        KeyCode::Char('c') => Action::CopyCommand,
        KeyCode::Char('y') => Action::CopyOutput,
        KeyCode::Char('x') => Action::ClearOutput,
        KeyCode::Char('w') => Action::ToggleWrap,
        KeyCode::Char('R') => Action::Reset,
        KeyCode::PageUp => Action::ScrollUp,
        KeyCode::PageDown => Action::ScrollDown,
        _ => return None,
    };
    Some(action)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Continue,
    Commit,
    Cancel,
}

/// Applies `key` to the text being edited.
pub fn edit_key(input: &mut LineInput, key: KeyEvent) -> EditOutcome {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('a') => {
                input.home();
                EditOutcome::Continue
            }
            KeyCode::Char('e') => {
                input.end();
                EditOutcome::Continue
            }
            KeyCode::Char('c') => EditOutcome::Cancel,
            _ => EditOutcome::Continue,
        };
    }

    match key.code {
        KeyCode::Enter => return EditOutcome::Commit,
        KeyCode::Esc => return EditOutcome::Cancel,
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => {}
    }
    EditOutcome::Continue
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAnswer {
    Yes,
    No,
}

/// Answer to a yes/no dialog, `None` for keys that don't answer it.
pub fn dialog_answer(key: KeyEvent) -> Option<DialogAnswer> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(DialogAnswer::Yes),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(DialogAnswer::No),
        _ => None,
    }
}
