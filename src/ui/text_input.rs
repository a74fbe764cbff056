use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, style::Style, Frame};
use tui_textarea::{CursorMove, TextArea};

use super::theme::Palette;

/// What the form should do after a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Keep editing
    Continue,
    /// Submit the form
    Submit,
    /// Close the form
    Cancel,
    /// Move focus to the other field
    NextField,
}

/// Editable text field on top of `tui-textarea`.
///
/// Single-line fields submit on Enter; multi-line fields insert a newline and
/// submit with Ctrl+S.
pub struct TextField {
    textarea: TextArea<'static>,
    multiline: bool,
}

impl TextField {
    pub fn new(initial_value: &str, multiline: bool) -> Self {
        let mut textarea = if initial_value.is_empty() {
            TextArea::default()
        } else {
            TextArea::from(initial_value.lines().map(|s| s.to_string()))
        };
        textarea.move_cursor(CursorMove::Bottom);
        textarea.move_cursor(CursorMove::End);
        textarea.set_cursor_line_style(Style::default());

        Self { textarea, multiline }
    }

    /// Current text, lines joined with '\n'
    pub fn content(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        // Ctrl+S submits from any field
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return InputAction::Submit;
        }

        match key.code {
            KeyCode::Esc => InputAction::Cancel,
            KeyCode::Tab | KeyCode::BackTab => InputAction::NextField,
            KeyCode::Enter if self.multiline => {
                self.textarea.insert_newline();
                InputAction::Continue
            }
            KeyCode::Enter => InputAction::Submit,
            KeyCode::Char(c) => {
                self.textarea.insert_char(c);
                InputAction::Continue
            }
            KeyCode::Backspace => {
                self.textarea.delete_char();
                InputAction::Continue
            }
            KeyCode::Delete => {
                self.textarea.delete_next_char();
                InputAction::Continue
            }
            KeyCode::Left => {
                self.textarea.move_cursor(CursorMove::Back);
                InputAction::Continue
            }
            KeyCode::Right => {
                self.textarea.move_cursor(CursorMove::Forward);
                InputAction::Continue
            }
            KeyCode::Up => {
                self.textarea.move_cursor(CursorMove::Up);
                InputAction::Continue
            }
            KeyCode::Down => {
                self.textarea.move_cursor(CursorMove::Down);
                InputAction::Continue
            }
            KeyCode::Home => {
                self.textarea.move_cursor(CursorMove::Head);
                InputAction::Continue
            }
            KeyCode::End => {
                self.textarea.move_cursor(CursorMove::End);
                InputAction::Continue
            }
            _ => InputAction::Continue,
        }
    }

    /// Render the text. Only the focused field shows a cursor.
    pub fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, palette: &Palette) {
        self.textarea
            .set_style(Style::default().fg(palette.text).bg(palette.surface));
        let cursor = if focused {
            Style::default().bg(palette.accent).fg(palette.surface)
        } else {
            Style::default().fg(palette.text).bg(palette.surface)
        };
        self.textarea.set_cursor_style(cursor);

        f.render_widget(&self.textarea, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(field: &mut TextField, text: &str) {
        for c in text.chars() {
            field.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut field = TextField::new("", false);
        type_str(&mut field, "Reporx");
        field.handle_key(key(KeyCode::Backspace));
        type_str(&mut field, "t");
        assert_eq!(field.content(), "Report");
    }

    #[test]
    fn test_initial_value_cursor_at_end() {
        let mut field = TextField::new("Write", false);
        type_str(&mut field, " report");
        assert_eq!(field.content(), "Write report");
    }

    #[test]
    fn test_enter_submits_single_line() {
        let mut field = TextField::new("", false);
        assert_eq!(field.handle_key(key(KeyCode::Enter)), InputAction::Submit);
    }

    #[test]
    fn test_enter_breaks_line_in_multiline() {
        let mut field = TextField::new("", true);
        type_str(&mut field, "one");
        assert_eq!(field.handle_key(key(KeyCode::Enter)), InputAction::Continue);
        type_str(&mut field, "two");
        assert_eq!(field.content(), "one\ntwo");

        let save = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(field.handle_key(save), InputAction::Submit);
    }

    #[test]
    fn test_tab_and_esc() {
        let mut field = TextField::new("", true);
        assert_eq!(field.handle_key(key(KeyCode::Tab)), InputAction::NextField);
        assert_eq!(field.handle_key(key(KeyCode::Esc)), InputAction::Cancel);
    }
}
