use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::BookFields;

/// Input state of the add-book overlay.
#[derive(Default, Clone)]
pub struct AddBookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) isbn: String,
    pub(crate) active: BookField,
}

/// Fields of the add-book form, in tab order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BookField {
    #[default]
    Title,
    Author,
    Isbn,
}

impl BookField {
    pub(crate) const ALL: [BookField; 3] = [BookField::Title, BookField::Author, BookField::Isbn];

    pub(crate) fn label(self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Isbn => "ISBN",
        }
    }

    /// Row offset of the field inside the form body.
    pub(crate) fn line_index(self) -> u16 {
        match self {
            BookField::Title => 0,
            BookField::Author => 1,
            BookField::Isbn => 2,
        }
    }
}

impl AddBookForm {
    pub fn active(&self) -> BookField {
        self.active
    }

    /// Move focus forward, wrapping from ISBN back to Title.
    pub fn next_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Author,
            BookField::Author => BookField::Isbn,
            BookField::Isbn => BookField::Title,
        };
    }

    pub fn previous_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Isbn,
            BookField::Author => BookField::Title,
            BookField::Isbn => BookField::Author,
        };
    }

    /// Append a character to the focused field. Control characters are
    /// rejected.
    pub fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value_mut(self.active).push(ch);
        true
    }

    pub fn backspace(&mut self) {
        self.value_mut(self.active).pop();
    }

    /// Current values exactly as typed.
    pub fn values(&self) -> BookFields {
        BookFields::new(&self.title, &self.author, &self.isbn)
    }

    pub(crate) fn value(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Isbn => &self.isbn,
        }
    }

    fn value_mut(&mut self, field: BookField) -> &mut String {
        match field {
            BookField::Title => &mut self.title,
            BookField::Author => &mut self.author,
            BookField::Isbn => &mut self.isbn,
        }
    }

    /// Render a single labeled line for the form widget.
    pub(crate) fn build_line(&self, field: BookField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Cursor column for the focused field, relative to the form body.
    pub(crate) fn cursor_offset(&self) -> u16 {
        let prefix = self.active.label().len() + ": ".len();
        (prefix + self.value(self.active).chars().count()) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_fills_the_focused_field() {
        let mut form = AddBookForm::default();
        for ch in "Dune".chars() {
            form.push_char(ch);
        }
        form.next_field();
        for ch in "Herbert".chars() {
            form.push_char(ch);
        }
        form.next_field();
        for ch in "04411727177".chars() {
            form.push_char(ch);
        }
        form.backspace();

        assert_eq!(form.values(), BookFields::new("Dune", "Herbert", "0441172717"));
    }

    #[test]
    fn control_characters_are_rejected() {
        let mut form = AddBookForm::default();
        assert!(!form.push_char('\n'));
        assert!(form.values().title.is_empty());
    }

    #[test]
    fn focus_wraps_both_directions() {
        let mut form = AddBookForm::default();
        form.previous_field();
        assert_eq!(form.active(), BookField::Isbn);
        form.next_field();
        assert_eq!(form.active(), BookField::Title);
    }

    #[test]
    fn cursor_sits_after_typed_text() {
        let mut form = AddBookForm::default();
        form.push_char('é');
        assert_eq!(form.cursor_offset(), "Title: ".len() as u16 + 1);
    }
}
