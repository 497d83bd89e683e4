use std::time::Instant;

use crate::models::{Book, BookId};

use super::controller::BookListView;
use super::status::{StatusBoard, StatusKind};

/// One rendered table row: the ordinal label plus the cells shown for a book.
/// The id travels with the row so removal can rebuild the exact record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRow {
    pub ordinal: usize,
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl BookRow {
    pub fn from_book(book: &Book, ordinal: usize) -> Self {
        Self {
            ordinal,
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
        }
    }

    /// Reconstruct the record from the row's cells.
    pub fn to_book(&self) -> Book {
        Book {
            id: self.id,
            title: self.title.clone(),
            author: self.author.clone(),
            isbn: self.isbn.clone(),
        }
    }
}

/// Presentation state for the terminal front-end: table rows, the selected
/// row, live status messages and whether the add form is on screen.
#[derive(Debug, Default)]
pub struct TableView {
    rows: Vec<BookRow>,
    selected: usize,
    statuses: StatusBoard,
    form_visible: bool,
}

impl TableView {
    pub fn rows(&self) -> &[BookRow] {
        &self.rows
    }

    pub fn selected(&self) -> Option<usize> {
        if self.rows.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    pub fn move_selection(&mut self, offset: isize) {
        if self.rows.is_empty() {
            self.selected = 0;
            return;
        }
        let last = self.rows.len() - 1;
        self.selected = self.selected.saturating_add_signed(offset).min(last);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    pub fn statuses(&self) -> &StatusBoard {
        &self.statuses
    }

    pub fn expire_statuses(&mut self, now: Instant) -> usize {
        self.statuses.expire(now)
    }

    pub fn form_visible(&self) -> bool {
        self.form_visible
    }
}

impl BookListView for TableView {
    fn insert_row(&mut self, row: BookRow) {
        self.rows.push(row);
    }

    fn remove_row(&mut self, index: usize) -> Option<BookRow> {
        if index >= self.rows.len() {
            return None;
        }
        let row = self.rows.remove(index);
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
        Some(row)
    }

    fn row(&self, index: usize) -> Option<&BookRow> {
        self.rows.get(index)
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn renumber(&mut self) {
        for (index, row) in self.rows.iter_mut().enumerate() {
            row.ordinal = index + 1;
        }
    }

    fn show_status(&mut self, kind: StatusKind, text: &str, expires_at: Instant) {
        self.statuses.push(kind, text, expires_at);
    }

    fn show_form(&mut self) {
        self.form_visible = true;
    }

    fn hide_form(&mut self) {
        self.form_visible = false;
    }
}
