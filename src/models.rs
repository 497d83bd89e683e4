//! Domain models that mirror the persisted JSON shape and get passed throughout
//! the TUI. These types stay light-weight data holders so the store and the
//! controller can focus on persistence and presentation logic.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generated identifier assigned to a book when it is first stored. `0` is
/// reserved for records persisted before identifiers existed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BookId(pub u64);

impl BookId {
    /// Whether the id was actually assigned rather than defaulted on load.
    pub fn is_assigned(self) -> bool {
        self.0 != 0
    }

    /// The id following this one, or `None` once the id space is used up.
    pub fn next(self) -> Option<BookId> {
        self.0.checked_add(1).map(BookId)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three user-entered fields of a book. Used both as the payload of the
/// add form and as the match key for structural removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl BookFields {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
        }
    }

    /// Every field must be non-empty.
    pub fn is_complete(&self) -> bool {
        [&self.title, &self.author, &self.isbn]
            .iter()
            .all(|value| !value.is_empty())
    }
}

/// A stored book. Serialized as one object of the persisted JSON array; the
/// `id` field is optional on input so data written before ids existed still
/// loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl Book {
    pub fn from_fields(id: BookId, fields: BookFields) -> Self {
        Self {
            id,
            title: fields.title,
            author: fields.author,
            isbn: fields.isbn,
        }
    }

    /// True when title, author and ISBN all equal `fields`. The id is ignored.
    pub fn matches(&self, fields: &BookFields) -> bool {
        self.title == fields.title && self.author == fields.author && self.isbn == fields.isbn
    }

    pub fn fields(&self) -> BookFields {
        BookFields::new(&self.title, &self.author, &self.isbn)
    }
}

impl fmt::Display for Book {
    /// `Title - Author (ISBN)`, used in log lines and status text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.title, self.author, self.isbn)
    }
}
