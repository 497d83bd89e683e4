//! The book collection and its mirror in a persistent key-value slot.
//!
//! Every mutation reloads the slot first, applies the change to the freshly
//! loaded sequence, and writes the whole sequence back. There is no delta
//! persistence and no transaction around the read-modify-write.

use std::collections::HashMap;
use std::mem;

use thiserror::Error;

use crate::models::{Book, BookFields, BookId};

/// Slot key used when no other key is configured.
pub const DEFAULT_STORAGE_KEY: &str = "books";

/// Failures raised while reading or writing the persisted collection.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failed")]
    Storage(#[from] rusqlite::Error),
    #[error("slot `{key}` does not hold a valid book list")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize the book list")]
    Encode(#[source] serde_json::Error),
    #[error("no book ids left to assign")]
    IdsExhausted,
}

/// A string-keyed persistence backend holding one serialized value per key.
pub trait SlotStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Process-local slots, used by tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemorySlots {
    values: HashMap<String, String>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot with a raw value, bypassing serialization.
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl SlotStore for MemorySlots {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// In-memory ordered collection mirrored to a single slot.
pub struct Store<S> {
    slots: S,
    key: String,
    books: Vec<Book>,
}

impl<S: SlotStore> Store<S> {
    pub fn new(slots: S) -> Self {
        Self::with_key(slots, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(slots: S, key: impl Into<String>) -> Self {
        Self {
            slots,
            key: key.into(),
            books: Vec::new(),
        }
    }

    /// Replace the in-memory collection with the persisted one. An absent slot
    /// leaves the current collection untouched. Records stored without an id
    /// get one here, and the slot is rewritten once so the ids survive the
    /// next reload.
    pub fn load(&mut self) -> Result<&[Book], StoreError> {
        let Some(raw) = self.slots.read(&self.key)? else {
            tracing::debug!(key = %self.key, "slot empty, keeping current collection");
            return Ok(&self.books);
        };

        let mut books: Vec<Book> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                key: self.key.clone(),
                source,
            })?;
        let assigned = assign_missing_ids(&mut books)?;
        self.books = books;
        tracing::debug!(key = %self.key, count = self.books.len(), "loaded books");

        if assigned > 0 {
            tracing::info!(key = %self.key, assigned, "assigned ids to legacy records");
            self.save()?;
        }

        Ok(&self.books)
    }

    /// Serialize the whole collection and overwrite the slot.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.books).map_err(StoreError::Encode)?;
        self.slots.write(&self.key, &raw)
    }

    /// Append a new record with a freshly generated id and persist it.
    pub fn add_record(&mut self, fields: BookFields) -> Result<Book, StoreError> {
        self.load()?;
        let book = Book::from_fields(next_id(&self.books)?, fields);
        self.books.push(book.clone());
        self.save()?;
        tracing::info!(id = %book.id, book = %book, "book stored");
        Ok(book)
    }

    /// Drop the record carrying `id`. Returns how many records were removed,
    /// which is zero when another writer already deleted it.
    pub fn remove_record(&mut self, id: BookId) -> Result<usize, StoreError> {
        self.load()?;
        let removed = self.retain_and_save(|book| book.id != id)?;
        tracing::info!(id = %id, removed, "book removed from store");
        Ok(removed)
    }

    /// Drop every record whose title, author and ISBN all equal `fields`.
    pub fn remove_matching(&mut self, fields: &BookFields) -> Result<usize, StoreError> {
        self.load()?;
        let removed = self.retain_and_save(|book| !book.matches(fields))?;
        tracing::info!(title = %fields.title, removed, "matching books removed from store");
        Ok(removed)
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }

    /// Rebuild the collection from the records to keep instead of splicing
    /// while iterating, so runs of adjacent matches are all removed.
    fn retain_and_save<F>(&mut self, keep: F) -> Result<usize, StoreError>
    where
        F: Fn(&Book) -> bool,
    {
        let before = self.books.len();
        self.books = mem::take(&mut self.books)
            .into_iter()
            .filter(|book| keep(book))
            .collect();
        self.save()?;
        Ok(before - self.books.len())
    }
}

fn largest_id(books: &[Book]) -> BookId {
    books.iter().map(|book| book.id).max().unwrap_or_default()
}

fn next_id(books: &[Book]) -> Result<BookId, StoreError> {
    largest_id(books).next().ok_or(StoreError::IdsExhausted)
}

fn assign_missing_ids(books: &mut [Book]) -> Result<usize, StoreError> {
    let mut last = largest_id(books);
    let mut assigned = 0;
    for book in books.iter_mut().filter(|book| !book.id.is_assigned()) {
        last = last.next().ok_or(StoreError::IdsExhausted)?;
        book.id = last;
        assigned += 1;
    }
    Ok(assigned)
}
