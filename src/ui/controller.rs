//! CRUD loop between the rendered table and the store.
//!
//! The controller only talks to the presentation layer through
//! [`BookListView`], so the terminal front-end and the tests drive the same
//! logic. The add form follows `Idle -> FormOpen -> Idle`; every way out of
//! `FormOpen` goes through [`BookListController::hide_add_form`], which hides
//! the form exactly once per open.

use std::mem;
use std::time::{Duration, Instant};

use crate::models::{Book, BookFields};
use crate::store::{SlotStore, Store, StoreError};

use super::forms::AddBookForm;
use super::status::StatusKind;
use super::table::BookRow;

pub const BOOK_ADDED: &str = "Book added!";
pub const BOOK_REMOVED: &str = "Book removed!";
pub const FIELDS_REQUIRED: &str = "Please fill in all fields.";

/// Rendering port implemented by whatever draws the book list.
pub trait BookListView {
    fn insert_row(&mut self, row: BookRow);
    /// Remove the row at `index`, returning it. `None` when no such row exists.
    fn remove_row(&mut self, index: usize) -> Option<BookRow>;
    fn row(&self, index: usize) -> Option<&BookRow>;
    fn row_count(&self) -> usize;
    /// Reset every ordinal label to its 1-based position.
    fn renumber(&mut self);
    fn show_status(&mut self, kind: StatusKind, text: &str, expires_at: Instant);
    fn show_form(&mut self);
    fn hide_form(&mut self);
}

/// Whether the add-book overlay is open, and its input while it is.
#[derive(Default)]
pub enum Overlay {
    #[default]
    Idle,
    FormOpen(AddBookForm),
}

/// Result of a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Added(Book),
    Rejected,
}

pub struct BookListController<S, V> {
    store: Store<S>,
    view: V,
    overlay: Overlay,
    status_ttl: Duration,
}

impl<S: SlotStore, V: BookListView> BookListController<S, V> {
    pub fn new(store: Store<S>, view: V, status_ttl: Duration) -> Self {
        Self {
            store,
            view,
            overlay: Overlay::Idle,
            status_ttl,
        }
    }

    /// Load the store and render one row per record, in order. Rows already
    /// on screen are cleared first.
    pub fn render_all(&mut self) -> Result<usize, StoreError> {
        while self.view.remove_row(0).is_some() {}

        let books = self.store.load()?;
        for (index, book) in books.iter().enumerate() {
            self.view.insert_row(BookRow::from_book(book, index + 1));
        }
        self.view.renumber();

        tracing::debug!(count = books.len(), "rendered book list");
        Ok(books.len())
    }

    /// Open the add form. Returns `false` when it is already open so a second
    /// trigger never binds a second form.
    pub fn show_add_form(&mut self) -> bool {
        if self.is_form_open() {
            return false;
        }
        self.overlay = Overlay::FormOpen(AddBookForm::default());
        self.view.show_form();
        true
    }

    /// Close the add form and discard its input. Returns `false` when nothing
    /// was open.
    pub fn hide_add_form(&mut self) -> bool {
        match mem::take(&mut self.overlay) {
            Overlay::FormOpen(_) => {
                self.view.hide_form();
                true
            }
            Overlay::Idle => false,
        }
    }

    pub fn is_form_open(&self) -> bool {
        matches!(self.overlay, Overlay::FormOpen(_))
    }

    pub fn form(&self) -> Option<&AddBookForm> {
        match &self.overlay {
            Overlay::FormOpen(form) => Some(form),
            Overlay::Idle => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut AddBookForm> {
        match &mut self.overlay {
            Overlay::FormOpen(form) => Some(form),
            Overlay::Idle => None,
        }
    }

    /// Submit whatever the open form holds. `None` when no form is open.
    pub fn submit_form(&mut self) -> Option<Result<SubmitOutcome, StoreError>> {
        let values = self.form().map(AddBookForm::values)?;
        Some(self.on_submit(values))
    }

    /// Validate and store a submission, then close the form whatever the
    /// outcome. Incomplete input shows an error and mutates nothing. Without an
    /// open form there is nothing to submit: the call is rejected silently.
    pub fn on_submit(&mut self, values: BookFields) -> Result<SubmitOutcome, StoreError> {
        if !self.is_form_open() {
            tracing::debug!("ignored submission without an open form");
            return Ok(SubmitOutcome::Rejected);
        }
        let outcome = self.apply_submission(values);
        self.hide_add_form();
        outcome
    }

    fn apply_submission(&mut self, values: BookFields) -> Result<SubmitOutcome, StoreError> {
        if !values.is_complete() {
            tracing::warn!("rejected incomplete book submission");
            self.show_status(StatusKind::Error, FIELDS_REQUIRED);
            return Ok(SubmitOutcome::Rejected);
        }

        let book = self.store.add_record(values)?;
        let ordinal = self.view.row_count() + 1;
        self.view.insert_row(BookRow::from_book(&book, ordinal));
        self.renumber();
        self.show_status(StatusKind::Success, BOOK_ADDED);
        Ok(SubmitOutcome::Added(book))
    }

    /// Press the remove control of the row at `index`. Indices that do not
    /// name a row are ignored and yield `Ok(None)`. The row stays on screen
    /// when the store fails to drop the record.
    pub fn on_remove_click(&mut self, index: usize) -> Result<Option<Book>, StoreError> {
        let Some(book) = self.view.row(index).map(BookRow::to_book) else {
            return Ok(None);
        };
        self.store.remove_record(book.id)?;

        self.view.remove_row(index);
        self.renumber();
        self.show_status(StatusKind::Success, BOOK_REMOVED);
        tracing::info!(id = %book.id, book = %book, "book removed");
        Ok(Some(book))
    }

    pub fn renumber(&mut self) {
        self.view.renumber();
    }

    /// Show a message that disappears once the configured lifetime elapses.
    pub fn show_status(&mut self, kind: StatusKind, text: &str) {
        let expires_at = Instant::now() + self.status_ttl;
        self.view.show_status(kind, text, expires_at);
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookId;
    use crate::store::MemorySlots;

    /// Rendering port that records what the controller asked for.
    #[derive(Default)]
    struct RecordingView {
        rows: Vec<BookRow>,
        statuses: Vec<(StatusKind, String)>,
        shown: usize,
        hidden: usize,
    }

    impl BookListView for RecordingView {
        fn insert_row(&mut self, row: BookRow) {
            self.rows.push(row);
        }

        fn remove_row(&mut self, index: usize) -> Option<BookRow> {
            (index < self.rows.len()).then(|| self.rows.remove(index))
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

        fn show_status(&mut self, kind: StatusKind, text: &str, _expires_at: Instant) {
            self.statuses.push((kind, text.to_string()));
        }

        fn show_form(&mut self) {
            self.shown += 1;
        }

        fn hide_form(&mut self) {
            self.hidden += 1;
        }
    }

    type Controller = BookListController<MemorySlots, RecordingView>;

    fn controller() -> Controller {
        BookListController::new(
            Store::new(MemorySlots::new()),
            RecordingView::default(),
            Duration::from_secs(3),
        )
    }

    fn persisted(controller: &Controller) -> Vec<Book> {
        let store = controller.store();
        let raw = store.slots().read(store.key()).unwrap().unwrap_or_else(|| "[]".into());
        serde_json::from_str(&raw).unwrap()
    }

    fn add(controller: &mut Controller, title: &str, author: &str, isbn: &str) -> SubmitOutcome {
        assert!(controller.show_add_form());
        controller
            .on_submit(BookFields::new(title, author, isbn))
            .unwrap()
    }

    fn ordinals(controller: &Controller) -> Vec<usize> {
        controller.view().rows.iter().map(|row| row.ordinal).collect()
    }

    #[test]
    fn valid_submission_adds_one_row_and_one_record() {
        let mut controller = controller();
        let outcome = add(&mut controller, "Dune", "Herbert", "0441172717");

        let SubmitOutcome::Added(book) = outcome else {
            panic!("expected the book to be added");
        };
        assert_eq!(book.fields(), BookFields::new("Dune", "Herbert", "0441172717"));
        assert_eq!(controller.view().rows.len(), 1);
        assert_eq!(persisted(&controller), vec![book]);
        assert_eq!(
            controller.view().statuses,
            vec![(StatusKind::Success, BOOK_ADDED.to_string())]
        );
    }

    #[test]
    fn incomplete_submission_changes_nothing_and_reports_error() {
        let mut controller = controller();
        let outcome = add(&mut controller, "Dune", "", "0441172717");

        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert!(controller.view().rows.is_empty());
        assert!(persisted(&controller).is_empty());
        assert_eq!(
            controller.view().statuses,
            vec![(StatusKind::Error, FIELDS_REQUIRED.to_string())]
        );
        assert!(!controller.is_form_open());
    }

    #[test]
    fn form_is_shown_and_hidden_once_per_cycle() {
        let mut controller = controller();

        assert!(controller.show_add_form());
        assert!(!controller.show_add_form());
        controller.on_submit(BookFields::default()).unwrap();

        controller.show_add_form();
        controller
            .on_submit(BookFields::new("Dune", "Herbert", "0441172717"))
            .unwrap();

        controller.show_add_form();
        assert!(controller.hide_add_form());
        assert!(!controller.hide_add_form());

        assert_eq!(controller.view().shown, 3);
        assert_eq!(controller.view().hidden, 3);
    }

    #[test]
    fn submit_form_reads_the_open_form() {
        let mut controller = controller();
        assert!(controller.submit_form().is_none());

        controller.show_add_form();
        let form = controller.form_mut().unwrap();
        for ch in "Emma".chars() {
            form.push_char(ch);
        }

        let outcome = controller.submit_form().unwrap().unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert!(controller.form().is_none());
    }

    #[test]
    fn add_then_remove_scenario() {
        let mut controller = controller();

        add(&mut controller, "Dune", "Herbert", "0441172717");
        assert_eq!(ordinals(&controller), vec![1]);

        add(&mut controller, "1984", "Orwell", "0451524934");
        assert_eq!(ordinals(&controller), vec![1, 2]);
        assert_eq!(persisted(&controller).len(), 2);

        let removed = controller.on_remove_click(0).unwrap().unwrap();
        assert_eq!(removed.title, "Dune");

        assert_eq!(ordinals(&controller), vec![1]);
        assert_eq!(controller.view().rows[0].title, "1984");
        let remaining = persisted(&controller);
        assert_eq!(remaining.len(), 1);
        assert_eq!(
            remaining[0].fields(),
            BookFields::new("1984", "Orwell", "0451524934")
        );
        assert_eq!(
            controller.view().statuses.last(),
            Some(&(StatusKind::Success, BOOK_REMOVED.to_string()))
        );
    }

    #[test]
    fn removing_middle_row_renumbers_the_rest() {
        let mut controller = controller();
        add(&mut controller, "A", "a", "1");
        add(&mut controller, "B", "b", "2");
        add(&mut controller, "C", "c", "3");

        controller.on_remove_click(1).unwrap();

        assert_eq!(ordinals(&controller), vec![1, 2]);
        let titles: Vec<_> = persisted(&controller).into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[test]
    fn removing_one_of_two_duplicates_keeps_the_other() {
        let mut controller = controller();
        add(&mut controller, "Dune", "Herbert", "0441172717");
        add(&mut controller, "Dune", "Herbert", "0441172717");

        controller.on_remove_click(1).unwrap();

        assert_eq!(controller.view().rows.len(), 1);
        assert_eq!(persisted(&controller).len(), 1);
    }

    #[test]
    fn click_outside_rows_is_ignored() {
        let mut controller = controller();
        add(&mut controller, "Dune", "Herbert", "0441172717");
        let statuses_before = controller.view().statuses.len();

        assert_eq!(controller.on_remove_click(5).unwrap(), None);
        assert_eq!(controller.view().rows.len(), 1);
        assert_eq!(controller.view().statuses.len(), statuses_before);
    }

    #[test]
    fn render_all_shows_persisted_books_in_order() {
        let slots = MemorySlots::new().with_value(
            "books",
            r#"[{"id":1,"title":"Dune","author":"Herbert","isbn":"0441172717"},
                {"id":2,"title":"1984","author":"Orwell","isbn":"0451524934"}]"#,
        );
        let mut controller = BookListController::new(
            Store::new(slots),
            RecordingView::default(),
            Duration::from_secs(3),
        );

        assert_eq!(controller.render_all().unwrap(), 2);
        assert_eq!(controller.render_all().unwrap(), 2);

        let titles: Vec<_> = controller.view().rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "1984"]);
        assert_eq!(ordinals(&controller), vec![1, 2]);
    }

    #[test]
    fn corrupt_storage_surfaces_on_submit_and_still_closes_form() {
        let slots = MemorySlots::new().with_value("books", "not json");
        let mut controller = BookListController::new(
            Store::new(slots),
            RecordingView::default(),
            Duration::from_secs(3),
        );

        controller.show_add_form();
        let result = controller.on_submit(BookFields::new("Dune", "Herbert", "0441172717"));

        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
        assert!(!controller.is_form_open());
        assert!(controller.view().rows.is_empty());
    }

    #[test]
    fn whitespace_counts_as_a_filled_field() {
        let mut controller = controller();
        let outcome = add(&mut controller, " ", "Herbert", "1");

        assert!(matches!(outcome, SubmitOutcome::Added(_)));
        assert_eq!(persisted(&controller)[0].title, " ");
    }

    #[test]
    fn submit_without_open_form_mutates_nothing() {
        let mut controller = controller();
        let outcome = controller
            .on_submit(BookFields::new("Dune", "Herbert", "0441172717"))
            .unwrap();

        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert!(controller.view().rows.is_empty());
        assert!(controller.view().statuses.is_empty());
        assert!(persisted(&controller).is_empty());
        assert_eq!(controller.view().hidden, 0);
    }

    #[test]
    fn failed_store_removal_keeps_the_row() {
        let slots = MemorySlots::new().with_value("books", "not json");
        let mut controller = BookListController::new(
            Store::new(slots),
            RecordingView::default(),
            Duration::from_secs(3),
        );
        let book = Book::from_fields(BookId(1), BookFields::new("Dune", "Herbert", "0441172717"));
        controller.view_mut().insert_row(BookRow::from_book(&book, 1));

        let result = controller.on_remove_click(0);

        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
        assert_eq!(controller.view().rows.len(), 1);
        assert!(controller.view().statuses.is_empty());
    }
}
