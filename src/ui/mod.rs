//! Ratatui front-end for the book list. The CRUD logic lives in
//! [`controller`]; everything else here draws its state and feeds it keys.

mod app;
mod controller;
mod forms;
mod helpers;
mod status;
mod table;
mod terminal;

pub use app::App;
pub use controller::{
    BookListController, BookListView, Overlay, SubmitOutcome, BOOK_ADDED, BOOK_REMOVED,
    FIELDS_REQUIRED,
};
pub use forms::{AddBookForm, BookField};
pub use status::{StatusBoard, StatusId, StatusKind, StatusMessage};
pub use table::{BookRow, TableView};
pub use terminal::run_app;
