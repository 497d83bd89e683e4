//! Binary entry point that glues the SQLite-backed store to the TUI: parse the
//! configuration, start logging, open the database, render the persisted books
//! and drive the Ratatui event loop until the user exits.
use book_list_manager::{
    ensure_schema, init_logging, run_app, App, BookListController, Config, SqliteSlots, Store,
    TableView,
};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(&config)?;

    let conn = ensure_schema(&config.db_path()?)?;
    let store = Store::with_key(SqliteSlots::new(conn), config.storage_key.clone());

    let mut controller =
        BookListController::new(store, TableView::default(), config.status_timeout());
    let count = controller.render_all()?;
    tracing::info!(count, key = %config.storage_key, "book list loaded");

    let mut app = App::new(controller);
    let result = run_app(&mut app);
    if let Err(err) = &result {
        tracing::error!(error = ?err, "terminal session failed");
    }
    result
}
