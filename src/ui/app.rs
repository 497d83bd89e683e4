use std::time::Instant;

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::db::SqliteSlots;
use crate::store::{SlotStore, StoreError};

use super::controller::BookListController;
use super::forms::BookField;
use super::helpers::{centered_rect, surface_error};
use super::status::StatusKind;
use super::table::TableView;

/// Footer space reserved for keyboard instructions.
const FOOTER_HEIGHT: u16 = 2;
/// Most status lines shown at once; older ones stay queued until they expire.
const MAX_STATUS_LINES: usize = 3;
/// Text of the per-row remove control.
const REMOVE_CONTROL: &str = "[X]";

/// Central application state shared across the TUI.
pub struct App<S = SqliteSlots> {
    controller: BookListController<S, TableView>,
}

impl<S: SlotStore> App<S> {
    pub fn new(controller: BookListController<S, TableView>) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> &BookListController<S, TableView> {
        &self.controller
    }

    /// Route a key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.controller.is_form_open() {
            self.handle_form_key(code);
            return false;
        }

        let view = self.controller.view_mut();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => view.move_selection(-1),
            KeyCode::Down => view.move_selection(1),
            KeyCode::PageUp => view.move_selection(-5),
            KeyCode::PageDown => view.move_selection(5),
            KeyCode::Home => view.select_first(),
            KeyCode::End => view.select_last(),
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('+') => {
                self.controller.show_add_form();
            }
            KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Char('-') | KeyCode::Delete => {
                self.remove_selected();
            }
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.controller.hide_add_form();
            }
            KeyCode::Enter => {
                if let Some(Err(err)) = self.controller.submit_form() {
                    self.report(err);
                }
            }
            code => {
                let Some(form) = self.controller.form_mut() else {
                    return;
                };
                match code {
                    KeyCode::Tab | KeyCode::Down => form.next_field(),
                    KeyCode::BackTab | KeyCode::Up => form.previous_field(),
                    KeyCode::Backspace => form.backspace(),
                    KeyCode::Char(ch) => {
                        form.push_char(ch);
                    }
                    _ => {}
                }
            }
        }
    }

    fn remove_selected(&mut self) {
        let Some(index) = self.controller.view().selected() else {
            self.controller
                .show_status(StatusKind::Error, "No book selected to remove.");
            return;
        };
        if let Err(err) = self.controller.on_remove_click(index) {
            self.report(err);
        }
    }

    /// Turn a store failure into an error status instead of leaving the loop.
    fn report(&mut self, err: StoreError) {
        let err = anyhow::Error::new(err);
        tracing::error!(error = ?err, "store operation failed");
        let message = surface_error(&err);
        self.controller.show_status(StatusKind::Error, &message);
    }

    /// Expire status messages whose lifetime has elapsed.
    pub fn tick(&mut self, now: Instant) {
        self.controller.view_mut().expire_statuses(now);
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let view = self.controller.view();
        let status_height = view.statuses().messages().len().min(MAX_STATUS_LINES) as u16;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(status_height),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        let heading = Paragraph::new(Line::from(Span::styled(
            "Book List",
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(heading, chunks[0]);

        self.draw_statuses(frame, chunks[1], view);
        self.draw_table(frame, chunks[2], view);
        self.draw_footer(frame, chunks[3]);

        if view.form_visible() {
            self.draw_add_form(frame, area);
        }
    }

    fn draw_statuses(&self, frame: &mut Frame, area: Rect, view: &TableView) {
        if area.height == 0 {
            return;
        }
        let messages = view.statuses().messages();
        let start = messages.len().saturating_sub(MAX_STATUS_LINES);
        let lines: Vec<Line> = messages[start..]
            .iter()
            .map(|message| Line::from(Span::styled(message.text.clone(), message.kind.style())))
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect, view: &TableView) {
        let block = Block::default().borders(Borders::ALL).title("Books");

        if view.rows().is_empty() {
            let empty = Paragraph::new(Span::styled(
                "No books yet. Press [a] to add one.",
                Style::default().fg(Color::DarkGray),
            ))
            .block(block)
            .wrap(Wrap { trim: true });
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(["#", "Title", "Author", "ISBN", ""])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows = view.rows().iter().map(|row| {
            Row::new(vec![
                Cell::from(row.ordinal.to_string()),
                Cell::from(row.title.clone()),
                Cell::from(row.author.clone()),
                Cell::from(row.isbn.clone()),
                Cell::from(Span::styled(REMOVE_CONTROL, Style::default().fg(Color::Red))),
            ])
        });
        let widths = [
            Constraint::Length(4),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(20),
            Constraint::Length(REMOVE_CONTROL.len() as u16),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        let mut state = TableState::default().with_selected(view.selected());
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let instructions = if self.controller.is_form_open() {
            Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Submit   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ])
        } else {
            Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[a]", key_style),
                Span::raw(" Add book   "),
                Span::styled("[x]", key_style),
                Span::raw(" Remove   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ])
        };

        frame.render_widget(Paragraph::new(instructions), inner);
    }

    fn draw_add_form(&self, frame: &mut Frame, area: Rect) {
        let Some(form) = self.controller.form() else {
            return;
        };
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add a book").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = BookField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[ Submit ]  Enter to submit • Esc to cancel",
            Style::default().fg(Color::Gray),
        )));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

        let cursor_x = inner.x + form.cursor_offset();
        let cursor_y = inner.y + form.active().line_index();
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}
