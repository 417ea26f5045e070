use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use log::error;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::models::Book;
use crate::shelf::Bookshelf;

use super::forms::{BookField, BookForm, ConfirmDelete};
use super::helpers::{centered_rect, surface_error};
use super::screens::ShelfScreen;

/// Rows at the bottom reserved for the status and key help lines.
const FOOTER_HEIGHT: u16 = 3;
/// Rows per book card: two text lines plus the border box.
const BOOK_CARD_HEIGHT: u16 = 4;

/// Interaction modes layered over the shelf view. At most one modal runs at a
/// time, and the variant carries its working state.
enum Mode {
    Normal,
    AddingBook(BookForm),
    EditingBook { id: i64, form: BookForm },
    ConfirmDelete(ConfirmDelete),
    Searching { query: String },
}

/// Footer feedback produced by the most recent action.
struct StatusMessage {
    kind: StatusKind,
    text: String,
}

/// Whether a status message reports routine progress or a problem.
#[derive(Clone, Copy)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(self) -> Style {
        let color = match self {
            StatusKind::Info => Color::Green,
            StatusKind::Error => Color::Red,
        };
        Style::default().fg(color)
    }
}

/// Top-level TUI state: the shelf, its two-pane projection, and the mode.
pub struct App {
    shelf: Bookshelf,
    screen: ShelfScreen,
    mode: Mode,
    status: Option<StatusMessage>,
    stashed_query: Option<String>,
}

impl App {
    pub fn new(shelf: Bookshelf) -> Self {
        let screen = ShelfScreen::new(&shelf);
        let status = (!shelf.has_storage()).then(|| StatusMessage {
            kind: StatusKind::Error,
            text: "Storage unavailable; books will not be saved.".to_string(),
        });
        Self {
            shelf,
            screen,
            mode: Mode::Normal,
            status,
            stashed_query: None,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut quit = false;
        let current = mem::replace(&mut self.mode, Mode::Normal);
        self.mode = match current {
            Mode::Normal => self.handle_normal_key(code, &mut quit)?,
            Mode::AddingBook(form) => self.handle_add_book(code, form)?,
            Mode::EditingBook { id, form } => self.handle_edit_book(code, id, form)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
            Mode::Searching { query } => self.handle_search(code, query)?,
        };
        Ok(quit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, quit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *quit = true;
            }
            KeyCode::Up => self.screen.move_selection(-1),
            KeyCode::Down => self.screen.move_selection(1),
            KeyCode::PageUp => self.screen.move_selection(-5),
            KeyCode::PageDown => self.screen.move_selection(5),
            KeyCode::Home => self.screen.select_first(),
            KeyCode::End => self.screen.select_last(),
            KeyCode::Char('t') | KeyCode::Char('T') => self.toggle_current(),
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::AddingBook(BookForm::new_book()));
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('-') => {
                if let Some(book) = self.screen.current_book().cloned() {
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(ConfirmDelete::from(book)));
                } else {
                    self.set_status("No book selected to delete.", StatusKind::Error);
                }
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(book) = self.screen.current_book().cloned() {
                    self.clear_status();
                    return Ok(Mode::EditingBook {
                        id: book.id,
                        form: BookForm::from_book(&book),
                    });
                } else {
                    self.set_status("No book selected to edit.", StatusKind::Error);
                }
            }
            KeyCode::Char('/') | KeyCode::Char('f') => {
                self.clear_status();
                return Ok(Mode::Searching {
                    query: String::new(),
                });
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.parse_inputs() {
                Ok((title, author, year)) => {
                    match self.shelf.add(&title, &author, &year, form.finished) {
                        Ok(book) => {
                            self.screen.refresh(&self.shelf);
                            self.screen.focus(book.id);
                            self.set_status(format!("Added '{}'.", book.title), StatusKind::Info);
                        }
                        Err(err) => {
                            // The book is in the collection; only the write failed.
                            error!("saving new book failed: {err:#}");
                            self.screen.refresh(&self.shelf);
                            self.set_status(surface_error(&err), StatusKind::Error);
                        }
                    }
                    keep_open = false;
                }
                Err(err) => {
                    let why = surface_error(&err);
                    self.set_status(why.clone(), StatusKind::Error);
                    form.error = Some(why);
                }
            },
            KeyCode::Char(ch) => {
                if form.active == BookField::Finished {
                    if ch == ' ' {
                        form.toggle_finished();
                    }
                } else if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingBook(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_edit_book(&mut self, code: KeyCode, id: i64, mut form: BookForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled, book unchanged.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                match self.shelf.edit(id, &form.edit_request()) {
                    Ok(Some(book)) => {
                        self.screen.refresh(&self.shelf);
                        self.screen.focus(book.id);
                        self.set_status(format!("Updated '{}'.", book.title), StatusKind::Info);
                    }
                    Ok(None) => {
                        self.screen.refresh(&self.shelf);
                        self.set_status("Book no longer exists.", StatusKind::Error);
                    }
                    Err(err) => {
                        error!("saving edited book failed: {err:#}");
                        self.screen.refresh(&self.shelf);
                        self.set_status(surface_error(&err), StatusKind::Error);
                    }
                }
                keep_open = false;
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::EditingBook { id, form })
        } else {
            Ok(self.leave_modal())
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Delete cancelled.", StatusKind::Info);
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.shelf.delete(confirm.id) {
                    Ok(true) => {
                        self.screen.refresh(&self.shelf);
                        self.set_status(format!("Deleted '{}'.", confirm.title), StatusKind::Info);
                    }
                    Ok(false) => {
                        self.screen.refresh(&self.shelf);
                        self.set_status("Book no longer exists.", StatusKind::Error);
                    }
                    Err(err) => {
                        error!("saving deletion failed: {err:#}");
                        self.screen.refresh(&self.shelf);
                        self.set_status(surface_error(&err), StatusKind::Error);
                    }
                }
            }
            _ => return Ok(Mode::ConfirmDelete(confirm)),
        }
        Ok(self.leave_modal())
    }

    fn handle_search(&mut self, code: KeyCode, mut query: String) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.screen.set_filter(&self.shelf, None);
                return Ok(Mode::Normal);
            }
            KeyCode::Up => self.screen.move_selection(-1),
            KeyCode::Down => self.screen.move_selection(1),
            KeyCode::PageUp => self.screen.move_selection(-5),
            KeyCode::PageDown => self.screen.move_selection(5),
            KeyCode::Home => self.screen.select_first(),
            KeyCode::End => self.screen.select_last(),
            KeyCode::Backspace => {
                query.pop();
                self.apply_filter(&query);
            }
            KeyCode::Char(ch) if ch.is_control() => return self.handle_search_control(ch, query),
            KeyCode::Char(ch) => {
                query.push(ch);
                self.apply_filter(&query);
            }
            _ => {}
        }
        Ok(Mode::Searching { query })
    }

    /// Some terminals deliver Ctrl+letter as a bare control character instead
    /// of a modifier, so the search overlay decodes those here as well.
    fn handle_search_control(&mut self, ch: char, query: String) -> Result<Mode> {
        match ch {
            '\u{14}' => self.toggle_current(),
            '\u{4}' => {
                if let Some(book) = self.screen.current_book().cloned() {
                    self.stashed_query = Some(query);
                    return Ok(Mode::ConfirmDelete(ConfirmDelete::from(book)));
                }
                self.set_status("No book selected to delete.", StatusKind::Error);
            }
            '\u{5}' => {
                if let Some(book) = self.screen.current_book().cloned() {
                    self.stashed_query = Some(query);
                    return Ok(Mode::EditingBook {
                        id: book.id,
                        form: BookForm::from_book(&book),
                    });
                }
                self.set_status("No book selected to edit.", StatusKind::Error);
            }
            _ => {}
        }
        Ok(Mode::Searching { query })
    }

    fn apply_filter(&mut self, query: &str) {
        let filter = (!query.trim().is_empty()).then(|| query.to_string());
        self.screen.set_filter(&self.shelf, filter);
    }

    /// Close the active modal, returning to the stashed search if one spawned
    /// it and to the plain shelf otherwise.
    fn leave_modal(&mut self) -> Mode {
        match self.stashed_query.take() {
            Some(query) => Mode::Searching { query },
            None => Mode::Normal,
        }
    }

    pub(crate) fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content, footer] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT.min(area.height)),
        ])
        .areas(area);

        self.render_shelf(frame, content);
        if footer.height > 0 {
            self.render_footer(frame, footer);
        }

        match &self.mode {
            Mode::AddingBook(form) => self.render_book_form(frame, area, "Add Book", form),
            Mode::EditingBook { form, .. } => self.render_book_form(frame, area, "Edit Book", form),
            Mode::ConfirmDelete(confirm) => self.render_confirm_delete(frame, area, confirm),
            Mode::Searching { query } => self.render_search_input(frame, area, query),
            Mode::Normal => {}
        }
    }

    pub(crate) fn handle_ctrl_t(&mut self) -> Result<()> {
        if matches!(self.mode, Mode::Searching { .. }) {
            self.toggle_current();
        }
        Ok(())
    }

    pub(crate) fn handle_ctrl_d(&mut self) -> Result<()> {
        if !matches!(self.mode, Mode::Searching { .. }) {
            return Ok(());
        }
        let Some(book) = self.screen.current_book().cloned() else {
            self.set_status("No book selected to delete.", StatusKind::Error);
            return Ok(());
        };

        if let Mode::Searching { query } = mem::replace(&mut self.mode, Mode::Normal) {
            self.stashed_query = Some(query);
        }
        self.mode = Mode::ConfirmDelete(ConfirmDelete::from(book));
        Ok(())
    }

    pub(crate) fn handle_ctrl_e(&mut self) -> Result<()> {
        if !matches!(self.mode, Mode::Searching { .. }) {
            return Ok(());
        }
        let Some(book) = self.screen.current_book().cloned() else {
            self.set_status("No book selected to edit.", StatusKind::Error);
            return Ok(());
        };

        if let Mode::Searching { query } = mem::replace(&mut self.mode, Mode::Normal) {
            self.stashed_query = Some(query);
        }
        self.mode = Mode::EditingBook {
            id: book.id,
            form: BookForm::from_book(&book),
        };
        Ok(())
    }

    fn toggle_current(&mut self) {
        let Some(book) = self.screen.current_book().cloned() else {
            self.set_status("No book selected to toggle.", StatusKind::Error);
            return;
        };

        match self.shelf.toggle_complete(book.id) {
            Ok(Some(finished)) => {
                self.screen.refresh(&self.shelf);
                self.screen.focus(book.id);
                let label = if finished { "finished" } else { "unread" };
                self.set_status(
                    format!("Marked '{}' as {label}.", book.title),
                    StatusKind::Info,
                );
            }
            Ok(None) => {}
            Err(err) => {
                error!("saving completion change failed: {err:#}");
                self.screen.refresh(&self.shelf);
                self.screen.focus(book.id);
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    fn render_shelf(&self, frame: &mut Frame, area: Rect) {
        if self.shelf.is_empty() {
            let placeholder = Paragraph::new("No books yet. Press 'a' to add one.")
                .alignment(Alignment::Center);
            frame.render_widget(placeholder, area);
            return;
        }

        if self.screen.rows.is_empty() {
            let text = if self.screen.has_filter() {
                "No books match the current search."
            } else {
                "No books to display."
            };
            let placeholder = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(placeholder, area);
            return;
        }

        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(area);

        let split = self.screen.unread_total;
        let selected = self.screen.selected;
        let unread_selected = (selected < split).then_some(selected);
        let finished_selected = (selected >= split).then(|| selected - split);

        self.render_pane(
            frame,
            left,
            "Unread",
            &self.screen.rows[..split],
            unread_selected,
        );
        self.render_pane(
            frame,
            right,
            "Finished",
            &self.screen.rows[split..],
            finished_selected,
        );
    }

    fn render_pane(
        &self,
        frame: &mut Frame,
        area: Rect,
        name: &str,
        books: &[Book],
        selected: Option<usize>,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{name} ({})", books.len()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if books.is_empty() {
            let placeholder = Paragraph::new(format!("No {} books.", name.to_lowercase()))
                .alignment(Alignment::Center);
            frame.render_widget(placeholder, inner);
            return;
        }

        self.render_book_cards(frame, inner, books, selected);
    }

    fn render_book_cards(
        &self,
        frame: &mut Frame,
        area: Rect,
        books: &[Book],
        selected: Option<usize>,
    ) {
        if books.is_empty() || area.height == 0 {
            return;
        }

        let capacity = (area.height as usize / BOOK_CARD_HEIGHT as usize).max(1);

        // Window the list so the anchored card stays visible.
        let anchor = selected.unwrap_or(0);
        let mut first = anchor.saturating_sub(capacity - 1);
        if first + capacity > books.len() {
            first = books.len().saturating_sub(capacity);
        }
        let window = &books[first..books.len().min(first + capacity)];

        let slots = Layout::vertical(vec![Constraint::Length(BOOK_CARD_HEIGHT); window.len()])
            .split(area);

        for (slot, (offset, book)) in slots.iter().zip(window.iter().enumerate()) {
            if slot.height == 0 {
                continue;
            }
            let is_selected = selected == Some(first + offset);

            let mut card = Block::default().borders(Borders::ALL);
            let mut text_style = Style::default();
            if is_selected {
                card = card.style(Style::default().fg(Color::Yellow));
                text_style = text_style.fg(Color::Yellow);
            }

            let headline = if is_selected {
                format!("▶ {}", book.display_title())
            } else {
                book.display_title()
            };
            let author = if book.author.trim().is_empty() {
                "Unknown author".to_string()
            } else {
                book.author.trim().to_string()
            };
            let body = vec![
                Line::styled(headline, Style::default().add_modifier(Modifier::BOLD)),
                Line::styled(author, Style::default().fg(Color::Gray)),
            ];

            let widget = Paragraph::new(body)
                .block(card)
                .style(text_style)
                .alignment(Alignment::Left)
                .wrap(Wrap { trim: true });
            frame.render_widget(widget, *slot);
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let status_line = match &self.status {
            Some(status) => Line::styled(status.text.clone(), status.kind.style()),
            None => Line::from(""),
        };
        let footer =
            Paragraph::new(vec![status_line, self.help_line()]).wrap(Wrap { trim: true });
        frame.render_widget(footer, inner);
    }

    fn help_line(&self) -> Line<'static> {
        let entries: &[(&str, &str)] = match self.mode {
            Mode::Searching { .. } => &[
                ("[↑↓]", "Select"),
                ("[Ctrl+T]", "Toggle"),
                ("[Ctrl+E]", "Edit"),
                ("[Ctrl+D]", "Delete"),
                ("[Esc]", "Close Search"),
            ],
            _ => &[
                ("[↑↓]", "Select"),
                ("[t]", "Toggle Read"),
                ("[a]", "Add"),
                ("[e]", "Edit"),
                ("[d]", "Delete"),
                ("[/]", "Search"),
                ("[q]", "Quit"),
            ],
        };

        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let mut spans = Vec::new();
        for (idx, (key, action)) in entries.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::raw("   "));
            }
            spans.push(Span::styled(*key, key_style));
            spans.push(Span::raw(format!(" {action}")));
        }
        Line::from(spans)
    }

    fn render_search_input(&self, frame: &mut Frame, area: Rect, query: &str) {
        let bar = Rect {
            height: area.height.min(3),
            ..area
        };
        frame.render_widget(Clear, bar);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let inner = block.inner(bar);
        let query_line = Paragraph::new(format!("Title: {query}"))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(query_line, bar);

        let cursor_x = inner.x + "Title: ".len() as u16 + query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn render_book_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &BookForm) {
        let dialog = centered_rect(60, 50, area);
        frame.render_widget(Clear, dialog);

        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let mut lines = vec![
            form.build_line("Title", BookField::Title),
            form.build_line("Author", BookField::Author),
            form.build_line("Year", BookField::Year),
        ];
        if form.has_status_field() {
            lines.push(form.build_line("Finished", BookField::Finished));
        }
        lines.push(Line::from(""));

        match &form.error {
            Some(message) => {
                lines.push(Line::styled(
                    message.clone(),
                    Style::default().fg(Color::Red),
                ));
            }
            None => {
                let hint = if form.has_status_field() {
                    "Enter to save • Tab to switch • Space to check • Esc to cancel"
                } else {
                    "Enter to save • Tab to switch • blank keeps current • Esc to cancel"
                };
                lines.push(Line::styled(hint, Style::default().fg(Color::Gray)));
            }
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

        let (label, row) = match form.active {
            BookField::Title => ("Title: ", 0),
            BookField::Author => ("Author: ", 1),
            BookField::Year => ("Year: ", 2),
            BookField::Finished => ("Finished: ", 3),
        };
        let column = label.len() as u16
            + match form.active {
                BookField::Finished => 1,
                field => form.value_len(field) as u16,
            };
        frame.set_cursor_position((inner.x + column, inner.y + row));
    }

    fn render_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let dialog = centered_rect(60, 30, area);
        frame.render_widget(Clear, dialog);

        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL);
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let prompt = if confirm.author.trim().is_empty() {
            format!("Delete '{}'?", confirm.title)
        } else {
            format!("Delete '{}' by {}?", confirm.title, confirm.author)
        };
        let body = vec![
            Line::from(prompt),
            Line::from("The book is removed from the shelf permanently."),
            Line::from(""),
            Line::styled(
                "Y deletes the book. N or Esc keeps it.",
                Style::default().fg(Color::Gray),
            ),
        ];

        frame.render_widget(Paragraph::new(body).wrap(Wrap { trim: true }), inner);
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            kind,
            text: text.into(),
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}
