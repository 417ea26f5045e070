use crate::models::Book;
use crate::shelf::Bookshelf;

/// Backing state for the two-pane shelf view. The visible rows hold the
/// unread books first and the finished books after them, each group keeping
/// collection order, so a single flat selection index can walk both panes.
#[derive(Default)]
pub(crate) struct ShelfScreen {
    pub(crate) rows: Vec<Book>,
    pub(crate) unread_total: usize,
    pub(crate) filter: Option<String>,
    pub(crate) selected: usize,
}

impl ShelfScreen {
    pub(crate) fn new(shelf: &Bookshelf) -> Self {
        let mut screen = Self::default();
        screen.refresh(shelf);
        screen
    }

    /// Rebuild the visible rows from the shelf, applying the active filter
    /// and keeping the selection in bounds.
    pub(crate) fn refresh(&mut self, shelf: &Bookshelf) {
        let visible: Vec<&Book> = match &self.filter {
            Some(query) if !query.trim().is_empty() => shelf.search(query),
            _ => shelf.books().iter().collect(),
        };

        let (unread, finished): (Vec<&Book>, Vec<&Book>) =
            visible.into_iter().partition(|book| !book.is_complete);
        self.unread_total = unread.len();
        self.rows = unread
            .into_iter()
            .cloned()
            .chain(finished.into_iter().cloned())
            .collect();
        self.clamp_selection();
    }

    pub(crate) fn set_filter(&mut self, shelf: &Bookshelf, filter: Option<String>) {
        self.filter = filter;
        self.refresh(shelf);
    }

    pub(crate) fn has_filter(&self) -> bool {
        self.filter
            .as_ref()
            .map(|query| !query.trim().is_empty())
            .unwrap_or(false)
    }

    pub(crate) fn current_book(&self) -> Option<&Book> {
        self.rows.get(self.selected)
    }

    /// Move the selection onto the row holding `id`, if it is visible.
    pub(crate) fn focus(&mut self, id: i64) {
        if let Some(idx) = self.rows.iter().position(|book| book.id == id) {
            self.selected = idx;
        }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let last = self.rows.len().saturating_sub(1);
        if self.selected > last {
            self.selected = last;
        }
    }
}
