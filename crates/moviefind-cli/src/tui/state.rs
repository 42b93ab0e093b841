//! Browser TUI state and key handling.

use crossterm::event::{KeyCode, KeyModifiers};
use moviefind_api::tmdb::MovieId;
use moviefind_core::{Notice, View};
use ratatui::widgets::TableState;

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Typing a search term.
    Editing,
    /// Navigating the result grid.
    Browsing,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing to forward to the session.
    None,
    /// Leave the browser.
    Quit,
    /// Submit the typed term.
    Submit(String),
    /// Move to another page.
    Page(u32),
    /// Open the detail view for a movie.
    Select(MovieId),
    /// Close the detail view.
    CloseSelection,
}

/// State for the browser TUI.
#[derive(Debug)]
pub struct BrowserState {
    /// Search input buffer.
    pub input: String,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Grid cursor.
    pub table_state: TableState,
    /// Latest notice, shown in the footer.
    pub toast: Option<Notice>,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserState {
    /// Creates a state in editing mode with an empty input.
    #[must_use]
    pub fn new() -> Self {
        Self {
            input: String::new(),
            input_mode: InputMode::Editing,
            table_state: TableState::default(),
            toast: None,
        }
    }

    /// Grid cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    /// Keeps the cursor inside a grid of `len` rows.
    pub fn clamp_cursor(&mut self, len: usize) {
        if len == 0 {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(self.cursor().min(len.saturating_sub(1))));
        }
    }

    /// Translates a key press into an [`Action`], updating local state.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers, view: &View<'_>) -> Action {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        match self.input_mode {
            InputMode::Editing => self.handle_editing(key),
            InputMode::Browsing => self.handle_browsing(key, view),
        }
    }

    fn handle_editing(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Enter => {
                self.input_mode = InputMode::Browsing;
                self.table_state.select(Some(0));
                return Action::Submit(self.input.clone());
            }
            KeyCode::Esc => self.input_mode = InputMode::Browsing,
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
        Action::None
    }

    fn handle_browsing(&mut self, key: KeyCode, view: &View<'_>) -> Action {
        if view.modal.is_some() {
            return match key {
                KeyCode::Esc | KeyCode::Enter => Action::CloseSelection,
                KeyCode::Char('q') => Action::Quit,
                _ => Action::None,
            };
        }

        let rows = view.grid.map_or(0, <[_]>::len);
        match key {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Editing;
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.table_state.select(Some(self.cursor().saturating_sub(1)));
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor().saturating_add(1) < rows {
                    self.table_state.select(Some(self.cursor().saturating_add(1)));
                }
                Action::None
            }
            KeyCode::Left => view
                .pagination
                .filter(|p| p.current > 1)
                .map_or(Action::None, |p| Action::Page(p.current.saturating_sub(1))),
            KeyCode::Right => view
                .pagination
                .filter(|p| p.current < p.total)
                .map_or(Action::None, |p| Action::Page(p.current.saturating_add(1))),
            KeyCode::Enter => view
                .grid
                .and_then(|movies| movies.get(self.cursor()))
                .map_or(Action::None, |m| Action::Select(m.id)),
            _ => Action::None,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use moviefind_api::tmdb::Movie;
    use moviefind_core::Pagination;

    use super::*;

    fn movies(ids: &[u64]) -> Vec<Movie> {
        ids.iter()
            .map(|id| serde_json::from_value(serde_json::json!({ "id": id })).unwrap())
            .collect()
    }

    fn browsing() -> BrowserState {
        let mut state = BrowserState::new();
        state.input_mode = InputMode::Browsing;
        state.table_state.select(Some(0));
        state
    }

    #[test]
    fn test_typing_and_submit() {
        // Arrange
        let mut state = BrowserState::new();
        let view = View::default();

        // Act
        for c in "dunex".chars() {
            let _ = state.handle_key(KeyCode::Char(c), KeyModifiers::NONE, &view);
        }
        let _ = state.handle_key(KeyCode::Backspace, KeyModifiers::NONE, &view);
        let action = state.handle_key(KeyCode::Enter, KeyModifiers::NONE, &view);

        // Assert
        assert_eq!(action, Action::Submit(String::from("dune")));
        assert_eq!(state.input_mode, InputMode::Browsing);
    }

    #[test]
    fn test_q_types_while_editing() {
        // Arrange
        let mut state = BrowserState::new();

        // Act
        let action = state.handle_key(KeyCode::Char('q'), KeyModifiers::NONE, &View::default());

        // Assert
        assert_eq!(action, Action::None);
        assert_eq!(state.input, "q");
    }

    #[test]
    fn test_ctrl_c_quits_in_any_mode() {
        // Arrange
        let mut state = BrowserState::new();

        // Act
        let action = state.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL, &View::default());

        // Assert
        assert_eq!(action, Action::Quit);
    }

    #[test]
    fn test_page_keys_respect_bounds() {
        // Arrange
        let mut state = browsing();
        let grid = movies(&[1, 2]);
        let first = View {
            grid: Some(&grid),
            pagination: Some(Pagination {
                current: 1,
                total: 3,
            }),
            ..View::default()
        };
        let last = View {
            pagination: Some(Pagination {
                current: 3,
                total: 3,
            }),
            ..first
        };

        // Act & Assert
        assert_eq!(
            state.handle_key(KeyCode::Left, KeyModifiers::NONE, &first),
            Action::None
        );
        assert_eq!(
            state.handle_key(KeyCode::Right, KeyModifiers::NONE, &first),
            Action::Page(2)
        );
        assert_eq!(
            state.handle_key(KeyCode::Right, KeyModifiers::NONE, &last),
            Action::None
        );
        assert_eq!(
            state.handle_key(KeyCode::Left, KeyModifiers::NONE, &last),
            Action::Page(2)
        );
    }

    #[test]
    fn test_enter_selects_row_under_cursor() {
        // Arrange
        let mut state = browsing();
        let grid = movies(&[10, 20, 30]);
        let view = View {
            grid: Some(&grid),
            ..View::default()
        };

        // Act
        let _ = state.handle_key(KeyCode::Down, KeyModifiers::NONE, &view);
        let action = state.handle_key(KeyCode::Enter, KeyModifiers::NONE, &view);

        // Assert
        assert_eq!(action, Action::Select(20));
    }

    #[test]
    fn test_cursor_stops_at_last_row() {
        // Arrange
        let mut state = browsing();
        let grid = movies(&[10, 20]);
        let view = View {
            grid: Some(&grid),
            ..View::default()
        };

        // Act
        for _ in 0..5 {
            let _ = state.handle_key(KeyCode::Char('j'), KeyModifiers::NONE, &view);
        }

        // Assert
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn test_esc_closes_modal() {
        // Arrange
        let mut state = browsing();
        let grid = movies(&[10]);
        let view = View {
            grid: Some(&grid),
            modal: grid.first(),
            ..View::default()
        };

        // Act
        let action = state.handle_key(KeyCode::Esc, KeyModifiers::NONE, &view);

        // Assert
        assert_eq!(action, Action::CloseSelection);
    }

    #[test]
    fn test_clamp_cursor() {
        // Arrange
        let mut state = browsing();
        state.table_state.select(Some(7));

        // Act
        state.clamp_cursor(3);

        // Assert
        assert_eq!(state.cursor(), 2);

        // Act
        state.clamp_cursor(0);

        // Assert
        assert_eq!(state.table_state.selected(), None);
    }
}
