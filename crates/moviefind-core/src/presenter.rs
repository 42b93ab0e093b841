//! Derives what to render from the store and tracks the detail selection.

use moviefind_api::tmdb::{ErrorKind, Movie, MovieId};

use crate::notify::NotificationSink;
use crate::store::{FetchState, QueryStore};

/// Pagination control contents (1-based pages).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page of the active query.
    pub current: u32,
    /// Total pages of the displayed result.
    pub total: u32,
}

/// Everything the UI needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct View<'a> {
    /// Show the loading indicator.
    pub loader: bool,
    /// Show the error indicator.
    pub error: Option<ErrorKind>,
    /// Movies to lay out in the grid.
    pub grid: Option<&'a [Movie]>,
    /// Pagination control, when there is more than one page.
    pub pagination: Option<Pagination>,
    /// A request is running behind the displayed grid.
    pub refreshing: bool,
    /// Movie shown in the detail modal.
    pub modal: Option<&'a Movie>,
}

/// Presentation controller. Its only state is the selection.
#[derive(Debug, Default)]
pub struct Presenter {
    selection: Option<Movie>,
}

impl Presenter {
    /// Creates a presenter with nothing selected.
    #[must_use]
    pub const fn new() -> Self {
        Self { selection: None }
    }

    /// The selected movie.
    #[must_use]
    pub const fn selection(&self) -> Option<&Movie> {
        self.selection.as_ref()
    }

    /// Selects the movie with `id` from the displayed result.
    ///
    /// Returns `None` and leaves the selection untouched when the movie
    /// is not part of the displayed result.
    pub fn select(&mut self, state: &FetchState, id: MovieId) -> Option<&Movie> {
        let Some(movie) = state.result().and_then(|r| r.movie(id)) else {
            tracing::debug!(id, "selection rejected: movie not displayed");
            return None;
        };
        self.selection = Some(movie.clone());
        self.selection.as_ref()
    }

    /// Clears the selection.
    pub fn close_selection(&mut self) {
        self.selection = None;
    }

    /// Drops a selection that no longer belongs to the displayed result.
    pub fn reconcile(&mut self, state: &FetchState) {
        let Some(selected) = &self.selection else {
            return;
        };
        let still_displayed = state
            .result()
            .is_some_and(|r| r.movie(selected.id).is_some());
        if !still_displayed {
            tracing::debug!(id = selected.id, "selection cleared");
            self.selection = None;
        }
    }

    /// Derives the view for the store's current state.
    #[must_use]
    pub fn view<'a, N: NotificationSink>(&'a self, store: &'a QueryStore<N>) -> View<'a> {
        match store.state() {
            FetchState::Idle => View::default(),
            FetchState::Loading => View {
                loader: true,
                ..View::default()
            },
            FetchState::Error(kind) => View {
                error: Some(*kind),
                ..View::default()
            },
            FetchState::Success(result) if result.is_empty() => View {
                refreshing: store.is_fetching(),
                ..View::default()
            },
            FetchState::Success(result) => {
                let current = store
                    .query()
                    .filter(|q| q.term() == result.source_query.term())
                    .map_or(result.source_query.page(), |q| q.page());
                let pagination = (result.total_pages > 1).then_some(Pagination {
                    current,
                    total: result.total_pages,
                });
                View {
                    loader: false,
                    error: None,
                    grid: Some(&result.movies),
                    pagination,
                    refreshing: store.is_fetching(),
                    modal: self.selection.as_ref(),
                }
            }
        }
    }
}
