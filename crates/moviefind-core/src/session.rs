//! Search session: the write API and read models the UI talks to.

use std::sync::Arc;

use moviefind_api::tmdb::{ErrorKind, Movie, MovieId, MovieSearchApi, SearchQuery, SearchResult};
use tracing::instrument;

use crate::cache::CacheSettings;
use crate::notify::NotificationSink;
use crate::presenter::{Presenter, View};
use crate::store::{Dispatch, FetchState, FetchTicket, QueryStore};

/// Runs the request a ticket stands for.
///
/// Free-standing so it can be moved onto a spawned task together with a
/// clone of the adapter; hand the pair back to [`SearchSession::complete`].
#[instrument(skip_all, fields(query = ticket.query().term(), page = ticket.query().page()))]
pub async fn fetch<A: MovieSearchApi>(
    api: &A,
    ticket: FetchTicket,
) -> (FetchTicket, Result<SearchResult, ErrorKind>) {
    let query = ticket.query();
    let outcome = api.search(query.term(), query.page()).await;
    (ticket, outcome)
}

/// Query store, presenter and adapter behind one facade.
#[derive(Debug)]
pub struct SearchSession<A, N> {
    api: Arc<A>,
    store: QueryStore<N>,
    presenter: Presenter,
}

impl<A: MovieSearchApi, N: NotificationSink> SearchSession<A, N> {
    /// Creates an idle session.
    pub fn new(api: A, notifier: N, settings: CacheSettings) -> Self {
        Self {
            api: Arc::new(api),
            store: QueryStore::new(notifier, settings),
            presenter: Presenter::new(),
        }
    }

    /// Shared handle to the adapter, for running requests elsewhere.
    #[must_use]
    pub fn api(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    /// Submits a new search term and closes the detail view.
    ///
    /// A blank term changes nothing apart from the warning notice.
    pub fn submit(&mut self, term: &str) -> Dispatch {
        let dispatch = self.store.submit(term);
        if dispatch != Dispatch::Rejected {
            self.presenter.close_selection();
        }
        dispatch
    }

    /// Moves to another page of the displayed result.
    pub fn set_page(&mut self, page: u32) -> Dispatch {
        let dispatch = self.store.set_page(page);
        self.presenter.reconcile(self.store.state());
        dispatch
    }

    /// Applies a finished request; returns whether the state changed.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<SearchResult, ErrorKind>,
    ) -> bool {
        let applied = self.store.complete(ticket, outcome);
        self.presenter.reconcile(self.store.state());
        applied
    }

    /// Runs the request for `dispatch`, if it asks for one, and applies it.
    pub async fn execute(&mut self, dispatch: Dispatch) {
        if let Dispatch::Fetch(ticket) = dispatch {
            let (ticket, outcome) = fetch(self.api.as_ref(), ticket).await;
            let _ = self.complete(ticket, outcome);
        }
    }

    /// Submits `term` and waits for the result.
    #[instrument(skip_all)]
    pub async fn search(&mut self, term: &str) -> &FetchState {
        let dispatch = self.submit(term);
        self.execute(dispatch).await;
        self.store.state()
    }

    /// Moves to `page` and waits for the result.
    #[instrument(skip_all, fields(page = page))]
    pub async fn go_to_page(&mut self, page: u32) -> &FetchState {
        let dispatch = self.set_page(page);
        self.execute(dispatch).await;
        self.store.state()
    }

    /// Opens the detail view for a displayed movie.
    pub fn select(&mut self, id: MovieId) -> Option<&Movie> {
        self.presenter.select(self.store.state(), id)
    }

    /// Closes the detail view.
    pub fn close_selection(&mut self) {
        self.presenter.close_selection();
    }

    /// Current fetch state.
    #[must_use]
    pub const fn current_fetch_state(&self) -> &FetchState {
        self.store.state()
    }

    /// Movie open in the detail view.
    #[must_use]
    pub const fn current_selection(&self) -> Option<&Movie> {
        self.presenter.selection()
    }

    /// The active query.
    #[must_use]
    pub const fn current_query(&self) -> Option<&SearchQuery> {
        self.store.query()
    }

    /// Whether a request for the active query is outstanding.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.store.is_fetching()
    }

    /// What to render right now.
    #[must_use]
    pub fn view(&self) -> View<'_> {
        self.presenter.view(&self.store)
    }
}
