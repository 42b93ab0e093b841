//! Query state store: current query, fetch state and result cache.

use std::collections::HashSet;

use moviefind_api::tmdb::{ErrorKind, SearchQuery, SearchResult};

use crate::cache::{CacheSettings, Lookup, ResultCache};
use crate::notify::{BLANK_QUERY_MESSAGE, NO_RESULTS_MESSAGE, NoticeKind, NotificationSink};

/// What the UI should currently reflect for the active query.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState {
    /// Nothing searched yet.
    #[default]
    Idle,
    /// A request is outstanding and there is nothing to keep showing.
    Loading,
    /// A result is displayed.
    Success(SearchResult),
    /// The last request for the active query failed.
    Error(ErrorKind),
}

impl FetchState {
    /// The displayed result, if any.
    #[must_use]
    pub const fn result(&self) -> Option<&SearchResult> {
        match self {
            Self::Success(result) => Some(result),
            _ => None,
        }
    }

    /// The error kind, if in the error state.
    #[must_use]
    pub const fn error(&self) -> Option<ErrorKind> {
        match self {
            Self::Error(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Whether in the loading state.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// A request the caller must perform, tagged with the query it belongs to.
///
/// Hand the outcome back through [`QueryStore::complete`]; outcomes for
/// a query that is no longer current are discarded there.
#[derive(Debug, PartialEq, Eq)]
pub struct FetchTicket {
    query: SearchQuery,
}

impl FetchTicket {
    /// The query to request.
    #[must_use]
    pub const fn query(&self) -> &SearchQuery {
        &self.query
    }
}

/// Result of a write operation on the store.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub enum Dispatch {
    /// An outbound request is needed.
    Fetch(FetchTicket),
    /// Served from a fresh cache entry.
    Cached,
    /// A request for the same query is already outstanding.
    InFlight,
    /// The operation was not valid in the current state.
    Rejected,
}

/// Holds the active query and its fetch state.
///
/// Single owner, no locking: requests are tagged with their query and
/// only the response for the current query updates the state.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct QueryStore<N> {
    query: Option<SearchQuery>,
    state: FetchState,
    /// Keys with a request on the wire, superseded or not.
    outstanding: HashSet<SearchQuery>,
    cache: ResultCache,
    notifier: N,
}

impl<N: NotificationSink> QueryStore<N> {
    /// Creates an idle store.
    #[must_use]
    pub fn new(notifier: N, settings: CacheSettings) -> Self {
        Self {
            query: None,
            state: FetchState::Idle,
            outstanding: HashSet::new(),
            cache: ResultCache::new(settings),
            notifier,
        }
    }

    /// The active query.
    #[must_use]
    pub const fn query(&self) -> Option<&SearchQuery> {
        self.query.as_ref()
    }

    /// The current fetch state.
    #[must_use]
    pub const fn state(&self) -> &FetchState {
        &self.state
    }

    /// Whether a request for the active query is outstanding.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.query
            .as_ref()
            .is_some_and(|query| self.outstanding.contains(query))
    }

    /// Starts a search for the first page of `term`.
    ///
    /// A blank term only raises a warning notice.
    pub fn submit(&mut self, term: &str) -> Dispatch {
        let query = SearchQuery::first_page(term);
        if query.is_blank() {
            tracing::debug!("blank query rejected");
            self.notifier
                .notify(BLANK_QUERY_MESSAGE, NoticeKind::Warning);
            return Dispatch::Rejected;
        }

        tracing::debug!(term = query.term(), "search submitted");
        self.activate(query, false)
    }

    /// Moves to `page` of the displayed result.
    ///
    /// Rejected unless a result is displayed and `1 <= page <= total_pages`.
    /// The displayed result stays visible while the new page loads.
    pub fn set_page(&mut self, page: u32) -> Dispatch {
        let Some(current) = self.state.result() else {
            tracing::debug!(page, "page change rejected: no result displayed");
            return Dispatch::Rejected;
        };
        if page == 0 || page > current.total_pages {
            tracing::debug!(
                page,
                total_pages = current.total_pages,
                "page change rejected: out of range"
            );
            return Dispatch::Rejected;
        }

        let query = current.source_query.with_page(page);
        self.activate(query, true)
    }

    /// Applies the outcome of a ticket's request.
    ///
    /// Successful results are always cached. The state only changes when
    /// the ticket still matches the active query; returns whether it did.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<SearchResult, ErrorKind>,
    ) -> bool {
        let FetchTicket { query } = ticket;

        if let Ok(result) = &outcome {
            self.cache.insert(result.clone());
        }
        self.outstanding.remove(&query);

        if self.query.as_ref() != Some(&query) {
            tracing::debug!(
                term = query.term(),
                page = query.page(),
                "discarding response for superseded query"
            );
            return false;
        }

        match outcome {
            Ok(result) => self.show(result),
            Err(kind) => {
                tracing::debug!(?kind, "search failed");
                self.state = FetchState::Error(kind);
            }
        }
        true
    }

    /// Makes `query` active and decides whether a request is needed.
    fn activate(&mut self, query: SearchQuery, keep_previous: bool) -> Dispatch {
        self.query = Some(query.clone());

        let cached = match self.cache.lookup(&query) {
            Lookup::Fresh(result) => Some((result.clone(), true)),
            Lookup::Stale(result) => Some((result.clone(), false)),
            Lookup::Missing => None,
        };

        match cached {
            Some((result, true)) => {
                tracing::debug!(
                    term = query.term(),
                    page = query.page(),
                    "serving fresh cached result"
                );
                self.show(result);
                return Dispatch::Cached;
            }
            Some((result, false)) => self.show(result),
            None => {
                let same_key_shown = self
                    .state
                    .result()
                    .is_some_and(|r| r.source_query == query);
                let placeholder = keep_previous && self.state.result().is_some();
                if !same_key_shown && !placeholder {
                    self.state = FetchState::Loading;
                }
            }
        }

        if self.outstanding.contains(&query) {
            return Dispatch::InFlight;
        }
        self.outstanding.insert(query.clone());
        Dispatch::Fetch(FetchTicket { query })
    }

    /// Displays `result`, raising the empty-result notice on entry.
    fn show(&mut self, result: SearchResult) {
        let empty_already_shown = self
            .state
            .result()
            .is_some_and(|r| r.is_empty() && r.source_query == result.source_query);
        if result.is_empty() && !empty_already_shown {
            self.notifier.notify(NO_RESULTS_MESSAGE, NoticeKind::Info);
        }
        self.state = FetchState::Success(result);
    }
}
