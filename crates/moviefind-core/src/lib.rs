//! Core search orchestration for moviefind.
//!
//! A pure state machine around the movie search adapter: the query
//! store decides when to fetch and what to show, the presenter derives
//! the view and owns the detail selection, and notifications leave
//! through an injected sink.

/// Time-based result cache.
pub mod cache;
/// Notification sink interface and implementations.
pub mod notify;
/// View derivation and selection handling.
pub mod presenter;
/// Search session facade tying store, presenter and adapter together.
pub mod session;
/// Query state store.
pub mod store;

pub use cache::{CacheSettings, ResultCache};
pub use notify::{ChannelSink, Notice, NoticeKind, NotificationSink, TracingSink};
pub use presenter::{Pagination, Presenter, View};
pub use session::SearchSession;
pub use store::{Dispatch, FetchState, FetchTicket, QueryStore};
