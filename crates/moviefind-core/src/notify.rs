//! Ephemeral user-facing notices.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Message shown when a blank query is submitted.
pub const BLANK_QUERY_MESSAGE: &str = "Please enter your search query.";

/// Message shown when a search succeeds with no movies.
pub const NO_RESULTS_MESSAGE: &str = "No movies found for your request.";

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Informational (e.g. empty results).
    Info,
    /// User input problem (e.g. blank query).
    Warning,
}

/// A notice as delivered to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Message text.
    pub message: String,
    /// Severity.
    pub kind: NoticeKind,
}

/// Receiver of fire-and-forget notices.
///
/// Only blank submissions and empty successful searches are reported
/// here; every other failure goes to the error state instead.
pub trait NotificationSink {
    /// Shows `message` to the user.
    fn notify(&self, message: &str, kind: NoticeKind);
}

/// Sink that writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Info => tracing::info!("{message}"),
            NoticeKind::Warning => tracing::warn!("{message}"),
        }
    }
}

/// Sink that forwards notices over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<Notice>,
}

impl ChannelSink {
    /// Creates a sink and the receiver its notices arrive on.
    #[must_use]
    pub fn new() -> (Self, UnboundedReceiver<Notice>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, message: &str, kind: NoticeKind) {
        let notice = Notice {
            message: String::from(message),
            kind,
        };
        if self.tx.send(notice).is_err() {
            tracing::debug!("notice dropped: receiver closed");
        }
    }
}
