//! TUI module for the interactive movie browser.
//!
//! Uses `ratatui` + `crossterm` for rendering. Searches run on spawned
//! tokio tasks and their results are handed back to the session, which
//! drops any response whose query is no longer active.

/// Browser state and key handling.
pub mod state;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use moviefind_api::tmdb::{ErrorKind, MovieSearchApi, SearchResult};
use moviefind_core::session::fetch;
use moviefind_core::{Dispatch, FetchTicket, Notice, NotificationSink, SearchSession};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use self::state::{Action, BrowserState};

/// Idle wait between frames when no key is pending.
const TICK: Duration = Duration::from_millis(50);

/// A finished request on its way back to the session.
type Completion = (FetchTicket, Result<SearchResult, ErrorKind>);

/// Runs the movie browser TUI.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<A, N>(
    session: SearchSession<A, N>,
    notices: UnboundedReceiver<Notice>,
) -> Result<()>
where
    A: MovieSearchApi + Send + Sync + 'static,
    N: NotificationSink,
{
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, session, notices).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop<A, N>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut session: SearchSession<A, N>,
    mut notices: UnboundedReceiver<Notice>,
) -> Result<()>
where
    A: MovieSearchApi + Send + Sync + 'static,
    N: NotificationSink,
{
    let (done_tx, mut done_rx) = unbounded_channel::<Completion>();
    let mut state = BrowserState::new();

    loop {
        while let Ok(notice) = notices.try_recv() {
            state.toast = Some(notice);
        }
        while let Ok((ticket, outcome)) = done_rx.try_recv() {
            if session.complete(ticket, outcome) {
                state.clamp_cursor(session.view().grid.map_or(0, <[_]>::len));
            }
        }

        let view = session.view();
        terminal
            .draw(|frame| ui::draw(frame, &view, &mut state))
            .context("failed to draw TUI")?;

        if event::poll(Duration::ZERO).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            let action = state.handle_key(key.code, key.modifiers, &view);
            if apply(&mut session, &mut state, action, &done_tx) {
                return Ok(());
            }
        } else {
            tokio::time::sleep(TICK).await;
        }
    }
}

/// Forwards an action to the session. Returns `true` to exit.
fn apply<A, N>(
    session: &mut SearchSession<A, N>,
    state: &mut BrowserState,
    action: Action,
    done_tx: &UnboundedSender<Completion>,
) -> bool
where
    A: MovieSearchApi + Send + Sync + 'static,
    N: NotificationSink,
{
    let dispatch = match action {
        Action::None => return false,
        Action::Quit => return true,
        Action::Submit(term) => {
            state.toast = None;
            session.submit(&term)
        }
        Action::Page(page) => session.set_page(page),
        Action::Select(id) => {
            let _ = session.select(id);
            return false;
        }
        Action::CloseSelection => {
            session.close_selection();
            return false;
        }
    };
    spawn_fetch(session, dispatch, done_tx);
    false
}

/// Starts the request a dispatch asks for on a background task.
fn spawn_fetch<A, N>(
    session: &SearchSession<A, N>,
    dispatch: Dispatch,
    done_tx: &UnboundedSender<Completion>,
) where
    A: MovieSearchApi + Send + Sync + 'static,
    N: NotificationSink,
{
    let Dispatch::Fetch(ticket) = dispatch else {
        return;
    };
    let api = session.api();
    let done_tx = done_tx.clone();
    tokio::spawn(async move {
        let completion = fetch(api.as_ref(), ticket).await;
        if done_tx.send(completion).is_err() {
            tracing::debug!("search finished after the browser closed");
        }
    });
}
