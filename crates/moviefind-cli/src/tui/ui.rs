//! TUI rendering logic for the movie browser.

use moviefind_api::tmdb::Movie;
use moviefind_core::{NoticeKind, View};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap};

use super::state::{BrowserState, InputMode};

/// Poster size used for the detail view link.
const POSTER_SIZE: &str = "w500";

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, view: &View<'_>, state: &mut BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search input
            Constraint::Min(5),    // results
            Constraint::Length(4), // footer (pagination + notice)
        ])
        .split(frame.area());

    draw_input(frame, chunks[0], state);
    draw_results(frame, chunks[1], view, state);
    draw_footer(frame, chunks[2], view, state);

    if let Some(movie) = view.modal {
        draw_modal(frame, movie);
    }
}

/// Draws the search input line.
fn draw_input(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let style = if state.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(state.input.as_str())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(input, area);
}

/// Draws the loader, error or result grid.
fn draw_results(frame: &mut Frame, area: Rect, view: &View<'_>, state: &mut BrowserState) {
    if view.loader {
        let loader = Paragraph::new("Loading movies...")
            .style(Style::default().fg(Color::Cyan))
            .block(Block::default().borders(Borders::ALL).title(" Movies "));
        frame.render_widget(loader, area);
        return;
    }

    if let Some(kind) = view.error {
        let error = Paragraph::new(kind.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Error "));
        frame.render_widget(error, area);
        return;
    }

    let Some(movies) = view.grid else {
        frame.render_widget(
            Block::default().borders(Borders::ALL).title(" Movies "),
            area,
        );
        return;
    };

    let header = Row::new(vec!["ID", "Title", "Year", "Rating"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = movies
        .iter()
        .map(|m| {
            Row::new(vec![
                m.id.to_string(),
                m.title.clone(),
                m.release_year()
                    .map_or_else(|| String::from("--"), |y| y.to_string()),
                format!("{:.1}", m.vote_average),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Min(20),
        Constraint::Length(6),
        Constraint::Length(6),
    ];

    let title = if view.refreshing {
        " Movies (refreshing) "
    } else {
        " Movies "
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

/// Draws pagination, the latest notice and key hints.
fn draw_footer(frame: &mut Frame, area: Rect, view: &View<'_>, state: &BrowserState) {
    let page_line = view.pagination.map_or_else(Line::default, |p| {
        Line::from(format!("\u{2190} Page {} of {} \u{2192}", p.current, p.total))
    });

    let notice_line = state.toast.as_ref().map_or_else(Line::default, |notice| {
        let color = match notice.kind {
            NoticeKind::Info => Color::LightBlue,
            NoticeKind::Warning => Color::Yellow,
        };
        Line::from(Span::styled(
            notice.message.clone(),
            Style::default().fg(color),
        ))
    });

    let hints = match state.input_mode {
        InputMode::Editing => " Type to search | Enter: submit | Esc: browse ",
        InputMode::Browsing => {
            " \u{2191}\u{2193}/j/k: move  \u{2190}\u{2192}: page  Enter: details  /: search  q: quit "
        }
    };

    let footer = Paragraph::new(vec![page_line, notice_line])
        .block(Block::default().borders(Borders::ALL).title_bottom(hints));
    frame.render_widget(footer, area);
}

/// Draws the movie detail modal over the grid.
fn draw_modal(frame: &mut Frame, movie: &Movie) {
    let area = centered(frame.area(), 70, 60);

    let label = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Release date: ", label),
            Span::raw(movie.release_date.clone().unwrap_or_else(|| String::from("--"))),
        ]),
        Line::from(vec![
            Span::styled("Rating: ", label),
            Span::raw(format!("{:.1}/10 ({} votes)", movie.vote_average, movie.vote_count)),
        ]),
    ];
    if let Some(url) = movie.poster_url(POSTER_SIZE) {
        lines.push(Line::from(vec![Span::styled("Poster: ", label), Span::raw(url)]));
    }
    lines.push(Line::default());
    lines.push(Line::from(movie.overview.clone().unwrap_or_default()));

    let modal = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", movie.title))
            .title_bottom(" Esc: close ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(modal, area);
}

/// Returns a rect of `percent_x` by `percent_y` centered in `area`.
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]
fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let margin_y = 100_u16.saturating_sub(percent_y) / 2;
    let margin_x = 100_u16.saturating_sub(percent_x) / 2;
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(margin_y),
            Constraint::Percentage(percent_y),
            Constraint::Percentage(margin_y),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(margin_x),
            Constraint::Percentage(percent_x),
            Constraint::Percentage(margin_x),
        ])
        .split(vertical[1])[1]
}
