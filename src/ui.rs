//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Rendering is a pure function of
//! state:
//!
//! * no items known yet: the feed area stays blank;
//! * an empty list: the title bar plus "No posts found";
//! * otherwise: the title bar, then the post list with a `Loading...` row
//!   while the next page is on its way.
//!
//! A spinner line appears under the title while a refresh runs, and the list
//! is dimmed until it completes.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::source::Post;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub const EMPTY_MESSAGE: &str = "No posts found";
pub const LOADING_MESSAGE: &str = "Loading...";

/// Draw the complete UI for one frame.
///
/// Called once per tick from the main loop.  Delegates to helper functions
/// for each screen region.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    if app.feed.items().is_some() {
        draw_feed(app, frame, main_area);
    }

    if app.is_searching() {
        draw_search_prompt(app, frame, status_area);
    } else {
        draw_status_bar(app, frame, status_area);
    }
}

/// Title block, spinner, error line and the list (or empty-state message).
fn draw_feed(app: &mut App, frame: &mut Frame, area: Rect) {
    let refreshing = app.feed.is_refreshing();
    let block = Block::default()
        .title(Line::from(vec![
            Span::styled(
                format!(" {} ", app.feed.title()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("[r ⟳] ", Style::default().fg(Color::Cyan)),
        ]))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let notice_rows = u16::from(refreshing) + u16::from(app.feed.last_error().is_some());
    let [notice_area, body_area] = Layout::vertical([
        Constraint::Length(notice_rows),
        Constraint::Min(0),
    ])
    .areas(inner);

    let mut notices = Vec::new();
    if refreshing {
        let frame_idx = app.tick_count % SPINNER.len();
        notices.push(Line::from(Span::styled(
            format!("{} refreshing", SPINNER[frame_idx]),
            Style::default().fg(Color::Yellow),
        )));
    }
    if let Some(error) = app.feed.last_error() {
        notices.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }
    frame.render_widget(Paragraph::new(notices), notice_area);

    let posts = app.feed.items().unwrap_or_default();
    if posts.is_empty() {
        frame.render_widget(Paragraph::new(EMPTY_MESSAGE), body_area);
        return;
    }

    let mut list_items: Vec<ListItem> = posts.iter().map(post_item).collect();
    if app.feed.is_paginating() {
        list_items.push(ListItem::new(Line::from(Span::styled(
            LOADING_MESSAGE,
            Style::default().fg(Color::DarkGray),
        ))));
    }

    let mut list = List::new(list_items)
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");
    if refreshing {
        list = list.style(Style::default().add_modifier(Modifier::DIM));
    }

    frame.render_stateful_widget(list, body_area, &mut app.list_state);
}

/// Two lines per post: date and author, then the text.
fn post_item(post: &Post) -> ListItem<'static> {
    let date_str = post
        .created_at
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "no date".into());

    let header = Line::from(vec![
        Span::styled(format!("{:<18}", date_str), Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::styled(post.byline(), Style::default().fg(Color::Cyan)),
    ]);
    let body = Line::from(Span::styled(
        format!("  {}", post.one_line_text()),
        Style::default().fg(Color::White),
    ));

    ListItem::new(vec![header, body])
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} posts", app.feed.len()),
            Style::default().fg(Color::Green),
        ),
    ];
    if app.feed.len() > 0 && !app.feed.has_more() {
        spans.push(Span::styled(" (end)", Style::default().fg(Color::DarkGray)));
    }
    if let Some(query) = app.feed.query() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("query: {query}"),
            Style::default().fg(Color::Magenta),
        ));
    }
    spans.push(Span::raw("  q: quit  ↑/↓: scroll  r: refresh  /: search"));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the query being typed in place of the status bar.
fn draw_search_prompt(app: &App, frame: &mut Frame, area: Rect) {
    let input = app.search_input.as_deref().unwrap_or_default();
    let prompt = Paragraph::new(Line::from(vec![
        Span::styled(" search: ", Style::default().fg(Color::Magenta)),
        Span::raw(input),
        Span::styled("█", Style::default().fg(Color::Gray)),
        Span::styled("  enter: apply  esc: cancel", Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(prompt, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::feed::{Feed, FetchOutcome};
    use crate::source::{Cursor, Page};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();

        let buf = terminal.backend().buffer().clone();
        buf.content()
            .chunks(buf.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn post(id: &str, text: &str) -> Post {
        let mut post = Post::new(id);
        post.text = Some(text.into());
        post.author = Some("Ada".into());
        post
    }

    fn app_with(items: Option<Vec<Post>>, cursor: Option<&str>, search: bool) -> App {
        App::new(Feed::new(items, cursor.map(Cursor::new), None, search), None)
    }

    #[test]
    fn nothing_rendered_before_first_load() {
        let mut app = app_with(None, None, false);
        let text = render(&mut app);
        assert!(!text.contains("Latest feed"));
        assert!(!text.contains(EMPTY_MESSAGE));
        assert!(text.contains("0 posts"), "status bar still drawn");
    }

    #[test]
    fn empty_list_shows_message_without_list() {
        let mut app = app_with(Some(vec![]), None, false);
        let text = render(&mut app);
        assert!(text.contains("Latest feed"));
        assert!(text.contains(EMPTY_MESSAGE));
        assert!(!text.contains("no date"));
    }

    #[test]
    fn posts_are_listed_in_order_under_title() {
        let mut app = app_with(
            Some(vec![post("1", "first post"), post("2", "second post")]),
            None,
            true,
        );
        let text = render(&mut app);
        assert!(text.contains("Search Results"));
        assert!(text.contains("[r "), "refresh control in title");
        let first = text.find("first post").unwrap();
        let second = text.find("second post").unwrap();
        assert!(first < second);
        assert!(!text.contains(LOADING_MESSAGE));
    }

    #[test]
    fn loading_row_shown_while_page_outstanding() {
        let mut app = app_with(Some(vec![post("1", "only")]), Some("c1"), false);
        app.select_next();
        assert!(app.feed.is_paginating());

        let text = render(&mut app);
        assert!(text.contains(LOADING_MESSAGE));
    }

    #[test]
    fn spinner_shown_while_refreshing() {
        let mut app = app_with(Some(vec![post("1", "only")]), None, false);
        app.refresh();
        let text = render(&mut app);
        assert!(text.contains("refreshing"));
        assert!(text.contains("only"), "old items stay visible, dimmed");
    }

    #[test]
    fn refresh_to_empty_page_shows_empty_message() {
        let mut app = app_with(Some(vec![post("1", "old")]), None, false);
        app.refresh();
        let request = app.take_requests().remove(0);
        app.handle_outcome(FetchOutcome {
            request,
            result: Ok(Page::default()),
        });

        let text = render(&mut app);
        assert!(text.contains(EMPTY_MESSAGE));
        assert!(!text.contains("old"));
        assert!(!text.contains("refreshing"));
    }

    #[test]
    fn error_line_shown_after_failure() {
        let mut app = app_with(Some(vec![post("1", "kept")]), None, false);
        app.refresh();
        let request = app.take_requests().remove(0);
        app.handle_outcome(FetchOutcome {
            request,
            result: Err(FetchError::Status { status: 500 }),
        });

        let text = render(&mut app);
        assert!(text.contains("feed server returned HTTP 500"));
        assert!(text.contains("kept"));
        assert!(!text.contains("refreshing"));
    }

    #[test]
    fn search_prompt_replaces_status_bar() {
        let mut app = app_with(Some(vec![]), None, false);
        app.begin_search();
        app.search_push('x');
        let text = render(&mut app);
        assert!(text.contains("search: x"));
        assert!(!text.contains("q: quit"));
    }
}
