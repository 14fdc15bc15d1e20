use crate::app::App;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

/// Render the bounded tweet table: the most recent 200 records of the
/// snapshot, oldest first, 1-indexed. The title counter shows the full
/// snapshot size, not the truncated render count.
pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Tweets ({}) ", app.tweet_count));

    let header = Row::new(vec!["#", "User", "Handle", "Text", "Time", "URL"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .visible_rows()
        .iter()
        .enumerate()
        .map(|(i, tweet)| {
            let link = match tweet.link() {
                Some(_) => Cell::from("link").style(Style::default().fg(Color::Blue)),
                None => Cell::from(""),
            };
            Row::new(vec![
                Cell::from((i + 1).to_string()).style(Style::default().fg(Color::DarkGray)),
                Cell::from(tweet.username.clone()),
                Cell::from(tweet.handle.clone()).style(Style::default().fg(Color::Cyan)),
                Cell::from(tweet.text.clone()),
                Cell::from(tweet.timestamp.clone()).style(Style::default().fg(Color::DarkGray)),
                link,
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Min(20),
            Constraint::Length(20),
            Constraint::Length(5),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_stateful_widget(table, area, &mut app.table_state);
}
