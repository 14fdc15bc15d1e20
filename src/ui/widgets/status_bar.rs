use crate::app::App;
use crate::model::JobStatus;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn status_color(status: JobStatus) -> Color {
    match status {
        JobStatus::Idle => Color::Gray,
        JobStatus::Starting => Color::Yellow,
        JobStatus::Running => Color::Green,
        JobStatus::Stopped => Color::DarkGray,
        JobStatus::Error => Color::Red,
    }
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::raw("Status: "),
        Span::styled(
            app.status.label(),
            Style::default()
                .fg(status_color(app.status))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   Tweets: "),
        Span::styled(
            app.tweet_count.to_string(),
            Style::default().fg(Color::Cyan),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Scraper Dashboard "),
    );
    frame.render_widget(paragraph, area);
}

pub fn render_hints(frame: &mut Frame, area: Rect) {
    let hints = Paragraph::new(Line::from(Span::styled(
        " q quit | s start | x stop | c csv | j json | w report | r reconnect logs | Up/Down select | Enter detail",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(hints, area);
}
