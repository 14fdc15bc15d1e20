pub mod widgets;

use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

/// Draw the whole dashboard: status bar, tweet table, log panel, key hints,
/// plus whichever modal (start form, detail, alert) is open. The alert is
/// drawn last so it blocks everything underneath.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(12),
            Constraint::Length(1),
        ])
        .split(frame.area());

    widgets::status_bar::render(frame, chunks[0], app);
    widgets::tweet_table::render(frame, chunks[1], app);
    widgets::log_panel::render(frame, chunks[2], app);
    widgets::status_bar::render_hints(frame, chunks[3]);

    let area = frame.area();
    if let Some(form) = &app.form {
        widgets::modals::render_start_form(frame, area, form);
    }
    if let Some(tweet) = &app.detail {
        widgets::modals::render_detail(frame, area, tweet);
    }
    if let Some(message) = &app.alert {
        widgets::modals::render_alert(frame, area, message);
    }
}
