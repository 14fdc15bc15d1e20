use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn level_color(level: &str) -> Color {
    match level {
        "OK" => Color::Green,
        "ERROR" => Color::Red,
        "WARNING" | "WARN" => Color::Yellow,
        "INFO" => Color::Cyan,
        _ => Color::White,
    }
}

/// Visible scroll offset: stick to the bottom while following, otherwise the
/// user-driven position clamped to the last full page.
pub fn scroll_offset(total: usize, height: usize, follow: bool, requested: usize) -> usize {
    let max_offset = total.saturating_sub(height);
    if follow {
        max_offset
    } else {
        requested.min(max_offset)
    }
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Logs ");
    let inner_height = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = app
        .log
        .iter()
        .map(|event| {
            Line::from(Span::styled(
                event.formatted(),
                Style::default().fg(level_color(&event.level)),
            ))
        })
        .collect();

    let offset = scroll_offset(lines.len(), inner_height, app.log_follow, app.log_scroll)
        .min(u16::MAX as usize);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((offset as u16, 0));
    frame.render_widget(paragraph, area);
}
