use super::center_rect;
use crate::app::{FormField, StartForm};
use crate::model::TweetRecord;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!("{label:>14}: "), Style::default().fg(Color::Cyan)),
        Span::styled(format!("{value}{cursor}"), style),
    ])
}

pub fn render_start_form(frame: &mut Frame, area: Rect, form: &StartForm) {
    let modal_area = center_rect(60, 40, area);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Start Scraper ");

    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let text = vec![
        Line::from(""),
        field_line("Keyword", &form.keyword, form.focus == FormField::Keyword),
        field_line(
            "Max tweets",
            &form.max_tweets,
            form.focus == FormField::MaxTweets,
        ),
        field_line("Cookies JSON", &form.cookies, form.focus == FormField::Cookies),
        Line::from(""),
        Line::from(Span::styled(
            "Blank max tweets defaults to 50; cookies are optional",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Tab next field | Enter start | Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
}

pub fn render_alert(frame: &mut Frame, area: Rect, message: &str) {
    let modal_area = center_rect(50, 20, area);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Alert ");

    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
}

pub fn render_detail(frame: &mut Frame, area: Rect, tweet: &TweetRecord) {
    let modal_area = center_rect(70, 60, area);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Tweet Detail ");

    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let width = inner.width.saturating_sub(2).max(20) as usize;
    let mut text = vec![
        Line::from(vec![
            Span::styled(
                tweet.username.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(tweet.handle.clone(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(Span::styled(
            tweet.timestamp.clone(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    for wrapped in textwrap::wrap(&tweet.text, width) {
        text.push(Line::from(wrapped.into_owned()));
    }
    if let Some(url) = tweet.link() {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            url.to_string(),
            Style::default().fg(Color::Blue),
        )));
    }
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Esc to close",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
}
