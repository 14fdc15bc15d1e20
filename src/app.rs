//! Dashboard state and command dispatch.
//!
//! `App` owns every piece of mutable UI state and is only ever touched from
//! the main event loop. Key handling returns an [`Action`] for the loop to
//! execute, so the whole state machine runs in tests without a terminal or
//! a live backend.

use crate::client::ExportFormat;
use crate::model::{CommandResponse, JobStatus, LogEvent, Snapshot, StartRequest, TweetRecord};
use crate::report::TABLE_ROW_CAP;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::TableState;

/// Everything the event loop can feed into the app besides key presses.
#[derive(Debug)]
pub enum AppEvent {
    /// A successful data poll; replaces the held snapshot wholesale.
    Snapshot(Snapshot),
    /// One log line, from the stream or synthesized locally.
    Log(LogEvent),
    /// Outcome of a dispatched start/stop command.
    Command(CommandOutcome),
}

#[derive(Debug)]
pub enum CommandOutcome {
    Started(CommandResponse),
    Stopped(CommandResponse),
}

/// Side effects requested by key handling, executed by the main loop.
#[derive(Debug)]
pub enum Action {
    Quit,
    SubmitStart(StartRequest),
    SubmitStop,
    Download(ExportFormat),
    SaveReport,
    ResubscribeLogs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Keyword,
    MaxTweets,
    Cookies,
}

impl Default for FormField {
    fn default() -> Self {
        FormField::Keyword
    }
}

/// Input state of the start modal.
#[derive(Debug, Default, Clone)]
pub struct StartForm {
    pub keyword: String,
    pub max_tweets: String,
    pub cookies: String,
    pub focus: FormField,
}

impl StartForm {
    fn new() -> Self {
        Self::default()
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Keyword => &mut self.keyword,
            FormField::MaxTweets => &mut self.max_tweets,
            FormField::Cookies => &mut self.cookies,
        }
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            FormField::Keyword => FormField::MaxTweets,
            FormField::MaxTweets => FormField::Cookies,
            FormField::Cookies => FormField::Keyword,
        };
    }
}

/// Validate the start form into a request body. Blank max tweets falls back
/// to the configured default; anything unparsable, and invalid cookies JSON,
/// aborts with a user-facing message before any request is sent.
pub fn build_start_request(form: &StartForm, default_max: u64) -> Result<StartRequest, String> {
    let keyword = form.keyword.trim().to_string();

    let max_text = form.max_tweets.trim();
    let max_tweets = if max_text.is_empty() {
        default_max
    } else {
        max_text
            .parse::<u64>()
            .map_err(|_| "Invalid max tweets value".to_string())?
    };

    let cookies_text = form.cookies.trim();
    let cookies = if cookies_text.is_empty() {
        None
    } else {
        Some(
            serde_json::from_str::<serde_json::Value>(cookies_text)
                .map_err(|_| "Invalid cookies JSON".to_string())?,
        )
    };

    Ok(StartRequest {
        keyword,
        max_tweets,
        cookies,
    })
}

pub struct App {
    pub status: JobStatus,
    pub tweets: Vec<TweetRecord>,
    /// Full snapshot size, never the truncated render count.
    pub tweet_count: usize,
    /// Append-only; the panel only grows for the lifetime of the view.
    pub log: Vec<LogEvent>,
    pub log_scroll: usize,
    pub log_follow: bool,
    pub table_state: TableState,
    pub form: Option<StartForm>,
    pub alert: Option<String>,
    pub detail: Option<TweetRecord>,
    default_max_tweets: u64,
}

impl App {
    pub fn new(default_max_tweets: u64) -> Self {
        Self {
            status: JobStatus::Idle,
            tweets: Vec::new(),
            tweet_count: 0,
            log: Vec::new(),
            log_scroll: 0,
            log_follow: true,
            table_state: TableState::default(),
            form: None,
            alert: None,
            detail: None,
            default_max_tweets,
        }
    }

    /// The slice the table actually renders: the most recent
    /// [`TABLE_ROW_CAP`] records, oldest first within that window.
    pub fn visible_rows(&self) -> &[TweetRecord] {
        let skip = self.tweets.len().saturating_sub(TABLE_ROW_CAP);
        &self.tweets[skip..]
    }

    pub fn push_log(&mut self, event: LogEvent) {
        self.log.push(event);
    }

    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Snapshot(snapshot) => {
                self.tweet_count = snapshot.tweets.len();
                self.tweets = snapshot.tweets;
                let visible = self.visible_rows().len();
                if let Some(selected) = self.table_state.selected() {
                    if visible == 0 {
                        self.table_state.select(None);
                    } else if selected >= visible {
                        self.table_state.select(Some(visible - 1));
                    }
                }
            }
            AppEvent::Log(event) => self.push_log(event),
            AppEvent::Command(outcome) => self.apply_command(outcome),
        }
    }

    fn apply_command(&mut self, outcome: CommandOutcome) {
        match outcome {
            CommandOutcome::Started(response) => {
                if response.ok() {
                    self.status = JobStatus::Running;
                    self.push_log(LogEvent::now("OK", response.message));
                } else {
                    self.status = JobStatus::Error;
                    self.push_log(LogEvent::now("ERROR", response.message));
                }
            }
            CommandOutcome::Stopped(response) => {
                let level = if response.ok() { "OK" } else { "ERROR" };
                self.push_log(LogEvent::now(level, response.message));
                // Always Stopped once a response arrives, even an error one.
                self.status = JobStatus::Stopped;
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        // A blocking alert swallows the next key press.
        if self.alert.is_some() {
            self.alert = None;
            return None;
        }
        if self.detail.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.detail = None;
            }
            return None;
        }
        if self.form.is_some() {
            return self.handle_form_key(key);
        }
        self.handle_normal_key(key)
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.form = None;
                None
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                if let Some(form) = self.form.as_mut() {
                    form.focus_next();
                }
                None
            }
            KeyCode::Backspace => {
                if let Some(form) = self.form.as_mut() {
                    form.field_mut().pop();
                }
                None
            }
            KeyCode::Char(c) => {
                if let Some(form) = self.form.as_mut() {
                    form.field_mut().push(c);
                }
                None
            }
            KeyCode::Enter => self.submit_start_form(),
            _ => None,
        }
    }

    fn submit_start_form(&mut self) -> Option<Action> {
        let form = self.form.as_ref()?;
        match build_start_request(form, self.default_max_tweets) {
            Ok(request) => {
                self.form = None;
                self.status = JobStatus::Starting;
                self.push_log(LogEvent::now(
                    "INFO",
                    format!(
                        "Requesting start for '{}' max {}",
                        request.keyword, request.max_tweets
                    ),
                ));
                Some(Action::SubmitStart(request))
            }
            Err(message) => {
                // Abort before any request goes out; the form stays open.
                self.alert = Some(message);
                None
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('s') => {
                self.form = Some(StartForm::new());
                None
            }
            KeyCode::Char('x') => {
                self.push_log(LogEvent::now("INFO", "Stop requested by user"));
                Some(Action::SubmitStop)
            }
            KeyCode::Char('c') => Some(Action::Download(ExportFormat::Csv)),
            KeyCode::Char('j') => Some(Action::Download(ExportFormat::Json)),
            KeyCode::Char('w') => Some(Action::SaveReport),
            KeyCode::Char('r') => Some(Action::ResubscribeLogs),
            KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Enter => {
                if let Some(selected) = self.table_state.selected() {
                    self.detail = self.visible_rows().get(selected).cloned();
                }
                None
            }
            KeyCode::PageUp => {
                self.log_follow = false;
                self.log_scroll = self.log_scroll.saturating_sub(5);
                None
            }
            KeyCode::PageDown => {
                self.log_scroll += 5;
                if self.log_scroll >= self.log.len() {
                    self.log_follow = true;
                }
                None
            }
            KeyCode::End => {
                self.log_follow = true;
                None
            }
            _ => None,
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let visible = self.visible_rows().len();
        if visible == 0 {
            self.table_state.select(None);
            return;
        }
        let next = match self.table_state.selected() {
            Some(current) => (current as isize + delta).clamp(0, visible as isize - 1) as usize,
            None => 0,
        };
        self.table_state.select(Some(next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn snapshot_of(n: usize) -> Snapshot {
        Snapshot {
            tweets: (0..n)
                .map(|i| TweetRecord {
                    username: format!("user{i}"),
                    ..TweetRecord::default()
                })
                .collect(),
            count: None,
        }
    }

    fn response(status: &str, message: &str) -> CommandResponse {
        CommandResponse {
            status: status.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_snapshot_over_cap_renders_200_counts_all() {
        let mut app = App::new(50);
        app.apply_event(AppEvent::Snapshot(snapshot_of(350)));
        assert_eq!(app.visible_rows().len(), 200);
        assert_eq!(app.tweet_count, 350);
        // Most recent window, oldest first.
        assert_eq!(app.visible_rows()[0].username, "user150");
        assert_eq!(app.visible_rows()[199].username, "user349");
    }

    #[test]
    fn test_snapshot_under_cap_renders_all() {
        let mut app = App::new(50);
        app.apply_event(AppEvent::Snapshot(snapshot_of(7)));
        assert_eq!(app.visible_rows().len(), 7);
        assert_eq!(app.tweet_count, 7);
    }

    #[test]
    fn test_snapshot_replaces_previous() {
        let mut app = App::new(50);
        app.apply_event(AppEvent::Snapshot(snapshot_of(10)));
        app.apply_event(AppEvent::Snapshot(snapshot_of(4)));
        assert_eq!(app.tweet_count, 4);
        assert_eq!(app.visible_rows().len(), 4);
    }

    #[test]
    fn test_shrinking_snapshot_clamps_selection() {
        let mut app = App::new(50);
        app.apply_event(AppEvent::Snapshot(snapshot_of(10)));
        app.table_state.select(Some(9));
        app.apply_event(AppEvent::Snapshot(snapshot_of(3)));
        assert_eq!(app.table_state.selected(), Some(2));
        app.apply_event(AppEvent::Snapshot(snapshot_of(0)));
        assert_eq!(app.table_state.selected(), None);
    }

    #[test]
    fn test_blank_max_tweets_defaults() {
        let form = StartForm {
            keyword: "foo".to_string(),
            max_tweets: String::new(),
            cookies: String::new(),
            focus: FormField::Keyword,
        };
        let request = build_start_request(&form, 50).unwrap();
        assert_eq!(request.keyword, "foo");
        assert_eq!(request.max_tweets, 50);
        assert!(request.cookies.is_none());
    }

    #[test]
    fn test_non_numeric_max_tweets_rejected() {
        let form = StartForm {
            max_tweets: "lots".to_string(),
            ..StartForm::new()
        };
        assert_eq!(
            build_start_request(&form, 50).unwrap_err(),
            "Invalid max tweets value"
        );
    }

    #[test]
    fn test_cookies_parsed_as_json() {
        let form = StartForm {
            keyword: "rust".to_string(),
            cookies: r#"{"auth_token": "abc"}"#.to_string(),
            ..StartForm::new()
        };
        let request = build_start_request(&form, 50).unwrap();
        assert_eq!(request.cookies.unwrap()["auth_token"], "abc");
    }

    #[test]
    fn test_invalid_cookies_alerts_and_sends_nothing() {
        let mut app = App::new(50);
        app.form = Some(StartForm {
            keyword: "foo".to_string(),
            cookies: "not-json".to_string(),
            ..StartForm::new()
        });
        let action = app.handle_key(key(KeyCode::Enter));
        assert!(action.is_none(), "no request may be dispatched");
        assert_eq!(app.alert.as_deref(), Some("Invalid cookies JSON"));
        assert!(app.form.is_some(), "form stays open behind the alert");
        assert_eq!(app.status, JobStatus::Idle);
    }

    #[test]
    fn test_submit_sets_starting_and_logs() {
        let mut app = App::new(50);
        app.form = Some(StartForm {
            keyword: "rustlang".to_string(),
            max_tweets: "25".to_string(),
            ..StartForm::new()
        });
        let action = app.handle_key(key(KeyCode::Enter));
        match action {
            Some(Action::SubmitStart(request)) => {
                assert_eq!(request.keyword, "rustlang");
                assert_eq!(request.max_tweets, 25);
            }
            other => panic!("expected SubmitStart, got {other:?}"),
        }
        assert_eq!(app.status, JobStatus::Starting);
        assert!(app.form.is_none());
        let last = app.log.last().unwrap();
        assert_eq!(last.level, "INFO");
        assert_eq!(last.msg, "Requesting start for 'rustlang' max 25");
    }

    #[test]
    fn test_start_response_ok_runs() {
        let mut app = App::new(50);
        app.status = JobStatus::Starting;
        app.apply_event(AppEvent::Command(CommandOutcome::Started(response(
            "ok",
            "Scraper started",
        ))));
        assert_eq!(app.status, JobStatus::Running);
        let last = app.log.last().unwrap();
        assert_eq!(last.level, "OK");
        assert_eq!(last.msg, "Scraper started");
    }

    #[test]
    fn test_start_response_error() {
        let mut app = App::new(50);
        app.status = JobStatus::Starting;
        app.apply_event(AppEvent::Command(CommandOutcome::Started(response(
            "error",
            "Scraper already running",
        ))));
        assert_eq!(app.status, JobStatus::Error);
        assert_eq!(app.log.last().unwrap().level, "ERROR");
    }

    #[test]
    fn test_stop_error_response_still_stops() {
        let mut app = App::new(50);
        app.status = JobStatus::Running;
        app.apply_event(AppEvent::Command(CommandOutcome::Stopped(response(
            "error",
            "No scraper running",
        ))));
        assert_eq!(app.status, JobStatus::Stopped);
        assert_eq!(app.log.last().unwrap().level, "ERROR");
    }

    #[test]
    fn test_stop_key_logs_and_dispatches() {
        let mut app = App::new(50);
        let action = app.handle_key(key(KeyCode::Char('x')));
        assert!(matches!(action, Some(Action::SubmitStop)));
        let last = app.log.last().unwrap();
        assert_eq!(last.level, "INFO");
        assert_eq!(last.msg, "Stop requested by user");
    }

    #[test]
    fn test_download_keys() {
        let mut app = App::new(50);
        assert!(matches!(
            app.handle_key(key(KeyCode::Char('c'))),
            Some(Action::Download(ExportFormat::Csv))
        ));
        assert!(matches!(
            app.handle_key(key(KeyCode::Char('j'))),
            Some(Action::Download(ExportFormat::Json))
        ));
    }

    #[test]
    fn test_alert_swallows_next_key() {
        let mut app = App::new(50);
        app.alert = Some("Invalid cookies JSON".to_string());
        assert!(app.handle_key(key(KeyCode::Char('q'))).is_none());
        assert!(app.alert.is_none());
        // Next key acts normally again.
        assert!(matches!(
            app.handle_key(key(KeyCode::Char('q'))),
            Some(Action::Quit)
        ));
    }

    #[test]
    fn test_form_editing() {
        let mut app = App::new(50);
        app.handle_key(key(KeyCode::Char('s')));
        assert!(app.form.is_some());
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Char('b')));
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('9')));
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.keyword, "a");
        assert_eq!(form.max_tweets, "9");
        app.handle_key(key(KeyCode::Esc));
        assert!(app.form.is_none());
    }

    #[test]
    fn test_log_only_grows() {
        let mut app = App::new(50);
        for i in 0..5 {
            app.apply_event(AppEvent::Log(LogEvent::now("INFO", format!("line {i}"))));
        }
        assert_eq!(app.log.len(), 5);
        app.apply_event(AppEvent::Snapshot(snapshot_of(3)));
        assert_eq!(app.log.len(), 5, "polling never touches the log panel");
    }

    #[test]
    fn test_detail_opens_for_selected_row() {
        let mut app = App::new(50);
        app.apply_event(AppEvent::Snapshot(snapshot_of(3)));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.detail.as_ref().unwrap().username, "user0");
        app.handle_key(key(KeyCode::Esc));
        assert!(app.detail.is_none());
    }
}
