use chrono::{Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One scraped tweet as served by `GET /data`. Every field is optional on
/// the wire; missing text fields default to empty so a partial record still
/// renders as a row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TweetRecord {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl TweetRecord {
    /// The link cell is only rendered for a non-empty URL.
    pub fn link(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }
}

/// Full result set from a single poll. Replaces (never merges with) the
/// previously held snapshot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tweets: Vec<TweetRecord>,
    /// The backend also reports its own count; the UI counter uses
    /// `tweets.len()` and merely tolerates this field.
    #[serde(default)]
    pub count: Option<u64>,
}

/// A line on the log panel, either pushed by the backend over the SSE
/// channel or synthesized locally when the user triggers an action.
#[derive(Debug, Clone, Deserialize)]
pub struct LogEvent {
    /// Epoch seconds, fractional (the backend emits `time.time()` floats).
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub msg: String,
}

impl LogEvent {
    /// Synthesize a local entry stamped with the current time.
    pub fn now(level: &str, msg: impl Into<String>) -> Self {
        Self {
            time: Utc::now().timestamp_millis() as f64 / 1000.0,
            level: level.to_string(),
            msg: msg.into(),
        }
    }

    /// Render as `[localized-time] LEVEL — message`.
    pub fn formatted(&self) -> String {
        let secs = self.time as i64;
        let nanos = ((self.time - secs as f64) * 1e9) as u32;
        let clock = match Local.timestamp_opt(secs, nanos) {
            chrono::LocalResult::Single(dt) => dt.format("%H:%M:%S").to_string(),
            _ => String::from("--:--:--"),
        };
        format!("[{}] {} — {}", clock, self.level, self.msg)
    }
}

/// Body of `POST /start`. `cookies: None` serializes as JSON `null`.
#[derive(Debug, Clone, Serialize)]
pub struct StartRequest {
    pub keyword: String,
    pub max_tweets: u64,
    pub cookies: Option<serde_json::Value>,
}

/// Response envelope shared by `/start` and `/stop`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl CommandResponse {
    pub fn ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Free-text status label shown in the status bar. Overwritten on each
/// relevant event; no history kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Idle,
    Starting,
    Running,
    Stopped,
    Error,
}

impl JobStatus {
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Idle => "Idle",
            JobStatus::Starting => "Starting...",
            JobStatus::Running => "Running",
            JobStatus::Stopped => "Stopped",
            JobStatus::Error => "Error",
        }
    }
}
