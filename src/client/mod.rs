pub mod stream;

use crate::model::{CommandResponse, Snapshot, StartRequest};
use anyhow::Result;
use async_trait::async_trait;

/// Export formats served by the backend's download endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Seam between the dashboard and the scraper backend, so the app state can
/// be exercised without a live server.
#[async_trait]
pub trait ScrapeBackend: Send + Sync {
    /// `GET /data` — the full current result set.
    async fn fetch_snapshot(&self) -> Result<Snapshot>;
    /// `POST /start` — kick off a scrape job.
    async fn start(&self, request: &StartRequest) -> Result<CommandResponse>;
    /// `POST /stop` — request the running job to stop.
    async fn stop(&self) -> Result<CommandResponse>;
    /// Fixed download endpoint handed to the system browser.
    fn export_url(&self, format: ExportFormat) -> String;
}

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        // No request timeout: in-flight fetches are left to resolve or
        // reject on their own.
        let client = reqwest::Client::builder()
            .user_agent("scrapetui/0.1")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ScrapeBackend for HttpBackend {
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let snapshot = self
            .client
            .get(self.url("/data"))
            .send()
            .await?
            .json::<Snapshot>()
            .await?;
        Ok(snapshot)
    }

    async fn start(&self, request: &StartRequest) -> Result<CommandResponse> {
        // The backend reports command errors as a JSON body with a non-2xx
        // code; only the body's status field matters here.
        let response = self
            .client
            .post(self.url("/start"))
            .json(request)
            .send()
            .await?
            .json::<CommandResponse>()
            .await?;
        Ok(response)
    }

    async fn stop(&self) -> Result<CommandResponse> {
        let response = self
            .client
            .post(self.url("/stop"))
            .send()
            .await?
            .json::<CommandResponse>()
            .await?;
        Ok(response)
    }

    fn export_url(&self, format: ExportFormat) -> String {
        self.url(&format!("/download/{}", format.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_urls() {
        let backend = HttpBackend::new("http://127.0.0.1:8000/");
        assert_eq!(
            backend.export_url(ExportFormat::Csv),
            "http://127.0.0.1:8000/download/csv"
        );
        assert_eq!(
            backend.export_url(ExportFormat::Json),
            "http://127.0.0.1:8000/download/json"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let backend = HttpBackend::new("http://localhost:9999///");
        assert_eq!(backend.url("/data"), "http://localhost:9999/data");
    }
}
