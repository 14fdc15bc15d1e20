//! Log stream subscriber.
//!
//! Opens one Server-Sent-Events connection to the backend's `/stream`
//! endpoint and forwards decoded log events to the UI channel. Keep-alive
//! comments and malformed payloads are dropped without surfacing anything;
//! a broken connection simply ends the reader task.

use crate::model::LogEvent;
use futures::StreamExt;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Incremental SSE frame decoder. Events are blocks separated by a blank
/// line; only `data:` lines carry payloads. Lines starting with `:` are
/// comments (the backend's keep-alive is a bare `:`).
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a raw chunk, returning the data payloads of every event that is
    /// now complete. Partial events stay buffered for the next chunk.
    pub fn feed(&mut self, chunk: &str) -> Vec<String> {
        self.buffer.push_str(&chunk.replace("\r\n", "\n"));

        let mut payloads = Vec::new();
        while let Some(split) = self.buffer.find("\n\n") {
            let block: String = self.buffer.drain(..split + 2).collect();
            for line in block.lines() {
                if line.is_empty() || line.starts_with(':') {
                    continue;
                }
                if let Some(data) = line.strip_prefix("data:") {
                    let data = data.strip_prefix(' ').unwrap_or(data);
                    if !data.is_empty() {
                        payloads.push(data.to_string());
                    }
                }
            }
        }
        payloads
    }
}

/// Parse one SSE data payload into a log event. Malformed payloads yield
/// `None` and are dropped by the caller.
pub fn decode_payload(payload: &str) -> Option<LogEvent> {
    match serde_json::from_str::<LogEvent>(payload) {
        Ok(event) => Some(event),
        Err(err) => {
            tracing::debug!(%err, "dropping malformed log payload");
            None
        }
    }
}

/// Owns the live log subscription. At most one connection is active at a
/// time: re-subscribing closes the previous reader first.
pub struct LogStream {
    stream_url: String,
    client: reqwest::Client,
    handle: Option<JoinHandle<()>>,
}

impl LogStream {
    pub fn new(base_url: &str) -> Self {
        Self {
            stream_url: format!("{}/stream", base_url.trim_end_matches('/')),
            client: reqwest::Client::new(),
            handle: None,
        }
    }

    /// Open the push connection, replacing any existing one, and forward
    /// decoded events to `tx` until the connection or the receiver closes.
    pub fn subscribe(&mut self, tx: UnboundedSender<LogEvent>) {
        self.close();

        let url = self.stream_url.clone();
        let client = self.client.clone();
        self.handle = Some(tokio::spawn(async move {
            let response = match client.get(&url).send().await {
                Ok(response) => response,
                Err(err) => {
                    tracing::warn!(%err, url, "log stream connection failed");
                    return;
                }
            };

            let mut body = response.bytes_stream();
            let mut decoder = SseDecoder::new();
            while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(err) => {
                        tracing::warn!(%err, "log stream interrupted");
                        return;
                    }
                };
                for payload in decoder.feed(&String::from_utf8_lossy(&chunk)) {
                    if let Some(event) = decode_payload(&payload) {
                        if tx.send(event).is_err() {
                            return;
                        }
                    }
                }
            }
            tracing::debug!("log stream ended");
        }));
    }

    /// Abort the reader task, if any.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for LogStream {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_single_event() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.feed("data: {\"time\":1.0,\"level\":\"INFO\",\"msg\":\"hi\"}\n\n");
        assert_eq!(payloads.len(), 1);
        assert!(payloads[0].contains("\"msg\":\"hi\""));
    }

    #[test]
    fn test_decoder_keepalive_produces_nothing() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(":\n\n").is_empty());
        assert!(decoder.feed(": ping\n\n").is_empty());
    }

    #[test]
    fn test_decoder_buffers_partial_events() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed("data: {\"msg\":").is_empty());
        let payloads = decoder.feed("\"split\"}\n\n");
        assert_eq!(payloads, vec!["{\"msg\":\"split\"}".to_string()]);
    }

    #[test]
    fn test_decoder_multiple_events_per_chunk() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.feed("data: one\n\n:\n\ndata: two\n\n");
        assert_eq!(payloads, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_decoder_crlf_frames() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.feed("data: crlf\r\n\r\n");
        assert_eq!(payloads, vec!["crlf".to_string()]);
    }

    #[test]
    fn test_decoder_empty_data_dropped() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed("data:\n\n").is_empty());
    }

    #[test]
    fn test_decode_payload_malformed_is_none() {
        assert!(decode_payload("not-json").is_none());
        assert!(decode_payload("").is_none());
    }

    #[test]
    fn test_decode_payload_valid() {
        let event = decode_payload(r#"{"time": 1700000000.0, "level": "OK", "msg": "done"}"#)
            .expect("valid payload");
        assert_eq!(event.level, "OK");
        assert_eq!(event.msg, "done");
    }

    #[tokio::test]
    async fn test_subscribe_replaces_previous_connection() {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let mut stream = LogStream::new("http://127.0.0.1:1");
        stream.subscribe(tx.clone());
        assert!(stream.handle.is_some());
        // Re-subscribing closes the old reader and installs a fresh one.
        stream.subscribe(tx);
        assert!(stream.handle.is_some());
        stream.close();
        assert!(stream.handle.is_none());
    }
}
