use std::fmt;

use serde::{Deserialize, Serialize};

pub type RequestId = u64;

/// Timer slots the engine keeps one live timer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerSlot {
    Preload,
    Preview,
    Notification,
}

/// Payload of `POST /api/scrape`.
///
/// Fields the client does not interpret are kept in `extra`, so the page
/// can be handed back to `/api/extract` in exactly the shape it arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedPage {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub error: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ScrapeCompleted {
        request: RequestId,
        result: Result<ScrapedPage, BackendError>,
        fetched_utc: String,
    },
    ExtractCompleted {
        request: RequestId,
        result: Result<serde_json::Value, BackendError>,
    },
    ScreenshotCompleted {
        request: RequestId,
        result: Result<String, BackendError>,
    },
    SchemaGenerated {
        request: RequestId,
        result: Result<String, BackendError>,
    },
    TimerFired { slot: TimerSlot, generation: u64 },
}

/// A failed backend call. `message` is what the user gets to see.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
}

impl BackendError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// Response arrived but was not the expected JSON shape.
    Decode,
    /// Backend answered 2xx but reported the operation as unsuccessful.
    Rejected,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Rejected => write!(f, "rejected by backend"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
