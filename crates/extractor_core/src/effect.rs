use std::time::Duration;

use crate::{RequestId, TimerKind};

/// Side effects requested by `update`; executed by the host runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start (or restart) the timer slot `kind`; on expiry deliver
    /// `Msg::TimerFired { kind, generation }`.
    ArmTimer {
        kind: TimerKind,
        generation: u64,
        delay: Duration,
    },
    CancelTimer { kind: TimerKind },
    /// Speculative page fetch; answered by `Msg::ScrapeCompleted`.
    Scrape { request: RequestId, url: String },
    /// Extraction call; answered by `Msg::ExtractCompleted`.
    Extract {
        request: RequestId,
        url: String,
        schema: String,
        preloaded: Option<serde_json::Value>,
    },
    /// Preview image; answered by `Msg::ScreenshotCompleted`.
    Screenshot { request: RequestId, url: String },
    /// Natural-language schema generation; answered by `Msg::SchemaGenerated`.
    GenerateSchema { request: RequestId, query: String },
}
