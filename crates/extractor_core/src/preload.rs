//! Speculative page preload.
//!
//! A URL commit (the input losing focus) arms a debounce timer. When it
//! expires the coordinator fetches the page once, unless the URL is empty, a
//! fetch is already running, or the URL is already cached. The single cache
//! slot is read by the submit path; a failed preload only empties it.
use std::time::Duration;

use extractor_logging::{extractor_debug, extractor_info, extractor_warn};

use crate::state::RequestIds;
use crate::{DebounceTimer, Effect, RequestId, TimerKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreloadPhase {
    #[default]
    Idle,
    Pending,
    Fetching,
    Cached,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreloadEntry {
    /// URL the fetch was issued for, as typed by the user.
    pub url: String,
    /// Scrape payload, passed back to the extract call unchanged.
    pub content: serde_json::Value,
    pub fetched_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    request: RequestId,
    url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreloadCoordinator {
    phase: PreloadPhase,
    timer: DebounceTimer,
    in_flight: Option<InFlight>,
    entry: Option<PreloadEntry>,
}

impl PreloadCoordinator {
    pub fn new(debounce: Duration) -> Self {
        Self {
            phase: PreloadPhase::Idle,
            timer: DebounceTimer::new(TimerKind::Preload, debounce),
            in_flight: None,
            entry: None,
        }
    }

    pub fn phase(&self) -> PreloadPhase {
        self.phase
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn entry(&self) -> Option<&PreloadEntry> {
        self.entry.as_ref()
    }

    /// Cache read for the submit path: the entry, if it was fetched for `url`.
    pub fn lookup(&self, url: &str) -> Option<&PreloadEntry> {
        self.entry.as_ref().filter(|entry| entry.url == url)
    }

    /// URL field committed. Always re-arms the debounce.
    pub(crate) fn commit(&mut self) -> Effect {
        if !self.is_fetching() {
            self.phase = PreloadPhase::Pending;
        }
        self.timer.arm()
    }

    /// Debounce expiry. `url` is the URL field value at fire time.
    pub(crate) fn timer_fired(
        &mut self,
        generation: u64,
        url: &str,
        ids: &mut RequestIds,
    ) -> Option<Effect> {
        if !self.timer.fire(generation) {
            return None;
        }

        if let Some(flight) = &self.in_flight {
            extractor_debug!(
                "Preload skipped: request {} for {} still in flight",
                flight.request,
                flight.url
            );
            return None;
        }
        if url.is_empty() {
            extractor_debug!("Preload skipped: empty url");
            self.settle();
            return None;
        }
        if self.lookup(url).is_some() {
            extractor_debug!("Preload skipped: {} already cached", url);
            self.settle();
            return None;
        }

        let request = ids.issue();
        extractor_info!("Preload request={} url={}", request, url);
        self.entry = None;
        self.in_flight = Some(InFlight {
            request,
            url: url.to_string(),
        });
        self.phase = PreloadPhase::Fetching;
        Some(Effect::Scrape {
            request,
            url: url.to_string(),
        })
    }

    /// Applies a scrape response. Returns `false` when it was not ours.
    pub(crate) fn scrape_completed(
        &mut self,
        request: RequestId,
        result: Result<serde_json::Value, String>,
        fetched_at: String,
    ) -> bool {
        let flight = match self.in_flight.take() {
            Some(flight) if flight.request == request => flight,
            other => {
                self.in_flight = other;
                extractor_debug!("Ignoring unknown scrape response {}", request);
                return false;
            }
        };

        match result {
            Ok(content) => {
                extractor_info!("Preloaded {} at {}", flight.url, fetched_at);
                self.entry = Some(PreloadEntry {
                    url: flight.url,
                    content,
                    fetched_at,
                });
                self.phase = PreloadPhase::Cached;
            }
            Err(reason) => {
                // Submit falls back to a server-side fetch; nothing to surface.
                extractor_warn!("Preload of {} failed: {}", flight.url, reason);
                self.entry = None;
                self.phase = PreloadPhase::Failed;
            }
        }
        if self.timer.is_armed() {
            self.phase = PreloadPhase::Pending;
        }
        true
    }

    fn settle(&mut self) {
        self.phase = if self.in_flight.is_some() {
            PreloadPhase::Fetching
        } else if self.entry.is_some() {
            PreloadPhase::Cached
        } else {
            PreloadPhase::Idle
        };
    }
}
