//! Debounced page preview.
//!
//! Every URL edit re-arms the timer, so typing never triggers a screenshot
//! mid-word. Each screenshot request is tagged with an id and with the URL it
//! was issued for; anything but the latest response for the current URL is
//! dropped.
use std::time::Duration;

use extractor_logging::{extractor_debug, extractor_warn};

use crate::state::RequestIds;
use crate::{DebounceTimer, Effect, RequestId, TimerKind};

pub const PREVIEW_ERROR: &str = "Failed to load webpage preview";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewView {
    /// No URL to show.
    Empty,
    /// Screenshot in flight; the previous image may still be on screen.
    Loading { stale_image: Option<String> },
    /// Base64-encoded PNG.
    Image(String),
    /// Renderer should embed a live view of `url`.
    Fallback { url: String, error: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    request: RequestId,
    url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDebouncer {
    url: String,
    timer: DebounceTimer,
    in_flight: Option<InFlight>,
    image: Option<String>,
    error: Option<String>,
}

impl PreviewDebouncer {
    pub fn new(url: impl Into<String>, debounce: Duration) -> Self {
        Self {
            url: url.into(),
            timer: DebounceTimer::new(TimerKind::Preview, debounce),
            in_flight: None,
            image: None,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Tracks the latest URL and re-arms the debounce. Visible state is left
    /// alone until the timer fires.
    pub(crate) fn url_changed(&mut self, url: &str) -> Effect {
        self.url = url.to_string();
        self.timer.arm()
    }

    pub(crate) fn timer_fired(&mut self, generation: u64, ids: &mut RequestIds) -> Option<Effect> {
        if !self.timer.fire(generation) || self.url.is_empty() {
            return None;
        }

        let request = ids.issue();
        self.error = None;
        self.in_flight = Some(InFlight {
            request,
            url: self.url.clone(),
        });
        Some(Effect::Screenshot {
            request,
            url: self.url.clone(),
        })
    }

    /// Applies a screenshot response. Returns `false` when it was discarded.
    pub(crate) fn screenshot_completed(
        &mut self,
        request: RequestId,
        result: Result<String, String>,
    ) -> bool {
        let flight = match self.in_flight.take() {
            Some(flight) if flight.request == request => flight,
            other => {
                self.in_flight = other;
                extractor_debug!("Dropping superseded screenshot response {}", request);
                return false;
            }
        };

        if flight.url != self.url {
            // URL moved on after the request went out; show the live fallback
            // for the new URL rather than an image of the old one.
            extractor_debug!("Dropping screenshot of stale url {}", flight.url);
            self.image = None;
            self.error = None;
            return true;
        }

        match result {
            Ok(image) => {
                self.image = Some(image);
                self.error = None;
            }
            Err(reason) => {
                extractor_warn!("Screenshot of {} failed: {}", flight.url, reason);
                self.image = None;
                self.error = Some(PREVIEW_ERROR.to_string());
            }
        }
        true
    }

    pub fn view(&self) -> PreviewView {
        if self.is_loading() {
            return PreviewView::Loading {
                stale_image: self.image.clone(),
            };
        }
        if let Some(image) = &self.image {
            return PreviewView::Image(image.clone());
        }
        if self.url.is_empty() && self.error.is_none() {
            return PreviewView::Empty;
        }
        PreviewView::Fallback {
            url: self.url.clone(),
            error: self.error.clone(),
        }
    }
}
