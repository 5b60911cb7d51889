//! Extraction submit: snapshot inputs, issue one call, publish the outcome.
use extractor_logging::{extractor_debug, extractor_info, extractor_warn};

use crate::state::RequestIds;
use crate::{Effect, PreloadEntry, RequestId};

pub const PENDING_MESSAGE: &str = "Generating response...";
pub const SUCCESS_MESSAGE: &str = "Data extracted successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmitOrchestrator {
    status: SubmitStatus,
    in_flight: Option<RequestId>,
    result: Option<serde_json::Value>,
    error: Option<String>,
}

impl SubmitOrchestrator {
    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn result(&self) -> Option<&serde_json::Value> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Clears the previous outcome and issues the extract call. The schema
    /// goes out verbatim; emptiness checks belong to the backend.
    pub(crate) fn begin(
        &mut self,
        url: &str,
        schema: &str,
        preloaded: Option<&PreloadEntry>,
        ids: &mut RequestIds,
    ) -> Effect {
        let request = ids.issue();
        extractor_info!(
            "Extract request={} url={} schema_len={} preloaded={}",
            request,
            url,
            schema.len(),
            preloaded.is_some()
        );
        self.status = SubmitStatus::Loading;
        self.in_flight = Some(request);
        self.result = None;
        self.error = None;
        Effect::Extract {
            request,
            url: url.to_string(),
            schema: schema.to_string(),
            preloaded: preloaded.map(|entry| entry.content.clone()),
        }
    }

    /// Applies the extract response. `None` means the response was not ours;
    /// otherwise the inner result carries the failure message to surface.
    pub(crate) fn complete(
        &mut self,
        request: RequestId,
        result: Result<serde_json::Value, String>,
    ) -> Option<Result<(), String>> {
        if self.in_flight != Some(request) {
            extractor_debug!("Ignoring unknown extract response {}", request);
            return None;
        }
        self.in_flight = None;

        match result {
            Ok(data) => {
                self.status = SubmitStatus::Success;
                self.result = Some(data);
                Some(Ok(()))
            }
            Err(message) => {
                extractor_warn!("Extract request {} failed: {}", request, message);
                self.status = SubmitStatus::Error;
                self.error = Some(message.clone());
                Some(Err(message))
            }
        }
    }
}
