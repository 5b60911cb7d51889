use crate::view_model::{AppViewModel, OutputView, SubmitButtonView};
use crate::{
    NotificationCenter, PreloadCoordinator, PreviewDebouncer, SchemaBuffer, SubmitOrchestrator,
    Timings, DEFAULT_PRESET,
};

pub type RequestId = u64;

/// Monotonic id source shared by every outgoing request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestIds {
    last: RequestId,
}

impl RequestIds {
    pub fn issue(&mut self) -> RequestId {
        self.last += 1;
        self.last
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub(crate) url: String,
    pub(crate) schema: SchemaBuffer,
    pub(crate) preload: PreloadCoordinator,
    pub(crate) preview: PreviewDebouncer,
    pub(crate) submit: SubmitOrchestrator,
    pub(crate) notification: NotificationCenter,
    pub(crate) schema_query: Option<RequestId>,
    pub(crate) ids: RequestIds,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Session with the default preset loaded.
    pub fn new() -> Self {
        Self::with_timings(Timings::default())
    }

    pub fn with_timings(timings: Timings) -> Self {
        Self {
            url: DEFAULT_PRESET.url.to_string(),
            schema: SchemaBuffer::new(DEFAULT_PRESET.schema),
            preload: PreloadCoordinator::new(timings.preload_debounce),
            preview: PreviewDebouncer::new(DEFAULT_PRESET.url, timings.preview_debounce),
            submit: SubmitOrchestrator::default(),
            notification: NotificationCenter::new(timings.notification_dismiss),
            schema_query: None,
            ids: RequestIds::default(),
            dirty: false,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn schema(&self) -> &SchemaBuffer {
        &self.schema
    }

    pub fn preload(&self) -> &PreloadCoordinator {
        &self.preload
    }

    pub fn preview(&self) -> &PreviewDebouncer {
        &self.preview
    }

    pub fn submit(&self) -> &SubmitOrchestrator {
        &self.submit
    }

    pub fn notification(&self) -> &NotificationCenter {
        &self.notification
    }

    /// Submitting is blocked while an extraction or a preload is running.
    pub fn is_busy(&self) -> bool {
        self.submit.is_loading() || self.preload.is_fetching()
    }

    pub fn view(&self) -> AppViewModel {
        let output = match (self.submit.error(), self.submit.result()) {
            (Some(error), _) => Some(OutputView::Error(error.to_string())),
            (None, Some(data)) => Some(OutputView::Data(
                serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string()),
            )),
            (None, None) => None,
        };

        let label = if self.submit.is_loading() {
            "Fetching..."
        } else if self.preload.is_fetching() {
            "Pre-loading..."
        } else {
            "Fetch Data"
        };

        AppViewModel {
            url: self.url.clone(),
            schema: self.schema.text().to_string(),
            schema_selection: self.schema.selection(),
            schema_line_count: self.schema.line_count(),
            submit_button: SubmitButtonView {
                label,
                enabled: !self.is_busy(),
            },
            status: self.submit.status(),
            preload_phase: self.preload.phase(),
            output,
            preview: self.preview.view(),
            notification: self.notification.current().cloned(),
            generating_schema: self.schema_query.is_some(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether anything changed since the last call, and resets it.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
