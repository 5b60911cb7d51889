use crate::{Notification, PreloadPhase, PreviewView, Selection, SubmitStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButtonView {
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputView {
    Error(String),
    /// Extracted data, pretty-printed JSON.
    Data(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub url: String,
    pub schema: String,
    pub schema_selection: Selection,
    pub schema_line_count: usize,
    pub submit_button: SubmitButtonView,
    pub status: SubmitStatus,
    pub preload_phase: PreloadPhase,
    pub output: Option<OutputView>,
    pub preview: PreviewView,
    pub notification: Option<Notification>,
    pub generating_schema: bool,
    pub dirty: bool,
}
