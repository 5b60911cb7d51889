use crate::{KeyEvent, RequestId, Selection, TimerKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Session start; kicks off the initial preview.
    Started,
    /// User edited the URL input box.
    UrlChanged(String),
    /// URL input lost focus.
    UrlCommitted,
    /// Host applied its own default edit to the schema text area.
    SchemaEdited { text: String, selection: Selection },
    /// Caret or selection moved in the schema text area.
    SchemaSelectionChanged(Selection),
    /// Printable text typed into the schema at the current selection.
    SchemaTyped(String),
    /// Key press in the schema text area, with the selection at that moment.
    SchemaKeyPressed { key: KeyEvent, selection: Selection },
    /// User picked one of the built-in presets.
    ExampleSelected(usize),
    /// User asked for a schema from a natural-language description.
    SchemaQuerySubmitted(String),
    /// User clicked Fetch Data.
    SubmitClicked,
    /// User closed the notification.
    NotificationClosed,
    /// A timer armed by `Effect::ArmTimer` expired.
    TimerFired { kind: TimerKind, generation: u64 },
    ScrapeCompleted {
        request: RequestId,
        result: Result<serde_json::Value, String>,
        fetched_at: String,
    },
    ExtractCompleted {
        request: RequestId,
        result: Result<serde_json::Value, String>,
    },
    ScreenshotCompleted {
        request: RequestId,
        result: Result<String, String>,
    },
    SchemaGenerated {
        request: RequestId,
        result: Result<String, String>,
    },
}
