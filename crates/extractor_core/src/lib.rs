//! Extractor core: pure state machines, schema editing rules and view-model helpers.
mod editor;
mod effect;
mod msg;
mod notification;
mod preload;
mod presets;
mod preview;
mod state;
mod submit;
mod timer;
mod update;
mod view_model;

pub use editor::{
    apply_key, line_count, replace_selection, EditOutcome, Key, KeyEvent, SchemaBuffer, Selection,
    TextEdit, INDENT,
};
pub use effect::Effect;
pub use msg::Msg;
pub use notification::{Notification, NotificationCenter, NotificationKind};
pub use preload::{PreloadCoordinator, PreloadEntry, PreloadPhase};
pub use presets::{Preset, DEFAULT_PRESET, PRESETS};
pub use preview::{PreviewDebouncer, PreviewView, PREVIEW_ERROR};
pub use state::{AppState, RequestId, RequestIds};
pub use submit::{SubmitOrchestrator, SubmitStatus, PENDING_MESSAGE, SUCCESS_MESSAGE};
pub use timer::{DebounceTimer, TimerKind, Timings};
pub use update::update;
pub use view_model::{AppViewModel, OutputView, SubmitButtonView};
