//! Extractor engine: backend calls, timers and effect execution off the UI thread.
mod client;
mod engine;
mod timer;
mod types;

pub use client::{Backend, BackendSettings, ReqwestBackend, DEFAULT_API_URL};
pub use engine::{Clock, EngineConfig, EngineError, EngineEvents, EngineHandle};
pub use timer::TimerHandle;
pub use types::{BackendError, EngineEvent, FailureKind, RequestId, ScrapedPage, TimerSlot};
