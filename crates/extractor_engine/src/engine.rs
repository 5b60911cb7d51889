use std::collections::HashMap;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use extractor_logging::{extractor_debug, extractor_info, extractor_trace};

use crate::client::{Backend, BackendSettings, ReqwestBackend};
use crate::timer::TimerHandle;
use crate::{BackendError, EngineEvent, RequestId, TimerSlot};

/// Produces the timestamp recorded on each preloaded page.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Clone)]
pub struct EngineConfig {
    pub backend: BackendSettings,
    pub clock: Clock,
}

impl EngineConfig {
    pub fn new(backend: BackendSettings) -> Self {
        Self {
            backend,
            clock: Arc::new(String::new),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("failed to build backend client: {0}")]
    Backend(#[from] BackendError),
}

enum EngineCommand {
    Call(Call),
    ArmTimer {
        slot: TimerSlot,
        generation: u64,
        delay: Duration,
    },
    CancelTimer { slot: TimerSlot },
}

/// Backend calls, each answered by exactly one `EngineEvent`.
enum Call {
    Scrape { request: RequestId, url: String },
    Extract {
        request: RequestId,
        url: String,
        schema: String,
        preloaded: Option<serde_json::Value>,
    },
    Screenshot { request: RequestId, url: String },
    GenerateSchema { request: RequestId, query: String },
}

/// Command side of the engine. Cheap to clone.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Event side of the engine: completed calls and expired timers.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineEvents {
    /// Blocks for the next event; `None` once the engine has shut down.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

impl EngineHandle {
    /// Starts the engine thread talking to the HTTP backend.
    pub fn start(config: EngineConfig) -> Result<(Self, EngineEvents), EngineError> {
        let backend = Arc::new(ReqwestBackend::new(config.backend)?);
        Self::with_backend(backend, config.clock)
    }

    /// Starts the engine thread with any `Backend` implementation.
    pub fn with_backend(
        backend: Arc<dyn Backend>,
        clock: Clock,
    ) -> Result<(Self, EngineEvents), EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let mut timers: HashMap<TimerSlot, TimerHandle> = HashMap::new();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::ArmTimer {
                        slot,
                        generation,
                        delay,
                    } => {
                        extractor_trace!(
                            "Arm {:?} timer generation={} delay={:?}",
                            slot,
                            generation,
                            delay
                        );
                        let event_tx = event_tx.clone();
                        timers
                            .entry(slot)
                            .or_insert_with(|| TimerHandle::new(runtime.handle().clone()))
                            .arm(delay, move || {
                                let _ = event_tx.send(EngineEvent::TimerFired { slot, generation });
                            });
                    }
                    EngineCommand::CancelTimer { slot } => {
                        if let Some(timer) = timers.get_mut(&slot) {
                            timer.cancel();
                        }
                    }
                    EngineCommand::Call(call) => {
                        let backend = backend.clone();
                        let clock = clock.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let event = handle_call(backend.as_ref(), &clock, call).await;
                            let _ = event_tx.send(event);
                        });
                    }
                }
            }
            extractor_info!("Engine command channel closed; shutting down");
            drop(timers);
            runtime.shutdown_timeout(Duration::from_secs(1));
        });

        Ok((Self { cmd_tx }, EngineEvents { event_rx }))
    }

    pub fn scrape(&self, request: RequestId, url: impl Into<String>) {
        self.send(EngineCommand::Call(Call::Scrape {
            request,
            url: url.into(),
        }));
    }

    pub fn extract(
        &self,
        request: RequestId,
        url: impl Into<String>,
        schema: impl Into<String>,
        preloaded: Option<serde_json::Value>,
    ) {
        self.send(EngineCommand::Call(Call::Extract {
            request,
            url: url.into(),
            schema: schema.into(),
            preloaded,
        }));
    }

    pub fn screenshot(&self, request: RequestId, url: impl Into<String>) {
        self.send(EngineCommand::Call(Call::Screenshot {
            request,
            url: url.into(),
        }));
    }

    pub fn generate_schema(&self, request: RequestId, query: impl Into<String>) {
        self.send(EngineCommand::Call(Call::GenerateSchema {
            request,
            query: query.into(),
        }));
    }

    pub fn arm_timer(&self, slot: TimerSlot, generation: u64, delay: Duration) {
        self.send(EngineCommand::ArmTimer {
            slot,
            generation,
            delay,
        });
    }

    pub fn cancel_timer(&self, slot: TimerSlot) {
        self.send(EngineCommand::CancelTimer { slot });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            extractor_debug!("Engine thread gone; dropping command");
        }
    }
}

async fn handle_call(backend: &dyn Backend, clock: &Clock, call: Call) -> EngineEvent {
    match call {
        Call::Scrape { request, url } => {
            let result = backend.scrape(&url).await;
            EngineEvent::ScrapeCompleted {
                request,
                result,
                fetched_utc: clock(),
            }
        }
        Call::Extract {
            request,
            url,
            schema,
            preloaded,
        } => EngineEvent::ExtractCompleted {
            request,
            result: backend.extract(&url, &schema, preloaded.as_ref()).await,
        },
        Call::Screenshot { request, url } => EngineEvent::ScreenshotCompleted {
            request,
            result: backend.screenshot(&url).await,
        },
        Call::GenerateSchema { request, query } => EngineEvent::SchemaGenerated {
            request,
            result: backend.generate_schema(&query).await,
        },
    }
}
