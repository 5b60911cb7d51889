use std::sync::{mpsc, Arc};
use std::thread;

use chrono::Utc;
use extractor_core::{Effect, Msg, TimerKind};
use extractor_engine::{
    EngineConfig, EngineError, EngineEvent, EngineHandle, ScrapedPage, TimerSlot,
};
use extractor_logging::{extractor_debug, extractor_info};

use super::app::AppEvent;
use super::config::AppConfig;

/// Executes reducer effects on the engine and feeds its events back as `Msg`s.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn start(
        config: &AppConfig,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Result<Self, EngineError> {
        let mut engine_config = EngineConfig::new(config.backend_settings());
        engine_config.clock = Arc::new(|| Utc::now().to_rfc3339());

        let (engine, events) = EngineHandle::start(engine_config)?;
        thread::spawn(move || {
            while let Some(event) = events.recv() {
                if event_tx.send(AppEvent::Msg(map_event(event))).is_err() {
                    break;
                }
            }
            extractor_debug!("Engine event forwarding stopped");
        });

        Ok(Self { engine })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ArmTimer {
                    kind,
                    generation,
                    delay,
                } => self.engine.arm_timer(to_slot(kind), generation, delay),
                Effect::CancelTimer { kind } => self.engine.cancel_timer(to_slot(kind)),
                Effect::Scrape { request, url } => {
                    extractor_info!("Scrape request={} url={}", request, url);
                    self.engine.scrape(request, url);
                }
                Effect::Extract {
                    request,
                    url,
                    schema,
                    preloaded,
                } => self.engine.extract(request, url, schema, preloaded),
                Effect::Screenshot { request, url } => self.engine.screenshot(request, url),
                Effect::GenerateSchema { request, query } => {
                    self.engine.generate_schema(request, query)
                }
            }
        }
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ScrapeCompleted {
            request,
            result,
            fetched_utc,
        } => Msg::ScrapeCompleted {
            request,
            result: result.map_err(|err| err.message).and_then(page_value),
            fetched_at: fetched_utc,
        },
        EngineEvent::ExtractCompleted { request, result } => Msg::ExtractCompleted {
            request,
            result: result.map_err(|err| err.message),
        },
        EngineEvent::ScreenshotCompleted { request, result } => Msg::ScreenshotCompleted {
            request,
            result: result.map_err(|err| err.message),
        },
        EngineEvent::SchemaGenerated { request, result } => Msg::SchemaGenerated {
            request,
            result: result.map_err(|err| err.message),
        },
        EngineEvent::TimerFired { slot, generation } => Msg::TimerFired {
            kind: to_kind(slot),
            generation,
        },
    }
}

fn page_value(page: ScrapedPage) -> Result<serde_json::Value, String> {
    serde_json::to_value(page).map_err(|err| err.to_string())
}

fn to_slot(kind: TimerKind) -> TimerSlot {
    match kind {
        TimerKind::Preload => TimerSlot::Preload,
        TimerKind::Preview => TimerSlot::Preview,
        TimerKind::Notification => TimerSlot::Notification,
    }
}

fn to_kind(slot: TimerSlot) -> TimerKind {
    match slot {
        TimerSlot::Preload => TimerKind::Preload,
        TimerSlot::Preview => TimerKind::Preview,
        TimerSlot::Notification => TimerKind::Notification,
    }
}
