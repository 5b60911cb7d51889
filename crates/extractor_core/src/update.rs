use extractor_logging::{extractor_debug, extractor_info};

use crate::{
    AppState, Effect, Msg, NotificationKind, SchemaBuffer, TimerKind, PENDING_MESSAGE, PRESETS,
    SUCCESS_MESSAGE,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            let url = state.url.clone();
            vec![state.preview.url_changed(&url)]
        }
        Msg::UrlChanged(url) => set_url(&mut state, url),
        Msg::UrlCommitted => {
            state.mark_dirty();
            vec![state.preload.commit()]
        }
        Msg::SchemaEdited { text, selection } => {
            state.schema.replace(text, selection);
            state.mark_dirty();
            Vec::new()
        }
        Msg::SchemaSelectionChanged(selection) => {
            state.schema.select(selection);
            state.mark_dirty();
            Vec::new()
        }
        Msg::SchemaTyped(text) => {
            state.schema.insert(&text);
            state.mark_dirty();
            Vec::new()
        }
        Msg::SchemaKeyPressed { key, selection } => {
            if state.schema.handle_key(selection, key) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ExampleSelected(index) => match PRESETS.get(index) {
            Some(preset) => {
                extractor_info!("Loading preset {:?}", preset.name);
                state.schema = SchemaBuffer::new(preset.schema);
                state.mark_dirty();
                set_url(&mut state, preset.url.to_string())
            }
            None => Vec::new(),
        },
        Msg::SchemaQuerySubmitted(query) => {
            if state.schema_query.is_some() || query.trim().is_empty() {
                return (state, Vec::new());
            }
            let request = state.ids.issue();
            state.schema_query = Some(request);
            state.mark_dirty();
            vec![Effect::GenerateSchema { request, query }]
        }
        Msg::SubmitClicked => {
            if state.is_busy() {
                extractor_debug!("Submit ignored while busy");
                return (state, Vec::new());
            }
            let effect = state.submit.begin(
                &state.url,
                state.schema.text(),
                state.preload.lookup(&state.url),
                &mut state.ids,
            );
            let pending = notify(&mut state, PENDING_MESSAGE, NotificationKind::Pending);
            state.mark_dirty();
            std::iter::once(effect).chain(pending).collect()
        }
        Msg::NotificationClosed => {
            state.mark_dirty();
            state.notification.dismiss().into_iter().collect()
        }
        Msg::TimerFired { kind, generation } => timer_fired(&mut state, kind, generation),
        Msg::ScrapeCompleted {
            request,
            result,
            fetched_at,
        } => {
            if state.preload.scrape_completed(request, result, fetched_at) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ExtractCompleted { request, result } => match state.submit.complete(request, result) {
            Some(outcome) => {
                state.mark_dirty();
                let (message, kind) = match outcome {
                    Ok(()) => (SUCCESS_MESSAGE.to_string(), NotificationKind::Success),
                    Err(message) => (message, NotificationKind::Error),
                };
                notify(&mut state, message, kind)
            }
            None => Vec::new(),
        },
        Msg::ScreenshotCompleted { request, result } => {
            if state.preview.screenshot_completed(request, result) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SchemaGenerated { request, result } => {
            if state.schema_query != Some(request) {
                return (state, Vec::new());
            }
            state.schema_query = None;
            state.mark_dirty();
            match result {
                Ok(schema) => {
                    state.schema = SchemaBuffer::new(schema);
                    Vec::new()
                }
                Err(message) => notify(&mut state, message, NotificationKind::Error),
            }
        }
    };

    (state, effects)
}

fn set_url(state: &mut AppState, url: String) -> Vec<Effect> {
    if state.url == url {
        return Vec::new();
    }
    state.url = url;
    state.mark_dirty();
    vec![state.preview.url_changed(&state.url)]
}

fn notify(
    state: &mut AppState,
    message: impl Into<String>,
    kind: NotificationKind,
) -> Vec<Effect> {
    state.notification.show(message, kind).into_iter().collect()
}

fn timer_fired(state: &mut AppState, kind: TimerKind, generation: u64) -> Vec<Effect> {
    let effect = match kind {
        TimerKind::Preload => {
            let effect = state
                .preload
                .timer_fired(generation, &state.url, &mut state.ids);
            state.mark_dirty();
            effect
        }
        TimerKind::Preview => state.preview.timer_fired(generation, &mut state.ids),
        TimerKind::Notification => {
            if state.notification.timer_fired(generation) {
                state.mark_dirty();
            }
            None
        }
    };
    if effect.is_some() {
        state.mark_dirty();
    }
    effect.into_iter().collect()
}
