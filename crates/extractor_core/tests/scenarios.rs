//! End-to-end walks through the reducer, with the runtime played by hand.
use std::time::Duration;

use extractor_core::{
    update, AppState, Effect, KeyEvent, Msg, NotificationKind, OutputView, Selection, TimerKind,
};
use pretty_assertions::assert_eq;

/// Plays the host runtime: remembers armed timers and fires them on request.
#[derive(Default)]
struct Harness {
    timers: Vec<(TimerKind, u64, Duration)>,
    requests: Vec<Effect>,
}

impl Harness {
    fn run(&mut self, state: AppState, msg: Msg) -> AppState {
        let (state, effects) = update(state, msg);
        for effect in effects {
            match effect {
                Effect::ArmTimer {
                    kind,
                    generation,
                    delay,
                } => {
                    self.timers.retain(|(armed, ..)| *armed != kind);
                    self.timers.push((kind, generation, delay));
                }
                Effect::CancelTimer { kind } => self.timers.retain(|(armed, ..)| *armed != kind),
                other => self.requests.push(other),
            }
        }
        state
    }

    fn elapse(&mut self, state: AppState, kind: TimerKind, waited: Duration) -> AppState {
        let Some(idx) = self
            .timers
            .iter()
            .position(|(armed, _, delay)| *armed == kind && *delay <= waited)
        else {
            return state;
        };
        let (kind, generation, _) = self.timers.remove(idx);
        self.run(state, Msg::TimerFired { kind, generation })
    }

    fn scrapes(&self) -> Vec<&str> {
        self.requests
            .iter()
            .filter_map(|effect| match effect {
                Effect::Scrape { url, .. } => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[test]
fn enter_after_indented_line() {
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::SchemaEdited {
            text: "{\n  jobs[]\n}".to_string(),
            selection: Selection::caret(0),
        },
    );
    let (state, _) = update(
        state,
        Msg::SchemaKeyPressed {
            key: KeyEvent::enter(),
            selection: Selection::caret(10),
        },
    );
    let view = state.view();
    assert_eq!(view.schema, "{\n  jobs[]\n  \n}");
    assert_eq!(view.schema_selection, Selection::caret(13));
    assert_eq!(view.schema_line_count, 4);
}

#[test]
fn blur_and_wait_issues_exactly_one_scrape() {
    let mut harness = Harness::default();
    let state = harness.run(
        AppState::new(),
        Msg::UrlChanged("https://example.com".into()),
    );
    let state = harness.run(state, Msg::UrlCommitted);

    let state = harness.elapse(state, TimerKind::Preload, Duration::from_millis(499));
    assert!(harness.scrapes().is_empty());
    let _state = harness.elapse(state, TimerKind::Preload, Duration::from_millis(500));
    assert_eq!(harness.scrapes(), vec!["https://example.com"]);
}

#[test]
fn failed_scrape_then_submit_sends_no_preload() {
    let mut harness = Harness::default();
    let state = harness.run(
        AppState::new(),
        Msg::UrlChanged("https://example.com".into()),
    );
    let state = harness.run(state, Msg::UrlCommitted);
    let state = harness.elapse(state, TimerKind::Preload, Duration::from_millis(500));
    let request = match harness.requests.last() {
        Some(Effect::Scrape { request, .. }) => *request,
        other => panic!("expected scrape, got {other:?}"),
    };
    let state = harness.run(
        state,
        Msg::ScrapeCompleted {
            request,
            result: Err("Failed to scrape webpage".into()),
            fetched_at: String::new(),
        },
    );
    assert!(state.preload().entry().is_none());

    let _state = harness.run(state, Msg::SubmitClicked);
    match harness.requests.last() {
        Some(Effect::Extract { url, preloaded, .. }) => {
            assert_eq!(url, "https://example.com");
            assert_eq!(preloaded, &None);
        }
        other => panic!("expected extract, got {other:?}"),
    }
}

#[test]
fn extraction_error_is_shown_then_dismissed() {
    let mut harness = Harness::default();
    let state = harness.run(AppState::new(), Msg::SubmitClicked);
    let request = match harness.requests.last() {
        Some(Effect::Extract { request, .. }) => *request,
        other => panic!("expected extract, got {other:?}"),
    };

    let state = harness.run(
        state,
        Msg::ExtractCompleted {
            request,
            result: Err("rate limited".into()),
        },
    );
    let view = state.view();
    assert_eq!(view.output, Some(OutputView::Error("rate limited".into())));
    let notification = view.notification.expect("error notification");
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.message, "rate limited");

    let state = harness.elapse(state, TimerKind::Notification, Duration::from_millis(4999));
    assert!(state.view().notification.is_some());
    let state = harness.elapse(state, TimerKind::Notification, Duration::from_millis(5000));
    assert!(state.view().notification.is_none());
    // The inline error stays after the notification is gone.
    assert_eq!(
        state.view().output,
        Some(OutputView::Error("rate limited".into()))
    );
}

#[test]
fn example_preset_replaces_url_and_schema() {
    let mut harness = Harness::default();
    let state = harness.run(AppState::new(), Msg::ExampleSelected(1));
    let view = state.view();
    assert_eq!(view.url, "https://books.toscrape.com/");
    assert!(view.schema.contains("product_name"));
    assert!(harness
        .timers
        .iter()
        .any(|(kind, ..)| *kind == TimerKind::Preview));

    let before = harness.run(state, Msg::ExampleSelected(42));
    assert_eq!(before.view().url, "https://books.toscrape.com/");
}

#[test]
fn generated_schema_replaces_buffer() {
    let mut harness = Harness::default();
    let state = harness.run(
        AppState::new(),
        Msg::SchemaQuerySubmitted("list all products".into()),
    );
    assert!(state.view().generating_schema);
    let request = match harness.requests.last() {
        Some(Effect::GenerateSchema { request, query }) => {
            assert_eq!(query, "list all products");
            *request
        }
        other => panic!("expected schema query, got {other:?}"),
    };

    let state = harness.run(
        state,
        Msg::SchemaGenerated {
            request,
            result: Ok("{\n  products[]\n}".into()),
        },
    );
    let view = state.view();
    assert!(!view.generating_schema);
    assert_eq!(view.schema, "{\n  products[]\n}");
}

#[test]
fn unchanged_url_needs_no_render_or_effects() {
    let state = AppState::new();
    let url = state.url().to_string();
    let (mut state, effects) = update(state, Msg::UrlChanged(url.clone()));
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());

    let (mut state, effects) = update(state, Msg::UrlChanged(format!("{url}/jobs")));
    assert_eq!(effects.len(), 1);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}
