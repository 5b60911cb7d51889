use std::sync::Once;

use extractor_core::{update, AppState, Effect, Msg, PreloadPhase, TimerKind};
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(extractor_logging::initialize_for_tests);
}

fn armed_generation(effects: &[Effect], kind: TimerKind) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::ArmTimer {
                kind: armed,
                generation,
                ..
            } if *armed == kind => Some(*generation),
            _ => None,
        })
        .expect("timer armed")
}

fn type_and_blur(state: AppState, url: &str) -> (AppState, u64) {
    let (state, _) = update(state, Msg::UrlChanged(url.to_string()));
    let (state, effects) = update(state, Msg::UrlCommitted);
    let generation = armed_generation(&effects, TimerKind::Preload);
    (state, generation)
}

fn fire_preload(state: AppState, generation: u64) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::TimerFired {
            kind: TimerKind::Preload,
            generation,
        },
    )
}

fn scrape_requests(effects: &[Effect]) -> Vec<(u64, String)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Scrape { request, url } => Some((*request, url.clone())),
            _ => None,
        })
        .collect()
}

fn complete_scrape(
    state: AppState,
    request: u64,
    result: Result<serde_json::Value, String>,
) -> AppState {
    let (state, _) = update(
        state,
        Msg::ScrapeCompleted {
            request,
            result,
            fetched_at: "2026-01-01T00:00:00Z".to_string(),
        },
    );
    state
}

#[test]
fn blur_then_debounce_issues_one_scrape() {
    init_logging();
    let (state, generation) = type_and_blur(AppState::new(), "https://example.com");
    assert_eq!(state.preload().phase(), PreloadPhase::Pending);

    let (state, effects) = fire_preload(state, generation);
    assert_eq!(
        scrape_requests(&effects)
            .into_iter()
            .map(|(_, url)| url)
            .collect::<Vec<_>>(),
        vec!["https://example.com".to_string()]
    );
    assert_eq!(state.preload().phase(), PreloadPhase::Fetching);
    assert!(!state.view().submit_button.enabled);
    assert_eq!(state.view().submit_button.label, "Pre-loading...");
}

#[test]
fn rapid_commits_collapse_into_one_fetch_for_last_url() {
    init_logging();
    let mut state = AppState::new();
    let mut generations = Vec::new();
    for idx in 0..5 {
        let (next, generation) = type_and_blur(state, &format!("https://example.com/{idx}"));
        state = next;
        generations.push(generation);
    }

    let mut scrapes = Vec::new();
    for generation in generations {
        let (next, effects) = fire_preload(state, generation);
        state = next;
        scrapes.extend(scrape_requests(&effects));
    }

    assert_eq!(scrapes.len(), 1);
    assert_eq!(scrapes[0].1, "https://example.com/4");
}

#[test]
fn cached_url_is_not_fetched_again() {
    init_logging();
    let (state, generation) = type_and_blur(AppState::new(), "https://example.com");
    let (state, effects) = fire_preload(state, generation);
    let (request, _) = scrape_requests(&effects)[0].clone();
    let state = complete_scrape(
        state,
        request,
        Ok(json!({"url": "https://example.com", "content": "hi"})),
    );
    assert_eq!(state.preload().phase(), PreloadPhase::Cached);

    let (state, effects) = update(state, Msg::UrlCommitted);
    let generation = armed_generation(&effects, TimerKind::Preload);
    let (state, effects) = fire_preload(state, generation);

    assert!(scrape_requests(&effects).is_empty());
    assert_eq!(state.preload().phase(), PreloadPhase::Cached);
    let entry = state
        .preload()
        .lookup("https://example.com")
        .expect("still cached");
    assert_eq!(entry.fetched_at, "2026-01-01T00:00:00Z");
}

#[test]
fn empty_url_skips_fetch() {
    init_logging();
    let (state, generation) = type_and_blur(AppState::new(), "");
    let (state, effects) = fire_preload(state, generation);
    assert!(scrape_requests(&effects).is_empty());
    assert_eq!(state.preload().phase(), PreloadPhase::Idle);
}

#[test]
fn commit_while_fetching_is_dropped_at_fire_time() {
    init_logging();
    let (state, generation) = type_and_blur(AppState::new(), "https://a.example.com");
    let (state, effects) = fire_preload(state, generation);
    let (first_request, _) = scrape_requests(&effects)[0].clone();

    let (state, generation) = type_and_blur(state, "https://b.example.com");
    assert_eq!(state.preload().phase(), PreloadPhase::Fetching);
    let (state, effects) = fire_preload(state, generation);
    assert!(scrape_requests(&effects).is_empty());

    // The first fetch still lands under the URL it was issued for.
    let state = complete_scrape(state, first_request, Ok(json!({"content": "a"})));
    assert!(state.preload().lookup("https://a.example.com").is_some());
    assert!(state.preload().lookup("https://b.example.com").is_none());
}

#[test]
fn guard_skips_while_fetching_keep_fetching_phase() {
    init_logging();
    let (state, generation) = type_and_blur(AppState::new(), "https://a.example.com");
    let (state, effects) = fire_preload(state, generation);
    let (request, _) = scrape_requests(&effects)[0].clone();

    // Clearing the field does not hide the fetch that is still running.
    let (state, generation) = type_and_blur(state, "");
    let (state, effects) = fire_preload(state, generation);
    assert!(scrape_requests(&effects).is_empty());
    assert_eq!(state.preload().phase(), PreloadPhase::Fetching);
    assert!(state.preload().is_fetching());
    assert!(state.is_busy());

    let (state, _) = update(state, Msg::UrlCommitted);
    assert_eq!(state.preload().phase(), PreloadPhase::Fetching);

    let state = complete_scrape(state, request, Ok(json!({"content": "a"})));
    assert_eq!(state.preload().phase(), PreloadPhase::Pending);
    assert!(state.preload().lookup("https://a.example.com").is_some());
}

#[test]
fn failed_preload_clears_cache_silently() {
    init_logging();
    let (state, generation) = type_and_blur(AppState::new(), "https://example.com");
    let (state, effects) = fire_preload(state, generation);
    let (request, _) = scrape_requests(&effects)[0].clone();
    let state = complete_scrape(state, request, Ok(json!({"content": "old"})));

    // Same URL cannot refetch, so move away and back to force a new fetch.
    let (state, generation) = type_and_blur(state, "https://other.example.com");
    let (state, effects) = fire_preload(state, generation);
    let (request, _) = scrape_requests(&effects)[0].clone();
    assert!(state.preload().entry().is_none());

    let state = complete_scrape(state, request, Err("boom".to_string()));
    assert_eq!(state.preload().phase(), PreloadPhase::Failed);
    assert!(state.preload().entry().is_none());
    let view = state.view();
    assert!(view.notification.is_none());
    assert!(view.output.is_none());
    assert!(view.submit_button.enabled);
}

#[test]
fn unknown_scrape_response_is_ignored() {
    init_logging();
    let state = AppState::new();
    let state = complete_scrape(state, 99, Ok(json!({"content": "x"})));
    assert!(state.preload().entry().is_none());
    assert_eq!(state.preload().phase(), PreloadPhase::Idle);
}
