use extractor_core::{update, AppState, Effect, Msg, PreviewView, TimerKind, PREVIEW_ERROR};

fn preview_generation(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::ArmTimer {
                kind: TimerKind::Preview,
                generation,
                ..
            } => Some(*generation),
            _ => None,
        })
        .expect("preview timer armed")
}

fn fire(state: AppState, generation: u64) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::TimerFired {
            kind: TimerKind::Preview,
            generation,
        },
    )
}

fn screenshot_request(effects: &[Effect]) -> Option<(u64, String)> {
    effects.iter().find_map(|effect| match effect {
        Effect::Screenshot { request, url } => Some((*request, url.clone())),
        _ => None,
    })
}

#[test]
fn startup_previews_default_url() {
    let (state, effects) = update(AppState::new(), Msg::Started);
    let (state, effects) = fire(state, preview_generation(&effects));
    let (_, url) = screenshot_request(&effects).expect("screenshot requested");
    assert_eq!(url, state.url());
    assert_eq!(
        state.view().preview,
        PreviewView::Loading { stale_image: None }
    );
}

#[test]
fn typing_rearms_without_visible_change() {
    let mut state = AppState::new();
    let mut generations = Vec::new();
    for url in ["h", "ht", "https://example.com"] {
        let (next, effects) = update(state, Msg::UrlChanged(url.to_string()));
        assert!(screenshot_request(&effects).is_none());
        generations.push(preview_generation(&effects));
        state = next;
        assert!(!matches!(state.view().preview, PreviewView::Loading { .. }));
    }

    let (state, effects) = fire(state, generations[0]);
    assert!(screenshot_request(&effects).is_none());
    let (_, effects) = fire(state, generations[2]);
    let (_, url) = screenshot_request(&effects).expect("latest url requested");
    assert_eq!(url, "https://example.com");
}

#[test]
fn successful_screenshot_shows_image() {
    let (state, effects) = update(AppState::new(), Msg::UrlChanged("https://a.example".into()));
    let (state, effects2) = fire(state, preview_generation(&effects));
    let (request, _) = screenshot_request(&effects2).unwrap();

    let (state, _) = update(
        state,
        Msg::ScreenshotCompleted {
            request,
            result: Ok("iVBORw0KGgo=".to_string()),
        },
    );
    assert_eq!(
        state.view().preview,
        PreviewView::Image("iVBORw0KGgo=".to_string())
    );

    // Next cycle keeps the old image on screen while loading.
    let (state, effects) = update(state, Msg::UrlChanged("https://b.example".into()));
    let (state, _) = fire(state, preview_generation(&effects));
    assert_eq!(
        state.view().preview,
        PreviewView::Loading {
            stale_image: Some("iVBORw0KGgo=".to_string())
        }
    );
}

#[test]
fn failed_screenshot_falls_back_to_live_render() {
    let (state, effects) = update(AppState::new(), Msg::UrlChanged("https://a.example".into()));
    let (state, effects) = fire(state, preview_generation(&effects));
    let (request, _) = screenshot_request(&effects).unwrap();

    let (state, _) = update(
        state,
        Msg::ScreenshotCompleted {
            request,
            result: Err("playwright crashed".to_string()),
        },
    );
    assert_eq!(
        state.view().preview,
        PreviewView::Fallback {
            url: "https://a.example".to_string(),
            error: Some(PREVIEW_ERROR.to_string()),
        }
    );
}

#[test]
fn superseded_response_is_discarded() {
    let (state, effects) = update(AppState::new(), Msg::UrlChanged("https://a.example".into()));
    let (state, effects) = fire(state, preview_generation(&effects));
    let (first, _) = screenshot_request(&effects).unwrap();

    let (state, effects) = update(state, Msg::UrlChanged("https://b.example".into()));
    let (state, effects) = fire(state, preview_generation(&effects));
    let (second, url) = screenshot_request(&effects).unwrap();
    assert_eq!(url, "https://b.example");

    let (state, _) = update(
        state,
        Msg::ScreenshotCompleted {
            request: first,
            result: Ok("AAAA".to_string()),
        },
    );
    assert_eq!(
        state.view().preview,
        PreviewView::Loading { stale_image: None }
    );

    let (state, _) = update(
        state,
        Msg::ScreenshotCompleted {
            request: second,
            result: Ok("BBBB".to_string()),
        },
    );
    assert_eq!(state.view().preview, PreviewView::Image("BBBB".to_string()));
}

#[test]
fn response_for_abandoned_url_is_not_shown() {
    let (state, effects) = update(AppState::new(), Msg::UrlChanged("https://a.example".into()));
    let (state, effects) = fire(state, preview_generation(&effects));
    let (request, _) = screenshot_request(&effects).unwrap();

    let (state, _) = update(state, Msg::UrlChanged(String::new()));
    let (state, _) = update(
        state,
        Msg::ScreenshotCompleted {
            request,
            result: Ok("AAAA".to_string()),
        },
    );
    assert_eq!(state.view().preview, PreviewView::Empty);
}

#[test]
fn empty_url_fire_is_noop() {
    let (state, effects) = update(AppState::new(), Msg::UrlChanged(String::new()));
    let before = state.clone();
    let (state, effects) = fire(state, preview_generation(&effects));
    assert!(effects.is_empty());
    assert_eq!(state.view().preview, before.view().preview);
}
