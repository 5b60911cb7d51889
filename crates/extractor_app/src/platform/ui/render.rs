use std::fmt::Write;

use extractor_core::{
    AppViewModel, NotificationKind, OutputView, PreloadPhase, PreviewView, SubmitStatus, PRESETS,
};

const RULE: &str = "----------------------------------------";

/// Renders the whole screen as plain text.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "URL: {}", view.url);
    let _ = writeln!(out, "Preload: {}", preload_label(view.preload_phase));
    let _ = writeln!(out, "Examples: {}", examples_line());

    let _ = writeln!(
        out,
        "Schema ({} lines, selection {}..{}){}:",
        view.schema_line_count,
        view.schema_selection.start,
        view.schema_selection.end,
        if view.generating_schema {
            " [generating...]"
        } else {
            ""
        }
    );
    out.push_str(&with_gutter(&view.schema, view.schema_line_count));

    let _ = writeln!(
        out,
        "[ {} ]{}",
        view.submit_button.label,
        if view.submit_button.enabled {
            ""
        } else {
            " (disabled)"
        }
    );

    let _ = writeln!(out, "Output ({}):", status_label(view.status));
    match &view.output {
        Some(OutputView::Error(message)) => {
            let _ = writeln!(out, "  error: {message}");
        }
        Some(OutputView::Data(json)) => {
            for line in json.lines() {
                let _ = writeln!(out, "  {line}");
            }
        }
        None => out.push_str("  (nothing yet)\n"),
    }

    let _ = writeln!(out, "Preview: {}", preview_line(&view.preview));

    if let Some(notification) = &view.notification {
        let tag = match notification.kind {
            NotificationKind::Pending => "…",
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
        };
        let _ = writeln!(out, "({tag}) {}  [close]", notification.message);
    }
    let _ = writeln!(out, "{RULE}");
    out
}

/// Prefixes every schema line with its 1-based number. An empty buffer still
/// shows line 1.
fn with_gutter(text: &str, line_count: usize) -> String {
    let width = line_count.max(1).to_string().len();
    let mut out = String::new();
    for (index, line) in text.split('\n').enumerate() {
        let _ = writeln!(out, "{:>width$} | {}", index + 1, line, width = width);
    }
    out
}

fn preload_label(phase: PreloadPhase) -> &'static str {
    match phase {
        PreloadPhase::Idle => "idle",
        PreloadPhase::Pending => "waiting",
        PreloadPhase::Fetching => "fetching",
        PreloadPhase::Cached => "cached",
        PreloadPhase::Failed => "unavailable",
    }
}

fn status_label(status: SubmitStatus) -> &'static str {
    match status {
        SubmitStatus::Idle => "idle",
        SubmitStatus::Loading => "loading",
        SubmitStatus::Success => "success",
        SubmitStatus::Error => "error",
    }
}

fn preview_line(preview: &PreviewView) -> String {
    match preview {
        PreviewView::Empty => "(no url)".to_string(),
        PreviewView::Loading { stale_image: None } => "loading...".to_string(),
        PreviewView::Loading {
            stale_image: Some(image),
        } => format!(
            "loading... (showing previous screenshot, {} bytes)",
            image.len()
        ),
        PreviewView::Image(image) => format!("screenshot, {} bytes base64", image.len()),
        PreviewView::Fallback { url, error } => match error {
            Some(error) => format!("{error}; live view of {url}"),
            None => format!("live view of {url}"),
        },
    }
}

fn examples_line() -> String {
    PRESETS
        .iter()
        .enumerate()
        .map(|(index, preset)| format!("{}) {}", index + 1, preset.name))
        .collect::<Vec<_>>()
        .join("  ")
}
