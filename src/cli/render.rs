//! Terminal rendering of a session snapshot.

use owo_colors::OwoColorize;

use crate::actor::Snapshot;
use crate::mount::Placement;
use crate::session::chrome::{Control, Icon};
use crate::session::gate::LOADING_TEXT;
use crate::session::{PreviewView, ViewAction};

/// Lines of rendered output shown before truncating.
const MAX_PREVIEW_LINES: usize = 20;

/// Key that triggers a control in watch mode.
pub fn key_for(action: ViewAction) -> char {
    match action {
        ViewAction::ToggleLayout => 'l',
        ViewAction::ToggleCodePanel => 'c',
        ViewAction::ToggleFullscreen => 'f',
        ViewAction::ToggleErrorOverlay => 'e',
    }
}

fn icon_glyph(icon: Icon) -> &'static str {
    match icon {
        Icon::RotateToVertical => "⇅",
        Icon::RotateToHorizontal => "⇄",
        Icon::ShowCode => "</>",
        Icon::HideCode => "</x>",
        Icon::Fullscreen => "⛶",
        Icon::ExitFullscreen => "⤡",
        Icon::Error => "!",
    }
}

fn control(c: &Control) -> String {
    format!("[{}] {} {}", key_for(c.action), icon_glyph(c.icon), c.title)
}

/// The panel as a block of text.
pub fn render(snapshot: &Snapshot) -> String {
    let chrome = &snapshot.chrome;
    let mut out = Vec::new();

    // Header
    let label = chrome.label.as_deref().unwrap_or("playground");
    let attrs = chrome
        .attributes
        .to_pairs()
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ");
    out.push(format!("{} {}", label.bold(), attrs.dimmed()));

    let toolbar = chrome.controls.iter().map(control).collect::<Vec<_>>().join("  ");
    out.push(toolbar);

    if let Placement::Portal { target, container } = &snapshot.placement {
        out.push(format!("{}", format!("fullscreen in {target} #{container}").dimmed()));
    }

    if chrome.editor_visible {
        let files = snapshot.files.paths().collect::<Vec<_>>().join(", ");
        out.push(format!("{} {}", "code:".cyan(), files));
    }

    // Preview
    match &chrome.content {
        PreviewView::Loading => out.push(LOADING_TEXT.dimmed().to_string()),
        PreviewView::Empty => {}
        PreviewView::Rendered(renderable) => {
            let lines: Vec<&str> = renderable.output().lines().collect();
            for line in lines.iter().take(MAX_PREVIEW_LINES) {
                out.push(format!("│ {line}"));
            }
            if lines.len() > MAX_PREVIEW_LINES {
                out.push(format!("│ … {} more lines", lines.len() - MAX_PREVIEW_LINES));
            }
        }
    }
    if snapshot.bundling && chrome.content.renderable().is_some() {
        out.push(format!("{}", "rebuilding…".dimmed()));
    }

    // Errors
    if let Some(overlay) = chrome.overlay.as_ref().filter(|o| o.visible) {
        out.push(format!("{}", "error:".red().bold()));
        out.extend(overlay.message.lines().map(|l| format!("  {}", l.red())));
    }
    if let Some(indicator) = &chrome.error_indicator {
        out.push(format!("{}", control(indicator).yellow()));
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FileSet, InputFile, SessionId};
    use crate::provider::{Failure, PreviewResult, Renderable};
    use crate::session::{Appearance, ErrorRetention, SessionState, ViewState};

    fn snapshot(preview: PreviewResult, view: ViewState) -> Snapshot {
        let mut state = SessionState::new(
            SessionId::from_raw("code-kitchen-render"),
            FileSet::new(vec![InputFile::new("App.tsx", "x")]),
            view,
            ErrorRetention::default(),
        );
        state.preview = preview;
        let chrome = state.chrome(&Appearance {
            name: Some("Demo".into()),
            ..Default::default()
        });
        Snapshot::new(&state, chrome, Placement::InPlace)
    }

    fn plain(snapshot: &Snapshot) -> String {
        let ansi = regex::Regex::new("\x1b\\[[0-9;]*m").unwrap();
        ansi.replace_all(&render(snapshot), "").into_owned()
    }

    #[test]
    fn test_render_loading() {
        let text = plain(&snapshot(
            PreviewResult {
                bundling: true,
                ..Default::default()
            },
            ViewState::default(),
        ));
        assert!(text.starts_with("Demo data-dir=h data-show-code=true"));
        assert!(text.contains("[l] ⇅ Toggle Layout"));
        assert!(text.contains("code: App.tsx"));
        assert!(text.contains("loading..."));
    }

    #[test]
    fn test_render_error_overlay() {
        let text = plain(&snapshot(
            PreviewResult {
                renderable: None,
                error: Some(Failure::build("SyntaxError\n  at line 1")),
                bundling: false,
            },
            ViewState::default(),
        ));
        assert!(text.contains("data-show-error=true"));
        assert!(text.contains("  SyntaxError\n    at line 1"));
        assert!(text.contains("[e] ! This preview has errors. Click to show."));
    }

    #[test]
    fn test_render_truncates_output() {
        let output = (0..30).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let view = ViewState::default().apply(ViewAction::ToggleCodePanel);
        let text = plain(&snapshot(
            PreviewResult {
                renderable: Some(Renderable::new(output)),
                error: None,
                bundling: false,
            },
            view,
        ));
        assert!(text.contains("│ line 19"));
        assert!(!text.contains("│ line 20"));
        assert!(text.contains("10 more lines"));
        assert!(!text.contains("Toggle Layout"));
        assert!(!text.contains("code:"));
    }
}
