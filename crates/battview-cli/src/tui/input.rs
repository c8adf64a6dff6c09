//! Keyboard input handling for the dashboard.
//!
//! Keys map to an [`Action`]; [`apply_action`] changes the [`App`] and
//! returns a [`Command`] when the loader has to do something.

use battview_types::Metric;
use crossterm::event::KeyCode;

use super::app::App;
use super::messages::Command;

/// User actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollLeft,
    ScrollRight,
    ScrollStart,
    ScrollEnd,
    ZoomIn,
    ZoomOut,
    /// Zoom out by the large step.
    ZoomOutLarge,
    CycleDatePreset,
    CycleTimePreset,
    ToggleSeries(Metric),
    Reload,
    ToggleHelp,
    None,
}

/// Map a key to an action.
///
/// While the help overlay is shown, any key other than quit closes it.
pub fn handle_key(key: KeyCode, show_help: bool) -> Action {
    if show_help {
        return match key {
            KeyCode::Char('q') => Action::Quit,
            _ => Action::ToggleHelp,
        };
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Left | KeyCode::Char('h') => Action::ScrollLeft,
        KeyCode::Right | KeyCode::Char('l') => Action::ScrollRight,
        KeyCode::Home | KeyCode::Char('g') => Action::ScrollStart,
        KeyCode::End | KeyCode::Char('G') => Action::ScrollEnd,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::ZoomIn,
        KeyCode::Char('-') => Action::ZoomOut,
        KeyCode::Char('Z') => Action::ZoomOutLarge,
        KeyCode::Char('d') => Action::CycleDatePreset,
        KeyCode::Char('t') => Action::CycleTimePreset,
        KeyCode::Char('1') => Action::ToggleSeries(Metric::StateOfCharge),
        KeyCode::Char('2') => Action::ToggleSeries(Metric::StateOfHealth),
        KeyCode::Char('3') => Action::ToggleSeries(Metric::Predicted),
        KeyCode::Char('r') => Action::Reload,
        KeyCode::Char('?') => Action::ToggleHelp,
        _ => Action::None,
    }
}

/// Apply an action to the app.
pub fn apply_action(app: &mut App, action: Action) -> Option<Command> {
    match action {
        Action::Quit => app.quit(),
        Action::ScrollLeft => app.scroll_left(),
        Action::ScrollRight => app.scroll_right(),
        Action::ScrollStart => app.scroll_to_start(),
        Action::ScrollEnd => app.scroll_to_end(),
        Action::ZoomIn => app.zoom_in(),
        Action::ZoomOut => app.zoom_out(),
        Action::ZoomOutLarge => app.zoom_out_large(),
        Action::CycleDatePreset => app.cycle_date_preset(),
        Action::CycleTimePreset => app.cycle_time_preset(),
        Action::ToggleSeries(metric) => app.toggle_series(metric),
        Action::Reload => return Some(app.request_reload()),
        Action::ToggleHelp => app.show_help = !app.show_help,
        Action::None => {}
    }
    None
}
