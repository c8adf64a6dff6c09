//! Visual styling utilities for the CLI.
//!
//! Color thresholds for battery values, table styling and section titles.

use owo_colors::OwoColorize;

use crate::cli::StyleMode;

// ============================================================================
// Color Thresholds
// ============================================================================

/// State-of-charge thresholds (percentage).
pub mod charge {
    pub const LOW: f64 = 20.0; // Red: < 20%
    pub const MEDIUM: f64 = 40.0; // Yellow: 20-40%
    // Green: >= 40%
}

/// State-of-health thresholds (percentage).
pub mod health {
    pub const POOR: f64 = 70.0; // Red: < 70%
    pub const FAIR: f64 = 85.0; // Yellow: 70-85%
    // Green: >= 85%
}

/// Prediction error (percentage points) above which the gap is highlighted.
pub const PREDICTION_GAP: f64 = 5.0;

// ============================================================================
// Colored Value Formatting
// ============================================================================

/// Placeholder for a missing value.
pub const MISSING: &str = "-";

fn banded(value: f64, low: f64, medium: f64, no_color: bool) -> String {
    let text = format!("{:.1}%", value);
    if no_color {
        text
    } else if value < low {
        format!("{}", text.red())
    } else if value < medium {
        format!("{}", text.yellow())
    } else {
        format!("{}", text.green())
    }
}

/// Format state of charge with appropriate color.
pub fn format_soc_colored(value: Option<f64>, no_color: bool) -> String {
    value.map_or_else(
        || MISSING.to_string(),
        |v| banded(v, charge::LOW, charge::MEDIUM, no_color),
    )
}

/// Format state of health with appropriate color.
pub fn format_soh_colored(value: Option<f64>, no_color: bool) -> String {
    value.map_or_else(
        || MISSING.to_string(),
        |v| banded(v, health::POOR, health::FAIR, no_color),
    )
}

/// Format an actual value, highlighting large gaps from the prediction.
pub fn format_actual_colored(actual: Option<f64>, predicted: Option<f64>, no_color: bool) -> String {
    let Some(actual) = actual else {
        return MISSING.to_string();
    };
    let text = format!("{:.1}", actual);
    match predicted {
        Some(p) if !no_color && (actual - p).abs() > PREDICTION_GAP => {
            format!("{}", text.yellow())
        }
        _ => text,
    }
}

/// Format a plain optional number.
pub fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{:.1}", v))
}

/// Format a warning line.
pub fn format_warning(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[!!] {}", message)
    } else {
        format!("{} {}", "[!!]".yellow(), message)
    }
}

// ============================================================================
// Section Headers
// ============================================================================

/// Format a title header.
pub fn format_title(title: &str, no_color: bool) -> String {
    let underline = "━".repeat(title.chars().count());
    if no_color {
        format!("{}\n{}", title, underline)
    } else {
        format!("{}\n{}", title.bold(), underline.dimmed())
    }
}

/// Format a `label: value` line with a dimmed label.
pub fn format_field(label: &str, value: &str, no_color: bool) -> String {
    if no_color {
        format!("{:<16}{}", format!("{}:", label), value)
    } else {
        format!("{:<16}{}", format!("{}:", label).dimmed(), value)
    }
}

// ============================================================================
// Tables
// ============================================================================

/// Get terminal width, defaulting to 80 if detection fails.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Apply the table border style for the given mode.
pub fn apply_table_style(table: &mut tabled::Table, style: StyleMode) {
    use tabled::settings::Style;
    match style {
        StyleMode::Rich | StyleMode::Minimal => {
            table.with(Style::rounded());
        }
        StyleMode::Plain => {
            table.with(Style::blank());
        }
    }
}
