//! Rendering for the dashboard.

mod chart;
pub mod theme;
pub mod widgets;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};

use battview_types::Telemetry;

use self::theme::{AppTheme, BORDER_TYPE};
use super::app::{App, StatusLevel, ViewSnapshot};

/// Draw the whole dashboard.
pub fn draw(frame: &mut Frame, app: &App) {
    let theme = AppTheme::default();
    let [header, chart, records, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(8),
        Constraint::Length(12),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(frame, header, app, &theme);
    chart::draw_chart(frame, chart, app, &theme);
    draw_records(frame, records, app, &theme);
    draw_status(frame, status, app, &theme);

    if app.show_help {
        draw_help(frame, &theme);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let line = Line::from(vec![
        Span::styled(" battview ", theme.title_style()),
        Span::styled(
            format!("{} ", app.source_label),
            Style::default().fg(theme.text_primary),
        ),
        Span::styled(
            format!("| {} | {} ", app.date_label(), app.time_label()),
            Style::default().fg(theme.text_secondary),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).style(theme.header_style()), area);
}

fn value_cell(value: Option<f64>) -> Cell<'static> {
    Cell::from(value.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v)))
}

fn telemetry_cells(t: &Telemetry) -> [Cell<'static>; 4] {
    [
        value_cell(t.soc),
        value_cell(t.soh),
        value_cell(t.predicted),
        value_cell(t.actual),
    ]
}

fn draw_records(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let snapshot = app.snapshot();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_style())
        .title(Span::styled(" Records ", theme.title_style()));

    let header = Row::new(["Label", "Timestamp", "SoC", "SoH", "Pred", "Actual"])
        .style(Style::default().fg(theme.text_secondary));

    // Show the tail of the window when the table is shorter than it
    let visible_rows = usize::from(area.height.saturating_sub(3));
    let skip = snapshot.rows.len().saturating_sub(visible_rows);
    let rows = snapshot.rows.iter().skip(skip).map(|row| {
        let mut cells = vec![
            Cell::from(row.display_time.clone()),
            Cell::from(row.time.clone()),
        ];
        cells.extend(telemetry_cells(&row.telemetry));
        Row::new(cells)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Min(20),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(block);
    frame.render_widget(table, area);
}

/// `[start-end/total]`, one-based.
fn window_indicator(snapshot: &ViewSnapshot) -> String {
    if snapshot.total == 0 {
        return "[0/0]".to_string();
    }
    let window = snapshot.window;
    format!("[{}-{}/{}]", window.start + 1, window.end, snapshot.total)
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let snapshot = app.snapshot();
    let line = match app.status() {
        Some(status) => {
            let color = match status.level {
                StatusLevel::Info => theme.success,
                StatusLevel::Error => theme.danger,
            };
            Line::from(Span::styled(status.text.clone(), Style::default().fg(color)))
        }
        None => {
            let mut spans = vec![
                Span::styled(
                    format!("{}  ", window_indicator(snapshot)),
                    Style::default().fg(theme.text_primary),
                ),
                Span::styled(
                    format!(
                        "offset {}/{}  size {}  ",
                        snapshot.window.clamped_offset,
                        snapshot.window.max_offset,
                        snapshot.window.size
                    ),
                    Style::default().fg(theme.text_secondary),
                ),
            ];
            if snapshot.parse_failures > 0 {
                spans.push(Span::styled(
                    format!("{} unrecognized  ", snapshot.parse_failures),
                    Style::default().fg(theme.warning),
                ));
            }
            spans.push(Span::styled(
                "? help  q quit",
                Style::default().fg(theme.text_muted),
            ));
            Line::from(spans)
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}

const HELP_LINES: &[(&str, &str)] = &[
    ("←/h  →/l", "Scroll by a quarter window"),
    ("Home/g  End/G", "Jump to start / end"),
    ("+/=  -", "Zoom in / out"),
    ("Z", "Zoom out by the large step"),
    ("d", "Cycle date range"),
    ("t", "Cycle time of day"),
    ("1 2 3", "Toggle SoC, SoH, predicted/actual"),
    ("r", "Reload source"),
    ("?", "Close help"),
    ("q", "Quit"),
];

fn draw_help(frame: &mut Frame, theme: &AppTheme) {
    let area = centered_rect(50, HELP_LINES.len() as u16 + 2, frame.area());
    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{:<16}", keys), theme.title_style()),
                Span::styled(*what, Style::default().fg(theme.text_primary)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(Style::default().fg(theme.border_active))
        .title(Span::styled(" Help ", theme.title_style()));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
