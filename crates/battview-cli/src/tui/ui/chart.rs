//! Stacked sparkline chart for the visible window.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Sparkline};

use battview_types::Metric;

use super::theme::{AppTheme, BORDER_TYPE};
use super::widgets::{latest, resample_sparkline_data, sparkline_values};
use crate::tui::app::App;

pub fn draw_chart(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let snapshot = app.snapshot();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_style())
        .title(Span::styled(
            format!(" Chart ({}) ", snapshot.granularity),
            theme.title_style(),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let metrics = app.series.metrics();
    if snapshot.rows.is_empty() || metrics.is_empty() {
        let message = if app.loading {
            "Loading..."
        } else if metrics.is_empty() {
            "All series hidden (1/2/3 to show)"
        } else {
            "No records in range"
        };
        let text = Paragraph::new(message)
            .style(Style::default().fg(theme.text_muted))
            .alignment(Alignment::Center);
        frame.render_widget(text, inner);
        return;
    }

    let [plots, axis] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);
    let rows = Layout::vertical(vec![Constraint::Ratio(1, metrics.len() as u32); metrics.len()])
        .split(plots);

    for (metric, row) in metrics.iter().zip(rows.iter()) {
        draw_series(frame, *row, app, *metric, theme);
    }

    // First and last label of the window under the plots
    if let (Some(first), Some(last)) = (snapshot.rows.first(), snapshot.rows.last()) {
        let axis_line = Line::from(vec![
            Span::styled(first.display_time.clone(), Style::default().fg(theme.text_muted)),
            Span::raw(" ".repeat(
                (axis.width as usize)
                    .saturating_sub(first.display_time.len() + last.display_time.len()),
            )),
            Span::styled(last.display_time.clone(), Style::default().fg(theme.text_muted)),
        ]);
        frame.render_widget(Paragraph::new(axis_line), axis);
    }
}

fn draw_series(frame: &mut Frame, area: Rect, app: &App, metric: Metric, theme: &AppTheme) {
    let series = app.snapshot().series(metric);
    let label = match latest(&series) {
        Some(v) => format!("{} {:.1}", metric.label(), v),
        None => format!("{} -", metric.label()),
    };

    let [name, plot] =
        Layout::horizontal([Constraint::Length(16), Constraint::Min(1)]).areas(area);
    frame.render_widget(
        Paragraph::new(label).style(Style::default().fg(theme.series_color(metric))),
        name,
    );

    let data = resample_sparkline_data(&sparkline_values(&series), plot.width as usize);
    let sparkline = Sparkline::default()
        .data(&data)
        .max(100)
        .style(Style::default().fg(theme.series_color(metric)));
    frame.render_widget(sparkline, plot);
}
