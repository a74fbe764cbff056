use crate::app::{App, Mode};
use crate::ui::theme::Palette;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Bottom line: mode, drag state, counts and display flags
pub fn render(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let (mode_text, mode_color) = match (app.mode, app.transfer.dragging()) {
        (Mode::Normal, Some(_)) => ("CARRY", palette.done),
        (Mode::Normal, None) => ("NORMAL", palette.accent),
        (Mode::Dialog, _) => ("DIALOG", palette.muted),
        (Mode::Help, _) => ("HELP", palette.muted),
    };

    let mut spans = vec![Span::styled(
        format!(" {} ", mode_text),
        Style::default()
            .fg(palette.background)
            .bg(mode_color)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(id) = app.transfer.dragging() {
        let name = app
            .tracker
            .find(id)
            .map(|(_, task)| task.project_name.as_str())
            .unwrap_or("?");
        let target = if app.transfer.is_over() {
            "release to complete"
        } else {
            "l: over Completed, Enter: drop, Esc: cancel"
        };
        spans.push(Span::styled(
            format!(" carrying '{}' ({}) ", name, target),
            Style::default().fg(palette.done),
        ));
    }

    spans.push(Span::styled(
        format!(
            " {} to do | {} completed ",
            app.tracker.pending().len(),
            app.tracker.completed().len()
        ),
        Style::default().fg(palette.text),
    ));

    if app.tracker.any_stopwatch_running() {
        spans.push(Span::styled(" ⏱ timing ", Style::default().fg(palette.done)));
    }
    if app.tracker.dark_mode() {
        spans.push(Span::styled(" dark ", Style::default().fg(palette.muted)));
    }
    if app.tracker.is_degraded() {
        spans.push(Span::styled(
            " NOT SAVED ",
            Style::default()
                .fg(palette.background)
                .bg(palette.danger)
                .add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::styled(" ? help ", Style::default().fg(palette.muted)));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.surface));
    f.render_widget(paragraph, area);
}
