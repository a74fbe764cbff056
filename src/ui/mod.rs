mod board;
pub mod dialogs;
mod help;
mod statusbar;
pub mod text_input;
pub mod theme;

use crate::app::{App, Mode, Notification, NotificationLevel};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use theme::Palette;

/// Draw one frame
pub fn render(f: &mut Frame, app: &mut App) {
    let palette = Palette::for_mode(app.tracker.dark_mode());

    f.render_widget(
        Block::default().style(Style::default().bg(palette.background)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(0),    // board
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    render_header(f, chunks[0], &palette);
    board::render(f, chunks[1], app, &palette);
    statusbar::render(f, chunks[2], app, &palette);

    if let Some(dialog) = app.dialog.as_mut() {
        dialogs::render_dialog(f, dialog, &palette);
    }

    if app.mode == Mode::Help {
        help::render(f, f.area(), &palette);
    }

    if let Some(ref notification) = app.notification {
        render_notification(f, f.area(), notification, &palette);
    }
}

fn render_header(f: &mut Frame, area: Rect, palette: &Palette) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Task Tracker ",
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled("a: add  m: move  ?: help", Style::default().fg(palette.muted)),
    ]))
    .alignment(Alignment::Left)
    .style(Style::default().bg(palette.surface));
    f.render_widget(header, area);
}

/// Notification bar over the top three rows
fn render_notification(f: &mut Frame, area: Rect, notification: &Notification, palette: &Palette) {
    let notification_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: area.height.min(3),
    };

    let (color, prefix) = match notification.level {
        NotificationLevel::Info => (palette.accent, "ℹ"),
        NotificationLevel::Success => (palette.done, "✓"),
        NotificationLevel::Warning => (palette.muted, "⚠"),
        NotificationLevel::Error => (palette.danger, "✗"),
    };

    let content = Line::from(vec![
        Span::styled(
            format!(" {} ", prefix),
            Style::default()
                .fg(palette.background)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(notification.message.as_str(), Style::default().fg(palette.text)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(palette.surface));

    f.render_widget(Paragraph::new(content).block(block), notification_area);
}
