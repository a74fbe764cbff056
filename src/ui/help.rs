use crate::ui::dialogs::centered_rect;
use crate::ui::theme::Palette;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const BOARD_KEYS: &[(&str, &str)] = &[
    ("j, ↓", "next task"),
    ("k, ↑", "previous task"),
    ("h, ←", "To Do column"),
    ("l, →", "Completed column"),
    ("a", "add task"),
    ("e", "edit task"),
    ("d", "delete task"),
    ("t", "toggle dark mode"),
    ("q", "quit"),
];

const TASK_KEYS: &[(&str, &str)] = &[
    ("s, Space", "start / stop stopwatch"),
    ("r", "reset stopwatch"),
    ("c", "mark completed"),
    ("m", "pick up / drop task"),
    ("  l / h", "carry over / away"),
    ("  Enter", "drop on Completed"),
    ("  Esc", "put back"),
    ("mouse", "drag a card to Completed"),
];

const FORM_KEYS: &[(&str, &str)] = &[
    ("Tab", "switch field"),
    ("Enter", "save (name field)"),
    ("Ctrl+S", "save"),
    ("Esc", "close without saving"),
    ("y / n", "answer a confirmation"),
];

/// Key binding overlay
pub fn render(f: &mut Frame, area: Rect, palette: &Palette) {
    let popup_area = centered_rect(80, 70, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keys (Esc or ? to close) ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(palette.background));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(inner);

    let sections = [
        ("Board", BOARD_KEYS),
        ("Tasks", TASK_KEYS),
        ("Forms", FORM_KEYS),
    ];
    for (i, (title, keys)) in sections.iter().enumerate() {
        let borders = if i + 1 < sections.len() { Borders::RIGHT } else { Borders::NONE };
        let widget = Paragraph::new(section_lines(title, keys, palette))
            .block(
                Block::default()
                    .borders(borders)
                    .border_style(Style::default().fg(palette.border)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(widget, columns[i]);
    }
}

fn section_lines(title: &str, keys: &[(&str, &str)], palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(palette.done).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(keys.iter().map(|(key, action)| {
        Line::from(vec![
            Span::styled(format!(" {:<10}", key), Style::default().fg(palette.accent)),
            Span::styled(action.to_string(), Style::default().fg(palette.text)),
        ])
    }));
    lines
}
