use crate::app::{App, BoardLayout};
use crate::models::{CollectionKind, Task, TaskId};
use crate::ui::theme::Palette;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// Card height including borders
fn card_height(kind: CollectionKind) -> u16 {
    match kind {
        CollectionKind::Pending => 6,
        CollectionKind::Completed => 5,
    }
}

/// Render both columns and record their areas for mouse hit-testing
pub fn render(f: &mut Frame, area: Rect, app: &mut App, palette: &Palette) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mut layout = BoardLayout {
        pending: columns[0],
        completed: columns[1],
        cards: Vec::new(),
    };

    render_column(f, columns[0], CollectionKind::Pending, app, palette, &mut layout);
    render_column(f, columns[1], CollectionKind::Completed, app, palette, &mut layout);

    app.layout = layout;
}

fn render_column(
    f: &mut Frame,
    area: Rect,
    kind: CollectionKind,
    app: &App,
    palette: &Palette,
    layout: &mut BoardLayout,
) {
    let tasks = app.tracker.collection(kind);
    let is_focused = app.selected_column == kind;
    let hovered = kind == CollectionKind::Completed && app.transfer.is_over();

    let column_color = match kind {
        CollectionKind::Pending => palette.accent,
        CollectionKind::Completed => palette.done,
    };
    let (border_color, title_style) = if hovered {
        (
            palette.done,
            Style::default()
                .fg(palette.background)
                .bg(palette.done)
                .add_modifier(Modifier::BOLD),
        )
    } else if is_focused {
        (
            column_color,
            Style::default().fg(column_color).add_modifier(Modifier::BOLD),
        )
    } else {
        (palette.border, Style::default().fg(palette.muted))
    };

    let block = Block::default()
        .title(format!(" {} ({}) ", kind.display(), tasks.len()))
        .title_alignment(Alignment::Center)
        .title_style(title_style)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .border_type(if hovered { BorderType::Double } else { BorderType::Rounded })
        .style(Style::default().bg(palette.background));

    let inner = block.inner(area);
    f.render_widget(block, area);

    if tasks.is_empty() {
        let empty = Paragraph::new(vec![Line::from(""), Line::from(empty_hint(kind, hovered))])
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.muted));
        f.render_widget(empty, inner);
        return;
    }

    let height = card_height(kind);
    let visible = (inner.height / height).max(1) as usize;
    let selected = app.selected_index.get(&kind).copied().unwrap_or(0);
    // Scroll so the selected card stays on screen
    let offset = selected.saturating_sub(visible - 1);

    for (slot, (index, task)) in tasks.iter().enumerate().skip(offset).take(visible).enumerate() {
        let card_area = Rect {
            x: inner.x,
            y: inner.y + slot as u16 * height,
            width: inner.width,
            height: height.min(inner.height.saturating_sub(slot as u16 * height)),
        };
        if card_area.height == 0 {
            break;
        }

        let is_selected = is_focused && index == selected;
        let is_dragged = app.transfer.dragging() == Some(task.id);
        render_card(f, card_area, kind, task, is_selected, is_dragged, app, palette);
        layout.cards.push((task.id, card_area));
    }

    if tasks.len() > offset + visible {
        let more = Paragraph::new(format!("+{} more", tasks.len() - offset - visible))
            .alignment(Alignment::Right)
            .style(Style::default().fg(palette.muted));
        let bottom = Rect {
            y: area.y + area.height.saturating_sub(1),
            height: 1,
            x: area.x + 1,
            width: area.width.saturating_sub(3),
        };
        f.render_widget(more, bottom);
    }
}

/// Placeholder for a column without tasks
fn empty_hint(kind: CollectionKind, hovered: bool) -> &'static str {
    match kind {
        CollectionKind::Pending => "No tasks yet. Add a new task to get started!",
        CollectionKind::Completed if hovered => "Drop task here!",
        CollectionKind::Completed => "Nothing completed yet. Drag a task here.",
    }
}

#[allow(clippy::too_many_arguments)]
fn render_card(
    f: &mut Frame,
    area: Rect,
    kind: CollectionKind,
    task: &Task,
    is_selected: bool,
    is_dragged: bool,
    app: &App,
    palette: &Palette,
) {
    let (bg, border) = if is_selected {
        (palette.selection_bg, palette.accent)
    } else {
        (palette.surface, palette.border)
    };

    let mut text_style = Style::default().fg(palette.text);
    let mut muted_style = Style::default().fg(palette.muted);
    if is_dragged {
        text_style = text_style.add_modifier(Modifier::DIM);
        muted_style = muted_style.add_modifier(Modifier::DIM);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if is_dragged { BorderType::Thick } else { BorderType::Rounded })
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(bg));

    let description = task
        .task_description
        .lines()
        .next()
        .unwrap_or_default()
        .to_string();

    let stamp_label = match kind {
        CollectionKind::Pending => "Created:",
        CollectionKind::Completed => "Completed:",
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                if is_selected { "▶ " } else { "  " },
                Style::default().fg(palette.accent),
            ),
            Span::styled(
                task.project_name.clone(),
                text_style.add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(format!("  {}", description), text_style)),
        Line::from(vec![
            Span::styled(format!("  {} ", stamp_label), muted_style),
            Span::styled(task.timestamp.clone(), muted_style),
        ]),
    ];

    if kind == CollectionKind::Pending {
        lines.push(stopwatch_line(app, task.id, palette));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn stopwatch_line(app: &App, id: TaskId, palette: &Palette) -> Line<'static> {
    let Some(stopwatch) = app.tracker.stopwatch(id) else {
        return Line::from("");
    };

    let (state, color) = if stopwatch.is_running() {
        ("● running", palette.done)
    } else {
        ("■ stopped", palette.muted)
    };

    Line::from(vec![
        Span::raw("  "),
        Span::styled(
            stopwatch.display(),
            Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(state, Style::default().fg(color)),
    ])
}
