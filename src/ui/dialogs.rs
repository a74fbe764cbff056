use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::text_input::TextField;
use super::theme::Palette;
use crate::models::{CollectionKind, Task, TaskId};

/// Action behind a confirmation dialog
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    DeleteTask { id: TaskId, from: CollectionKind },
}

/// What submitting the task form does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPurpose {
    Create,
    Edit(TaskId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    ProjectName,
    Description,
}

/// Add / edit form
pub struct TaskForm {
    pub purpose: FormPurpose,
    pub project_name: TextField,
    pub description: TextField,
    pub focus: FormField,
    /// Inline validation message
    pub error: Option<String>,
}

impl TaskForm {
    pub fn create() -> Self {
        Self {
            purpose: FormPurpose::Create,
            project_name: TextField::new("", false),
            description: TextField::new("", true),
            focus: FormField::ProjectName,
            error: None,
        }
    }

    pub fn edit(task: &Task) -> Self {
        Self {
            purpose: FormPurpose::Edit(task.id),
            project_name: TextField::new(&task.project_name, false),
            description: TextField::new(&task.task_description, true),
            focus: FormField::ProjectName,
            error: None,
        }
    }

    pub fn focused_field(&mut self) -> &mut TextField {
        match self.focus {
            FormField::ProjectName => &mut self.project_name,
            FormField::Description => &mut self.description,
        }
    }

    pub fn switch_focus(&mut self) {
        self.focus = match self.focus {
            FormField::ProjectName => FormField::Description,
            FormField::Description => FormField::ProjectName,
        };
    }

    fn title(&self) -> &'static str {
        match self.purpose {
            FormPurpose::Create => "Add New Task",
            FormPurpose::Edit(_) => "Edit Task",
        }
    }
}

/// Dialog types
pub enum DialogType {
    TaskForm(TaskForm),
    Confirm {
        title: String,
        message: String,
        yes_selected: bool,
        action: ConfirmAction,
    },
}

/// Render the dialog centred over the board
pub fn render_dialog(f: &mut Frame, dialog: &mut DialogType, palette: &Palette) {
    let area = match dialog {
        DialogType::TaskForm(_) => centered_rect(60, 60, f.area()),
        DialogType::Confirm { .. } => centered_rect(50, 30, f.area()),
    };

    f.render_widget(Clear, area);

    match dialog {
        DialogType::TaskForm(form) => render_task_form(f, area, form, palette),
        DialogType::Confirm {
            title,
            message,
            yes_selected,
            ..
        } => render_confirm_dialog(f, area, title, message, *yes_selected, palette),
    }
}

fn render_task_form(f: &mut Frame, area: Rect, form: &mut TaskForm, palette: &Palette) {
    let block = Block::default()
        .title(format!("  {}  ", form.title()))
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(palette.background));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // project name
            Constraint::Length(1), // validation message
            Constraint::Min(4),    // description
            Constraint::Length(1), // hints
        ])
        .split(inner);

    let focus = form.focus;
    render_field(
        f,
        chunks[0],
        "Project Name",
        &mut form.project_name,
        focus == FormField::ProjectName,
        palette,
    );

    if let Some(error) = &form.error {
        let message = Paragraph::new(error.as_str()).style(Style::default().fg(palette.danger));
        f.render_widget(message, chunks[1]);
    }

    render_field(
        f,
        chunks[2],
        "Task Description",
        &mut form.description,
        focus == FormField::Description,
        palette,
    );

    let action = match form.purpose {
        FormPurpose::Create => "Add",
        FormPurpose::Edit(_) => "Update",
    };
    let hints = Line::from(vec![
        Span::styled("Tab", Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)),
        Span::raw(" switch field  "),
        Span::styled("Ctrl+S", Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {}  ", action)),
        Span::styled("Esc", Style::default().fg(palette.danger).add_modifier(Modifier::BOLD)),
        Span::raw(" close"),
    ]);
    f.render_widget(
        Paragraph::new(hints)
            .style(Style::default().fg(palette.muted))
            .alignment(Alignment::Center),
        chunks[3],
    );
}

fn render_field(
    f: &mut Frame,
    area: Rect,
    label: &str,
    field: &mut TextField,
    focused: bool,
    palette: &Palette,
) {
    let border = if focused { palette.accent } else { palette.border };
    let block = Block::default()
        .title(format!(" {} ", label))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(palette.surface));

    let inner = block.inner(area);
    f.render_widget(block, area);
    field.render(f, inner, focused, palette);
}

fn render_confirm_dialog(
    f: &mut Frame,
    area: Rect,
    title: &str,
    message: &str,
    yes_selected: bool,
    palette: &Palette,
) {
    let block = Block::default()
        .title(format!("  {}  ", title))
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.danger))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(palette.background));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(inner);

    let message_text = Paragraph::new(message)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .style(Style::default().fg(palette.text));
    f.render_widget(message_text, chunks[0]);

    let button_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(chunks[1]);

    let no_style = if !yes_selected {
        Style::default()
            .bg(palette.muted)
            .fg(palette.background)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.muted)
    };
    f.render_widget(
        Paragraph::new("[ n ] Cancel")
            .style(no_style)
            .alignment(Alignment::Center),
        button_chunks[1],
    );

    let yes_style = if yes_selected {
        Style::default()
            .bg(palette.danger)
            .fg(palette.background)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.danger)
    };
    f.render_widget(
        Paragraph::new("[ y ] Delete")
            .style(yes_style)
            .alignment(Alignment::Center),
        button_chunks[2],
    );
}

/// Centred rectangle taking the given percentages of `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
