use crate::app::{App, Mode, NotificationLevel};
use crate::error::TrackerError;
use crate::input::Command;
use crate::models::{CollectionKind, Task};
use crate::transfer::{attempt_transfer, TransferOutcome};
use crate::ui::dialogs::{ConfirmAction, DialogType, FormPurpose, TaskForm};
use crate::ui::text_input::InputAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

/// Handle a key press. Returns false when the app should exit.
pub fn handle_key_input(app: &mut App, key: KeyEvent) -> bool {
    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Dialog => handle_dialog_mode(app, key),
        Mode::Help => handle_help_mode(app, key),
    }
}

/// Board key bindings
pub fn match_key(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Char('j') | KeyCode::Down => Some(Command::TaskDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Command::TaskUp),
        KeyCode::Char('h') | KeyCode::Left => Some(Command::ColumnLeft),
        KeyCode::Char('l') | KeyCode::Right => Some(Command::ColumnRight),
        KeyCode::Char('a') => Some(Command::NewTask),
        KeyCode::Char('e') => Some(Command::EditTask),
        KeyCode::Char('d') | KeyCode::Delete => Some(Command::DeleteTask),
        KeyCode::Char('c') => Some(Command::CompleteTask),
        KeyCode::Char('s') | KeyCode::Char(' ') => Some(Command::ToggleStopwatch),
        KeyCode::Char('r') => Some(Command::ResetStopwatch),
        KeyCode::Char('m') => Some(Command::PickUpOrDrop),
        KeyCode::Enter => Some(Command::Drop),
        KeyCode::Esc => Some(Command::Cancel),
        KeyCode::Char('t') => Some(Command::ToggleDarkMode),
        KeyCode::Char('?') => Some(Command::ShowHelp),
        _ => None,
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) -> bool {
    let Some(cmd) = match_key(key) else {
        return true;
    };

    if cmd == Command::Quit {
        return false;
    }

    if app.transfer.dragging().is_some() {
        execute_carry_command(app, cmd);
    } else {
        execute_command(app, cmd);
    }
    app.clamp_selection();
    true
}

/// Commands while a task is picked up with `m`. Only moving, dropping and
/// putting back apply.
fn execute_carry_command(app: &mut App, cmd: Command) {
    match cmd {
        Command::ColumnRight => app.transfer.drag_over(true),
        Command::ColumnLeft => app.transfer.drag_over(false),
        Command::PickUpOrDrop | Command::Drop => {
            if app.transfer.is_over() {
                drop_carried_task(app);
            } else {
                app.transfer.cancel();
                app.show_notification(
                    "Move over Completed (l) before dropping".to_string(),
                    NotificationLevel::Info,
                );
            }
        }
        Command::Cancel => app.transfer.cancel(),
        Command::ShowHelp => app.mode = Mode::Help,
        _ => {}
    }
}

/// Finish a drag gesture on the completed column
pub(crate) fn drop_carried_task(app: &mut App) {
    match app.transfer.drop_on_completed(&mut app.tracker) {
        TransferOutcome::Transferred(task) => {
            app.select_task(task.id);
            app.show_notification(
                format!("'{}' completed", task.project_name),
                NotificationLevel::Success,
            );
        }
        TransferOutcome::NotPending(id) => {
            tracing::debug!(target: "input", "dropped task {} was no longer pending", id);
        }
        TransferOutcome::NoDrag => {}
    }
}

fn execute_command(app: &mut App, cmd: Command) {
    match cmd {
        Command::Quit => {}
        Command::TaskDown => app.select_next(),
        Command::TaskUp => app.select_prev(),
        Command::ColumnLeft => app.focus_column(CollectionKind::Pending),
        Command::ColumnRight => app.focus_column(CollectionKind::Completed),
        Command::NewTask => {
            app.dialog = Some(DialogType::TaskForm(TaskForm::create()));
            app.mode = Mode::Dialog;
        }
        Command::EditTask => {
            let Some(task) = selected_pending(app) else {
                return;
            };
            let form = TaskForm::edit(task);
            app.dialog = Some(DialogType::TaskForm(form));
            app.mode = Mode::Dialog;
        }
        Command::DeleteTask => {
            let from = app.selected_column;
            let Some(task) = app.selected_task() else {
                return;
            };
            let message = format!("Delete '{}'? This cannot be undone.", task.project_name);
            let action = ConfirmAction::DeleteTask { id: task.id, from };
            app.dialog = Some(DialogType::Confirm {
                title: "Delete Task".to_string(),
                message,
                yes_selected: false,
                action,
            });
            app.mode = Mode::Dialog;
        }
        Command::CompleteTask => {
            let Some(id) = selected_pending(app).map(|t| t.id) else {
                return;
            };
            if let TransferOutcome::Transferred(task) = attempt_transfer(&mut app.tracker, id) {
                app.show_notification(
                    format!("'{}' completed", task.project_name),
                    NotificationLevel::Success,
                );
            }
        }
        Command::ToggleStopwatch => {
            let Some(id) = selected_pending(app).map(|t| t.id) else {
                return;
            };
            if let Some(stopwatch) = app.tracker.stopwatch_mut(id) {
                let running = stopwatch.toggle(Instant::now());
                tracing::debug!(target: "input", "stopwatch of task {} running={}", id, running);
            }
        }
        Command::ResetStopwatch => {
            let Some(id) = selected_pending(app).map(|t| t.id) else {
                return;
            };
            if let Some(stopwatch) = app.tracker.stopwatch_mut(id) {
                stopwatch.reset(Instant::now());
            }
        }
        Command::PickUpOrDrop => {
            let Some(id) = selected_pending(app).map(|t| t.id) else {
                return;
            };
            app.transfer.begin_drag(&app.tracker, id);
        }
        Command::Drop | Command::Cancel => {}
        Command::ToggleDarkMode => {
            app.tracker.toggle_dark_mode();
        }
        Command::ShowHelp => app.mode = Mode::Help,
    }
}

/// Selected task when the To Do column has focus. Tells the user otherwise.
fn selected_pending(app: &mut App) -> Option<&Task> {
    if app.selected_column != CollectionKind::Pending {
        if !app.tracker.completed().is_empty() {
            app.show_notification(
                "Completed tasks can only be deleted".to_string(),
                NotificationLevel::Info,
            );
        }
        return None;
    }
    app.selected_task()
}

fn handle_dialog_mode(app: &mut App, key: KeyEvent) -> bool {
    match app.dialog {
        Some(DialogType::TaskForm(_)) => handle_form_key(app, key),
        Some(DialogType::Confirm { .. }) => handle_confirm_key(app, key),
        None => app.mode = Mode::Normal,
    }
    true
}

fn close_dialog(app: &mut App) {
    app.dialog = None;
    app.mode = Mode::Normal;
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    let Some(DialogType::TaskForm(form)) = app.dialog.as_mut() else {
        return;
    };

    match form.focused_field().handle_key(key) {
        InputAction::Continue => {
            if form.error.is_some() && Task::is_valid_name(&form.project_name.content()) {
                form.error = None;
            }
        }
        InputAction::NextField => form.switch_focus(),
        InputAction::Cancel => close_dialog(app),
        InputAction::Submit => submit_form(app),
    }
}

fn submit_form(app: &mut App) {
    let Some(DialogType::TaskForm(form)) = app.dialog.as_ref() else {
        return;
    };
    let purpose = form.purpose;
    let project_name = form.project_name.content();
    let task_description = form.description.content();

    let result = match purpose {
        FormPurpose::Create => app.tracker.create(&project_name, &task_description),
        FormPurpose::Edit(id) => app.tracker.edit(id, &project_name, &task_description),
    };

    match result {
        Ok(task) => {
            close_dialog(app);
            app.select_task(task.id);
            let verb = match purpose {
                FormPurpose::Create => "added",
                FormPurpose::Edit(_) => "updated",
            };
            app.show_notification(
                format!("'{}' {}", task.project_name, verb),
                NotificationLevel::Success,
            );
        }
        Err(TrackerError::Validation) => {
            if let Some(DialogType::TaskForm(form)) = app.dialog.as_mut() {
                form.error = Some(TrackerError::Validation.to_string());
            }
        }
        Err(e) => {
            tracing::warn!(target: "input", "task form rejected: {}", e);
            close_dialog(app);
            app.show_notification(e.to_string(), NotificationLevel::Error);
        }
    }
}

fn handle_confirm_key(app: &mut App, key: KeyEvent) {
    let Some(DialogType::Confirm { yes_selected, action, .. }) = app.dialog.as_mut() else {
        return;
    };

    let confirmed = match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => true,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
        KeyCode::Enter => *yes_selected,
        KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
            *yes_selected = !*yes_selected;
            return;
        }
        _ => return,
    };

    let action = action.clone();
    close_dialog(app);
    if confirmed {
        execute_confirm_action(app, action);
    }
}

fn execute_confirm_action(app: &mut App, action: ConfirmAction) {
    match action {
        ConfirmAction::DeleteTask { id, from } => {
            if let Some(task) = app.tracker.delete(id, from) {
                app.clamp_selection();
                app.show_notification(
                    format!("'{}' deleted", task.project_name),
                    NotificationLevel::Success,
                );
            }
        }
    }
}

fn handle_help_mode(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
            app.mode = Mode::Normal;
        }
        _ => {}
    }
    true
}
