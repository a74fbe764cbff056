use crate::app::{App, Mode};
use crate::input::keyboard::drop_carried_task;
use crate::models::CollectionKind;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

/// Mouse drag and drop on the board.
///
/// Press on a To Do card picks it up, dragging over the Completed column
/// raises the hover signal and releasing there completes the task. Releasing
/// anywhere else puts it back.
pub fn handle_mouse_input(app: &mut App, mouse: MouseEvent) {
    if app.mode != Mode::Normal {
        return;
    }

    let (x, y) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(id) = app.layout.card_at(x, y) {
                app.select_task(id);
                if app.selected_column == CollectionKind::Pending {
                    app.transfer.begin_drag(&app.tracker, id);
                }
            } else if let Some(column) = app.layout.column_at(x, y) {
                app.focus_column(column);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let over = app.layout.column_at(x, y) == Some(CollectionKind::Completed);
            app.transfer.drag_over(over);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if app.transfer.dragging().is_none() {
                return;
            }
            let over = app.layout.column_at(x, y) == Some(CollectionKind::Completed);
            app.transfer.drag_over(over);
            if app.transfer.is_over() {
                drop_carried_task(app);
                app.clamp_selection();
            } else {
                app.transfer.cancel();
            }
        }
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::ScrollUp => app.select_prev(),
        _ => {}
    }
}
