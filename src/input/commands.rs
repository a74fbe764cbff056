/// Board commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // ===== Exit =====
    Quit,

    // ===== Navigation =====
    /// Select the previous task
    TaskUp,
    /// Select the next task
    TaskDown,
    /// Focus the To Do column (while dragging: move off the Completed column)
    ColumnLeft,
    /// Focus the Completed column (while dragging: hover over it)
    ColumnRight,

    // ===== Task operations =====
    /// Open the form for a new task
    NewTask,
    /// Open the form for the selected pending task
    EditTask,
    /// Ask to delete the selected task
    DeleteTask,
    /// Move the selected pending task to Completed
    CompleteTask,

    // ===== Stopwatch =====
    /// Start or stop the selected task's stopwatch
    ToggleStopwatch,
    /// Zero the selected task's stopwatch
    ResetStopwatch,

    // ===== Keyboard drag =====
    /// Pick up the selected task, or drop / put back the one being carried
    PickUpOrDrop,
    /// Drop the carried task if it's over Completed
    Drop,
    /// Put the carried task back / close overlays
    Cancel,

    // ===== Display =====
    ToggleDarkMode,
    ShowHelp,
}
