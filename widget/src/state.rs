//! Widget lifecycle state.

/// Lifecycle of a mounted widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    /// Tasks are being spawned.
    Mounting,
    /// Refreshing rates and accepting events.
    Running,
    /// Tearing down; no new events accepted.
    Unmounting,
    /// Torn down.
    Unmounted,
}

impl WidgetState {
    /// Check if the widget accepts user events.
    pub fn accepts_events(&self) -> bool {
        matches!(self, WidgetState::Running)
    }

    /// Check if the widget is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WidgetState::Unmounted)
    }
}
