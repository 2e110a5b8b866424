/// Lifecycle of a [`crate::FrameLoop`].
///
/// `Uninitialized → Initializing → Running ⇄ Resizing → ShuttingDown → Terminated`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Uninitialized,
    Initializing,
    Running,
    Resizing,
    ShuttingDown,
    Terminated,
}

impl LoopState {
    pub fn can_transition_to(self, next: LoopState) -> bool {
        use LoopState::*;
        matches!(
            (self, next),
            (Uninitialized, Initializing)
                | (Initializing, Running)
                | (Initializing, Uninitialized)
                | (Running, Resizing)
                | (Resizing, Running)
                | (Running, ShuttingDown)
                | (Initializing, ShuttingDown)
                | (Uninitialized, ShuttingDown)
                | (ShuttingDown, Terminated)
        )
    }

    /// True while GPU objects may be alive.
    pub fn has_device(self) -> bool {
        matches!(
            self,
            LoopState::Initializing | LoopState::Running | LoopState::Resizing
        )
    }
}
