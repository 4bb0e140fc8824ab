use glam::Vec2;
use std::collections::BTreeSet;

/// A held control the fly camera responds to.
///
/// The windowing layer maps raw keys onto actions; the controller never sees
/// key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    Ascend,
    Descend,
    /// Multiplies movement speed while held.
    Sprint,
}

/// Everything the controller consumes for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Accumulated mouse motion since the last frame. `y` is positive when
    /// looking up.
    pub look_delta: Vec2,
    /// Actions held during this frame.
    pub actions: BTreeSet<Action>,
    /// Seconds since the previous frame.
    pub dt: f32,
}

impl FrameInput {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            ..Self::default()
        }
    }

    pub fn with_look(mut self, delta: Vec2) -> Self {
        self.look_delta = delta;
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.insert(action);
        self
    }

    pub fn holds(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }
}
