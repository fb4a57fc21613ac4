//! Frame context passed through the update pass

use crate::foundation::collections::NodeId;

/// Per-frame state handed to every [`NodeBehavior::process`](super::NodeBehavior::process) call
///
/// Replaces process-wide singletons: anything a behavior needs to know about
/// the frame, or wants to ask of the driver, goes through here.
#[derive(Debug, Clone)]
pub struct FrameContext {
    delta: f32,
    frame: u64,
    navigation: Option<NodeId>,
    quit_requested: bool,
}

impl FrameContext {
    /// Create a context for one frame
    pub fn new(delta: f32, frame: u64) -> Self {
        Self {
            delta,
            frame,
            navigation: None,
            quit_requested: false,
        }
    }

    /// Seconds since the previous frame, zero on the first frame
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Index of the current frame, starting at 1
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Ask the driver to make `scene` the active root once the update pass ends
    ///
    /// The last request in a frame wins.
    pub fn navigate_to(&mut self, scene: NodeId) {
        self.navigation = Some(scene);
    }

    /// Pending navigation request, if any
    pub fn navigation(&self) -> Option<NodeId> {
        self.navigation
    }

    /// Consume the pending navigation request
    pub fn take_navigation(&mut self) -> Option<NodeId> {
        self.navigation.take()
    }

    /// Ask the driver to stop after this frame
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    /// Whether a behavior asked the driver to stop
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}
