//! Node behaviors used by the crate drop demo

use scene_engine::physics::Rect;
use scene_engine::prelude::*;
use std::collections::HashSet;

/// Constant downward acceleration with a terminal speed
pub struct Gravity {
    velocity: f32,
    acceleration: f32,
    terminal: f32,
    size: Vec2,
    color: Color,
}

impl Gravity {
    pub fn new(acceleration: f32, terminal: f32, size: Vec2, color: Color) -> Self {
        Self {
            velocity: 0.0,
            acceleration,
            terminal,
            size,
            color,
        }
    }
}

impl NodeBehavior for Gravity {
    fn process(&mut self, node: NodeId, graph: &mut SceneGraph, ctx: &mut FrameContext) {
        self.velocity = (self.velocity + self.acceleration * ctx.delta()).min(self.terminal);
        if let Err(e) = graph.translate(node, vec2(0.0, self.velocity * ctx.delta())) {
            log::warn!("Crate {:?} could not move: {}", node, e);
        }
    }

    fn render(&self, node: NodeId, graph: &SceneGraph, canvas: &mut dyn Canvas) {
        if let Ok(position) = graph.global_position(node) {
            canvas.fill_rect(Rect::new(position, self.size.x, self.size.y), self.color);
        }
    }

    fn on_collision(&mut self, _node: NodeId, other: NodeId, graph: &mut SceneGraph) {
        // Landing on something solid kills the fall speed
        if graph.body(other).is_ok_and(|body| body.kind() != BodyKind::Area) {
            self.velocity = 0.0;
        }
    }
}

/// Draws a solid block for a body that never moves on its own
pub struct Block {
    size: Vec2,
    color: Color,
}

impl Block {
    pub fn new(size: Vec2, color: Color) -> Self {
        Self { size, color }
    }
}

impl NodeBehavior for Block {
    fn render(&self, node: NodeId, graph: &SceneGraph, canvas: &mut dyn Canvas) {
        if let Ok(position) = graph.global_position(node) {
            canvas.fill_rect(Rect::new(position, self.size.x, self.size.y), self.color);
        }
    }
}

/// Logs every body the first time it enters the owning area
pub struct TriggerLog {
    name: &'static str,
    seen: HashSet<NodeId>,
}

impl TriggerLog {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            seen: HashSet::new(),
        }
    }
}

impl NodeBehavior for TriggerLog {
    fn on_collision(&mut self, _node: NodeId, other: NodeId, _graph: &mut SceneGraph) {
        if self.seen.insert(other) {
            log::info!("{}: {:?} entered", self.name, other);
        }
    }

    fn on_removed(&mut self, _node: NodeId) {
        log::debug!("{}: {} bodies seen in total", self.name, self.seen.len());
    }
}

/// Sends the engine to another scene after a number of frames
pub struct SceneTimer {
    next: NodeId,
    frames_left: u64,
}

impl SceneTimer {
    pub fn new(next: NodeId, frames: u64) -> Self {
        Self {
            next,
            frames_left: frames,
        }
    }
}

impl NodeBehavior for SceneTimer {
    fn process(&mut self, _node: NodeId, _graph: &mut SceneGraph, ctx: &mut FrameContext) {
        if self.frames_left == 0 {
            return;
        }
        self.frames_left -= 1;
        if self.frames_left == 0 {
            log::info!("Switching scene at frame {}", ctx.frame());
            ctx.navigate_to(self.next);
        }
    }
}

/// Asks the engine to stop after a number of frames in this scene
pub struct QuitAfter {
    frames_left: u64,
}

impl QuitAfter {
    pub fn new(frames: u64) -> Self {
        Self { frames_left: frames }
    }
}

impl NodeBehavior for QuitAfter {
    fn process(&mut self, _node: NodeId, _graph: &mut SceneGraph, ctx: &mut FrameContext) {
        self.frames_left = self.frames_left.saturating_sub(1);
        if self.frames_left == 0 {
            ctx.request_quit();
        }
    }
}
