//! Per-node behavior hooks
//!
//! Behaviors are the customization seam of the scene tree. Every hook has a
//! no-op default so implementors only override what they need.

use crate::foundation::collections::NodeId;
use crate::render::Canvas;
use super::{FrameContext, SceneGraph};

/// Behavior attached to a scene node
///
/// While a hook runs the behavior is temporarily detached from its node, so
/// the hook is free to mutate the graph, including its own node. If the hook
/// removes its own node, [`on_removed`](NodeBehavior::on_removed) is called
/// once the hook returns.
pub trait NodeBehavior {
    /// Per-frame logic, called before the node's children are processed
    fn process(&mut self, _node: NodeId, _graph: &mut SceneGraph, _ctx: &mut FrameContext) {}

    /// Per-frame drawing, called before the node's children are drawn
    fn render(&self, _node: NodeId, _graph: &SceneGraph, _canvas: &mut dyn Canvas) {}

    /// Called after the built-in collision response for this node's body
    fn on_collision(&mut self, _node: NodeId, _other: NodeId, _graph: &mut SceneGraph) {}

    /// Called once when the node is torn down; release external resources here
    fn on_removed(&mut self, _node: NodeId) {}
}
