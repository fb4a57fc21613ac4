//! Scene node storage

use crate::foundation::collections::NodeId;
use crate::foundation::math::Vec2;
use crate::physics::CollisionBody;
use super::behavior::NodeBehavior;

/// A positioned entity in the scene tree
///
/// Nodes are owned by a [`SceneGraph`](super::SceneGraph) and refer to each
/// other through [`NodeId`] handles only.
pub struct SceneNode {
    pub(crate) position: Vec2,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) body: Option<CollisionBody>,
    pub(crate) behavior: Option<Box<dyn NodeBehavior>>,
}

impl SceneNode {
    /// Create a detached node at a local position
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            parent: None,
            children: Vec::new(),
            body: None,
            behavior: None,
        }
    }

    /// Attach a behavior (builder pattern)
    pub fn with_behavior(mut self, behavior: impl NodeBehavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    /// Turn the node into a collision body (builder pattern)
    pub fn with_body(mut self, body: CollisionBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Local position, relative to the parent
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Parent handle, if attached
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children in update/draw order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Collision body carried by this node
    pub fn body(&self) -> Option<&CollisionBody> {
        self.body.as_ref()
    }

    /// Whether a behavior is attached
    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }
}

impl std::fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNode")
            .field("position", &self.position)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("body", &self.body)
            .field("behavior", &self.behavior.is_some())
            .finish()
    }
}
