//! High-level collision shape abstractions
//!
//! Shapes store their geometry relative to the body that owns them and are
//! moved into world space on demand, right before a test.

use crate::foundation::collections::NodeId;
use crate::foundation::math::Vec2;
use crate::scene::SceneGraph;
use super::primitives::Rect;

/// Geometry of a collision shape, independent of where it sits
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    /// Axis-aligned rectangle extending right/down from the shape origin
    Rectangle {
        /// Extent along x
        width: f32,
        /// Extent along y
        height: f32,
    },
}

/// Collision shape attached to a body (stored relative to its owner)
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionShape {
    offset: Vec2,
    kind: ShapeKind,
    owner: Option<NodeId>,
}

impl CollisionShape {
    /// Creates a rectangle shape at `offset` from its owner
    ///
    /// Negative extents are clamped to zero.
    pub fn rectangle(offset: Vec2, width: f32, height: f32) -> Self {
        Self {
            offset,
            kind: ShapeKind::Rectangle {
                width: width.max(0.0),
                height: height.max(0.0),
            },
            owner: None,
        }
    }

    /// Shape geometry
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Offset relative to the owning body
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Node of the body this shape belongs to, if attached
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: NodeId) {
        self.owner = Some(owner);
    }

    /// Global position: owner's global position plus the offset
    ///
    /// An unattached shape (or one whose owner has been removed) sits at its
    /// offset.
    pub fn global_position(&self, graph: &SceneGraph) -> Vec2 {
        self.owner
            .and_then(|owner| graph.global_position(owner).ok())
            .map_or(self.offset, |origin| origin + self.offset)
    }

    /// Place this shape in world space with its origin at `position`
    pub fn to_world_space(&self, position: Vec2) -> WorldSpaceShape {
        match self.kind {
            ShapeKind::Rectangle { width, height } => {
                WorldSpaceShape::Rectangle(Rect::new(position, width, height))
            }
        }
    }

    /// World-space version of this shape resolved through the scene graph
    pub fn world_space(&self, graph: &SceneGraph) -> WorldSpaceShape {
        self.to_world_space(self.global_position(graph))
    }

    /// Test if this shape overlaps another, both in their current world placement
    pub fn intersects(&self, other: &CollisionShape, graph: &SceneGraph) -> bool {
        self.world_space(graph).intersects(&other.world_space(graph))
    }

    /// Displacement that separates this shape from `other`
    ///
    /// Only meaningful when [`intersects`](CollisionShape::intersects) holds.
    pub fn minimum_translation_vector(&self, other: &CollisionShape, graph: &SceneGraph) -> Vec2 {
        self.world_space(graph)
            .minimum_translation_vector(&other.world_space(graph))
    }
}

/// World-space collision shape, built right before a test
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldSpaceShape {
    /// World-space rectangle
    Rectangle(Rect),
}

impl WorldSpaceShape {
    /// Axis-aligned bounds of the shape
    pub fn aabb(&self) -> Rect {
        match self {
            Self::Rectangle(rect) => *rect,
        }
    }

    /// Test if this shape intersects with another shape
    pub fn intersects(&self, other: &WorldSpaceShape) -> bool {
        match (self, other) {
            (Self::Rectangle(a), Self::Rectangle(b)) => a.intersects(b),
        }
    }

    /// Minimum translation vector pushing `self` out of `other`
    pub fn minimum_translation_vector(&self, other: &WorldSpaceShape) -> Vec2 {
        match (self, other) {
            (Self::Rectangle(a), Self::Rectangle(b)) => a.minimum_translation_vector(b),
        }
    }
}
