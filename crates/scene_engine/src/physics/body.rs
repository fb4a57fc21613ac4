//! Collision bodies and the collision response policy
//!
//! A body is a scene node that carries one [`CollisionShape`] and one
//! [`CollisionLayers`] set. What happens when two bodies overlap depends only
//! on the pair of [`BodyKind`] tags, decided in [`collision_response`].

use crate::foundation::collections::NodeId;
use crate::scene::{SceneError, SceneGraph};
use super::collision::CollisionShape;
use super::collision_layers::CollisionLayers;

/// Behavioral variant of a body, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Pushed out of statics entirely, shares separation with other dynamics
    Dynamic,
    /// Never moved by dynamics; shares separation with other statics
    Static,
    /// Never moves anything; records who overlapped it this frame
    Area,
}

/// What a body does in response to touching another body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionResponse {
    /// Move by `fraction` of this body's own minimum translation vector
    Displace {
        /// Share of the MTV to apply
        fraction: f32,
    },
    /// Remember the other body in this frame's contact list
    Record,
    /// Do nothing
    Ignore,
}

/// Response policy for a body of kind `own` touching a body of kind `other`
///
/// | own \ other | Dynamic  | Static   | Area   |
/// |-------------|----------|----------|--------|
/// | Dynamic     | ½ MTV    | full MTV | -      |
/// | Static      | -        | ½ MTV    | -      |
/// | Area        | record   | record   | record |
///
/// Each side of a pair applies its own MTV, computed when its turn comes.
/// The two halves are therefore not mirror images and the split is not
/// physically symmetric.
pub fn collision_response(own: BodyKind, other: BodyKind) -> CollisionResponse {
    match (own, other) {
        (BodyKind::Area, _) => CollisionResponse::Record,
        (BodyKind::Dynamic, BodyKind::Static) => CollisionResponse::Displace { fraction: 1.0 },
        (BodyKind::Dynamic, BodyKind::Dynamic) | (BodyKind::Static, BodyKind::Static) => {
            CollisionResponse::Displace { fraction: 0.5 }
        }
        (BodyKind::Static, BodyKind::Dynamic) | (_, BodyKind::Area) => CollisionResponse::Ignore,
    }
}

/// Collision data attached to a scene node
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionBody {
    kind: BodyKind,
    shape: CollisionShape,
    layers: CollisionLayers,
    contacts: Vec<NodeId>,
}

impl CollisionBody {
    /// Create a body of the given kind
    pub fn new(kind: BodyKind, shape: CollisionShape, layers: CollisionLayers) -> Self {
        Self {
            kind,
            shape,
            layers,
            contacts: Vec::new(),
        }
    }

    /// Dynamic body on the default layers
    pub fn dynamic(shape: CollisionShape) -> Self {
        Self::new(BodyKind::Dynamic, shape, CollisionLayers::default())
    }

    /// Static body on the default layers
    pub fn fixed(shape: CollisionShape) -> Self {
        Self::new(BodyKind::Static, shape, CollisionLayers::default())
    }

    /// Area on the default layers
    pub fn area(shape: CollisionShape) -> Self {
        Self::new(BodyKind::Area, shape, CollisionLayers::default())
    }

    /// Replace the layer set (builder pattern)
    pub fn with_layers(mut self, layers: CollisionLayers) -> Self {
        self.layers = layers;
        self
    }

    /// Behavioral variant
    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    /// Collision shape
    pub fn shape(&self) -> &CollisionShape {
        &self.shape
    }

    pub(crate) fn shape_mut(&mut self) -> &mut CollisionShape {
        &mut self.shape
    }

    /// Layer set
    pub fn layers(&self) -> &CollisionLayers {
        &self.layers
    }

    /// Mutable layer set
    pub fn layers_mut(&mut self) -> &mut CollisionLayers {
        &mut self.layers
    }

    /// Bodies that touched this area during the last completed collision pass
    ///
    /// Always empty for non-area bodies.
    pub fn colliding_bodies(&self) -> &[NodeId] {
        &self.contacts
    }

    pub(crate) fn clear_contacts(&mut self) {
        self.contacts.clear();
    }
}

// Body-level operations need the whole graph: shapes resolve their world
// placement through the owner chain and responses move nodes.
impl SceneGraph {
    /// True when the two bodies share a layer and their shapes overlap
    ///
    /// Layers are checked first; disjoint layers skip the geometry test.
    pub fn is_colliding_with(&self, a: NodeId, b: NodeId) -> Result<bool, SceneError> {
        let body_a = self.body(a)?;
        let body_b = self.body(b)?;
        if !body_a.layers.overlaps(&body_b.layers) {
            return Ok(false);
        }
        Ok(body_a.shape.intersects(&body_b.shape, self))
    }

    /// Apply `a`'s response to touching `b`, then run `a`'s behavior hook
    ///
    /// Positions are only ever changed on `a`. Displacement is applied to the
    /// local position. The caller is expected to have checked
    /// [`is_colliding_with`](SceneGraph::is_colliding_with).
    pub fn on_collision(&mut self, a: NodeId, b: NodeId) -> Result<(), SceneError> {
        let body_a = self.body(a)?;
        let body_b = self.body(b)?;

        match collision_response(body_a.kind, body_b.kind) {
            CollisionResponse::Displace { fraction } => {
                let mtv = body_a.shape.minimum_translation_vector(&body_b.shape, self);
                self.translate(a, mtv * fraction)?;
            }
            CollisionResponse::Record => self.body_mut(a)?.contacts.push(b),
            CollisionResponse::Ignore => {}
        }

        if let Some(mut behavior) = self.node_mut(a)?.behavior.take() {
            behavior.on_collision(a, b, self);
            self.restore_behavior(a, behavior);
        }
        Ok(())
    }

    /// Contact list of an area body
    pub fn colliding_bodies(&self, area: NodeId) -> Result<&[NodeId], SceneError> {
        Ok(self.body(area)?.colliding_bodies())
    }
}
