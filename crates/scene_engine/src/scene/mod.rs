//! Scene tree
//!
//! Provides the entity hierarchy the engine updates, collides and draws every
//! frame.
//!
//! ## Architecture
//!
//! ```text
//! SceneGraph (arena of SceneNode, addressed by NodeId)
//!      ↓ update(root)   behavior.process, self before children
//!      ↓ collide(root)  physics::CollisionSystem over reachable bodies
//!      ↓ draw(root)     behavior.render, self before children
//! ```
//!
//! Global positions are derived from the parent chain on every read; nothing
//! is cached, so there is never anything to invalidate.

mod behavior;
mod context;
mod node;
mod scene_graph;

pub use behavior::NodeBehavior;
pub use context::FrameContext;
pub use node::SceneNode;
pub use scene_graph::SceneGraph;

use crate::foundation::collections::NodeId;
use thiserror::Error;

/// Scene tree errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The handle does not refer to a live node
    #[error("Node {0:?} does not exist")]
    NodeNotFound(NodeId),

    /// The node must be detached before it can be added elsewhere
    #[error("Node {child:?} already has parent {parent:?}")]
    AlreadyParented {
        /// Node being added
        child: NodeId,
        /// Its current parent
        parent: NodeId,
    },

    /// Adding the child would make a node its own ancestor
    #[error("Adding {child:?} under {parent:?} would create a cycle")]
    CycleDetected {
        /// Requested parent
        parent: NodeId,
        /// Requested child
        child: NodeId,
    },

    /// The node carries no collision body
    #[error("Node {0:?} is not a collision body")]
    NotABody(NodeId),
}
