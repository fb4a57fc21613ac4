//! Specialized collection types

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable generational handle to a node in a [`SceneGraph`](crate::scene::SceneGraph)
    ///
    /// Handles stay valid until the node is removed; afterwards every lookup
    /// with the old handle fails instead of aliasing a newer node.
    pub struct NodeId;
}

/// Handle-based map keyed by [`NodeId`]
pub type NodeMap<T> = SlotMap<NodeId, T>;
