//! Scene graph arena
//!
//! Owns every node of every scene. Parent/child links are plain [`NodeId`]
//! fields, so the tree never holds shared mutable references and stale
//! handles fail lookups instead of dangling.

use crate::foundation::collections::{NodeId, NodeMap};
use crate::foundation::math::Vec2;
use crate::physics::CollisionBody;
use crate::render::Canvas;
use super::{FrameContext, NodeBehavior, SceneError, SceneNode};

/// Arena holding the scene tree(s)
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: NodeMap<SceneNode>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully built node and return its handle
    ///
    /// The node starts detached; any parent/child links it carries are reset.
    /// A body's shape is bound to the new node.
    pub fn insert(&mut self, mut node: SceneNode) -> NodeId {
        node.parent = None;
        node.children.clear();
        let id = self.nodes.insert(node);
        if let Some(body) = self.nodes[id].body.as_mut() {
            body.shape_mut().set_owner(id);
        }
        id
    }

    /// Create a plain node at a local position
    pub fn create_node(&mut self, position: Vec2) -> NodeId {
        self.insert(SceneNode::new(position))
    }

    /// Create a collision body node at a local position
    pub fn create_body(&mut self, position: Vec2, body: CollisionBody) -> NodeId {
        self.insert(SceneNode::new(position).with_body(body))
    }

    /// Attach (or replace) the behavior of a node
    pub fn set_behavior(
        &mut self,
        id: NodeId,
        behavior: impl NodeBehavior + 'static,
    ) -> Result<(), SceneError> {
        self.node_mut(id)?.behavior = Some(Box::new(behavior));
        Ok(())
    }

    /// Whether the handle refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes across all trees
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the graph holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node
    pub fn node(&self, id: NodeId) -> Result<&SceneNode, SceneError> {
        self.nodes.get(id).ok_or(SceneError::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, SceneError> {
        self.nodes.get_mut(id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Borrow the collision body of a node
    pub fn body(&self, id: NodeId) -> Result<&CollisionBody, SceneError> {
        self.node(id)?.body.as_ref().ok_or(SceneError::NotABody(id))
    }

    /// Mutably borrow the collision body of a node
    pub fn body_mut(&mut self, id: NodeId) -> Result<&mut CollisionBody, SceneError> {
        self.node_mut(id)?.body.as_mut().ok_or(SceneError::NotABody(id))
    }

    // ----- Tree structure -----

    /// Append `child` to the children of `parent`
    ///
    /// Fails when `child` already belongs to a different parent (detach it
    /// first) or when the link would close a cycle. Adding a child that is
    /// already listed under `parent` changes nothing.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node(parent)?;
        let current = self.node(child)?.parent;
        if let Some(existing) = current {
            if existing != parent && self.contains(existing) {
                return Err(SceneError::AlreadyParented { child, parent: existing });
            }
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::CycleDetected { parent, child });
        }

        let parent_node = self.node_mut(parent)?;
        if !parent_node.children.contains(&child) {
            parent_node.children.push(child);
        }
        self.node_mut(child)?.parent = Some(parent);
        log::trace!("Attached {:?} under {:?}", child, parent);
        Ok(())
    }

    /// Remove `child` from the child list of `parent`
    ///
    /// No-op when it is not listed. The child keeps its parent pointer; use
    /// [`detach`](SceneGraph::detach) to unlink fully or
    /// [`remove`](SceneGraph::remove) to destroy the subtree.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node_mut(parent)?.children.retain(|&c| c != child);
        Ok(())
    }

    /// Unlink a node from its parent, keeping its subtree alive
    pub fn detach(&mut self, id: NodeId) -> Result<(), SceneError> {
        if let Some(parent) = self.node_mut(id)?.parent.take() {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.retain(|&c| c != id);
            }
        }
        Ok(())
    }

    /// Destroy a node and its whole subtree
    ///
    /// The node is unlinked from its parent, then descendants are torn down
    /// leaf-first, each behavior receiving [`NodeBehavior::on_removed`]
    /// before its node disappears. All handles into the subtree become stale.
    pub fn remove(&mut self, id: NodeId) -> Result<(), SceneError> {
        self.detach(id)?;
        let removed = self.teardown(id);
        log::debug!("Removed {:?} ({} nodes)", id, removed);
        Ok(())
    }

    fn teardown(&mut self, id: NodeId) -> usize {
        let children = self
            .nodes
            .get(id)
            .map(|node| node.children.clone())
            .unwrap_or_default();

        let mut removed = 0;
        for child in children {
            removed += self.teardown(child);
        }

        if let Some(mut node) = self.nodes.remove(id) {
            if let Some(behavior) = node.behavior.as_mut() {
                behavior.on_removed(id);
            }
            removed += 1;
        }
        removed
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, SceneError> {
        Ok(self.node(id)?.parent)
    }

    /// Direct children of a node, in order
    pub fn children(&self, id: NodeId) -> Result<&[NodeId], SceneError> {
        Ok(&self.node(id)?.children)
    }

    /// Every descendant of a node, pre-order
    pub fn all_children(&self, id: NodeId) -> Result<Vec<NodeId>, SceneError> {
        let mut out = Vec::new();
        for &child in self.children(id)? {
            self.collect_pre_order(child, &mut out);
        }
        Ok(out)
    }

    fn collect_pre_order(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if let Some(node) = self.nodes.get(id) {
            out.push(id);
            for &child in &node.children {
                self.collect_pre_order(child, out);
            }
        }
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == candidate {
                return true;
            }
            match self.nodes.get(id).and_then(|node| node.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    // ----- Positions -----

    /// Local position of a node
    pub fn position(&self, id: NodeId) -> Result<Vec2, SceneError> {
        Ok(self.node(id)?.position)
    }

    /// Set the local position of a node
    ///
    /// Descendants follow automatically since global positions are derived.
    pub fn set_position(&mut self, id: NodeId, position: Vec2) -> Result<(), SceneError> {
        self.node_mut(id)?.position = position;
        Ok(())
    }

    /// Move a node by `delta` in its parent's space
    pub fn translate(&mut self, id: NodeId, delta: Vec2) -> Result<(), SceneError> {
        self.node_mut(id)?.position += delta;
        Ok(())
    }

    /// Global position: sum of local positions up the parent chain
    ///
    /// Recomputed on every call. A parent pointer to a removed node ends the
    /// walk.
    pub fn global_position(&self, id: NodeId) -> Result<Vec2, SceneError> {
        let node = self.node(id)?;
        let mut position = node.position;
        let mut next = node.parent;
        while let Some(parent) = next.and_then(|p| self.nodes.get(p)) {
            position += parent.position;
            next = parent.parent;
        }
        Ok(position)
    }

    // ----- Per-frame traversal -----

    /// Run the update pass over the subtree rooted at `root`
    ///
    /// Each node's behavior runs before its children, children in list
    /// order. Nodes removed by an earlier behavior in the same pass are
    /// skipped.
    pub fn update(&mut self, root: NodeId, ctx: &mut FrameContext) -> Result<(), SceneError> {
        self.node(root)?;
        self.update_node(root, ctx);
        Ok(())
    }

    fn update_node(&mut self, id: NodeId, ctx: &mut FrameContext) {
        let behavior = match self.nodes.get_mut(id) {
            Some(node) => node.behavior.take(),
            None => return,
        };
        if let Some(mut behavior) = behavior {
            behavior.process(id, self, ctx);
            self.restore_behavior(id, behavior);
        }

        let children = match self.nodes.get(id) {
            Some(node) => node.children.clone(),
            None => return,
        };
        for child in children {
            self.update_node(child, ctx);
        }
    }

    /// Put a behavior back after a hook ran, unless the hook replaced it or
    /// removed the node
    pub(crate) fn restore_behavior(&mut self, id: NodeId, mut behavior: Box<dyn NodeBehavior>) {
        match self.nodes.get_mut(id) {
            Some(node) => {
                if node.behavior.is_none() {
                    node.behavior = Some(behavior);
                }
            }
            None => behavior.on_removed(id),
        }
    }

    /// Run the draw pass over the subtree rooted at `root`
    ///
    /// Mirrors [`update`](SceneGraph::update): self first, then children in
    /// order. The canvas is passed through untouched.
    pub fn draw(&self, root: NodeId, canvas: &mut dyn Canvas) -> Result<(), SceneError> {
        self.node(root)?;
        self.draw_node(root, canvas);
        Ok(())
    }

    fn draw_node(&self, id: NodeId, canvas: &mut dyn Canvas) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if let Some(behavior) = node.behavior.as_ref() {
            behavior.render(id, self, canvas);
        }
        for &child in &node.children {
            self.draw_node(child, canvas);
        }
    }

    /// Every collision body reachable from `root` (root included), pre-order
    pub fn bodies_in(&self, root: NodeId) -> Result<Vec<NodeId>, SceneError> {
        self.node(root)?;
        let mut reachable = Vec::new();
        self.collect_pre_order(root, &mut reachable);
        reachable.retain(|&id| self.nodes[id].body.is_some());
        Ok(reachable)
    }

    /// Empty the contact list of every area in the graph
    pub fn clear_area_contacts(&mut self) {
        for (_, node) in &mut self.nodes {
            if let Some(body) = node.body.as_mut() {
                body.clear_contacts();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::vec2;
    use crate::render::{DrawCommand, RecordingCanvas, Color};
    use crate::physics::collision::Rect;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Tracer {
        name: &'static str,
        log: Log,
    }

    impl NodeBehavior for Tracer {
        fn process(&mut self, _node: NodeId, _graph: &mut SceneGraph, ctx: &mut FrameContext) {
            self.log.borrow_mut().push(format!("update {} {}", self.name, ctx.delta()));
        }

        fn render(&self, node: NodeId, graph: &SceneGraph, canvas: &mut dyn Canvas) {
            if let Ok(position) = graph.global_position(node) {
                canvas.fill_rect(Rect::new(position, 1.0, 1.0), Color::WHITE);
            }
            self.log.borrow_mut().push(format!("draw {}", self.name));
        }

        fn on_removed(&mut self, _node: NodeId) {
            self.log.borrow_mut().push(format!("removed {}", self.name));
        }
    }

    fn traced(graph: &mut SceneGraph, log: &Log, name: &'static str) -> NodeId {
        let id = graph.create_node(vec2(0.0, 0.0));
        graph.set_behavior(id, Tracer { name, log: log.clone() }).unwrap();
        id
    }

    #[test]
    fn test_add_child_sets_parent() {
        let mut graph = SceneGraph::new();
        let parent = graph.create_node(vec2(0.0, 0.0));
        let child = graph.create_node(vec2(0.0, 0.0));

        graph.add_child(parent, child).unwrap();

        assert_eq!(graph.parent(child).unwrap(), Some(parent));
        assert_eq!(graph.children(parent).unwrap(), &[child]);
        assert!(graph.all_children(parent).unwrap().contains(&child));
    }

    #[test]
    fn test_add_child_twice_is_noop() {
        let mut graph = SceneGraph::new();
        let parent = graph.create_node(vec2(0.0, 0.0));
        let child = graph.create_node(vec2(0.0, 0.0));

        graph.add_child(parent, child).unwrap();
        graph.add_child(parent, child).unwrap();

        assert_eq!(graph.children(parent).unwrap().len(), 1);
    }

    #[test]
    fn test_add_child_with_other_parent_fails() {
        let mut graph = SceneGraph::new();
        let first = graph.create_node(vec2(0.0, 0.0));
        let second = graph.create_node(vec2(0.0, 0.0));
        let child = graph.create_node(vec2(0.0, 0.0));
        graph.add_child(first, child).unwrap();

        let result = graph.add_child(second, child);

        assert!(matches!(result, Err(SceneError::AlreadyParented { .. })));
        assert!(graph.children(second).unwrap().is_empty());

        // Explicit detach makes reparenting legal
        graph.detach(child).unwrap();
        graph.add_child(second, child).unwrap();
        assert_eq!(graph.parent(child).unwrap(), Some(second));
        assert!(graph.children(first).unwrap().is_empty());
    }

    #[test]
    fn test_add_child_rejects_cycles() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node(vec2(0.0, 0.0));
        let b = graph.create_node(vec2(0.0, 0.0));
        let c = graph.create_node(vec2(0.0, 0.0));
        graph.add_child(a, b).unwrap();
        graph.add_child(b, c).unwrap();

        assert!(matches!(graph.add_child(c, a), Err(SceneError::CycleDetected { .. })));
        assert!(matches!(graph.add_child(a, a), Err(SceneError::CycleDetected { .. })));
    }

    #[test]
    fn test_all_children_includes_grandchildren() {
        let mut graph = SceneGraph::new();
        let parent = graph.create_node(vec2(0.0, 0.0));
        let child = graph.create_node(vec2(0.0, 0.0));
        let grandchild = graph.create_node(vec2(0.0, 0.0));
        let sibling = graph.create_node(vec2(0.0, 0.0));
        graph.add_child(parent, child).unwrap();
        graph.add_child(child, grandchild).unwrap();
        graph.add_child(parent, sibling).unwrap();

        assert_eq!(graph.all_children(parent).unwrap(), vec![child, grandchild, sibling]);
    }

    #[test]
    fn test_remove_child_keeps_parent_pointer() {
        let mut graph = SceneGraph::new();
        let parent = graph.create_node(vec2(0.0, 0.0));
        let child = graph.create_node(vec2(0.0, 0.0));
        graph.add_child(parent, child).unwrap();

        graph.remove_child(parent, child).unwrap();

        assert!(!graph.all_children(parent).unwrap().contains(&child));
        assert_eq!(graph.parent(child).unwrap(), Some(parent));
        assert!(graph.contains(child));

        // Removing something that is not a child changes nothing
        let stranger = graph.create_node(vec2(0.0, 0.0));
        graph.remove_child(parent, stranger).unwrap();
        assert!(graph.children(parent).unwrap().is_empty());
    }

    #[test]
    fn test_remove_detaches_from_parent() {
        let mut graph = SceneGraph::new();
        let parent = graph.create_node(vec2(0.0, 0.0));
        let child = graph.create_node(vec2(0.0, 0.0));
        graph.add_child(parent, child).unwrap();

        graph.remove(child).unwrap();

        assert!(!graph.all_children(parent).unwrap().contains(&child));
        assert!(!graph.contains(child));
        assert!(matches!(graph.position(child), Err(SceneError::NodeNotFound(_))));
    }

    #[test]
    fn test_remove_tears_down_leaf_first() {
        let log: Log = Rc::default();
        let mut graph = SceneGraph::new();
        let root = traced(&mut graph, &log, "root");
        let a = traced(&mut graph, &log, "a");
        let a1 = traced(&mut graph, &log, "a1");
        let b = traced(&mut graph, &log, "b");
        graph.add_child(root, a).unwrap();
        graph.add_child(a, a1).unwrap();
        graph.add_child(root, b).unwrap();

        graph.remove(root).unwrap();

        assert_eq!(*log.borrow(), vec!["removed a1", "removed a", "removed b", "removed root"]);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_global_position_adds_parent_chain() {
        let mut graph = SceneGraph::new();
        let parent = graph.create_node(vec2(10.0, 0.0));
        let child = graph.create_node(vec2(15.0, 5.0));
        graph.add_child(parent, child).unwrap();

        assert_eq!(graph.global_position(child).unwrap(), vec2(25.0, 5.0));
        assert_eq!(graph.global_position(parent).unwrap(), vec2(10.0, 0.0));
    }

    #[test]
    fn test_global_position_follows_parent_moves() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node(vec2(1.0, 1.0));
        let mid = graph.create_node(vec2(2.0, 2.0));
        let leaf = graph.create_node(vec2(3.0, 3.0));
        graph.add_child(root, mid).unwrap();
        graph.add_child(mid, leaf).unwrap();

        graph.set_position(root, vec2(100.0, 0.0)).unwrap();
        graph.translate(mid, vec2(0.0, 10.0)).unwrap();

        assert_eq!(graph.position(leaf).unwrap(), vec2(3.0, 3.0));
        assert_eq!(graph.global_position(leaf).unwrap(), vec2(105.0, 15.0));
    }

    #[test]
    fn test_update_and_draw_visit_self_then_children_in_order() {
        let log: Log = Rc::default();
        let mut graph = SceneGraph::new();
        let root = traced(&mut graph, &log, "root");
        let a = traced(&mut graph, &log, "a");
        let a1 = traced(&mut graph, &log, "a1");
        let b = traced(&mut graph, &log, "b");
        graph.add_child(root, a).unwrap();
        graph.add_child(a, a1).unwrap();
        graph.add_child(root, b).unwrap();

        let mut ctx = FrameContext::new(0.0, 1);
        graph.update(root, &mut ctx).unwrap();
        let mut canvas = RecordingCanvas::new();
        graph.draw(root, &mut canvas).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "update root 0", "update a 0", "update a1 0", "update b 0",
                "draw root", "draw a", "draw a1", "draw b",
            ]
        );
        assert_eq!(canvas.commands().len(), 4);
        assert!(matches!(canvas.commands()[0], DrawCommand::FillRect { .. }));
    }

    #[test]
    fn test_insert_keeps_prebuilt_behavior_and_resets_links() {
        let log: Log = Rc::default();
        let mut graph = SceneGraph::new();
        let stray = graph.create_node(vec2(0.0, 0.0));
        let mut node = SceneNode::new(vec2(2.0, 3.0))
            .with_behavior(Tracer { name: "prebuilt", log: log.clone() });
        node.parent = Some(stray);
        node.children.push(stray);

        let id = graph.insert(node);
        graph.update(id, &mut FrameContext::new(0.5, 1)).unwrap();

        assert!(graph.node(id).unwrap().has_behavior());
        assert_eq!(graph.parent(id).unwrap(), None);
        assert!(graph.children(id).unwrap().is_empty());
        assert_eq!(*log.borrow(), vec!["update prebuilt 0.5"]);
    }

    struct SelfDestruct {
        removed: Rc<RefCell<bool>>,
    }

    impl NodeBehavior for SelfDestruct {
        fn process(&mut self, node: NodeId, graph: &mut SceneGraph, _ctx: &mut FrameContext) {
            graph.remove(node).unwrap();
        }

        fn on_removed(&mut self, _node: NodeId) {
            *self.removed.borrow_mut() = true;
        }
    }

    #[test]
    fn test_behavior_can_remove_its_own_node() {
        let removed = Rc::new(RefCell::new(false));
        let mut graph = SceneGraph::new();
        let root = graph.create_node(vec2(0.0, 0.0));
        let doomed = graph.create_node(vec2(0.0, 0.0));
        let child = graph.create_node(vec2(0.0, 0.0));
        graph.add_child(root, doomed).unwrap();
        graph.add_child(doomed, child).unwrap();
        graph.set_behavior(doomed, SelfDestruct { removed: removed.clone() }).unwrap();

        graph.update(root, &mut FrameContext::new(0.016, 1)).unwrap();

        assert!(*removed.borrow());
        assert!(!graph.contains(doomed));
        assert!(!graph.contains(child));
        assert!(graph.children(root).unwrap().is_empty());
    }

    #[test]
    fn test_update_on_stale_root_fails() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node(vec2(0.0, 0.0));
        graph.remove(root).unwrap();

        let result = graph.update(root, &mut FrameContext::new(0.0, 1));

        assert!(matches!(result, Err(SceneError::NodeNotFound(_))));
    }
}
