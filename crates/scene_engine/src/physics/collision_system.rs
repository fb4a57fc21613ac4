//! Per-frame collision pass
//!
//! Every body reachable from the active root is tested against every other,
//! in pre-order. Layer sets act as the broad phase: pairs that share no
//! channel never reach the geometry test. Overlapping pairs are resolved
//! immediately and in order, so later pairs see positions already moved by
//! earlier ones.
//!
//! Besides resolving, the system remembers which pairs touched this frame and
//! the frame before, so callers can ask which contacts started or ended.

use crate::foundation::collections::NodeId;
use crate::scene::{SceneError, SceneGraph};
use std::collections::HashSet;

/// Two bodies touching in the same frame
///
/// Always stores the smaller handle first so `(a, b)` and `(b, a)` compare
/// equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    /// Smaller handle
    pub a: NodeId,
    /// Larger handle
    pub b: NodeId,
}

impl CollisionPair {
    /// Create an order-independent pair
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    /// Whether `id` is one of the two bodies
    pub fn involves(&self, id: NodeId) -> bool {
        self.a == id || self.b == id
    }

    /// The body paired with `id`, if `id` is part of the pair
    pub fn other(&self, id: NodeId) -> Option<NodeId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Counters for the last collision pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Bodies reachable from the root
    pub bodies: usize,
    /// Pairs that shared a layer and went through the geometry test
    pub pairs_tested: usize,
    /// Pairs skipped because their layer sets were disjoint
    pub pairs_filtered: usize,
    /// Pairs found overlapping and resolved
    pub contacts: usize,
}

/// Pairwise collision detection and response
#[derive(Debug, Default)]
pub struct CollisionSystem {
    current_pairs: HashSet<CollisionPair>,
    previous_pairs: HashSet<CollisionPair>,
    stats: CollisionStats,
    /// Trace every resolved pair
    pub log_collisions: bool,
}

impl CollisionSystem {
    /// Create a system with no recorded history
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect and resolve all collisions among bodies reachable from `root`
    ///
    /// For each overlapping pair `(A, B)` with A earlier in pre-order,
    /// `on_collision(A, B)` runs before `on_collision(B, A)`. A body removed
    /// by a collision hook drops out of the rest of the pass.
    pub fn detect_and_resolve(
        &mut self,
        graph: &mut SceneGraph,
        root: NodeId,
    ) -> Result<&HashSet<CollisionPair>, SceneError> {
        std::mem::swap(&mut self.current_pairs, &mut self.previous_pairs);
        self.current_pairs.clear();

        let bodies = graph.bodies_in(root)?;
        let mut stats = CollisionStats {
            bodies: bodies.len(),
            ..CollisionStats::default()
        };

        for (i, &a) in bodies.iter().enumerate() {
            for &b in &bodies[i + 1..] {
                if !graph.contains(a) || !graph.contains(b) {
                    continue;
                }
                if !graph.body(a)?.layers().overlaps(graph.body(b)?.layers()) {
                    stats.pairs_filtered += 1;
                    continue;
                }
                stats.pairs_tested += 1;
                if !graph.is_colliding_with(a, b)? {
                    continue;
                }

                stats.contacts += 1;
                self.current_pairs.insert(CollisionPair::new(a, b));
                if self.log_collisions {
                    log::trace!("Collision {:?} <-> {:?}", a, b);
                }

                graph.on_collision(a, b)?;
                if graph.contains(a) && graph.contains(b) {
                    graph.on_collision(b, a)?;
                }
            }
        }

        self.stats = stats;
        Ok(&self.current_pairs)
    }

    /// Pairs touching this frame that were not touching the frame before
    pub fn collisions_entered(&self) -> Vec<CollisionPair> {
        self.current_pairs
            .difference(&self.previous_pairs)
            .copied()
            .collect()
    }

    /// Pairs that touched the frame before but not this frame
    pub fn collisions_exited(&self) -> Vec<CollisionPair> {
        self.previous_pairs
            .difference(&self.current_pairs)
            .copied()
            .collect()
    }

    /// All pairs found in the last pass
    pub fn current_collisions(&self) -> &HashSet<CollisionPair> {
        &self.current_pairs
    }

    /// Whether `id` touched anything in the last pass
    pub fn is_colliding(&self, id: NodeId) -> bool {
        self.current_pairs.iter().any(|pair| pair.involves(id))
    }

    /// Counters from the last pass
    pub fn stats(&self) -> CollisionStats {
        self.stats
    }

    /// Forget all recorded pairs, e.g. after switching scenes
    pub fn clear(&mut self) {
        self.current_pairs.clear();
        self.previous_pairs.clear();
        self.stats = CollisionStats::default();
    }
}
