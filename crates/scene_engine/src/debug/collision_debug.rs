//! Collision-specific debug visualization
//!
//! Outlines the world-space bounds of every body reachable from the active
//! root, colored by what the last collision pass found.

use crate::foundation::collections::NodeId;
use crate::physics::{BodyKind, CollisionSystem};
use crate::render::{Canvas, Color};
use crate::scene::{SceneError, SceneGraph};

/// Color scheme for collision visualization
#[derive(Clone, Copy, Debug)]
pub struct CollisionDebugColors {
    /// Solid bodies not touching anything
    pub shape_default: Color,
    /// Bodies that touched something in the last pass
    pub shape_colliding: Color,
    /// Areas, whether or not they hold contacts
    pub area: Color,
}

impl Default for CollisionDebugColors {
    fn default() -> Self {
        Self {
            shape_default: Color::GREEN.with_alpha(0.6),
            shape_colliding: Color::RED.with_alpha(0.8),
            area: Color::rgba(0.0, 1.0, 1.0, 0.4), // Cyan
        }
    }
}

/// Draws collision shapes as rectangle outlines
#[derive(Clone, Debug)]
pub struct CollisionDebugDraw {
    colors: CollisionDebugColors,
    /// Outline width in canvas units
    pub line_width: f32,
    /// Draw areas as well as solid bodies
    pub show_areas: bool,
}

impl CollisionDebugDraw {
    /// Create a visualizer with the default colors
    pub fn new() -> Self {
        Self {
            colors: CollisionDebugColors::default(),
            line_width: 1.0,
            show_areas: true,
        }
    }

    /// Set custom color scheme
    pub fn with_colors(mut self, colors: CollisionDebugColors) -> Self {
        self.colors = colors;
        self
    }

    /// Current color scheme
    pub fn colors(&self) -> &CollisionDebugColors {
        &self.colors
    }

    /// Color used for one body
    fn color_for(&self, kind: BodyKind, colliding: bool) -> Color {
        match (kind, colliding) {
            (BodyKind::Area, _) => self.colors.area,
            (_, true) => self.colors.shape_colliding,
            (_, false) => self.colors.shape_default,
        }
    }

    /// Outline every body reachable from `root`
    ///
    /// Returns the number of shapes drawn.
    pub fn draw(
        &self,
        graph: &SceneGraph,
        root: NodeId,
        collisions: &CollisionSystem,
        canvas: &mut dyn Canvas,
    ) -> Result<usize, SceneError> {
        let mut drawn = 0;
        for id in graph.bodies_in(root)? {
            let body = graph.body(id)?;
            if body.kind() == BodyKind::Area && !self.show_areas {
                continue;
            }
            let rect = body.shape().world_space(graph).aabb();
            let color = self.color_for(body.kind(), collisions.is_colliding(id));
            canvas.stroke_rect(rect, color, self.line_width);
            drawn += 1;
        }
        Ok(drawn)
    }
}

impl Default for CollisionDebugDraw {
    fn default() -> Self {
        Self::new()
    }
}
