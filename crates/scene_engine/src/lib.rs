//! # Scene Engine
//!
//! A small 2D scene-tree engine with axis-aligned collision bodies.
//!
//! ## Features
//!
//! - **Scene Tree**: Arena-backed node hierarchy with derived global positions
//! - **Behaviors**: Per-node update, draw and collision hooks
//! - **Collision Bodies**: Dynamic, static and area bodies on 5 layer channels
//! - **Frame Driver**: Update, collide and draw, one frame at a time
//! - **Headless Friendly**: Drawing goes through an opaque canvas trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let root = engine.root();
//!         let graph = engine.graph_mut();
//!         let floor = graph.create_body(
//!             vec2(0.0, 100.0),
//!             CollisionBody::fixed(CollisionShape::rectangle(vec2(0.0, 0.0), 200.0, 10.0)),
//!         );
//!         graph.add_child(root, floor)?;
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig { max_frames: Some(60), ..EngineConfig::default() };
//!     Engine::run(config, &mut MyApp, &mut NullCanvas)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod scene;
pub mod physics;
pub mod render;
pub mod debug;

mod application;
mod engine;

pub use application::{Application, AppError};
pub use engine::{Engine, EngineConfig, EngineError, FrameStats};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Application, AppError,
        Engine, EngineConfig, EngineError, FrameStats,
        config::Config,
        foundation::{
            collections::NodeId,
            math::{vec2, Vec2},
            time::{Timer, Stopwatch},
        },
        scene::{FrameContext, NodeBehavior, SceneError, SceneGraph, SceneNode},
        physics::{
            BodyKind, CollisionBody, CollisionLayers, CollisionShape, CollisionSystem,
            PhysicsError,
        },
        render::{Canvas, Color, NullCanvas, RecordingCanvas},
    };
}
