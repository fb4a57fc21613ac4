//! Core engine implementation
//!
//! One frame is, in order: clear area contacts, update pass, navigation,
//! collision pass, draw pass, debug overlay. Everything runs to completion
//! on the calling thread.

use crate::{
    application::Application,
    config::{Config, ConfigError, Deserialize, Serialize},
    debug::CollisionDebugDraw,
    foundation::{
        collections::NodeId,
        math::Vec2,
        time::{Stopwatch, Timer},
    },
    physics::{CollisionStats, CollisionSystem},
    render::Canvas,
    scene::{FrameContext, SceneError, SceneGraph},
};
use thiserror::Error;

/// Main engine struct
///
/// Owns the scene graph and drives it one frame at a time. The active root
/// decides which tree is updated, collided and drawn; other trees in the
/// graph stay alive but dormant.
pub struct Engine {
    graph: SceneGraph,
    root: NodeId,
    collisions: CollisionSystem,
    debug_draw: CollisionDebugDraw,
    timer: Timer,
    config: EngineConfig,
    last_frame: FrameStats,
    running: bool,
}

impl Engine {
    /// Create a new engine with an empty root scene
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!("Initializing engine...");

        let mut graph = SceneGraph::new();
        let root = graph.create_node(Vec2::zeros());
        let mut collisions = CollisionSystem::new();
        collisions.log_collisions = config.log_collisions;

        Ok(Self {
            graph,
            root,
            collisions,
            debug_draw: CollisionDebugDraw::new(),
            timer: Timer::new(),
            config,
            last_frame: FrameStats::default(),
            running: true,
        })
    }

    /// Run the engine main loop with the given application
    ///
    /// Frames are produced until something calls [`quit`](Engine::quit), a
    /// behavior requests it, or `max_frames` is reached.
    pub fn run<T: Application>(
        config: EngineConfig,
        app: &mut T,
        canvas: &mut dyn Canvas,
    ) -> Result<(), EngineError> {
        let mut engine = Self::new(config)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::Application(format!("App initialization: {e}")))?;

        log::info!("Starting main loop...");
        let result = engine.main_loop(app, canvas);

        app.cleanup(&mut engine);
        log::info!(
            "Engine shutdown complete after {} frames ({:.1} fps)",
            engine.timer.frame_count(),
            engine.timer.average_fps()
        );
        result
    }

    fn main_loop<T: Application>(
        &mut self,
        app: &mut T,
        canvas: &mut dyn Canvas,
    ) -> Result<(), EngineError> {
        while self.running {
            let stats = self.frame(canvas)?;
            app.update(self, &stats)
                .map_err(|e| EngineError::Application(format!("App update: {e}")))?;

            if self.config.max_frames.is_some_and(|max| stats.frame >= max) {
                log::info!("Reached frame limit ({})", stats.frame);
                self.running = false;
            }
        }
        Ok(())
    }

    /// Run one frame using the engine's own clock
    ///
    /// The first frame always sees a delta of zero. When `fixed_delta` is
    /// configured every later frame uses it instead of wall-clock time.
    pub fn frame(&mut self, canvas: &mut dyn Canvas) -> Result<FrameStats, EngineError> {
        let delta = match self.config.fixed_delta {
            Some(fixed) if self.timer.frame_count() > 0 => self.timer.advance(fixed),
            Some(_) => self.timer.advance(0.0),
            None => self.timer.tick(),
        };
        self.step(delta, canvas)
    }

    /// Run one frame with a host-supplied delta in seconds
    pub fn frame_with_delta(
        &mut self,
        delta: f32,
        canvas: &mut dyn Canvas,
    ) -> Result<FrameStats, EngineError> {
        let delta = self.timer.advance(delta);
        self.step(delta, canvas)
    }

    fn step(&mut self, delta: f32, canvas: &mut dyn Canvas) -> Result<FrameStats, EngineError> {
        let mut stats = FrameStats {
            frame: self.timer.frame_count(),
            delta,
            ..FrameStats::default()
        };

        // Area lists only describe the pass that produced them
        self.graph.clear_area_contacts();

        if !self.root_alive() {
            self.last_frame = stats;
            return Ok(stats);
        }

        let mut ctx = FrameContext::new(delta, stats.frame);
        let watch = Stopwatch::start_new();
        self.graph.update(self.root, &mut ctx)?;
        stats.update_micros = watch.elapsed_micros();

        if let Some(target) = ctx.take_navigation() {
            self.navigate(target);
        }
        if ctx.quit_requested() {
            self.quit();
        }

        // A behavior may have removed the active root during the update pass
        if !self.root_alive() {
            self.last_frame = stats;
            return Ok(stats);
        }

        if self.config.collisions_enabled {
            let watch = Stopwatch::start_new();
            self.collisions.detect_and_resolve(&mut self.graph, self.root)?;
            stats.collision_micros = watch.elapsed_micros();
            stats.collisions = self.collisions.stats();
        }

        let watch = Stopwatch::start_new();
        self.graph.draw(self.root, canvas)?;
        if self.config.debug_draw_shapes {
            self.debug_draw.draw(&self.graph, self.root, &self.collisions, canvas)?;
        }
        stats.draw_micros = watch.elapsed_micros();

        self.last_frame = stats;
        Ok(stats)
    }

    /// Stops the engine when the active root no longer exists
    fn root_alive(&mut self) -> bool {
        if self.graph.contains(self.root) {
            return true;
        }
        if self.running {
            log::warn!("Active scene {:?} was removed, stopping", self.root);
            self.quit();
        }
        false
    }

    fn navigate(&mut self, target: NodeId) {
        if !self.graph.contains(target) {
            log::warn!("Ignoring navigation to missing scene {:?}", target);
            return;
        }
        if target != self.root {
            log::debug!("Navigating from {:?} to {:?}", self.root, target);
            self.root = target;
            self.collisions.clear();
        }
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop keeps producing frames
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The scene graph
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Mutable access to the scene graph
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Root of the active scene
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Make another tree the active scene immediately
    pub fn set_root(&mut self, root: NodeId) -> Result<(), SceneError> {
        self.graph.node(root)?;
        self.root = root;
        self.collisions.clear();
        Ok(())
    }

    /// Collision system, for contact queries between frames
    pub fn collisions(&self) -> &CollisionSystem {
        &self.collisions
    }

    /// Debug overlay settings
    pub fn debug_draw_mut(&mut self) -> &mut CollisionDebugDraw {
        &mut self.debug_draw
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Statistics of the most recent frame
    pub fn last_frame(&self) -> &FrameStats {
        &self.last_frame
    }

    /// Get the current frame delta time
    pub fn delta_time(&self) -> f32 {
        self.timer.delta_time()
    }
}

/// Timing and counters for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Frame index, starting at 1
    pub frame: u64,
    /// Delta handed to behaviors, in seconds
    pub delta: f32,
    /// Time spent in the update pass
    pub update_micros: u64,
    /// Time spent detecting and resolving collisions
    pub collision_micros: u64,
    /// Time spent drawing, debug overlay included
    pub draw_micros: u64,
    /// Collision pass counters
    pub collisions: CollisionStats,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// `env_logger` filter used when the binary does not set `RUST_LOG`
    pub log_filter: String,

    /// Stop after this many frames (headless runs)
    pub max_frames: Option<u64>,

    /// Fixed timestep in seconds instead of wall-clock deltas
    pub fixed_delta: Option<f32>,

    /// Run the collision pass
    pub collisions_enabled: bool,

    /// Trace every resolved collision pair
    pub log_collisions: bool,

    /// Outline collision shapes after the draw pass
    pub debug_draw_shapes: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            max_frames: None,
            fixed_delta: None,
            collisions_enabled: true,
            log_collisions: false,
            debug_draw_shapes: cfg!(debug_assertions),
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(delta) = self.fixed_delta {
            if !delta.is_finite() || delta <= 0.0 {
                return Err(ConfigError::Invalid {
                    field: "fixed_delta",
                    reason: format!("must be a positive number of seconds, got {delta}"),
                });
            }
        }
        if self.max_frames == Some(0) {
            return Err(ConfigError::Invalid {
                field: "max_frames",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene tree error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Application error
    #[error("Application error: {0}")]
    Application(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AppError;
    use crate::foundation::math::vec2;
    use crate::physics::{CollisionBody, CollisionLayers, CollisionShape};
    use crate::render::{NullCanvas, RecordingCanvas};
    use crate::scene::NodeBehavior;
    use approx::assert_relative_eq;

    fn headless_config() -> EngineConfig {
        EngineConfig {
            debug_draw_shapes: false,
            ..EngineConfig::default()
        }
    }

    fn square(graph: &mut SceneGraph, body: fn(CollisionShape) -> CollisionBody, at: Vec2) -> NodeId {
        graph.create_body(at, body(CollisionShape::rectangle(vec2(0.0, 0.0), 10.0, 10.0)))
    }

    #[test]
    fn test_config_validation() {
        assert!(EngineConfig::default().validate().is_ok());

        let bad_delta = EngineConfig { fixed_delta: Some(-1.0), ..EngineConfig::default() };
        assert!(matches!(
            Engine::new(bad_delta),
            Err(EngineError::Config(ConfigError::Invalid { field: "fixed_delta", .. }))
        ));

        let bad_frames = EngineConfig { max_frames: Some(0), ..EngineConfig::default() };
        assert!(bad_frames.validate().is_err());
    }

    #[test]
    fn test_config_round_trip() {
        let config = EngineConfig {
            max_frames: Some(120),
            fixed_delta: Some(0.02),
            log_collisions: true,
            ..EngineConfig::default()
        };
        let dir = std::env::temp_dir();

        for name in ["scene_engine_test_config.toml", "scene_engine_test_config.ron"] {
            let path = dir.join(name);
            let path = path.to_str().unwrap();
            config.save_to_file(path).unwrap();
            let loaded = EngineConfig::load_from_file(path).unwrap();
            std::fs::remove_file(path).unwrap();
            assert_eq!(loaded, config);
        }

        assert!(matches!(
            config.save_to_file("config.json"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_config_falls_back_to_default() {
        let path = std::env::temp_dir().join("scene_engine_missing_config.toml");
        let loaded = EngineConfig::load_or_default(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded, EngineConfig::default());
    }

    #[test]
    fn test_first_frame_has_zero_delta() {
        let config = EngineConfig { fixed_delta: Some(0.5), ..headless_config() };
        let mut engine = Engine::new(config).unwrap();

        let first = engine.frame(&mut NullCanvas).unwrap();
        let second = engine.frame(&mut NullCanvas).unwrap();

        assert_eq!(first.frame, 1);
        assert_relative_eq!(first.delta, 0.0);
        assert_eq!(second.frame, 2);
        assert_relative_eq!(second.delta, 0.5);
    }

    struct Fall {
        speed: f32,
    }

    impl NodeBehavior for Fall {
        fn process(&mut self, node: NodeId, graph: &mut SceneGraph, ctx: &mut FrameContext) {
            graph.translate(node, vec2(0.0, self.speed * ctx.delta())).unwrap();
        }
    }

    #[test]
    fn test_update_runs_before_collisions() {
        let mut engine = Engine::new(headless_config()).unwrap();
        let root = engine.root();
        let graph = engine.graph_mut();
        let falling = square(graph, CollisionBody::dynamic, vec2(0.0, 0.0));
        let floor = square(graph, CollisionBody::fixed, vec2(0.0, 20.0));
        graph.add_child(root, falling).unwrap();
        graph.add_child(root, floor).unwrap();
        graph.set_behavior(falling, Fall { speed: 10.0 }).unwrap();

        // Moves to y = 10, touching the floor edge, then gets pushed by 0
        let stats = engine.frame_with_delta(1.0, &mut NullCanvas).unwrap();
        assert_eq!(stats.collisions.contacts, 1);
        assert_relative_eq!(engine.graph().position(falling).unwrap().y, 10.0);

        // Moves to y = 15, overlapping by 5, pushed back up by the full MTV
        engine.frame_with_delta(0.5, &mut NullCanvas).unwrap();
        assert_relative_eq!(engine.graph().position(falling).unwrap().y, 10.0);
        assert_eq!(engine.graph().position(floor).unwrap(), vec2(0.0, 20.0));
    }

    #[test]
    fn test_area_contacts_reset_each_frame() {
        let mut engine = Engine::new(headless_config()).unwrap();
        let root = engine.root();
        let graph = engine.graph_mut();
        let area = square(graph, CollisionBody::area, vec2(0.0, 0.0));
        let visitor = square(graph, CollisionBody::fixed, vec2(5.0, 5.0));
        graph.add_child(root, area).unwrap();
        graph.add_child(root, visitor).unwrap();

        engine.frame_with_delta(0.0, &mut NullCanvas).unwrap();
        assert_eq!(engine.graph().colliding_bodies(area).unwrap(), &[visitor]);

        engine.graph_mut().set_position(visitor, vec2(100.0, 100.0)).unwrap();
        engine.frame_with_delta(0.0, &mut NullCanvas).unwrap();
        assert!(engine.graph().colliding_bodies(area).unwrap().is_empty());
        assert_eq!(engine.collisions().collisions_exited().len(), 1);
    }

    #[test]
    fn test_disjoint_layers_never_notified() {
        let mut engine = Engine::new(headless_config()).unwrap();
        let root = engine.root();
        let graph = engine.graph_mut();
        let a = square(graph, CollisionBody::dynamic, vec2(0.0, 0.0));
        let shape = CollisionShape::rectangle(vec2(0.0, 0.0), 10.0, 10.0);
        let layers = CollisionLayers::with_layers(&[2, 4]).unwrap();
        let b = graph.create_body(vec2(0.0, 0.0), CollisionBody::dynamic(shape).with_layers(layers));
        graph.add_child(root, a).unwrap();
        graph.add_child(root, b).unwrap();

        let stats = engine.frame_with_delta(0.016, &mut NullCanvas).unwrap();

        assert_eq!(stats.collisions.contacts, 0);
        assert_eq!(stats.collisions.pairs_filtered, 1);
        assert_eq!(engine.graph().position(a).unwrap(), vec2(0.0, 0.0));
        assert_eq!(engine.graph().position(b).unwrap(), vec2(0.0, 0.0));
    }

    struct GoTo {
        target: NodeId,
        after: u64,
    }

    impl NodeBehavior for GoTo {
        fn process(&mut self, _node: NodeId, _graph: &mut SceneGraph, ctx: &mut FrameContext) {
            if ctx.frame() == self.after {
                ctx.navigate_to(self.target);
            }
        }
    }

    #[test]
    fn test_navigation_switches_root_after_update() {
        let mut engine = Engine::new(headless_config()).unwrap();
        let first = engine.root();
        let second = engine.graph_mut().create_node(vec2(0.0, 0.0));
        engine.graph_mut().set_behavior(first, GoTo { target: second, after: 2 }).unwrap();

        engine.frame_with_delta(0.0, &mut NullCanvas).unwrap();
        assert_eq!(engine.root(), first);

        engine.frame_with_delta(0.0, &mut NullCanvas).unwrap();
        assert_eq!(engine.root(), second);
        assert!(engine.graph().contains(first));
    }

    #[test]
    fn test_navigation_to_missing_scene_is_ignored() {
        let mut engine = Engine::new(headless_config()).unwrap();
        let first = engine.root();
        let gone = engine.graph_mut().create_node(vec2(0.0, 0.0));
        engine.graph_mut().remove(gone).unwrap();
        engine.graph_mut().set_behavior(first, GoTo { target: gone, after: 1 }).unwrap();

        engine.frame_with_delta(0.0, &mut NullCanvas).unwrap();

        assert_eq!(engine.root(), first);
    }

    #[test]
    fn test_debug_draw_outlines_bodies() {
        let config = EngineConfig { debug_draw_shapes: true, ..EngineConfig::default() };
        let mut engine = Engine::new(config).unwrap();
        let root = engine.root();
        let body = square(engine.graph_mut(), CollisionBody::fixed, vec2(1.0, 2.0));
        engine.graph_mut().add_child(root, body).unwrap();
        let mut canvas = RecordingCanvas::new();

        engine.frame_with_delta(0.0, &mut canvas).unwrap();

        assert_eq!(canvas.commands().len(), 1);
    }

    struct CountingApp {
        frames: u64,
        cleaned_up: bool,
    }

    impl Application for CountingApp {
        fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
            let scene = engine.graph_mut().create_node(vec2(0.0, 0.0));
            engine.set_root(scene)?;
            Ok(())
        }

        fn update(&mut self, _engine: &mut Engine, stats: &FrameStats) -> Result<(), AppError> {
            self.frames = stats.frame;
            Ok(())
        }

        fn cleanup(&mut self, _engine: &mut Engine) {
            self.cleaned_up = true;
        }
    }

    #[test]
    fn test_run_stops_at_max_frames() {
        let config = EngineConfig {
            max_frames: Some(5),
            fixed_delta: Some(1.0 / 60.0),
            ..headless_config()
        };
        let mut app = CountingApp { frames: 0, cleaned_up: false };

        Engine::run(config, &mut app, &mut NullCanvas).unwrap();

        assert_eq!(app.frames, 5);
        assert!(app.cleaned_up);
    }

    struct RemoveSelf;

    impl NodeBehavior for RemoveSelf {
        fn process(&mut self, node: NodeId, graph: &mut SceneGraph, _ctx: &mut FrameContext) {
            graph.remove(node).unwrap();
        }
    }

    #[test]
    fn test_root_removing_itself_stops_cleanly() {
        let mut engine = Engine::new(headless_config()).unwrap();
        let root = engine.root();
        let body = square(engine.graph_mut(), CollisionBody::dynamic, vec2(0.0, 0.0));
        engine.graph_mut().add_child(root, body).unwrap();
        engine.graph_mut().set_behavior(root, RemoveSelf).unwrap();
        let mut canvas = RecordingCanvas::new();

        let stats = engine.frame_with_delta(0.0, &mut canvas).unwrap();

        assert_eq!(stats.frame, 1);
        assert_eq!(stats.collisions, CollisionStats::default());
        assert!(!engine.graph().contains(root));
        assert!(!engine.graph().contains(body));
        assert!(!engine.is_running());
        assert!(canvas.commands().is_empty());

        // Later frames keep succeeding and do nothing
        let next = engine.frame_with_delta(0.016, &mut canvas).unwrap();
        assert_eq!(next.frame, 2);
        assert!(canvas.commands().is_empty());
    }

    struct RemoveRootApp;

    impl Application for RemoveRootApp {
        fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
            let root = engine.root();
            engine.graph_mut().set_behavior(root, RemoveSelf)?;
            Ok(())
        }

        fn cleanup(&mut self, _engine: &mut Engine) {}
    }

    #[test]
    fn test_run_ends_when_root_is_removed() {
        let config = EngineConfig { max_frames: Some(10), ..headless_config() };

        assert!(Engine::run(config, &mut RemoveRootApp, &mut NullCanvas).is_ok());
    }

    struct Quitter;

    impl NodeBehavior for Quitter {
        fn process(&mut self, _node: NodeId, _graph: &mut SceneGraph, ctx: &mut FrameContext) {
            ctx.request_quit();
        }
    }

    #[test]
    fn test_behavior_can_request_quit() {
        let mut engine = Engine::new(headless_config()).unwrap();
        let root = engine.root();
        engine.graph_mut().set_behavior(root, Quitter).unwrap();

        engine.frame_with_delta(0.0, &mut NullCanvas).unwrap();

        assert!(!engine.is_running());
    }
}
