//! Crate drop demo
//!
//! Runs headless: random crates fall onto a static floor, a sensor area logs
//! the crates passing through it, and after a while the engine navigates to a
//! second scene where two overlapping walls push each other apart.
//!
//! Settings are read from `crate_drop.toml` when present.

mod behaviors;

use behaviors::{Block, Gravity, QuitAfter, SceneTimer, TriggerLog};
use rand::prelude::*;
use scene_engine::foundation::logging;
use scene_engine::physics::Rect;
use scene_engine::prelude::*;

const CONFIG_PATH: &str = "crate_drop.toml";
const CRATE_COUNT: usize = 12;
const CRATE_SIZE: f32 = 16.0;
const FLOOR_Y: f32 = 400.0;
const SWITCH_AFTER_FRAMES: u64 = 240;

/// Canvas that only counts what it is asked to draw
#[derive(Default)]
struct CountingCanvas {
    filled: u64,
    stroked: u64,
}

impl Canvas for CountingCanvas {
    fn fill_rect(&mut self, _rect: Rect, _color: Color) {
        self.filled += 1;
    }

    fn stroke_rect(&mut self, _rect: Rect, _color: Color, _line_width: f32) {
        self.stroked += 1;
    }
}

struct CrateDropApp {
    crates: Vec<NodeId>,
    sensor: Option<NodeId>,
    walls: Vec<NodeId>,
}

impl CrateDropApp {
    fn new() -> Self {
        Self {
            crates: Vec::new(),
            sensor: None,
            walls: Vec::new(),
        }
    }

    fn build_playground(&mut self, engine: &mut Engine) -> Result<NodeId, AppError> {
        let root = engine.root();
        let graph = engine.graph_mut();
        let mut rng = thread_rng();

        let floor_size = vec2(640.0, 20.0);
        let floor = graph.create_body(
            vec2(0.0, FLOOR_Y),
            CollisionBody::fixed(CollisionShape::rectangle(Vec2::zeros(), floor_size.x, floor_size.y)),
        );
        graph.set_behavior(floor, Block::new(floor_size, Color::rgba(0.4, 0.4, 0.4, 1.0)))?;
        graph.add_child(root, floor)?;

        // Crates live under a container so the whole pile can be shifted at once
        let pile = graph.create_node(vec2(32.0, 0.0));
        graph.add_child(root, pile)?;
        for _ in 0..CRATE_COUNT {
            let position = vec2(rng.gen_range(0.0..560.0), rng.gen_range(-300.0..100.0));
            let shape = CollisionShape::rectangle(Vec2::zeros(), CRATE_SIZE, CRATE_SIZE);
            let body = graph.create_body(position, CollisionBody::dynamic(shape));
            let color = Color::rgba(rng.gen_range(0.5..1.0), rng.gen_range(0.3..0.6), 0.1, 1.0);
            let gravity = Gravity::new(
                rng.gen_range(300.0..600.0),
                400.0,
                vec2(CRATE_SIZE, CRATE_SIZE),
                color,
            );
            graph.set_behavior(body, gravity)?;
            graph.add_child(pile, body)?;
            self.crates.push(body);
        }

        // Sensor band just above the floor, on its own layer plus the default one
        let layers = CollisionLayers::with_layers(&[1, 2])?;
        let sensor = graph.create_body(
            vec2(0.0, FLOOR_Y - 40.0),
            CollisionBody::area(CollisionShape::rectangle(Vec2::zeros(), 640.0, 30.0)).with_layers(layers),
        );
        graph.set_behavior(sensor, TriggerLog::new("sensor"))?;
        graph.add_child(root, sensor)?;
        self.sensor = Some(sensor);

        log::info!(
            "Playground ready: {} crates, {} nodes in graph",
            self.crates.len(),
            graph.len()
        );
        Ok(root)
    }

    fn build_wall_scene(&mut self, engine: &mut Engine) -> Result<NodeId, AppError> {
        let graph = engine.graph_mut();
        let scene = graph.create_node(Vec2::zeros());
        graph.set_behavior(scene, QuitAfter::new(60))?;

        let size = vec2(100.0, 100.0);
        for x in [0.0, 60.0] {
            let wall = graph.create_body(
                vec2(x, 0.0),
                CollisionBody::fixed(CollisionShape::rectangle(Vec2::zeros(), size.x, size.y)),
            );
            graph.set_behavior(wall, Block::new(size, Color::WHITE))?;
            graph.add_child(scene, wall)?;
            self.walls.push(wall);
        }
        Ok(scene)
    }
}

impl Application for CrateDropApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Building scenes...");
        let playground = self.build_playground(engine)?;
        let walls = self.build_wall_scene(engine)?;
        engine
            .graph_mut()
            .set_behavior(playground, SceneTimer::new(walls, SWITCH_AFTER_FRAMES))?;
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, stats: &FrameStats) -> Result<(), AppError> {
        for pair in engine.collisions().collisions_entered() {
            log::trace!("Contact started: {:?} <-> {:?}", pair.a, pair.b);
        }

        if stats.frame % 60 == 0 {
            let in_sensor = match self.sensor {
                Some(sensor) if engine.graph().contains(sensor) => {
                    engine.graph().colliding_bodies(sensor)?.len()
                }
                _ => 0,
            };
            log::info!(
                "Frame {}: {} contacts, {} pairs tested, {} filtered, {} in sensor, update {}us, collide {}us",
                stats.frame,
                stats.collisions.contacts,
                stats.collisions.pairs_tested,
                stats.collisions.pairs_filtered,
                in_sensor,
                stats.update_micros,
                stats.collision_micros,
            );
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        let graph = engine.graph();
        let resting = self
            .crates
            .iter()
            .filter_map(|&id| graph.global_position(id).ok())
            .filter(|position| position.y + CRATE_SIZE >= FLOOR_Y - 1.0)
            .count();
        log::info!("{} of {} crates ended on the floor", resting, self.crates.len());

        for &wall in &self.walls {
            if let Ok(position) = graph.position(wall) {
                log::info!("Wall {:?} settled at ({:.1}, {:.1})", wall, position.x, position.y);
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = EngineConfig::load_or_default(CONFIG_PATH)?;
    if config.max_frames.is_none() {
        config.max_frames = Some(600);
    }
    if config.fixed_delta.is_none() {
        config.fixed_delta = Some(1.0 / 60.0);
    }

    logging::init_with_filter(&config.log_filter);

    log::info!("Starting crate drop demo");

    let mut app = CrateDropApp::new();
    let mut canvas = CountingCanvas::default();
    match Engine::run(config, &mut app, &mut canvas) {
        Ok(()) => {
            log::info!(
                "Crate drop demo completed ({} fills, {} outlines drawn)",
                canvas.filled,
                canvas.stroked
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Crate drop demo failed: {}", e);
            Err(e.into())
        }
    }
}
