//! Application trait and lifecycle management

use crate::config::ConfigError;
use crate::engine::{Engine, EngineError, FrameStats};
use crate::physics::PhysicsError;
use crate::scene::SceneError;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive a game through [`Engine::run`].
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine is created. Build the initial scene here
    /// and make it active with [`Engine::set_root`].
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Called after every completed frame
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `stats` - Timing and collision counters of the frame that just ran
    fn update(&mut self, _engine: &mut Engine, _stats: &FrameStats) -> Result<(), AppError> {
        Ok(())
    }

    /// Cleanup the application
    ///
    /// Called once when the main loop ends, successfully or not.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Scene tree error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Physics error
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
