//! TapHold Simulation Core
//!
//! ECS-симуляция tap-hold-tap меча на Bevy 0.16:
//! - stage 1: tap → jump impulse
//! - stage 2: hold → charge (spin + накопление силы), release → stab
//! - stands (checkpoints) + floor parking
//!
//! Physics backend (bevy_rapier3d) подключается отдельно через
//! `RapierBridgePlugin`; без него симуляция остаётся полностью headless.

use bevy::prelude::*;

// Публичные модули
pub mod config;
pub mod controller;
pub mod input;
pub mod logger;
pub mod physics;
pub mod progression;
pub mod stage;

// Re-export основных типов для удобства
pub use config::{ConfigError, SwordConfig};
pub use controller::{
    spawn_floor, spawn_stand, spawn_sword, ContactTag, DebugAction, DebugCommand, SetupError, StabExecuted, Surface,
    StandBinding, SurfaceContact, SwordController, SwordPlugin, SwordSet,
};
pub use input::{InputKey, InputPressed, InputReleased, RawInput};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use physics::{ChargeExit, RapierBridgePlugin, SwordBody};
pub use progression::{CheckpointId, ProgressionError, StandProgression};
pub use stage::{GameStage, StageChanged, StageCompleted};

/// Главный plugin симуляции
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .add_plugins(SwordPlugin);
    }
}

/// Создаёт minimal Bevy App для headless симуляции (SimulationPlugin включён)
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, SimulationPlugin));

    app
}

/// State of one sword at the end of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwordSnapshot {
    pub entity: Entity,
    pub stage: GameStage,
    pub stab_force: Vec3,
    pub impulse_count: u32,
    pub mass: f32,
    pub drag: f32,
    pub translation: Vec3,
    pub rotation: Quat,
}

/// Все мечи мира, по возрастанию entity index
pub fn sword_snapshot(world: &mut World) -> Vec<SwordSnapshot> {
    let mut query = world.query::<(Entity, &SwordController, &SwordBody, &Transform)>();
    let mut swords: Vec<SwordSnapshot> = query
        .iter(world)
        .map(|(entity, controller, body, transform)| SwordSnapshot {
            entity,
            stage: controller.stage(),
            stab_force: controller.engine().state().stab_force,
            impulse_count: body.impulse_count(),
            mass: body.mass,
            drag: body.drag,
            translation: transform.translation,
            rotation: transform.rotation,
        })
        .collect();

    swords.sort_by_key(|sword| sword.entity.index());
    swords
}
