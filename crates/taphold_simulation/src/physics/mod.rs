//! Physics module
//!
//! - body: rigid-body / transform abstractions + `SwordBody` component
//! - charge: jump и charge+stab routines (`ChargeEngine`)
//! - rapier_bridge: синхронизация `SwordBody` ↔ bevy_rapier3d

pub mod body;
pub mod charge;
pub mod rapier_bridge;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod charge_tests;

// Re-export основных типов
pub use body::{BodyImpulse, ImpulseSpace, Rig, RigidBodyControl, SwordBody, TransformControl};
pub use charge::{ChargeEngine, ChargeExit, ChargeState, EngineEvent, TIME_EPSILON};
pub use rapier_bridge::RapierBridgePlugin;
