//! Sword controller module (SequenceCoordinator)
//!
//! # Архитектура
//!
//! ```text
//! RawInput ──► InputEdgeDetector ──► SwordController ──► StageMachine
//!                                         │
//!                                         ├──► ChargeEngine ──► SwordBody / Transform
//!                                         ├──► StandBinding ◄── SurfaceContact + StandProgression
//!                                         └──► notices ──► Bevy events
//! ```
//!
//! Один tick (FixedUpdate, `SwordSet` chain):
//! 1. Edges - edge detection, held flag этого tick
//! 2. Routines - `ChargeEngine::tick`, stage-complete handling
//! 3. Input - press/release dispatch (+ debug keys)
//! 4. Commands - `DebugCommand` events, rapier contacts
//! 5. Contacts - `SurfaceContact` → stand / floor
//! 6. Publish - outbox → `InputPressed`, `StageChanged`, `StabExecuted`, ...
//! 7. Settle - невостребованные impulses / velocity reset выбрасываются
//!
//! Routine, запущенный на tick N, впервые наблюдается на tick N+1.
//! Release на tick завершения stage 1 уже виден continuous-проверке.

use bevy::prelude::*;

pub mod debug;
pub mod events;
pub mod spawn;
pub mod surface;
pub mod sword;
pub mod systems;

#[cfg(test)]
mod sequence_tests;

// Re-export основных типов
pub use debug::{DebugAction, DebugCommand};
pub use events::StabExecuted;
pub use spawn::{spawn_floor, spawn_stand, spawn_sword, SetupError};
pub use surface::{ContactTag, Surface, SurfaceContact};
pub use sword::{StandBinding, SwordController, SwordNotice};

use crate::input::{InputPressed, InputReleased};
use crate::stage::{StageChanged, StageCompleted};

/// Фазы одного fixed tick (строго последовательно)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwordSet {
    Edges,
    Routines,
    Input,
    Commands,
    Contacts,
    Publish,
    Settle,
}

/// Sword Plugin
///
/// Регистрирует события и sword системы в FixedUpdate.
pub struct SwordPlugin;

impl Plugin for SwordPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<InputPressed>()
            .add_event::<InputReleased>()
            .add_event::<StageChanged>()
            .add_event::<StageCompleted>()
            .add_event::<StabExecuted>()
            .add_event::<SurfaceContact>()
            .add_event::<DebugCommand>();

        app.register_type::<Surface>()
            .register_type::<ContactTag>()
            .register_type::<crate::physics::SwordBody>();

        app.configure_sets(
            FixedUpdate,
            (
                SwordSet::Edges,
                SwordSet::Routines,
                SwordSet::Input,
                SwordSet::Commands,
                SwordSet::Contacts,
                SwordSet::Publish,
                SwordSet::Settle,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::resolve_sword_input.in_set(SwordSet::Edges),
                systems::advance_sword_routines.in_set(SwordSet::Routines),
                systems::dispatch_sword_input.in_set(SwordSet::Input),
                systems::apply_debug_commands.in_set(SwordSet::Commands),
                systems::apply_surface_contacts.in_set(SwordSet::Contacts),
                systems::publish_sword_notices.in_set(SwordSet::Publish),
                systems::settle_sword_bodies.in_set(SwordSet::Settle),
            ),
        );

        app.add_systems(PostStartup, spawn::verify_sword_rigs);
    }
}
