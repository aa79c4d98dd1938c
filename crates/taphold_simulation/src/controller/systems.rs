//! SwordPlugin systems (FixedUpdate, см. `SwordSet` порядок)

use bevy::prelude::*;

use super::debug::DebugCommand;
use super::events::StabExecuted;
use super::surface::{ContactTag, Surface, SurfaceContact};
use super::sword::{SwordController, SwordNotice};
use crate::input::{InputPressed, InputReleased, RawInput};
use crate::logger;
use crate::physics::{Rig, SwordBody};
use crate::progression::StandProgression;
use crate::stage::{StageChanged, StageCompleted};

/// Фаза 1: RawInput → edges + held текущего tick (без dispatch)
pub fn resolve_sword_input(mut swords: Query<(&RawInput, &mut SwordController)>) {
    for (raw, mut controller) in swords.iter_mut() {
        controller.resolve_input(raw);
    }
}

/// Фаза 2: двигаем scheduled routines на fixed delta
pub fn advance_sword_routines(
    time: Res<Time<Fixed>>,
    mut swords: Query<(&mut SwordController, &mut SwordBody, &mut Transform)>,
) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    for (mut controller, mut body, mut transform) in swords.iter_mut() {
        let mut rig = Rig::new(&mut *body, &mut *transform);
        controller.tick(delta, &mut rig);
    }
}

/// Фаза 3: dispatch edges, resolved в фазе 1 (+ debug keys)
pub fn dispatch_sword_input(
    mut swords: Query<(&RawInput, &mut SwordController, &mut SwordBody, &mut Transform)>,
) {
    for (raw, mut controller, mut body, mut transform) in swords.iter_mut() {
        let mut rig = Rig::new(&mut *body, &mut *transform);
        controller.dispatch_input(raw, &mut rig);
    }
}

/// Фаза 4: debug commands от хоста / тестов
pub fn apply_debug_commands(
    mut commands_events: EventReader<DebugCommand>,
    mut swords: Query<(&mut SwordController, &mut SwordBody, &mut Transform)>,
) {
    for command in commands_events.read() {
        let Ok((mut controller, mut body, mut transform)) = swords.get_mut(command.sword) else {
            logger::log_warning(&format!(
                "DebugCommand {:?} for unknown sword {:?}",
                command.action, command.sword
            ));
            continue;
        };

        let mut rig = Rig::new(&mut *body, &mut *transform);
        controller.apply_debug_action(command.action, &mut rig);
    }
}

/// Фаза 5: surface contacts → stand binding / floor parking
pub fn apply_surface_contacts(
    mut contacts: EventReader<SurfaceContact>,
    mut swords: Query<(&mut SwordController, &mut SwordBody, &mut Transform, Option<&ContactTag>)>,
    surfaces: Query<&Surface>,
    progression: Option<Res<StandProgression>>,
) {
    for contact in contacts.read() {
        let Ok(surface) = surfaces.get(contact.surface) else {
            // Поверхность без Surface (стены, decor) - не наш контакт
            continue;
        };
        let Ok((mut controller, mut body, mut transform, tag)) = swords.get_mut(contact.sword) else {
            continue;
        };

        let tag = tag.map(|tag| tag.0.as_str());
        let mut rig = Rig::new(&mut *body, &mut *transform);

        match *surface {
            Surface::Stand { id, pivot } => {
                controller.on_stand_contact(id, pivot, tag, progression.as_deref(), &mut rig);
            }
            Surface::Floor => controller.on_floor_contact(tag, &mut rig),
        }
    }
}

/// Фаза 6: outbox контроллера → Bevy events (в порядке возникновения)
pub fn publish_sword_notices(
    mut swords: Query<(Entity, &mut SwordController)>,
    mut pressed: EventWriter<InputPressed>,
    mut released: EventWriter<InputReleased>,
    mut changed: EventWriter<StageChanged>,
    mut completed: EventWriter<StageCompleted>,
    mut stabs: EventWriter<StabExecuted>,
) {
    for (sword, mut controller) in swords.iter_mut() {
        for notice in controller.drain_notices() {
            match notice {
                SwordNotice::Pressed => {
                    pressed.write(InputPressed { sword });
                }
                SwordNotice::Released => {
                    released.write(InputReleased { sword });
                }
                SwordNotice::StageChanged(stage) => {
                    changed.write(StageChanged { sword, stage });
                }
                SwordNotice::StageCompleted(stage) => {
                    completed.write(StageCompleted { sword, stage });
                }
                SwordNotice::Stab { force, exit } => {
                    stabs.write(StabExecuted { sword, force, exit });
                }
            }
        }
    }
}

/// Фаза 7: body outbox, который никто не забрал за tick, выбрасывается
///
/// С `RapierBridgePlugin` push успевает раньше и здесь уже пусто.
pub fn settle_sword_bodies(mut bodies: Query<&mut SwordBody>) {
    for mut body in bodies.iter_mut() {
        body.discard_pending();
    }
}
