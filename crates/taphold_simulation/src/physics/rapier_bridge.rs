//! Синхронизация `SwordBody` ↔ bevy_rapier3d
//!
//! Routines пишут только в `SwordBody`; bridge раз в tick переносит
//! накопленные impulses / velocity reset / mass / drag в Rapier
//! компоненты и читает скорости обратно. Collision events Rapier
//! превращаются в `SurfaceContact`.
//!
//! Требует `RapierPhysicsPlugin` в App (headless тесты обходятся без него).

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::body::{ImpulseSpace, SwordBody};
use crate::controller::{Surface, SurfaceContact, SwordController, SwordSet};

/// Rapier компоненты для sword entity
///
/// Dynamic body, тонкий cuboid collider, collision events включены.
pub fn sword_rapier_bundle(body: &SwordBody) -> impl Bundle {
    (
        RigidBody::Dynamic,
        Collider::cuboid(0.05, 0.6, 0.02),
        Velocity::zero(),
        ExternalImpulse::default(),
        Damping {
            linear_damping: body.drag,
            angular_damping: 0.5,
        },
        AdditionalMassProperties::Mass(body.mass),
        ActiveEvents::COLLISION_EVENTS,
    )
}

/// Rapier скорости → зеркало в `SwordBody` (до routines)
pub fn pull_rapier_velocities(mut swords: Query<(&mut SwordBody, &Velocity)>) {
    for (mut body, velocity) in swords.iter_mut() {
        body.linear_velocity = velocity.linvel;
        body.angular_velocity = velocity.angvel;
    }
}

/// Накопленное за tick в `SwordBody` → Rapier компоненты
pub fn push_body_to_rapier(
    mut swords: Query<(
        &mut SwordBody,
        &Transform,
        &mut Velocity,
        &mut ExternalImpulse,
        &mut Damping,
        &mut AdditionalMassProperties,
    )>,
) {
    for (mut body, transform, mut velocity, mut external, mut damping, mut mass) in swords.iter_mut() {
        if body.take_velocity_reset() {
            *velocity = Velocity::zero();
        }

        for pending in body.drain_impulses() {
            let world_impulse = match pending.space {
                ImpulseSpace::World => pending.impulse,
                ImpulseSpace::Local => transform.rotation * pending.impulse,
            };
            external.impulse += world_impulse;
        }

        if damping.linear_damping != body.drag {
            damping.linear_damping = body.drag;
        }

        let mass_in_sync = matches!(*mass, AdditionalMassProperties::Mass(current) if current == body.mass);
        if !mass_in_sync {
            *mass = AdditionalMassProperties::Mass(body.mass);
        }
    }
}

/// Rapier `CollisionEvent::Started` (sword ↔ surface) → `SurfaceContact`
pub fn collect_rapier_contacts(
    mut collisions: EventReader<CollisionEvent>,
    swords: Query<(), With<SwordController>>,
    surfaces: Query<(), With<Surface>>,
    mut contacts: EventWriter<SurfaceContact>,
) {
    for collision in collisions.read() {
        let &CollisionEvent::Started(a, b, _) = collision else {
            continue;
        };

        let pair = if swords.contains(a) && surfaces.contains(b) {
            Some((a, b))
        } else if swords.contains(b) && surfaces.contains(a) {
            Some((b, a))
        } else {
            None
        };

        if let Some((sword, surface)) = pair {
            contacts.write(SurfaceContact { sword, surface });
        }
    }
}

/// Rapier bridge plugin
///
/// Порядок внутри FixedUpdate:
/// pull velocities → [SwordSet chain, contacts в Commands] → push body → Settle
pub struct RapierBridgePlugin;

impl Plugin for RapierBridgePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CollisionEvent>();

        app.add_systems(
            FixedUpdate,
            (
                pull_rapier_velocities.before(SwordSet::Edges),
                collect_rapier_contacts.in_set(SwordSet::Commands),
                push_body_to_rapier.after(SwordSet::Publish).before(SwordSet::Settle),
            ),
        );
    }
}
