//! Spawn helpers + startup validation

use bevy::prelude::*;
use thiserror::Error;

use super::surface::{ContactTag, Surface};
use super::sword::SwordController;
use crate::config::SwordConfig;
use crate::input::RawInput;
use crate::physics::{SwordBody, TransformControl};
use crate::progression::CheckpointId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("sword {0:?} has no SwordBody: a rigid body is required")]
    MissingRigidBody(Entity),
}

/// Spawn a sword в rest pose со всеми компонентами контроллера
///
/// Rapier компоненты добавляются отдельно (`rapier_bridge::sword_rapier_bundle`).
pub fn spawn_sword(commands: &mut Commands, config: SwordConfig, position: Vec3) -> Entity {
    let mut transform = Transform::from_translation(position);
    transform.set_euler_degrees(Vec3::from_array(config.body.rest_euler_degrees));

    commands
        .spawn((
            transform,
            SwordBody::from_tuning(&config.body),
            RawInput::default(),
            ContactTag(config.contact_tag.clone()),
            SwordController::new(config),
        ))
        .id()
}

/// Spawn a stand; `pivot_offset` относительно позиции stand
pub fn spawn_stand(commands: &mut Commands, id: CheckpointId, position: Vec3, pivot_offset: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            Surface::Stand {
                id,
                pivot: position + pivot_offset,
            },
        ))
        .id()
}

pub fn spawn_floor(commands: &mut Commands, height: f32) -> Entity {
    commands
        .spawn((Transform::from_xyz(0.0, height, 0.0), Surface::Floor))
        .id()
}

/// Every sword must carry a rigid body before the first tick
pub fn find_swords_without_body(
    swords: &Query<Entity, (With<SwordController>, Without<SwordBody>)>,
) -> Result<(), SetupError> {
    match swords.iter().next() {
        Some(sword) => Err(SetupError::MissingRigidBody(sword)),
        None => Ok(()),
    }
}

/// PostStartup: sword без SwordBody - фатальная ошибка конфигурации сцены
pub fn verify_sword_rigs(swords: Query<Entity, (With<SwordController>, Without<SwordBody>)>) {
    if let Err(error) = find_swords_without_body(&swords) {
        crate::logger::log_error(&format!("❌ {}", error));
        panic!("{}", error);
    }
}
