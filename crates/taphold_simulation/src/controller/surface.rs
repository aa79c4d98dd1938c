//! Surfaces the sword hits: stands (checkpoints) и floor
//!
//! Контакты приходят как `SurfaceContact` events (rapier bridge или хост
//! напрямую) и обрабатываются `SwordController::on_*_contact`.

use bevy::prelude::*;

use super::sword::SwordController;
use crate::logger;
use crate::physics::Rig;
use crate::progression::{CheckpointId, ProgressionError, StandProgression};

/// Surface type of a scene object
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub enum Surface {
    /// Checkpoint the sword can stick into
    Stand {
        id: CheckpointId,
        /// Where a sword bound to this stand is parked after a floor hit
        pivot: Vec3,
    },
    Floor,
}

/// Collision tag of the sword's collider
///
/// Сравнивается с `SwordConfig::contact_tag`; без совпадения contact
/// со stand только взводит first-collision, floor игнорирует полностью.
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ContactTag(pub String);

/// A sword started touching a surface entity
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceContact {
    pub sword: Entity,
    pub surface: Entity,
}

impl SwordController {
    fn tag_matches(&self, contact_tag: Option<&str>) -> bool {
        contact_tag == Some(self.config.contact_tag.as_str())
    }

    /// Sword touched a stand.
    ///
    /// 1. Первый контакт вообще: взводим first_collision; при совпадении
    ///    тега → full reset + bind на этот stand.
    /// 2. Повторный контакт при существующем binding → full reset.
    /// 3. Контакт с другим stand → bind, если прогрессия разрешает.
    ///    Без binding сравнивать не с чем: warning, stand не привязывается.
    pub fn on_stand_contact(
        &mut self,
        stand: CheckpointId,
        pivot: Vec3,
        contact_tag: Option<&str>,
        progression: Option<&StandProgression>,
        rig: &mut Rig<'_>,
    ) {
        if !self.binding.first_collision && self.binding.current.is_none() {
            self.binding.first_collision = true;

            if self.tag_matches(contact_tag) {
                self.reset_to_initial_stage(rig);
                self.bind_stand(stand, pivot);
            }
        } else if self.binding.first_collision && self.binding.current.is_some() {
            self.reset_to_initial_stage(rig);
        }

        let Some(current) = self.binding.current else {
            logger::log_warning(&format!(
                "Stand progression rejected: {}",
                ProgressionError::NoCurrentStand(stand)
            ));
            return;
        };
        if current == stand {
            return;
        }

        match progression {
            Some(progression) => {
                if progression.validate_progression(current, stand) {
                    self.bind_stand(stand, pivot);
                }
            }
            None => {
                logger::log_warning(&format!(
                    "No StandProgression installed, stand {:?} not bound",
                    stand
                ));
            }
        }
    }

    /// Sword hit the floor: snap back to the bound stand in rest pose.
    ///
    /// Stage и scheduled routine не трогаются.
    pub fn on_floor_contact(&mut self, contact_tag: Option<&str>, rig: &mut Rig<'_>) {
        if !self.tag_matches(contact_tag) {
            return;
        }

        rig.body.reset_velocities();
        rig.transform
            .set_euler_degrees(Vec3::from_array(self.config.body.rest_euler_degrees));
        self.binding.first_collision = false;
        rig.body.restore_mass();
        rig.body.restore_drag();

        match self.binding.pivot {
            Some(pivot) => rig.transform.set_position(pivot),
            None => logger::log_warning("Floor contact without a bound stand, sword left in place"),
        }
    }

    fn bind_stand(&mut self, stand: CheckpointId, pivot: Vec3) {
        self.binding.current = Some(stand);
        self.binding.pivot = Some(pivot);
        logger::log(&format!("🗡️ Sword bound to stand {:?}", stand));
    }
}
