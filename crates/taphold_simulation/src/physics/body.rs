//! Rigid-body и transform абстракции, которые мутируют physics routines
//!
//! Routines не знают про backend: они работают через `RigidBodyControl` /
//! `TransformControl`. ECS реализация - `SwordBody` + Bevy `Transform`,
//! в Rapier синхронизирует `RapierBridgePlugin`.

use bevy::prelude::*;

use crate::config::BodyTuning;

/// В каком пространстве задан impulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ImpulseSpace {
    World,
    /// Local axes of the body (rotated by its transform)
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct BodyImpulse {
    pub impulse: Vec3,
    pub space: ImpulseSpace,
}

pub trait RigidBodyControl {
    fn reset_velocities(&mut self);
    fn set_mass(&mut self, mass: f32);
    fn set_drag(&mut self, drag: f32);
    fn restore_mass(&mut self);
    fn restore_drag(&mut self);
    fn apply_impulse(&mut self, impulse: Vec3, space: ImpulseSpace);
}

pub trait TransformControl {
    fn rotate_degrees(&mut self, degrees: f32, axis: Vec3);
    /// Euler angles in degrees, applied Y → X → Z
    fn set_euler_degrees(&mut self, degrees: Vec3);
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
}

/// Borrowed body + transform pair handed to routines for one call.
pub struct Rig<'a> {
    pub body: &'a mut dyn RigidBodyControl,
    pub transform: &'a mut dyn TransformControl,
}

impl<'a> Rig<'a> {
    pub fn new(body: &'a mut dyn RigidBodyControl, transform: &'a mut dyn TransformControl) -> Self {
        Self { body, transform }
    }
}

/// Backend-neutral rigid body of a sword.
///
/// Impulses и velocity reset копятся здесь до синхронизации с backend
/// (`push_body_to_rapier`). `linear_velocity` / `angular_velocity` -
/// зеркало backend скоростей.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct SwordBody {
    pub mass: f32,
    pub drag: f32,
    pub rest_mass: f32,
    pub rest_drag: f32,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pending_impulses: Vec<BodyImpulse>,
    velocity_reset_pending: bool,
    /// Всего impulses за жизнь тела (диагностика/тесты)
    impulse_count: u32,
}

impl SwordBody {
    pub fn from_tuning(tuning: &BodyTuning) -> Self {
        Self {
            mass: tuning.rest_mass,
            drag: tuning.rest_drag,
            rest_mass: tuning.rest_mass,
            rest_drag: tuning.rest_drag,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            pending_impulses: Vec::new(),
            velocity_reset_pending: false,
            impulse_count: 0,
        }
    }

    pub fn pending_impulses(&self) -> &[BodyImpulse] {
        &self.pending_impulses
    }

    pub fn drain_impulses(&mut self) -> Vec<BodyImpulse> {
        std::mem::take(&mut self.pending_impulses)
    }

    /// Returns true once per requested velocity reset
    pub fn take_velocity_reset(&mut self) -> bool {
        std::mem::take(&mut self.velocity_reset_pending)
    }

    /// Drop the tick's outbox when no backend consumed it
    pub fn discard_pending(&mut self) {
        self.pending_impulses.clear();
        self.velocity_reset_pending = false;
    }

    pub fn impulse_count(&self) -> u32 {
        self.impulse_count
    }
}

impl Default for SwordBody {
    fn default() -> Self {
        Self::from_tuning(&BodyTuning::default())
    }
}

impl RigidBodyControl for SwordBody {
    fn reset_velocities(&mut self) {
        self.linear_velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.velocity_reset_pending = true;
    }

    fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
    }

    fn set_drag(&mut self, drag: f32) {
        self.drag = drag;
    }

    fn restore_mass(&mut self) {
        self.mass = self.rest_mass;
    }

    fn restore_drag(&mut self) {
        self.drag = self.rest_drag;
    }

    fn apply_impulse(&mut self, impulse: Vec3, space: ImpulseSpace) {
        self.pending_impulses.push(BodyImpulse { impulse, space });
        self.impulse_count += 1;
    }
}

impl TransformControl for Transform {
    fn rotate_degrees(&mut self, degrees: f32, axis: Vec3) {
        let Some(axis) = axis.try_normalize() else {
            return;
        };
        self.rotate_local(Quat::from_axis_angle(axis, degrees.to_radians()));
    }

    fn set_euler_degrees(&mut self, degrees: Vec3) {
        self.rotation = Quat::from_euler(
            EulerRot::YXZ,
            degrees.y.to_radians(),
            degrees.x.to_radians(),
            degrees.z.to_radians(),
        );
    }

    fn position(&self) -> Vec3 {
        self.translation
    }

    fn set_position(&mut self, position: Vec3) {
        self.translation = position;
    }
}
