//! Charge physics engine: stage-1 jump и stage-2 charge+stab routines
//!
//! Routines - явные step-машины, которые двигает `tick(dt)`:
//! suspension только на границах "ждать tick" / "ждать N секунд".
//! Одновременно жив максимум один routine (`is_routine_running`).
//!
//! # Stage 2 timeline
//!
//! ```text
//! start:     mass↓ drag↑ rotation=720°/s, charging=true
//! tick N:    charging && timer < duration → timer += dt, force += rate*dt (clamp), rotate
//! exit tick: released → stab(force) | duration cap → stab(max force)
//! +0.5s:     StageComplete(Stage2InProgress)
//! ```

use bevy::prelude::*;

use super::body::{ImpulseSpace, Rig};
use crate::config::ChargeTuning;
use crate::logger;
use crate::stage::GameStage;

/// Tolerance for time comparisons (sums of tick deltas drift in f32)
pub const TIME_EPSILON: f32 = 1e-4;

/// Наблюдаемое состояние charge-механики
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChargeState {
    pub is_charging: bool,
    /// Seconds spent charging (advances only while charging)
    pub timer: f32,
    /// Stab force along local Y, sign fixed by `stab_direction`
    pub stab_force: Vec3,
    pub is_routine_running: bool,
    /// Degrees per second around local X
    pub rotation_speed: f32,
}

/// Почему charge loop закончился
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ChargeExit {
    /// Input released (stop_charging)
    Released,
    /// Charge duration cap reached while still holding
    MaxChargeReached,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    Stab { force: Vec3, exit: ChargeExit },
    StageComplete(GameStage),
}

/// Resume point of the active routine
#[derive(Debug, Clone, Copy, PartialEq)]
enum RoutineStep {
    /// После jump impulse, ждём jump_duration
    JumpAirtime { remaining: f32 },
    /// Per-tick charge accumulation loop
    Charging,
    /// После stab impulse, ждём post_stab_delay
    StabRecovery { remaining: f32 },
}

#[derive(Debug, Clone)]
pub struct ChargeEngine {
    tuning: ChargeTuning,
    verbose: bool,
    state: ChargeState,
    routine: Option<RoutineStep>,
}

impl ChargeEngine {
    pub fn new(tuning: ChargeTuning, verbose: bool) -> Self {
        Self {
            tuning,
            verbose,
            state: ChargeState::default(),
            routine: None,
        }
    }

    pub fn tuning(&self) -> &ChargeTuning {
        &self.tuning
    }

    pub fn state(&self) -> &ChargeState {
        &self.state
    }

    pub fn is_charging(&self) -> bool {
        self.state.is_charging
    }

    pub fn is_routine_running(&self) -> bool {
        self.state.is_routine_running
    }

    /// A routine is scheduled and will resume on the next `tick`
    pub fn has_scheduled_routine(&self) -> bool {
        self.routine.is_some()
    }

    /// Stage 1: impulse сразу, stage-complete через jump_duration.
    ///
    /// Returns false (silently) if a routine is already running.
    pub fn execute_stage1_jump(&mut self, rig: &mut Rig<'_>) -> bool {
        if self.state.is_routine_running {
            return false;
        }

        self.state.is_routine_running = true;

        let jump = Vec3::new(
            self.tuning.jump_horizontal_force,
            self.tuning.jump_vertical_force,
            0.0,
        );
        rig.body.apply_impulse(jump, ImpulseSpace::World);

        if self.verbose {
            logger::log(&format!("Applied jump force: {:?}", jump));
        }

        self.routine = Some(RoutineStep::JumpAirtime {
            remaining: self.tuning.jump_duration,
        });
        true
    }

    /// Stage 2: облегчаем тело, включаем rotation, запускаем charge loop.
    ///
    /// Returns false (silently) if a routine is already running.
    pub fn execute_stage2_charge(&mut self, rig: &mut Rig<'_>) -> bool {
        if self.state.is_routine_running {
            return false;
        }

        self.state.is_routine_running = true;
        rig.body.set_mass(self.tuning.charged_mass);
        rig.body.set_drag(self.tuning.charged_drag);

        self.state.rotation_speed = self.tuning.rotation_speed;
        self.state.is_charging = true;
        self.state.timer = 0.0;
        self.state.stab_force = Vec3::ZERO;

        if self.verbose {
            logger::log("Charging... RELEASE INPUT to attack with accumulated force");
        }

        self.routine = Some(RoutineStep::Charging);
        true
    }

    /// Only flips the flag; the charge loop observes it on its next tick.
    pub fn stop_charging(&mut self) {
        self.state.is_charging = false;

        if self.verbose {
            logger::log(&format!(
                "Input released! Stopping charge and attacking with accumulated force: {}",
                self.state.stab_force.y
            ));
        }
    }

    /// Hard stop of physics flags + body velocities. Idempotent.
    ///
    /// НЕ отменяет scheduled routine - для этого `cancel_routine()`.
    pub fn reset_physics_state(&mut self, rig: &mut Rig<'_>) {
        self.state = ChargeState::default();
        rig.body.reset_velocities();
    }

    /// Drops the scheduled routine: none of its remaining steps will run.
    pub fn cancel_routine(&mut self) -> bool {
        self.routine.take().is_some()
    }

    /// Advance the scheduled routine by one tick.
    pub fn tick(&mut self, dt: f32, rig: &mut Rig<'_>) -> Vec<EngineEvent> {
        let Some(step) = self.routine else {
            return Vec::new();
        };

        let mut events = Vec::new();

        match step {
            RoutineStep::JumpAirtime { remaining } => {
                self.wait(remaining - dt, GameStage::Stage1InProgress, &mut events, |remaining| {
                    RoutineStep::JumpAirtime { remaining }
                });
            }
            RoutineStep::Charging => {
                let under_cap = self.state.timer + TIME_EPSILON < self.tuning.charge_duration;

                if self.state.is_charging && under_cap {
                    self.accumulate_charge(dt, rig);
                } else {
                    let exit = self.finish_charge();
                    let force = self.execute_stab_attack(rig);
                    events.push(EngineEvent::Stab { force, exit });
                    self.routine = Some(RoutineStep::StabRecovery {
                        remaining: self.tuning.post_stab_delay,
                    });
                }
            }
            RoutineStep::StabRecovery { remaining } => {
                self.wait(remaining - dt, GameStage::Stage2InProgress, &mut events, |remaining| {
                    RoutineStep::StabRecovery { remaining }
                });
            }
        }

        events
    }

    fn wait(
        &mut self,
        remaining: f32,
        completes: GameStage,
        events: &mut Vec<EngineEvent>,
        resume: impl FnOnce(f32) -> RoutineStep,
    ) {
        if remaining <= TIME_EPSILON {
            self.routine = None;
            self.state.is_routine_running = false;
            events.push(EngineEvent::StageComplete(completes));
        } else {
            self.routine = Some(resume(remaining));
        }
    }

    fn accumulate_charge(&mut self, dt: f32, rig: &mut Rig<'_>) {
        self.state.timer += dt;

        let magnitude = self.state.stab_force.y.abs() + self.tuning.charge_rate * dt;
        self.set_stab_magnitude(magnitude);

        rig.transform
            .rotate_degrees(self.state.rotation_speed * dt, Vec3::X);
    }

    fn finish_charge(&mut self) -> ChargeExit {
        if !self.state.is_charging {
            return ChargeExit::Released;
        }

        // Duration cap: charging выключаем сами, бьём максимальной силой
        self.state.is_charging = false;
        self.set_stab_magnitude(self.tuning.max_charge_force);
        logger::log_info("Max charge duration reached! Auto-attacking with maximum force.");
        ChargeExit::MaxChargeReached
    }

    fn set_stab_magnitude(&mut self, magnitude: f32) {
        let clamped = magnitude.clamp(0.0, self.tuning.max_charge_force);
        self.state.stab_force = Vec3::new(0.0, self.tuning.stab_direction.signum() * clamped, 0.0);
    }

    fn execute_stab_attack(&mut self, rig: &mut Rig<'_>) -> Vec3 {
        rig.body.restore_mass();
        rig.body.restore_drag();
        self.state.rotation_speed = 0.0;

        let force = self.state.stab_force;
        rig.body.apply_impulse(force, ImpulseSpace::Local);

        if self.verbose {
            logger::log(&format!("STAB ATTACK executed with accumulated force: {:?}", force));
        }

        force
    }
}
