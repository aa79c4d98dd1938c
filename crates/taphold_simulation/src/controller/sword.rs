//! SwordController - координатор tap-hold-tap последовательности
//!
//! Владеет всеми коллабораторами напрямую (composition вместо
//! event subscriptions): edge detector, charge engine, stage machine,
//! stand binding. Наружу уходят только `SwordNotice` → Bevy events.
//! Despawn entity = drop всего состояния, dangling callbacks невозможны.
//!
//! # Dispatch
//!
//! | stage               | press          | release                      |
//! |---------------------|----------------|------------------------------|
//! | WaitingForFirstTap  | start stage 1  | -                            |
//! | WaitingForSecondTap | start stage 2  | -                            |
//! | Stage2InProgress    | -              | stop charging (if charging)  |

use bevy::prelude::*;

use crate::config::SwordConfig;
use crate::input::{InputEdgeDetector, InputSnapshot, KeyEdges, RawInput};
use crate::logger;
use crate::physics::{ChargeEngine, ChargeExit, EngineEvent, Rig};
use crate::progression::CheckpointId;
use crate::stage::{GameStage, StageMachine};

/// Notification queued by the controller, published as a Bevy event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwordNotice {
    Pressed,
    Released,
    StageChanged(GameStage),
    StageCompleted(GameStage),
    Stab { force: Vec3, exit: ChargeExit },
}

/// Live association sword ↔ stand
///
/// Пусто до первого контакта со stand; сбрасывается floor-контактом
/// только частично (`first_collision`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandBinding {
    pub current: Option<CheckpointId>,
    /// World position the sword is parked at on floor contact
    pub pivot: Option<Vec3>,
    pub first_collision: bool,
}

#[derive(Component, Debug, Clone)]
pub struct SwordController {
    pub(crate) config: SwordConfig,
    pub(crate) input: InputEdgeDetector,
    /// Edges текущего tick: resolve → routines → dispatch
    pending_input: InputSnapshot,
    pub(crate) engine: ChargeEngine,
    pub(crate) stage: StageMachine,
    pub(crate) binding: StandBinding,
    pub(crate) debug_keys: KeyEdges,
    pub(crate) stage2_test_active: bool,
    notices: Vec<SwordNotice>,
}

impl SwordController {
    pub fn new(config: SwordConfig) -> Self {
        let controller = Self {
            input: InputEdgeDetector::new(config.input.primary_key, config.input.enable_touch),
            pending_input: InputSnapshot::default(),
            engine: ChargeEngine::new(config.charge, config.verbose),
            stage: StageMachine::new(config.verbose),
            binding: StandBinding::default(),
            debug_keys: KeyEdges::default(),
            stage2_test_active: false,
            notices: Vec::new(),
            config,
        };

        logger::log("SwordController initialized - Ready for input");
        controller.stage.log_current_stage();
        controller
    }

    pub fn config(&self) -> &SwordConfig {
        &self.config
    }

    pub fn stage(&self) -> GameStage {
        self.stage.current()
    }

    pub fn engine(&self) -> &ChargeEngine {
        &self.engine
    }

    pub fn binding(&self) -> &StandBinding {
        &self.binding
    }

    pub fn is_input_held(&self) -> bool {
        self.input.is_held()
    }

    pub fn drain_notices(&mut self) -> Vec<SwordNotice> {
        std::mem::take(&mut self.notices)
    }

    // ------------------------------------------------------------------
    // Per-tick entry points
    // ------------------------------------------------------------------

    /// Resolve edges and the held flag for this tick without acting on them.
    ///
    /// Вызывается до `tick`: stage-complete handling видит held этого tick.
    pub fn resolve_input(&mut self, raw: &RawInput) {
        self.pending_input = self.input.update(raw);
    }

    /// Act on the edges stored by `resolve_input`, then on debug keys.
    pub fn dispatch_input(&mut self, raw: &RawInput, rig: &mut Rig<'_>) {
        let snapshot = std::mem::take(&mut self.pending_input);

        if snapshot.pressed_edge {
            self.notices.push(SwordNotice::Pressed);
            self.handle_input_pressed(rig);
        }

        if snapshot.released_edge {
            self.notices.push(SwordNotice::Released);
            self.handle_input_released();
        }

        if self.config.debug.enabled {
            self.process_debug_keys(raw, rig);
        }
    }

    /// `resolve_input` + `dispatch_input` в одном вызове, без routine между ними.
    pub fn process_input(&mut self, raw: &RawInput, rig: &mut Rig<'_>) {
        self.resolve_input(raw);
        self.dispatch_input(raw, rig);
    }

    /// Advance the running physics routine and react to what it reports.
    pub fn tick(&mut self, dt: f32, rig: &mut Rig<'_>) {
        for event in self.engine.tick(dt, rig) {
            match event {
                EngineEvent::Stab { force, exit } => {
                    self.notices.push(SwordNotice::Stab { force, exit });
                }
                EngineEvent::StageComplete(stage) => {
                    self.notices.push(SwordNotice::StageCompleted(stage));
                    self.handle_stage_complete(stage, rig);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Public API (production input и debug surface идут через них)
    // ------------------------------------------------------------------

    pub fn start_stage1(&mut self, rig: &mut Rig<'_>) -> bool {
        if !self.stage.can_start_stage1() {
            return false;
        }

        self.set_stage(GameStage::Stage1InProgress);
        self.engine.execute_stage1_jump(rig)
    }

    pub fn start_stage2(&mut self, rig: &mut Rig<'_>) -> bool {
        if !self.stage.can_start_stage2() {
            return false;
        }

        self.set_stage(GameStage::Stage2InProgress);
        self.engine.execute_stage2_charge(rig)
    }

    pub fn start_continuous_sequence(&mut self, rig: &mut Rig<'_>) -> bool {
        logger::log("CONTINUOUS MODE: Starting Stage 1, will auto-transition to Stage 2");
        self.start_stage1(rig)
    }

    pub fn stop_charging_and_attack(&mut self) {
        self.engine.stop_charging();
    }

    /// Full reset protocol: cancel routine → reset physics → reset stage.
    ///
    /// Порядок важен: без cancel stale routine продолжит работу поверх
    /// свежесброшенного состояния.
    pub fn reset_to_initial_stage(&mut self, rig: &mut Rig<'_>) {
        self.engine.cancel_routine();
        self.engine.reset_physics_state(rig);
        self.stage.reset_all_states();
        self.publish_stage_changes();
        self.stage2_test_active = false;

        logger::log("RESET: Ready for new cycle - Waiting for input");
    }

    // ------------------------------------------------------------------
    // Handlers
    // ------------------------------------------------------------------

    fn handle_input_pressed(&mut self, rig: &mut Rig<'_>) {
        match self.stage.current() {
            GameStage::WaitingForFirstTap => {
                self.start_stage1(rig);
            }
            GameStage::WaitingForSecondTap => {
                self.start_stage2(rig);
            }
            _ => {}
        }
    }

    fn handle_input_released(&mut self) {
        if self.stage.current() == GameStage::Stage2InProgress && self.engine.is_charging() {
            self.stop_charging_and_attack();
        }
    }

    fn handle_stage_complete(&mut self, completed: GameStage, rig: &mut Rig<'_>) {
        match completed {
            GameStage::Stage1InProgress => {
                if self.config.continuous_mode && self.input.is_held() {
                    logger::log("STAGE 1 Complete - Auto-transitioning to Stage 2 (input still held)");
                    self.set_stage(GameStage::WaitingForSecondTap);
                    self.start_stage2(rig);
                } else {
                    self.set_stage(GameStage::WaitingForSecondTap);
                    logger::log("STAGE 1 Complete - Waiting for second input");
                }
            }
            GameStage::Stage2InProgress => {
                self.reset_to_initial_stage(rig);
            }
            _ => {}
        }
    }

    pub(crate) fn set_stage(&mut self, stage: GameStage) {
        self.stage.set_state(stage);
        self.publish_stage_changes();
    }

    /// Change-notifications машины → outbox, в порядке переходов
    fn publish_stage_changes(&mut self) {
        for changed in self.stage.drain_changes() {
            logger::log(&format!("State changed to: {:?}", changed));
            self.notices.push(SwordNotice::StageChanged(changed));
        }
    }
}
