//! Stage enum and the state machine that owns it.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::logger;

/// Фазы tap-hold-tap последовательности
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum GameStage {
    /// Готов к старту, ждём первый tap
    #[default]
    WaitingForFirstTap,
    /// Прыжок выполняется
    Stage1InProgress,
    /// Между стадиями, ждём второй tap (classic mode)
    WaitingForSecondTap,
    /// Charge + rotation
    Stage2InProgress,
    /// Reserved: never entered by the controller
    StabAttack,
    /// Reserved: never entered by the controller
    Reset,
}

/// Owns the canonical stage. Changes are queued as notifications.
#[derive(Debug, Clone, Default)]
pub struct StageMachine {
    current: GameStage,
    changes: Vec<GameStage>,
    verbose: bool,
}

impl StageMachine {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Default::default()
        }
    }

    pub fn current(&self) -> GameStage {
        self.current
    }

    /// No-op if `new_stage == current`, otherwise replaces it and queues a change.
    pub fn set_state(&mut self, new_stage: GameStage) -> bool {
        if self.current == new_stage {
            return false;
        }

        self.current = new_stage;
        self.changes.push(new_stage);
        self.log_current_stage();
        true
    }

    pub fn reset_all_states(&mut self) -> bool {
        self.set_state(GameStage::WaitingForFirstTap)
    }

    pub fn can_start_stage1(&self) -> bool {
        self.current == GameStage::WaitingForFirstTap
    }

    pub fn can_start_stage2(&self) -> bool {
        self.current == GameStage::WaitingForSecondTap
    }

    /// Queued state-changed notifications, oldest first
    pub fn drain_changes(&mut self) -> Vec<GameStage> {
        std::mem::take(&mut self.changes)
    }

    pub fn log_current_stage(&self) {
        if self.verbose {
            logger::log(&format!("Current stage: {:?}", self.current));
        }
    }
}
