//! Debug / testing surface: прямой запуск стадий, force reset, status overlay
//!
//! Все действия идут через тот же API контроллера, что и production input
//! (state machine не обходится).

use bevy::prelude::*;

use super::sword::SwordController;
use crate::input::RawInput;
use crate::logger;
use crate::physics::Rig;
use crate::stage::GameStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum DebugAction {
    ForceReset,
    TestStage1Only,
    TestStage2Only,
    StopStage2Test,
}

/// Debug action requested by a host or a test
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugCommand {
    pub sword: Entity,
    pub action: DebugAction,
}

impl SwordController {
    pub fn apply_debug_action(&mut self, action: DebugAction, rig: &mut Rig<'_>) {
        match action {
            DebugAction::ForceReset => self.force_reset(rig),
            DebugAction::TestStage1Only => self.test_stage1_only(rig),
            DebugAction::TestStage2Only => self.test_stage2_only(rig),
            DebugAction::StopStage2Test => self.stop_stage2_test(),
        }
    }

    pub fn force_reset(&mut self, rig: &mut Rig<'_>) {
        logger::log("FORCED RESET: Resetting all stages and physics");
        self.reset_to_initial_stage(rig);
    }

    pub fn test_stage1_only(&mut self, rig: &mut Rig<'_>) {
        logger::log("STAGE 1 TEST: Testing jump only");
        self.reset_to_initial_stage(rig);
        self.start_stage1(rig);
    }

    pub fn test_stage2_only(&mut self, rig: &mut Rig<'_>) {
        logger::log("STAGE 2 TEST: Testing charge attack only - hold to charge, release to stab");
        self.reset_to_initial_stage(rig);
        self.set_stage(GameStage::WaitingForSecondTap);
        self.stage2_test_active = self.start_stage2(rig);
    }

    pub fn stop_stage2_test(&mut self) {
        if !self.stage2_test_active {
            return;
        }

        self.stage2_test_active = false;
        if self.stage.current() == GameStage::Stage2InProgress && self.engine.is_charging() {
            self.stop_charging_and_attack();
        }
        logger::log("STAGE 2 TEST: Testing stopped");
    }

    pub fn is_stage2_test_active(&self) -> bool {
        self.stage2_test_active
    }

    /// Debug-клавиши из `RawInput` (своё edge tracking, независимо от primary key)
    pub(crate) fn process_debug_keys(&mut self, raw: &RawInput, rig: &mut Rig<'_>) {
        let bindings = self.config.debug;

        if self.debug_keys.edges(raw, bindings.reset_key).0 {
            self.force_reset(rig);
        }
        if self.debug_keys.edges(raw, bindings.test_stage1_key).0 {
            self.test_stage1_only(rig);
        }

        let (stage2_pressed, stage2_released) = self.debug_keys.edges(raw, bindings.test_stage2_key);
        if stage2_pressed {
            self.test_stage2_only(rig);
        } else if stage2_released {
            self.stop_stage2_test();
        }

        self.debug_keys.commit(raw);
    }

    /// Overlay text for the host to draw
    pub fn status_lines(&self) -> Vec<String> {
        let mode = if self.config.continuous_mode {
            "Continuous"
        } else {
            "Classic"
        };
        let bindings = &self.config.debug;

        let mut lines = vec![
            format!("Stage: {:?}", self.stage.current()),
            format!("Mode: {}", mode),
        ];

        if self.stage2_test_active {
            lines.push("STAGE 2 TESTING ACTIVE".to_string());
            lines.push(format!("Release {:?} to STAB!", bindings.test_stage2_key));
        }

        lines.push(format!(
            "Test Controls: {:?}-Stage1 | {:?}-Stage2 | {:?}-Reset",
            bindings.test_stage1_key, bindings.test_stage2_key, bindings.reset_key
        ));
        lines
    }
}
