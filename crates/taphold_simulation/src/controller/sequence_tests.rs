//! Tests for the tap-hold-tap sequence (controller without ECS).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::config::SwordConfig;
    use crate::controller::{SwordController, SwordNotice};
    use crate::input::{InputKey, RawInput};
    use crate::physics::{ChargeExit, ImpulseSpace, Rig, SwordBody};
    use crate::stage::GameStage;

    const DT: f32 = 0.1;

    /// Controller + body + transform + raw input, шаг = один fixed tick
    struct Harness {
        controller: SwordController,
        body: SwordBody,
        transform: Transform,
        raw: RawInput,
        notices: Vec<SwordNotice>,
    }

    impl Harness {
        fn new(config: SwordConfig) -> Self {
            Self {
                body: SwordBody::from_tuning(&config.body),
                controller: SwordController::new(config),
                transform: Transform::default(),
                raw: RawInput::default(),
                notices: Vec::new(),
            }
        }

        fn classic() -> Self {
            let mut config = SwordConfig::default();
            config.continuous_mode = false;
            Self::new(config)
        }

        /// Тот же порядок, что у SwordSet: edges → routines → input
        fn step(&mut self) {
            let mut rig = Rig::new(&mut self.body, &mut self.transform);
            self.controller.resolve_input(&self.raw);
            self.controller.tick(DT, &mut rig);
            self.controller.dispatch_input(&self.raw, &mut rig);
            self.notices.extend(self.controller.drain_notices());
        }

        /// Шагаем пока `done` не станет true; возвращает число шагов
        fn run_until(&mut self, max_steps: usize, done: impl Fn(&Self) -> bool) -> Option<usize> {
            for steps in 1..=max_steps {
                self.step();
                if done(self) {
                    return Some(steps);
                }
            }
            None
        }

        fn press(&mut self) {
            self.raw.press(InputKey::Space);
        }

        fn release(&mut self) {
            self.raw.release(InputKey::Space);
        }

        fn stage_changes(&self) -> Vec<GameStage> {
            self.notices
                .iter()
                .filter_map(|notice| match notice {
                    SwordNotice::StageChanged(stage) => Some(*stage),
                    _ => None,
                })
                .collect()
        }

        fn stabs(&self) -> Vec<(Vec3, ChargeExit)> {
            self.notices
                .iter()
                .filter_map(|notice| match notice {
                    SwordNotice::Stab { force, exit } => Some((*force, *exit)),
                    _ => None,
                })
                .collect()
        }

        fn completions(&self, stage: GameStage) -> usize {
            self.notices
                .iter()
                .filter(|notice| **notice == SwordNotice::StageCompleted(stage))
                .count()
        }
    }

    #[test]
    fn test_classic_tap_hold_full_cycle() {
        let mut h = Harness::classic();

        // t=0: press → Stage1 + jump impulse сразу
        h.press();
        h.step();
        assert_eq!(h.controller.stage(), GameStage::Stage1InProgress);
        assert_eq!(h.body.pending_impulses().len(), 1);
        assert_eq!(h.body.pending_impulses()[0].impulse, Vec3::new(8.0, 12.0, 0.0));
        assert_eq!(h.body.pending_impulses()[0].space, ImpulseSpace::World);
        h.release();

        // 0.8s jump
        let steps = h.run_until(20, |h| h.controller.stage() == GameStage::WaitingForSecondTap);
        assert_eq!(steps, Some(8));

        // Второй press → stage 2
        h.press();
        h.step();
        assert_eq!(h.controller.stage(), GameStage::Stage2InProgress);
        assert!(h.controller.engine().is_charging());

        // Держим 1.2s → auto stab
        let steps = h.run_until(30, |h| !h.stabs().is_empty());
        assert_eq!(steps, Some(13));
        assert_eq!(h.stabs(), vec![(Vec3::new(0.0, -50.0, 0.0), ChargeExit::MaxChargeReached)]);

        // ~0.5s позже → обратно в начало
        let steps = h.run_until(20, |h| h.controller.stage() == GameStage::WaitingForFirstTap);
        assert_eq!(steps, Some(5));

        assert_eq!(
            h.stage_changes(),
            vec![
                GameStage::Stage1InProgress,
                GameStage::WaitingForSecondTap,
                GameStage::Stage2InProgress,
                GameStage::WaitingForFirstTap,
            ]
        );
        assert_eq!(h.completions(GameStage::Stage1InProgress), 1);
        assert_eq!(h.completions(GameStage::Stage2InProgress), 1);
        assert!(!h.controller.engine().is_routine_running());
        assert_eq!(h.body.mass, 1.0);
        assert_eq!(h.body.drag, 2.0);
    }

    #[test]
    fn test_continuous_hold_auto_starts_stage2() {
        let mut h = Harness::new(SwordConfig::default());

        h.press();
        h.step();
        assert_eq!(h.controller.stage(), GameStage::Stage1InProgress);

        // Держим без отпускания: stage 2 стартует на завершении jump
        let steps = h.run_until(20, |h| h.controller.stage() == GameStage::Stage2InProgress);
        assert_eq!(steps, Some(8));
        assert!(h.controller.engine().is_charging());

        let presses = h.notices.iter().filter(|n| **n == SwordNotice::Pressed).count();
        assert_eq!(presses, 1, "no second press required");

        // Release → stab с накопленной силой
        h.release();
        h.run_until(10, |h| !h.stabs().is_empty());
        assert_eq!(h.stabs().len(), 1);
        assert_eq!(h.stabs()[0].1, ChargeExit::Released);
    }

    #[test]
    fn test_continuous_released_early_waits_for_second_tap() {
        let mut h = Harness::new(SwordConfig::default());

        h.press();
        h.step();
        h.release();

        h.run_until(20, |h| h.completions(GameStage::Stage1InProgress) == 1);
        h.step();
        assert_eq!(h.controller.stage(), GameStage::WaitingForSecondTap);
        assert!(!h.controller.engine().is_charging());
    }

    #[test]
    fn test_continuous_release_on_completion_tick_waits_for_second_tap() {
        let mut h = Harness::new(SwordConfig::default());

        h.press();
        h.step();
        // 7 из 8 jump ticks с удержанием
        for _ in 0..7 {
            h.step();
        }
        assert_eq!(h.controller.stage(), GameStage::Stage1InProgress);

        // Release приходит ровно на tick завершения
        h.release();
        h.step();
        assert_eq!(h.completions(GameStage::Stage1InProgress), 1);
        assert_eq!(h.controller.stage(), GameStage::WaitingForSecondTap);
        assert!(!h.controller.engine().is_routine_running());

        for _ in 0..20 {
            h.step();
        }
        assert!(h.stabs().is_empty());
        assert_eq!(h.controller.stage(), GameStage::WaitingForSecondTap);
        assert!(!h.stage_changes().contains(&GameStage::Stage2InProgress));
    }

    #[test]
    fn test_press_during_stage1_is_ignored() {
        let mut h = Harness::classic();

        h.press();
        h.step();
        h.release();
        h.step();
        h.press();
        h.step();

        assert_eq!(h.controller.stage(), GameStage::Stage1InProgress);
        assert_eq!(h.body.impulse_count(), 1);
    }

    #[test]
    fn test_release_mid_charge_stabs_once_with_release_force() {
        let mut h = Harness::classic();

        h.press();
        h.step();
        h.release();
        h.run_until(20, |h| h.controller.stage() == GameStage::WaitingForSecondTap);

        h.press();
        h.step();
        for _ in 0..4 {
            h.step();
        }
        // Release обрабатывается во input-фазе: сила фиксируется сейчас
        h.release();
        h.step();
        let at_release = h.controller.engine().state().stab_force;
        assert!(at_release.y < 0.0);

        h.run_until(30, |h| h.controller.stage() == GameStage::WaitingForFirstTap);
        for _ in 0..10 {
            h.step();
        }

        assert_eq!(h.stabs(), vec![(at_release, ChargeExit::Released)]);
        assert_eq!(h.completions(GameStage::Stage2InProgress), 1);
    }

    #[test]
    fn test_full_reset_is_idempotent() {
        let mut h = Harness::classic();
        h.press();
        h.step();
        h.body.linear_velocity = Vec3::new(1.0, 5.0, 0.0);

        let mut rig = Rig::new(&mut h.body, &mut h.transform);
        h.controller.reset_to_initial_stage(&mut rig);
        let once = (*h.controller.engine().state(), h.controller.stage());
        h.controller.reset_to_initial_stage(&mut rig);
        let twice = (*h.controller.engine().state(), h.controller.stage());

        assert_eq!(once, twice);
        assert_eq!(twice.1, GameStage::WaitingForFirstTap);
        assert!(!twice.0.is_routine_running);
        assert!(!h.controller.engine().has_scheduled_routine());
        assert_eq!(twice.0.timer, 0.0);
        assert_eq!(twice.0.stab_force, Vec3::ZERO);
        assert_eq!(h.body.linear_velocity, Vec3::ZERO);

        // Второй reset не шлёт повторный StageChanged
        let changes: Vec<_> = h
            .controller
            .drain_notices()
            .into_iter()
            .filter(|n| matches!(n, SwordNotice::StageChanged(_)))
            .collect();
        assert_eq!(changes, vec![SwordNotice::StageChanged(GameStage::WaitingForFirstTap)]);
    }

    #[test]
    fn test_reset_cancels_pending_jump() {
        let mut h = Harness::classic();
        h.press();
        h.step();
        h.release();

        let mut rig = Rig::new(&mut h.body, &mut h.transform);
        h.controller.reset_to_initial_stage(&mut rig);

        for _ in 0..20 {
            h.step();
        }
        assert_eq!(h.completions(GameStage::Stage1InProgress), 0);
        assert_eq!(h.controller.stage(), GameStage::WaitingForFirstTap);
    }

    #[test]
    fn test_direct_stage_starts_respect_guards() {
        let mut h = Harness::classic();
        let mut rig = Rig::new(&mut h.body, &mut h.transform);

        assert!(!h.controller.start_stage2(&mut rig));
        assert!(h.controller.start_continuous_sequence(&mut rig));
        assert!(!h.controller.start_stage1(&mut rig));
        assert_eq!(h.controller.stage(), GameStage::Stage1InProgress);
    }
}
