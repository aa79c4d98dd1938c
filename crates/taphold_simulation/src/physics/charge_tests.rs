//! Tests for the charge physics engine.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::config::ChargeTuning;
    use crate::physics::{ChargeEngine, ChargeExit, EngineEvent, ImpulseSpace, Rig, SwordBody};
    use crate::stage::GameStage;

    const DT: f32 = 0.1;

    fn engine() -> ChargeEngine {
        ChargeEngine::new(ChargeTuning::default(), false)
    }

    /// Один tick engine с отдельными body/transform
    fn tick(engine: &mut ChargeEngine, body: &mut SwordBody, transform: &mut Transform, dt: f32) -> Vec<EngineEvent> {
        let mut rig = Rig::new(body, transform);
        engine.tick(dt, &mut rig)
    }

    fn stabs(events: &[EngineEvent]) -> Vec<(Vec3, ChargeExit)> {
        events
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Stab { force, exit } => Some((*force, *exit)),
                _ => None,
            })
            .collect()
    }

    fn completions(events: &[EngineEvent]) -> Vec<GameStage> {
        events
            .iter()
            .filter_map(|event| match event {
                EngineEvent::StageComplete(stage) => Some(*stage),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_stage1_applies_single_jump_impulse() {
        let mut engine = engine();
        let mut body = SwordBody::default();
        let mut transform = Transform::default();

        assert!(engine.execute_stage1_jump(&mut Rig::new(&mut body, &mut transform)));

        let impulses = body.pending_impulses();
        assert_eq!(impulses.len(), 1);
        assert_eq!(impulses[0].impulse, Vec3::new(8.0, 12.0, 0.0));
        assert_eq!(impulses[0].space, ImpulseSpace::World);
        assert!(engine.is_routine_running());
        // Mass/drag не трогаются прыжком
        assert_eq!(body.mass, 1.0);
        assert_eq!(body.drag, 2.0);
    }

    #[test]
    fn test_stage1_completes_after_jump_duration() {
        let mut engine = engine();
        let mut body = SwordBody::default();
        let mut transform = Transform::default();
        engine.execute_stage1_jump(&mut Rig::new(&mut body, &mut transform));

        // 0.8s при dt=0.1 → ровно 8 ticks
        for _ in 0..7 {
            assert!(tick(&mut engine, &mut body, &mut transform, DT).is_empty());
        }
        let events = tick(&mut engine, &mut body, &mut transform, DT);
        assert_eq!(completions(&events), vec![GameStage::Stage1InProgress]);
        assert!(!engine.is_routine_running());
        assert!(!engine.has_scheduled_routine());

        // После завершения routine молчит
        assert!(tick(&mut engine, &mut body, &mut transform, DT).is_empty());
    }

    #[test]
    fn test_reentry_is_ignored() {
        let mut engine = engine();
        let mut body = SwordBody::default();
        let mut transform = Transform::default();

        assert!(engine.execute_stage1_jump(&mut Rig::new(&mut body, &mut transform)));
        assert!(!engine.execute_stage1_jump(&mut Rig::new(&mut body, &mut transform)));
        assert!(!engine.execute_stage2_charge(&mut Rig::new(&mut body, &mut transform)));

        assert_eq!(body.impulse_count(), 1);
        assert!(!engine.is_charging());
    }

    #[test]
    fn test_stage2_lightens_body_and_spins() {
        let mut engine = engine();
        let mut body = SwordBody::default();
        let mut transform = Transform::default();

        engine.execute_stage2_charge(&mut Rig::new(&mut body, &mut transform));

        assert_eq!(body.mass, 0.01);
        assert_eq!(body.drag, 10.0);
        assert_eq!(engine.state().rotation_speed, 720.0);
        assert!(engine.is_charging());

        tick(&mut engine, &mut body, &mut transform, DT);
        // 720°/s * 0.1s = 72° вокруг local X
        let (axis, angle) = transform.rotation.to_axis_angle();
        assert!((angle.to_degrees() - 72.0).abs() < 1e-3, "angle = {}", angle.to_degrees());
        assert!((axis - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn test_force_accumulates_linearly_and_clamps() {
        let mut tuning = ChargeTuning::default();
        tuning.charge_rate = 100.0;
        tuning.charge_duration = 10.0;
        let mut engine = ChargeEngine::new(tuning, false);
        let mut body = SwordBody::default();
        let mut transform = Transform::default();
        engine.execute_stage2_charge(&mut Rig::new(&mut body, &mut transform));

        let mut previous = 0.0;
        for t in 1..=10 {
            tick(&mut engine, &mut body, &mut transform, DT);

            let magnitude = engine.state().stab_force.y.abs();
            let expected = (100.0 * t as f32 * DT).clamp(0.0, 50.0);
            assert!((magnitude - expected).abs() < 1e-3, "tick {}: {} vs {}", t, magnitude, expected);
            assert!(magnitude >= previous, "force must not decrease");
            assert!((engine.state().timer - t as f32 * DT).abs() < 1e-4);
            previous = magnitude;
        }

        // Знак фиксирован конфигом: stab_direction = -1 → вниз
        assert!(engine.state().stab_force.y < 0.0);
    }

    #[test]
    fn test_release_stabs_once_with_force_at_release() {
        let mut engine = engine();
        let mut body = SwordBody::default();
        let mut transform = Transform::default();
        engine.execute_stage2_charge(&mut Rig::new(&mut body, &mut transform));
        body.drain_impulses();

        for _ in 0..5 {
            tick(&mut engine, &mut body, &mut transform, DT);
        }
        let at_release = engine.state().stab_force;
        assert!((at_release.y + 5.0).abs() < 1e-3);

        engine.stop_charging();

        let mut all_events = Vec::new();
        for _ in 0..20 {
            all_events.extend(tick(&mut engine, &mut body, &mut transform, DT));
        }

        let stabs = stabs(&all_events);
        assert_eq!(stabs.len(), 1);
        assert_eq!(stabs[0], (at_release, ChargeExit::Released));
        assert_eq!(completions(&all_events), vec![GameStage::Stage2InProgress]);

        let impulses = body.pending_impulses();
        assert_eq!(impulses.len(), 1);
        assert_eq!(impulses[0].impulse, at_release);
        assert_eq!(impulses[0].space, ImpulseSpace::Local);

        // Тело восстановлено после stab
        assert_eq!(body.mass, 1.0);
        assert_eq!(body.drag, 2.0);
        assert_eq!(engine.state().rotation_speed, 0.0);
    }

    #[test]
    fn test_release_stops_timer() {
        let mut engine = engine();
        let mut body = SwordBody::default();
        let mut transform = Transform::default();
        engine.execute_stage2_charge(&mut Rig::new(&mut body, &mut transform));

        tick(&mut engine, &mut body, &mut transform, DT);
        tick(&mut engine, &mut body, &mut transform, DT);
        engine.stop_charging();
        let timer = engine.state().timer;

        tick(&mut engine, &mut body, &mut transform, DT);
        tick(&mut engine, &mut body, &mut transform, DT);
        assert_eq!(engine.state().timer, timer);
    }

    #[test]
    fn test_duration_cap_auto_stabs_with_max_force() {
        let mut engine = engine();
        let mut body = SwordBody::default();
        let mut transform = Transform::default();
        engine.execute_stage2_charge(&mut Rig::new(&mut body, &mut transform));

        let mut all_events = Vec::new();
        let mut stab_tick = None;
        for t in 1..=30 {
            let events = tick(&mut engine, &mut body, &mut transform, DT);
            if !stabs(&events).is_empty() {
                stab_tick = Some(t);
            }
            all_events.extend(events);
        }

        // 12 ticks накопления (1.2s), stab на 13-м
        assert_eq!(stab_tick, Some(13));

        let stabs = stabs(&all_events);
        assert_eq!(stabs.len(), 1);
        assert_eq!(stabs[0].0, Vec3::new(0.0, -50.0, 0.0));
        assert_eq!(stabs[0].1, ChargeExit::MaxChargeReached);
        assert_eq!(completions(&all_events), vec![GameStage::Stage2InProgress]);
        assert!(!engine.is_charging());
    }

    #[test]
    fn test_stage2_completes_after_post_stab_delay() {
        let mut engine = engine();
        let mut body = SwordBody::default();
        let mut transform = Transform::default();
        engine.execute_stage2_charge(&mut Rig::new(&mut body, &mut transform));

        engine.stop_charging();
        let events = tick(&mut engine, &mut body, &mut transform, DT);
        assert_eq!(stabs(&events).len(), 1);
        assert!(engine.is_routine_running());

        // 0.5s → 5 ticks
        for _ in 0..4 {
            assert!(tick(&mut engine, &mut body, &mut transform, DT).is_empty());
        }
        let events = tick(&mut engine, &mut body, &mut transform, DT);
        assert_eq!(completions(&events), vec![GameStage::Stage2InProgress]);
        assert!(!engine.is_routine_running());
    }

    #[test]
    fn test_reset_physics_state_is_idempotent() {
        let mut engine = engine();
        let mut body = SwordBody::default();
        let mut transform = Transform::default();
        engine.execute_stage2_charge(&mut Rig::new(&mut body, &mut transform));
        tick(&mut engine, &mut body, &mut transform, DT);
        body.linear_velocity = Vec3::new(3.0, -2.0, 0.0);

        engine.reset_physics_state(&mut Rig::new(&mut body, &mut transform));
        let once = *engine.state();
        engine.reset_physics_state(&mut Rig::new(&mut body, &mut transform));

        assert_eq!(*engine.state(), once);
        assert!(!once.is_charging);
        assert!(!once.is_routine_running);
        assert_eq!(once.timer, 0.0);
        assert_eq!(once.stab_force, Vec3::ZERO);
        assert_eq!(once.rotation_speed, 0.0);
        assert_eq!(body.linear_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_reset_without_cancel_lets_stale_routine_resume() {
        let mut engine = engine();
        let mut body = SwordBody::default();
        let mut transform = Transform::default();
        engine.execute_stage1_jump(&mut Rig::new(&mut body, &mut transform));

        engine.reset_physics_state(&mut Rig::new(&mut body, &mut transform));
        assert!(engine.has_scheduled_routine());

        // Stale jump routine всё ещё досчитывает и шлёт complete
        let mut events = Vec::new();
        for _ in 0..10 {
            events.extend(tick(&mut engine, &mut body, &mut transform, DT));
        }
        assert_eq!(completions(&events), vec![GameStage::Stage1InProgress]);
    }

    #[test]
    fn test_cancel_prevents_any_further_step() {
        let mut engine = engine();
        let mut body = SwordBody::default();
        let mut transform = Transform::default();
        engine.execute_stage2_charge(&mut Rig::new(&mut body, &mut transform));
        tick(&mut engine, &mut body, &mut transform, DT);
        body.drain_impulses();

        assert!(engine.cancel_routine());
        engine.reset_physics_state(&mut Rig::new(&mut body, &mut transform));

        for _ in 0..30 {
            assert!(tick(&mut engine, &mut body, &mut transform, DT).is_empty());
        }
        // Ни stab, ни restore mass - cleanup отменённого routine не выполняется
        assert!(body.pending_impulses().is_empty());
        assert_eq!(body.mass, 0.01);
        assert!(!engine.cancel_routine());
    }
}
