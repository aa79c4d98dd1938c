//! Headless симуляция TapHold
//!
//! Прогоняет scripted tap-hold-tap сессию без рендера и логирует смены стадий.
//!
//! Usage: `taphold_simulation [config.toml]`

use std::path::PathBuf;
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use taphold_simulation::{
    create_headless_app, log, log_error, spawn_floor, spawn_stand, spawn_sword, CheckpointId, InputKey, RawInput,
    StabExecuted, StageChanged, StandProgression, SurfaceContact, SwordConfig,
};

const TICK_COUNT: u32 = 600;

/// Что скрипт делает на конкретном тике
#[derive(Debug, Clone, Copy)]
enum ScriptAction {
    Press,
    Release,
    TouchStand(usize),
    TouchFloor,
}

/// Tick → action (60Hz: 60 ticks = 1s)
const SCRIPT: &[(u32, ScriptAction)] = &[
    (2, ScriptAction::TouchStand(0)),
    // Continuous hold: jump, auto stage 2, cap → auto stab
    (10, ScriptAction::Press),
    (200, ScriptAction::Release),
    (220, ScriptAction::TouchFloor),
    // Tap, потом короткий hold → release stab
    (300, ScriptAction::Press),
    (310, ScriptAction::Release),
    (400, ScriptAction::Press),
    (430, ScriptAction::Release),
    (520, ScriptAction::TouchStand(1)),
];

fn load_config() -> SwordConfig {
    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        return SwordConfig::default();
    };

    match SwordConfig::from_file(&path) {
        Ok(config) => {
            log(&format!("Loaded config from {}", path.display()));
            config
        }
        Err(error) => {
            log_error(&format!("❌ {}", error));
            std::process::exit(1);
        }
    }
}

fn log_sword_events(mut stages: EventReader<StageChanged>, mut stabs: EventReader<StabExecuted>) {
    for changed in stages.read() {
        log(&format!("📍 {:?} → {:?}", changed.sword, changed.stage));
    }
    for stab in stabs.read() {
        log(&format!("⚔️ {:?} stab {:?} ({:?})", stab.sword, stab.force, stab.exit));
    }
}

fn main() {
    let mut app = create_headless_app();
    let config = load_config();

    // Детерминированный шаг: ровно один fixed tick на update
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .add_systems(Update, log_sword_events);

    let stand_ids = [CheckpointId(1), CheckpointId(2)];
    if let Err(error) = StandProgression::install(app.world_mut(), StandProgression::new(stand_ids.to_vec())) {
        log_error(&format!("❌ {}", error));
        std::process::exit(1);
    }

    let (sword, stands, floor) = {
        let mut commands = app.world_mut().commands();
        let sword = spawn_sword(&mut commands, config, Vec3::new(0.0, 1.0, 0.0));
        let stands = [
            spawn_stand(&mut commands, stand_ids[0], Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)),
            spawn_stand(&mut commands, stand_ids[1], Vec3::new(6.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
        ];
        let floor = spawn_floor(&mut commands, -2.0);
        (sword, stands, floor)
    };
    app.world_mut().flush();

    log(&format!("Starting TapHold headless simulation ({} ticks)", TICK_COUNT));

    for tick in 0..TICK_COUNT {
        for (_, action) in SCRIPT.iter().filter(|(at, _)| *at == tick) {
            match *action {
                ScriptAction::Press | ScriptAction::Release => {
                    let Some(mut raw) = app.world_mut().get_mut::<RawInput>(sword) else {
                        continue;
                    };
                    if matches!(action, ScriptAction::Press) {
                        raw.press(InputKey::Space);
                    } else {
                        raw.release(InputKey::Space);
                    }
                }
                ScriptAction::TouchStand(index) => {
                    app.world_mut().send_event(SurfaceContact {
                        sword,
                        surface: stands[index],
                    });
                }
                ScriptAction::TouchFloor => {
                    app.world_mut().send_event(SurfaceContact { sword, surface: floor });
                }
            }
        }

        app.update();
    }

    log("Simulation complete!");
}
