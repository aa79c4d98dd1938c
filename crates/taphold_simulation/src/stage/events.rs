//! Stage notifications (exposed to observers)

use bevy::prelude::*;

use super::GameStage;

/// Current stage of a sword changed (fires once per real change)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageChanged {
    pub sword: Entity,
    pub stage: GameStage,
}

/// A physics routine finished the given stage
///
/// `stage` - стадия, которую routine завершил (`Stage1InProgress` / `Stage2InProgress`).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageCompleted {
    pub sword: Entity,
    pub stage: GameStage,
}
