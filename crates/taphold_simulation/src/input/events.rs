//! Input edge events (exposed to observers)

use bevy::prelude::*;

/// Union of all input sources went not-held → held this tick
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputPressed {
    pub sword: Entity,
}

/// Union of all input sources went held → not-held this tick
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputReleased {
    pub sword: Entity,
}
