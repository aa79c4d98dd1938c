//! Attack notifications (exposed to observers)

use bevy::prelude::*;

use crate::physics::ChargeExit;

/// Stage-2 stab impulse was applied to the sword
///
/// `force` в local space тела; `exit` - release или duration cap.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct StabExecuted {
    pub sword: Entity,
    pub force: Vec3,
    pub exit: ChargeExit,
}
