//! Stand progression: ordered checkpoint list, forward-only transitions.
//!
//! One authoritative `StandProgression` resource per running scene.
//! Installed once at setup through [`StandProgression::install`]; every
//! collision handler reads it by reference. A second install is rejected
//! and the first one stays in place.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logger;


/// Identifier of a stand (checkpoint) in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize)]
pub struct CheckpointId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    #[error("stand {0:?} is not in the progression list")]
    UnknownCheckpoint(CheckpointId),

    #[error("one or both stands are not in the list: no stand bound, {0:?} ignored")]
    NoCurrentStand(CheckpointId),

    #[error("stand {to:?} is not ahead of {from:?}")]
    NotForward { from: CheckpointId, to: CheckpointId },

    #[error("stand progression already installed, duplicate discarded")]
    AlreadyInstalled,
}

#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct StandProgression {
    stands: Vec<CheckpointId>,
}

impl StandProgression {
    pub fn new(stands: Vec<CheckpointId>) -> Self {
        Self { stands }
    }

    pub fn stands(&self) -> &[CheckpointId] {
        &self.stands
    }

    pub fn position(&self, stand: CheckpointId) -> Option<usize> {
        self.stands.iter().position(|candidate| *candidate == stand)
    }

    /// Ok iff both stands are registered and `next` sits strictly after `current`.
    pub fn check_progression(
        &self,
        current: CheckpointId,
        next: CheckpointId,
    ) -> Result<(), ProgressionError> {
        let from = self
            .position(current)
            .ok_or(ProgressionError::UnknownCheckpoint(current))?;
        let to = self
            .position(next)
            .ok_or(ProgressionError::UnknownCheckpoint(next))?;

        if to > from {
            Ok(())
        } else {
            Err(ProgressionError::NotForward { from: current, to: next })
        }
    }

    /// Boolean form of [`check_progression`](Self::check_progression); rejections are logged as warnings.
    pub fn validate_progression(&self, current: CheckpointId, next: CheckpointId) -> bool {
        match self.check_progression(current, next) {
            Ok(()) => true,
            Err(error) => {
                logger::log_warning(&format!("Stand progression rejected: {}", error));
                false
            }
        }
    }

    /// First registrant wins.
    pub fn install(world: &mut World, progression: StandProgression) -> Result<(), ProgressionError> {
        if world.contains_resource::<StandProgression>() {
            logger::log_warning("StandProgression already exists, destroying duplicate");
            return Err(ProgressionError::AlreadyInstalled);
        }

        world.insert_resource(progression);
        Ok(())
    }
}
