//! Raw input sources and the edge detector.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::logger;

/// Клавиши, которые хост может сообщать (закрытый набор)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum InputKey {
    Space,
    Enter,
    Q,
    E,
    A,
    R,
}

/// Ошибка чтения одного touch contact (хост не смог прочитать состояние)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("touch contact {index} unreadable: {reason}")]
pub struct TouchReadError {
    pub index: usize,
    pub reason: String,
}

/// One touch contact as reported by the host this tick (`Ok(held)` or a read failure).
pub type TouchSample = Result<bool, TouchReadError>;

/// Сырые held-сигналы, которые хост пишет каждый tick
///
/// Хост отвечает только за "что зажато сейчас";
/// edges считает `InputEdgeDetector`.
#[derive(Component, Debug, Clone, Default)]
pub struct RawInput {
    pub held_keys: HashSet<InputKey>,
    /// Активные touch contacts (порядок = индекс контакта)
    pub touches: Vec<TouchSample>,
}

impl RawInput {
    pub fn press(&mut self, key: InputKey) {
        self.held_keys.insert(key);
    }

    pub fn release(&mut self, key: InputKey) {
        self.held_keys.remove(&key);
    }

    pub fn is_key_held(&self, key: InputKey) -> bool {
        self.held_keys.contains(&key)
    }

    pub fn set_touches(&mut self, touches: Vec<TouchSample>) {
        self.touches = touches;
    }
}

/// Результат одного tick edge detection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub pressed_edge: bool,
    pub released_edge: bool,
    pub is_held: bool,
}

/// Converts per-tick held signals into edges on the union of all sources.
///
/// Две перекрывающиеся source (key + touch) дают ОДИН pressed на первой границе
/// и ОДИН released на последней.
#[derive(Debug, Clone)]
pub struct InputEdgeDetector {
    primary_key: InputKey,
    enable_touch: bool,
    was_held: bool,
}

impl InputEdgeDetector {
    pub fn new(primary_key: InputKey, enable_touch: bool) -> Self {
        Self {
            primary_key,
            enable_touch,
            was_held: false,
        }
    }

    /// Held level after the last `update` (queryable, no notification)
    pub fn is_held(&self) -> bool {
        self.was_held
    }

    pub fn primary_key(&self) -> InputKey {
        self.primary_key
    }

    pub fn update(&mut self, raw: &RawInput) -> InputSnapshot {
        let mut held = raw.is_key_held(self.primary_key);

        if self.enable_touch {
            for sample in &raw.touches {
                match sample {
                    Ok(true) => held = true,
                    Ok(false) => {}
                    // Ошибка одного контакта не мешает остальным sources
                    Err(error) => logger::log_warning(&format!("Touch input error: {}", error)),
                }
            }
        }

        let snapshot = InputSnapshot {
            pressed_edge: held && !self.was_held,
            released_edge: !held && self.was_held,
            is_held: held,
        };

        self.was_held = held;
        snapshot
    }
}

/// Edge tracking for a fixed set of keys (debug bindings).
#[derive(Debug, Clone, Default)]
pub struct KeyEdges {
    previous: HashSet<InputKey>,
}

impl KeyEdges {
    /// Returns (pressed, released) edges of `key` against the previous `commit`.
    pub fn edges(&self, raw: &RawInput, key: InputKey) -> (bool, bool) {
        let now = raw.is_key_held(key);
        let before = self.previous.contains(&key);
        (now && !before, !now && before)
    }

    pub fn commit(&mut self, raw: &RawInput) {
        self.previous.clone_from(&raw.held_keys);
    }
}
