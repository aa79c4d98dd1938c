//! Game stage state machine
//!
//! WaitingForFirstTap → Stage1InProgress → WaitingForSecondTap → Stage2InProgress → WaitingForFirstTap
//!
//! Только `SwordController` двигает стадии; легальность переходов внутри
//! машины не проверяется (кроме guard-запросов `can_start_*`).

pub mod components;
pub mod events;


pub use components::*;
pub use events::*;
