//! Input edge detection
//!
//! # Архитектура
//!
//! ```text
//! Host input (keyboard / touch)
//!     ↓
//! RawInput (component, пишется хостом каждый tick)
//!     ↓
//! InputEdgeDetector (union всех sources → pressed/released edges + held flag)
//!     ↓
//! SwordController dispatch + InputPressed / InputReleased events
//! ```

pub mod components;
pub mod events;


pub use components::*;
pub use events::*;
