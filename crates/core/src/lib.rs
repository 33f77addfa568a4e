//! Blink and attention decision engine for the Don't Blink reflex game.
//!
//! Feed [`monitor::attention_monitor::AttentionMonitor`] one face-mesh
//! landmark frame per camera frame; it decides whether the player blinked,
//! left the play zone, disappeared from view, or is still staring.

pub mod detection;
pub mod difficulty;
pub mod monitor;
pub mod shared;
