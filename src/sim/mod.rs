//! Deterministic session module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual clock only (the shell reports elapsed time)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod controller;
pub mod spawn;
pub mod state;
pub mod timers;

pub use controller::{CountdownSource, Event, SessionController};
pub use spawn::{placement_range, random_position};
pub use state::{Phase, PlayArea, Session, Target, TargetId, Tier};
pub use timers::{Task, TimerId, Timers};
