//! Reflex Dot - A reaction-speed dot tapping minigame
//!
//! Core modules:
//! - `sim`: Deterministic session controller (state machine, spawning, timers)
//! - `presentation`: Rendering boundary the controller issues commands to
//! - `settings`: Cosmetic preferences

pub mod presentation;
pub mod settings;
pub mod sim;

pub use presentation::{Command, CommandLog, Presentation, Screen};
pub use settings::Settings;
pub use sim::{CountdownSource, Event, Phase, PlayArea, SessionController, TargetId, Tier};

/// Game configuration constants
pub mod consts {
    /// Session length in seconds
    pub const SESSION_SECS: u32 = 15;
    /// Countdown period
    pub const TICK_MS: u64 = 1000;
    /// Timer display turns urgent at or below this many seconds
    pub const URGENT_SECS: u32 = 5;

    /// Target edge length in pixels
    pub const TARGET_SIZE: f32 = 40.0;
    /// Minimum gap between a target and the play area edge
    pub const PADDING: f32 = 20.0;

    /// Delay before a replacement target appears (lets the vanish animation start)
    pub const SPAWN_DELAY_MS: u64 = 100;
    /// How long a destroyed target stays on screen in its vanishing state
    pub const VANISH_DELAY_MS: u64 = 200;
    /// Duration of the score pulse after a hit
    pub const SCORE_POP_MS: u64 = 300;

    /// Feedback burst particle count
    pub const BURST_PARTICLES: u32 = 8;
    /// Feedback burst particle lifetime (presentation side)
    pub const BURST_LIFETIME_MS: u64 = 1000;

    /// Tier thresholds (inclusive lower bounds)
    pub const TIER_NOT_BAD: u32 = 20;
    pub const TIER_DECENT: u32 = 10;
}
