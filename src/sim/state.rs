//! Session state and core types
//!
//! Everything the controller owns about a single play-through lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Start screen shown, nothing running
    #[default]
    Waiting,
    /// Countdown running, one target live at a time
    Playing,
    /// Time ran out, final score on screen
    GameOver,
}

/// Opaque handle correlating activation events with the target they hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u32);

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "target-{}", self.0)
    }
}

/// The single activatable object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    /// Top-left corner in play area coordinates
    pub pos: Vec2,
}

impl Target {
    /// Center point (where feedback bursts originate)
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(TARGET_SIZE / 2.0)
    }
}

/// Size of the play surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Performance label derived from the final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    NotBad,
    Decent,
    CouldBeBetter,
}

impl Tier {
    /// Highest tier first; lower bounds are inclusive
    pub fn from_score(score: u32) -> Self {
        if score >= TIER_NOT_BAD {
            Tier::NotBad
        } else if score >= TIER_DECENT {
            Tier::Decent
        } else {
            Tier::CouldBeBetter
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::NotBad => "Not bad",
            Tier::Decent => "Decent",
            Tier::CouldBeBetter => "Could be better",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One play-through's counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub phase: Phase,
    pub score: u32,
    /// Whole seconds left on the clock
    pub time_remaining: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            phase: Phase::Waiting,
            score: 0,
            time_remaining: SESSION_SECS,
        }
    }
}

impl Session {
    /// Reset counters, keeping the phase
    pub fn reset_counters(&mut self) {
        self.score = 0;
        self.time_remaining = SESSION_SECS;
    }

    /// Timer display urgency
    pub fn is_urgent(&self) -> bool {
        self.time_remaining <= URGENT_SECS
    }

    /// Tier for the current score
    pub fn tier(&self) -> Tier {
        Tier::from_score(self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::from_score(20), Tier::NotBad);
        assert_eq!(Tier::from_score(19), Tier::Decent);
        assert_eq!(Tier::from_score(10), Tier::Decent);
        assert_eq!(Tier::from_score(9), Tier::CouldBeBetter);
        assert_eq!(Tier::from_score(0), Tier::CouldBeBetter);
        assert_eq!(Tier::from_score(u32::MAX), Tier::NotBad);
    }

    #[test]
    fn test_tier_labels() {
        assert_eq!(Tier::NotBad.to_string(), "Not bad");
        assert_eq!(Tier::Decent.as_str(), "Decent");
        assert_eq!(Tier::CouldBeBetter.as_str(), "Could be better");
    }

    #[test]
    fn test_session_defaults() {
        let session = Session::default();
        assert_eq!(session.phase, Phase::Waiting);
        assert_eq!(session.score, 0);
        assert_eq!(session.time_remaining, SESSION_SECS);
        assert!(!session.is_urgent());
    }

    #[test]
    fn test_target_center() {
        let target = Target {
            id: TargetId(1),
            pos: Vec2::new(20.0, 30.0),
        };
        assert_eq!(target.center(), Vec2::new(40.0, 50.0));
        assert_eq!(target.id.to_string(), "target-1");
    }
}
