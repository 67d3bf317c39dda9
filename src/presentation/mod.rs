//! Presentation boundary
//!
//! The controller tells presentation what to show; presentation never touches
//! game state. `CommandLog` records calls for tests and the headless demo.

#[cfg(target_arch = "wasm32")]
pub mod dom;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{TargetId, Tier};

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Start,
    Playing,
    GameOver,
}

/// Rendering capabilities the controller relies on
pub trait Presentation {
    fn show_screen(&mut self, screen: Screen);

    /// Draw a target with its top-left corner at `pos`
    fn render_target(&mut self, id: TargetId, pos: Vec2);
    /// Start the vanish animation; the target no longer accepts activation
    fn vanish_target(&mut self, id: TargetId);
    fn remove_target(&mut self, id: TargetId);

    /// Cosmetic burst centered on `at`
    fn render_feedback(&mut self, at: Vec2);
    /// Drop any leftover bursts and overlays
    fn clear_feedback(&mut self);
    fn set_score_pop(&mut self, active: bool);

    fn update_score(&mut self, score: u32);
    fn update_timer(&mut self, secs_remaining: u32, urgent: bool);
    fn show_game_over(&mut self, final_score: u32, tier: Tier);
}

/// A single presentation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    ShowScreen { screen: Screen },
    RenderTarget { id: TargetId, x: f32, y: f32 },
    VanishTarget { id: TargetId },
    RemoveTarget { id: TargetId },
    RenderFeedback { x: f32, y: f32 },
    ClearFeedback,
    ScorePop { active: bool },
    UpdateScore { score: u32 },
    UpdateTimer { secs: u32, urgent: bool },
    ShowGameOver { score: u32, tier: String },
}

/// Presentation that just records what it was asked to do
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    pub commands: Vec<Command>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything recorded so far
    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Targets rendered and not yet removed, in render order
    pub fn on_screen(&self) -> Vec<TargetId> {
        let mut shown = Vec::new();
        for cmd in &self.commands {
            match cmd {
                Command::RenderTarget { id, .. } => shown.push(*id),
                Command::RemoveTarget { id } => shown.retain(|t| t != id),
                _ => {}
            }
        }
        shown
    }

    pub fn last_screen(&self) -> Option<Screen> {
        self.commands.iter().rev().find_map(|cmd| match cmd {
            Command::ShowScreen { screen } => Some(*screen),
            _ => None,
        })
    }
}

impl Presentation for CommandLog {
    fn show_screen(&mut self, screen: Screen) {
        self.commands.push(Command::ShowScreen { screen });
    }

    fn render_target(&mut self, id: TargetId, pos: Vec2) {
        self.commands.push(Command::RenderTarget {
            id,
            x: pos.x,
            y: pos.y,
        });
    }

    fn vanish_target(&mut self, id: TargetId) {
        self.commands.push(Command::VanishTarget { id });
    }

    fn remove_target(&mut self, id: TargetId) {
        self.commands.push(Command::RemoveTarget { id });
    }

    fn render_feedback(&mut self, at: Vec2) {
        self.commands.push(Command::RenderFeedback { x: at.x, y: at.y });
    }

    fn clear_feedback(&mut self) {
        self.commands.push(Command::ClearFeedback);
    }

    fn set_score_pop(&mut self, active: bool) {
        self.commands.push(Command::ScorePop { active });
    }

    fn update_score(&mut self, score: u32) {
        self.commands.push(Command::UpdateScore { score });
    }

    fn update_timer(&mut self, secs_remaining: u32, urgent: bool) {
        self.commands.push(Command::UpdateTimer {
            secs: secs_remaining,
            urgent,
        });
    }

    fn show_game_over(&mut self, final_score: u32, tier: Tier) {
        self.commands.push(Command::ShowGameOver {
            score: final_score,
            tier: tier.as_str().to_string(),
        });
    }
}
