//! DOM presentation (wasm32 only)
//!
//! Renders into the page markup: `#gameArea`, `#startScreen`, `#gameOverScreen`,
//! `#timer`, `#score`, `#finalScore`, `#performanceText`, `#particlesContainer`.
//! Targets are `div.red-dot` elements carrying a `data-target-id` attribute so
//! the shell can route a click back to the controller.

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

use super::{Presentation, Screen};
use crate::consts::{BURST_LIFETIME_MS, BURST_PARTICLES, VANISH_DELAY_MS};
use crate::sim::{TargetId, Tier};

/// Attribute carrying the numeric target id
pub const TARGET_ATTR: &str = "data-target-id";

const OVERLAY_CLASS: &str = "game-over-overlay";

pub struct DomPresentation {
    document: Document,
    game_area: Option<Element>,
    start_screen: Option<Element>,
    game_over_screen: Option<Element>,
    timer: Option<Element>,
    score: Option<Element>,
    final_score: Option<Element>,
    performance_text: Option<Element>,
    particles: Option<Element>,
}

impl DomPresentation {
    pub fn new(document: Document) -> Self {
        let find = |id: &str| {
            let el = document.get_element_by_id(id);
            if el.is_none() {
                log::warn!("Missing #{} element", id);
            }
            el
        };
        Self {
            game_area: find("gameArea"),
            start_screen: find("startScreen"),
            game_over_screen: find("gameOverScreen"),
            timer: find("timer"),
            score: find("score"),
            final_score: find("finalScore"),
            performance_text: find("performanceText"),
            particles: find("particlesContainer"),
            document,
        }
    }

    pub fn game_area(&self) -> Option<&Element> {
        self.game_area.as_ref()
    }

    /// Current game area size in CSS pixels
    pub fn area_size(&self) -> Option<(f32, f32)> {
        let area = self.game_area.as_ref()?.dyn_ref::<HtmlElement>()?;
        Some((area.offset_width() as f32, area.offset_height() as f32))
    }

    fn element_id(id: TargetId) -> String {
        id.to_string()
    }

    fn set_style(el: &Element, prop: &str, value: &str) {
        if let Some(el) = el.dyn_ref::<HtmlElement>() {
            let _ = el.style().set_property(prop, value);
        }
    }

    fn set_display(el: &Option<Element>, visible: bool) {
        if let Some(el) = el {
            Self::set_style(el, "display", if visible { "block" } else { "none" });
        }
    }

    fn set_text(el: &Option<Element>, text: &str) {
        if let Some(el) = el {
            el.set_text_content(Some(text));
        }
    }

    fn remove_overlay(&self) {
        if let Some(area) = &self.game_area {
            if let Ok(Some(overlay)) = area.query_selector(&format!(".{}", OVERLAY_CLASS)) {
                overlay.remove();
            }
        }
    }

    /// Remove `el` after `ms`
    fn remove_later(el: Element, ms: u64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = Closure::once_into_js(move || el.remove());
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            ms as i32,
        );
    }
}

impl Presentation for DomPresentation {
    fn show_screen(&mut self, screen: Screen) {
        match screen {
            Screen::Start => {
                Self::set_display(&self.start_screen, true);
                Self::set_display(&self.game_over_screen, false);
            }
            Screen::Playing => {
                Self::set_display(&self.start_screen, false);
                Self::set_display(&self.game_over_screen, false);
            }
            Screen::GameOver => {
                Self::set_display(&self.game_over_screen, true);
                if let (Some(area), Ok(overlay)) =
                    (&self.game_area, self.document.create_element("div"))
                {
                    overlay.set_class_name(OVERLAY_CLASS);
                    let _ = area.append_child(&overlay);
                }
            }
        }
    }

    fn render_target(&mut self, id: TargetId, pos: Vec2) {
        let Some(area) = &self.game_area else {
            return;
        };
        let Ok(dot) = self.document.create_element("div") else {
            log::warn!("Could not create element for {}", id);
            return;
        };
        dot.set_class_name("red-dot");
        dot.set_id(&Self::element_id(id));
        let _ = dot.set_attribute(TARGET_ATTR, &id.0.to_string());
        Self::set_style(&dot, "left", &format!("{}px", pos.x));
        Self::set_style(&dot, "top", &format!("{}px", pos.y));
        let _ = area.append_child(&dot);
    }

    fn vanish_target(&mut self, id: TargetId) {
        if let Some(dot) = self.document.get_element_by_id(&Self::element_id(id)) {
            // No longer routable to the controller
            let _ = dot.remove_attribute(TARGET_ATTR);
            Self::set_style(
                &dot,
                "animation",
                &format!("dotDisappear {}s ease-out forwards", VANISH_DELAY_MS as f32 / 1000.0),
            );
        }
    }

    fn remove_target(&mut self, id: TargetId) {
        if let Some(dot) = self.document.get_element_by_id(&Self::element_id(id)) {
            dot.remove();
        }
    }

    fn render_feedback(&mut self, at: Vec2) {
        let Some(container) = &self.particles else {
            return;
        };
        for i in 0..BURST_PARTICLES {
            let Ok(particle) = self.document.create_element("div") else {
                continue;
            };
            let angle = i as f32 / BURST_PARTICLES as f32 * std::f32::consts::TAU;
            let distance = 50.0 + js_sys::Math::random() as f32 * 30.0;

            particle.set_class_name("particle");
            Self::set_style(&particle, "left", &format!("{}px", at.x));
            Self::set_style(&particle, "top", &format!("{}px", at.y));
            Self::set_style(&particle, "--dx", &format!("{}px", angle.cos() * distance));
            Self::set_style(&particle, "--dy", &format!("{}px", angle.sin() * distance));

            let _ = container.append_child(&particle);
            Self::remove_later(particle, BURST_LIFETIME_MS);
        }
    }

    fn clear_feedback(&mut self) {
        self.remove_overlay();
        if let Some(container) = &self.particles {
            container.set_inner_html("");
        }
    }

    fn set_score_pop(&mut self, active: bool) {
        if let Some(score) = &self.score {
            let classes = score.class_list();
            let _ = if active {
                classes.add_1("score-pop")
            } else {
                classes.remove_1("score-pop")
            };
        }
    }

    fn update_score(&mut self, score: u32) {
        Self::set_text(&self.score, &score.to_string());
    }

    fn update_timer(&mut self, secs_remaining: u32, urgent: bool) {
        Self::set_text(&self.timer, &secs_remaining.to_string());
        if let Some(timer) = &self.timer {
            let classes = timer.class_list();
            let _ = if urgent {
                classes.add_1("timer-warning")
            } else {
                classes.remove_1("timer-warning")
            };
        }
    }

    fn show_game_over(&mut self, final_score: u32, tier: Tier) {
        Self::set_text(&self.final_score, &final_score.to_string());
        Self::set_text(&self.performance_text, tier.as_str());
    }
}
