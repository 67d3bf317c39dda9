//! Session controller
//!
//! Owns the session counters, the live target and every scheduled task. All
//! inputs are handled to completion before the next one; every (phase, event)
//! pair is defined, most of them as silent no-ops.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawn::random_position;
use super::state::{Phase, PlayArea, Session, Target, TargetId, Tier};
use super::timers::{Task, TimerId, Timers};
use crate::consts::*;
use crate::presentation::{Presentation, Screen};
use crate::settings::Settings;

/// Who drives the one-second countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CountdownSource {
    /// Periodic task on the controller clock; `tick()` still works and pushes
    /// the next periodic step back a full period
    #[default]
    Internal,
    /// Only `tick()` counts down; `advance()` runs the short one-shots
    External,
}

/// Inbound events from the shell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Start,
    Activate(TargetId),
    Restart,
    /// External countdown step
    Tick,
    /// Virtual clock moved forward
    Elapsed { ms: u64 },
    Resize(PlayArea),
}

pub struct SessionController<P: Presentation> {
    session: Session,
    area: PlayArea,
    /// The only target that accepts activation
    live: Option<Target>,
    /// Targets already dead but still animating out
    vanishing: Vec<TargetId>,
    timers: Timers,
    countdown: Option<TimerId>,
    pending_spawn: Option<TimerId>,
    score_pop: Option<TimerId>,
    countdown_source: CountdownSource,
    rng: Pcg32,
    next_target_id: u32,
    settings: Settings,
    presentation: P,
}

impl<P: Presentation> SessionController<P> {
    pub fn new(presentation: P, area: PlayArea, seed: u64) -> Self {
        Self {
            session: Session::default(),
            area,
            live: None,
            vanishing: Vec::new(),
            timers: Timers::new(),
            countdown: None,
            pending_spawn: None,
            score_pop: None,
            countdown_source: CountdownSource::default(),
            rng: Pcg32::seed_from_u64(seed),
            next_target_id: 1,
            settings: Settings::default(),
            presentation,
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_countdown_source(mut self, source: CountdownSource) -> Self {
        self.countdown_source = source;
        self
    }

    pub fn countdown_source(&self) -> CountdownSource {
        self.countdown_source
    }

    // === Accessors ===

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.session.time_remaining
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn live_target(&self) -> Option<&Target> {
        self.live.as_ref()
    }

    pub fn is_live(&self, id: TargetId) -> bool {
        self.live.is_some_and(|t| t.id == id)
    }

    /// Outstanding scheduled tasks (countdown, spawn, removals, score pulse)
    pub fn pending_tasks(&self) -> usize {
        self.timers.pending()
    }

    pub fn countdown_running(&self) -> bool {
        self.countdown.is_some_and(|h| self.timers.is_pending(h))
    }

    /// Virtual clock in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.timers.now()
    }

    pub fn play_area(&self) -> PlayArea {
        self.area
    }

    /// New size is picked up by the next spawn
    pub fn set_play_area(&mut self, area: PlayArea) {
        self.area = area;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    // === Inputs ===

    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Start => self.start(),
            Event::Activate(id) => {
                self.activate(id);
            }
            Event::Restart => self.restart(),
            Event::Tick => self.tick(),
            Event::Elapsed { ms } => self.advance(ms),
            Event::Resize(area) => self.set_play_area(area),
        }
    }

    /// Waiting -> Playing
    pub fn start(&mut self) {
        if self.session.phase != Phase::Waiting {
            log::trace!("start ignored in {:?}", self.session.phase);
            return;
        }

        self.session.phase = Phase::Playing;
        self.session.reset_counters();

        self.presentation.show_screen(Screen::Playing);
        self.presentation.update_score(self.session.score);
        self.presentation
            .update_timer(self.session.time_remaining, self.session.is_urgent());

        if self.countdown_source == CountdownSource::Internal {
            self.countdown = Some(self.timers.schedule_every(TICK_MS, Task::Countdown));
        }
        self.spawn();

        log::info!("Session started ({}s)", SESSION_SECS);
    }

    /// External countdown step; ends the session when the clock hits zero
    pub fn tick(&mut self) {
        if self.session.phase != Phase::Playing {
            log::trace!("tick ignored in {:?}", self.session.phase);
            return;
        }

        // This second is counted; the periodic step restarts from now
        if let Some(handle) = self.countdown.take() {
            self.timers.cancel(handle);
            self.countdown = Some(self.timers.schedule_every(TICK_MS, Task::Countdown));
        }
        self.count_down();
    }

    fn count_down(&mut self) {
        if self.session.phase != Phase::Playing {
            return;
        }

        self.session.time_remaining = self.session.time_remaining.saturating_sub(1);
        self.presentation
            .update_timer(self.session.time_remaining, self.session.is_urgent());

        if self.session.time_remaining == 0 {
            self.end();
        }
    }

    /// Returns true if `id` was the live target and scored
    pub fn activate(&mut self, id: TargetId) -> bool {
        if self.session.phase != Phase::Playing {
            log::trace!("activation of {} ignored in {:?}", id, self.session.phase);
            return false;
        }
        let Some(target) = self.live.filter(|t| t.id == id) else {
            log::trace!("stale activation of {}", id);
            return false;
        };

        self.session.score += 1;
        self.presentation.update_score(self.session.score);
        log::debug!("Hit {} (score {})", id, self.session.score);

        if self.settings.effective_feedback_bursts() {
            self.presentation.render_feedback(target.center());
        }
        if self.settings.effective_score_pop() {
            self.presentation.set_score_pop(true);
            if let Some(handle) = self.score_pop.take() {
                self.timers.cancel(handle);
            }
            self.score_pop = Some(self.timers.schedule_once(SCORE_POP_MS, Task::ClearScorePop));
        }

        self.destroy_live();

        if let Some(handle) = self.pending_spawn.take() {
            self.timers.cancel(handle);
        }
        self.pending_spawn = Some(self.timers.schedule_once(SPAWN_DELAY_MS, Task::SpawnTarget));
        true
    }

    /// GameOver -> Waiting
    pub fn restart(&mut self) {
        if self.session.phase != Phase::GameOver {
            log::trace!("restart ignored in {:?}", self.session.phase);
            return;
        }

        self.cancel_tasks();
        self.presentation.clear_feedback();

        self.session.phase = Phase::Waiting;
        self.session.reset_counters();

        self.presentation.show_screen(Screen::Start);
        self.presentation.update_score(self.session.score);
        self.presentation
            .update_timer(self.session.time_remaining, self.session.is_urgent());

        log::debug!("Back to start screen");
    }

    /// Move the virtual clock forward, running every task that comes due
    pub fn advance(&mut self, elapsed_ms: u64) {
        let until = self.timers.now().saturating_add(elapsed_ms);
        while let Some((_, task)) = self.timers.pop_due(until) {
            self.run_task(task);
        }
        self.timers.settle(until);
    }

    // === Target lifecycle ===

    /// Replace whatever target is live with a new one at a random spot
    pub fn spawn(&mut self) {
        if self.session.phase != Phase::Playing {
            return;
        }
        if let Some(handle) = self.pending_spawn.take() {
            self.timers.cancel(handle);
        }
        self.destroy_live();

        let pos = random_position(&mut self.rng, self.area);
        let id = TargetId(self.next_target_id);
        self.next_target_id += 1;

        self.live = Some(Target { id, pos });
        self.presentation.render_target(id, pos);
        log::trace!("Spawned {} at ({:.1}, {:.1})", id, pos.x, pos.y);
    }

    /// Logical removal is immediate; the visual one follows after the vanish delay
    fn destroy_live(&mut self) {
        if let Some(target) = self.live.take() {
            self.presentation.vanish_target(target.id);
            self.timers
                .schedule_once(VANISH_DELAY_MS, Task::RemoveTarget(target.id));
            self.vanishing.push(target.id);
        }
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::Countdown => self.count_down(),
            Task::SpawnTarget => {
                self.pending_spawn = None;
                self.spawn();
            }
            Task::RemoveTarget(id) => {
                self.vanishing.retain(|v| *v != id);
                self.presentation.remove_target(id);
            }
            Task::ClearScorePop => {
                self.score_pop = None;
                self.presentation.set_score_pop(false);
            }
        }
    }

    // === Session end ===

    fn end(&mut self) {
        self.session.phase = Phase::GameOver;
        self.session.time_remaining = 0;

        if let Some(target) = self.live.take() {
            self.presentation.vanish_target(target.id);
            self.presentation.remove_target(target.id);
        }
        self.cancel_tasks();
        self.presentation.update_timer(0, false);

        let tier = Tier::from_score(self.session.score);
        self.presentation.show_game_over(self.session.score, tier);
        self.presentation.show_screen(Screen::GameOver);

        log::info!("Session over: score {} ({})", self.session.score, tier);
    }

    /// Cancel every scheduled task, finishing any visual work they owed
    fn cancel_tasks(&mut self) {
        self.timers.cancel_all();
        self.countdown = None;
        self.pending_spawn = None;

        for id in self.vanishing.drain(..) {
            self.presentation.remove_target(id);
        }
        if self.score_pop.take().is_some() {
            self.presentation.set_score_pop(false);
        }
    }
}
