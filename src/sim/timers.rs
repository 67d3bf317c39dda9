//! Virtual-clock task scheduler
//!
//! The controller never touches wall-clock time. The shell advances this clock
//! and due tasks come back out in `(due, handle)` order, one at a time, so a
//! task that fires may cancel the ones queued behind it.

use serde::{Deserialize, Serialize};

use super::state::TargetId;

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

/// Work the controller schedules for later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// One-second countdown step
    Countdown,
    /// Place the replacement target after a hit
    SpawnTarget,
    /// Drop a vanished target from the screen
    RemoveTarget(TargetId),
    /// End the score pulse
    ClearScorePop,
}

#[derive(Debug, Clone)]
struct Scheduled {
    id: TimerId,
    due_ms: u64,
    /// Re-arm interval for periodic tasks
    period_ms: Option<u64>,
    task: Task,
}

#[derive(Debug, Clone, Default)]
pub struct Timers {
    now_ms: u64,
    next_id: u64,
    pending: Vec<Scheduled>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Number of outstanding tasks (periodic ones count once)
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|s| s.id == id)
    }

    /// Run `task` once, `delay_ms` from now
    pub fn schedule_once(&mut self, delay_ms: u64, task: Task) -> TimerId {
        self.push(delay_ms, None, task)
    }

    /// Run `task` every `period_ms`, first time one period from now
    pub fn schedule_every(&mut self, period_ms: u64, task: Task) -> TimerId {
        debug_assert!(period_ms > 0, "periodic task needs a non-zero period");
        self.push(period_ms, Some(period_ms.max(1)), task)
    }

    fn push(&mut self, delay_ms: u64, period_ms: Option<u64>, task: Task) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            due_ms: self.now_ms.saturating_add(delay_ms),
            period_ms,
            task,
        });
        id
    }

    /// Returns false if the handle already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Pop the earliest task due at or before `until_ms`, moving the clock to
    /// its due time. Periodic tasks are re-armed before being returned.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, Task)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= until_ms)
            .min_by_key(|(_, s)| (s.due_ms, s.id))
            .map(|(i, _)| i)?;

        let entry = &mut self.pending[idx];
        let fired = (entry.id, entry.task);
        let due_ms = entry.due_ms;
        let period_ms = entry.period_ms;
        if let Some(period) = period_ms {
            entry.due_ms += period;
        } else {
            self.pending.swap_remove(idx);
        }

        self.now_ms = self.now_ms.max(due_ms);
        Some(fired)
    }

    /// Move the clock forward once every due task has been popped
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(timers: &mut Timers, until: u64) -> Vec<Task> {
        let mut fired = Vec::new();
        while let Some((_, task)) = timers.pop_due(until) {
            fired.push(task);
        }
        timers.settle(until);
        fired
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut timers = Timers::new();
        timers.schedule_once(100, Task::SpawnTarget);

        assert!(drain(&mut timers, 99).is_empty());
        assert_eq!(drain(&mut timers, 100), vec![Task::SpawnTarget]);
        assert!(drain(&mut timers, 1000).is_empty());
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_periodic_rearms() {
        let mut timers = Timers::new();
        timers.schedule_every(1000, Task::Countdown);

        assert_eq!(drain(&mut timers, 3500).len(), 3);
        assert_eq!(timers.now(), 3500);
        assert_eq!(drain(&mut timers, 4000), vec![Task::Countdown]);
        assert_eq!(timers.pending(), 1);
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut timers = Timers::new();
        timers.schedule_once(300, Task::ClearScorePop);
        timers.schedule_once(200, Task::RemoveTarget(TargetId(1)));
        timers.schedule_once(100, Task::SpawnTarget);

        assert_eq!(
            drain(&mut timers, 300),
            vec![
                Task::SpawnTarget,
                Task::RemoveTarget(TargetId(1)),
                Task::ClearScorePop
            ]
        );
    }

    #[test]
    fn test_same_due_time_fires_in_schedule_order() {
        let mut timers = Timers::new();
        timers.schedule_once(1000, Task::SpawnTarget);
        timers.schedule_every(1000, Task::Countdown);

        assert_eq!(
            drain(&mut timers, 1000),
            vec![Task::SpawnTarget, Task::Countdown]
        );
    }

    #[test]
    fn test_clock_tracks_fired_task() {
        let mut timers = Timers::new();
        timers.schedule_once(100, Task::SpawnTarget);
        timers.pop_due(5000);
        assert_eq!(timers.now(), 100);

        // Delays are relative to the task that is running
        timers.schedule_once(100, Task::ClearScorePop);
        assert!(timers.pop_due(199).is_none());
        assert!(timers.pop_due(200).is_some());
    }

    #[test]
    fn test_cancel() {
        let mut timers = Timers::new();
        let spawn = timers.schedule_once(100, Task::SpawnTarget);
        let tick = timers.schedule_every(1000, Task::Countdown);

        assert!(timers.cancel(spawn));
        assert!(!timers.cancel(spawn));
        assert!(timers.is_pending(tick));

        timers.cancel_all();
        assert_eq!(timers.pending(), 0);
        assert!(drain(&mut timers, 10_000).is_empty());
    }
}
