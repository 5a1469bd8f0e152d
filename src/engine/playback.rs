use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::sim::{NodeId, SimulationResult, SimulationStep};

use super::active::ActiveEdges;
use super::spreaders::TopSpreaders;

pub const DEFAULT_PLAYBACK_INTERVAL: Duration = Duration::from_millis(1500);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Playing,
    Paused,
    Finished,
}

impl PlaybackStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Finished => "Finished",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PlaybackTimer {
    interval: Duration,
    next_due: Duration,
}

impl PlaybackTimer {
    fn start(interval: Duration, now: Duration) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepOverlay {
    pub active_edges: ActiveEdges,
    pub top_spreaders: TopSpreaders,
    pub newly_activated: HashSet<NodeId>,
}

impl StepOverlay {
    pub fn for_step(step: &SimulationStep) -> Self {
        Self {
            active_edges: ActiveEdges::from_step(step),
            top_spreaders: TopSpreaders::from_step(step),
            newly_activated: step.newly_activated.iter().cloned().collect(),
        }
    }

    pub fn is_newly_activated(&self, id: &NodeId) -> bool {
        self.newly_activated.contains(id)
    }
}

/// Walks a result's steps on a fixed interval.
///
/// The caller drives time: `poll` is handed the current clock reading each
/// frame and fires at most one tick per call. Dropping or replacing the
/// timer field is the only way a tick is cancelled.
#[derive(Debug)]
pub struct PlaybackController {
    result: Option<Arc<SimulationResult>>,
    current_step: usize,
    status: PlaybackStatus,
    interval: Duration,
    timer: Option<PlaybackTimer>,
    overlay: StepOverlay,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYBACK_INTERVAL)
    }
}

impl PlaybackController {
    pub fn new(interval: Duration) -> Self {
        Self {
            result: None,
            current_step: 0,
            status: PlaybackStatus::Idle,
            interval,
            timer: None,
            overlay: StepOverlay::default(),
        }
    }

    pub fn load(&mut self, result: Arc<SimulationResult>, now: Duration) {
        let steps = result.step_count();
        self.result = Some(result);
        self.current_step = 0;
        self.refresh_overlay();

        if steps == 0 {
            self.timer = None;
            self.set_status(PlaybackStatus::Idle);
            return;
        }

        self.timer = Some(PlaybackTimer::start(self.interval, now));
        self.set_status(PlaybackStatus::Playing);
        info!(steps, "playback started");
    }

    pub fn tick(&mut self) -> bool {
        if self.status != PlaybackStatus::Playing {
            return false;
        }
        let Some(last) = self.last_index() else {
            return false;
        };

        if self.current_step >= last {
            self.timer = None;
            self.set_status(PlaybackStatus::Finished);
            return true;
        }

        self.current_step += 1;
        self.refresh_overlay();
        debug!(step = self.current_step, "playback advanced");
        true
    }

    /// Fires the timer if it is due. Late polls do not catch up on missed ticks.
    pub fn poll(&mut self, now: Duration) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        if now < timer.next_due {
            return false;
        }

        timer.next_due = now + timer.interval;
        self.tick()
    }

    pub fn pause(&mut self) -> bool {
        if !matches!(
            self.status,
            PlaybackStatus::Playing | PlaybackStatus::Finished
        ) {
            return false;
        }
        self.timer = None;
        self.set_status(PlaybackStatus::Paused);
        true
    }

    pub fn resume(&mut self, now: Duration) -> bool {
        if self.status != PlaybackStatus::Paused || self.step_count() == 0 {
            return false;
        }
        self.timer = Some(PlaybackTimer::start(self.interval, now));
        self.set_status(PlaybackStatus::Playing);
        true
    }

    pub fn toggle(&mut self, now: Duration) -> bool {
        match self.status {
            PlaybackStatus::Playing => self.pause(),
            PlaybackStatus::Paused => self.resume(now),
            PlaybackStatus::Finished | PlaybackStatus::Idle => {
                if self.step_count() == 0 {
                    return false;
                }
                self.current_step = 0;
                self.refresh_overlay();
                self.timer = Some(PlaybackTimer::start(self.interval, now));
                self.set_status(PlaybackStatus::Playing);
                true
            }
        }
    }

    pub fn scrub(&mut self, index: usize) -> bool {
        let Some(last) = self.last_index() else {
            return false;
        };
        self.timer = None;
        self.current_step = index.min(last);
        self.refresh_overlay();
        self.set_status(PlaybackStatus::Paused);
        true
    }

    pub fn reset(&mut self) {
        self.timer = None;
        self.current_step = 0;
        self.refresh_overlay();
        let status = if self.step_count() == 0 {
            PlaybackStatus::Idle
        } else {
            PlaybackStatus::Paused
        };
        self.set_status(status);
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn step_count(&self) -> usize {
        self.result.as_ref().map_or(0, |result| result.step_count())
    }

    pub fn last_index(&self) -> Option<usize> {
        self.result.as_ref().and_then(|result| result.last_index())
    }

    pub fn result(&self) -> Option<&SimulationResult> {
        self.result.as_deref()
    }

    pub fn shared_result(&self) -> Option<Arc<SimulationResult>> {
        self.result.clone()
    }

    pub fn current_step_data(&self) -> Option<&SimulationStep> {
        self.result()?.step(self.current_step)
    }

    pub fn overlay(&self) -> &StepOverlay {
        &self.overlay
    }

    #[cfg(test)]
    pub fn has_timer(&self) -> bool {
        self.timer.is_some()
    }

    pub fn next_tick_in(&self, now: Duration) -> Option<Duration> {
        self.timer
            .map(|timer| timer.next_due.saturating_sub(now))
    }

    fn refresh_overlay(&mut self) {
        self.overlay = self
            .current_step_data()
            .map(StepOverlay::for_step)
            .unwrap_or_default();
    }

    fn set_status(&mut self, status: PlaybackStatus) {
        if self.status != status {
            info!(
                from = self.status.label(),
                to = status.label(),
                step = self.current_step,
                "playback status changed"
            );
            self.status = status;
        }
    }
}
