//! Playback controls over the snapshots of a finished run.

use dvsim_convergence::{History, IterationSnapshot};
use serde::{Deserialize, Serialize};

/// Playback controller over a history. Frame `i` is snapshot `i`.
pub struct Playback<'a> {
    history: &'a History,
    current_frame: usize,
    loop_enabled: bool,
}

impl<'a> Playback<'a> {
    pub fn new(history: &'a History) -> Self {
        Self {
            history,
            current_frame: 0,
            loop_enabled: false,
        }
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Number of snapshots, never zero.
    pub fn total_frames(&self) -> usize {
        self.history.len()
    }

    fn last_frame(&self) -> usize {
        self.total_frames() - 1
    }

    /// True while the last snapshot is shown.
    pub fn is_at_end(&self) -> bool {
        self.current_frame == self.last_frame()
    }

    /// Seek to a snapshot, clamped to the last one.
    pub fn seek(&mut self, frame: usize) {
        self.current_frame = frame.min(self.last_frame());
    }

    pub fn set_loop(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
    }

    pub fn is_looping(&self) -> bool {
        self.loop_enabled
    }

    /// Advance one snapshot and return it, or `None` at the end without looping.
    pub fn step_forward(&mut self) -> Option<&'a IterationSnapshot> {
        if !self.is_at_end() {
            self.current_frame += 1;
        } else if self.loop_enabled {
            self.current_frame = 0;
        } else {
            return None;
        }
        Some(self.current())
    }

    /// Step back one snapshot, stopping at the initial one.
    pub fn step_backward(&mut self) -> Option<&'a IterationSnapshot> {
        if self.current_frame == 0 {
            return None;
        }
        self.current_frame -= 1;
        Some(self.current())
    }

    /// The snapshot at the current frame.
    pub fn current(&self) -> &'a IterationSnapshot {
        &self.history.snapshots()[self.current_frame]
    }

    /// Snapshots up to and including the current one.
    pub fn frames_to_current(&self) -> &'a [IterationSnapshot] {
        &self.history.snapshots()[..=self.current_frame]
    }

    /// Progress from 0.0 at the initial snapshot to 1.0 at the last.
    pub fn progress(&self) -> f64 {
        if self.last_frame() == 0 {
            1.0
        } else {
            self.current_frame as f64 / self.last_frame() as f64
        }
    }
}

/// Playback status, as printed with `--format json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub current_frame: usize,
    pub total_frames: usize,
    pub iteration: usize,
    pub at_end: bool,
    pub progress: f64,
    pub loop_enabled: bool,
}

impl From<&Playback<'_>> for PlaybackStatus {
    fn from(playback: &Playback<'_>) -> Self {
        Self {
            current_frame: playback.current_frame,
            total_frames: playback.total_frames(),
            iteration: playback.current().iteration,
            at_end: playback.is_at_end(),
            progress: playback.progress(),
            loop_enabled: playback.loop_enabled,
        }
    }
}
