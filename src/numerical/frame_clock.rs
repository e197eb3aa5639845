//! Redraw pacing for an external scheduler. Nothing here sleeps or spawns: callers pass the
//! current time in milliseconds and get told what to show. [`replay_schedule`] runs the clock on
//! simulated time for output that has no real clock.
use crate::numerical::mean_value_solver::SolverStep;

pub const REFERENCE_FPS: u32 = 30;

/// Pause between two revealed bisection steps.
pub const REPLAY_DELAY_MS: f64 = 200.0;

/// Fixed-rate redraw gate.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameClock {
    frame_delay_ms: f64,
    last_frame_ms: f64,
    frames: u64,
}

impl FrameClock {
    /// `target_fps` below 1 is treated as 1.
    pub fn new(target_fps: u32) -> Self {
        Self {
            frame_delay_ms: 1000.0 / f64::from(target_fps.max(1)),
            last_frame_ms: 0.0,
            frames: 0,
        }
    }

    pub fn frame_delay_ms(&self) -> f64 {
        self.frame_delay_ms
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// True when a frame is due at `now_ms`; the frame is then counted as drawn.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_frame_ms >= self.frame_delay_ms {
            self.last_frame_ms = now_ms;
            self.frames += 1;
            true
        } else {
            false
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(REFERENCE_FPS)
    }
}

/// Steps through the family constants, one per `period_ms`, wrapping around. Only an
/// interactive front end has a clock to feed it; still images pin `selected_constant` instead.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyCycle {
    constants: Vec<f64>,
    period_ms: f64,
    started_ms: f64,
}

impl FamilyCycle {
    pub fn new(constants: Vec<f64>, period_ms: f64, started_ms: f64) -> Self {
        Self {
            constants,
            period_ms: period_ms.max(1.0),
            started_ms,
        }
    }

    /// `C` to show at `now_ms`, `None` without constants.
    pub fn current(&self, now_ms: f64) -> Option<f64> {
        if self.constants.is_empty() {
            return None;
        }
        let elapsed = (now_ms - self.started_ms).max(0.0);
        let index = (elapsed / self.period_ms) as usize % self.constants.len();
        Some(self.constants[index])
    }
}

/// Staged display of a bisection trace: one more step becomes visible every `delay_ms`.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverReplay {
    steps: Vec<SolverStep>,
    delay_ms: f64,
}

impl SolverReplay {
    pub fn new(steps: Vec<SolverStep>, delay_ms: f64) -> Self {
        Self {
            steps,
            delay_ms: delay_ms.max(0.0),
        }
    }

    /// Steps revealed `elapsed_ms` after the replay started.
    pub fn visible(&self, elapsed_ms: f64) -> &[SolverStep] {
        let shown = if self.delay_ms == 0.0 {
            self.steps.len()
        } else {
            ((elapsed_ms.max(0.0) / self.delay_ms) as usize + 1).min(self.steps.len())
        };
        &self.steps[..shown]
    }

    pub fn is_finished(&self, elapsed_ms: f64) -> bool {
        self.visible(elapsed_ms).len() == self.steps.len()
    }
}

/// One drawn frame of a replay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayFrame {
    pub elapsed_ms: f64,
    pub frame: u64,
    pub steps_shown: usize,
}

/// Runs `replay` against `clock` on simulated time and keeps the frames that reveal new steps.
/// Ends with the frame that shows the last step.
pub fn replay_schedule(replay: &SolverReplay, clock: &mut FrameClock) -> Vec<ReplayFrame> {
    let mut schedule: Vec<ReplayFrame> = Vec::new();
    if replay.steps.is_empty() {
        return schedule;
    }
    let frame_delay = clock.frame_delay_ms();
    let mut now = 0.0;
    loop {
        now += frame_delay;
        if !clock.tick(now) {
            continue;
        }
        let shown = replay.visible(now).len();
        if schedule.last().is_none_or(|last| last.steps_shown < shown) {
            schedule.push(ReplayFrame {
                elapsed_ms: now,
                frame: clock.frames(),
                steps_shown: shown,
            });
        }
        if replay.is_finished(now) {
            return schedule;
        }
    }
}
