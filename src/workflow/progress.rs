use std::time::Duration;

use rand::Rng;

pub const UPLOAD_STEP: f64 = 5.0;
pub const UPLOAD_CAP: f64 = 20.0;
pub const PROCESSING_CAP: f64 = 85.0;
pub const UPLOAD_TICK: Duration = Duration::from_millis(100);
pub const PROCESSING_TICK: Duration = Duration::from_millis(800);
pub const PROCESSING_STEP_MIN: f64 = 0.5;
pub const PROCESSING_STEP_MAX: f64 = 2.5;

/// Phases of one submission's progress bar, in the only order they occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProgressPhase {
    Idle,
    Uploading,
    Processing,
    Completing,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressState {
    pub percent: f64,
    pub phase: ProgressPhase,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            percent: 0.0,
            phase: ProgressPhase::Idle,
        }
    }
}

impl ProgressState {
    pub fn fraction(&self) -> f64 {
        (self.percent / 100.0).clamp(0.0, 1.0)
    }

    /// Label shown under the bar. Purely cosmetic.
    pub fn status_text(&self) -> &'static str {
        match self.phase {
            ProgressPhase::Idle => "",
            ProgressPhase::Uploading => "Uploading presentation",
            ProgressPhase::Processing => match self.percent {
                p if p < 40.0 => "Analyzing slides",
                p if p < 60.0 => "Translating content",
                p if p < 80.0 => "Preserving formatting",
                _ => "Finalizing translation",
            },
            ProgressPhase::Completing | ProgressPhase::Done => "Translation complete",
        }
    }
}

/// Source of the pseudo-random increments used while processing.
pub trait RandomSource {
    /// A value in `[low, high)`.
    fn sample(&mut self, low: f64, high: f64) -> f64;
}

/// Any `rand` generator works, e.g. `rand::thread_rng()` in production.
impl<R: Rng> RandomSource for R {
    fn sample(&mut self, low: f64, high: f64) -> f64 {
        self.gen_range(low..high)
    }
}

/// Fake progress while the server works. Not tied to real progress: it only
/// advances on ticks and never passes its phase cap.
#[derive(Debug, Clone, Default)]
pub struct SimulatedProgress {
    state: ProgressState,
}

impl SimulatedProgress {
    pub fn state(&self) -> ProgressState {
        self.state
    }

    pub fn is_ticking(&self) -> bool {
        matches!(
            self.state.phase,
            ProgressPhase::Uploading | ProgressPhase::Processing
        )
    }

    /// Enter the upload phase. Returns the delay before the first tick.
    pub fn start(&mut self) -> Duration {
        self.state = ProgressState {
            percent: 0.0,
            phase: ProgressPhase::Uploading,
        };
        UPLOAD_TICK
    }

    /// Advance one tick. Returns the delay until the next tick, or `None`
    /// once the animation is no longer running.
    pub fn tick(&mut self, random: &mut dyn RandomSource) -> Option<Duration> {
        match self.state.phase {
            ProgressPhase::Uploading => {
                self.state.percent = (self.state.percent + UPLOAD_STEP).min(UPLOAD_CAP);
                if self.state.percent >= UPLOAD_CAP {
                    self.state.phase = ProgressPhase::Processing;
                    Some(PROCESSING_TICK)
                } else {
                    Some(UPLOAD_TICK)
                }
            }
            ProgressPhase::Processing => {
                let step = random
                    .sample(PROCESSING_STEP_MIN, PROCESSING_STEP_MAX)
                    .clamp(PROCESSING_STEP_MIN, PROCESSING_STEP_MAX);
                self.state.percent = (self.state.percent + step).min(PROCESSING_CAP);
                Some(PROCESSING_TICK)
            }
            ProgressPhase::Idle | ProgressPhase::Completing | ProgressPhase::Done => None,
        }
    }

    /// Jump to 100% ahead of revealing a successful result.
    pub fn complete(&mut self) {
        if self.state.phase < ProgressPhase::Completing {
            self.state = ProgressState {
                percent: 100.0,
                phase: ProgressPhase::Completing,
            };
        }
    }

    /// Terminal state. Percent is left where it was.
    pub fn finish(&mut self) {
        self.state.phase = ProgressPhase::Done;
    }

    pub fn reset(&mut self) {
        self.state = ProgressState::default();
    }
}
