use log::debug;
use serde::{Deserialize, Serialize};

use crate::util::clamp;
use crate::DEFAULT_ANIMATION_DURATION_MS;

/// Monotonic time source in milliseconds.
pub trait Clock {
    fn now(&self) -> f64;
}

impl<F: Fn() -> f64> Clock for F {
    fn now(&self) -> f64 {
        self()
    }
}

pub type TimingFn = fn(f64) -> f64;

/// Easing applied to the normalized window fraction.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Timing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    #[serde(skip)]
    Custom(TimingFn),
}

impl Timing {
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Timing::Linear => t,
            Timing::EaseIn => t * t,
            Timing::EaseOut => t * (2.0 - t),
            Timing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Timing::Custom(f) => f(t),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimateOptions {
    /// Window length in milliseconds
    pub duration: f64,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub timing: Timing,
}

impl Default for AnimateOptions {
    fn default() -> Self {
        AnimateOptions {
            duration: DEFAULT_ANIMATION_DURATION_MS,
            looping: false,
            timing: Timing::Linear,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum AnimateState {
    Idle,
    Scheduled { window_start: f64, options: AnimateOptions },
    Cancelled,
}

/// Frame scheduler driven by the host's refresh signal.
///
/// The host calls [`Animate::frame`] once per display refresh. While a chain
/// is scheduled every call yields the eased progress of the current window.
/// A looping chain restarts the window when it completes, so progress cycles
/// through `[0, 1]` instead of growing with wall time.
pub struct Animate<C: Clock> {
    clock: C,
    options: AnimateOptions,
    state: AnimateState,
}

impl<C: Clock> Animate<C> {
    pub fn new(clock: C, options: AnimateOptions) -> Self {
        Animate {
            clock,
            options,
            state: AnimateState::Idle,
        }
    }

    pub fn options(&self) -> &AnimateOptions {
        &self.options
    }

    /// Open a window at the clock's current reading. `options` replace the
    /// instance options for this chain only. Restarting a scheduled chain
    /// replaces it.
    pub fn start(&mut self, options: Option<AnimateOptions>) {
        let options = options.unwrap_or(self.options);
        let window_start = self.clock.now();
        debug!(
            "Animation scheduled at {:.1}ms (duration {}ms, loop {})",
            window_start, options.duration, options.looping
        );
        self.state = AnimateState::Scheduled { window_start, options };
    }

    /// Process one display refresh at `time`. Returns the progress to draw
    /// with, or `None` when nothing is scheduled.
    pub fn frame(&mut self, time: f64) -> Option<f64> {
        let AnimateState::Scheduled { window_start, options } = self.state else {
            return None;
        };

        let time_fraction = if options.duration > 0.0 {
            clamp(0.0, (time - window_start) / options.duration, 1.0)
        } else {
            1.0
        };
        let progress = options.timing.apply(time_fraction);

        if time_fraction >= 1.0 {
            if options.looping {
                self.state = AnimateState::Scheduled {
                    window_start: self.clock.now(),
                    options,
                };
            } else {
                self.state = AnimateState::Idle;
            }
        }

        Some(progress)
    }

    /// Cancel the pending chain. Calling it again does nothing.
    pub fn stop(&mut self) {
        if let AnimateState::Scheduled { .. } = self.state {
            debug!("Animation cancelled");
            self.state = AnimateState::Cancelled;
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self.state, AnimateState::Scheduled { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.state, AnimateState::Cancelled)
    }
}
