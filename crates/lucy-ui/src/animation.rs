//! Tweens: values interpolated over time.
//!
//! A [`Tween`] is driven by the host through [`Tween::advance`] with the
//! frame delta and emits its `changed` hook on every step while playing.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use lucy_ui::animation::{Easing, RepeatMode, Tween};
//!
//! let mut fade = Tween::new(0.0, 255.0, 0.0);
//! fade.changed.connect(|event| {
//!     let _alpha = event.value;
//!     Ok(())
//! });
//! fade.play(Duration::from_millis(200), false, Easing::EaseOutCubic, RepeatMode::None);
//! fade.advance(Duration::from_millis(16)).unwrap();
//! ```

use std::f32::consts::PI;
use std::time::Duration;

use crate::error::HookError;
use crate::hook::{Hook, HookEvent, names};

/// Easing functions, mapping normalized time to normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
}

impl Easing {
    /// Apply the easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Easing::Linear => t,
            Easing::EaseInSine => 1.0 - (t * PI * 0.5).cos(),
            Easing::EaseOutSine => (t * PI * 0.5).sin(),
            Easing::EaseInOutSine => -((t * PI).cos() - 1.0) * 0.5,
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) * 0.5
                }
            }
        }
    }
}

/// What a tween does when it reaches the end of its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RepeatMode {
    /// Stop at the end.
    #[default]
    None,
    /// Jump back to the start and keep going.
    Loop,
    /// Turn around and play in the other direction.
    Bounce,
}

/// Interpolates a value between `start` and `end`.
///
/// Hooks: `changed`, carrying the current value.
#[derive(Debug, Clone)]
pub struct Tween {
    pub start: f32,
    pub end: f32,
    value: f32,
    normalized: f32,
    /// Linear progress before easing, in `[0, 1]`.
    alpha: f32,
    duration: Duration,
    easing: Easing,
    repeat: RepeatMode,
    reverse: bool,
    playing: bool,
    pub changed: Hook,
}

impl Tween {
    /// A stopped tween at `value`, clamped into the range.
    pub fn new(start: f32, end: f32, value: f32) -> Self {
        let value = value.clamp(start.min(end), start.max(end));
        let range = end - start;
        let normalized = if range == 0.0 {
            0.0
        } else {
            (value - start) / range
        };

        Self {
            start,
            end,
            value,
            normalized,
            alpha: normalized,
            duration: Duration::ZERO,
            easing: Easing::Linear,
            repeat: RepeatMode::None,
            reverse: false,
            playing: false,
            changed: Hook::new(),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Eased progress in `[0, 1]`.
    pub fn normalized(&self) -> f32 {
        self.normalized
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_reversed(&self) -> bool {
        self.reverse
    }

    /// Start playing from the current position.
    ///
    /// `duration` is the time a full pass over the range takes.
    pub fn play(&mut self, duration: Duration, reverse: bool, easing: Easing, repeat: RepeatMode) {
        self.duration = duration;
        self.reverse = reverse;
        self.easing = easing;
        self.repeat = repeat;
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Step the animation by `dt` and emit `changed`.
    ///
    /// A zero duration jumps straight to the end of the range and stops.
    pub fn advance(&mut self, dt: Duration) -> Result<(), HookError> {
        if !self.playing {
            return Ok(());
        }

        if self.duration.is_zero() {
            self.alpha = if self.reverse { 0.0 } else { 1.0 };
            self.playing = false;
        } else {
            let step = dt.as_secs_f32() / self.duration.as_secs_f32();
            self.alpha += if self.reverse { -step } else { step };

            if !(0.0..=1.0).contains(&self.alpha) {
                match self.repeat {
                    RepeatMode::None => {
                        self.alpha = self.alpha.clamp(0.0, 1.0);
                        self.playing = false;
                    }
                    RepeatMode::Loop => self.alpha = self.alpha.rem_euclid(1.0),
                    RepeatMode::Bounce => {
                        let phase = self.alpha.rem_euclid(2.0);
                        if phase > 1.0 {
                            self.alpha = 2.0 - phase;
                            self.reverse = !self.reverse;
                        } else {
                            self.alpha = phase;
                        }
                    }
                }
            }
        }

        self.normalized = self.easing.apply(self.alpha);
        self.value = self.start + self.normalized * (self.end - self.start);

        self.changed
            .emit(&HookEvent::new(names::CHANGED).with_value(self.value))?;
        Ok(())
    }
}
