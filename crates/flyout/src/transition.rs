use std::time::Duration;

use glam::Vec2;
use serde::Deserialize;

/// Easing function type: takes progress (0.0 to 1.0) and returns eased value (0.0 to 1.0)
pub type EasingFn = fn(f32) -> f32;

/// Linear interpolation (no easing)
pub fn linear(t: f32) -> f32 {
    t
}

/// Ease out (quadratic) - fast start, decelerating
pub fn ease_out(t: f32) -> f32 {
    t * (2.0 - t)
}

/// Ease in-out (quadratic) - slow start and end, fast middle
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// Ease out (cubic) - stronger fast start effect
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t - 1.0;
    t * t * t + 1.0
}

/// Damped spring that overshoots slightly before settling
///
/// Default easing for surface entrance and exit.
pub fn spring_bounce(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    1.0 - (-6.0 * t).exp() * (12.0 * t).cos()
}

/// Linearly interpolate between two f32 values
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Named easing curve, as written in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    EaseOut,
    EaseInOut,
    EaseOutCubic,
    #[default]
    Spring,
}

impl Easing {
    pub fn curve(self) -> EasingFn {
        match self {
            Easing::Linear => linear,
            Easing::EaseOut => ease_out,
            Easing::EaseInOut => ease_in_out,
            Easing::EaseOutCubic => ease_out_cubic,
            Easing::Spring => spring_bounce,
        }
    }
}

/// Transition configuration
///
/// Defines how long a transition takes and what easing function to use.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub duration: Duration,
    pub easing: EasingFn,
}

impl Transition {
    /// Create a new transition with custom duration and easing
    pub fn new(duration: Duration, easing: EasingFn) -> Self {
        Self { duration, easing }
    }

    /// Instant transition (no animation, duration = 0)
    pub fn instant() -> Self {
        Self {
            duration: Duration::ZERO,
            easing: linear,
        }
    }

    /// Surface slide (300ms, spring bounce)
    pub fn surface() -> Self {
        Self::spring(Duration::from_millis(300))
    }

    /// Spring-bounce transition of the given length
    pub fn spring(duration: Duration) -> Self {
        Self {
            duration,
            easing: spring_bounce,
        }
    }

    /// Progress (0.0 to 1.0, eased) after `elapsed`
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        (self.easing)(t)
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::surface()
    }
}

/// A running translation between two offsets
///
/// Stands in for the browser's `element.animate(...)`: the owner advances it
/// each frame and treats `advance` returning `true` as the completion signal.
#[derive(Debug, Clone)]
pub struct SlideAnimation {
    from: Vec2,
    to: Vec2,
    elapsed: Duration,
    transition: Transition,
}

impl SlideAnimation {
    pub fn new(from: Vec2, to: Vec2, transition: Transition) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            transition,
        }
    }

    /// Advance by `dt`; returns `true` once the animation has finished
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed = (self.elapsed + dt).min(self.transition.duration);
        self.is_finished()
    }

    /// Jump to the end
    pub fn finish(&mut self) {
        self.elapsed = self.transition.duration;
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.transition.duration
    }

    /// Current translation
    pub fn value(&self) -> Vec2 {
        if self.is_finished() {
            return self.to;
        }
        let t = self.transition.progress(self.elapsed);
        Vec2::new(
            lerp_f32(self.from.x, self.to.x, t),
            lerp_f32(self.from.y, self.to.y, t),
        )
    }

    pub fn from(&self) -> Vec2 {
        self.from
    }

    pub fn to(&self) -> Vec2 {
        self.to
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }
}
