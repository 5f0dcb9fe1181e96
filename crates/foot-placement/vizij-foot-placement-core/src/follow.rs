//! Smoothing helpers and the shared "smoothed follow" operation.
//!
//! Every follower is a frame-rate dependent first-order lerp with factor
//! `dt / tau`, clamped to [0, 1]. A time constant of zero or less snaps.

use glam::{Quat, Vec3};

/// Interpolation factor for one frame of a first-order follower.
#[inline]
pub fn rate(dt: f32, tau: f32) -> f32 {
    if tau <= 0.0 {
        1.0
    } else {
        (dt / tau).clamp(0.0, 1.0)
    }
}

/// Values a follower can move along.
pub trait Blend: Copy {
    fn blend(self, to: Self, t: f32) -> Self;
}

impl Blend for f32 {
    #[inline]
    fn blend(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Blend for Vec3 {
    #[inline]
    fn blend(self, to: Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

impl Blend for Quat {
    #[inline]
    fn blend(self, to: Self, t: f32) -> Self {
        self.slerp(to, t)
    }
}

/// Move `current` toward `target` with time constant `tau`.
#[inline]
pub fn smooth<T: Blend>(current: T, target: T, dt: f32, tau: f32) -> T {
    current.blend(target, rate(dt, tau))
}

/// How a smoothed channel tracks its animated source this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Follow {
    Snap,
    Toward(f32),
    Hold,
}

impl Follow {
    #[inline]
    pub fn apply<T: Blend>(self, current: T, source: T) -> T {
        match self {
            Follow::Snap => source,
            Follow::Toward(t) => current.blend(source, t),
            Follow::Hold => current,
        }
    }
}

/// Situation a leg channel is in, decided once per leg per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// First active frame: adopt the animated pose.
    Startup,
    /// Moving or airborne: blend toward the animation within the lerp-speed window.
    Blending,
    /// Stationary and this leg is being replanted by a sweep.
    Sweeping,
    /// Stationary, feet planted.
    Idle,
}

/// Rates shared by every follower of one frame.
#[derive(Clone, Copy, Debug)]
pub struct FollowRates {
    pub dt: f32,
    pub walk_smoothing: f32,
    pub rotate_smoothing: f32,
    pub lerp_speed: f32,
}

impl FollowRates {
    fn blending(&self) -> Follow {
        if self.lerp_speed == 0.0 {
            Follow::Snap
        } else {
            Follow::Toward(rate(self.dt, self.walk_smoothing * self.lerp_speed))
        }
    }

    fn sweeping(&self) -> Follow {
        Follow::Toward(rate(self.dt, self.rotate_smoothing))
    }
}

/// The one source-selection rule used for target position, target rotation
/// and hint position. `sweep_gate` decides whether a sweeping channel moves
/// this frame; otherwise it holds like an idle one.
pub fn follow<T: Blend>(current: T, source: T, phase: Phase, sweep_gate: bool, rates: &FollowRates) -> T {
    let mode = match phase {
        Phase::Startup => Follow::Snap,
        Phase::Blending => rates.blending(),
        Phase::Sweeping if sweep_gate => rates.sweeping(),
        Phase::Sweeping | Phase::Idle => Follow::Hold,
    };
    mode.apply(current, source)
}
