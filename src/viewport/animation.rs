//! Animated transitions of the visible extent.
//!
//! An animation is a precomputed, non-empty plan of frames that linearly
//! interpolate both endpoints of the visible extent from where it is to where
//! it should be. The host drives the plan by calling
//! [`Viewport::tick()`](crate::viewport::Viewport::tick) at
//! [`Config::frame_interval`]; the plan is dropped as soon as it finishes or
//! is cancelled.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use nonempty::NonEmpty;

use crate::core::Extent;

/// The default distance (in genomic units) below which a transition is not
/// animated.
pub const DEFAULT_NEGLIGIBLE_DISTANCE: f64 = 5.0;

/// The default ratio of distance to visible width below which a transition
/// jumps straight to its target.
pub const DEFAULT_JUMP_RATIO: f64 = 0.5;

/// The default fraction of the distance covered by each frame.
pub const DEFAULT_STEP_FRACTION: f64 = 0.05;

/// The default minimum distance (in genomic units) covered by each frame.
pub const DEFAULT_MINIMUM_STEP: f64 = 5.0;

/// The default interval between two frames.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(5);

/// The largest number of frames of a single animation.
pub const MAX_FRAMES: usize = 1000;

/// Tunables for planning animations.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// The distance below which a transition is applied in a single step.
    pub negligible_distance: f64,

    /// The ratio of distance to visible width below which a transition is
    /// applied in a single step.
    pub jump_ratio: f64,

    /// The fraction of the distance covered by each frame.
    pub step_fraction: f64,

    /// The minimum distance covered by each frame.
    pub minimum_step: f64,

    /// The interval at which the host should tick the animation.
    pub frame_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            negligible_distance: DEFAULT_NEGLIGIBLE_DISTANCE,
            jump_ratio: DEFAULT_JUMP_RATIO,
            step_fraction: DEFAULT_STEP_FRACTION,
            minimum_step: DEFAULT_MINIMUM_STEP,
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }
}

impl Config {
    /// Computes the number of frames needed to move from `from` to `to`.
    ///
    /// [`None`] is returned when the transition is negligible and should be
    /// applied in a single step. When a `duration` is provided, it determines
    /// the number of frames; otherwise, each frame covers
    /// `max(minimum_step, step_fraction * distance)`. Either way, no frame
    /// covers less than `minimum_step` and no animation has more than
    /// [`MAX_FRAMES`] frames.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::core::Extent;
    /// use icarus::viewport::animation::Config;
    ///
    /// let config = Config::default();
    /// let from = Extent::new(0.0, 100.0);
    ///
    /// assert_eq!(config.frame_count(from, Extent::new(2.0, 102.0), None), None);
    /// assert_eq!(config.frame_count(from, Extent::new(40.0, 140.0), None), None);
    /// assert_eq!(config.frame_count(from, Extent::new(1000.0, 1100.0), None), Some(20));
    /// assert_eq!(config.frame_count(from, Extent::new(60.0, 160.0), None), Some(12));
    /// ```
    pub fn frame_count(
        &self,
        from: Extent,
        to: Extent,
        duration: Option<Duration>,
    ) -> Option<usize> {
        let distance = (to.start() - from.start())
            .abs()
            .max((to.end() - from.end()).abs());

        if distance < self.negligible_distance {
            return None;
        }

        if from.width() > 0.0 && distance / from.width() < self.jump_ratio {
            return None;
        }

        let frames = match duration {
            Some(duration) if !self.frame_interval.is_zero() => {
                (duration.as_secs_f64() / self.frame_interval.as_secs_f64()).round()
            }
            _ => {
                let step = self.minimum_step.max(self.step_fraction * distance);
                (distance / step).floor()
            }
        };

        let cap = if self.minimum_step > 0.0 {
            (distance / self.minimum_step).ceil().min(MAX_FRAMES as f64)
        } else {
            MAX_FRAMES as f64
        };

        Some(frames.min(cap).max(1.0) as usize)
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Handles
////////////////////////////////////////////////////////////////////////////////////////

/// A handle to an in-flight animation.
///
/// Cancelling through the handle stops the animation at its next tick,
/// leaving the visible extent at the last frame that was applied.
#[derive(Clone, Debug)]
pub struct Handle(Rc<Cell<bool>>);

impl Handle {
    /// Cancels the animation.
    pub fn cancel(&self) {
        self.0.set(true);
    }

    /// Returns whether the animation was cancelled (either through this
    /// handle or by a newer navigation request).
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// The outcome of a single tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tick {
    /// No animation is running.
    Idle,

    /// A frame was applied and more frames remain.
    Advanced(Extent),

    /// The final frame was applied and the animation is over.
    Finished(Extent),

    /// The animation was cancelled and nothing was applied.
    Cancelled,
}

impl Tick {
    /// Returns whether the tick changed the visible extent.
    pub fn changed(&self) -> bool {
        matches!(self, Tick::Advanced(_) | Tick::Finished(_))
    }

    /// Returns whether the host should keep ticking.
    pub fn is_running(&self) -> bool {
        matches!(self, Tick::Advanced(_))
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Animations
////////////////////////////////////////////////////////////////////////////////////////

/// A planned animation.
#[derive(Debug)]
pub(crate) struct Animation {
    /// The frames to apply, in order.
    frames: NonEmpty<Extent>,

    /// The index of the next frame to apply.
    next: usize,

    /// The cancellation flag shared with every [`Handle`].
    cancelled: Rc<Cell<bool>>,
}

impl Animation {
    /// Plans an animation of `count` frames from `from` to `to`.
    ///
    /// The final frame is always exactly `to`.
    pub(crate) fn new(from: Extent, to: Extent, count: usize) -> (Self, Handle) {
        let count = count.max(1);

        let mut frames = NonEmpty::new(from.lerp(&to, 1.0 / count as f64));
        for i in 2..count {
            frames.push(from.lerp(&to, i as f64 / count as f64));
        }

        if count > 1 {
            frames.push(to);
        } else {
            frames.head = to;
        }

        let cancelled = Rc::new(Cell::new(false));
        let handle = Handle(cancelled.clone());

        (
            Self {
                frames,
                next: 0,
                cancelled,
            },
            handle,
        )
    }

    /// Returns whether the animation was cancelled.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Marks the animation as cancelled.
    pub(crate) fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Advances the animation, returning the next frame and whether it is the
    /// final frame.
    pub(crate) fn advance(&mut self) -> Option<(Extent, bool)> {
        let frame = *self.frames.get(self.next)?;
        self.next += 1;
        Some((frame, self.next == self.frames.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_plans_frames_that_end_on_the_target() {
        let from = Extent::new(0.0, 100.0);
        let to = Extent::new(1000.0, 1200.0);
        let (mut animation, _) = Animation::new(from, to, 4);

        let mut frames = Vec::new();
        while let Some((frame, last)) = animation.advance() {
            frames.push(frame);
            if last {
                break;
            }
        }

        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0], Extent::new(250.0, 375.0));
        assert_eq!(frames[1], Extent::new(500.0, 650.0));
        assert_eq!(frames[3], to);
        assert!(animation.advance().is_none());
    }

    #[test]
    fn it_plans_a_single_frame() {
        let to = Extent::new(10.0, 20.0);
        let (mut animation, _) = Animation::new(Extent::new(0.0, 10.0), to, 1);

        assert_eq!(animation.advance(), Some((to, true)));
        assert_eq!(animation.advance(), None);
    }

    #[test]
    fn it_shares_cancellation_with_the_handle() {
        let (animation, handle) = Animation::new(Extent::new(0.0, 10.0), Extent::new(0.0, 20.0), 3);
        assert!(!handle.is_cancelled());

        handle.cancel();
        assert!(animation.is_cancelled());

        let (animation, handle) = Animation::new(Extent::new(0.0, 10.0), Extent::new(0.0, 20.0), 3);
        animation.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn it_derives_frames_from_a_duration() {
        let config = Config::default();
        let from = Extent::new(0.0, 100.0);
        let to = Extent::new(5000.0, 5100.0);

        assert_eq!(
            config.frame_count(from, to, Some(Duration::from_millis(50))),
            Some(10)
        );
        assert_eq!(
            config.frame_count(from, to, Some(Duration::from_millis(0))),
            Some(1)
        );
    }

    #[test]
    fn it_caps_the_number_of_frames() {
        let config = Config::default();
        let from = Extent::new(0.0, 100.0);

        assert_eq!(
            config.frame_count(from, Extent::new(500.0, 600.0), Some(Duration::MAX)),
            Some(100)
        );
        assert_eq!(
            config.frame_count(from, Extent::new(1e9, 1e9 + 100.0), Some(Duration::MAX)),
            Some(MAX_FRAMES)
        );

        let config = Config {
            step_fraction: 0.0,
            minimum_step: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.frame_count(from, Extent::new(500.0, 600.0), None),
            Some(MAX_FRAMES)
        );
    }
}
