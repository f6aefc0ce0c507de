//! The shared, synchronized viewport.
//!
//! A [`Viewport`] owns the single authoritative visible extent. Every track
//! either displays exactly that extent or highlights it as a brush over the
//! whole domain (the overview track). All of the operations
//! below clamp their input instead of failing: a navigation request can never
//! push the visible extent outside of the domain or below
//! [`Config::minimum_extent`].
//!
//! The viewport is a small state machine:
//!
//! ```text
//!            animate_to()
//!   Idle ─────────────────────▶ Animating
//!    ▲                              │
//!    │ final frame / cancellation   │
//!    │ / any other navigation       │
//!    └──────────────────────────────┘
//! ```

use std::time::Duration;

use tracing::trace;

use crate::core::Extent;
use crate::core::Position;

pub mod animation;

pub use animation::Handle;
pub use animation::Tick;

use animation::Animation;

/// The default minimum width of the visible extent.
pub const DEFAULT_MINIMUM_EXTENT: f64 = 10.0;

/// The default minimum distance covered by a single zoom or pan step.
pub const DEFAULT_MINIMUM_STEP: f64 = 1.0;

////////////////////////////////////////////////////////////////////////////////////////
// Configuration
////////////////////////////////////////////////////////////////////////////////////////

/// Tunables for a [`Viewport`].
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// The minimum width of the visible extent.
    pub minimum_extent: f64,

    /// The minimum distance covered by a single zoom or pan step.
    pub minimum_step: f64,

    /// Tunables for animated transitions.
    pub animation: animation::Config,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            minimum_extent: DEFAULT_MINIMUM_EXTENT,
            minimum_step: DEFAULT_MINIMUM_STEP,
            animation: animation::Config::default(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// State
////////////////////////////////////////////////////////////////////////////////////////

/// A snapshot of the viewport handed to every observer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct State {
    /// The full extent that can be navigated.
    domain: Extent,

    /// The visible extent.
    current: Extent,
}

impl State {
    /// Gets the full extent that can be navigated.
    pub fn domain(&self) -> Extent {
        self.domain
    }

    /// Gets the visible extent.
    pub fn current(&self) -> Extent {
        self.current
    }
}

/// Something that follows every applied change of the viewport.
pub trait Observer {
    /// Called after a change of the viewport has been applied.
    fn viewport_changed(&mut self, state: &State);
}

/// A zoom direction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Zoom {
    /// Narrow the visible extent.
    In,

    /// Widen the visible extent.
    Out,
}

/// A pan direction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pan {
    /// Move towards the start of the domain.
    Left,

    /// Move towards the end of the domain.
    Right,
}

/// The outcome of an [`Viewport::animate_to()`] request.
#[derive(Debug)]
pub enum Navigation {
    /// The visible extent already matched the (clamped) target.
    Unchanged,

    /// The transition was negligible and was applied in a single step.
    Jumped,

    /// An animation was started.
    Animating(Handle),
}

impl Navigation {
    /// Returns whether the visible extent was changed immediately.
    pub fn changed(&self) -> bool {
        matches!(self, Navigation::Jumped)
    }

    /// Consumes `self` and returns the animation handle (if an animation was
    /// started).
    pub fn into_handle(self) -> Option<Handle> {
        match self {
            Navigation::Animating(handle) => Some(handle),
            _ => None,
        }
    }
}

/// The phase of the viewport state machine.
#[derive(Debug)]
enum Phase {
    /// No animation is running.
    Idle,

    /// An animation is running.
    Animating(Animation),
}

////////////////////////////////////////////////////////////////////////////////////////
// Viewport
////////////////////////////////////////////////////////////////////////////////////////

/// The shared viewport.
#[derive(Debug)]
pub struct Viewport {
    /// The domain and the visible extent.
    state: State,

    /// The tunables.
    config: Config,

    /// The phase of the state machine.
    phase: Phase,
}

impl Viewport {
    /// Creates a new viewport showing the whole `domain`.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::core::Extent;
    /// use icarus::viewport::Config;
    /// use icarus::viewport::Viewport;
    ///
    /// let viewport = Viewport::new(Extent::new(0.0, 1000.0), Config::default());
    /// assert_eq!(viewport.current(), Extent::new(0.0, 1000.0));
    /// assert!(!viewport.is_animating());
    /// ```
    pub fn new(domain: Extent, config: Config) -> Self {
        Self {
            state: State {
                domain,
                current: domain,
            },
            config,
            phase: Phase::Idle,
        }
    }

    /// Gets the current state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Gets the domain.
    pub fn domain(&self) -> Extent {
        self.state.domain
    }

    /// Gets the visible extent.
    pub fn current(&self) -> Extent {
        self.state.current
    }

    /// Gets the tunables.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gets the interval at which the host should call [`Viewport::tick()`]
    /// while an animation is running.
    pub fn frame_interval(&self) -> Duration {
        self.config.animation.frame_interval
    }

    /// Returns whether an animation is in flight.
    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Animating(_))
    }

    /// Zooms in or out by `step` times the visible width, split evenly on both
    /// sides.
    ///
    /// Zooming in is refused when it would narrow the visible extent below the
    /// minimum extent. Returns whether the visible extent changed.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::core::Extent;
    /// use icarus::viewport::Config;
    /// use icarus::viewport::Viewport;
    /// use icarus::viewport::Zoom;
    ///
    /// let mut viewport = Viewport::new(Extent::new(0.0, 1000.0), Config::default());
    /// viewport.set_extent(Extent::new(400.0, 600.0));
    ///
    /// assert!(viewport.zoom(Zoom::In, 0.5));
    /// assert_eq!(viewport.current(), Extent::new(450.0, 550.0));
    ///
    /// assert!(viewport.zoom(Zoom::Out, 1.0));
    /// assert_eq!(viewport.current(), Extent::new(400.0, 600.0));
    /// ```
    pub fn zoom(&mut self, direction: Zoom, step: f64) -> bool {
        self.interrupt();

        if !step.is_finite() || step <= 0.0 {
            return false;
        }

        let current = self.state.current;
        let delta = (step * current.width()).max(self.config.minimum_step) / 2.0;

        let next = match direction {
            Zoom::In => {
                let next = current.inflate(-delta);
                if next.width() < self.config.minimum_extent {
                    return false;
                }
                next
            }
            Zoom::Out => current.inflate(delta),
        };

        self.apply(next)
    }

    /// Pans left or right by `step` times the visible width.
    ///
    /// The width is preserved and the visible extent stops at the edges of the
    /// domain. Returns whether the visible extent changed.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::core::Extent;
    /// use icarus::viewport::Config;
    /// use icarus::viewport::Pan;
    /// use icarus::viewport::Viewport;
    ///
    /// let mut viewport = Viewport::new(Extent::new(0.0, 1000.0), Config::default());
    /// viewport.set_extent(Extent::new(0.0, 100.0));
    ///
    /// assert!(!viewport.pan(Pan::Left, 0.5));
    /// assert!(viewport.pan(Pan::Right, 0.5));
    /// assert_eq!(viewport.current(), Extent::new(50.0, 150.0));
    /// ```
    pub fn pan(&mut self, direction: Pan, step: f64) -> bool {
        self.interrupt();

        if !step.is_finite() || step <= 0.0 {
            return false;
        }

        let current = self.state.current;
        let delta = (step * current.width()).max(self.config.minimum_step);

        let next = match direction {
            Pan::Left => current.shift(-delta),
            Pan::Right => current.shift(delta),
        };

        self.apply(next)
    }

    /// Sets the visible extent, clamping it to the nearest valid window.
    ///
    /// Returns whether the visible extent changed.
    pub fn set_extent(&mut self, extent: Extent) -> bool {
        self.interrupt();

        if !extent.is_finite() {
            return false;
        }

        self.apply(extent)
    }

    /// Centers the visible extent on `position`, keeping its width.
    pub fn center_on(&mut self, position: Position) -> bool {
        self.interrupt();

        if !position.is_finite() {
            return false;
        }

        let half = self.state.current.width() / 2.0;
        self.apply(Extent::new(position - half, position + half))
    }

    /// Starts an animated transition towards `target`.
    ///
    /// The target is clamped like in [`Viewport::set_extent()`]. Negligible
    /// transitions are applied in a single step. Any animation already in
    /// flight is cancelled first.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::core::Extent;
    /// use icarus::viewport::Config;
    /// use icarus::viewport::Navigation;
    /// use icarus::viewport::Tick;
    /// use icarus::viewport::Viewport;
    ///
    /// let mut viewport = Viewport::new(Extent::new(0.0, 10_000.0), Config::default());
    /// viewport.set_extent(Extent::new(0.0, 100.0));
    ///
    /// let navigation = viewport.animate_to(Extent::new(5000.0, 5100.0), None);
    /// assert!(matches!(navigation, Navigation::Animating(_)));
    ///
    /// while viewport.tick().is_running() {}
    /// assert_eq!(viewport.current(), Extent::new(5000.0, 5100.0));
    /// assert_eq!(viewport.tick(), Tick::Idle);
    /// ```
    pub fn animate_to(&mut self, target: Extent, duration: Option<Duration>) -> Navigation {
        self.interrupt();

        if !target.is_finite() {
            return Navigation::Unchanged;
        }

        let target = target.clamp_within(self.state.domain, self.config.minimum_extent);
        let current = self.state.current;

        if target == current {
            return Navigation::Unchanged;
        }

        match self.config.animation.frame_count(current, target, duration) {
            Some(count) => {
                let (animation, handle) = Animation::new(current, target, count);
                trace!("animating from {current} to {target} in {count} frame(s)");
                self.phase = Phase::Animating(animation);
                Navigation::Animating(handle)
            }
            None => match self.apply(target) {
                true => Navigation::Jumped,
                false => Navigation::Unchanged,
            },
        }
    }

    /// Advances the in-flight animation by one frame.
    pub fn tick(&mut self) -> Tick {
        let frame = match &mut self.phase {
            Phase::Idle => return Tick::Idle,
            Phase::Animating(animation) if animation.is_cancelled() => None,
            Phase::Animating(animation) => animation.advance(),
        };

        match frame {
            Some((extent, last)) => {
                self.state.current = extent;

                if last {
                    self.phase = Phase::Idle;
                    Tick::Finished(extent)
                } else {
                    Tick::Advanced(extent)
                }
            }
            None => {
                trace!("animation cancelled at {}", self.state.current);
                self.phase = Phase::Idle;
                Tick::Cancelled
            }
        }
    }

    /// Cancels the in-flight animation, if any.
    ///
    /// Returns whether an animation was cancelled.
    pub fn cancel_animation(&mut self) -> bool {
        let animating = self.is_animating();
        self.interrupt();
        animating
    }

    /// Drops the in-flight animation and marks its handles as cancelled.
    fn interrupt(&mut self) {
        if let Phase::Animating(animation) = &self.phase {
            animation.cancel();
            self.phase = Phase::Idle;
        }
    }

    /// Clamps and applies a new visible extent.
    fn apply(&mut self, extent: Extent) -> bool {
        let next = extent.clamp_within(self.state.domain, self.config.minimum_extent);

        if next == self.state.current {
            return false;
        }

        trace!("viewport: {} -> {next}", self.state.current);
        self.state.current = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Creates a viewport over `[0, 1000]` showing `current`.
    fn viewport(current: Extent) -> Viewport {
        let mut viewport = Viewport::new(Extent::new(0.0, 1000.0), Config::default());
        viewport.set_extent(current);
        viewport
    }

    #[test]
    fn it_clamps_set_extent_into_the_domain() {
        let mut viewport = viewport(Extent::new(100.0, 200.0));

        assert!(viewport.set_extent(Extent::new(-500.0, 50.0)));
        assert_eq!(viewport.current(), Extent::new(0.0, 550.0));

        assert!(viewport.set_extent(Extent::new(2000.0, 2100.0)));
        assert_eq!(viewport.current(), Extent::new(900.0, 1000.0));

        assert!(viewport.set_extent(Extent::new(600.0, 500.0)));
        assert_eq!(viewport.current(), Extent::new(500.0, 600.0));

        assert!(!viewport.set_extent(Extent::new(500.0, 600.0)));
        assert!(!viewport.set_extent(Extent::new(f64::NAN, 600.0)));
    }

    #[test]
    fn it_enforces_the_minimum_extent() {
        let mut viewport = viewport(Extent::new(100.0, 200.0));

        viewport.set_extent(Extent::new(500.0, 500.0));
        assert_eq!(viewport.current(), Extent::new(495.0, 505.0));

        viewport.set_extent(Extent::new(0.0, 11.0));
        assert!(!viewport.zoom(Zoom::In, 0.5));
        assert_eq!(viewport.current(), Extent::new(0.0, 11.0));
    }

    #[test]
    fn it_refuses_degenerate_steps() {
        let mut viewport = viewport(Extent::new(100.0, 200.0));

        assert!(!viewport.zoom(Zoom::In, 1.0));
        assert!(!viewport.zoom(Zoom::In, -0.5));
        assert!(!viewport.zoom(Zoom::Out, f64::INFINITY));
        assert!(!viewport.pan(Pan::Left, 0.0));
        assert_eq!(viewport.current(), Extent::new(100.0, 200.0));
    }

    #[test]
    fn it_clamps_zooming_out_to_the_domain() {
        let mut viewport = viewport(Extent::new(900.0, 1000.0));

        assert!(viewport.zoom(Zoom::Out, 1.0));
        assert_eq!(viewport.current(), Extent::new(800.0, 1000.0));

        assert!(viewport.zoom(Zoom::Out, 20.0));
        assert_eq!(viewport.current(), Extent::new(0.0, 1000.0));
        assert!(!viewport.zoom(Zoom::Out, 1.0));
    }

    #[test]
    fn it_pans_until_the_edge() {
        let mut viewport = viewport(Extent::new(800.0, 900.0));

        assert!(viewport.pan(Pan::Right, 0.5));
        assert_eq!(viewport.current(), Extent::new(850.0, 950.0));

        assert!(viewport.pan(Pan::Right, 0.75));
        assert_eq!(viewport.current(), Extent::new(900.0, 1000.0));

        assert!(!viewport.pan(Pan::Right, 0.5));
    }

    #[test]
    fn it_centers_on_a_position() {
        let mut viewport = viewport(Extent::new(0.0, 100.0));

        assert!(viewport.center_on(500.0));
        assert_eq!(viewport.current(), Extent::new(450.0, 550.0));

        assert!(viewport.center_on(990.0));
        assert_eq!(viewport.current(), Extent::new(900.0, 1000.0));
    }

    #[test]
    fn it_jumps_for_negligible_transitions() {
        let mut viewport = viewport(Extent::new(100.0, 200.0));

        let navigation = viewport.animate_to(Extent::new(103.0, 203.0), None);
        assert!(matches!(navigation, Navigation::Jumped));
        assert_eq!(viewport.current(), Extent::new(103.0, 203.0));
        assert!(!viewport.is_animating());

        let navigation = viewport.animate_to(Extent::new(103.0, 203.0), None);
        assert!(matches!(navigation, Navigation::Unchanged));
    }

    #[test]
    fn it_animates_within_bounds_and_ends_on_the_target() {
        let mut viewport = viewport(Extent::new(0.0, 50.0));
        let target = Extent::new(800.0, 1100.0);
        let clamped = Extent::new(700.0, 1000.0);

        let handle = viewport.animate_to(target, None).into_handle().unwrap();
        assert!(viewport.is_animating());

        let mut ticks = 0;
        loop {
            let tick = viewport.tick();
            ticks += 1;

            let current = viewport.current();
            assert!(current.start() >= 0.0 && current.end() <= 1000.0);
            assert!(current.width() >= DEFAULT_MINIMUM_EXTENT);

            if !tick.is_running() {
                assert_eq!(tick, Tick::Finished(clamped));
                break;
            }
        }

        assert!(ticks > 1);
        assert_eq!(viewport.current(), clamped);
        assert!(!handle.is_cancelled());
        assert!(!viewport.is_animating());
    }

    #[test]
    fn it_leaves_the_last_applied_frame_when_cancelled() {
        let mut viewport = viewport(Extent::new(0.0, 50.0));
        let handle = viewport
            .animate_to(Extent::new(900.0, 950.0), None)
            .into_handle()
            .unwrap();

        let Tick::Advanced(first) = viewport.tick() else {
            panic!("expected the animation to advance");
        };

        handle.cancel();
        assert_eq!(viewport.tick(), Tick::Cancelled);
        assert_eq!(viewport.current(), first);
        assert_eq!(viewport.tick(), Tick::Idle);
        assert_eq!(viewport.current(), first);
    }

    #[test]
    fn it_cancels_the_animation_on_new_navigation() {
        let mut viewport = viewport(Extent::new(0.0, 50.0));
        let handle = viewport
            .animate_to(Extent::new(900.0, 950.0), None)
            .into_handle()
            .unwrap();

        viewport.tick();
        assert!(viewport.pan(Pan::Left, 0.1));
        assert!(handle.is_cancelled());
        assert!(!viewport.is_animating());

        let current = viewport.current();
        assert_eq!(viewport.tick(), Tick::Idle);
        assert_eq!(viewport.current(), current);

        let first = viewport
            .animate_to(Extent::new(900.0, 950.0), None)
            .into_handle()
            .unwrap();
        let second = viewport
            .animate_to(Extent::new(0.0, 50.0), None)
            .into_handle()
            .unwrap();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(viewport.cancel_animation());
        assert!(second.is_cancelled());
    }
}
