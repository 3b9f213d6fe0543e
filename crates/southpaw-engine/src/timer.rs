//! Wall-clock to simulation-time conversion.
//!
//! The [`Timer`] samples the wall clock once per host frame, clamps the raw
//! delta (so a debugger pause or window drag does not produce a giant step),
//! applies the time scale, and accumulates both scaled and unscaled elapsed
//! time. Internal state is integer milliseconds; accessors convert to float
//! seconds.
//!
//! [`Timer::update_by`] is the step-by-step variant: it takes an externally
//! supplied delta instead of sampling the clock, with the same clamping and
//! scaling. Tests and the debug stepper drive time through it.

use std::time::Instant;

/// Default clamp for one frame's raw delta, in milliseconds.
pub const DEFAULT_MAX_DELTA_MS: u64 = 250;

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

/// Frame timer with clamped delta and time-scale support. Pure arithmetic,
/// no failure modes.
#[derive(Debug)]
pub struct Timer {
    last_sample: Instant,
    max_delta_ms: u64,
    scale: f32,
    delta_ms: u64,
    unscaled_delta_ms: u64,
    elapsed_ms: u64,
    unscaled_elapsed_ms: u64,
}

impl Timer {
    /// Create a started timer with the given delta clamp.
    pub fn new(max_delta_ms: u64) -> Self {
        Self {
            last_sample: Instant::now(),
            max_delta_ms,
            scale: 1.0,
            delta_ms: 0,
            unscaled_delta_ms: 0,
            elapsed_ms: 0,
            unscaled_elapsed_ms: 0,
        }
    }

    /// Reset all clocks and re-sample the wall clock.
    pub fn start(&mut self) {
        self.last_sample = Instant::now();
        self.delta_ms = 0;
        self.unscaled_delta_ms = 0;
        self.elapsed_ms = 0;
        self.unscaled_elapsed_ms = 0;
    }

    /// Sample the wall clock and advance by the elapsed time since the last
    /// sample, clamped and scaled.
    pub fn update(&mut self) {
        let now = Instant::now();
        let raw_ms = now.duration_since(self.last_sample).as_millis() as u64;
        self.last_sample = now;
        self.advance(raw_ms);
    }

    /// Advance by an externally supplied delta instead of sampling the clock.
    /// Same clamping and scaling as [`update`](Self::update). The wall-clock
    /// sample point is refreshed so a later `update()` does not double-count
    /// the injected span.
    pub fn update_by(&mut self, delta_ms: u64) {
        self.last_sample = Instant::now();
        self.advance(delta_ms);
    }

    fn advance(&mut self, raw_ms: u64) {
        let clamped = raw_ms.min(self.max_delta_ms);
        let scaled = (clamped as f64 * self.scale as f64).round() as u64;
        self.unscaled_delta_ms = clamped;
        self.delta_ms = scaled;
        self.unscaled_elapsed_ms += clamped;
        self.elapsed_ms += scaled;
    }

    // -- accessors ----------------------------------------------------------

    /// Scaled delta of the last update, in milliseconds.
    pub fn delta_ms(&self) -> u64 {
        self.delta_ms
    }

    /// Unscaled (but clamped) delta of the last update, in milliseconds.
    pub fn unscaled_delta_ms(&self) -> u64 {
        self.unscaled_delta_ms
    }

    /// Scaled delta of the last update, in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta_ms as f32 / 1000.0
    }

    /// Total scaled elapsed time since [`start`](Self::start), in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed_ms as f32 / 1000.0
    }

    /// Total unscaled elapsed time since [`start`](Self::start), in seconds.
    pub fn unscaled_elapsed_seconds(&self) -> f32 {
        self.unscaled_elapsed_ms as f32 / 1000.0
    }

    /// The current time scale.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Set the time scale (1.0 = realtime, 0.5 = slow motion, 0.0 = frozen).
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(0.0);
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DELTA_MS)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
