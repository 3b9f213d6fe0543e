//! Cyclic animation progression with listener callbacks.
//!
//! An [`Animation`] is a generic progress counter, not a sprite sheet: it
//! advances an accumulator through fixed-duration cycles and maps it to a
//! progression value in `[0, 1]` that owners use to pick sprite frames, move
//! UI elements, or drive interpolation curves. The mapping applies, in order:
//! phase offset, wraparound, alternate folding, reversal, and easing.
//!
//! State is derived from flags rather than an explicit enum;
//! [`AnimationState::is_stopped`], [`is_delayed`](AnimationState::is_delayed),
//! and [`is_playing`](AnimationState::is_playing) are the canonical
//! predicates.
//!
//! # Listener contract
//!
//! Listeners fire on animation start (after any delay), at the end of every
//! cycle, and once when a finite cycle count is exhausted. Dispatch iterates
//! a snapshot of the listener list, and the stopped flag is re-checked after
//! every callback: a listener that stops the animation aborts notification of
//! the remaining listeners for that dispatch. This early exit is part of the
//! contract, not an accident; gameplay relies on "stop wins immediately".

use std::collections::BTreeMap;

use tracing::{trace, warn};

/// Tolerance for cycle-boundary and delay-expiry comparisons.
pub const EPSILON: f32 = 1e-4;

/// Cycle count meaning "repeat forever".
pub const CYCLES_INFINITE: i32 = -1;

// ---------------------------------------------------------------------------
// Easing
// ---------------------------------------------------------------------------

/// Maps raw progression in `[0, 1]` to eased progression in `[0, 1]`.
#[derive(Clone, Copy, Default)]
pub enum Easing {
    /// Identity.
    #[default]
    Linear,
    /// Accelerating: `t^2`.
    QuadIn,
    /// Decelerating: `1 - (1-t)^2`.
    QuadOut,
    /// Accelerate then decelerate.
    QuadInOut,
    /// Accelerating: `t^3`.
    CubicIn,
    /// Decelerating: `1 + (t-1)^3`.
    CubicOut,
    /// Hermite smoothstep: `3t^2 - 2t^3`.
    SmoothStep,
    /// Caller-supplied curve. Must map `[0, 1]` into `[0, 1]`.
    Custom(fn(f32) -> f32),
}

impl Easing {
    /// Apply the curve to a raw progression value.
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let u = t - 1.0;
                1.0 + u * u * u
            }
            Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
            Easing::Custom(f) => f(t),
        }
    }
}

impl std::fmt::Debug for Easing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Easing::Linear => "Linear",
            Easing::QuadIn => "QuadIn",
            Easing::QuadOut => "QuadOut",
            Easing::QuadInOut => "QuadInOut",
            Easing::CubicIn => "CubicIn",
            Easing::CubicOut => "CubicOut",
            Easing::SmoothStep => "SmoothStep",
            Easing::Custom(_) => "Custom",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// AnimationState
// ---------------------------------------------------------------------------

/// The flag/counter core of an animation, separated from the listener list
/// so callbacks can mutate playback state while dispatch is in flight.
#[derive(Debug, Clone)]
pub struct AnimationState {
    accu: f32,
    cycle_time: f32,
    cycle_count: i32,
    cycle_index: i32,
    delay: f32,
    delay_accu: f32,
    phase: f32,
    speed: f32,
    easing: Easing,
    paused: bool,
    stopped: bool,
    reversed: bool,
    alternate: bool,
    stop_at_end: bool,
}

impl AnimationState {
    fn new(cycle_time: f32, cycle_count: i32) -> Self {
        Self {
            accu: 0.0,
            cycle_time,
            cycle_count,
            cycle_index: 0,
            delay: 0.0,
            delay_accu: 0.0,
            phase: 0.0,
            speed: 1.0,
            easing: Easing::Linear,
            paused: false,
            stopped: true,
            reversed: false,
            alternate: false,
            stop_at_end: true,
        }
    }

    // -- state predicates ---------------------------------------------------

    /// Fully halted; only [`play`](Self::play) restarts it.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Frozen in place but resumable via [`resume`](Self::resume).
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Playing but still inside the pre-start delay.
    pub fn is_delayed(&self) -> bool {
        !self.stopped && !self.paused && self.delay_accu > EPSILON
    }

    /// Actively advancing.
    pub fn is_playing(&self) -> bool {
        !self.stopped && !self.paused && self.delay_accu <= EPSILON
    }

    // -- playback control ---------------------------------------------------

    /// Restart from the beginning: reset accumulators, re-arm the delay, and
    /// clear the paused and stopped flags.
    pub fn play(&mut self) {
        self.accu = 0.0;
        self.cycle_index = 0;
        self.delay_accu = self.delay;
        self.paused = false;
        self.stopped = false;
    }

    /// Freeze in place, keeping the current progression.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Undo a pause. Has no effect on a stopped animation.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Halt completely. Within a listener dispatch this also aborts
    /// notification of the remaining listeners.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    // -- configuration ------------------------------------------------------

    /// Duration of one cycle, in seconds.
    pub fn cycle_time(&self) -> f32 {
        self.cycle_time
    }

    /// Change the cycle duration.
    pub fn set_cycle_time(&mut self, cycle_time: f32) {
        self.cycle_time = cycle_time;
    }

    /// Configured number of cycles ([`CYCLES_INFINITE`] = forever).
    pub fn cycle_count(&self) -> i32 {
        self.cycle_count
    }

    /// Change the cycle count. A count of zero can never progress, so the
    /// animation pauses immediately.
    pub fn set_cycle_count(&mut self, count: i32) {
        self.cycle_count = count;
        if count == 0 {
            self.paused = true;
        }
    }

    /// Zero-based index of the cycle currently playing.
    pub fn cycle_index(&self) -> i32 {
        self.cycle_index
    }

    /// Set the pre-start delay in seconds. Takes effect on the next
    /// [`play`](Self::play).
    pub fn set_delay(&mut self, delay: f32) {
        self.delay = delay;
    }

    /// Set the phase offset added to raw progression, in `[0, 1)`.
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase;
    }

    /// Set the time multiplier applied to every update delta.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Set the easing curve.
    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    /// Play backwards: progression is mirrored to `1 - t`.
    pub fn set_reversed(&mut self, reversed: bool) {
        self.reversed = reversed;
    }

    /// Ping-pong: progression rises to 1 over the first half-cycle and falls
    /// back over the second.
    pub fn set_alternate(&mut self, alternate: bool) {
        self.alternate = alternate;
    }

    /// Whether exhausting a finite cycle count stops (true, the default) or
    /// merely pauses the animation.
    pub fn set_stop_at_end(&mut self, stop_at_end: bool) {
        self.stop_at_end = stop_at_end;
    }

    // -- progression --------------------------------------------------------

    /// Raw progression `accu / cycle_time`, before phase, alternate,
    /// reverse, and easing transforms.
    pub fn raw_progression(&self) -> f32 {
        if self.cycle_time <= 0.0 {
            return 0.0;
        }
        self.accu / self.cycle_time
    }

    /// Progression in `[0, 1]` after all transforms, in this order: phase
    /// offset, wraparound (only when the sum exceeds 1), alternate fold,
    /// reversal, easing. The result is clamped to `[0, 1]` regardless of
    /// the configured curve.
    pub fn progression(&self) -> f32 {
        let mut t = self.raw_progression() + self.phase;
        if t > 1.0 {
            t -= t.floor();
        }
        if self.alternate {
            t = if t < 0.5 { 2.0 * t } else { 2.0 - 2.0 * t };
        }
        if self.reversed {
            t = 1.0 - t;
        }
        self.easing.apply(t).clamp(0.0, 1.0)
    }

    fn exhausted(&self) -> bool {
        self.cycle_count >= 0 && self.cycle_index >= self.cycle_count
    }
}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

/// Handle for removing a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

/// Callbacks fired by [`Animation::update`]. All hooks receive the playback
/// state mutably, so a listener may pause, stop, or retune the animation
/// from inside the callback.
pub trait AnimationListener {
    /// The pre-start delay just elapsed.
    fn on_animation_start(&mut self, state: &mut AnimationState) {
        let _ = state;
    }

    /// One full cycle just completed.
    fn on_cycle_end(&mut self, state: &mut AnimationState) {
        let _ = state;
    }

    /// A finite cycle count was just exhausted.
    fn on_animation_end(&mut self, state: &mut AnimationState) {
        let _ = state;
    }
}

// ---------------------------------------------------------------------------
// Animation
// ---------------------------------------------------------------------------

/// Playback state plus its listener list.
///
/// Created stopped; call [`play`](AnimationState::play) through
/// [`state_mut`](Self::state_mut) or the forwarding helpers to begin.
pub struct Animation {
    state: AnimationState,
    listeners: Vec<(ListenerId, Box<dyn AnimationListener>)>,
    next_listener_id: u32,
}

impl Animation {
    /// Create a stopped animation with the given cycle duration (seconds)
    /// and cycle count ([`CYCLES_INFINITE`] = forever).
    pub fn new(cycle_time: f32, cycle_count: i32) -> Self {
        Self {
            state: AnimationState::new(cycle_time, cycle_count),
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    /// Read-only playback state.
    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    /// Mutable playback state, for configuration and control.
    pub fn state_mut(&mut self) -> &mut AnimationState {
        &mut self.state
    }

    /// Forward of [`AnimationState::play`].
    pub fn play(&mut self) {
        self.state.play();
    }

    /// Forward of [`AnimationState::stop`].
    pub fn stop(&mut self) {
        self.state.stop();
    }

    /// Forward of [`AnimationState::progression`].
    pub fn progression(&self) -> f32 {
        self.state.progression()
    }

    /// Register a listener; the returned id removes it later.
    pub fn add_listener(&mut self, listener: Box<dyn AnimationListener>) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|(lid, _)| *lid != id);
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Advance playback by `dt` seconds. No-op while paused or stopped.
    pub fn update(&mut self, dt: f32) {
        if self.state.paused || self.state.stopped {
            return;
        }

        // Pre-start delay. The start hooks fire on the tick the delay
        // crosses zero; accumulation begins on the next update.
        if self.state.delay_accu > EPSILON {
            self.state.delay_accu -= dt;
            if self.state.delay_accu <= EPSILON {
                self.state.delay_accu = 0.0;
                trace!("animation delay elapsed");
                self.dispatch(Hook::Start);
            }
            return;
        }

        self.state.accu += self.state.speed * dt;

        while self.state.accu >= self.state.cycle_time - EPSILON {
            // An epsilon-early crossing would leave a negative remainder.
            self.state.accu = (self.state.accu - self.state.cycle_time).max(0.0);
            self.state.cycle_index += 1;
            self.dispatch(Hook::CycleEnd);
            if self.state.stopped {
                return;
            }
            if self.state.exhausted() {
                // Hold the progression at the end of the final cycle.
                self.state.accu = self.state.cycle_time;
                self.state.paused = true;
                if self.state.stop_at_end {
                    self.state.stopped = true;
                }
                self.dispatch(Hook::End);
                return;
            }
        }
    }

    /// Snapshot-iterate the listener list, aborting as soon as a callback
    /// leaves the animation stopped.
    fn dispatch(&mut self, hook: Hook) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, listener) in listeners.iter_mut() {
            match hook {
                Hook::Start => listener.on_animation_start(&mut self.state),
                Hook::CycleEnd => listener.on_cycle_end(&mut self.state),
                Hook::End => listener.on_animation_end(&mut self.state),
            }
            if self.state.stopped && hook != Hook::End {
                break;
            }
        }
        // Listeners registered during dispatch land after the snapshot.
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
    }
}

impl std::fmt::Debug for Animation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animation")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hook {
    Start,
    CycleEnd,
    End,
}

// ---------------------------------------------------------------------------
// AnimationBank
// ---------------------------------------------------------------------------

/// Named animation registry, typically one per character: "idle", "walk",
/// "punch_light". Lookups by unknown name are `None` and playing an unknown
/// name is a logged no-op, never a panic.
#[derive(Debug, Default)]
pub struct AnimationBank {
    animations: BTreeMap<String, Animation>,
}

impl AnimationBank {
    /// Create an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an animation under a name, returning any previous holder.
    pub fn insert(&mut self, name: impl Into<String>, animation: Animation) -> Option<Animation> {
        self.animations.insert(name.into(), animation)
    }

    /// Look up an animation by name.
    pub fn get(&self, name: &str) -> Option<&Animation> {
        self.animations.get(name)
    }

    /// Mutable lookup by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Animation> {
        self.animations.get_mut(name)
    }

    /// Restart the named animation. Returns whether the name was known.
    pub fn play(&mut self, name: &str) -> bool {
        match self.animations.get_mut(name) {
            Some(anim) => {
                anim.play();
                true
            }
            None => {
                warn!(name, "play requested for unknown animation");
                false
            }
        }
    }

    /// Advance every registered animation. Stopped and paused ones no-op.
    pub fn update(&mut self, dt: f32) {
        for anim in self.animations.values_mut() {
            anim.update(dt);
        }
    }

    /// Number of registered animations.
    pub fn len(&self) -> usize {
        self.animations.len()
    }

    /// Whether the bank is empty.
    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counts {
        starts: u32,
        cycle_ends: u32,
        ends: u32,
    }

    struct Counter {
        counts: Rc<RefCell<Counts>>,
        stop_on_cycle_end: bool,
    }

    impl Counter {
        fn new(counts: &Rc<RefCell<Counts>>) -> Box<Self> {
            Box::new(Self {
                counts: Rc::clone(counts),
                stop_on_cycle_end: false,
            })
        }
    }

    impl AnimationListener for Counter {
        fn on_animation_start(&mut self, _state: &mut AnimationState) {
            self.counts.borrow_mut().starts += 1;
        }
        fn on_cycle_end(&mut self, state: &mut AnimationState) {
            self.counts.borrow_mut().cycle_ends += 1;
            if self.stop_on_cycle_end {
                state.stop();
            }
        }
        fn on_animation_end(&mut self, _state: &mut AnimationState) {
            self.counts.borrow_mut().ends += 1;
        }
    }

    // -- 1. state predicates ------------------------------------------------

    #[test]
    fn new_animation_is_stopped() {
        let anim = Animation::new(1.0, 1);
        assert!(anim.state().is_stopped());
        assert!(!anim.state().is_playing());
    }

    #[test]
    fn play_enters_playing_or_delayed() {
        let mut anim = Animation::new(1.0, CYCLES_INFINITE);
        anim.play();
        assert!(anim.state().is_playing());

        let mut delayed = Animation::new(1.0, CYCLES_INFINITE);
        delayed.state_mut().set_delay(0.5);
        delayed.play();
        assert!(delayed.state().is_delayed());
        assert!(!delayed.state().is_playing());
    }

    #[test]
    fn zero_cycle_count_pauses_immediately() {
        let mut anim = Animation::new(1.0, 1);
        anim.play();
        anim.state_mut().set_cycle_count(0);
        assert!(anim.state().is_paused());
        anim.update(10.0);
        assert_eq!(anim.state().raw_progression(), 0.0);
    }

    // -- 2. single-cycle round trip -----------------------------------------

    #[test]
    fn one_shot_update_completes_single_cycle() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut anim = Animation::new(2.0, 1);
        anim.add_listener(Counter::new(&counts));
        anim.play();
        anim.update(2.0);

        assert_eq!(anim.progression(), 1.0);
        assert_eq!(counts.borrow().cycle_ends, 1);
        assert_eq!(counts.borrow().ends, 1);
        assert!(anim.state().is_stopped(), "stop_at_end defaults to true");
    }

    #[test]
    fn split_updates_complete_single_cycle() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut anim = Animation::new(2.0, 1);
        anim.add_listener(Counter::new(&counts));
        anim.play();
        anim.update(1.0);
        assert_eq!(counts.borrow().cycle_ends, 0);
        anim.update(1.0);

        assert_eq!(anim.progression(), 1.0);
        assert_eq!(counts.borrow().cycle_ends, 1);
        assert_eq!(counts.borrow().ends, 1);
    }

    #[test]
    fn exhaustion_without_stop_at_end_only_pauses() {
        let mut anim = Animation::new(1.0, 1);
        anim.state_mut().set_stop_at_end(false);
        anim.play();
        anim.update(1.0);
        assert!(anim.state().is_paused());
        assert!(!anim.state().is_stopped());
    }

    #[test]
    fn infinite_animation_wraps_and_counts_cycles() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut anim = Animation::new(1.0, CYCLES_INFINITE);
        anim.add_listener(Counter::new(&counts));
        anim.play();
        anim.update(3.5);

        assert_eq!(counts.borrow().cycle_ends, 3);
        assert_eq!(counts.borrow().ends, 0);
        assert_eq!(anim.state().cycle_index(), 3);
        assert!((anim.state().raw_progression() - 0.5).abs() < 1e-3);
    }

    // -- 3. delay -------------------------------------------------------------

    #[test]
    fn delay_defers_start_hook_and_accumulation() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut anim = Animation::new(1.0, CYCLES_INFINITE);
        anim.state_mut().set_delay(0.5);
        anim.add_listener(Counter::new(&counts));
        anim.play();

        anim.update(0.25);
        assert_eq!(counts.borrow().starts, 0);
        assert!(anim.state().is_delayed());

        anim.update(0.25);
        assert_eq!(counts.borrow().starts, 1);
        assert!(anim.state().is_playing());
        assert_eq!(anim.state().raw_progression(), 0.0);
    }

    // -- 4. progression transforms -------------------------------------------

    #[test]
    fn alternate_folds_progression() {
        let mut anim = Animation::new(1.0, CYCLES_INFINITE);
        anim.state_mut().set_alternate(true);
        anim.play();
        anim.update(0.25);
        assert!((anim.progression() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn alternate_then_reverse_composition() {
        let mut anim = Animation::new(1.0, CYCLES_INFINITE);
        anim.state_mut().set_alternate(true);
        anim.state_mut().set_reversed(true);
        anim.play();
        // raw 0.1 -> alternate 0.2 -> reverse 0.8.
        anim.update(0.1);
        assert!((anim.progression() - 0.8).abs() < 1e-3);
    }

    #[test]
    fn phase_wraps_only_past_one() {
        let mut anim = Animation::new(1.0, CYCLES_INFINITE);
        anim.state_mut().set_phase(0.75);
        anim.play();
        anim.update(0.5);
        // 0.5 + 0.75 = 1.25 wraps to 0.25.
        assert!((anim.progression() - 0.25).abs() < 1e-3);
    }

    #[test]
    fn phase_exactly_one_does_not_wrap() {
        let mut anim = Animation::new(1.0, CYCLES_INFINITE);
        anim.state_mut().set_phase(0.5);
        anim.play();
        anim.update(0.5);
        assert!((anim.progression() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn speed_scales_accumulation() {
        let mut anim = Animation::new(1.0, CYCLES_INFINITE);
        anim.state_mut().set_speed(2.0);
        anim.play();
        anim.update(0.25);
        assert!((anim.state().raw_progression() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn easing_applies_last() {
        let mut anim = Animation::new(1.0, CYCLES_INFINITE);
        anim.state_mut().set_easing(Easing::QuadIn);
        anim.play();
        anim.update(0.5);
        assert!((anim.progression() - 0.25).abs() < 1e-3);
    }

    #[test]
    fn progression_stays_in_bounds_at_cycle_boundaries() {
        // A delta landing just inside the crossing tolerance wraps the
        // cycle with a sliver of time unaccounted for; progression must
        // still read as a valid blend weight.
        let mut anim = Animation::new(0.05, CYCLES_INFINITE);
        anim.play();
        anim.update(0.05 - 0.00005);
        let p = anim.progression();
        assert!((0.0..=1.0).contains(&p), "forward progression {p}");
        assert!(anim.state().raw_progression() >= 0.0);

        let mut reversed = Animation::new(0.05, CYCLES_INFINITE);
        reversed.state_mut().set_reversed(true);
        reversed.play();
        reversed.update(0.05 - 0.00005);
        let p = reversed.progression();
        assert!((0.0..=1.0).contains(&p), "reversed progression {p}");
    }

    #[test]
    fn easing_curves_fix_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::QuadIn,
            Easing::QuadOut,
            Easing::QuadInOut,
            Easing::CubicIn,
            Easing::CubicOut,
            Easing::SmoothStep,
        ] {
            assert!((easing.apply(0.0)).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
    }

    // -- 5. listener dispatch safety ----------------------------------------

    #[test]
    fn listener_stop_aborts_remaining_dispatch() {
        let first = Rc::new(RefCell::new(Counts::default()));
        let second = Rc::new(RefCell::new(Counts::default()));

        let mut anim = Animation::new(1.0, CYCLES_INFINITE);
        anim.add_listener(Box::new(Counter {
            counts: Rc::clone(&first),
            stop_on_cycle_end: true,
        }));
        anim.add_listener(Counter::new(&second));
        anim.play();
        anim.update(1.0);

        assert_eq!(first.borrow().cycle_ends, 1);
        assert_eq!(
            second.borrow().cycle_ends,
            0,
            "stop during dispatch must abort remaining listeners"
        );
        assert!(anim.state().is_stopped());
    }

    #[test]
    fn removed_listener_no_longer_fires() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut anim = Animation::new(1.0, CYCLES_INFINITE);
        let id = anim.add_listener(Counter::new(&counts));
        anim.remove_listener(id);
        anim.play();
        anim.update(1.0);
        assert_eq!(counts.borrow().cycle_ends, 0);
    }

    #[test]
    fn replay_after_stop_resets_counters() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut anim = Animation::new(1.0, 1);
        anim.add_listener(Counter::new(&counts));
        anim.play();
        anim.update(1.0);
        assert!(anim.state().is_stopped());

        anim.play();
        assert!(anim.state().is_playing());
        assert_eq!(anim.state().cycle_index(), 0);
        anim.update(1.0);
        assert_eq!(counts.borrow().ends, 2);
    }

    // -- 6. bank lookups ------------------------------------------------------

    #[test]
    fn bank_misses_are_soft() {
        let mut bank = AnimationBank::new();
        assert!(bank.get("idle").is_none());
        assert!(!bank.play("idle"));

        bank.insert("idle", Animation::new(1.0, CYCLES_INFINITE));
        assert!(bank.play("idle"));
        assert!(bank.get("idle").unwrap().state().is_playing());
    }

    #[test]
    fn bank_update_only_advances_playing_animations() {
        let mut bank = AnimationBank::new();
        bank.insert("idle", Animation::new(1.0, CYCLES_INFINITE));
        bank.insert("walk", Animation::new(1.0, CYCLES_INFINITE));
        bank.play("walk");

        bank.update(0.5);
        assert_eq!(bank.get("idle").unwrap().state().raw_progression(), 0.0);
        assert!((bank.get("walk").unwrap().state().raw_progression() - 0.5).abs() < 1e-3);
    }
}
