//! Timed debouncing for a single pulled-up digital input, with a latched
//! "shift" modifier flag layered on top of the press/release machine.

use embedded_hal::digital::v2::InputPin;

/// Hold-off window between accepted transitions, in (wrapped) milliseconds.
pub const DEBOUNCE_MS: u8 = 80;

/// Debounced press/release state machine for one digital input.
///
/// The caller samples the pin and the clock each control-loop tick and
/// feeds both into [`update`](DebounceGate::update). Timestamps are
/// truncated to eight bits and compared with wrapping subtraction, so the
/// hold-off window stays correct across counter rollover. The narrow
/// counter is deliberate: widening it changes behavior at boundary ticks
/// on the target this was sized for.
#[derive(Default, Clone, Copy)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub struct DebounceGate {
    /// Wrapped millisecond timestamp of the last accepted transition.
    last_transition_ms: u8,
    /// Current debounced logical state.
    is_down: bool,
    /// One-tick pulse raised when a release is accepted.
    just_released: bool,
    /// Latched while the input is serving as a shift modifier.
    shift: bool,
}

impl DebounceGate {
    /// Creates a gate with no press recorded, reading as released.
    pub const fn new() -> Self {
        Self {
            last_transition_ms: 0,
            is_down: false,
            just_released: false,
            shift: false,
        }
    }

    /// True if the debounced state is currently pressed.
    pub fn is_down(&self) -> bool {
        self.is_down
    }

    /// True only during the tick in which a release was accepted.
    pub fn just_released(&self) -> bool {
        self.just_released
    }

    /// True while the input is latched as a shift modifier.
    ///
    /// The flag survives through the release tick, so a consumer handling
    /// the release can still tell it was a shift-chord; it drops on the
    /// following tick.
    pub fn is_shift(&self) -> bool {
        self.shift
    }

    /// Latches the shift flag. Ignored while the input is up: the flag can
    /// only ever be observed while, or immediately after, the input was
    /// held down.
    pub fn mark_shift(&mut self) {
        if self.is_down {
            self.shift = true;
        }
    }

    /// Clears all state, then runs one immediate update from the given raw
    /// read so the gate starts out consistent with the hardware. Any
    /// transition this seeds is swallowed rather than reported.
    pub fn init(&mut self, now_ms: u8, raw_is_down: bool) {
        *self = Self::new();
        let _ = self.update(now_ms, raw_is_down);
    }

    /// Advances the machine one tick.
    ///
    /// Returns true iff the debounced state changed, which only happens
    /// when the raw level disagrees with the debounced one and more than
    /// [`DEBOUNCE_MS`] has elapsed (in wrapped time) since the last
    /// accepted transition. Chatter inside the window never flips state.
    pub fn update(&mut self, now_ms: u8, raw_is_down: bool) -> bool {
        // lose shift status one tick after release so the caller can still
        // observe it on the release tick itself
        if !self.is_down && self.shift {
            self.shift = false;
        }

        // the release pulse lasts exactly one tick
        self.just_released = false;

        if raw_is_down != self.is_down {
            let elapsed = now_ms.wrapping_sub(self.last_transition_ms);
            if elapsed > DEBOUNCE_MS {
                self.last_transition_ms = now_ms;
                if self.is_down && !raw_is_down {
                    self.just_released = true;
                }
                self.is_down = raw_is_down;
                return true;
            }
        }

        false
    }
}

/// A debounce gate bound to its hardware pin.
///
/// The pin is wired active-low with a pull-up: pressed reads electrically
/// low. The caller configures the pin as a pulled-up input before handing
/// it over; this wrapper never writes to hardware.
pub struct DebouncedInput<P> {
    pin: P,
    gate: DebounceGate,
}

impl<P> DebouncedInput<P>
where
    P: InputPin,
{
    /// Wraps a configured pull-up input pin.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            gate: DebounceGate::new(),
        }
    }

    /// Seeds the gate from the current pin level. Call once at startup so
    /// the first poll does not report a spurious transition.
    pub fn init(&mut self, now_ms: u8) {
        let raw = self.raw_is_down();
        self.gate.init(now_ms, raw);
    }

    /// Samples the pin and advances the gate one tick. Returns true iff
    /// the debounced state changed.
    pub fn update(&mut self, now_ms: u8) -> bool {
        let raw = self.raw_is_down();
        let changed = self.gate.update(now_ms, raw);

        #[cfg(feature = "logging")]
        {
            if changed {
                defmt::trace!("debounced input changed, down: {}", self.gate.is_down());
            }
        }

        changed
    }

    /// True if the debounced state is currently pressed.
    pub fn is_down(&self) -> bool {
        self.gate.is_down()
    }

    /// True only during the tick in which a release was accepted.
    pub fn just_released(&self) -> bool {
        self.gate.just_released()
    }

    /// True while the input is latched as a shift modifier.
    pub fn is_shift(&self) -> bool {
        self.gate.is_shift()
    }

    /// Latches the shift flag; ignored while the input is up.
    pub fn mark_shift(&mut self) {
        self.gate.mark_shift()
    }

    fn raw_is_down(&self) -> bool {
        // active low: pressed shorts the pulled-up line to ground
        self.pin.is_low().ok().unwrap_or(false)
    }
}
