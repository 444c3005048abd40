//! Modal potentiometer tracking: one analog control whose meaning depends
//! on an externally selected mode.
//!
//! The tracker caches the last reading per mode and gates mode switches on
//! a movement threshold, so sensor noise at rest cannot flap the active
//! mode while the physical control has not meaningfully moved.

use core::marker::PhantomData;

use embedded_hal::adc::{Channel, OneShot};
use num_traits::PrimInt;

/// Error returned when a caller addresses a mode outside the configured
/// range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub struct ModeOutOfRange {
    /// The rejected mode index.
    pub mode: u8,
    /// The number of configured modes.
    pub modes: u8,
}

/// Per-mode analog value cache with move-threshold gating.
///
/// The tracker is generic over the ADC word type, so it accepts whatever
/// a one-shot conversion yields (`u16`, `i16`, `u32`, ...). Entries for
/// inactive modes are stale by design: each holds whatever was last
/// written while that mode was active. `MODES` must be at least 1,
/// checked at compile time.
pub struct ModalPot<W, const MODES: usize> {
    values: [W; MODES],
    active_mode: u8,
    threshold: W,
}

impl<W, const MODES: usize> ModalPot<W, MODES>
where
    W: PrimInt,
{
    // monomorphization-time guard, referenced from `new`
    const MIN_MODES: () = assert!(MODES >= 1, "ModalPot requires at least one mode");

    /// Creates a tracker with `initial` recorded for mode 0 and mode 0
    /// active. All other mode slots start at zero.
    ///
    /// A zero-mode tracker is rejected at compile time:
    ///
    /// ```compile_fail
    /// use modal_input_hal::ModalPot;
    ///
    /// let pot: ModalPot<u16, 0> = ModalPot::new(0, 10);
    /// ```
    pub fn new(initial: W, threshold: W) -> Self {
        let () = Self::MIN_MODES;

        let mut values = [W::zero(); MODES];
        values[0] = initial;
        Self {
            values,
            active_mode: 0,
            threshold,
        }
    }

    /// The mode currently considered selected.
    pub fn active_mode(&self) -> u8 {
        self.active_mode
    }

    /// The value last recorded for `mode`.
    pub fn value(&self, mode: u8) -> Result<W, ModeOutOfRange> {
        self.index(mode).map(|idx| self.values[idx])
    }

    /// True iff `reading` sits more than the movement threshold away from
    /// the value stored for the active mode.
    ///
    /// Pure query with no state change; the driver uses it to decide
    /// whether attempting a mode switch is worthwhile at all.
    pub fn has_moved(&self, reading: W) -> bool {
        self.delta_from_active(reading) > self.threshold
    }

    /// Records `reading` under `mode`.
    ///
    /// With the active mode this always stores the reading and reports
    /// plain value inequality. With any other mode the switch has to be
    /// earned: the reading must sit more than the threshold away from the
    /// active mode's stored value, otherwise the request is treated as
    /// cross-mode carryover noise and nothing changes.
    ///
    /// Returns true iff the stored state changed.
    pub fn update(&mut self, mode: u8, reading: W) -> Result<bool, ModeOutOfRange> {
        let idx = self.index(mode)?;

        if mode == self.active_mode {
            let changed = reading != self.values[idx];
            self.values[idx] = reading;
            return Ok(changed);
        }

        if self.delta_from_active(reading) <= self.threshold {
            // the pot has not meaningfully moved since the active mode
            // last read it, so this is rest noise, not a deliberate switch
            return Ok(false);
        }

        self.values[idx] = reading;
        self.active_mode = mode;

        #[cfg(feature = "logging")]
        defmt::trace!("pot mode switched to {}", mode);

        Ok(true)
    }

    fn delta_from_active(&self, reading: W) -> W {
        let prev = self.values[self.active_mode as usize];
        let (hi, lo) = if reading > prev {
            (reading, prev)
        } else {
            (prev, reading)
        };

        // full-scale signed operands can put the true delta outside the
        // word range; saturate instead of overflowing
        hi.checked_sub(&lo).unwrap_or_else(W::max_value)
    }

    fn index(&self, mode: u8) -> Result<usize, ModeOutOfRange> {
        if (mode as usize) < MODES {
            Ok(mode as usize)
        } else {
            #[cfg(feature = "logging")]
            defmt::warn!("pot mode {} out of range, {} configured", mode, MODES as u8);

            Err(ModeOutOfRange {
                mode,
                modes: MODES as u8,
            })
        }
    }
}

/// A modal pot bound to its ADC channel.
///
/// Owns the one-shot ADC and the channel pin; each poll takes a fresh
/// conversion and feeds it through the tracker. A failed conversion falls
/// back to the active mode's stored value, which reads as "no movement".
pub struct PotInput<A, ADC, W, P, const MODES: usize> {
    adc: A,
    channel: P,
    pot: ModalPot<W, MODES>,
    _adc: PhantomData<ADC>,
}

impl<A, ADC, W, P, const MODES: usize> PotInput<A, ADC, W, P, MODES>
where
    W: PrimInt,
    P: Channel<ADC>,
    A: OneShot<ADC, W, P>,
{
    /// Takes one seed conversion for mode 0 and wraps the hardware. A
    /// failed seed conversion records zero.
    pub fn new(mut adc: A, mut channel: P, threshold: W) -> Self {
        let initial = nb::block!(adc.read(&mut channel))
            .ok()
            .unwrap_or_else(W::zero);
        Self {
            adc,
            channel,
            pot: ModalPot::new(initial, threshold),
            _adc: PhantomData,
        }
    }

    /// Samples the pot and reports whether it has moved past the threshold
    /// relative to the active mode's stored value.
    pub fn has_moved(&mut self) -> bool {
        let reading = self.sample();
        self.pot.has_moved(reading)
    }

    /// Samples the pot and records the reading under `mode`; see
    /// [`ModalPot::update`] for the gating rules.
    pub fn update(&mut self, mode: u8) -> Result<bool, ModeOutOfRange> {
        let reading = self.sample();
        self.pot.update(mode, reading)
    }

    /// The value last recorded for `mode`.
    pub fn value(&self, mode: u8) -> Result<W, ModeOutOfRange> {
        self.pot.value(mode)
    }

    /// The mode currently considered selected.
    pub fn active_mode(&self) -> u8 {
        self.pot.active_mode()
    }

    fn sample(&mut self) -> W {
        let fallback = self.pot.values[self.pot.active_mode as usize];
        nb::block!(self.adc.read(&mut self.channel))
            .ok()
            .unwrap_or(fallback)
    }
}
