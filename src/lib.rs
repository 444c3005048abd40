#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(warnings)]
#![cfg_attr(not(test), no_std)]

//! MODAL INPUT HAL
//!
//! Input conditioning for a small polled music controller: a debounced
//! digital input with shift-key semantics, and a modal potentiometer
//! whose reading is interpreted against an externally selected mode.
//!
//! Both conditioners are plain state machines advanced once per
//! control-loop tick. The core machines take raw samples and a wrapped
//! millisecond clock as arguments, so they can be driven from a firmware
//! loop, a simulation, or a test harness with synthetic time. Hardware is
//! reached only through [`embedded-hal`] traits via the thin
//! pin/ADC-owning wrappers.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/0.2

pub mod debounce;
pub mod modal_pot;

#[cfg(test)]
pub mod mock;

pub use debounce::{DebounceGate, DebouncedInput, DEBOUNCE_MS};
pub use modal_pot::{ModalPot, ModeOutOfRange, PotInput};
