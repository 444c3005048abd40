//! Mocked pin and ADC for testing the input conditioners.
//!
//! The mocks share their level/sample with the test body through a `Cell`,
//! so a test can move the "hardware" while the conditioner owns it.

use core::cell::Cell;
use core::convert::Infallible;

use embedded_hal::adc::{Channel, OneShot};
use embedded_hal::digital::v2::InputPin;

/// A digital input whose electrical level is controlled by the test.
pub struct MockPin<'a> {
    level: &'a Cell<bool>,
}

impl<'a> MockPin<'a> {
    /// Wraps a shared level, `true` meaning electrically high.
    pub fn new(level: &'a Cell<bool>) -> Self {
        MockPin { level }
    }
}

impl InputPin for MockPin<'_> {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.level.get())
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.level.get())
    }
}

/// A one-shot ADC that converts to whatever the test last wrote.
pub struct MockAdc<'a> {
    sample: &'a Cell<u16>,
}

impl<'a> MockAdc<'a> {
    /// Wraps a shared sample source.
    pub fn new(sample: &'a Cell<u16>) -> Self {
        MockAdc { sample }
    }
}

/// The single channel exposed by [`MockAdc`].
pub struct MockChannel;

impl<'a> Channel<MockAdc<'a>> for MockChannel {
    type ID = u8;

    fn channel() -> Self::ID {
        0
    }
}

impl<'a> OneShot<MockAdc<'a>, u16, MockChannel> for MockAdc<'a> {
    type Error = Infallible;

    fn read(&mut self, _pin: &mut MockChannel) -> nb::Result<u16, Self::Error> {
        Ok(self.sample.get())
    }
}

/// Error produced by the fallible mocks.
pub type MockError = &'static str;

/// A digital input that can be made to fail mid-test: a `None` level makes
/// every read return an error.
pub struct FlakyPin<'a> {
    level: &'a Cell<Option<bool>>,
}

impl<'a> FlakyPin<'a> {
    /// Wraps a shared level, `Some(true)` meaning electrically high.
    pub fn new(level: &'a Cell<Option<bool>>) -> Self {
        FlakyPin { level }
    }
}

impl InputPin for FlakyPin<'_> {
    type Error = MockError;

    fn is_high(&self) -> Result<bool, Self::Error> {
        self.level.get().ok_or("pin read failed")
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        self.is_high().map(|level| !level)
    }
}

/// A one-shot ADC that can be made to fail mid-test: a `None` sample makes
/// every conversion return an error.
pub struct FlakyAdc<'a> {
    sample: &'a Cell<Option<u16>>,
}

impl<'a> FlakyAdc<'a> {
    /// Wraps a shared sample source.
    pub fn new(sample: &'a Cell<Option<u16>>) -> Self {
        FlakyAdc { sample }
    }
}

impl<'a> Channel<FlakyAdc<'a>> for MockChannel {
    type ID = u8;

    fn channel() -> Self::ID {
        0
    }
}

impl<'a> OneShot<FlakyAdc<'a>, u16, MockChannel> for FlakyAdc<'a> {
    type Error = MockError;

    fn read(&mut self, _pin: &mut MockChannel) -> nb::Result<u16, Self::Error> {
        self.sample
            .get()
            .ok_or(nb::Error::Other("conversion failed"))
    }
}
