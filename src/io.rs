//! Digital output pins driven by traversal ticks.

use embedded_hal::digital::{OutputPin, PinState};

use crate::error::{OutputError, Result};
use crate::planner::Tick;

/// Bank of up to 32 output pins, one per digital output bit.
///
/// Pin `i` follows bit `i` of the planner's digital outputs. Only bits in
/// the changed mask are written.
pub struct OutputBank<P, const N: usize>
where
    P: OutputPin,
{
    pins: [P; N],
    state: u32,
}

impl<P, const N: usize> OutputBank<P, N>
where
    P: OutputPin,
{
    /// Create a bank; all outputs are assumed low.
    pub fn new(pins: [P; N]) -> Self {
        Self { pins, state: 0 }
    }

    /// Last written output bits.
    #[inline]
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Write the bits selected by `changed`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first pin that failed; earlier pins keep
    /// their new state.
    pub fn apply(&mut self, bits: u32, changed: u32) -> Result<()> {
        for (channel, pin) in self.pins.iter_mut().enumerate().take(32) {
            let mask = 1u32 << channel;
            if changed & mask == 0 {
                continue;
            }
            pin.set_state(PinState::from(bits & mask != 0))
                .map_err(|_| OutputError::PinError { channel })?;
            self.state = (self.state & !mask) | (bits & mask);
        }
        Ok(())
    }

    /// Write the digital outputs of one traversal tick.
    ///
    /// # Errors
    ///
    /// See [`apply`](Self::apply).
    pub fn apply_tick(&mut self, tick: &Tick) -> Result<()> {
        self.apply(tick.digital_bits, tick.digital_changed)
    }

    /// Release the pins.
    pub fn release(self) -> [P; N] {
        self.pins
    }
}
