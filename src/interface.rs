use core::marker::PhantomData;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::gain::Gain;
use crate::timing::ClockTiming;

/// Bits per conversion
const DATA_BITS: u8 = 24;
/// PD_SCK must stay high longer than 60 µs to power the chip down
const POWER_DOWN_US: u32 = 64;

/// Driver errors.
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// GPIO error on the clock or data line
    Gpio(E),
}

/// The two wires (PD_SCK and DOUT) plus the platform delay.
///
/// Owns no sample data: it only turns clock pulses into a signed reading.
pub struct Interface<DT, SCK, D, T> {
    data: DT,
    clock: SCK,
    delay: D,
    _timing: PhantomData<T>,
}

impl<E, DT, SCK, D, T> Interface<DT, SCK, D, T>
where
    DT: InputPin<Error = E>,
    SCK: OutputPin<Error = E>,
    D: DelayUs<u32> + DelayMs<u32>,
    T: ClockTiming,
{
    /// Takes the pins and pulls the clock low, which keeps the chip awake.
    pub fn new(data: DT, clock: SCK, delay: D) -> Result<Self, Error<E>> {
        let mut interface = Self {
            data,
            clock,
            delay,
            _timing: PhantomData,
        };
        interface.clock.set_low().map_err(Error::Gpio)?;
        Ok(interface)
    }

    /// DOUT is pulled low once a conversion is waiting. Only reads the data line.
    pub fn is_ready(&self) -> Result<bool, Error<E>> {
        self.data.is_low().map_err(Error::Gpio)
    }

    /// Clocks out one conversion, then appends the pulses selecting `next`.
    ///
    /// Must only be called once [`is_ready`](Self::is_ready) returned true.
    pub fn read(&mut self, next: Gain) -> Result<i32, Error<E>> {
        // Sign bit seeds the accumulator with -1, the rest shift in below it
        let mut value: i32 = if self.clock_bit()? { -1 } else { 0 };
        for _ in 1..DATA_BITS {
            value = (value << 1) | self.clock_bit()? as i32;
        }
        for _ in 0..next.pulses() {
            self.pulse()?;
        }
        Ok(value)
    }

    /// Gives a cooperative scheduler or watchdog a chance to run.
    pub fn yield_now(&mut self) {
        self.delay.delay_ms(0);
    }

    pub fn power_down(&mut self) -> Result<(), Error<E>> {
        self.clock.set_low().map_err(Error::Gpio)?;
        self.clock.set_high().map_err(Error::Gpio)?;
        self.delay.delay_us(POWER_DOWN_US);
        Ok(())
    }

    pub fn power_up(&mut self) -> Result<(), Error<E>> {
        self.clock.set_low().map_err(Error::Gpio)
    }

    pub fn release(self) -> (DT, SCK, D) {
        (self.data, self.clock, self.delay)
    }

    fn clock_bit(&mut self) -> Result<bool, Error<E>> {
        self.clock.set_high().map_err(Error::Gpio)?;
        T::settle(&mut self.delay);
        let bit = self.data.is_high().map_err(Error::Gpio)?;
        self.clock.set_low().map_err(Error::Gpio)?;
        T::settle(&mut self.delay);
        Ok(bit)
    }

    fn pulse(&mut self) -> Result<(), Error<E>> {
        self.clock.set_high().map_err(Error::Gpio)?;
        T::settle(&mut self.delay);
        self.clock.set_low().map_err(Error::Gpio)?;
        T::settle(&mut self.delay);
        Ok(())
    }
}
