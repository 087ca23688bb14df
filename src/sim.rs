//! Simulated HX711 for tests.
//!
//! Queued 24-bit words are shifted out MSB first on rising clock edges.
//! Pulses past the 24th are recorded as the gain selector of the transfer.

extern crate std;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::{InputPin, OutputPin};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

const DATA_BITS: u32 = 24;

#[derive(Default)]
struct State {
    queued: VecDeque<u32>,
    /// Word being shifted out and rising edges seen during its transfer
    transfer: Option<(u32, u32)>,
    clock: bool,
    rising_edges: u32,
    gain_pulses: Vec<u8>,
    /// Next `set_high` on the clock fails without moving the line
    clock_fault: bool,
}

impl State {
    fn set_clock(&mut self, high: bool) {
        if high && !self.clock {
            self.rising_edges += 1;
            match self.transfer.as_mut() {
                Some((_, edges)) => *edges += 1,
                None => {
                    if let Some(word) = self.queued.pop_front() {
                        self.transfer = Some((word, 1));
                    }
                }
            }
        }
        self.clock = high;
    }

    /// Closes a transfer whose trailing pulses are done.
    fn finish(&mut self) {
        if let Some((_, edges)) = self.transfer {
            if edges >= DATA_BITS && !self.clock {
                self.gain_pulses.push((edges - DATA_BITS) as u8);
                self.transfer = None;
            }
        }
    }

    fn dout(&mut self) -> bool {
        if let Some((word, edges)) = self.transfer {
            if edges <= DATA_BITS && (self.clock || edges < DATA_BITS) {
                return (word >> (DATA_BITS - edges)) & 1 == 1;
            }
        }
        self.finish();
        match self.transfer {
            // DOUT returns high after the last bit
            Some(_) => true,
            None => self.queued.is_empty(),
        }
    }
}

#[derive(Clone, Default)]
pub struct Chip(Rc<RefCell<State>>);

impl Chip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> SimData {
        SimData(self.0.clone())
    }

    pub fn clock(&self) -> SimClock {
        SimClock(self.0.clone())
    }

    /// Makes a conversion available. Only the low 24 bits are sent.
    pub fn queue(&self, word: u32) {
        self.0.borrow_mut().queued.push_back(word & 0xFF_FFFF);
    }

    /// Conversions not clocked out yet.
    pub fn pending(&self) -> usize {
        self.0.borrow().queued.len()
    }

    pub fn rising_edges(&self) -> u32 {
        self.0.borrow().rising_edges
    }

    pub fn clock_high(&self) -> bool {
        self.0.borrow().clock
    }

    /// Makes the next rising edge on the clock fail.
    pub fn fail_next_clock(&self) {
        self.0.borrow_mut().clock_fault = true;
    }

    /// Trailing pulse count of every completed transfer.
    pub fn gain_pulses(&self) -> Vec<u8> {
        let mut state = self.0.borrow_mut();
        state.finish();
        state.gain_pulses.clone()
    }
}

/// Pin fault injected with [`Chip::fail_next_clock`].
#[derive(Debug, PartialEq)]
pub struct SimFault;

pub struct SimData(Rc<RefCell<State>>);

pub struct SimClock(Rc<RefCell<State>>);

impl InputPin for SimData {
    type Error = SimFault;

    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.0.borrow_mut().dout())
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

impl OutputPin for SimClock {
    type Error = SimFault;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().set_clock(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut state = self.0.borrow_mut();
        if state.clock_fault {
            state.clock_fault = false;
            return Err(SimFault);
        }
        state.set_clock(true);
        Ok(())
    }
}

/// Delay that only records what it was asked for.
#[derive(Debug, Default)]
pub struct CountingDelay {
    pub us: Vec<u32>,
    pub ms: Vec<u32>,
}

impl DelayUs<u32> for CountingDelay {
    fn delay_us(&mut self, us: u32) {
        self.us.push(us);
    }
}

impl DelayMs<u32> for CountingDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.ms.push(ms);
    }
}
