//! Polling driver for the HX711 24-bit load cell ADC.
//!
//! One chip can serve two load cells: cell 1 on channel A (gain 128 or 64)
//! and cell 2 on channel B (gain 32). The driver alternates between them on
//! its own and keeps a short history of samples per cell for averaging,
//! tare and scale.
//!
//! ```ignore
//! let mut scale: Hx711<_, _, _> = Hx711::new(dout, pd_sck, delay, Config::new().cells(2))?;
//! scale.tare_blocking(Cell::One, 10)?;
//! scale.set_scale(Cell::One, 420.0);
//! loop {
//!     match scale.poll() {
//!         Ok(Cell::One) => show(scale.units(Cell::One, 5)),
//!         Ok(Cell::Two) => {}
//!         Err(nb::Error::WouldBlock) => {}
//!         Err(nb::Error::Other(e)) => return Err(e),
//!     }
//! }
//! ```
#![deny(unsafe_code)]
#![no_std]

mod calibration;
mod gain;
mod hx711;
mod interface;
mod sequencer;
mod store;
mod timing;

#[cfg(test)]
mod sim;

pub use calibration::Calibration;
pub use gain::{Cell, Cells, Gain, UnknownCell};
pub use hx711::{Config, Hx711, Tare};
pub use interface::Error;
pub use timing::{ClockTiming, FastCpu, SlowCpu};
