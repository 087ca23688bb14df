use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::{InputPin, OutputPin};
use log::{debug, trace};
use serde_derive::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::gain::{Cell, Cells, Gain};
use crate::interface::{Error, Interface};
use crate::sequencer::Sequencer;
use crate::store::History;
use crate::timing::{ClockTiming, FastCpu};

/// Fixed at construction.
#[derive(Debug, PartialEq, Serialize, Deserialize, Default, Clone, Copy)]
pub struct Config {
    pub cells: Cells,
    /// Selector for cell 1. Cell 2 is always read through channel B.
    pub gain: Gain,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of load cells; anything but 2 means one.
    pub fn cells(mut self, count: u8) -> Self {
        self.cells = Cells::from_count(count);
        self
    }

    /// Gain factor 128, 64 or 32; anything else means 128.
    pub fn gain(mut self, factor: u8) -> Self {
        self.gain = Gain::from_factor(factor);
        self
    }
}

/// A tare in progress, driven by [`Hx711::poll_tare`].
#[derive(Debug, Clone, Copy)]
pub struct Tare {
    cell: Cell,
    times: usize,
    remaining: usize,
}

impl Tare {
    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Conversions still to be ingested before the offset is taken.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

struct Channel<const N: usize> {
    history: History<N>,
    calibration: Calibration,
}

impl<const N: usize> Channel<N> {
    fn new() -> Self {
        Self {
            history: History::new(),
            calibration: Calibration::default(),
        }
    }
}

/// HX711 with one or two load cells on a single clock/data pair.
///
/// Call [`poll`](Self::poll) from the main loop; it returns
/// `WouldBlock` until a conversion is waiting and never waits on the chip
/// itself. Averages and calibrated readings come from the buffered samples
/// and do not touch the wires.
///
/// With two cells each channel switch costs the chip a few extra
/// conversions, so each cell is updated at roughly half the single-cell
/// rate, and the first samples after a switch are not settled yet.
pub struct Hx711<DT, SCK, D, T = FastCpu, const N: usize = 20> {
    interface: Interface<DT, SCK, D, T>,
    config: Config,
    sequencer: Sequencer,
    one: Channel<N>,
    two: Channel<N>,
}

impl<E, DT, SCK, D, T, const N: usize> Hx711<DT, SCK, D, T, N>
where
    DT: InputPin<Error = E>,
    SCK: OutputPin<Error = E>,
    D: DelayUs<u32> + DelayMs<u32>,
    T: ClockTiming,
{
    /// Takes ownership of both lines, so no other driver can clock them.
    ///
    /// The data pin must already be an input and the clock pin a push-pull
    /// output.
    pub fn new(data: DT, clock: SCK, delay: D, config: Config) -> Result<Self, Error<E>> {
        let interface = Interface::new(data, clock, delay)?;
        Ok(Self {
            interface,
            config,
            sequencer: Sequencer::new(config.cells, config.gain),
            one: Channel::new(),
            two: Channel::new(),
        })
    }

    pub fn config(&self) -> Config {
        self.config
    }

    /// Selector the next read's trailing pulses will request.
    pub fn pending_gain(&self) -> Gain {
        self.sequencer.pending()
    }

    pub fn is_ready(&self) -> Result<bool, Error<E>> {
        self.interface.is_ready()
    }

    /// Ingests one conversion if the chip has one, returning the cell it
    /// belongs to.
    pub fn poll(&mut self) -> nb::Result<Cell, Error<E>> {
        if !self.interface.is_ready()? {
            return Err(nb::Error::WouldBlock);
        }
        let (cell, next) = self.sequencer.peek();
        let sample = self.interface.read(next)?;
        self.sequencer.commit(cell, next);
        self.history_mut(cell).push(sample);
        self.interface.yield_now();
        trace!("cell {}: {}", cell.id(), sample);
        Ok(cell)
    }

    /// Mean of the newest `times` raw samples of `cell`.
    ///
    /// `times` is clamped to the buffer capacity. A buffer holding fewer
    /// samples than requested still divides by `times`, the missing slots
    /// counting as zero.
    pub fn average(&self, cell: Cell, times: usize) -> f64 {
        self.channel(cell).history.average(times)
    }

    /// Average minus the tare offset.
    pub fn value(&self, cell: Cell, times: usize) -> f64 {
        let channel = self.channel(cell);
        channel.calibration.value(channel.history.average(times))
    }

    /// Tare corrected average divided by the scale.
    pub fn units(&self, cell: Cell, times: usize) -> f32 {
        let channel = self.channel(cell);
        channel.calibration.units(channel.history.average(times))
    }

    /// Number of samples buffered for `cell`.
    pub fn samples(&self, cell: Cell) -> usize {
        self.channel(cell).history.len()
    }

    pub fn latest(&self, cell: Cell) -> Option<i32> {
        self.channel(cell).history.latest()
    }

    /// Buffered raw samples of `cell`, newest first.
    pub fn history(&self, cell: Cell) -> impl Iterator<Item = i32> + '_ {
        self.channel(cell).history.iter().copied()
    }

    /// Starts a non-blocking tare. `times` is clamped to the buffer capacity.
    pub fn begin_tare(&self, cell: Cell, times: usize) -> Tare {
        let times = times.min(N);
        Tare {
            cell,
            times,
            remaining: times * self.config.cells.count(),
        }
    }

    /// Ingests one conversion for `tare`, and once enough have been seen
    /// (across all cells) stores and returns the new offset.
    pub fn poll_tare(&mut self, tare: &mut Tare) -> nb::Result<i32, Error<E>> {
        if tare.remaining > 0 {
            self.poll()?;
            tare.remaining -= 1;
            if tare.remaining > 0 {
                return Err(nb::Error::WouldBlock);
            }
        }
        let offset = self.average(tare.cell, tare.times) as i32;
        self.set_offset(tare.cell, offset);
        debug!("cell {} tared at {}", tare.cell.id(), offset);
        Ok(offset)
    }

    /// Busy-polls the chip for `times` conversions per configured cell, then
    /// takes their average as the zero point of `cell`.
    ///
    /// Blocks for as long as the chip takes; there is no timeout. Use
    /// [`begin_tare`](Self::begin_tare) and [`poll_tare`](Self::poll_tare)
    /// to bound it.
    pub fn tare_blocking(&mut self, cell: Cell, times: usize) -> Result<i32, Error<E>> {
        let mut tare = self.begin_tare(cell, times);
        nb::block!(self.poll_tare(&mut tare))
    }

    pub fn set_scale(&mut self, cell: Cell, scale: f32) {
        if let Some(channel) = self.configured_mut(cell) {
            channel.calibration.scale = scale;
            debug!("cell {} scale {}", cell.id(), scale);
        }
    }

    pub fn set_offset(&mut self, cell: Cell, offset: i32) {
        if let Some(channel) = self.configured_mut(cell) {
            channel.calibration.offset = offset;
        }
    }

    pub fn calibration(&self, cell: Cell) -> Calibration {
        self.channel(cell).calibration
    }

    /// Restores a calibration saved by the caller.
    pub fn set_calibration(&mut self, cell: Cell, calibration: Calibration) {
        if let Some(channel) = self.configured_mut(cell) {
            channel.calibration = calibration;
        }
    }

    /// Puts the chip into power-down mode. Buffers and calibration are kept.
    pub fn power_down(&mut self) -> Result<(), Error<E>> {
        self.interface.power_down()?;
        debug!("powered down");
        Ok(())
    }

    pub fn power_up(&mut self) -> Result<(), Error<E>> {
        self.interface.power_up()?;
        debug!("powered up");
        Ok(())
    }

    /// Gives back the pins and delay.
    pub fn release(self) -> (DT, SCK, D) {
        self.interface.release()
    }

    fn channel(&self, cell: Cell) -> &Channel<N> {
        match cell {
            Cell::One => &self.one,
            Cell::Two => &self.two,
        }
    }

    fn history_mut(&mut self, cell: Cell) -> &mut History<N> {
        match cell {
            Cell::One => &mut self.one.history,
            Cell::Two => &mut self.two.history,
        }
    }

    fn configured_mut(&mut self, cell: Cell) -> Option<&mut Channel<N>> {
        if !self.config.cells.contains(cell) {
            return None;
        }
        match cell {
            Cell::One => Some(&mut self.one),
            Cell::Two => Some(&mut self.two),
        }
    }
}
