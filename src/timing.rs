use embedded_hal::blocking::delay::DelayUs;

/// Settling applied around every clock edge.
///
/// Picked once through the driver's type parameter, so there is no
/// per-bit branch on platform speed.
pub trait ClockTiming {
    fn settle<D: DelayUs<u32>>(delay: &mut D);
}

/// For cores fast enough to violate the minimum pulse width (ESP32, SAMD,
/// STM32, ...). Waits 1 µs after each edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastCpu;

/// For cores where GPIO access alone exceeds the minimum pulse width.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlowCpu;

const SETTLE_US: u32 = 1;

impl ClockTiming for FastCpu {
    fn settle<D: DelayUs<u32>>(delay: &mut D) {
        delay.delay_us(SETTLE_US);
    }
}

impl ClockTiming for SlowCpu {
    #[inline(always)]
    fn settle<D: DelayUs<u32>>(_delay: &mut D) {}
}
