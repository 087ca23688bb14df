use serde_derive::{Deserialize, Serialize};

/// Gain and input selection for the conversion *after* the current one.
///
/// The chip latches the selector from the number of clock pulses that
/// follow the 24 data bits.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gain {
    /// Channel A, gain factor 128
    #[default]
    A128 = 1,
    /// Channel B, fixed gain factor 32
    B32 = 2,
    /// Channel A, gain factor 64
    A64 = 3,
}

impl Gain {
    /// Maps a gain factor to a selector. Unknown factors fall back to 128.
    pub fn from_factor(factor: u8) -> Self {
        match factor {
            64 => Gain::A64,
            32 => Gain::B32,
            _ => Gain::A128,
        }
    }

    /// Number of trailing clock pulses that request this selector.
    pub fn pulses(self) -> u8 {
        self as u8
    }

    pub fn factor(self) -> u8 {
        match self {
            Gain::A128 => 128,
            Gain::A64 => 64,
            Gain::B32 => 32,
        }
    }
}

/// Logical load cell multiplexed onto the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    One,
    Two,
}

impl Cell {
    pub fn id(self) -> u8 {
        match self {
            Cell::One => 1,
            Cell::Two => 2,
        }
    }

    pub(crate) fn index(self) -> usize {
        self.id() as usize - 1
    }

    pub(crate) fn other(self) -> Self {
        match self {
            Cell::One => Cell::Two,
            Cell::Two => Cell::One,
        }
    }
}

/// Returned for a channel id other than 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownCell(pub u8);

impl TryFrom<u8> for Cell {
    type Error = UnknownCell;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Cell::One),
            2 => Ok(Cell::Two),
            other => Err(UnknownCell(other)),
        }
    }
}

/// How many cells share the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cells {
    #[default]
    One,
    Two,
}

impl Cells {
    /// Anything but 2 is treated as a single cell.
    pub fn from_count(count: u8) -> Self {
        if count == 2 {
            Cells::Two
        } else {
            Cells::One
        }
    }

    pub fn count(self) -> usize {
        match self {
            Cells::One => 1,
            Cells::Two => 2,
        }
    }

    pub fn contains(self, cell: Cell) -> bool {
        cell.index() < self.count()
    }
}
