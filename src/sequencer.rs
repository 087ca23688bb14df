use crate::gain::{Cell, Cells, Gain};

/// Tracks which cell the conversion being clocked out belongs to, and which
/// selector its trailing pulses must request.
///
/// The chip applies a selector one conversion late, so the two are kept
/// apart: `last` is the cell of the most recent completed read, `pending`
/// is what the next read's trailing pulses will ask for.
#[derive(Debug, Clone)]
pub struct Sequencer {
    cells: Cells,
    configured: Gain,
    pending: Gain,
    last: Cell,
}

impl Sequencer {
    pub fn new(cells: Cells, gain: Gain) -> Self {
        Self {
            cells,
            configured: gain,
            pending: gain,
            // So the first completed read is attributed to cell 1
            last: Cell::Two,
        }
    }

    pub fn pending(&self) -> Gain {
        self.pending
    }

    /// Cell the waiting conversion belongs to, and the selector its
    /// trailing pulses must request. Leaves the state untouched so a read
    /// that fails can be retried with the same answer.
    pub fn peek(&self) -> (Cell, Gain) {
        match self.cells {
            Cells::One => (Cell::One, self.pending),
            Cells::Two => {
                let completed = self.last.other();
                let next = match completed {
                    Cell::One => Gain::B32,
                    Cell::Two => self.configured,
                };
                (completed, next)
            }
        }
    }

    /// Records a read that went through with the selector from [`peek`](Self::peek).
    pub fn commit(&mut self, cell: Cell, next: Gain) {
        self.last = cell;
        self.pending = next;
    }
}
