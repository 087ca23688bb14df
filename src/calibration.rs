use serde_derive::{Deserialize, Serialize};

/// Zero point and scale of one cell.
///
/// Lives only in memory; callers that want it across restarts store it
/// themselves and hand it back with `set_calibration`.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub struct Calibration {
    /// Raw reading under no load, subtracted before scaling
    pub offset: i32,
    /// Raw units per physical unit
    pub scale: f32,
}

impl Calibration {
    pub fn value(&self, average: f64) -> f64 {
        average - self.offset as f64
    }

    pub fn units(&self, average: f64) -> f32 {
        (self.value(average) / self.scale as f64) as f32
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            offset: 0,
            scale: 1.0,
        }
    }
}
