use heapless::Deque;

/// Most recent samples of one cell, newest first.
///
/// Holds at most `N` samples; pushing into a full buffer drops the oldest.
pub struct History<const N: usize> {
    samples: Deque<i32, N>,
}

impl<const N: usize> History<N> {
    pub fn new() -> Self {
        Self {
            samples: Deque::new(),
        }
    }

    pub fn push(&mut self, sample: i32) {
        if self.samples.is_full() {
            self.samples.pop_back();
        }
        // Cannot fail, a slot was freed above
        self.samples.push_front(sample).ok();
    }

    /// Mean of the newest `times` samples, `times` clamped to `N`.
    ///
    /// Slots not yet written count as zero and the sum is divided by the
    /// requested count, not by the number of samples held.
    pub fn average(&self, times: usize) -> f64 {
        let times = times.min(N);
        let sum: i64 = self.samples.iter().take(times).map(|&s| s as i64).sum();
        sum as f64 / times as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn latest(&self) -> Option<i32> {
        self.samples.front().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &i32> {
        self.samples.iter()
    }
}

impl<const N: usize> Default for History<N> {
    fn default() -> Self {
        Self::new()
    }
}
