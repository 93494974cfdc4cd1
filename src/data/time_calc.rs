use std::time::Duration;

/// Running totals for a repeated, timed step.
#[derive(Debug, Default, Clone)]
pub struct TimeCalc {
    n: usize,
    total: Duration,
    last: Duration,
}

impl TimeCalc {
    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn last(&self) -> Duration {
        self.last
    }

    pub fn avg(&self) -> Duration {
        if self.n == 0 {
            return Duration::ZERO;
        }
        self.total / self.n as u32
    }

    pub fn push(&mut self, x: Duration) {
        self.total += x;
        self.last = x;
        self.n += 1;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
