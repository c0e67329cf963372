use crate::outcome::ProbeOutcome;

/// Copy of the statistics at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub min: u64,
    pub max: u64,
    pub avg: u64,
    pub loss_count: u64,
    pub loss_percent: u64,
    pub latency_count: u64,
    pub total_count: u64,
}

/// Running min/max/average latency and packet loss for one host.
///
/// The average is exact: a running sum and count replace the full latency
/// history, so each update is O(1).
#[derive(Debug, Clone, Default)]
pub struct ProbeStatistics {
    min: u64,
    max: u64,
    latency_sum: u128,
    latency_count: u64,
    loss_count: u64,
    loss_percent: u64,
}

impl ProbeStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, outcome: ProbeOutcome) {
        match outcome {
            ProbeOutcome::Latency(ms) => {
                if self.latency_count == 0 {
                    self.min = ms;
                    self.max = ms;
                } else {
                    self.min = self.min.min(ms);
                    self.max = self.max.max(ms);
                }
                self.latency_sum += u128::from(ms);
                self.latency_count += 1;
            }
            ProbeOutcome::Lost => self.loss_count += 1,
        }

        let total = self.total_count();
        if total > 0 {
            self.loss_percent = self.loss_count * 100 / total;
        }
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    /// Mean latency truncated to whole milliseconds, 0 before any latency.
    pub fn avg(&self) -> u64 {
        match self.latency_count {
            0 => 0,
            n => (self.latency_sum / u128::from(n)) as u64,
        }
    }

    /// Exact mean latency, `None` before any latency.
    pub fn mean(&self) -> Option<f64> {
        (self.latency_count > 0).then(|| self.latency_sum as f64 / self.latency_count as f64)
    }

    pub fn loss_count(&self) -> u64 {
        self.loss_count
    }

    pub fn loss_percent(&self) -> u64 {
        self.loss_percent
    }

    pub fn latency_count(&self) -> u64 {
        self.latency_count
    }

    pub fn total_count(&self) -> u64 {
        self.latency_count + self.loss_count
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            min: self.min,
            max: self.max,
            avg: self.avg(),
            loss_count: self.loss_count,
            loss_percent: self.loss_percent,
            latency_count: self.latency_count,
            total_count: self.total_count(),
        }
    }
}
