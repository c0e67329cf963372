use crate::outcome::ProbeOutcome;

/// Recent outcomes for the bar graph.
///
/// Once full, the next append clears the buffer and starts over instead of
/// evicting the oldest element, so the graph redraws from the left edge.
#[derive(Debug, Clone)]
pub struct RollingSampleBuffer {
    samples: Vec<ProbeOutcome>,
    capacity: usize,
}

impl RollingSampleBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Shrinking below the current length clears the buffer.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        if self.samples.len() > self.capacity {
            self.samples.clear();
        }
    }

    pub fn append(&mut self, outcome: ProbeOutcome) {
        if self.samples.len() >= self.capacity {
            self.samples.clear();
        }
        self.samples.push(outcome);
    }

    pub fn snapshot(&self) -> Vec<ProbeOutcome> {
        self.samples.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProbeOutcome> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::outcome::ProbeOutcome::*;

    #[test]
    fn test_resets_when_full() {
        let mut buffer = RollingSampleBuffer::new(3);
        for outcome in [Latency(1), Latency(2), Lost, Latency(4)] {
            buffer.append(outcome);
        }
        assert_eq!(buffer.snapshot(), vec![Latency(4)]);
    }

    #[test]
    fn test_fills_up_to_capacity() {
        let mut buffer = RollingSampleBuffer::new(3);
        buffer.append(Latency(1));
        buffer.append(Lost);
        buffer.append(Latency(3));
        assert_eq!(buffer.snapshot(), vec![Latency(1), Lost, Latency(3)]);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut buffer = RollingSampleBuffer::new(0);
        buffer.append(Latency(1));
        buffer.append(Latency(2));
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.snapshot(), vec![Latency(2)]);
    }

    #[test]
    fn test_shrink_below_length_clears() {
        let mut buffer = RollingSampleBuffer::new(10);
        for i in 0..5 {
            buffer.append(Latency(i));
        }
        buffer.set_capacity(2);
        assert_eq!(buffer.capacity(), 2);
        assert!(buffer.is_empty());

        buffer.append(Lost);
        assert_eq!(buffer.snapshot(), vec![Lost]);
    }

    #[test]
    fn test_shrink_to_length_keeps_contents() {
        let mut buffer = RollingSampleBuffer::new(10);
        for i in 0..4 {
            buffer.append(Latency(i));
        }
        buffer.set_capacity(4);
        assert_eq!(buffer.len(), 4);

        buffer.append(Lost);
        assert_eq!(buffer.snapshot(), vec![Lost]);
    }

    #[test]
    fn test_grow_keeps_contents() {
        let mut buffer = RollingSampleBuffer::new(2);
        buffer.append(Latency(1));
        buffer.append(Latency(2));
        buffer.set_capacity(3);
        buffer.append(Latency(3));
        assert_eq!(buffer.snapshot(), vec![Latency(1), Latency(2), Latency(3)]);
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_capacity(capacity in 1usize..50, count in 0usize..500) {
            let mut buffer = RollingSampleBuffer::new(capacity);
            for i in 0..count {
                buffer.append(Latency(i as u64));
                prop_assert!(buffer.len() <= capacity);
                prop_assert_eq!(buffer.len(), i % capacity + 1);
            }
        }
    }
}
