/// Normalized result of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeOutcome {
    /// Round trip completed, in milliseconds.
    Latency(u64),
    /// Timed out, unreachable, or the response could not be parsed.
    Lost,
}

impl ProbeOutcome {
    pub fn latency(self) -> Option<u64> {
        match self {
            ProbeOutcome::Latency(ms) => Some(ms),
            ProbeOutcome::Lost => None,
        }
    }

    pub fn is_lost(self) -> bool {
        matches!(self, ProbeOutcome::Lost)
    }
}

impl From<Option<u64>> for ProbeOutcome {
    fn from(latency: Option<u64>) -> Self {
        latency.map_or(ProbeOutcome::Lost, ProbeOutcome::Latency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_option() {
        assert_eq!(ProbeOutcome::from(Some(42)), ProbeOutcome::Latency(42));
        assert_eq!(ProbeOutcome::from(None), ProbeOutcome::Lost);
        assert_eq!(ProbeOutcome::Latency(7).latency(), Some(7));
        assert!(ProbeOutcome::Lost.is_lost());
    }
}
