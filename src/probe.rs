use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::outcome::ProbeOutcome;
use crate::ping_command::SystemPing;
use crate::ping_executor::IcmpPing;

/// Issues one echo round trip to one host.
///
/// Implementations never fail: every network, process or parse error is
/// reported as [`ProbeOutcome::Lost`]. The returned future may be dropped
/// at any point to cancel the probe.
pub trait Prober: Send + Sync + 'static {
    fn probe(&self, address: &str, timeout: Duration) -> impl Future<Output = ProbeOutcome> + Send;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The platform `ping` command.
    #[default]
    System,
    /// Native ICMP sockets.
    Icmp,
}

/// The prober selected by configuration.
#[derive(Debug)]
pub enum ProbeBackend {
    System(SystemPing),
    Icmp(IcmpPing),
}

impl ProbeBackend {
    pub fn new(kind: BackendKind) -> Self {
        match kind {
            BackendKind::System => ProbeBackend::System(SystemPing::new()),
            BackendKind::Icmp => ProbeBackend::Icmp(IcmpPing::new()),
        }
    }
}

impl Prober for ProbeBackend {
    async fn probe(&self, address: &str, timeout: Duration) -> ProbeOutcome {
        match self {
            ProbeBackend::System(prober) => prober.probe(address, timeout).await,
            ProbeBackend::Icmp(prober) => prober.probe(address, timeout).await,
        }
    }
}

/// Returns the address when it is an IP literal or a plain hostname.
///
/// Hostnames may only contain ASCII alphanumerics, dots and hyphens and may
/// not start with a hyphen, so the value is never mistaken for a command
/// line option.
pub fn sanitize_address(address: &str) -> Option<&str> {
    let address = address.trim();
    if address.parse::<IpAddr>().is_ok() {
        return Some(address);
    }

    let valid = !address.is_empty()
        && !address.starts_with('-')
        && address
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    valid.then_some(address)
}
