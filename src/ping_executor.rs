use std::net::IpAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use log::{debug, warn};
use surge_ping::{Client, Config, ICMP, PingIdentifier, PingSequence};

use crate::dns_cache::DnsCache;
use crate::outcome::ProbeOutcome;
use crate::probe::{Prober, sanitize_address};

const PAYLOAD: [u8; 32] = [0; 32];

/// Probes with native ICMP echo requests.
///
/// Needs permission to open ICMP sockets (raw sockets on Windows and some
/// Linux setups); without it every probe is lost.
#[derive(Debug)]
pub struct IcmpPing {
    dns_cache: Mutex<DnsCache>,
    identifier: u16,
    sequence: AtomicU16,
}

impl Default for IcmpPing {
    fn default() -> Self {
        Self::new()
    }
}

impl IcmpPing {
    pub fn new() -> Self {
        Self {
            dns_cache: Mutex::new(DnsCache::default()),
            identifier: std::process::id() as u16,
            sequence: AtomicU16::new(0),
        }
    }

    /// Resolve hostname to IP address, going through the cache
    async fn resolve_target(&self, address: &str) -> Option<IpAddr> {
        let target = sanitize_address(address)?;
        if let Ok(ip) = target.parse::<IpAddr>() {
            return Some(ip);
        }

        let cached = self
            .dns_cache
            .lock()
            .ok()
            .and_then(|mut cache| cache.get_valid_ip(target));
        if cached.is_some() {
            return cached;
        }

        let ip = match tokio::net::lookup_host((target, 0)).await {
            Ok(mut addrs) => addrs.next().map(|addr| addr.ip())?,
            Err(e) => {
                debug!("Failed to resolve {target}: {e}");
                return None;
            }
        };

        if let Ok(mut cache) = self.dns_cache.lock() {
            cache.insert(target, ip);
        }
        Some(ip)
    }
}

impl Prober for IcmpPing {
    async fn probe(&self, address: &str, timeout: Duration) -> ProbeOutcome {
        let Some(ip) = self.resolve_target(address).await else {
            return ProbeOutcome::Lost;
        };

        let config = match ip {
            IpAddr::V4(_) => Config::default(),
            IpAddr::V6(_) => Config::builder().kind(ICMP::V6).build(),
        };
        let client = match Client::new(&config) {
            Ok(client) => client,
            Err(e) => {
                warn!("Failed to open ICMP socket for {ip}: {e}");
                return ProbeOutcome::Lost;
            }
        };

        let mut pinger = client.pinger(ip, PingIdentifier(self.identifier)).await;
        pinger.timeout(timeout);

        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        match pinger.ping(PingSequence(sequence), &PAYLOAD).await {
            Ok((_, round_trip)) => ProbeOutcome::Latency(round_trip.as_millis() as u64),
            Err(e) => {
                debug!("ICMP probe to {ip} failed: {e}");
                ProbeOutcome::Lost
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ip_literal_skips_resolution() {
        let prober = IcmpPing::new();
        let ip = prober.resolve_target(" 127.0.0.1 ").await;
        assert_eq!(ip, Some(IpAddr::from([127, 0, 0, 1])));
        assert!(prober.dns_cache.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_address_is_lost() {
        let outcome = IcmpPing::new()
            .probe("-oops", Duration::from_millis(100))
            .await;
        assert_eq!(outcome, ProbeOutcome::Lost);
    }
}
