use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};

pub const DNS_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct DnsCacheEntry {
    ip_address: IpAddr,
    cached_at: Instant,
    ttl: Duration,
}

impl DnsCacheEntry {
    pub fn new(ip_address: IpAddr, ttl: Duration) -> Self {
        Self {
            ip_address,
            cached_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > self.ttl
    }

    pub fn ip_address(&self) -> IpAddr {
        self.ip_address
    }
}

/// Resolved addresses keyed by hostname, so a probe per second does not
/// mean a lookup per second.
#[derive(Debug)]
pub struct DnsCache {
    entries: HashMap<String, DnsCacheEntry>,
    ttl: Duration,
}

impl Default for DnsCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DNS_CACHE_TTL_SECS))
    }
}

impl DnsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn insert(&mut self, hostname: &str, ip_address: IpAddr) {
        self.entries
            .insert(hostname.to_string(), DnsCacheEntry::new(ip_address, self.ttl));
    }

    /// Returns the cached address unless it has expired; expired entries are dropped.
    pub fn get_valid_ip(&mut self, hostname: &str) -> Option<IpAddr> {
        match self.entries.get(hostname) {
            Some(entry) if !entry.is_expired() => Some(entry.ip_address()),
            Some(_) => {
                self.entries.remove(hostname);
                None
            }
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
