use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;
use crate::probe::sanitize_address;

/// A host that can be selected for monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Host {
    name: String,
    address: String,
}

impl Host {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        let address = address.into();
        Self {
            name: name.into(),
            address: address.trim().to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Checks that the address is an IP literal or a plain hostname.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match sanitize_address(&self.address) {
            Some(_) => Ok(()),
            None => Err(ConfigError::InvalidAddress {
                name: self.name.clone(),
                address: self.address.clone(),
            }),
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.address)
    }
}

impl<'de> Deserialize<'de> for Host {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct RawHost {
            name: String,
            address: String,
        }

        let raw = RawHost::deserialize(deserializer)?;
        Ok(Host::new(raw.name, raw.address))
    }
}

/// Dota 2 game server regions, from
/// https://steamcommunity.com/sharedfiles/filedetails/?id=217075877
pub fn default_hosts() -> Vec<Host> {
    [
        ("EU East 1", "vie.valve.net"),
        ("EU East 2", "185.25.182.1"),
        ("EU West 1", "lux.valve.net"),
        ("EU West 2", "146.66.158.1"),
        ("Russia 1", "sto.valve.net"),
        ("Russia 2", "185.25.180.1"),
        ("US East", "iad.valve.net"),
        ("US West", "eat.valve.net"),
        ("SE Asia 1", "sgp-1.valve.net"),
        ("SE Asia 2", "sgp-2.valve.net"),
        ("South America 1", "gru.valve.net"),
        ("South America 2", "209.197.25.1"),
        ("South America 3", "209.197.29.1"),
        ("South Africa 1", "cpt-1.valve.net"),
        ("South Africa 2", "197.80.200.1"),
        ("South Africa 3", "197.84.209.1"),
        ("South Africa 4", "196.38.180.1"),
        ("Peru", "191.98.144.1"),
        ("India", "116.202.224.146"),
        ("Australia", "syd.valve.net"),
        ("Dubai", "dxb.valve.net"),
    ]
    .into_iter()
    .map(|(name, address)| Host::new(name, address))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_is_trimmed() {
        let host = Host::new("Russia 2", "185.25.180.1 ");
        assert_eq!(host.address(), "185.25.180.1");
        assert_eq!(host.to_string(), "Russia 2 (185.25.180.1)");
    }

    #[test]
    fn test_deserialize_trims_address() {
        let host: Host = serde_json::from_str(r#"{"name": "X", "address": " 10.0.0.1 "}"#).unwrap();
        assert_eq!(host, Host::new("X", "10.0.0.1"));
    }

    #[test]
    fn test_default_hosts_are_valid() {
        let hosts = default_hosts();
        assert_eq!(hosts.len(), 21);
        for host in &hosts {
            assert!(host.validate().is_ok(), "{host}");
        }
    }

    #[test]
    fn test_invalid_address() {
        let err = Host::new("Bad", "-f").validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddress { .. }));
    }
}
