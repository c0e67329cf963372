use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use log::info;
use tokio::runtime::Handle;

use crate::error::RegistryError;
use crate::host::Host;
use crate::monitor::{HostMonitor, RunState};
use crate::probe::Prober;

/// Sample capacity used until the display reports its width.
pub const DEFAULT_CAPACITY: usize = 60;

/// The monitors of the currently selected hosts, at most one per host.
pub struct MonitorRegistry<P> {
    runtime: Handle,
    prober: Arc<P>,
    capacity: usize,
    monitors: HashMap<Host, HostMonitor>,
}

impl<P: Prober> MonitorRegistry<P> {
    pub fn new(runtime: Handle, prober: P, capacity: usize) -> Self {
        Self {
            runtime,
            prober: Arc::new(prober),
            capacity: capacity.max(1),
            monitors: HashMap::new(),
        }
    }

    /// Starts a monitor for `host`.
    ///
    /// Tracked monitors are never Stopped: `remove` stops a monitor and
    /// drops it in one step, so any existing entry means the host is
    /// already monitored.
    pub fn add(&mut self, host: Host) -> Result<&HostMonitor, RegistryError> {
        match self.monitors.entry(host) {
            Entry::Occupied(entry) => Err(RegistryError::AlreadyMonitored(entry.key().to_string())),
            Entry::Vacant(entry) => {
                let monitor = HostMonitor::spawn(
                    &self.runtime,
                    entry.key().clone(),
                    Arc::clone(&self.prober),
                    self.capacity,
                );
                Ok(&*entry.insert(monitor))
            }
        }
    }

    /// Stops the monitor for `host` and forgets it, statistics included.
    pub async fn remove(&mut self, host: &Host) -> Result<(), RegistryError> {
        let mut monitor = self
            .monitors
            .remove(host)
            .ok_or_else(|| RegistryError::NotFound(host.to_string()))?;
        monitor.stop().await;
        Ok(())
    }

    pub fn pause_all(&self) {
        let paused = self.monitors.values().filter(|m| m.pause()).count();
        info!("Paused {paused} monitor(s)");
    }

    pub fn resume_all(&self) {
        let resumed = self.monitors.values().filter(|m| m.resume()).count();
        info!("Resumed {resumed} monitor(s)");
    }

    /// True when something is monitored and nothing is running.
    pub fn is_paused(&self) -> bool {
        !self.monitors.is_empty()
            && self
                .monitors
                .values()
                .all(|m| m.state() != RunState::Running)
    }

    /// Resumes everything when paused, pauses everything otherwise.
    pub fn toggle_pause(&self) {
        if self.is_paused() {
            self.resume_all();
        } else {
            self.pause_all();
        }
    }

    /// Applies to new monitors and every tracked one.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        for monitor in self.monitors.values() {
            monitor.set_capacity(self.capacity);
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, host: &Host) -> Option<&HostMonitor> {
        self.monitors.get(host)
    }

    pub fn contains(&self, host: &Host) -> bool {
        self.monitors.contains_key(host)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HostMonitor> {
        self.monitors.values()
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Stops and drops every monitor.
    pub async fn shutdown(&mut self) {
        for (_, mut monitor) in self.monitors.drain() {
            monitor.stop().await;
        }
    }
}
