use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::host::Host;
use crate::outcome::ProbeOutcome;
use crate::probe::Prober;
use crate::sample_buffer::RollingSampleBuffer;
use crate::statistics::{ProbeStatistics, StatsSnapshot};

/// Time between probe launches.
pub const PROBE_INTERVAL: Duration = Duration::from_millis(1000);
/// Longest a single probe may wait for its reply.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    /// Terminal.
    Stopped,
}

/// What a monitor publishes after each applied outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorView {
    pub stats: StatsSnapshot,
    pub samples: Vec<ProbeOutcome>,
}

/// Probes one host once per [`PROBE_INTERVAL`] on its own task.
///
/// The task exclusively owns the host's statistics and sample buffer and
/// publishes a fresh [`MonitorView`] after every outcome, so readers on
/// other threads never observe a half-applied update. At most one probe is
/// in flight: ticks that come due while a probe is outstanding are skipped.
pub struct HostMonitor {
    host: Host,
    control: watch::Sender<RunState>,
    capacity: watch::Sender<usize>,
    view: watch::Receiver<MonitorView>,
    task: Option<JoinHandle<()>>,
}

impl HostMonitor {
    /// Starts monitoring `host` in the [`RunState::Running`] state. The first
    /// probe is launched right away.
    pub fn spawn<P: Prober>(runtime: &Handle, host: Host, prober: Arc<P>, capacity: usize) -> Self {
        let (control, control_rx) = watch::channel(RunState::Running);
        let (capacity, capacity_rx) = watch::channel(capacity.max(1));
        let (view_tx, view) = watch::channel(MonitorView::default());

        let task = runtime.spawn(run_monitor(
            host.clone(),
            prober,
            control_rx,
            capacity_rx,
            view_tx,
        ));
        info!("Started monitoring {host}");

        Self {
            host,
            control,
            capacity,
            view,
            task: Some(task),
        }
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn state(&self) -> RunState {
        *self.control.borrow()
    }

    /// Running -> Paused. Returns whether the state changed.
    ///
    /// A probe in flight is cancelled and its result discarded; statistics
    /// and samples are kept.
    pub fn pause(&self) -> bool {
        let paused = self.control.send_if_modified(|state| {
            if *state == RunState::Running {
                *state = RunState::Paused;
                true
            } else {
                false
            }
        });
        if paused {
            debug!("Paused {}", self.host);
        }
        paused
    }

    /// Paused -> Running. Returns whether the state changed.
    pub fn resume(&self) -> bool {
        let resumed = self.control.send_if_modified(|state| {
            if *state == RunState::Paused {
                *state = RunState::Running;
                true
            } else {
                false
            }
        });
        if resumed {
            debug!("Resumed {}", self.host);
        }
        resumed
    }

    /// Moves to [`RunState::Stopped`] and waits for the task to exit.
    ///
    /// An in-flight probe is cancelled, so this returns without waiting for
    /// the probe timeout. Once it returns the view no longer changes.
    pub async fn stop(&mut self) {
        self.control.send_replace(RunState::Stopped);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Monitor task for {} ended abnormally: {e}", self.host);
            }
            info!("Stopped monitoring {}", self.host);
        }
    }

    /// Sample buffer capacity, normally derived from the graph width.
    pub fn set_capacity(&self, capacity: usize) {
        self.capacity.send_replace(capacity.max(1));
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.view.borrow().stats
    }

    pub fn recent_samples(&self) -> Vec<ProbeOutcome> {
        self.view.borrow().samples.clone()
    }

    pub fn view(&self) -> MonitorView {
        self.view.borrow().clone()
    }
}

impl Drop for HostMonitor {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_monitor<P: Prober>(
    host: Host,
    prober: Arc<P>,
    mut control: watch::Receiver<RunState>,
    mut capacity: watch::Receiver<usize>,
    view: watch::Sender<MonitorView>,
) {
    let mut statistics = ProbeStatistics::new();
    let mut samples = RollingSampleBuffer::new(*capacity.borrow_and_update());

    let mut ticker = time::interval(PROBE_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_completed: Option<Instant> = None;

    loop {
        let state = *control.borrow_and_update();
        if state == RunState::Stopped {
            break;
        }

        let scheduled = tokio::select! {
            biased;
            changed = control.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            changed = capacity.changed() => {
                if changed.is_err() {
                    break;
                }
                // Shrinking may clear the samples, paused or not.
                samples.set_capacity(*capacity.borrow_and_update());
                publish(&view, &statistics, &samples);
                continue;
            }
            scheduled = ticker.tick() => scheduled,
        };

        if state == RunState::Paused {
            continue;
        }
        // This tick came due while the previous probe was still running.
        if last_completed.is_some_and(|completed| scheduled < completed) {
            continue;
        }

        let outcome = tokio::select! {
            biased;
            _ = control.changed() => {
                debug!("Discarding in-flight probe to {host}");
                continue;
            }
            outcome = prober.probe(host.address(), PROBE_TIMEOUT) => outcome,
        };
        last_completed = Some(Instant::now());

        statistics.update(outcome);
        samples.set_capacity(*capacity.borrow_and_update());
        samples.append(outcome);
        publish(&view, &statistics, &samples);
    }

    debug!("Monitor task for {host} exited");
}

fn publish(
    view: &watch::Sender<MonitorView>,
    statistics: &ProbeStatistics,
    samples: &RollingSampleBuffer,
) {
    view.send_replace(MonitorView {
        stats: statistics.snapshot(),
        samples: samples.snapshot(),
    });
}
