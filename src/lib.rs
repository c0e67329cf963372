pub mod app;
pub mod config;
pub mod dns_cache;
pub mod error;
pub mod host;
pub mod latency_color;
pub mod monitor;
pub mod outcome;
pub mod ping_command;
pub mod ping_executor;
pub mod probe;
pub mod registry;
pub mod sample_buffer;
pub mod statistics;

pub use app::PinguinApp;
pub use config::AppConfig;
pub use error::{ConfigError, RegistryError};
pub use host::{Host, default_hosts};
pub use monitor::{HostMonitor, MonitorView, PROBE_INTERVAL, PROBE_TIMEOUT, RunState};
pub use outcome::ProbeOutcome;
pub use ping_command::SystemPing;
pub use ping_executor::IcmpPing;
pub use probe::{BackendKind, ProbeBackend, Prober};
pub use registry::MonitorRegistry;
pub use sample_buffer::RollingSampleBuffer;
pub use statistics::{ProbeStatistics, StatsSnapshot};
