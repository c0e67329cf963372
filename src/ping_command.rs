use std::process::Stdio;
use std::time::Duration;

use log::{debug, warn};
use tokio::process::Command;
use tokio::time;

use crate::outcome::ProbeOutcome;
use crate::probe::{Prober, sanitize_address};

/// Extra time granted to the `ping` process beyond its own timeout.
const PROCESS_GRACE: Duration = Duration::from_millis(500);

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Probes by running the platform `ping` command once per probe.
#[derive(Debug, Default)]
pub struct SystemPing;

impl SystemPing {
    pub fn new() -> Self {
        Self
    }
}

impl Prober for SystemPing {
    async fn probe(&self, address: &str, timeout: Duration) -> ProbeOutcome {
        let Some(target) = sanitize_address(address) else {
            debug!("Refusing to ping invalid address {address:?}");
            return ProbeOutcome::Lost;
        };

        let mut command = Command::new("ping");
        command
            .args(ping_args(target, timeout))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        #[cfg(target_os = "windows")]
        command.creation_flags(CREATE_NO_WINDOW);

        match time::timeout(timeout + PROCESS_GRACE, command.output()).await {
            Ok(Ok(output)) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let latency = parse_ping_time(&stdout);
                if latency.is_none() {
                    debug!("No round trip time in ping output for {target}");
                }
                latency.into()
            }
            Ok(Ok(output)) => {
                debug!("ping {target} exited with {}", output.status);
                ProbeOutcome::Lost
            }
            Ok(Err(e)) => {
                warn!("Failed to run ping for {target}: {e}");
                ProbeOutcome::Lost
            }
            Err(_) => {
                debug!("ping {target} did not finish within {timeout:?}");
                ProbeOutcome::Lost
            }
        }
    }
}

fn timeout_secs(timeout: Duration) -> u64 {
    timeout.as_millis().div_ceil(1000).max(1) as u64
}

/// Arguments for a single echo request with the given wait.
pub fn ping_args(target: &str, timeout: Duration) -> Vec<String> {
    if cfg!(target_os = "windows") {
        vec![
            "-n".to_string(),
            "1".to_string(),
            "-w".to_string(),
            timeout.as_millis().to_string(),
            target.to_string(),
        ]
    } else if cfg!(target_os = "macos") {
        vec![
            "-c".to_string(),
            "1".to_string(),
            "-t".to_string(),
            timeout_secs(timeout).to_string(),
            target.to_string(),
        ]
    } else {
        vec![
            "-c".to_string(),
            "1".to_string(),
            "-W".to_string(),
            timeout_secs(timeout).to_string(),
            target.to_string(),
        ]
    }
}

/// Extracts the round trip time in whole milliseconds from `ping` output.
///
/// Understands `time=12ms` and `time<1ms` (Windows) as well as
/// `time=12.3 ms` (Linux, macOS). Fractions are truncated.
pub fn parse_ping_time(output: &str) -> Option<u64> {
    output.lines().find_map(|line| {
        let start = line.find("time=").or_else(|| line.find("time<"))?;
        let value: String = line[start + 5..]
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        value.parse::<f64>().ok().map(|ms| ms as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINUX_OUTPUT: &str = "PING 146.66.158.1 (146.66.158.1) 56(84) bytes of data.
64 bytes from 146.66.158.1: icmp_seq=1 ttl=54 time=37.8 ms

--- 146.66.158.1 ping statistics ---
1 packets transmitted, 1 received, 0% packet loss, time 0ms
rtt min/avg/max/mdev = 37.812/37.812/37.812/0.000 ms
";

    const MACOS_OUTPUT: &str = "PING 8.8.8.8 (8.8.8.8): 56 data bytes
64 bytes from 8.8.8.8: icmp_seq=0 ttl=117 time=14.052 ms
";

    const WINDOWS_OUTPUT: &str = "Pinging 185.25.182.1 with 32 bytes of data:
Reply from 185.25.182.1: bytes=32 time=48ms TTL=55

Ping statistics for 185.25.182.1:
    Packets: Sent = 1, Received = 1, Lost = 0 (0% loss),
";

    const WINDOWS_FAST_OUTPUT: &str = "Reply from 192.168.1.1: bytes=32 time<1ms TTL=64";

    const LOSS_OUTPUT: &str = "PING 10.255.255.1 (10.255.255.1) 56(84) bytes of data.

--- 10.255.255.1 ping statistics ---
1 packets transmitted, 0 received, 100% packet loss, time 0ms
";

    #[test]
    fn test_parse_linux() {
        assert_eq!(parse_ping_time(LINUX_OUTPUT), Some(37));
    }

    #[test]
    fn test_parse_macos() {
        assert_eq!(parse_ping_time(MACOS_OUTPUT), Some(14));
    }

    #[test]
    fn test_parse_windows() {
        assert_eq!(parse_ping_time(WINDOWS_OUTPUT), Some(48));
        assert_eq!(parse_ping_time(WINDOWS_FAST_OUTPUT), Some(1));
    }

    #[test]
    fn test_parse_loss_and_garbage() {
        assert_eq!(parse_ping_time(LOSS_OUTPUT), None);
        assert_eq!(parse_ping_time(""), None);
        assert_eq!(parse_ping_time("time=abc ms"), None);
        assert_eq!(parse_ping_time("Request timed out."), None);
    }

    #[test]
    fn test_timeout_is_rounded_up_to_seconds() {
        assert_eq!(timeout_secs(Duration::from_millis(4000)), 4);
        assert_eq!(timeout_secs(Duration::from_millis(4001)), 5);
        assert_eq!(timeout_secs(Duration::from_millis(10)), 1);
    }

    #[test]
    fn test_args_end_with_target() {
        let args = ping_args("vie.valve.net", Duration::from_millis(4000));
        assert_eq!(args.last().map(String::as_str), Some("vie.valve.net"));
        assert_eq!(args[1], "1");
        if cfg!(target_os = "windows") {
            assert_eq!(args[0], "-n");
            assert_eq!(args[3], "4000");
        } else {
            assert_eq!(args[0], "-c");
            assert_eq!(args[3], "4");
        }
    }

    #[tokio::test]
    async fn test_invalid_address_is_lost_without_spawning() {
        let outcome = SystemPing::new()
            .probe("--flood", Duration::from_millis(100))
            .await;
        assert_eq!(outcome, ProbeOutcome::Lost);
    }
}
