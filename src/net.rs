use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::event::AppEvent;

pub const PROBE_TARGET: &str = "generativelanguage.googleapis.com:443";
const PROBE_TIMEOUT: Duration = Duration::from_millis(1500);

fn resolve_addr(target: &str) -> Result<SocketAddr> {
    if let Ok(addr) = target.parse::<SocketAddr>() {
        return Ok(addr);
    }
    target
        .to_socket_addrs()
        .with_context(|| format!("failed to resolve {target}"))?
        .next()
        .with_context(|| format!("no addresses resolved for {target}"))
}

/// One reachability check: resolve and open a TCP connection.
pub fn probe(target: &str, timeout: Duration) -> bool {
    let result = resolve_addr(target).and_then(|addr| {
        TcpStream::connect_timeout(&addr, timeout)
            .map(|_| ())
            .with_context(|| format!("connect to {addr} failed"))
    });
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("connectivity probe failed: {e:#}");
            false
        }
    }
}

/// Remembers the last reported state so only transitions are posted.
#[derive(Debug, Default)]
pub struct ConnectivityTracker {
    last: Option<bool>,
}

impl ConnectivityTracker {
    /// Returns the new state when it differs from the last observation.
    pub fn observe(&mut self, online: bool) -> Option<bool> {
        if self.last == Some(online) {
            return None;
        }
        self.last = Some(online);
        Some(online)
    }
}

/// Probe `target` every `interval` on a background thread and post
/// `AppEvent::Connectivity` whenever the result changes.
pub fn spawn_monitor(target: String, interval: Duration, tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let mut tracker = ConnectivityTracker::default();
        loop {
            let online = probe(&target, PROBE_TIMEOUT);
            if let Some(state) = tracker.observe(online) {
                tracing::info!("connectivity changed: online={state}");
                if tx.send(AppEvent::Connectivity(state)).is_err() {
                    return;
                }
            }
            thread::sleep(interval);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_tracker_reports_only_changes() {
        let mut tracker = ConnectivityTracker::default();
        assert_eq!(tracker.observe(true), Some(true));
        assert_eq!(tracker.observe(true), None);
        assert_eq!(tracker.observe(false), Some(false));
        assert_eq!(tracker.observe(false), None);
        assert_eq!(tracker.observe(true), Some(true));
    }

    #[test]
    fn test_probe_reaches_local_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let target = listener.local_addr().unwrap().to_string();
        assert!(probe(&target, Duration::from_millis(500)));
    }

    #[test]
    fn test_probe_fails_for_unresolvable_host() {
        assert!(!probe("no-such-host.invalid:443", Duration::from_millis(200)));
    }
}
