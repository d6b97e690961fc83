use super::timer::{TimerKind, TimerSet};
use crate::messaging::ControlMessage;
use crate::types::{Frame, Payload};
use std::time::Duration;

/// Liveness monitoring for an open link.
///
/// Any inbound traffic counts as a sign of life, not only a reply to the ping,
/// so the monitor only tracks whether a grace period is running.
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatManager {
    interval: Duration,
    timeout: Duration,
}

impl HeartbeatManager {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Frame sent on every tick.
    pub fn ping_frame() -> Frame {
        Payload::from(ControlMessage::Ping).encode()
    }

    /// Starts the periodic ping; the first fires one interval from now.
    pub fn start(&self, timers: &mut TimerSet) {
        tracing::debug!(interval = ?self.interval, "Heartbeat started");
        timers.arm_every(TimerKind::HeartbeatInterval, self.interval);
    }

    /// Starts (or restarts) the grace period after a ping.
    pub fn await_traffic(&self, timers: &mut TimerSet) {
        timers.arm_once(TimerKind::HeartbeatTimeout, self.timeout);
    }

    /// Inbound traffic arrived; the link is alive.
    pub fn traffic_received(timers: &mut TimerSet) {
        timers.disarm(TimerKind::HeartbeatTimeout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::timer::TimerFired;
    use tokio::sync::mpsc;
    use tokio::time;

    #[test]
    fn test_ping_frame() {
        assert_eq!(HeartbeatManager::ping_frame(), Frame::Text(r#"{"type":"ping"}"#.to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_traffic_cancels_grace_period() {
        let (tx, mut rx) = mpsc::unbounded_channel::<TimerFired>();
        let mut timers = TimerSet::new(tx);
        let heartbeat = HeartbeatManager::new(Duration::from_secs(30), Duration::from_secs(5));

        heartbeat.await_traffic(&mut timers);
        HeartbeatManager::traffic_received(&mut timers);

        time::sleep(Duration::from_secs(6)).await;
        assert!(rx.try_recv().is_err());
    }
}
