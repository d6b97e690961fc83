use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// The named timers a client can have armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Aborts a handshake that takes too long
    ConnectTimeout,
    /// Periodic liveness ping while connected
    HeartbeatInterval,
    /// Grace period for inbound traffic after a ping
    HeartbeatTimeout,
    /// Delay before the next reconnect attempt
    Reconnect,
}

/// Delivered to the owner when a timer expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub kind: TimerKind,
    pub generation: u64,
}

struct ArmedTimer {
    generation: u64,
    repeating: bool,
    handle: JoinHandle<()>,
}

/// Owns every scheduled timer of a client.
///
/// Each timer is a background task that reports [`TimerFired`] on the owner's
/// channel. Re-arming a kind replaces the previous timer, and every fire
/// carries a generation so a fire that raced with a disarm is rejected by
/// [`TimerSet::accept`].
pub struct TimerSet {
    tx: mpsc::UnboundedSender<TimerFired>,
    armed: HashMap<TimerKind, ArmedTimer>,
    generation: u64,
}

impl TimerSet {
    pub fn new(tx: mpsc::UnboundedSender<TimerFired>) -> Self {
        Self {
            tx,
            armed: HashMap::new(),
            generation: 0,
        }
    }

    /// Fires once after `delay`, replacing any timer of the same kind
    pub fn arm_once(&mut self, kind: TimerKind, delay: Duration) {
        let generation = self.next_generation();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(TimerFired { kind, generation });
        });
        self.insert(kind, generation, false, handle);
    }

    /// Fires every `period`, first one period from now
    pub fn arm_every(&mut self, kind: TimerKind, period: Duration) {
        let generation = self.next_generation();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if tx.send(TimerFired { kind, generation }).is_err() {
                    break;
                }
            }
        });
        self.insert(kind, generation, true, handle);
    }

    pub fn disarm(&mut self, kind: TimerKind) {
        if let Some(timer) = self.armed.remove(&kind) {
            timer.handle.abort();
            tracing::trace!(?kind, "Timer disarmed");
        }
    }

    /// Abort all tracked timers
    pub fn disarm_all(&mut self) {
        for (_, timer) in self.armed.drain() {
            timer.handle.abort();
        }
    }

    /// Checks that a fire belongs to the currently armed timer of its kind.
    ///
    /// One-shot timers are forgotten once accepted.
    pub fn accept(&mut self, fired: TimerFired) -> bool {
        let Some(timer) = self.armed.get(&fired.kind) else {
            return false;
        };
        if timer.generation != fired.generation {
            return false;
        }
        if !timer.repeating {
            self.armed.remove(&fired.kind);
        }
        true
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.armed.contains_key(&kind)
    }

    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn insert(&mut self, kind: TimerKind, generation: u64, repeating: bool, handle: JoinHandle<()>) {
        tracing::trace!(?kind, generation, repeating, "Timer armed");
        let previous = self.armed.insert(
            kind,
            ArmedTimer {
                generation,
                repeating,
                handle,
            },
        );
        if let Some(previous) = previous {
            previous.handle.abort();
        }
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.disarm_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer_set() -> (TimerSet, mpsc::UnboundedReceiver<TimerFired>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (TimerSet::new(tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_fires_after_delay() {
        let (mut timers, mut rx) = timer_set();
        timers.arm_once(TimerKind::Reconnect, Duration::from_millis(100));

        time::sleep(Duration::from_millis(99)).await;
        assert!(rx.try_recv().is_err());

        time::sleep(Duration::from_millis(2)).await;
        let fired = rx.try_recv().unwrap();
        assert_eq!(fired.kind, TimerKind::Reconnect);
        assert!(timers.accept(fired));
        assert!(!timers.is_armed(TimerKind::Reconnect));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_rejects_stale_fire() {
        let (mut timers, mut rx) = timer_set();
        timers.arm_once(TimerKind::HeartbeatTimeout, Duration::from_millis(10));
        time::sleep(Duration::from_millis(20)).await;
        let stale = rx.try_recv().unwrap();

        timers.arm_once(TimerKind::HeartbeatTimeout, Duration::from_millis(10));
        assert!(!timers.accept(stale));
        assert!(timers.is_armed(TimerKind::HeartbeatTimeout));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeating_timer_stays_armed() {
        let (mut timers, mut rx) = timer_set();
        timers.arm_every(TimerKind::HeartbeatInterval, Duration::from_millis(50));

        time::sleep(Duration::from_millis(160)).await;
        let mut fires = 0;
        while let Ok(fired) = rx.try_recv() {
            assert!(timers.accept(fired));
            fires += 1;
        }
        assert_eq!(fires, 3);
        assert!(timers.is_armed(TimerKind::HeartbeatInterval));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarm_all_leaves_nothing_running() {
        let (mut timers, mut rx) = timer_set();
        timers.arm_once(TimerKind::ConnectTimeout, Duration::from_millis(10));
        timers.arm_every(TimerKind::HeartbeatInterval, Duration::from_millis(10));
        timers.arm_once(TimerKind::Reconnect, Duration::from_millis(10));

        timers.disarm_all();
        assert_eq!(timers.armed_count(), 0);

        time::sleep(Duration::from_secs(60)).await;
        assert!(rx.try_recv().is_err());
    }
}
