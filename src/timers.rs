// Copyright (C) 2020-2024 Andy Kurnia.

use rustc_hash::FxHashMap;
use std::time::Duration;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TimerId(u64);

// One-shot timers. A fired timer is reported back to whoever drives the
// scheduler, which then hands it to the round. Once cancel returns, the
// timer must never be reported.
pub trait Scheduler {
    fn arm(&mut self, after: Duration) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}

// Virtual time, advanced by hand.
#[derive(Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    pending: Vec<(Duration, TimerId)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[inline(always)]
    pub fn num_pending(&self) -> usize {
        self.pending.len()
    }

    // Moves the clock forward and returns the timers that came due, earliest
    // first.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        self.now += by;
        let now = self.now;
        let mut due = Vec::new();
        self.pending.retain(|&(deadline, id)| {
            if deadline <= now {
                due.push((deadline, id));
                false
            } else {
                true
            }
        });
        due.sort_unstable_by_key(|&(deadline, id)| (deadline, id.0));
        due.into_iter().map(|(_, id)| id).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn arm(&mut self, after: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push((self.now + after, id));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|&(_, pending_id)| pending_id != id);
    }
}

// Each timer is a sleeping tokio task that sends its id when it wakes. The
// receiving loop must claim an id before acting on it: a timer cancelled
// after its message was queued is no longer claimable.
pub struct TokioScheduler {
    fired: tokio::sync::mpsc::UnboundedSender<TimerId>,
    live: FxHashMap<TimerId, tokio::task::JoinHandle<()>>,
    next_id: u64,
}

impl TokioScheduler {
    pub fn new(fired: tokio::sync::mpsc::UnboundedSender<TimerId>) -> Self {
        Self {
            fired,
            live: FxHashMap::default(),
            next_id: 0,
        }
    }

    pub fn claim(&mut self, id: TimerId) -> bool {
        self.live.remove(&id).is_some()
    }
}

impl Scheduler for TokioScheduler {
    fn arm(&mut self, after: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let fired = self.fired.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            // nobody is listening once the host loop is gone.
            let _ = fired.send(id);
        });
        self.live.insert(id, handle);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.live.remove(&id) {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.live.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_fires_in_deadline_order() {
        let mut scheduler = ManualScheduler::new();
        let late = scheduler.arm(Duration::from_millis(300));
        let early = scheduler.arm(Duration::from_millis(100));
        assert!(scheduler.advance(Duration::from_millis(99)).is_empty());
        assert_eq!(scheduler.advance(Duration::from_millis(1)), [early]);
        assert_eq!(scheduler.num_pending(), 1);
        assert_eq!(scheduler.advance(Duration::from_secs(1)), [late]);
        assert_eq!(scheduler.now(), Duration::from_millis(1300));
    }

    #[test]
    fn manual_cancel_is_final() {
        let mut scheduler = ManualScheduler::new();
        let id = scheduler.arm(Duration::from_millis(10));
        scheduler.cancel(id);
        scheduler.cancel(id);
        assert!(scheduler.advance(Duration::from_secs(60)).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_fires_after_the_delay() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);
        let t0 = tokio::time::Instant::now();
        let id = scheduler.arm(Duration::from_secs(30));
        assert_eq!(rx.recv().await, Some(id));
        assert!(t0.elapsed() >= Duration::from_secs(30));
        assert!(scheduler.claim(id));
        assert!(!scheduler.claim(id));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_cancel_is_final() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);
        let cancelled = scheduler.arm(Duration::from_secs(1));
        let kept = scheduler.arm(Duration::from_secs(2));
        scheduler.cancel(cancelled);
        assert_eq!(rx.recv().await, Some(kept));
        assert!(!scheduler.claim(cancelled));
        assert!(scheduler.claim(kept));
    }
}
