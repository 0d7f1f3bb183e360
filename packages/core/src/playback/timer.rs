//! Cooperative timer queue driven by explicit time
//!
//! Time is a [`Duration`] since an arbitrary origin chosen by the caller.
//! Nothing fires on its own: the owner calls [`TimerQueue::due`] from its
//! tick and dispatches whatever came due.

use std::collections::HashMap;
use std::time::Duration;

/// Handle of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer {
    deadline: Duration,
    period: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    timers: HashMap<TimerId, Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, timer: Timer) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.insert(id, timer);
        id
    }

    /// Fire once at `now + delay`
    pub fn schedule_once(&mut self, now: Duration, delay: Duration) -> TimerId {
        self.insert(Timer {
            deadline: now + delay,
            period: None,
        })
    }

    /// Fire every `period` starting at `now + period`. A zero period is
    /// bumped to one millisecond.
    pub fn schedule_repeating(&mut self, now: Duration, period: Duration) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.insert(Timer {
            deadline: now + period,
            period: Some(period),
        })
    }

    /// Returns true if the timer was still pending
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Collect every firing at or before `now`, ordered by deadline.
    /// One-shot timers are removed; repeating timers yield one firing per
    /// elapsed period and stay scheduled.
    pub fn due(&mut self, now: Duration) -> Vec<TimerId> {
        let mut fired: Vec<(Duration, TimerId)> = Vec::new();
        let mut finished = Vec::new();

        for (&id, timer) in self.timers.iter_mut() {
            match timer.period {
                None if timer.deadline <= now => {
                    fired.push((timer.deadline, id));
                    finished.push(id);
                }
                None => {}
                Some(period) => {
                    while timer.deadline <= now {
                        fired.push((timer.deadline, id));
                        timer.deadline += period;
                    }
                }
            }
        }

        for id in finished {
            self.timers.remove(&id);
        }

        fired.sort();
        fired.into_iter().map(|(_, id)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_once(ms(0), ms(1500));

        assert!(queue.due(ms(1499)).is_empty());
        assert_eq!(queue.due(ms(1500)), vec![id]);
        assert!(queue.due(ms(5000)).is_empty());
        assert!(!queue.is_pending(id));
    }

    #[test]
    fn test_repeating_catches_up() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_repeating(ms(0), ms(1000));

        assert_eq!(queue.due(ms(3500)), vec![id, id, id]);
        assert_eq!(queue.due(ms(4000)), vec![id]);
        assert!(queue.is_pending(id));
    }

    #[test]
    fn test_ordering_by_deadline() {
        let mut queue = TimerQueue::new();
        let late = queue.schedule_once(ms(0), ms(900));
        let early = queue.schedule_once(ms(0), ms(100));
        assert_eq!(queue.due(ms(1000)), vec![early, late]);
    }

    #[test]
    fn test_cancel() {
        let mut queue = TimerQueue::new();
        let a = queue.schedule_once(ms(0), ms(10));
        let b = queue.schedule_repeating(ms(0), ms(10));
        assert!(queue.cancel(a));
        assert!(!queue.cancel(a));
        assert_eq!(queue.len(), 1);

        queue.cancel_all();
        assert!(queue.is_empty());
        assert!(queue.due(ms(100)).is_empty());
        assert!(!queue.is_pending(b));
    }
}
