use std::time::Duration;

/// Handle to a scheduled timer, returned by [`Scheduler::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Pending<E> {
    handle: TimerHandle,
    due: Duration,
    event: E,
}

/// Delayed events driven by `advance`.
///
/// Each component owns its own scheduler and calls [`Scheduler::cancel_all`]
/// when it is deactivated, so nothing fires against a hidden screen.
#[derive(Debug)]
pub struct Scheduler<E> {
    now: Duration,
    next_handle: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 0,
            pending: Vec::new(),
        }
    }

    /// Time accumulated through [`Scheduler::advance`].
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(Pending {
            handle,
            due: self.now + delay,
            event,
        });
        handle
    }

    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Moves the clock forward and returns the events that came due, earliest
    /// first. Timers with the same due time fire in scheduling order.
    pub fn advance(&mut self, dt: Duration) -> Vec<E> {
        self.now += dt;
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = waiting;

        // stable sort keeps scheduling order for ties
        due.sort_by_key(|p| p.due);
        due.into_iter().map(|p| p.event).collect()
    }
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn fires_after_delay() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(MS * 100, "advance");

        assert!(scheduler.advance(MS * 99).is_empty());
        assert_eq!(scheduler.advance(MS), vec!["advance"]);
        assert!(scheduler.advance(MS * 1000).is_empty());
    }

    #[test]
    fn due_order_then_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(MS * 30, 'c');
        scheduler.schedule(MS * 10, 'a');
        scheduler.schedule(MS * 30, 'd');
        scheduler.schedule(MS * 20, 'b');

        assert_eq!(scheduler.advance(MS * 50), vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut scheduler = Scheduler::new();
        let keep = scheduler.schedule(MS * 10, 1);
        let dropped = scheduler.schedule(MS * 10, 2);

        assert!(scheduler.cancel(dropped));
        assert!(!scheduler.cancel(dropped));
        assert!(scheduler.is_pending(keep));
        assert_eq!(scheduler.advance(MS * 10), vec![1]);
    }

    #[test]
    fn cancel_all_clears_everything() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(MS, ());
        scheduler.schedule(MS * 2, ());

        assert_eq!(scheduler.cancel_all(), 2);
        assert_eq!(scheduler.pending_count(), 0);
        assert!(scheduler.advance(MS * 10).is_empty());
    }

    #[test]
    fn delay_is_relative_to_current_clock() {
        let mut scheduler = Scheduler::new();
        scheduler.advance(MS * 500);
        scheduler.schedule(MS * 100, "late");

        assert!(scheduler.advance(MS * 50).is_empty());
        assert_eq!(scheduler.advance(MS * 50), vec!["late"]);
        assert_eq!(scheduler.now(), MS * 700);
    }
}
