//! Timer queue - a deterministic [`Scheduler`].
//!
//! Pending tasks are ordered by due time, ties broken by scheduling order.
//! Time only moves when the host pops due tasks, so tests can replay a whole
//! game in virtual milliseconds.

use std::collections::BTreeMap;

use crate::collab::{Scheduler, Task, TaskHandle};

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_id: u64,
    pending: BTreeMap<(u64, u64), Task>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current queue time (the due time of the last fired task, or the last
    /// time passed to [`TimerQueue::pop_due`]).
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// When the earliest pending task is due.
    pub fn next_due(&self) -> Option<u64> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether a task of this kind is waiting.
    pub fn contains(&self, task: Task) -> bool {
        self.pending.values().any(|t| *t == task)
    }

    /// Pop the earliest task due at or before `now_ms`.
    ///
    /// Queue time advances to the task's due time, so anything it schedules
    /// is timed from when it was meant to fire. Once nothing is due, queue
    /// time catches up to `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TaskHandle, Task)> {
        let key = match self.pending.keys().next() {
            Some(key) if key.0 <= now_ms => *key,
            _ => {
                self.now_ms = self.now_ms.max(now_ms);
                return None;
            }
        };
        let task = self.pending.remove(&key)?;
        self.now_ms = self.now_ms.max(key.0);
        Some((TaskHandle(key.1), task))
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, delay_ms: u64, task: Task) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.insert((self.now_ms + delay_ms, id), task);
        TaskHandle(id)
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.pending.retain(|(_, id), _| *id != handle.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_due_order() {
        let mut queue = TimerQueue::new();
        let spawn = queue.schedule(300, Task::Spawn);
        let tick = queue.schedule(100, Task::Tick);
        let step = queue.schedule(100, Task::ClearStep(0));

        assert_eq!(queue.pop_due(50), None);
        assert_eq!(queue.now_ms(), 50);
        assert_eq!(queue.pop_due(1_000), Some((tick, Task::Tick)));
        assert_eq!(queue.now_ms(), 100);
        assert_eq!(queue.pop_due(1_000), Some((step, Task::ClearStep(0))));
        assert_eq!(queue.pop_due(1_000), Some((spawn, Task::Spawn)));
        assert_eq!(queue.pop_due(1_000), None);
        assert_eq!(queue.now_ms(), 1_000);
    }

    #[test]
    fn schedule_is_relative_to_queue_time() {
        let mut queue = TimerQueue::new();
        queue.schedule(100, Task::Tick);
        queue.pop_due(500);
        queue.schedule(100, Task::Spawn);
        assert_eq!(queue.next_due(), Some(200));
    }

    #[test]
    fn cancel_removes_by_identity() {
        let mut queue = TimerQueue::new();
        let first = queue.schedule(10, Task::Tick);
        let second = queue.schedule(10, Task::Tick);
        queue.cancel(first);
        queue.cancel(first);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_due(10), Some((second, Task::Tick)));
        assert!(queue.is_empty());
    }
}
