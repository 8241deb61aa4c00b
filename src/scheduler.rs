//! Cancellable tasks for the frame loop.
//!
//! The binary drives two repeating tasks per session (update+render and
//! input sampling) plus one-shot timers (delayed game over, end of a level
//! transition).  Every task is identified by a `TaskHandle`; cancelling a
//! handle takes effect immediately, so a callback still holding a handle from
//! an earlier session is refused instead of touching the fresh state.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct Timer<T> {
    handle: TaskHandle,
    due: u64,
    action: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    next_id: u64,
    repeating: Vec<TaskHandle>,
    timers: Vec<Timer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Scheduler {
            next_id: 1,
            repeating: Vec::new(),
            timers: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        handle
    }

    /// Register a task that runs every frame until cancelled.
    pub fn spawn_repeating(&mut self) -> TaskHandle {
        let handle = self.allocate();
        self.repeating.push(handle);
        handle
    }

    /// Register `action` to fire once `now >= due`.
    pub fn schedule_once(&mut self, due: u64, action: T) -> TaskHandle {
        let handle = self.allocate();
        self.timers.push(Timer { handle, due, action });
        handle
    }

    /// Returns whether the handle was still live.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.repeating.len() + self.timers.len();
        self.repeating.retain(|h| *h != handle);
        self.timers.retain(|t| t.handle != handle);
        before != self.repeating.len() + self.timers.len()
    }

    pub fn cancel_all(&mut self) {
        self.repeating.clear();
        self.timers.clear();
    }

    pub fn is_live(&self, handle: TaskHandle) -> bool {
        self.repeating.contains(&handle) || self.timers.iter().any(|t| t.handle == handle)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Remove and return every timer action that is due, earliest first.
    /// Timers due at the same instant keep their scheduling order.
    pub fn take_due(&mut self, now: u64) -> Vec<T> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.timers.len() {
            if self.timers[i].due <= now {
                due.push(self.timers.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|t| (t.due, t.handle.0));
        due.into_iter().map(|t| t.action).collect()
    }
}
