//! Cancellable deferred tasks
//!
//! Debounced draft writes are scheduled through the [`Scheduler`] trait so the
//! same code runs on a tokio `LocalSet` in the binary and on a virtual clock
//! in tests.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::AbortHandle;

pub type Task = Box<dyn FnOnce()>;

pub trait Scheduler {
    /// Run `task` once after `delay` unless the returned handle is cancelled first
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;
}

/// Handle to a scheduled task
#[derive(Debug, Clone, Default)]
pub struct TaskHandle {
    cancelled: Rc<Cell<bool>>,
    abort: Option<AbortHandle>,
}

impl TaskHandle {
    pub fn cancel(&self) {
        self.cancelled.set(true);
        if let Some(abort) = &self.abort {
            abort.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

struct Pending {
    due: Duration,
    seq: u64,
    handle: TaskHandle,
    task: Task,
}

#[derive(Default)]
struct ManualInner {
    now: Duration,
    seq: u64,
    tasks: Vec<Pending>,
}

/// Virtual-clock scheduler; nothing runs until the clock is advanced
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualInner>>,
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ManualScheduler")
            .field("now", &inner.now)
            .field("pending", &inner.tasks.len())
            .finish()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Tasks scheduled and not yet run or cancelled
    pub fn pending(&self) -> usize {
        self.inner.borrow().tasks.iter().filter(|p| !p.handle.is_cancelled()).count()
    }

    /// Move the clock forward, running due tasks in due order
    ///
    /// Tasks scheduled by a running task are picked up if they fall due
    /// within the same advance.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        while let Some(pending) = self.pop_due(target) {
            if !pending.handle.is_cancelled() {
                (pending.task)();
            }
        }
        self.inner.borrow_mut().now = target;
    }

    /// Run every pending task regardless of its due time
    pub fn run_pending(&self) {
        while let Some(pending) = self.pop_due(Duration::MAX) {
            if !pending.handle.is_cancelled() {
                (pending.task)();
            }
        }
    }

    fn pop_due(&self, target: Duration) -> Option<Pending> {
        let mut inner = self.inner.borrow_mut();
        let idx = inner
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= target)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        let pending = inner.tasks.remove(idx);
        if pending.due > inner.now {
            inner.now = pending.due;
        }
        Some(pending)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let mut inner = self.inner.borrow_mut();
        inner.seq += 1;
        let handle = TaskHandle::default();
        let pending = Pending {
            due: inner.now + delay,
            seq: inner.seq,
            handle: handle.clone(),
            task,
        };
        inner.tasks.push(pending);
        handle
    }
}

/// Scheduler backed by `tokio::task::spawn_local`
///
/// Must be used from inside a `tokio::task::LocalSet`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let cancelled = Rc::new(Cell::new(false));
        let flag = Rc::clone(&cancelled);
        let join = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            if !flag.get() {
                task();
            }
        });
        TaskHandle {
            cancelled,
            abort: Some(join.abort_handle()),
        }
    }
}
