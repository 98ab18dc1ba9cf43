#![allow(dead_code)]

use blocking_region::{
    BlockingCallRequest, LogicalThread, ManagedThread, ManagedValue, NativeValue, Scheduler,
    SchedulerError, SelectOutcome, SelectRequest, Selector, Symbol,
};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

/// Scheduler double: blocking calls run on a helper OS thread while the caller
/// polls for queued interrupts, the way a green-thread runtime would.
pub struct MockScheduler {
    pub live: AtomicUsize,
    pub sleeps: Mutex<Vec<u64>>,
    pub passes: AtomicUsize,
    pub blocking_calls: AtomicUsize,
    pub pending_interrupts: AtomicUsize,
    pub unblocks_delivered: AtomicUsize,
    pub fail_with: Mutex<Option<String>>,
    pub real_sleep: AtomicBool,
    pub current: Mutex<Option<LogicalThread>>,
}

impl MockScheduler {
    pub fn with_threads(live: usize) -> Arc<Self> {
        Arc::new(Self {
            live: AtomicUsize::new(live),
            sleeps: Mutex::new(Vec::new()),
            passes: AtomicUsize::new(0),
            blocking_calls: AtomicUsize::new(0),
            pending_interrupts: AtomicUsize::new(0),
            unblocks_delivered: AtomicUsize::new(0),
            fail_with: Mutex::new(None),
            real_sleep: AtomicBool::new(false),
            current: Mutex::new(None),
        })
    }

    pub fn interrupt(&self, times: usize) {
        self.pending_interrupts.store(times, Ordering::SeqCst);
    }

    pub fn fail(&self, message: &str) {
        *self.fail_with.lock() = Some(message.to_string());
    }

    fn check_failure(&self) -> Result<(), SchedulerError> {
        match self.fail_with.lock().as_ref() {
            Some(message) => Err(SchedulerError::new(message.clone())),
            None => Ok(()),
        }
    }
}

impl Scheduler for MockScheduler {
    fn sleep(&self, millis: u64) -> Result<(), SchedulerError> {
        self.check_failure()?;
        self.sleeps.lock().push(millis);

        if self.real_sleep.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(millis));
        }
        Ok(())
    }

    fn run_blocking(&self, request: BlockingCallRequest) -> Result<NativeValue, SchedulerError> {
        self.blocking_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        let unblocker = request.unblocker();
        let (tx, rx) = mpsc::channel();
        let worker = thread::spawn(move || {
            let _ = tx.send(request.run());
        });

        loop {
            match rx.recv_timeout(Duration::from_millis(5)) {
                Ok(value) => {
                    let _ = worker.join();
                    return Ok(value);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    let queued = self.pending_interrupts.load(Ordering::SeqCst);
                    if queued > 0 {
                        self.pending_interrupts.store(queued - 1, Ordering::SeqCst);
                        if let Some(handle) = &unblocker
                            && handle.unblock()
                        {
                            self.unblocks_delivered.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    return Err(SchedulerError::new("blocking call panicked"));
                }
            }
        }
    }

    fn live_threads(&self) -> Result<usize, SchedulerError> {
        self.check_failure()?;
        Ok(self.live.load(Ordering::SeqCst))
    }

    fn pass(&self) -> Result<(), SchedulerError> {
        self.check_failure()?;
        self.passes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn current(&self) -> Result<LogicalThread, SchedulerError> {
        self.check_failure()?;
        self.current
            .lock()
            .clone()
            .ok_or_else(|| SchedulerError::new("caller is not a logical thread"))
    }
}

/// Thread object double with a suspended flag and a slot map.
#[derive(Debug, Default)]
pub struct MockThread {
    pub suspended: AtomicBool,
    pub wakeups: AtomicUsize,
    pub locals: Mutex<HashMap<Symbol, ManagedValue>>,
}

impl MockThread {
    pub fn handle() -> (Arc<MockThread>, LogicalThread) {
        let thread = Arc::new(MockThread::default());
        let handle = LogicalThread::new(thread.clone());
        (thread, handle)
    }
}

impl ManagedThread for MockThread {
    fn wakeup(&self) -> Result<(), SchedulerError> {
        if self.suspended.swap(false, Ordering::SeqCst) {
            self.wakeups.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn local(&self, key: &Symbol) -> Result<Option<ManagedValue>, SchedulerError> {
        Ok(self.locals.lock().get(key).cloned())
    }

    fn set_local(&self, key: Symbol, value: ManagedValue) -> Result<(), SchedulerError> {
        self.locals.lock().insert(key, value);
        Ok(())
    }
}

/// Selector double replaying a fixed list of outcomes.
pub struct ScriptedSelector {
    outcomes: Mutex<VecDeque<SelectOutcome>>,
    pub calls: AtomicUsize,
    pub seen_read: Mutex<Vec<bool>>,
}

impl ScriptedSelector {
    pub fn new(outcomes: impl IntoIterator<Item = SelectOutcome>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            calls: AtomicUsize::new(0),
            seen_read: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Selector for ScriptedSelector {
    fn select(&self, request: &mut SelectRequest) -> SelectOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_read.lock().push(request.read().is_some());

        let outcome = self
            .outcomes
            .lock()
            .pop_front()
            .unwrap_or(SelectOutcome::Ready(1));

        if !outcome.is_ready() {
            if let Some(set) = request.read_mut() {
                set.clear();
            }
            if let Some(set) = request.write_mut() {
                set.clear();
            }
            if let Some(set) = request.except_mut() {
                set.clear();
            }
        }

        outcome
    }
}

/// Creates a pipe, returning `(read_end, write_end)`.
pub fn pipe() -> (i32, i32) {
    let mut fds = [0i32; 2];
    let res = unsafe { libc::pipe(fds.as_mut_ptr()) };
    assert_eq!(res, 0, "pipe() failed");
    (fds[0], fds[1])
}

pub fn close(fd: i32) {
    unsafe {
        libc::close(fd);
    }
}
