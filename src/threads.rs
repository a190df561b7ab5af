use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use thiserror::Error;
use tracing::{trace, warn};

/// Splits a half-open range into `n` contiguous parts.
///
/// The first `len % n` parts are one element longer than the rest. When `n`
/// exceeds the length the trailing parts are empty.
pub struct RangeSplitter;

impl RangeSplitter {
    pub fn split(start: usize, end: usize, n: usize) -> Vec<(usize, usize)> {
        if n == 0 {
            return vec![];
        }
        let len = end.saturating_sub(start);
        let size = len / n;
        let size_xtra = len % n;

        let mut parts = Vec::with_capacity(n);
        let mut m = start;
        for i in 0..n {
            let k = if i < size_xtra { m + size + 1 } else { m + size };
            parts.push((m, k));
            m = k;
        }
        parts
    }
}

#[derive(Debug)]
pub struct SplitPart<T> {
    pub n: usize,
    pub part: T,
}

impl<T> SplitPart<T> {
    pub fn new(part: T, n: usize) -> Self {
        Self { part, n }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("worker pool is shut down")]
    ShutDown,

    #[error("task {n} panicked: {message}")]
    Panicked { n: usize, message: String },

    #[error("task {0} was lost before reporting")]
    Lost(usize),
}

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Worker {
    tx: Option<mpsc::Sender<Job>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn spawn(id: usize) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel::<Job>();
        let handle = thread::Builder::new()
            .name(format!("mandelstrip-worker-{}", id))
            .spawn(move || {
                while let Ok(job) = rx.recv() {
                    job();
                }
                trace!(worker = id, "job channel closed");
            })?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    fn send(&self, job: Job) -> Result<(), PoolError> {
        match &self.tx {
            Some(tx) => tx.send(job).map_err(|_| PoolError::ShutDown),
            None => Err(PoolError::ShutDown),
        }
    }
}

/// Fixed-size pool of worker threads.
///
/// Every worker owns its own job queue and jobs are dealt out round-robin,
/// so the pool never rebalances work once it is submitted. Results travel
/// back on a channel created per [`WorkerPool::scatter`] call, which keeps
/// concurrent callers from ever seeing each other's outputs.
pub struct WorkerPool {
    workers: Vec<Worker>,
    next: AtomicUsize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            match Worker::spawn(id) {
                Ok(worker) => workers.push(worker),
                Err(e) => warn!(worker = id, error = %e, "failed to spawn worker thread"),
            }
        }
        Self {
            workers,
            next: AtomicUsize::new(0),
        }
    }

    pub fn with_physical_cpus() -> Self {
        Self::new(num_cpus::get_physical())
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    fn submit(&self, job: Job) -> Result<(), PoolError> {
        if self.workers.is_empty() {
            return Err(PoolError::ShutDown);
        }
        let i = self.next.fetch_add(1, Ordering::Relaxed) % self.workers.len();
        self.workers[i].send(job)
    }

    /// Submits every task to the pool. The returned [`Gather`] collects the
    /// outcomes keyed by each task's position in `tasks`.
    pub fn scatter<T, F>(&self, tasks: Vec<F>) -> Gather<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let expected = tasks.len();
        let (tx, rx) = mpsc::channel::<SplitPart<Result<T, PoolError>>>();
        let mut early = vec![];

        for (n, task) in tasks.into_iter().enumerate() {
            let reply = tx.clone();
            let job: Job = Box::new(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(task)).map_err(|payload| {
                    PoolError::Panicked {
                        n,
                        message: panic_message(payload.as_ref()),
                    }
                });
                // The gather side may already be gone; nobody is left to tell.
                let _ = reply.send(SplitPart::new(outcome, n));
            });
            if let Err(e) = self.submit(job) {
                early.push(SplitPart::new(Err(e), n));
            }
        }

        Gather {
            rx,
            expected,
            early,
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for worker in &mut self.workers {
            worker.tx.take();
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    warn!("worker thread terminated abnormally");
                }
            }
        }
    }
}

/// Pending outcomes of one [`WorkerPool::scatter`] call.
pub struct Gather<T> {
    rx: mpsc::Receiver<SplitPart<Result<T, PoolError>>>,
    expected: usize,
    early: Vec<SplitPart<Result<T, PoolError>>>,
}

impl<T> Gather<T> {
    pub fn len(&self) -> usize {
        self.expected
    }

    pub fn is_empty(&self) -> bool {
        self.expected == 0
    }

    /// Blocks until every task has reported, then returns the outcomes in
    /// submission order. Tasks whose reply channel closed without a message
    /// are reported as [`PoolError::Lost`].
    pub fn join(self) -> Vec<Result<T, PoolError>> {
        let mut parts: Vec<Option<Result<T, PoolError>>> =
            (0..self.expected).map(|_| None).collect();
        let mut pending = self.expected;

        for split in self.early {
            parts[split.n] = Some(split.part);
            pending -= 1;
        }
        while pending > 0 {
            match self.rx.recv() {
                Ok(split) => match parts.get_mut(split.n) {
                    Some(slot) if slot.is_none() => {
                        *slot = Some(split.part);
                        pending -= 1;
                    }
                    _ => warn!(n = split.n, "ignoring duplicate or out-of-range part"),
                },
                Err(_) => break,
            }
        }

        parts
            .into_iter()
            .enumerate()
            .map(|(n, part)| part.unwrap_or(Err(PoolError::Lost(n))))
            .collect()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
