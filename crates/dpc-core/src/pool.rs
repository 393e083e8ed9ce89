//! Worker pool abstraction: `submit` / `poll` / `recv_timeout` / `shutdown`,
//! agnostic to how the job closure actually does its work. Grounded in the
//! GUI worker thread's `std::thread::Builder` + `mpsc::channel` pattern,
//! generalized from one worker to a configurable count.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

enum Command<J> {
    Run(J),
    Shutdown,
}

pub struct WorkerPool<R> {
    task_tx: mpsc::Sender<Command<Box<dyn FnOnce() -> R + Send>>>,
    result_rx: mpsc::Receiver<R>,
    handles: Vec<JoinHandle<()>>,
}

impl<R: Send + 'static> WorkerPool<R> {
    /// Spawn `workers` threads (at least one), each pulling jobs from a
    /// shared queue and sending results back on a single channel.
    pub fn new(workers: usize) -> Self {
        let (task_tx, task_rx) = mpsc::channel::<Command<Box<dyn FnOnce() -> R + Send>>>();
        let task_rx = Arc::new(Mutex::new(task_rx));
        let (result_tx, result_rx) = mpsc::channel::<R>();

        let mut handles = Vec::with_capacity(workers.max(1));
        for idx in 0..workers.max(1) {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("dpc-worker-{idx}"))
                .spawn(move || loop {
                    let cmd = {
                        let rx = task_rx.lock().unwrap();
                        rx.recv()
                    };
                    match cmd {
                        Ok(Command::Run(job)) => {
                            let result = job();
                            if result_tx.send(result).is_err() {
                                break;
                            }
                        }
                        Ok(Command::Shutdown) | Err(_) => break,
                    }
                })
                .expect("failed to spawn dpc worker thread");
            handles.push(handle);
        }

        Self { task_tx, result_rx, handles }
    }

    /// Enqueue a job. Non-blocking; the job runs on whichever worker is free.
    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() -> R + Send + 'static,
    {
        let _ = self.task_tx.send(Command::Run(Box::new(job)));
    }

    /// Drain every result currently available without blocking.
    pub fn drain_available(&self) -> Vec<R> {
        let mut out = Vec::new();
        while let Ok(r) = self.result_rx.try_recv() {
            out.push(r);
        }
        out
    }

    /// Block for up to `timeout` waiting for the next result.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<R> {
        self.result_rx.recv_timeout(timeout).ok()
    }

    /// Block indefinitely for the next result.
    pub fn recv(&self) -> Option<R> {
        self.result_rx.recv().ok()
    }

    /// Stop dispatching, abandon anything still queued, and join every
    /// worker thread. Jobs already in flight are allowed to finish.
    pub fn shutdown(self) {
        for _ in &self.handles {
            let _ = self.task_tx.send(Command::Shutdown);
        }
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submitted_jobs_all_complete() {
        let pool = WorkerPool::<i32>::new(3);
        for i in 0..10 {
            pool.submit(move || i * 2);
        }
        let mut results = Vec::new();
        while results.len() < 10 {
            if let Some(r) = pool.recv_timeout(Duration::from_secs(1)) {
                results.push(r);
            }
        }
        results.sort();
        assert_eq!(results, (0..10).map(|i| i * 2).collect::<Vec<_>>());
        pool.shutdown();
    }
}
