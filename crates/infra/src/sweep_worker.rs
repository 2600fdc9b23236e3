use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::warn;

use devforum_lockout::{LockStore, LockSweeper};

/// Handle to control and join a background worker.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

/// Scheduled sweep loop.
///
/// Runs [`LockSweeper::sweep`] once per interval on a named thread. Sweep
/// failures are logged and the schedule keeps running; each run is
/// independently idempotent.
#[derive(Debug)]
pub struct SweepWorker;

impl SweepWorker {
    pub fn spawn<S>(name: &'static str, sweeper: LockSweeper<S>, interval: Duration) -> WorkerHandle
    where
        S: LockStore + Send + Sync + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let join = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || worker_loop(name, &sweeper, &shutdown_rx, interval))
            .expect("failed to spawn sweep worker thread");

        WorkerHandle {
            shutdown: shutdown_tx,
            join: Some(join),
        }
    }
}

fn worker_loop<S: LockStore>(
    name: &'static str,
    sweeper: &LockSweeper<S>,
    shutdown_rx: &mpsc::Receiver<()>,
    interval: Duration,
) {
    loop {
        match shutdown_rx.recv_timeout(interval) {
            // A tick elapsed with no shutdown request.
            Err(mpsc::RecvTimeoutError::Timeout) => {
                if let Err(err) = sweeper.sweep() {
                    warn!(worker = name, error = %err, "lock sweep failed");
                }
            }
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
}
