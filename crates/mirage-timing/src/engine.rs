//! The vblank timing engine.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use mirage_display::{CompletionSink, CompletionToken, VblankSink, VblankStamp};
use thiserror::Error;
use tracing::{debug, warn};

use crate::schedule::FireSchedule;
use crate::signaler::CommitSignaler;

#[derive(Debug, Error)]
pub enum EngineError {
    /// `start` was called while the engine was already running. The running
    /// engine is left undisturbed.
    #[error("vblank engine is already running")]
    AlreadyRunning,
    /// The timer worker thread could not be spawned. Fatal to pipeline
    /// activation; no engine state is left running.
    #[error("failed to spawn vblank worker thread")]
    Spawn(#[source] io::Error),
}

/// Periodic vblank simulation for one output pipeline.
///
/// While running, a dedicated worker thread fires once per nominal interval.
/// Each fire increments the vblank counter, notifies the [`VblankSink`],
/// releases a pending commit-completion token (if one is queued) through the
/// [`CompletionSink`], and rearms relative to the previous *scheduled*
/// deadline so individual late wake-ups never accumulate into phase drift.
///
/// [`stop`](Self::stop) cancels the worker and joins it: once it returns, no
/// fire runs until the next [`start`](Self::start). The counter is monotonic
/// across start/stop cycles and frozen while stopped.
pub struct VblankEngine {
    shared: Arc<EngineShared>,
    vblank_sink: Arc<dyn VblankSink>,
    completion_sink: Arc<dyn CompletionSink>,
    worker: Option<thread::JoinHandle<()>>,
}

struct EngineShared {
    /// Set under the mutex to ask the worker to exit; `wake` interrupts its
    /// deadline wait.
    stop: Mutex<bool>,
    wake: Condvar,
    /// Vblank counter. Incremented exactly once per fire, never while the
    /// engine is stopped, never reset.
    seq: AtomicU64,
    signaler: CommitSignaler,
}

fn lock_stop(shared: &EngineShared) -> MutexGuard<'_, bool> {
    shared.stop.lock().unwrap_or_else(PoisonError::into_inner)
}

impl VblankEngine {
    pub fn new(
        vblank_sink: Arc<dyn VblankSink>,
        completion_sink: Arc<dyn CompletionSink>,
    ) -> Self {
        Self {
            shared: Arc::new(EngineShared {
                stop: Mutex::new(false),
                wake: Condvar::new(),
                seq: AtomicU64::new(0),
                signaler: CommitSignaler::new(),
            }),
            vblank_sink,
            completion_sink,
            worker: None,
        }
    }

    /// Current vblank counter value.
    pub fn sequence(&self) -> u64 {
        self.shared.seq.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Queue `token` for release at the next boundary. May be called whether
    /// or not the engine is running; a token queued while stopped is released
    /// on the first boundary after the next [`start`](Self::start).
    ///
    /// Returns the displaced token if one was already pending (see
    /// [`CommitSignaler::submit`]).
    pub fn submit(&self, token: CompletionToken) -> Option<CompletionToken> {
        self.shared.signaler.submit(token)
    }

    /// True if a commit-completion token is waiting for its boundary.
    pub fn has_pending_commit(&self) -> bool {
        self.shared.signaler.has_pending()
    }

    /// Start firing every `interval`.
    ///
    /// The first boundary is scheduled one full `interval` after the spawn
    /// instant; nothing fires before this call returns. Starting an engine
    /// that is already running is a caller error and returns
    /// [`EngineError::AlreadyRunning`].
    pub fn start(&mut self, interval: Duration) -> Result<(), EngineError> {
        if self.worker.is_some() {
            return Err(EngineError::AlreadyRunning);
        }

        *lock_stop(&self.shared) = false;

        let shared = Arc::clone(&self.shared);
        let vblank_sink = Arc::clone(&self.vblank_sink);
        let completion_sink = Arc::clone(&self.completion_sink);
        let worker = thread::Builder::new()
            .name("mirage-vblank".into())
            .spawn(move || run_timer(&shared, &*vblank_sink, &*completion_sink, interval))
            .map_err(EngineError::Spawn)?;
        self.worker = Some(worker);

        debug!(interval_ns = interval.as_nanos() as u64, "vblank engine started");
        Ok(())
    }

    /// Stop firing.
    ///
    /// Blocks until an in-flight fire (if any) has fully completed: the
    /// worker is asked to exit and then joined, not merely flagged. After
    /// this returns the counter is frozen and no notification is observable
    /// until the next [`start`](Self::start). Safe to call in any state.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        *lock_stop(&self.shared) = true;
        self.shared.wake.notify_all();
        if worker.join().is_err() {
            warn!("vblank worker terminated abnormally");
        }

        debug!(seq = self.sequence(), "vblank engine stopped");
    }
}

impl Drop for VblankEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Worker loop: wait out each scheduled deadline (or a stop request), then
/// fire. The fire path does a bounded amount of work (counter increment, one
/// sink call, one non-blocking slot check), which is what keeps `stop` short.
fn run_timer(
    shared: &EngineShared,
    vblank_sink: &dyn VblankSink,
    completion_sink: &dyn CompletionSink,
    interval: Duration,
) {
    let mut schedule = FireSchedule::new(Instant::now(), interval);

    loop {
        let deadline = schedule.next_deadline();

        let mut stop = lock_stop(shared);
        loop {
            if *stop {
                return;
            }
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let (guard, _) = shared
                .wake
                .wait_timeout(stop, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            stop = guard;
        }
        drop(stop);

        let scheduled_ns = schedule.mark_fired();
        let seq = shared.seq.fetch_add(1, Ordering::AcqRel) + 1;
        let stamp = VblankStamp { seq, scheduled_ns };

        vblank_sink.vblank(stamp);
        shared.signaler.deliver_if_pending(completion_sink, stamp);
    }
}
