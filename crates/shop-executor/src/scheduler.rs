//! Host scheduling and workload drivers.

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::chunked::{ChunkReport, ChunkedWorkload, Step};

/// The host's lowest-priority rescheduling primitive.
///
/// `yield_turn` must return control to the host at least once before
/// resolving, so other pending work (rendering, I/O completions) can run
/// between two chunks.
#[async_trait(?Send)]
pub trait HostScheduler {
    /// Give up the current turn and resume on a later one.
    async fn yield_turn(&self);
}

/// Yields through the tokio runtime the caller is running on.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait(?Send)]
impl HostScheduler for TokioScheduler {
    async fn yield_turn(&self) {
        tokio::task::yield_now().await;
    }
}

/// Runtime-agnostic scheduler: returns `Pending` once, waking itself, and
/// counts the turns it handed back.
#[derive(Debug, Default)]
pub struct ImmediateScheduler {
    turns: Cell<u64>,
}

impl ImmediateScheduler {
    /// Create a new scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times control was handed back to the host.
    pub fn turns(&self) -> u64 {
        self.turns.get()
    }
}

#[async_trait(?Send)]
impl HostScheduler for ImmediateScheduler {
    async fn yield_turn(&self) {
        self.turns.set(self.turns.get() + 1);
        YieldOnce { yielded: false }.await;
    }
}

struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Summary of a finished workload run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadSummary {
    /// Chunks executed during this run.
    pub chunks: u32,
    /// Units processed when the run ended.
    pub processed: u64,
    /// Largest number of units executed in one turn.
    pub max_units_per_turn: u64,
    /// Wall time of the run.
    pub elapsed: Duration,
}

struct SummaryBuilder {
    started: Instant,
    chunks: u32,
    max_units_per_turn: u64,
}

impl SummaryBuilder {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            chunks: 0,
            max_units_per_turn: 0,
        }
    }

    fn record(&mut self, report: &ChunkReport) {
        self.chunks += 1;
        self.max_units_per_turn = self.max_units_per_turn.max(report.units());
    }

    fn finish(self, workload: &ChunkedWorkload) -> WorkloadSummary {
        WorkloadSummary {
            chunks: self.chunks,
            processed: workload.processed(),
            max_units_per_turn: self.max_units_per_turn,
            elapsed: self.started.elapsed(),
        }
    }
}

/// Drive a workload to completion on a cooperative host.
///
/// Runs one chunk per turn and awaits `host.yield_turn()` after every chunk
/// that leaves work behind. `observer` sees each chunk as it finishes.
pub async fn drive<H>(
    workload: &mut ChunkedWorkload,
    host: &H,
    mut observer: impl FnMut(&ChunkReport),
) -> WorkloadSummary
where
    H: HostScheduler + ?Sized,
{
    let mut summary = SummaryBuilder::new();
    loop {
        match workload.step() {
            Step::Yielded(report) => {
                summary.record(&report);
                observer(&report);
                host.yield_turn().await;
            }
            Step::Completed(report) => {
                summary.record(&report);
                observer(&report);
                break;
            }
            Step::AlreadyDone => break,
        }
    }
    summary.finish(workload)
}

/// Drive a workload synchronously, treating each `step()` as one turn.
///
/// For hosts without an event loop (tests, the `simulate` command).
pub fn run_to_completion(
    workload: &mut ChunkedWorkload,
    mut observer: impl FnMut(&ChunkReport),
) -> WorkloadSummary {
    let mut summary = SummaryBuilder::new();
    while let Some(report) = workload.step().report().copied() {
        summary.record(&report);
        observer(&report);
    }
    summary.finish(workload)
}
