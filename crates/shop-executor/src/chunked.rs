//! Chunked workload state machine.
//!
//! A workload of `total` independent unit computations is split into
//! chunks of at most `chunk_size` units. Each call to
//! [`ChunkedWorkload::step`] runs exactly one chunk; whoever drives the
//! workload decides when the next call happens. Nothing here ever runs two
//! chunks back to back.

use std::hint::black_box;

use shop_core::WorkloadConfig;

/// Error when constructing a workload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkloadError {
    #[error("total units must be positive")]
    ZeroTotal,

    #[error("chunk size must be positive")]
    ZeroChunk,
}

/// Placeholder unit computation: a square-root/square round-trip whose
/// result is discarded through `black_box` so it cannot be optimized away.
pub fn simulated_unit(i: u64) {
    let root = (i as f64).sqrt();
    black_box(root * root);
}

/// Where the workload is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadState {
    /// No chunk has run yet.
    Idle,
    /// Some chunks have run; `processed` units are done.
    Running { processed: u64 },
    /// All units are done.
    Done,
}

/// One executed chunk: units `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkReport {
    /// Zero-based chunk number.
    pub index: u32,
    /// First unit of the chunk.
    pub start: u64,
    /// One past the last unit of the chunk.
    pub end: u64,
}

impl ChunkReport {
    /// Units executed by this chunk.
    pub fn units(&self) -> u64 {
        self.end - self.start
    }
}

/// Result of one `step()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A chunk ran and work remains; yield before stepping again.
    Yielded(ChunkReport),
    /// The final chunk ran.
    Completed(ChunkReport),
    /// The workload was already done; nothing ran.
    AlreadyDone,
}

impl Step {
    /// The chunk that ran, if any.
    pub fn report(&self) -> Option<&ChunkReport> {
        match self {
            Self::Yielded(r) | Self::Completed(r) => Some(r),
            Self::AlreadyDone => None,
        }
    }

    /// Whether more work remains after this step.
    pub fn has_more(&self) -> bool {
        matches!(self, Self::Yielded(_))
    }
}

/// A counted workload advanced one chunk at a time.
#[derive(Debug, Clone)]
pub struct ChunkedWorkload {
    total: u64,
    chunk_size: u64,
    state: WorkloadState,
    chunks_run: u32,
    unit: fn(u64),
}

impl ChunkedWorkload {
    /// Create a workload running [`simulated_unit`] for each index.
    pub fn new(total: u64, chunk_size: u64) -> Result<Self, WorkloadError> {
        if total == 0 {
            return Err(WorkloadError::ZeroTotal);
        }
        if chunk_size == 0 {
            return Err(WorkloadError::ZeroChunk);
        }
        Ok(Self {
            total,
            chunk_size,
            state: WorkloadState::Idle,
            chunks_run: 0,
            unit: simulated_unit,
        })
    }

    /// Create a workload from configuration.
    pub fn from_config(config: &WorkloadConfig) -> Result<Self, WorkloadError> {
        Self::new(config.total_units, config.chunk_size)
    }

    /// Replace the per-index computation.
    pub fn with_unit(mut self, unit: fn(u64)) -> Self {
        self.unit = unit;
        self
    }

    /// Total units.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Maximum units per chunk.
    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Current state.
    pub fn state(&self) -> WorkloadState {
        self.state
    }

    /// Units processed so far.
    pub fn processed(&self) -> u64 {
        match self.state {
            WorkloadState::Idle => 0,
            WorkloadState::Running { processed } => processed,
            WorkloadState::Done => self.total,
        }
    }

    /// Whether all units are done.
    pub fn is_done(&self) -> bool {
        self.state == WorkloadState::Done
    }

    /// Chunks executed so far.
    pub fn chunks_run(&self) -> u32 {
        self.chunks_run
    }

    /// Number of chunks a full run takes.
    pub fn expected_chunks(&self) -> u64 {
        self.total.div_ceil(self.chunk_size)
    }

    /// Run exactly one chunk.
    pub fn step(&mut self) -> Step {
        let start = match self.state {
            WorkloadState::Idle => 0,
            WorkloadState::Running { processed } => processed,
            WorkloadState::Done => return Step::AlreadyDone,
        };
        let end = start.saturating_add(self.chunk_size).min(self.total);

        for i in start..end {
            (self.unit)(i);
        }

        let report = ChunkReport {
            index: self.chunks_run,
            start,
            end,
        };
        self.chunks_run += 1;

        if end >= self.total {
            self.state = WorkloadState::Done;
            Step::Completed(report)
        } else {
            self.state = WorkloadState::Running { processed: end };
            Step::Yielded(report)
        }
    }
}
