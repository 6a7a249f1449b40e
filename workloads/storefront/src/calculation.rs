//! Simulated heavy calculation.

use shop_core::WorkloadConfig;
use shop_executor::{drive, ChunkReport, ChunkedWorkload, HostScheduler, WorkloadError, WorkloadSummary};

/// Run the configured workload on `host`, one chunk per turn.
///
/// The result of the computation is discarded; only the summary is
/// returned. There is no way to cancel a started run.
pub async fn perform_heavy_calculation<H>(
    config: &WorkloadConfig,
    host: &H,
    observer: impl FnMut(&ChunkReport),
) -> Result<WorkloadSummary, WorkloadError>
where
    H: HostScheduler + ?Sized,
{
    let mut workload = ChunkedWorkload::from_config(config)?;
    Ok(drive(&mut workload, host, observer).await)
}
