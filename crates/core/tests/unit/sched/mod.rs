//! Scheduler policy tests.



/// FR-FCFS with grouping and hazard detection.
pub mod fr_fcfs_grp;

use memsim_core::common::{Priority, RequestKind};
use memsim_core::ctrl::sched::QueuedRequest;

/// Queued entry shorthand used across the policy tests.
pub fn entry(id: u64, address: u64, row: u32, kind: RequestKind) -> QueuedRequest {
    QueuedRequest {
        id,
        address,
        row,
        kind,
        priority: Priority::Normal,
        issued: false,
    }
}
