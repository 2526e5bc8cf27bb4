//! First-In, First-Out scheduling policy.
//!
//! The simplest policy: each bank serves its requests strictly in arrival
//! order, with no consideration for row buffer state.
//!
//! # Characteristics
//!
//! - **Fairness:** Maximum; a bank's requests cannot overtake one another.
//! - **Hardware Cost:** Minimal.
//! - **Throughput:** Poor row buffer utilization compared to FR-FCFS.
//! - **Best Case:** Real-time workloads that value deterministic latency.

use crate::common::{RequestId, RequestKind, Row};

use super::{BankBuffers, QueuedRequest, Scheduler};

/// FIFO scheduler state.
pub struct FifoScheduler {
    buffers: BankBuffers,
    requests_selected: u64,
}

impl FifoScheduler {
    /// Creates a FIFO scheduler for `num_banks` banks sharing `capacity`
    /// buffer slots.
    pub fn new(num_banks: usize, capacity: usize) -> Self {
        Self {
            buffers: BankBuffers::new(num_banks, capacity),
            requests_selected: 0,
        }
    }
}

impl Scheduler for FifoScheduler {
    fn has_space(&self, count: usize) -> bool {
        self.buffers.has_space(count)
    }

    fn store(&mut self, bank: usize, entry: QueuedRequest) {
        self.buffers.store(bank, entry);
    }

    fn mark_issued(&mut self, bank: usize, id: RequestId) {
        self.buffers.mark_issued(bank, id);
    }

    fn remove(&mut self, bank: usize, id: RequestId) {
        self.buffers.remove(bank, id);
    }

    fn occupancy(&self) -> usize {
        self.buffers.occupancy()
    }

    fn buffer_depths(&self) -> &[u32] {
        self.buffers.depths()
    }

    /// Returns the oldest not-yet-issued request regardless of row state.
    fn get_next(
        &mut self,
        bank: usize,
        _open_row: Option<Row>,
        _last_cmd: RequestKind,
    ) -> Option<RequestId> {
        let id = self.buffers.pending(bank).next().map(|e| e.id)?;
        self.requests_selected += 1;
        Some(id)
    }

    /// FIFO does not track row hits.
    fn has_row_hit(&self, _bank: usize, _row: Row, _kind: RequestKind) -> bool {
        false
    }

    fn has_pending(&self, bank: usize, kind: RequestKind) -> bool {
        self.buffers.has_pending(bank, kind)
    }

    fn has_any_pending(&self) -> bool {
        self.buffers.occupancy() > 0
    }

    fn requests_selected(&self) -> u64 {
        self.requests_selected
    }

    fn row_hits_selected(&self) -> u64 {
        0
    }

    fn grouping_decisions(&self) -> u64 {
        0
    }

    fn clear(&mut self) {
        self.buffers.clear();
        self.requests_selected = 0;
    }
}
