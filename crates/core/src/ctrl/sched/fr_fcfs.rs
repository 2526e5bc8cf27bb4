//! First-Ready, First-Come-First-Served scheduling policy.
//!
//! FR-FCFS prioritizes requests that hit in the row buffer (first-ready),
//! falling back to arrival order when no row hit is available. This is the
//! most common DRAM scheduling policy: it balances throughput (row buffer
//! reuse), fairness (FCFS tiebreak), and hardware simplicity.
//!
//! Selection ignores the request kind; only the row matters. Because the
//! policy reorders solely across rows, two requests to the same byte address
//! necessarily target the same row and keep their relative order.

use crate::common::{RequestId, RequestKind, Row};

use super::{BankBuffers, QueuedRequest, Scheduler};

/// FR-FCFS scheduler state.
pub struct FrFcfsScheduler {
    buffers: BankBuffers,
    requests_selected: u64,
    row_hits: u64,
}

impl FrFcfsScheduler {
    /// Creates an FR-FCFS scheduler for `num_banks` banks sharing
    /// `capacity` buffer slots.
    pub fn new(num_banks: usize, capacity: usize) -> Self {
        Self {
            buffers: BankBuffers::new(num_banks, capacity),
            requests_selected: 0,
            row_hits: 0,
        }
    }
}

impl Scheduler for FrFcfsScheduler {
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

    /// Scans front-to-back for the first request matching the open row;
    /// falls back to the oldest request when there is none.
    fn get_next(
        &mut self,
        bank: usize,
        open_row: Option<Row>,
        _last_cmd: RequestKind,
    ) -> Option<RequestId> {
        if let Some(row) = open_row {
            if let Some(hit) = self.buffers.pending(bank).find(|e| e.row == row) {
                let id = hit.id;
                self.row_hits += 1;
                self.requests_selected += 1;
                return Some(id);
            }
        }

        let id = self.buffers.pending(bank).next().map(|e| e.id)?;
        self.requests_selected += 1;
        Some(id)
    }

    fn has_row_hit(&self, bank: usize, row: Row, kind: RequestKind) -> bool {
        self.buffers.has_row_hit(bank, row, kind)
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
        self.row_hits
    }

    fn grouping_decisions(&self) -> u64 {
        0
    }

    fn clear(&mut self) {
        self.buffers.clear();
        self.requests_selected = 0;
        self.row_hits = 0;
    }
}
