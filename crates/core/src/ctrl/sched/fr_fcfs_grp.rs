//! FR-FCFS with read/write grouping and address-hazard detection.
//!
//! Extends FR-FCFS by preferring, among the row hits, requests of the same
//! kind as the last issued column command. Grouping amortizes the bus
//! turnaround penalties (tWTR, tRTW), which are significant on modern
//! protocols.
//!
//! Priority order:
//! 1. Row hit of the same kind as the last command, hazard-free.
//! 2. Oldest row hit.
//! 3. Oldest request (FCFS).
//!
//! A same-kind candidate is hazard-free only if no earlier request in the
//! row-hit set targets the same byte address: reordering a later read ahead
//! of an earlier write to the same address (or the converse) would break
//! same-address completion order.

use crate::common::{RequestId, RequestKind, Row};

use super::{BankBuffers, QueuedRequest, Scheduler};

/// FR-FCFS-GRP scheduler state.
pub struct FrFcfsGrpScheduler {
    buffers: BankBuffers,
    requests_selected: u64,
    row_hits: u64,
    grouping_decisions: u64,
}

impl FrFcfsGrpScheduler {
    /// Creates an FR-FCFS-GRP scheduler for `num_banks` banks sharing
    /// `capacity` buffer slots.
    pub fn new(num_banks: usize, capacity: usize) -> Self {
        Self {
            buffers: BankBuffers::new(num_banks, capacity),
            requests_selected: 0,
            row_hits: 0,
            grouping_decisions: 0,
        }
    }

    /// True when an earlier candidate targets the same byte address as
    /// `target`. Only candidates before `target` in arrival order count.
    fn has_address_hazard(candidates: &[QueuedRequest], target: &QueuedRequest) -> bool {
        for earlier in candidates {
            if earlier.id == target.id {
                break;
            }
            if earlier.address == target.address {
                return true;
            }
        }
        false
    }
}

impl Scheduler for FrFcfsGrpScheduler {
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

    fn get_next(
        &mut self,
        bank: usize,
        open_row: Option<Row>,
        last_cmd: RequestKind,
    ) -> Option<RequestId> {
        if let Some(row) = open_row {
            let row_hits: Vec<QueuedRequest> = self
                .buffers
                .pending(bank)
                .filter(|e| e.row == row)
                .copied()
                .collect();

            if !row_hits.is_empty() {
                // Prefer the same kind as the last command, but never past
                // an earlier request to the same address.
                for candidate in &row_hits {
                    if candidate.kind == last_cmd
                        && !Self::has_address_hazard(&row_hits, candidate)
                    {
                        self.row_hits += 1;
                        self.grouping_decisions += 1;
                        self.requests_selected += 1;
                        return Some(candidate.id);
                    }
                }

                // No hazard-free same-kind hit; take the oldest row hit.
                self.row_hits += 1;
                self.requests_selected += 1;
                return Some(row_hits[0].id);
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
        self.grouping_decisions
    }

    fn clear(&mut self) {
        self.buffers.clear();
        self.requests_selected = 0;
        self.row_hits = 0;
        self.grouping_decisions = 0;
    }
}
