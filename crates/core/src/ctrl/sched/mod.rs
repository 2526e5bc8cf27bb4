//! Request schedulers.
//!
//! A scheduler owns per-bank ordered buffers of pending requests and decides
//! which request each bank should serve next. Different policies optimize
//! for different workload characteristics:
//!
//! - `Fifo`: fair, simple, deterministic latency.
//! - `FrFcfs`: maximizes row buffer hits.
//! - `FrFcfsGrp`: additionally groups reads/writes to amortize bus turnaround.
//!
//! Buffers carry request identifiers plus the few fields selection needs;
//! the controller owns the full `Request` records (arena pattern, so the
//! scheduler never holds references into the pool). Insertion order is
//! preserved per bank and defines the FCFS tiebreak. Entries stay buffered,
//! flagged as issued, until the controller removes them at retirement, so
//! occupancy back-pressures producers until completion.

/// First-in, first-out policy.
pub mod fifo;

/// First-ready, first-come-first-served policy.
pub mod fr_fcfs;

/// FR-FCFS with read/write grouping and address-hazard detection.
pub mod fr_fcfs_grp;

pub use fifo::FifoScheduler;
pub use fr_fcfs::FrFcfsScheduler;
pub use fr_fcfs_grp::FrFcfsGrpScheduler;

use std::collections::VecDeque;

use crate::common::{Address, ConfigError, Priority, RequestId, RequestKind, Row};
use crate::config::{SchedulerConfig, SchedulerPolicy};

/// The slice of a request a scheduler needs for selection.
#[derive(Debug, Clone, Copy)]
pub struct QueuedRequest {
    /// Request identifier (key into the controller's pool).
    pub id: RequestId,
    /// Byte address, for same-address hazard detection.
    pub address: Address,
    /// Decoded row.
    pub row: Row,
    /// Read or write.
    pub kind: RequestKind,
    /// Scheduling priority; carried for QoS-aware policies.
    pub priority: Priority,
    /// Set once the column command for this request has been issued.
    pub issued: bool,
}

/// Trait for request scheduling policies.
pub trait Scheduler: Send {
    /// True when the buffer can accept `count` more requests.
    fn has_space(&self, count: usize) -> bool;

    /// Stores a request in the bank's buffer, preserving arrival order.
    fn store(&mut self, bank: usize, entry: QueuedRequest);

    /// Flags a request as issued; it no longer participates in selection
    /// but still occupies buffer space until removed.
    fn mark_issued(&mut self, bank: usize, id: RequestId);

    /// Removes a completed request from the bank's buffer.
    fn remove(&mut self, bank: usize, id: RequestId);

    /// Current total buffer occupancy.
    fn occupancy(&self) -> usize;

    /// Buffer depth per bank.
    fn buffer_depths(&self) -> &[u32];

    /// Selects the next request for a bank.
    ///
    /// # Arguments
    ///
    /// * `bank` - The bank to select for.
    /// * `open_row` - The bank's open row, or `None` if it is precharged.
    /// * `last_cmd` - Kind of the last column command issued (for grouping).
    ///
    /// # Returns
    ///
    /// The identifier of the selected request, or `None` when the bank has
    /// nothing selectable.
    fn get_next(
        &mut self,
        bank: usize,
        open_row: Option<Row>,
        last_cmd: RequestKind,
    ) -> Option<RequestId>;

    /// True when a not-yet-issued request of the given kind targets the
    /// given row of the bank.
    fn has_row_hit(&self, bank: usize, row: Row, kind: RequestKind) -> bool;

    /// True when any not-yet-issued request of the given kind is buffered
    /// for the bank.
    fn has_pending(&self, bank: usize, kind: RequestKind) -> bool;

    /// True when any request is buffered for any bank.
    fn has_any_pending(&self) -> bool;

    /// Lifetime count of selections returned by `get_next`.
    fn requests_selected(&self) -> u64;

    /// Lifetime count of selections that were row hits.
    fn row_hits_selected(&self) -> u64;

    /// Lifetime count of grouping decisions (same-kind row hit preferred).
    fn grouping_decisions(&self) -> u64;

    /// Empties all buffers and resets the lifetime counters.
    fn clear(&mut self);
}

/// Per-bank buffer storage shared by the scheduling policies.
///
/// Handles capacity accounting, arrival-order insertion, the issued flag,
/// and removal; the policies layer selection on top.
#[derive(Debug)]
pub struct BankBuffers {
    buffers: Vec<VecDeque<QueuedRequest>>,
    depths: Vec<u32>,
    capacity: usize,
    occupancy: usize,
}

impl BankBuffers {
    /// Creates empty buffers for `num_banks` banks with a shared total
    /// capacity.
    pub fn new(num_banks: usize, capacity: usize) -> Self {
        Self {
            buffers: vec![VecDeque::new(); num_banks],
            depths: vec![0; num_banks],
            capacity,
            occupancy: 0,
        }
    }

    /// True when `count` more requests fit.
    pub fn has_space(&self, count: usize) -> bool {
        self.occupancy + count <= self.capacity
    }

    /// Appends an entry to the bank's buffer.
    pub fn store(&mut self, bank: usize, entry: QueuedRequest) {
        self.buffers[bank].push_back(entry);
        self.depths[bank] += 1;
        self.occupancy += 1;
    }

    /// Flags the entry with the given id as issued.
    pub fn mark_issued(&mut self, bank: usize, id: RequestId) {
        if let Some(entry) = self.buffers[bank].iter_mut().find(|e| e.id == id) {
            entry.issued = true;
        }
    }

    /// Removes the entry with the given id.
    pub fn remove(&mut self, bank: usize, id: RequestId) {
        if let Some(pos) = self.buffers[bank].iter().position(|e| e.id == id) {
            self.buffers[bank].remove(pos);
            self.depths[bank] -= 1;
            self.occupancy -= 1;
        }
    }

    /// Total buffered requests, issued entries included.
    pub fn occupancy(&self) -> usize {
        self.occupancy
    }

    /// Buffer depth per bank.
    pub fn depths(&self) -> &[u32] {
        &self.depths
    }

    /// Not-yet-issued entries of the bank in arrival order.
    pub fn pending(&self, bank: usize) -> impl Iterator<Item = &QueuedRequest> {
        self.buffers[bank].iter().filter(|e| !e.issued)
    }

    /// True when a not-yet-issued entry of the kind targets the row.
    pub fn has_row_hit(&self, bank: usize, row: Row, kind: RequestKind) -> bool {
        self.pending(bank).any(|e| e.row == row && e.kind == kind)
    }

    /// True when any not-yet-issued entry of the kind is buffered.
    pub fn has_pending(&self, bank: usize, kind: RequestKind) -> bool {
        self.pending(bank).any(|e| e.kind == kind)
    }

    /// Empties every buffer.
    pub fn clear(&mut self) {
        for buffer in &mut self.buffers {
            buffer.clear();
        }
        self.depths.fill(0);
        self.occupancy = 0;
    }
}

/// Creates a scheduler for the configured policy.
///
/// `num_banks` is the organization's total bank count; the configuration's
/// own `num_banks` field is advisory and overridden by the controller.
///
/// # Errors
///
/// Returns [`ConfigError::Unimplemented`] for the declared-only policies;
/// `validate()` normally rejects these before construction is attempted.
pub fn create_scheduler(
    config: &SchedulerConfig,
    num_banks: usize,
    capacity: usize,
) -> Result<Box<dyn Scheduler>, ConfigError> {
    match config.policy {
        SchedulerPolicy::Fifo => Ok(Box::new(FifoScheduler::new(num_banks, capacity))),
        SchedulerPolicy::FrFcfs => Ok(Box::new(FrFcfsScheduler::new(num_banks, capacity))),
        SchedulerPolicy::FrFcfsGrp => Ok(Box::new(FrFcfsGrpScheduler::new(num_banks, capacity))),
        SchedulerPolicy::GrpFrFcfs => Err(ConfigError::Unimplemented("scheduler.policy.GRP_FR_FCFS")),
        SchedulerPolicy::GrpFrFcfsWm => {
            Err(ConfigError::Unimplemented("scheduler.policy.GRP_FR_FCFS_WM"))
        }
        SchedulerPolicy::QosAware => Err(ConfigError::Unimplemented("scheduler.policy.QOS_AWARE")),
    }
}
