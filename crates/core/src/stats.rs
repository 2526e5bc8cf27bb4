//! Simulation statistics collection and reporting.
//!
//! This module tracks the counters the controllers write during simulation.
//! It provides:
//! 1. **Request counts:** Reads, writes, and page hit/empty/conflict classification.
//! 2. **Latency:** Summed read and write latency plus min/max.
//! 3. **Utilization:** Busy, idle, and stall cycles; per-state bank cycles.
//! 4. **Refresh and turnaround:** Refresh counts/cycles and bus turnarounds.
//!
//! All counters are monotonic between resets; derived quantities (averages,
//! rates) are computed on read.

use crate::common::{Cycle, RequestKind};

/// Page state of the target bank at the moment scheduling decided to serve a
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAccess {
    /// The open row matched the request's row.
    Hit,
    /// The bank was closed; a plain activation sufficed.
    Empty,
    /// A different row was open; a precharge was required first.
    Conflict,
}

/// Memory controller statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    /// Completed read requests.
    pub reads: u64,
    /// Completed write requests.
    pub writes: u64,

    /// Requests served from an already-open matching row.
    pub page_hits: u64,
    /// Requests served from a closed bank.
    pub page_empty: u64,
    /// Requests that had to close a different open row first.
    pub page_conflicts: u64,

    /// Summed read latency in cycles.
    pub total_read_latency: u64,
    /// Summed write latency in cycles.
    pub total_write_latency: u64,
    /// Smallest observed request latency.
    pub min_latency: u64,
    /// Largest observed request latency.
    pub max_latency: u64,

    /// Cycles with at least one bank out of the idle state.
    pub busy_cycles: u64,
    /// Cycles with every bank idle.
    pub idle_cycles: u64,
    /// Cycles with buffered requests but no command issued.
    pub stall_cycles: u64,

    /// Refresh commands issued.
    pub refreshes: u64,
    /// Bank-cycles spent refreshing.
    pub refresh_cycles: u64,

    /// Read command issued directly after a write.
    pub write_to_read_turnarounds: u64,
    /// Write command issued directly after a read.
    pub read_to_write_turnarounds: u64,

    /// Bank-cycles spent with a row open (activating, active, bursting).
    pub active_cycles: u64,
    /// Bank-cycles spent precharging.
    pub precharge_cycles: u64,
    /// Bank-cycles spent in power-down (not modeled; always zero).
    pub powerdown_cycles: u64,
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    /// Creates an empty statistics block.
    pub fn new() -> Self {
        Self {
            reads: 0,
            writes: 0,
            page_hits: 0,
            page_empty: 0,
            page_conflicts: 0,
            total_read_latency: 0,
            total_write_latency: 0,
            min_latency: u64::MAX,
            max_latency: 0,
            busy_cycles: 0,
            idle_cycles: 0,
            stall_cycles: 0,
            refreshes: 0,
            refresh_cycles: 0,
            write_to_read_turnarounds: 0,
            read_to_write_turnarounds: 0,
            active_cycles: 0,
            precharge_cycles: 0,
            powerdown_cycles: 0,
        }
    }

    /// Records a completed request.
    ///
    /// # Arguments
    ///
    /// * `kind` - Read or write.
    /// * `latency` - Completion latency in cycles.
    /// * `page` - Page classification, or `None` for fidelities that do not
    ///   model the row buffer.
    pub fn record_request(&mut self, kind: RequestKind, latency: Cycle, page: Option<PageAccess>) {
        match kind {
            RequestKind::Read => {
                self.reads += 1;
                self.total_read_latency += latency;
            }
            RequestKind::Write => {
                self.writes += 1;
                self.total_write_latency += latency;
            }
        }
        match page {
            Some(PageAccess::Hit) => self.page_hits += 1,
            Some(PageAccess::Empty) => self.page_empty += 1,
            Some(PageAccess::Conflict) => self.page_conflicts += 1,
            None => {}
        }
        self.min_latency = self.min_latency.min(latency);
        self.max_latency = self.max_latency.max(latency);
    }

    /// Total completed requests.
    pub fn total_requests(&self) -> u64 {
        self.reads + self.writes
    }

    /// Average read latency in cycles.
    pub fn avg_read_latency(&self) -> f64 {
        if self.reads > 0 {
            self.total_read_latency as f64 / self.reads as f64
        } else {
            0.0
        }
    }

    /// Average write latency in cycles.
    pub fn avg_write_latency(&self) -> f64 {
        if self.writes > 0 {
            self.total_write_latency as f64 / self.writes as f64
        } else {
            0.0
        }
    }

    /// Average latency across reads and writes.
    pub fn avg_latency(&self) -> f64 {
        let total = self.total_requests();
        if total > 0 {
            (self.total_read_latency + self.total_write_latency) as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Fraction of classified accesses that hit the open row.
    pub fn page_hit_rate(&self) -> f64 {
        let total = self.page_hits + self.page_empty + self.page_conflicts;
        if total > 0 {
            self.page_hits as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Fraction of classified accesses that conflicted with an open row.
    pub fn page_conflict_rate(&self) -> f64 {
        let total = self.page_hits + self.page_empty + self.page_conflicts;
        if total > 0 {
            self.page_conflicts as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Fraction of cycles with at least one bank busy.
    pub fn utilization(&self) -> f64 {
        let total = self.busy_cycles + self.idle_cycles;
        if total > 0 {
            self.busy_cycles as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Fraction of completed requests that were reads.
    pub fn read_ratio(&self) -> f64 {
        let total = self.total_requests();
        if total > 0 {
            self.reads as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Resets all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Merges counters from another instance, for aggregating multiple
    /// controllers.
    pub fn merge(&mut self, other: &Statistics) {
        self.reads += other.reads;
        self.writes += other.writes;
        self.page_hits += other.page_hits;
        self.page_empty += other.page_empty;
        self.page_conflicts += other.page_conflicts;
        self.total_read_latency += other.total_read_latency;
        self.total_write_latency += other.total_write_latency;
        self.min_latency = self.min_latency.min(other.min_latency);
        self.max_latency = self.max_latency.max(other.max_latency);
        self.busy_cycles += other.busy_cycles;
        self.idle_cycles += other.idle_cycles;
        self.stall_cycles += other.stall_cycles;
        self.refreshes += other.refreshes;
        self.refresh_cycles += other.refresh_cycles;
        self.write_to_read_turnarounds += other.write_to_read_turnarounds;
        self.read_to_write_turnarounds += other.read_to_write_turnarounds;
        self.active_cycles += other.active_cycles;
        self.precharge_cycles += other.precharge_cycles;
        self.powerdown_cycles += other.powerdown_cycles;
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"latency"`, `"page"`,
/// `"refresh"`, `"utilization"`. Pass an empty slice to `print_sections` to
/// print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "latency", "page", "refresh", "utilization"];

impl Statistics {
    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of the names in
    /// [`STATS_SECTIONS`]. Pass an empty slice to print everything.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

        println!("==========================================================");
        println!("MEMORY CONTROLLER STATISTICS");
        println!("==========================================================");
        if want("summary") {
            println!("requests.total           {}", self.total_requests());
            println!("requests.reads           {}", self.reads);
            println!("requests.writes          {}", self.writes);
            println!("requests.read_ratio      {:.4}", self.read_ratio());
            println!("----------------------------------------------------------");
        }
        if want("latency") {
            let min = if self.min_latency == u64::MAX {
                0
            } else {
                self.min_latency
            };
            println!("latency.avg              {:.2} cycles", self.avg_latency());
            println!("latency.avg_read         {:.2} cycles", self.avg_read_latency());
            println!("latency.avg_write        {:.2} cycles", self.avg_write_latency());
            println!("latency.min              {} cycles", min);
            println!("latency.max              {} cycles", self.max_latency);
            println!("----------------------------------------------------------");
        }
        if want("page") {
            println!("page.hits                {}", self.page_hits);
            println!("page.empty               {}", self.page_empty);
            println!("page.conflicts           {}", self.page_conflicts);
            println!("page.hit_rate            {:.2}%", 100.0 * self.page_hit_rate());
            println!(
                "page.conflict_rate       {:.2}%",
                100.0 * self.page_conflict_rate()
            );
            println!("----------------------------------------------------------");
        }
        if want("refresh") {
            println!("refresh.count            {}", self.refreshes);
            println!("refresh.cycles           {}", self.refresh_cycles);
            println!("turnaround.read_to_write {}", self.read_to_write_turnarounds);
            println!("turnaround.write_to_read {}", self.write_to_read_turnarounds);
            println!("----------------------------------------------------------");
        }
        if want("utilization") {
            println!("cycles.busy              {}", self.busy_cycles);
            println!("cycles.idle              {}", self.idle_cycles);
            println!("cycles.stall             {}", self.stall_cycles);
            println!("cycles.bank_active       {}", self.active_cycles);
            println!("cycles.bank_precharge    {}", self.precharge_cycles);
            println!("utilization              {:.2}%", 100.0 * self.utilization());
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
