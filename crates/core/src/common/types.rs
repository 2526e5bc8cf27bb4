//! Core value types for the memory controller simulator.
//!
//! This module defines the vocabulary every component speaks. It provides:
//! 1. **Aliases:** Cycle counts, byte addresses, and DRAM geometry indices.
//! 2. **Requests:** The unit of work submitted by a producer, including the
//!    decoded address fields the controller fills in at submission.
//! 3. **Bank State:** The protocol state of a single DRAM bank.

use std::fmt;

use serde::Deserialize;

/// Simulation time in memory clock cycles.
pub type Cycle = u64;

/// Physical byte address.
pub type Address = u64;

/// Row index within a bank.
pub type Row = u32;

/// Column index within a row.
pub type Column = u16;

/// Monotonic request identifier; never reused during a simulation run.
pub type RequestId = u64;

/// One-shot completion notifier, invoked exactly once with the request
/// latency in cycles.
///
/// Notifiers run synchronously from inside `tick()` on the driver's thread,
/// after statistics for the request have been updated. A notifier cannot
/// re-enter the controller that invokes it: it is an owned `FnOnce` closure
/// with no access to the controller's `&mut` borrow.
pub type CompletionCallback = Box<dyn FnOnce(Cycle) + Send>;

/// Memory request kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestKind {
    /// Read access.
    #[default]
    Read,
    /// Write access.
    Write,
}

/// Request priority for QoS-aware scheduling.
///
/// The baseline scheduling policies ignore priority; the field is carried so
/// the scheduler contract covers QoS variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    /// Background traffic.
    Low,
    /// Default priority.
    #[default]
    Normal,
    /// Latency-sensitive traffic.
    High,
    /// Hard real-time traffic.
    Realtime,
}

/// DRAM bank state for cycle-accurate simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BankState {
    /// Precharged, no row open.
    #[default]
    Idle,
    /// Row being opened (ACT issued, tRCD running).
    Activating,
    /// Row open, ready for column commands.
    Active,
    /// Read burst in progress.
    Reading,
    /// Write burst in progress.
    Writing,
    /// Row being closed (PRE issued, tRP running).
    Precharging,
    /// Refresh in progress.
    Refreshing,
}

impl fmt::Display for BankState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BankState::Idle => "IDLE",
            BankState::Activating => "ACTIVATING",
            BankState::Active => "ACTIVE",
            BankState::Reading => "READING",
            BankState::Writing => "WRITING",
            BankState::Precharging => "PRECHARGING",
            BankState::Refreshing => "REFRESHING",
        };
        f.pad(name)
    }
}

/// A memory request.
///
/// Producers construct a request with an address, size, and kind; the
/// controller assigns the identifier and submit cycle and decodes the
/// address fields at submission. The decoded fields are never mutated
/// afterwards.
pub struct Request {
    /// Unique identifier, assigned by the controller at submission.
    pub id: RequestId,
    /// Physical byte address.
    pub address: Address,
    /// Transfer size in bytes.
    pub size: u32,
    /// Read or write.
    pub kind: RequestKind,
    /// Scheduling priority.
    pub priority: Priority,
    /// Cycle at which the request was accepted.
    pub submit_cycle: Cycle,
    /// Optional completion notifier, consumed when the request retires.
    pub callback: Option<CompletionCallback>,

    /// Decoded channel index.
    pub channel: u8,
    /// Decoded rank index.
    pub rank: u8,
    /// Decoded bank group index.
    pub bank_group: u8,
    /// Decoded bank index within the bank group.
    pub bank: u8,
    /// Decoded row index.
    pub row: Row,
    /// Decoded column index.
    pub column: Column,
}

impl Request {
    /// Creates a request with the given address, size, and kind.
    ///
    /// The identifier, submit cycle, and decoded address fields are zero
    /// until the controller accepts the request.
    pub fn new(address: Address, size: u32, kind: RequestKind) -> Self {
        Self {
            id: 0,
            address,
            size,
            kind,
            priority: Priority::Normal,
            submit_cycle: 0,
            callback: None,
            channel: 0,
            rank: 0,
            bank_group: 0,
            bank: 0,
            row: 0,
            column: 0,
        }
    }

    /// Attaches a completion notifier.
    pub fn with_callback(mut self, callback: CompletionCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Sets the scheduling priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("id", &self.id)
            .field("address", &format_args!("{:#x}", self.address))
            .field("size", &self.size)
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("submit_cycle", &self.submit_cycle)
            .field("channel", &self.channel)
            .field("rank", &self.rank)
            .field("bank_group", &self.bank_group)
            .field("bank", &self.bank)
            .field("row", &self.row)
            .field("column", &self.column)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}
