//! Memory controller implementations.
//!
//! This module organizes the controller family behind one trait. It provides:
//! 1. **Contract:** The [`MemoryController`] trait: submission, clock,
//!    inspection, and observability surfaces shared by every fidelity.
//! 2. **Implementations:** Behavioral (fixed latency), transactional
//!    (queue + sampled latency), and cycle-accurate (full protocol).
//! 3. **Building Blocks:** Bank state machines, address decoding, the
//!    scheduler family, the refresh manager, and invariant checking.
//! 4. **Factory:** [`create_controller`] selects the implementation for the
//!    configured fidelity.

/// Per-bank state machine and four-activate window.
pub mod bank;

/// Fixed-latency behavioral controller.
pub mod behavioral;

/// Cycle-accurate controller.
pub mod cycle;

/// Address decoding.
pub mod decode;

/// Invariant checking and violation records.
pub mod invariants;

/// Refresh deadline management.
pub mod refresh;

/// Request scheduling policies.
pub mod sched;

/// Queue-based transactional controller.
pub mod transactional;

pub use behavioral::BehavioralController;
pub use cycle::CycleAccurateController;
pub use invariants::Violation;
pub use transactional::TransactionalController;

use crate::common::{
    Address, BankState, CompletionCallback, ConfigError, Cycle, Request, RequestId, RequestKind,
    Row,
};
use crate::config::{ControllerConfig, Fidelity, Technology};
use crate::stats::Statistics;

/// Common contract implemented by every controller fidelity.
///
/// The controller is a pure synchronous object: all state transitions occur
/// inside [`tick`](Self::tick) (or the behavioral `submit` fast path), and
/// between ticks the state is quiescent and observable. Completion
/// notifiers run synchronously inside `tick`, after statistics for the
/// request have been updated; being owned `FnOnce` closures, they cannot
/// re-enter the controller that invokes them.
pub trait MemoryController: Send {
    /// Submits a memory request.
    ///
    /// # Returns
    ///
    /// The assigned request identifier, or `None` when the queue is full.
    /// Back-pressure is the sole flow-control mechanism: the producer
    /// retries after ticking the controller forward.
    fn submit(&mut self, request: Request) -> Option<RequestId>;

    /// Convenience shorthand: submits a read request.
    fn read(
        &mut self,
        address: Address,
        size: u32,
        callback: Option<CompletionCallback>,
    ) -> Option<RequestId> {
        let mut request = Request::new(address, size, RequestKind::Read);
        request.callback = callback;
        self.submit(request)
    }

    /// Convenience shorthand: submits a write request.
    fn write(
        &mut self,
        address: Address,
        size: u32,
        callback: Option<CompletionCallback>,
    ) -> Option<RequestId> {
        let mut request = Request::new(address, size, RequestKind::Write);
        request.callback = callback;
        self.submit(request)
    }

    /// True when one more request would be accepted.
    fn can_accept(&self) -> bool;

    /// True while any accepted request has not completed.
    fn has_pending(&self) -> bool;

    /// Number of accepted, not yet completed requests.
    fn pending_count(&self) -> usize;

    /// Advances the simulation by one cycle.
    fn tick(&mut self);

    /// Advances the simulation by `n` cycles.
    fn tick_n(&mut self, n: Cycle) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Ticks until no request is pending and no refresh is required.
    ///
    /// Terminates for any finite request set: every tick either issues a
    /// command or brings a state deadline closer.
    fn drain(&mut self);

    /// Returns the controller to its initial state: cycle zero, banks idle,
    /// buffers empty, statistics and violations cleared.
    fn reset(&mut self);

    /// Current simulation cycle.
    fn cycle(&self) -> Cycle;

    /// Sets the simulation cycle, for host clock alignment.
    fn set_cycle(&mut self, cycle: Cycle);

    /// Simulation fidelity of this implementation.
    fn fidelity(&self) -> Fidelity;

    /// Memory technology being modeled.
    fn technology(&self) -> Technology;

    /// Full configuration.
    fn config(&self) -> &ControllerConfig;

    /// State of a bank, addressed by channel and index within the channel.
    fn bank_state(&self, channel: u8, bank: u16) -> BankState;

    /// True when the given row is open in the bank.
    fn is_row_open(&self, channel: u8, bank: u16, row: Row) -> bool;

    /// The bank's open row, if it is active.
    fn open_row(&self, channel: u8, bank: u16) -> Option<Row>;

    /// Number of channels.
    fn num_channels(&self) -> u8;

    /// Banks per channel.
    fn banks_per_channel(&self) -> u16;

    /// Current statistics.
    fn stats(&self) -> &Statistics;

    /// Resets statistics without disturbing simulation state.
    fn reset_stats(&mut self);

    /// Enables or disables trace output.
    fn enable_tracing(&mut self, enable: bool);

    /// True when tracing is enabled.
    fn tracing_enabled(&self) -> bool;

    /// Enables or disables invariant checking.
    fn enable_invariants(&mut self, enable: bool);

    /// True when invariant checking is enabled.
    fn invariants_enabled(&self) -> bool;

    /// Recorded invariant violations, oldest first.
    fn violations(&self) -> &[Violation];

    /// True when any violation has been recorded.
    fn has_violations(&self) -> bool {
        !self.violations().is_empty()
    }

    /// Clears the violation log.
    fn clear_violations(&mut self);
}

/// Creates a memory controller for the configured fidelity.
///
/// # Errors
///
/// Returns a [`ConfigError`] naming the offending field when the
/// configuration fails validation.
pub fn create_controller(
    config: ControllerConfig,
) -> Result<Box<dyn MemoryController>, ConfigError> {
    match config.fidelity {
        Fidelity::Behavioral => Ok(Box::new(BehavioralController::new(config)?)),
        Fidelity::Transactional => Ok(Box::new(TransactionalController::new(config)?)),
        Fidelity::CycleAccurate => Ok(Box::new(CycleAccurateController::new(config)?)),
    }
}
