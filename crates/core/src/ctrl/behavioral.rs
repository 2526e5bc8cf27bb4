//! Behavioral memory controller: fixed latency, instant completion.
//!
//! The fastest fidelity: a request completes inside `submit`, its notifier
//! running with the configured fixed latency before `submit` returns. No
//! queue, no bank state, no refresh. Useful for functional bring-up where
//! memory timing is irrelevant.

use crate::common::{
    BankState, ConfigError, Cycle, Request, RequestId, RequestKind, Row,
};
use crate::config::{ControllerConfig, Fidelity, Technology};
use crate::stats::Statistics;

use super::invariants::Violation;
use super::MemoryController;

/// Fixed-latency controller.
pub struct BehavioralController {
    config: ControllerConfig,
    current_cycle: Cycle,
    next_id: RequestId,
    stats: Statistics,
    tracing: bool,
}

impl BehavioralController {
    /// Builds a behavioral controller from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the offending field when the
    /// configuration is inconsistent.
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let tracing = config.enable_tracing;
        Ok(Self {
            config,
            current_cycle: 0,
            next_id: 1,
            stats: Statistics::new(),
            tracing,
        })
    }
}

impl MemoryController for BehavioralController {
    /// Completes the request immediately; the notifier runs before `submit`
    /// returns.
    fn submit(&mut self, mut request: Request) -> Option<RequestId> {
        let id = self.next_id;
        self.next_id += 1;
        request.id = id;
        request.submit_cycle = self.current_cycle;

        let latency = match request.kind {
            RequestKind::Read => self.config.timing.fixed_read_latency,
            RequestKind::Write => self.config.timing.fixed_write_latency,
        } as Cycle;

        if self.config.enable_statistics {
            self.stats.record_request(request.kind, latency, None);
        }
        if let Some(callback) = request.callback.take() {
            callback(latency);
        }
        Some(id)
    }

    fn can_accept(&self) -> bool {
        true
    }

    fn has_pending(&self) -> bool {
        false
    }

    fn pending_count(&self) -> usize {
        0
    }

    fn tick(&mut self) {
        self.current_cycle += 1;
    }

    fn drain(&mut self) {}

    fn reset(&mut self) {
        self.current_cycle = 0;
        self.next_id = 1;
        self.stats.reset();
    }

    fn cycle(&self) -> Cycle {
        self.current_cycle
    }

    fn set_cycle(&mut self, cycle: Cycle) {
        self.current_cycle = cycle;
    }

    fn fidelity(&self) -> Fidelity {
        Fidelity::Behavioral
    }

    fn technology(&self) -> Technology {
        self.config.technology
    }

    fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Behavioral banks are always notionally active.
    fn bank_state(&self, _channel: u8, _bank: u16) -> BankState {
        BankState::Active
    }

    fn is_row_open(&self, _channel: u8, _bank: u16, _row: Row) -> bool {
        true
    }

    fn open_row(&self, _channel: u8, _bank: u16) -> Option<Row> {
        Some(0)
    }

    fn num_channels(&self) -> u8 {
        self.config.organization.num_channels
    }

    fn banks_per_channel(&self) -> u16 {
        self.config.organization.banks_per_channel()
    }

    fn stats(&self) -> &Statistics {
        &self.stats
    }

    fn reset_stats(&mut self) {
        self.stats.reset();
    }

    fn enable_tracing(&mut self, enable: bool) {
        self.tracing = enable;
    }

    fn tracing_enabled(&self) -> bool {
        self.tracing
    }

    fn enable_invariants(&mut self, _enable: bool) {}

    fn invariants_enabled(&self) -> bool {
        false
    }

    fn violations(&self) -> &[Violation] {
        &[]
    }

    fn clear_violations(&mut self) {}
}
