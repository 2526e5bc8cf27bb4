//! Transactional memory controller: bounded queue, sampled latency.
//!
//! The middle fidelity. Requests enter a bounded queue at submission with a
//! completion cycle estimated from the configured mean latency, a row-buffer
//! estimate (one remembered row per bank, scaled by the page hit / empty /
//! conflict factors), and seeded pseudo-random noise with the configured
//! standard deviation. `tick` retires due entries in submission order.
//!
//! The generator is a fixed-seed xorshift, so runs are reproducible: the
//! same configuration and request stream produce the same latencies.

use std::collections::VecDeque;

use crate::common::{
    BankState, ConfigError, Cycle, Request, RequestId, RequestKind, Row,
};
use crate::config::{ControllerConfig, Fidelity, Technology};
use crate::stats::Statistics;

use super::decode::AddressDecoder;
use super::invariants::Violation;
use super::MemoryController;

/// Fixed xorshift seed; runs are deterministic.
const RNG_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Queue-based statistical controller.
pub struct TransactionalController {
    config: ControllerConfig,
    decoder: AddressDecoder,
    current_cycle: Cycle,
    next_id: RequestId,
    pending: VecDeque<(Request, Cycle)>,
    /// Remembered open row per bank, for the page-factor estimate.
    last_rows: Vec<Option<Row>>,
    rng_state: u64,
    stats: Statistics,
    tracing: bool,
}

impl TransactionalController {
    /// Builds a transactional controller from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the offending field when the
    /// configuration is inconsistent.
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let decoder = AddressDecoder::new(&config.organization, config.address_mapping);
        let total_banks = config.organization.total_banks();
        let tracing = config.enable_tracing;
        Ok(Self {
            config,
            decoder,
            current_cycle: 0,
            next_id: 1,
            pending: VecDeque::new(),
            last_rows: vec![None; total_banks],
            rng_state: RNG_SEED,
            stats: Statistics::new(),
            tracing,
        })
    }

    /// Next pseudo-random value (xorshift64).
    fn next_random(&mut self) -> u64 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state = x;
        x
    }

    /// Approximately standard-normal sample: sum of twelve uniforms minus
    /// six (Irwin-Hall).
    fn next_gaussian(&mut self) -> f64 {
        let mut sum = 0.0;
        for _ in 0..12 {
            sum += (self.next_random() >> 11) as f64 / (1u64 << 53) as f64;
        }
        sum - 6.0
    }

    /// Estimates a completion latency for the request and updates the
    /// per-bank row estimate.
    fn estimate_latency(&mut self, request: &Request) -> Cycle {
        let decoded = self.decoder.decode(request.address);
        let per_group = self.config.organization.banks_per_bank_group as usize;
        let bank = (decoded.channel as usize
            * self.config.organization.ranks_per_channel as usize
            + decoded.rank as usize)
            * self.config.organization.banks_per_rank() as usize
            + decoded.bank_group as usize * per_group
            + decoded.bank as usize;

        let t = &self.config.timing;
        let factor = match self.last_rows[bank] {
            Some(row) if row == decoded.row => t.page_hit_factor,
            Some(_) => t.page_conflict_factor,
            None => t.page_empty_factor,
        };
        self.last_rows[bank] = Some(decoded.row);

        let mean = match request.kind {
            RequestKind::Read => t.mean_read_latency,
            RequestKind::Write => t.mean_write_latency,
        } as f64;
        let stddev = t.latency_stddev as f64;
        let latency = mean * factor + self.next_gaussian() * stddev;
        latency.max(1.0) as Cycle
    }
}

impl MemoryController for TransactionalController {
    fn submit(&mut self, mut request: Request) -> Option<RequestId> {
        if self.pending.len() >= self.config.queue_depth as usize {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        request.id = id;
        request.submit_cycle = self.current_cycle;

        let latency = self.estimate_latency(&request);
        if self.tracing {
            log::trace!(
                target: "memsim::submit",
                "queued req {} for completion @ {}",
                id,
                self.current_cycle + latency
            );
        }
        self.pending.push_back((request, self.current_cycle + latency));
        Some(id)
    }

    fn can_accept(&self) -> bool {
        self.pending.len() < self.config.queue_depth as usize
    }

    fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn tick(&mut self) {
        self.current_cycle += 1;
        while self
            .pending
            .front()
            .is_some_and(|(_, complete_at)| *complete_at <= self.current_cycle)
        {
            let Some((mut request, _)) = self.pending.pop_front() else {
                break;
            };
            let latency = self.current_cycle - request.submit_cycle;
            if self.config.enable_statistics {
                self.stats.record_request(request.kind, latency, None);
            }
            if let Some(callback) = request.callback.take() {
                callback(latency);
            }
        }
    }

    fn drain(&mut self) {
        while !self.pending.is_empty() {
            self.tick();
        }
    }

    fn reset(&mut self) {
        self.current_cycle = 0;
        self.next_id = 1;
        self.pending.clear();
        self.last_rows.fill(None);
        self.rng_state = RNG_SEED;
        self.stats.reset();
    }

    fn cycle(&self) -> Cycle {
        self.current_cycle
    }

    fn set_cycle(&mut self, cycle: Cycle) {
        self.current_cycle = cycle;
    }

    fn fidelity(&self) -> Fidelity {
        Fidelity::Transactional
    }

    fn technology(&self) -> Technology {
        self.config.technology
    }

    fn config(&self) -> &ControllerConfig {
        &self.config
    }

    fn bank_state(&self, _channel: u8, _bank: u16) -> BankState {
        BankState::Active
    }

    fn is_row_open(&self, channel: u8, bank: u16, row: Row) -> bool {
        self.open_row(channel, bank) == Some(row)
    }

    fn open_row(&self, channel: u8, bank: u16) -> Option<Row> {
        let idx = channel as usize * self.config.organization.banks_per_channel() as usize
            + bank as usize;
        self.last_rows.get(idx).copied().flatten()
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
