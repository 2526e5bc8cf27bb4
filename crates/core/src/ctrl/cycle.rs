//! Cycle-accurate memory controller.
//!
//! The controller advances in four ordered phases per tick:
//! 1. **Advance:** bank state machines whose deadline elapsed complete their
//!    transition.
//! 2. **Refresh poll:** due refreshes are issued, postponed, or escalated to
//!    urgent preemption of the affected banks.
//! 3. **Issue:** the scheduler nominates one request per eligible bank and
//!    the controller emits the protocol command the bank state allows,
//!    honoring every timing constraint.
//! 4. **Retire:** completed bursts update statistics and run completion
//!    notifiers.
//!
//! Commands are serialized by a fixed ascending walk over the flattened
//! (channel, rank, bank group, bank) indices, which makes the schedule
//! deterministic for a given request stream and configuration.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use log::trace;

use crate::common::{
    BankState, ConfigError, Cycle, Request, RequestId, RequestKind, Row,
};
use crate::config::{ControllerConfig, Fidelity, Technology};
use crate::stats::{PageAccess, Statistics};

use super::bank::{ActWindow, BankMachine};
use super::decode::AddressDecoder;
use super::invariants::{InvariantChecker, Violation};
use super::refresh::RefreshManager;
use super::sched::{create_scheduler, QueuedRequest, Scheduler};
use super::MemoryController;

/// Cycle-accurate controller with full protocol state machines.
pub struct CycleAccurateController {
    config: ControllerConfig,
    decoder: AddressDecoder,

    current_cycle: Cycle,
    next_id: RequestId,

    banks: Vec<BankMachine>,
    /// One four-activate window per (channel, rank).
    act_windows: Vec<ActWindow>,
    scheduler: Box<dyn Scheduler>,
    refresh: RefreshManager,

    /// Pool of accepted requests, keyed by identifier. Scheduler buffers
    /// carry identifiers into this pool, never references.
    requests: HashMap<RequestId, Request>,
    /// Page classification, stamped at the first command issued on a
    /// request's behalf.
    page_class: HashMap<RequestId, PageAccess>,
    /// Issued column commands waiting for their data phase, ordered by
    /// retirement cycle then submission order.
    completions: BinaryHeap<Reverse<(Cycle, RequestId)>>,

    last_command: RequestKind,
    /// Banks excluded from scheduling this tick by an urgent refresh.
    refresh_blocked: Vec<bool>,

    stats: Statistics,
    tracing: bool,
    check_invariants: bool,
    checker: InvariantChecker,
}

impl CycleAccurateController {
    /// Builds a cycle-accurate controller from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the offending field when the
    /// configuration is inconsistent.
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let total_banks = config.organization.total_banks();
        let num_windows =
            config.organization.num_channels as usize * config.organization.ranks_per_channel as usize;
        let scheduler = create_scheduler(
            &config.scheduler,
            total_banks,
            config.queue_depth as usize,
        )?;
        let refresh = RefreshManager::new(&config.refresh, &config.organization);
        let decoder = AddressDecoder::new(&config.organization, config.address_mapping);
        let tracing = config.enable_tracing;
        let check_invariants = config.enable_invariants;

        Ok(Self {
            config,
            decoder,
            current_cycle: 0,
            next_id: 1,
            banks: vec![BankMachine::new(); total_banks],
            act_windows: vec![ActWindow::new(); num_windows],
            scheduler,
            refresh,
            requests: HashMap::new(),
            page_class: HashMap::new(),
            completions: BinaryHeap::new(),
            last_command: RequestKind::Read,
            refresh_blocked: vec![false; total_banks],
            stats: Statistics::new(),
            tracing,
            check_invariants,
            checker: InvariantChecker::new(),
        })
    }

    /// Banks per rank.
    fn banks_per_rank(&self) -> usize {
        self.config.organization.bank_groups_per_rank as usize
            * self.config.organization.banks_per_bank_group as usize
    }

    /// Banks per channel, across all of its ranks (flattened index stride).
    fn channel_stride(&self) -> usize {
        self.config.organization.ranks_per_channel as usize * self.banks_per_rank()
    }

    /// Flattened index of a decoded bank.
    fn flat_index(&self, channel: u8, rank: u8, bank_group: u8, bank: u8) -> usize {
        let per_group = self.config.organization.banks_per_bank_group as usize;
        (channel as usize * self.config.organization.ranks_per_channel as usize + rank as usize)
            * self.banks_per_rank()
            + bank_group as usize * per_group
            + bank as usize
    }

    /// (channel, rank, bank group) of a flattened index.
    fn coords(&self, idx: usize) -> (usize, usize, usize) {
        let per_group = self.config.organization.banks_per_bank_group as usize;
        let rank_slot = idx / self.banks_per_rank();
        let in_rank = idx % self.banks_per_rank();
        let ranks = self.config.organization.ranks_per_channel as usize;
        (rank_slot / ranks, rank_slot % ranks, in_rank / per_group)
    }

    /// Index of the (channel, rank) activate window owning a bank.
    fn window_of(&self, idx: usize) -> usize {
        idx / self.banks_per_rank()
    }

    /// Issues an ACT, propagating tRRD to the rank's other banks and
    /// recording the activate in the tFAW window.
    fn issue_activate(&mut self, idx: usize, row: Row, now: Cycle) {
        let t = self.config.timing;
        self.banks[idx].issue_act(now, row, &t);

        let (_, _, group) = self.coords(idx);
        let per_group = self.config.organization.banks_per_bank_group as usize;
        let rank_start = (idx / self.banks_per_rank()) * self.banks_per_rank();
        for j in rank_start..rank_start + self.banks_per_rank() {
            if j == idx {
                continue;
            }
            let same_group = (j - rank_start) / per_group == group;
            let rrd = if same_group { t.tRRD_L } else { t.tRRD_S };
            self.banks[j].constrain_act(now + rrd as Cycle);
        }
        let window_idx = self.window_of(idx);
        self.act_windows[window_idx].record(now);

        if self.tracing {
            trace!(target: "memsim::cmd", "ACT bank {} row {} @ {}", idx, row, now);
        }
    }

    /// Issues a RD or WR, propagating tCCD and the bus turnaround
    /// constraints across the channel and scheduling the data phase.
    fn issue_column(&mut self, idx: usize, id: RequestId, kind: RequestKind, now: Cycle) {
        let t = self.config.timing;
        match kind {
            RequestKind::Read => self.banks[idx].issue_read(now, &t),
            RequestKind::Write => self.banks[idx].issue_write(now, &t),
        }

        let (_, rank, group) = self.coords(idx);
        let channel_start = (idx / self.channel_stride()) * self.channel_stride();
        for j in channel_start..channel_start + self.channel_stride() {
            let (_, j_rank, j_group) = self.coords(j);
            let same_group = j_rank == rank && j_group == group;
            let ccd = if same_group { t.tCCD_L } else { t.tCCD_S } as Cycle;
            match kind {
                RequestKind::Read => {
                    self.banks[j].constrain_read(now + ccd);
                    self.banks[j].constrain_write(now + t.tRTW as Cycle);
                }
                RequestKind::Write => {
                    self.banks[j].constrain_write(now + ccd);
                    let wtr = if same_group { t.tWTR_L } else { t.tWTR_S };
                    self.banks[j].constrain_read(now + (t.tWL + t.tBurst + wtr) as Cycle);
                }
            }
        }

        if self.config.enable_statistics && kind != self.last_command {
            match kind {
                RequestKind::Read => self.stats.write_to_read_turnarounds += 1,
                RequestKind::Write => self.stats.read_to_write_turnarounds += 1,
            }
        }
        self.last_command = kind;
        self.scheduler.mark_issued(idx, id);

        // The data phase completes tCL (reads) or tWL (writes) after the
        // command; recorded latency adds the burst on top.
        let retire_at = now
            + match kind {
                RequestKind::Read => t.tCL,
                RequestKind::Write => t.tWL,
            } as Cycle;
        self.completions.push(Reverse((retire_at, id)));

        if self.tracing {
            trace!(target: "memsim::cmd", "{:?} bank {} req {} @ {}", kind, idx, id, now);
        }
    }

    /// Phase 2: refresh poll. Returns whether a command was issued.
    fn poll_refresh(&mut self, now: Cycle) -> bool {
        if !self.refresh.is_enabled() {
            return false;
        }
        let mut issued = false;

        if self.refresh.refresh_required(now) {
            // A refresh banked ahead of schedule satisfies this deadline.
            if self.refresh.redeem_pull_in(now) {
                return false;
            }

            let targets: Vec<usize> = self.refresh.banks_to_refresh().to_vec();
            let all_ready = targets.iter().all(|&b| self.banks[b].can_refresh(now));

            if all_ready {
                issued = self.issue_refresh(&targets, now);
            } else if self.refresh.refresh_urgent(now) {
                // Preempt: no new commands to the targets, and drive active
                // ones to idle so the refresh can begin.
                let t = self.config.timing;
                for &b in &targets {
                    self.refresh_blocked[b] = true;
                    if self.banks[b].can_precharge(now) {
                        self.banks[b].issue_precharge(now, &t);
                        issued = true;
                    }
                }
                if self.check_invariants {
                    let slip = self.refresh.overdue_by(now);
                    let interval = self.refresh.interval();
                    if slip >= interval && slip % interval == 0 {
                        let bank = targets.first().copied().unwrap_or(0);
                        let channel = (bank / self.channel_stride()) as u8;
                        let in_channel = (bank % self.channel_stride()) as u8;
                        self.checker.record(
                            now,
                            "refresh_starvation",
                            format!("refresh overdue by {} cycles", slip),
                            channel,
                            in_channel,
                        );
                    }
                }
            } else if self.refresh.can_postpone() {
                self.refresh.postpone();
                if self.tracing {
                    trace!(target: "memsim::refresh", "postponed refresh @ {}", now);
                }
            }
        } else if self.refresh.can_pull_in() {
            // Idle window: pull the nearest deadline in and refresh early.
            let targets: Vec<usize> = self.refresh.banks_to_refresh().to_vec();
            let idle = !targets.is_empty()
                && targets.iter().all(|&b| {
                    self.banks[b].can_refresh(now) && self.scheduler.buffer_depths()[b] == 0
                });
            if idle && self.refresh.pull_in() {
                issued = self.issue_refresh(&targets, now);
            }
        }

        issued
    }

    /// Issues a REF covering `targets`, which must all be idle.
    fn issue_refresh(&mut self, targets: &[usize], now: Cycle) -> bool {
        let latency = self.refresh.refresh_latency(targets);
        for &b in targets {
            self.banks[b].issue_refresh(now, latency);
            self.refresh_blocked[b] = true;
        }
        self.refresh.refresh_issued(targets);
        if self.config.enable_statistics {
            self.stats.refreshes += 1;
        }
        if self.tracing {
            trace!(target: "memsim::refresh", "REF banks {:?} for {} @ {}", targets, latency, now);
        }
        true
    }

    /// Phase 3: one nomination per eligible bank, one command at most.
    fn issue_commands(&mut self, now: Cycle) -> bool {
        let mut issued = false;
        for idx in 0..self.banks.len() {
            if self.refresh_blocked[idx] {
                continue;
            }
            let state = self.banks[idx].state();
            if !matches!(state, BankState::Idle | BankState::Active) {
                continue;
            }
            let open = self.banks[idx].active_row();
            let Some(id) = self.scheduler.get_next(idx, open, self.last_command) else {
                continue;
            };
            let Some((row, kind)) = self.requests.get(&id).map(|r| (r.row, r.kind)) else {
                continue;
            };

            match state {
                BankState::Idle => {
                    let window = self.window_of(idx);
                    if self.banks[idx].can_activate(now)
                        && self.act_windows[window].permits(now, self.config.timing.tFAW)
                    {
                        self.page_class.entry(id).or_insert(PageAccess::Empty);
                        self.issue_activate(idx, row, now);
                        issued = true;
                    }
                }
                BankState::Active => {
                    if open == Some(row) {
                        let ready = match kind {
                            RequestKind::Read => self.banks[idx].can_read(now, row),
                            RequestKind::Write => self.banks[idx].can_write(now, row),
                        };
                        if ready {
                            self.page_class.entry(id).or_insert(PageAccess::Hit);
                            self.issue_column(idx, id, kind, now);
                            issued = true;
                        }
                    } else {
                        // Conflict: the open row must close first.
                        self.page_class.entry(id).or_insert(PageAccess::Conflict);
                        if self.banks[idx].can_precharge(now) {
                            let t = self.config.timing;
                            self.banks[idx].issue_precharge(now, &t);
                            issued = true;
                            if self.tracing {
                                trace!(target: "memsim::cmd", "PRE bank {} @ {}", idx, now);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        issued
    }

    /// Phase 4: retire completed data phases in order.
    fn retire(&mut self, now: Cycle) {
        while let Some(&Reverse((at, id))) = self.completions.peek() {
            if at > now {
                break;
            }
            self.completions.pop();
            let Some(mut request) = self.requests.remove(&id) else {
                continue;
            };
            let bank = self.flat_index(
                request.channel,
                request.rank,
                request.bank_group,
                request.bank,
            );
            self.scheduler.remove(bank, id);

            let latency = at - request.submit_cycle + self.config.timing.tBurst as Cycle;
            let class = self.page_class.remove(&id);
            if self.config.enable_statistics {
                self.stats.record_request(request.kind, latency, class);
            }
            if self.tracing {
                trace!(target: "memsim::retire", "req {} retired @ {} latency {}", id, now, latency);
            }
            if let Some(callback) = request.callback.take() {
                callback(latency);
            }
        }
    }

    /// Per-cycle utilization and state-occupancy counters.
    fn update_cycle_stats(&mut self, issued: bool) {
        let mut any_busy = false;
        for bank in &self.banks {
            match bank.state() {
                BankState::Idle => {}
                BankState::Activating
                | BankState::Active
                | BankState::Reading
                | BankState::Writing => {
                    self.stats.active_cycles += 1;
                    any_busy = true;
                }
                BankState::Precharging => {
                    self.stats.precharge_cycles += 1;
                    any_busy = true;
                }
                BankState::Refreshing => {
                    self.stats.refresh_cycles += 1;
                    any_busy = true;
                }
            }
        }
        if any_busy {
            self.stats.busy_cycles += 1;
        } else {
            self.stats.idle_cycles += 1;
        }
        if self.scheduler.has_any_pending() && !issued {
            self.stats.stall_cycles += 1;
        }
    }

    /// Scheduler selection counters, exposed for inspection.
    pub fn scheduler_stats(&self) -> (u64, u64, u64) {
        (
            self.scheduler.requests_selected(),
            self.scheduler.row_hits_selected(),
            self.scheduler.grouping_decisions(),
        )
    }
}

impl MemoryController for CycleAccurateController {
    fn submit(&mut self, mut request: Request) -> Option<RequestId> {
        if !self.scheduler.has_space(1) {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        request.id = id;
        request.submit_cycle = self.current_cycle;

        let decoded = self.decoder.decode(request.address);
        request.channel = decoded.channel;
        request.rank = decoded.rank;
        request.bank_group = decoded.bank_group;
        request.bank = decoded.bank;
        request.row = decoded.row;
        request.column = decoded.column;

        let bank = self.flat_index(decoded.channel, decoded.rank, decoded.bank_group, decoded.bank);
        if self.tracing {
            trace!(target: "memsim::submit", "accepted {:?} -> bank {}", request, bank);
        }
        self.scheduler.store(
            bank,
            QueuedRequest {
                id,
                address: request.address,
                row: request.row,
                kind: request.kind,
                priority: request.priority,
                issued: false,
            },
        );
        self.requests.insert(id, request);
        Some(id)
    }

    fn can_accept(&self) -> bool {
        self.scheduler.has_space(1)
    }

    fn has_pending(&self) -> bool {
        self.scheduler.has_any_pending()
    }

    fn pending_count(&self) -> usize {
        self.scheduler.occupancy()
    }

    fn tick(&mut self) {
        let now = self.current_cycle;

        for bank in &mut self.banks {
            bank.advance(now);
        }

        self.refresh_blocked.fill(false);
        let refresh_issued = self.poll_refresh(now);
        let command_issued = self.issue_commands(now);
        self.retire(now);

        if self.config.enable_statistics {
            self.update_cycle_stats(refresh_issued || command_issued);
        }
        if self.check_invariants {
            let per_channel = self.channel_stride();
            for idx in 0..self.banks.len() {
                let channel = (idx / per_channel) as u8;
                let in_channel = (idx % per_channel) as u8;
                self.checker
                    .check_bank(now, channel, in_channel, &self.banks[idx]);
            }
        }

        self.current_cycle = now + 1;
    }

    fn drain(&mut self) {
        while self.scheduler.has_any_pending()
            || (self.refresh.is_enabled() && self.refresh.refresh_required(self.current_cycle))
        {
            self.tick();
        }
    }

    fn reset(&mut self) {
        self.current_cycle = 0;
        self.next_id = 1;
        for bank in &mut self.banks {
            bank.reset();
        }
        for window in &mut self.act_windows {
            window.reset();
        }
        self.scheduler.clear();
        self.refresh.reset();
        self.requests.clear();
        self.page_class.clear();
        self.completions.clear();
        self.last_command = RequestKind::Read;
        self.stats.reset();
        self.checker.clear();
    }

    fn cycle(&self) -> Cycle {
        self.current_cycle
    }

    fn set_cycle(&mut self, cycle: Cycle) {
        self.current_cycle = cycle;
    }

    fn fidelity(&self) -> Fidelity {
        Fidelity::CycleAccurate
    }

    fn technology(&self) -> Technology {
        self.config.technology
    }

    fn config(&self) -> &ControllerConfig {
        &self.config
    }

    fn bank_state(&self, channel: u8, bank: u16) -> BankState {
        let idx = channel as usize * self.channel_stride() + bank as usize;
        self.banks
            .get(idx)
            .map(|b| b.state())
            .unwrap_or(BankState::Idle)
    }

    fn is_row_open(&self, channel: u8, bank: u16, row: Row) -> bool {
        self.open_row(channel, bank) == Some(row)
    }

    fn open_row(&self, channel: u8, bank: u16) -> Option<Row> {
        let idx = channel as usize * self.channel_stride() + bank as usize;
        self.banks.get(idx).and_then(|b| b.active_row())
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

    fn enable_invariants(&mut self, enable: bool) {
        self.check_invariants = enable;
    }

    fn invariants_enabled(&self) -> bool {
        self.check_invariants
    }

    fn violations(&self) -> &[Violation] {
        self.checker.violations()
    }

    fn clear_violations(&mut self) {
        self.checker.clear();
    }
}
