//! Refresh management: deadlines, postponement, and pull-in.
//!
//! The refresh manager tracks one deadline per refresh target. A target is
//! the set of banks a single REF command covers, which depends on the
//! policy: every bank of a rank (all-bank), a single bank (per-bank and
//! fine-granularity), the same bank index across a rank's bank groups
//! (same-bank), or an adjacent bank pair (per-2-bank).
//!
//! Deadlines are absolute cycles advanced by one interval per refresh
//! issued. Postponement pushes the nearest deadline out by one interval,
//! bounded by `max_postpone`; a refresh issued while postponements are
//! outstanding repays one. Pull-in moves the nearest deadline earlier so a
//! refresh can run in an idle window, bounded by `max_pull_in`; the banked
//! credit lets a later deadline be redeemed without a refresh.

use crate::common::Cycle;
use crate::config::{OrganizationParams, RefreshConfig, RefreshPolicy};

/// One refresh target: the banks a single REF covers and its deadline.
#[derive(Debug, Clone)]
struct RefreshTarget {
    /// Flattened bank indices covered by this target.
    banks: Vec<usize>,
    /// Absolute cycle at which the next refresh falls due.
    next_due: Cycle,
}

/// Deadline-driven refresh manager.
#[derive(Debug)]
pub struct RefreshManager {
    policy: RefreshPolicy,
    /// Deadline spacing; tREFI, or tREFI/2 for fine granularity.
    interval: Cycle,
    /// Cycles one REF occupies its target banks.
    latency: Cycle,
    max_postpone: u32,
    max_pull_in: u32,

    targets: Vec<RefreshTarget>,
    postpone_count: u32,
    pull_in_count: u32,

    refresh_count: u64,
    postpone_total: u64,
    pull_in_total: u64,
}

impl RefreshManager {
    /// Creates a refresh manager for the given policy and organization.
    ///
    /// Target deadlines are staggered across the first interval so the
    /// refresh load spreads instead of arriving as a burst.
    pub fn new(config: &RefreshConfig, org: &OrganizationParams) -> Self {
        let interval = match config.policy {
            RefreshPolicy::FineGranularity => (config.tREFI / 2).max(1) as Cycle,
            _ => config.tREFI.max(1) as Cycle,
        };
        let latency = match config.policy {
            RefreshPolicy::None => 0,
            RefreshPolicy::AllBank => config.tRFC as Cycle,
            RefreshPolicy::PerBank | RefreshPolicy::Per2Bank => config.tRFCpb as Cycle,
            RefreshPolicy::SameBank => config.tRFCsb as Cycle,
            RefreshPolicy::FineGranularity => (config.tRFCpb / 2).max(1) as Cycle,
        };

        let mut targets = Self::build_targets(config.policy, org);
        let count = targets.len().max(1) as Cycle;
        for (i, target) in targets.iter_mut().enumerate() {
            target.next_due = interval * (i as Cycle + 1) / count;
        }

        Self {
            policy: config.policy,
            interval,
            latency,
            max_postpone: config.max_postpone as u32,
            max_pull_in: config.max_pull_in as u32,
            targets,
            postpone_count: 0,
            pull_in_count: 0,
            refresh_count: 0,
            postpone_total: 0,
            pull_in_total: 0,
        }
    }

    /// Builds the per-policy target groups over flattened bank indices
    /// (channel-major, then rank, bank group, bank).
    fn build_targets(policy: RefreshPolicy, org: &OrganizationParams) -> Vec<RefreshTarget> {
        let groups = org.bank_groups_per_rank as usize;
        let per_group = org.banks_per_bank_group as usize;
        let banks_per_rank = groups * per_group;
        let mut targets = Vec::new();

        let rank_base = |channel: usize, rank: usize| {
            (channel * org.ranks_per_channel as usize + rank) * banks_per_rank
        };

        for channel in 0..org.num_channels as usize {
            for rank in 0..org.ranks_per_channel as usize {
                let base = rank_base(channel, rank);
                match policy {
                    RefreshPolicy::None => {}
                    RefreshPolicy::AllBank => {
                        targets.push(RefreshTarget {
                            banks: (base..base + banks_per_rank).collect(),
                            next_due: 0,
                        });
                    }
                    RefreshPolicy::PerBank | RefreshPolicy::FineGranularity => {
                        for bank in 0..banks_per_rank {
                            targets.push(RefreshTarget {
                                banks: vec![base + bank],
                                next_due: 0,
                            });
                        }
                    }
                    RefreshPolicy::SameBank => {
                        for index in 0..per_group {
                            targets.push(RefreshTarget {
                                banks: (0..groups).map(|g| base + g * per_group + index).collect(),
                                next_due: 0,
                            });
                        }
                    }
                    RefreshPolicy::Per2Bank => {
                        let mut bank = 0;
                        while bank < banks_per_rank {
                            let pair: Vec<usize> = (bank..(bank + 2).min(banks_per_rank))
                                .map(|b| base + b)
                                .collect();
                            targets.push(RefreshTarget {
                                banks: pair,
                                next_due: 0,
                            });
                            bank += 2;
                        }
                    }
                }
            }
        }
        targets
    }

    /// Index of the target with the nearest deadline.
    fn nearest(&self) -> Option<usize> {
        self.targets
            .iter()
            .enumerate()
            .min_by_key(|(_, t)| t.next_due)
            .map(|(i, _)| i)
    }

    /// True when this manager has refresh work at all (policy is not NONE).
    pub fn is_enabled(&self) -> bool {
        self.policy != RefreshPolicy::None && !self.targets.is_empty()
    }

    /// True when the nearest deadline has been reached.
    pub fn refresh_required(&self, now: Cycle) -> bool {
        self.nearest()
            .map(|i| now >= self.targets[i].next_due)
            .unwrap_or(false)
    }

    /// True when refresh is required and the postponement budget is spent.
    pub fn refresh_urgent(&self, now: Cycle) -> bool {
        self.refresh_required(now) && self.postpone_count >= self.max_postpone
    }

    /// Banks of the target the controller must refresh next.
    pub fn banks_to_refresh(&self) -> &[usize] {
        match self.nearest() {
            Some(i) => &self.targets[i].banks,
            None => &[],
        }
    }

    /// Cycles a REF over the given banks occupies them.
    pub fn refresh_latency(&self, _banks: &[usize]) -> Cycle {
        self.latency
    }

    /// Records a refresh of the target covering `banks`: its deadline
    /// advances one interval, and an outstanding postponement, if any, is
    /// repaid. Falls back to the nearest target when no target matches.
    pub fn refresh_issued(&mut self, banks: &[usize]) {
        let target = self
            .targets
            .iter()
            .position(|t| t.banks == banks)
            .or_else(|| self.nearest());
        if let Some(i) = target {
            self.targets[i].next_due += self.interval;
            self.refresh_count += 1;
            if self.postpone_count > 0 {
                self.postpone_count -= 1;
            }
        }
    }

    /// True while postponement budget remains.
    pub fn can_postpone(&self) -> bool {
        self.is_enabled() && self.postpone_count < self.max_postpone
    }

    /// Postpones the nearest deadline by one interval.
    ///
    /// Returns `false` without effect when the budget is exhausted.
    pub fn postpone(&mut self) -> bool {
        if !self.can_postpone() {
            return false;
        }
        if let Some(i) = self.nearest() {
            self.targets[i].next_due += self.interval;
            self.postpone_count += 1;
            self.postpone_total += 1;
            return true;
        }
        false
    }

    /// Outstanding postponements.
    pub fn postpone_count(&self) -> u32 {
        self.postpone_count
    }

    /// True while pull-in budget remains.
    pub fn can_pull_in(&self) -> bool {
        self.is_enabled() && self.pull_in_count < self.max_pull_in
    }

    /// Pulls the nearest deadline in by one interval so the refresh can run
    /// during an idle window.
    ///
    /// Returns `false` without effect when the budget is exhausted.
    pub fn pull_in(&mut self) -> bool {
        if !self.can_pull_in() {
            return false;
        }
        if let Some(i) = self.nearest() {
            let target = &mut self.targets[i];
            target.next_due = target.next_due.saturating_sub(self.interval);
            self.pull_in_count += 1;
            self.pull_in_total += 1;
            return true;
        }
        false
    }

    /// Outstanding pull-ins (refreshes banked ahead of schedule).
    pub fn pull_in_count(&self) -> u32 {
        self.pull_in_count
    }

    /// Redeems one unit of pull-in credit against a due deadline: the
    /// deadline advances as if refreshed, consuming the credit.
    ///
    /// Returns `true` when a deadline was redeemed.
    pub fn redeem_pull_in(&mut self, now: Cycle) -> bool {
        if self.pull_in_count == 0 {
            return false;
        }
        if let Some(i) = self.nearest() {
            if now >= self.targets[i].next_due {
                self.targets[i].next_due += self.interval;
                self.pull_in_count -= 1;
                return true;
            }
        }
        false
    }

    /// How far past its deadline the most overdue target is, in cycles.
    pub fn overdue_by(&self, now: Cycle) -> Cycle {
        self.nearest()
            .map(|i| now.saturating_sub(self.targets[i].next_due))
            .unwrap_or(0)
    }

    /// Deadline spacing in cycles.
    pub fn interval(&self) -> Cycle {
        self.interval
    }

    /// Total refreshes issued.
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    /// Total postponements.
    pub fn postpone_total(&self) -> u64 {
        self.postpone_total
    }

    /// Total pull-ins.
    pub fn pull_in_total(&self) -> u64 {
        self.pull_in_total
    }

    /// Restores the initial deadline stagger and zeroes all counters.
    pub fn reset(&mut self) {
        let count = self.targets.len().max(1) as Cycle;
        for (i, target) in self.targets.iter_mut().enumerate() {
            target.next_due = self.interval * (i as Cycle + 1) / count;
        }
        self.postpone_count = 0;
        self.pull_in_count = 0;
        self.refresh_count = 0;
        self.postpone_total = 0;
        self.pull_in_total = 0;
    }
}
