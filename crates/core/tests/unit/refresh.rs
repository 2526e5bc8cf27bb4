//! Refresh manager tests.
//!
//! Verifies the per-policy target shapes, deadline accounting, and the
//! postpone / pull-in budgets.

use memsim_core::config::{OrganizationParams, RefreshConfig, RefreshPolicy};
use memsim_core::ctrl::refresh::RefreshManager;

fn single_bank_org() -> OrganizationParams {
    OrganizationParams {
        bank_groups_per_rank: 1,
        banks_per_bank_group: 1,
        ..OrganizationParams::default()
    }
}

fn config(policy: RefreshPolicy, t_refi: u32) -> RefreshConfig {
    RefreshConfig {
        policy,
        tREFI: t_refi,
        tRFC: 280,
        tRFCpb: 90,
        tRFCsb: 90,
        max_postpone: 2,
        max_pull_in: 2,
    }
}

// ══════════════════════════════════════════════════════════
// 1. Target shapes per policy
// ══════════════════════════════════════════════════════════

#[test]
fn none_policy_is_disabled() {
    let mgr = RefreshManager::new(
        &config(RefreshPolicy::None, 1000),
        &OrganizationParams::default(),
    );
    assert!(!mgr.is_enabled());
    assert!(!mgr.refresh_required(u64::MAX));
    assert!(mgr.banks_to_refresh().is_empty());
}

#[test]
fn all_bank_covers_the_whole_rank() {
    let mgr = RefreshManager::new(
        &config(RefreshPolicy::AllBank, 1000),
        &OrganizationParams::default(),
    );
    let banks = mgr.banks_to_refresh();
    assert_eq!(banks.len(), 16);
    assert_eq!(mgr.refresh_latency(banks), 280);
}

#[test]
fn per_bank_targets_single_banks() {
    let mgr = RefreshManager::new(
        &config(RefreshPolicy::PerBank, 1600),
        &OrganizationParams::default(),
    );
    let banks = mgr.banks_to_refresh();
    assert_eq!(banks.len(), 1);
    assert_eq!(mgr.refresh_latency(banks), 90);

    // Deadlines are staggered: the first bank falls due one sixteenth of
    // the interval in.
    assert!(!mgr.refresh_required(99));
    assert!(mgr.refresh_required(100));
}

#[test]
fn same_bank_groups_the_same_index_across_groups() {
    let mgr = RefreshManager::new(
        &config(RefreshPolicy::SameBank, 1000),
        &OrganizationParams::default(),
    );
    let banks = mgr.banks_to_refresh();
    // Bank index 0 in each of the four groups: flattened 0, 4, 8, 12.
    assert_eq!(banks, &[0, 4, 8, 12]);
    assert_eq!(mgr.refresh_latency(banks), 90);
}

#[test]
fn per_2_bank_pairs_adjacent_banks() {
    let mgr = RefreshManager::new(
        &config(RefreshPolicy::Per2Bank, 1000),
        &OrganizationParams::default(),
    );
    assert_eq!(mgr.banks_to_refresh(), &[0, 1]);
}

#[test]
fn fine_granularity_halves_interval_and_latency() {
    let mgr = RefreshManager::new(&config(RefreshPolicy::FineGranularity, 1000), &single_bank_org());
    assert_eq!(mgr.interval(), 500);
    assert_eq!(mgr.refresh_latency(&[0]), 45);
}

// ══════════════════════════════════════════════════════════
// 2. Deadline accounting
// ══════════════════════════════════════════════════════════

#[test]
fn required_at_the_deadline_not_before() {
    let mgr = RefreshManager::new(&config(RefreshPolicy::PerBank, 1000), &single_bank_org());
    assert!(!mgr.refresh_required(999));
    assert!(mgr.refresh_required(1000));
    assert!(mgr.refresh_required(5000));
}

#[test]
fn refresh_issued_advances_one_interval() {
    let mut mgr = RefreshManager::new(&config(RefreshPolicy::PerBank, 1000), &single_bank_org());
    assert!(mgr.refresh_required(1000));
    mgr.refresh_issued(&[0]);
    assert!(!mgr.refresh_required(1000));
    assert!(mgr.refresh_required(2000));
    assert_eq!(mgr.refresh_count(), 1);
}

// ══════════════════════════════════════════════════════════
// 3. Postponement
// ══════════════════════════════════════════════════════════

#[test]
fn postpone_is_bounded() {
    let mut mgr = RefreshManager::new(&config(RefreshPolicy::PerBank, 1000), &single_bank_org());
    assert!(mgr.can_postpone());
    assert!(mgr.postpone());
    assert!(mgr.postpone());
    assert!(!mgr.can_postpone());
    assert!(!mgr.postpone(), "budget of two is spent");
    assert_eq!(mgr.postpone_count(), 2);
    assert_eq!(mgr.postpone_total(), 2);
}

#[test]
fn postpone_moves_the_deadline() {
    let mut mgr = RefreshManager::new(&config(RefreshPolicy::PerBank, 1000), &single_bank_org());
    assert!(mgr.refresh_required(1000));
    mgr.postpone();
    assert!(!mgr.refresh_required(1000));
    assert!(mgr.refresh_required(2000));
}

#[test]
fn urgent_once_budget_is_spent() {
    let mut mgr = RefreshManager::new(&config(RefreshPolicy::PerBank, 1000), &single_bank_org());
    assert!(!mgr.refresh_urgent(1000), "budget remains: not urgent");
    mgr.postpone();
    mgr.postpone();
    assert!(!mgr.refresh_urgent(2999));
    assert!(mgr.refresh_urgent(3000));
}

#[test]
fn issued_refresh_repays_one_postponement() {
    let mut mgr = RefreshManager::new(&config(RefreshPolicy::PerBank, 1000), &single_bank_org());
    mgr.postpone();
    mgr.postpone();
    mgr.refresh_issued(&[0]);
    assert_eq!(mgr.postpone_count(), 1);
    assert!(mgr.can_postpone());
}

// ══════════════════════════════════════════════════════════
// 4. Pull-in
// ══════════════════════════════════════════════════════════

#[test]
fn pull_in_is_bounded() {
    let mut mgr = RefreshManager::new(&config(RefreshPolicy::PerBank, 1000), &single_bank_org());
    assert!(mgr.pull_in());
    assert!(mgr.pull_in());
    assert!(!mgr.can_pull_in());
    assert!(!mgr.pull_in());
    assert_eq!(mgr.pull_in_count(), 2);
    assert_eq!(mgr.pull_in_total(), 2);
}

#[test]
fn pull_in_advances_the_deadline_toward_now() {
    let mut mgr = RefreshManager::new(&config(RefreshPolicy::PerBank, 1000), &single_bank_org());
    assert!(!mgr.refresh_required(500));
    mgr.pull_in();
    // Deadline moved from 1000 to 0: due immediately.
    assert!(mgr.refresh_required(0));
}

#[test]
fn banked_credit_redeems_a_later_deadline() {
    let mut mgr = RefreshManager::new(&config(RefreshPolicy::PerBank, 1000), &single_bank_org());

    // Refresh early during an idle window.
    mgr.pull_in();
    assert!(mgr.refresh_required(0));
    mgr.refresh_issued(&[0]);
    assert_eq!(mgr.pull_in_count(), 1);

    // The nominal deadline at 1000 is satisfied by the banked refresh.
    assert!(mgr.refresh_required(1000));
    assert!(mgr.redeem_pull_in(1000));
    assert!(!mgr.refresh_required(1000));
    assert_eq!(mgr.pull_in_count(), 0);

    // No credit left: the next deadline needs a real refresh.
    assert!(!mgr.redeem_pull_in(2000));
}

// ══════════════════════════════════════════════════════════
// 5. Reset
// ══════════════════════════════════════════════════════════

#[test]
fn reset_restores_deadlines_and_counters() {
    let mut mgr = RefreshManager::new(&config(RefreshPolicy::PerBank, 1000), &single_bank_org());
    mgr.postpone();
    mgr.refresh_issued(&[0]);
    mgr.pull_in();

    mgr.reset();
    assert_eq!(mgr.postpone_count(), 0);
    assert_eq!(mgr.pull_in_count(), 0);
    assert_eq!(mgr.refresh_count(), 0);
    assert!(!mgr.refresh_required(999));
    assert!(mgr.refresh_required(1000));
}
