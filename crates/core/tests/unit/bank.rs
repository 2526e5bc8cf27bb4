//! Bank state machine tests.
//!
//! Verifies the per-bank protocol transitions, the monotonicity of the
//! earliest-legal-cycle stamps, and the four-activate window.

use memsim_core::common::BankState;
use memsim_core::config::TimingParams;
use memsim_core::ctrl::bank::{ActWindow, BankMachine};

fn timing() -> TimingParams {
    TimingParams::default()
}

// ══════════════════════════════════════════════════════════
// 1. State transitions
// ══════════════════════════════════════════════════════════

#[test]
fn starts_idle_with_zero_stamps() {
    let bank = BankMachine::new();
    assert_eq!(bank.state(), BankState::Idle);
    assert_eq!(bank.open_row(), None);
    assert_eq!(bank.next_act(), 0);
    assert_eq!(bank.next_rd(), 0);
    assert_eq!(bank.next_wr(), 0);
    assert_eq!(bank.next_pre(), 0);
}

#[test]
fn activate_opens_row_after_trcd() {
    let t = timing();
    let mut bank = BankMachine::new();

    bank.issue_act(10, 7, &t);
    assert_eq!(bank.state(), BankState::Activating);
    assert_eq!(bank.open_row(), Some(7));
    assert_eq!(bank.state_until(), 10 + t.tRCD as u64);

    // Mid-activation the row is not yet usable.
    assert_eq!(bank.active_row(), None);

    bank.advance(10 + t.tRCD as u64 - 1);
    assert_eq!(bank.state(), BankState::Activating);
    bank.advance(10 + t.tRCD as u64);
    assert_eq!(bank.state(), BankState::Active);
    assert_eq!(bank.active_row(), Some(7));
}

#[test]
fn activate_sets_column_and_row_stamps() {
    let t = timing();
    let mut bank = BankMachine::new();

    bank.issue_act(0, 0, &t);
    assert_eq!(bank.next_rd(), t.tRCD as u64);
    assert_eq!(bank.next_wr(), t.tRCD as u64);
    assert_eq!(bank.next_pre(), t.tRAS as u64);
    assert_eq!(bank.next_act(), t.tRC as u64);
}

#[test]
fn read_returns_to_active_after_burst() {
    let t = timing();
    let mut bank = BankMachine::new();
    bank.issue_act(0, 3, &t);
    bank.advance(t.tRCD as u64);

    let now = t.tRCD as u64;
    bank.issue_read(now, &t);
    assert_eq!(bank.state(), BankState::Reading);
    bank.advance(now + t.tBurst as u64);
    assert_eq!(bank.state(), BankState::Active);
    assert_eq!(bank.active_row(), Some(3));
}

#[test]
fn precharge_closes_row_after_trp() {
    let t = timing();
    let mut bank = BankMachine::new();
    bank.issue_act(0, 3, &t);
    bank.advance(t.tRCD as u64);

    let now = t.tRAS as u64;
    bank.issue_precharge(now, &t);
    assert_eq!(bank.state(), BankState::Precharging);
    // The row stays associated until the precharge completes.
    assert_eq!(bank.open_row(), Some(3));
    assert_eq!(bank.active_row(), None);

    bank.advance(now + t.tRP as u64);
    assert_eq!(bank.state(), BankState::Idle);
    assert_eq!(bank.open_row(), None);
}

#[test]
fn refresh_occupies_bank_then_idles() {
    let mut bank = BankMachine::new();

    bank.issue_refresh(5, 90);
    assert_eq!(bank.state(), BankState::Refreshing);
    assert!(!bank.can_refresh(5));
    bank.advance(94);
    assert_eq!(bank.state(), BankState::Refreshing);
    bank.advance(95);
    assert_eq!(bank.state(), BankState::Idle);
    // ACT is gated until the refresh window has passed.
    assert!(bank.next_act() >= 95);
}

// ══════════════════════════════════════════════════════════
// 2. Command legality
// ══════════════════════════════════════════════════════════

#[test]
fn read_requires_active_matching_row_and_stamp() {
    let t = timing();
    let mut bank = BankMachine::new();
    assert!(!bank.can_read(100, 0));

    bank.issue_act(0, 4, &t);
    assert!(!bank.can_read(5, 4), "activating bank cannot read");
    bank.advance(t.tRCD as u64);

    assert!(bank.can_read(t.tRCD as u64, 4));
    assert!(!bank.can_read(t.tRCD as u64, 5), "row mismatch");
}

#[test]
fn precharge_requires_tras() {
    let t = timing();
    let mut bank = BankMachine::new();
    bank.issue_act(0, 4, &t);
    bank.advance(t.tRCD as u64);

    assert!(!bank.can_precharge(t.tRAS as u64 - 1));
    assert!(bank.can_precharge(t.tRAS as u64));
}

#[test]
fn write_raises_precharge_stamp_by_recovery_time() {
    let t = timing();
    let mut bank = BankMachine::new();
    bank.issue_act(0, 4, &t);
    bank.advance(t.tRCD as u64);

    let now = t.tRCD as u64;
    bank.issue_write(now, &t);
    let expected = now + (t.tWL + t.tBurst + t.tWR) as u64;
    assert_eq!(bank.next_pre(), expected.max(t.tRAS as u64));
}

// ══════════════════════════════════════════════════════════
// 3. Stamp monotonicity
// ══════════════════════════════════════════════════════════

#[test]
fn constraints_never_regress() {
    let mut bank = BankMachine::new();
    bank.constrain_read(50);
    bank.constrain_read(30);
    assert_eq!(bank.next_rd(), 50);

    bank.constrain_write(40);
    bank.constrain_write(60);
    assert_eq!(bank.next_wr(), 60);

    bank.constrain_act(20);
    bank.constrain_act(10);
    assert_eq!(bank.next_act(), 20);
}

#[test]
fn reset_returns_to_initial_state() {
    let t = timing();
    let mut bank = BankMachine::new();
    bank.issue_act(0, 9, &t);
    bank.reset();
    assert_eq!(bank.state(), BankState::Idle);
    assert_eq!(bank.open_row(), None);
    assert_eq!(bank.next_act(), 0);
}

// ══════════════════════════════════════════════════════════
// 4. Four-activate window
// ══════════════════════════════════════════════════════════

#[test]
fn faw_permits_first_four_activates() {
    let window = ActWindow::new();
    assert!(window.permits(0, 32));

    let mut window = ActWindow::new();
    for cycle in 0..3 {
        window.record(cycle);
        assert!(window.permits(cycle + 1, 32));
    }
}

#[test]
fn faw_blocks_fifth_activate_until_window_passes() {
    let mut window = ActWindow::new();
    for cycle in 0..4 {
        window.record(cycle);
    }
    assert!(!window.permits(4, 32));
    assert!(!window.permits(31, 32));
    assert!(window.permits(32, 32), "oldest ACT was at 0; 0 + tFAW = 32");
}

#[test]
fn faw_slides_with_the_oldest_entry() {
    let mut window = ActWindow::new();
    window.record(0);
    window.record(10);
    window.record(20);
    window.record(30);
    // Oldest is 0 until it is displaced.
    assert!(window.permits(32, 32));
    window.record(32);
    // Oldest is now 10.
    assert!(!window.permits(41, 32));
    assert!(window.permits(42, 32));
}

#[test]
fn faw_reset_clears_history() {
    let mut window = ActWindow::new();
    for cycle in 0..4 {
        window.record(cycle);
    }
    assert!(!window.permits(4, 32));
    window.reset();
    assert!(window.permits(4, 32));
}
