//! Per-bank state machine with JEDEC-style timing constraint tracking.
//!
//! A [`BankMachine`] holds the protocol state of one DRAM bank plus the four
//! earliest-legal-cycle stamps (`next_act`, `next_rd`, `next_wr`,
//! `next_pre`) that encode every timing rule the bank has participated in.
//! The stamps are monotonically non-decreasing between resets: every update
//! takes the maximum of the current value and the new constraint.
//!
//! Cross-bank constraints (tRRD, tCCD, turnarounds, tFAW) are propagated by
//! the controller, which owns all banks; [`ActWindow`] tracks the rolling
//! four-activate window per rank.

use crate::common::{BankState, Cycle, Row};
use crate::config::TimingParams;

/// State machine for a single DRAM bank.
#[derive(Debug, Clone, Default)]
pub struct BankMachine {
    state: BankState,
    open_row: Option<Row>,
    /// Cycle at which the current transitional state completes.
    state_until: Cycle,
    /// Earliest cycle an ACT may be issued.
    next_act: Cycle,
    /// Earliest cycle a RD may be issued.
    next_rd: Cycle,
    /// Earliest cycle a WR may be issued.
    next_wr: Cycle,
    /// Earliest cycle a PRE may be issued.
    next_pre: Cycle,
}

impl BankMachine {
    /// Creates an idle bank with all stamps at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current protocol state.
    pub fn state(&self) -> BankState {
        self.state
    }

    /// The open row, if the bank has one.
    ///
    /// Valid in the activating, active, bursting, and precharging states;
    /// `None` once the precharge completes.
    pub fn open_row(&self) -> Option<Row> {
        self.open_row
    }

    /// The open row, but only once the bank has finished activating.
    ///
    /// This is the value the scheduler sees: a row mid-activation is not yet
    /// usable for column commands, and a row being precharged is on its way
    /// out.
    pub fn active_row(&self) -> Option<Row> {
        match self.state {
            BankState::Active | BankState::Reading | BankState::Writing => self.open_row,
            _ => None,
        }
    }

    /// Cycle at which the in-progress transition completes.
    pub fn state_until(&self) -> Cycle {
        self.state_until
    }

    /// Earliest legal ACT cycle.
    pub fn next_act(&self) -> Cycle {
        self.next_act
    }

    /// Earliest legal RD cycle.
    pub fn next_rd(&self) -> Cycle {
        self.next_rd
    }

    /// Earliest legal WR cycle.
    pub fn next_wr(&self) -> Cycle {
        self.next_wr
    }

    /// Earliest legal PRE cycle.
    pub fn next_pre(&self) -> Cycle {
        self.next_pre
    }

    /// Completes any transitional state whose deadline has elapsed.
    ///
    /// Activating and bursting states return to active; precharging and
    /// refreshing return to idle.
    pub fn advance(&mut self, now: Cycle) {
        if now < self.state_until {
            return;
        }
        match self.state {
            BankState::Activating => self.state = BankState::Active,
            BankState::Reading | BankState::Writing => self.state = BankState::Active,
            BankState::Precharging => {
                self.state = BankState::Idle;
                self.open_row = None;
            }
            BankState::Refreshing => self.state = BankState::Idle,
            BankState::Idle | BankState::Active => {}
        }
    }

    /// True when an ACT would be legal this cycle (tFAW aside).
    pub fn can_activate(&self, now: Cycle) -> bool {
        self.state == BankState::Idle && now >= self.next_act
    }

    /// True when a RD to `row` would be legal this cycle.
    pub fn can_read(&self, now: Cycle, row: Row) -> bool {
        self.state == BankState::Active && self.open_row == Some(row) && now >= self.next_rd
    }

    /// True when a WR to `row` would be legal this cycle.
    pub fn can_write(&self, now: Cycle, row: Row) -> bool {
        self.state == BankState::Active && self.open_row == Some(row) && now >= self.next_wr
    }

    /// True when a PRE would be legal this cycle.
    pub fn can_precharge(&self, now: Cycle) -> bool {
        self.state == BankState::Active && now >= self.next_pre
    }

    /// True when a REF could begin this cycle.
    ///
    /// Refresh requires the bank idle and past any tRP / tRFC window still
    /// running (both are folded into `next_act`).
    pub fn can_refresh(&self, now: Cycle) -> bool {
        self.state == BankState::Idle && now >= self.next_act
    }

    /// Issues an ACT at `now`, opening `row`.
    ///
    /// Updates the same-bank stamps: RD/WR become legal after tRCD, PRE
    /// after tRAS, and the next ACT after tRC.
    pub fn issue_act(&mut self, now: Cycle, row: Row, t: &TimingParams) {
        self.state = BankState::Activating;
        self.open_row = Some(row);
        self.state_until = now + t.tRCD as Cycle;
        self.next_rd = self.next_rd.max(now + t.tRCD as Cycle);
        self.next_wr = self.next_wr.max(now + t.tRCD as Cycle);
        self.next_pre = self.next_pre.max(now + t.tRAS as Cycle);
        self.next_act = self.next_act.max(now + t.tRC as Cycle);
    }

    /// Issues a RD at `now`. The burst occupies the bank for tBurst cycles
    /// and the row may not close before tRTP has elapsed.
    pub fn issue_read(&mut self, now: Cycle, t: &TimingParams) {
        self.state = BankState::Reading;
        self.state_until = now + t.tBurst as Cycle;
        self.next_pre = self.next_pre.max(now + t.tRTP as Cycle);
    }

    /// Issues a WR at `now`. The row may not close before the data has been
    /// driven (tWL + tBurst) and recovered (tWR).
    pub fn issue_write(&mut self, now: Cycle, t: &TimingParams) {
        self.state = BankState::Writing;
        self.state_until = now + t.tBurst as Cycle;
        self.next_pre = self
            .next_pre
            .max(now + (t.tWL + t.tBurst + t.tWR) as Cycle);
    }

    /// Issues a PRE at `now`; the bank reaches idle after tRP.
    pub fn issue_precharge(&mut self, now: Cycle, t: &TimingParams) {
        self.state = BankState::Precharging;
        self.state_until = now + t.tRP as Cycle;
        self.next_act = self.next_act.max(now + t.tRP as Cycle);
    }

    /// Issues a REF at `now`, occupying the bank for `latency` cycles.
    pub fn issue_refresh(&mut self, now: Cycle, latency: Cycle) {
        self.state = BankState::Refreshing;
        self.state_until = now + latency;
        self.next_act = self.next_act.max(now + latency);
    }

    /// Raises the earliest legal ACT cycle (cross-bank tRRD propagation).
    pub fn constrain_act(&mut self, earliest: Cycle) {
        self.next_act = self.next_act.max(earliest);
    }

    /// Raises the earliest legal RD cycle (tCCD / write-to-read turnaround).
    pub fn constrain_read(&mut self, earliest: Cycle) {
        self.next_rd = self.next_rd.max(earliest);
    }

    /// Raises the earliest legal WR cycle (tCCD / read-to-write turnaround).
    pub fn constrain_write(&mut self, earliest: Cycle) {
        self.next_wr = self.next_wr.max(earliest);
    }

    /// Returns the bank to idle with all stamps cleared.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Rolling window of the four most recent activations on a rank.
///
/// JEDEC allows at most four ACTs within any tFAW window; the ring holds the
/// issue cycles of the last four and an ACT is legal only once the oldest
/// has aged out of the window.
#[derive(Debug, Clone, Default)]
pub struct ActWindow {
    recent: [Cycle; 4],
    head: usize,
    count: usize,
}

impl ActWindow {
    /// Creates an empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when a fifth ACT at `now` would not violate tFAW.
    pub fn permits(&self, now: Cycle, t_faw: u32) -> bool {
        if self.count < 4 {
            return true;
        }
        let oldest = self.recent[self.head];
        now >= oldest + t_faw as Cycle
    }

    /// Records an ACT issued at `now`.
    pub fn record(&mut self, now: Cycle) {
        self.recent[self.head] = now;
        self.head = (self.head + 1) % 4;
        if self.count < 4 {
            self.count += 1;
        }
    }

    /// Clears the window.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
