//! Invariant checking for the cycle-accurate controller.
//!
//! When enabled, the checker runs after every tick and records violations
//! into a bounded log. Violations are observational: simulation continues,
//! and a host may treat a non-empty log as a test failure.

use crate::common::{BankState, Cycle};

use super::bank::BankMachine;

/// Maximum violations retained; further violations are counted but dropped.
pub const MAX_VIOLATIONS: usize = 256;

/// A recorded invariant violation.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Cycle at which the violation was detected.
    pub cycle: Cycle,
    /// Short identifier of the violated invariant.
    pub invariant_id: &'static str,
    /// Human-readable description.
    pub message: String,
    /// Channel of the offending bank.
    pub channel: u8,
    /// Bank index within the channel.
    pub bank: u8,
}

/// Bounded violation log with the per-bank structural checks.
#[derive(Debug, Default)]
pub struct InvariantChecker {
    violations: Vec<Violation>,
    dropped: u64,
}

impl InvariantChecker {
    /// Creates an empty checker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a violation, dropping it if the log is full.
    pub fn record(
        &mut self,
        cycle: Cycle,
        invariant_id: &'static str,
        message: String,
        channel: u8,
        bank: u8,
    ) {
        if self.violations.len() >= MAX_VIOLATIONS {
            self.dropped += 1;
            return;
        }
        self.violations.push(Violation {
            cycle,
            invariant_id,
            message,
            channel,
            bank,
        });
    }

    /// Structural checks on one bank at a cycle boundary, after the advance
    /// phase has run.
    pub fn check_bank(&mut self, now: Cycle, channel: u8, bank_in_channel: u8, bank: &BankMachine) {
        let has_row = bank.open_row().is_some();
        let needs_row = matches!(
            bank.state(),
            BankState::Activating
                | BankState::Active
                | BankState::Reading
                | BankState::Writing
                | BankState::Precharging
        );
        if needs_row && !has_row {
            self.record(
                now,
                "open_row",
                format!("state {} without an open row", bank.state()),
                channel,
                bank_in_channel,
            );
        }
        if !needs_row && has_row {
            self.record(
                now,
                "open_row",
                format!("state {} with a lingering open row", bank.state()),
                channel,
                bank_in_channel,
            );
        }

        // Transitional states must still be in flight after the advance
        // phase; an expired deadline here means a transition was missed.
        let transitional = matches!(
            bank.state(),
            BankState::Activating
                | BankState::Reading
                | BankState::Writing
                | BankState::Precharging
                | BankState::Refreshing
        );
        if transitional && now >= bank.state_until() {
            self.record(
                now,
                "state_deadline",
                format!(
                    "state {} past its deadline ({} >= {})",
                    bank.state(),
                    now,
                    bank.state_until()
                ),
                channel,
                bank_in_channel,
            );
        }
    }

    /// Recorded violations, oldest first.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// True when any violation has been recorded.
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Violations dropped after the log filled.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Clears the log.
    pub fn clear(&mut self) {
        self.violations.clear();
        self.dropped = 0;
    }
}
