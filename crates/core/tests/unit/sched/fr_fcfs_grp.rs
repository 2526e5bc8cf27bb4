//! FR-FCFS-GRP scheduler tests.
//!
//! Among row hits the policy prefers the kind of the last issued command,
//! unless an earlier request to the same byte address would be overtaken.

use memsim_core::common::RequestKind;
use memsim_core::ctrl::sched::{FrFcfsGrpScheduler, Scheduler};

use super::entry;

#[test]
fn groups_same_kind_row_hits() {
    let mut sched = FrFcfsGrpScheduler::new(4, 16);
    sched.store(0, entry(1, 0x000, 5, RequestKind::Write));
    sched.store(0, entry(2, 0x100, 5, RequestKind::Read));

    // Last command was a read: the younger read hit overtakes the write.
    assert_eq!(sched.get_next(0, Some(5), RequestKind::Read), Some(2));
    assert_eq!(sched.grouping_decisions(), 1);
    assert_eq!(sched.row_hits_selected(), 1);
}

#[test]
fn address_hazard_blocks_grouping() {
    let mut sched = FrFcfsGrpScheduler::new(4, 16);
    // Same byte address: the read must not overtake the write.
    sched.store(0, entry(1, 0xABC, 5, RequestKind::Write));
    sched.store(0, entry(2, 0xABC, 5, RequestKind::Read));

    assert_eq!(sched.get_next(0, Some(5), RequestKind::Read), Some(1));
    assert_eq!(sched.grouping_decisions(), 0);
    assert_eq!(sched.row_hits_selected(), 1);
}

#[test]
fn hazard_only_applies_to_same_address() {
    let mut sched = FrFcfsGrpScheduler::new(4, 16);
    sched.store(0, entry(1, 0x000, 5, RequestKind::Write));
    sched.store(0, entry(2, 0x040, 5, RequestKind::Read));

    // Different addresses: grouping may reorder freely.
    assert_eq!(sched.get_next(0, Some(5), RequestKind::Read), Some(2));
}

#[test]
fn write_grouping_after_write() {
    let mut sched = FrFcfsGrpScheduler::new(4, 16);
    sched.store(0, entry(1, 0x000, 5, RequestKind::Read));
    sched.store(0, entry(2, 0x100, 5, RequestKind::Write));

    assert_eq!(sched.get_next(0, Some(5), RequestKind::Write), Some(2));
    assert_eq!(sched.grouping_decisions(), 1);
}

#[test]
fn oldest_hit_when_no_same_kind_candidate() {
    let mut sched = FrFcfsGrpScheduler::new(4, 16);
    sched.store(0, entry(1, 0x000, 5, RequestKind::Write));
    sched.store(0, entry(2, 0x100, 5, RequestKind::Write));

    // Last command read, only write hits: oldest hit, no grouping credit.
    assert_eq!(sched.get_next(0, Some(5), RequestKind::Read), Some(1));
    assert_eq!(sched.grouping_decisions(), 0);
    assert_eq!(sched.row_hits_selected(), 1);
}

#[test]
fn falls_back_to_fcfs_without_hits() {
    let mut sched = FrFcfsGrpScheduler::new(4, 16);
    sched.store(0, entry(1, 0x000, 9, RequestKind::Read));
    sched.store(0, entry(2, 0x100, 3, RequestKind::Read));

    assert_eq!(sched.get_next(0, Some(5), RequestKind::Read), Some(1));
    assert_eq!(sched.row_hits_selected(), 0);
}

#[test]
fn hazard_clears_once_the_earlier_request_is_removed() {
    let mut sched = FrFcfsGrpScheduler::new(4, 16);
    sched.store(0, entry(1, 0xABC, 5, RequestKind::Write));
    sched.store(0, entry(2, 0xABC, 5, RequestKind::Read));

    assert_eq!(sched.get_next(0, Some(5), RequestKind::Read), Some(1));
    sched.mark_issued(0, 1);
    sched.remove(0, 1);

    // With the write gone the read is free to go.
    assert_eq!(sched.get_next(0, Some(5), RequestKind::Read), Some(2));
}

#[test]
fn hazard_checks_only_earlier_arrivals() {
    let mut sched = FrFcfsGrpScheduler::new(4, 16);
    // The same-kind candidate arrives before the conflicting write.
    sched.store(0, entry(1, 0xABC, 5, RequestKind::Read));
    sched.store(0, entry(2, 0xABC, 5, RequestKind::Write));

    // A later same-address write does not block the earlier read.
    assert_eq!(sched.get_next(0, Some(5), RequestKind::Read), Some(1));
    assert_eq!(sched.grouping_decisions(), 1);
}
