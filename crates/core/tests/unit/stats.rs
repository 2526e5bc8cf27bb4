//! Statistics tests.
//!
//! Verifies the request recorder, the derived metrics, and merge/reset.

use memsim_core::common::RequestKind;
use memsim_core::stats::{PageAccess, Statistics};

#[test]
fn record_read_and_write() {
    let mut stats = Statistics::new();
    stats.record_request(RequestKind::Read, 40, Some(PageAccess::Empty));
    stats.record_request(RequestKind::Write, 60, Some(PageAccess::Hit));

    assert_eq!(stats.reads, 1);
    assert_eq!(stats.writes, 1);
    assert_eq!(stats.total_requests(), 2);
    assert_eq!(stats.total_read_latency, 40);
    assert_eq!(stats.total_write_latency, 60);
    assert_eq!(stats.min_latency, 40);
    assert_eq!(stats.max_latency, 60);
    assert_eq!(stats.page_empty, 1);
    assert_eq!(stats.page_hits, 1);
}

#[test]
fn unclassified_requests_skip_page_counters() {
    let mut stats = Statistics::new();
    stats.record_request(RequestKind::Read, 100, None);
    assert_eq!(stats.page_hits + stats.page_empty + stats.page_conflicts, 0);
    assert_eq!(stats.reads, 1);
}

#[test]
fn derived_metrics() {
    let mut stats = Statistics::new();
    stats.record_request(RequestKind::Read, 40, Some(PageAccess::Hit));
    stats.record_request(RequestKind::Read, 60, Some(PageAccess::Hit));
    stats.record_request(RequestKind::Write, 80, Some(PageAccess::Conflict));
    stats.record_request(RequestKind::Write, 20, Some(PageAccess::Empty));

    assert_eq!(stats.avg_read_latency(), 50.0);
    assert_eq!(stats.avg_write_latency(), 50.0);
    assert_eq!(stats.avg_latency(), 50.0);
    assert_eq!(stats.page_hit_rate(), 0.5);
    assert_eq!(stats.page_conflict_rate(), 0.25);
    assert_eq!(stats.read_ratio(), 0.5);
}

#[test]
fn empty_stats_report_zero_rates() {
    let stats = Statistics::new();
    assert_eq!(stats.avg_latency(), 0.0);
    assert_eq!(stats.page_hit_rate(), 0.0);
    assert_eq!(stats.utilization(), 0.0);
    assert_eq!(stats.read_ratio(), 0.0);
}

#[test]
fn utilization_from_cycle_counters() {
    let mut stats = Statistics::new();
    stats.busy_cycles = 75;
    stats.idle_cycles = 25;
    assert_eq!(stats.utilization(), 0.75);
}

#[test]
fn merge_combines_counters() {
    let mut a = Statistics::new();
    a.record_request(RequestKind::Read, 40, Some(PageAccess::Hit));
    a.busy_cycles = 10;

    let mut b = Statistics::new();
    b.record_request(RequestKind::Write, 90, Some(PageAccess::Conflict));
    b.busy_cycles = 5;

    a.merge(&b);
    assert_eq!(a.total_requests(), 2);
    assert_eq!(a.min_latency, 40);
    assert_eq!(a.max_latency, 90);
    assert_eq!(a.busy_cycles, 15);
    assert_eq!(a.page_hits, 1);
    assert_eq!(a.page_conflicts, 1);
}

#[test]
fn reset_restores_the_initial_block() {
    let mut stats = Statistics::new();
    stats.record_request(RequestKind::Read, 40, Some(PageAccess::Hit));
    stats.refreshes = 3;

    stats.reset();
    assert_eq!(stats, Statistics::new());
    assert_eq!(stats.min_latency, u64::MAX);
}
