//! Behavioral controller tests.
//!
//! The behavioral fidelity completes requests inside `submit` with the
//! configured fixed latency.

use memsim_core::common::{Request, RequestKind};
use memsim_core::config::{ControllerConfig, Fidelity};
use memsim_core::ctrl::behavioral::BehavioralController;
use memsim_core::MemoryController;

use crate::common::{latency_log, record_latency};

fn controller() -> BehavioralController {
    let mut config = ControllerConfig::default();
    config.fidelity = Fidelity::Behavioral;
    config.timing.fixed_read_latency = 100;
    config.timing.fixed_write_latency = 120;
    BehavioralController::new(config).unwrap()
}

#[test]
fn read_completes_before_submit_returns() {
    let mut ctrl = controller();
    let log = latency_log();

    let id = ctrl.read(0x1000, 64, Some(record_latency(&log)));
    assert!(id.is_some());
    assert_eq!(log.lock().unwrap().as_slice(), &[100]);
    assert!(!ctrl.has_pending());
}

#[test]
fn write_uses_the_write_latency() {
    let mut ctrl = controller();
    let log = latency_log();
    ctrl.write(0x2000, 64, Some(record_latency(&log))).unwrap();
    assert_eq!(log.lock().unwrap().as_slice(), &[120]);
}

#[test]
fn never_applies_back_pressure() {
    let mut ctrl = controller();
    for i in 0..1000u64 {
        assert!(ctrl.can_accept());
        assert!(ctrl
            .submit(Request::new(i * 64, 64, RequestKind::Read))
            .is_some());
    }
    assert_eq!(ctrl.pending_count(), 0);
    assert_eq!(ctrl.stats().reads, 1000);
}

#[test]
fn identifiers_are_monotonic() {
    let mut ctrl = controller();
    let a = ctrl.read(0, 64, None).unwrap();
    let b = ctrl.read(64, 64, None).unwrap();
    let c = ctrl.write(128, 64, None).unwrap();
    assert!(a < b && b < c);
}

#[test]
fn statistics_count_both_kinds() {
    let mut ctrl = controller();
    ctrl.read(0, 64, None).unwrap();
    ctrl.read(64, 64, None).unwrap();
    ctrl.write(128, 64, None).unwrap();

    let stats = ctrl.stats();
    assert_eq!(stats.reads, 2);
    assert_eq!(stats.writes, 1);
    assert_eq!(stats.total_read_latency, 200);
    assert_eq!(stats.total_write_latency, 120);
}

#[test]
fn reset_rewinds_cycle_and_stats() {
    let mut ctrl = controller();
    ctrl.read(0, 64, None).unwrap();
    ctrl.tick_n(50);
    assert_eq!(ctrl.cycle(), 50);

    ctrl.reset();
    assert_eq!(ctrl.cycle(), 0);
    assert_eq!(ctrl.stats().total_requests(), 0);
}
