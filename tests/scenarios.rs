//! Integration tests covering the core scheduling behaviors: single-task
//! idling, EDF ordering, HLP and PIP critical-section handling, deadline
//! misses and sporadic releases.

use edfsim::protocol::AccessProtocol;
use edfsim::task::{Section, Task};
use edfsim::taskset::ReleaseSpec;
use edfsim::trace::TraceRecord;
use edfsim::{simulate, Schedule};

fn task(id: i64, period: f64, wcet: f64, deadline: f64, offset: f64, sections: Vec<(i64, f64)>) -> Task {
    Task {
        id,
        period,
        wcet,
        relative_deadline: deadline,
        offset,
        sections: sections.into_iter().map(|(resource, duration)| Section { resource, duration }).collect(),
    }
}

fn rec(start: f64, end: f64, task_id: i64, job_id: u32, resource: i64) -> TraceRecord {
    TraceRecord { start, end, task_id, job_id, resource }
}

#[test]
fn single_non_critical_task_idles_after_wcet() {
    let tasks = vec![task(1, 10.0, 3.0, 10.0, 0.0, vec![(0, 3.0)])];
    let (trace, warnings) = simulate(tasks, Schedule::Window { start: 0.0, end: 10.0 }, AccessProtocol::Simple);
    assert!(warnings.is_empty());
    assert_eq!(
        trace.records(),
        &[rec(0.0, 3.0, 1, 1, 0), rec(3.0, 10.0, 0, 0, 0)]
    );
}

#[test]
fn edf_ordering_prefers_shorter_deadline() {
    let a = task(1, 10.0, 2.0, 10.0, 0.0, vec![(0, 2.0)]);
    let b = task(2, 4.0, 1.0, 4.0, 0.0, vec![(0, 1.0)]);
    let (trace, warnings) = simulate(vec![a, b], Schedule::Window { start: 0.0, end: 10.0 }, AccessProtocol::Simple);
    assert!(warnings.is_empty());

    let records = trace.records();
    assert_eq!(records[0], rec(0.0, 1.0, 2, 1, 0)); // B (deadline 4) beats A (deadline 10)
    assert_eq!(records[1], rec(1.0, 3.0, 1, 1, 0)); // then A runs to completion
    assert_eq!(records[2].task_id, 0); // idle until B's next release at t=4
    assert_eq!(records[2].start, 3.0);
}

fn hlp_pip_tasks() -> (Task, Task) {
    // L: low priority, three sections, critical section over resource 1 in the middle.
    // The first section is short enough that L enters the critical section
    // at t=0.5, safely ahead of H's release at t=1 (no tie at the boundary).
    let low = task(1, 20.0, 3.5, 20.0, 0.0, vec![(0, 0.5), (1, 2.0), (0, 1.0)]);
    // H: high priority, one section entirely inside resource 1, releasing at t=1.
    let high = task(2, 5.0, 1.0, 5.0, 1.0, vec![(1, 1.0)]);
    (low, high)
}

#[test]
fn hlp_critical_section_delays_high_priority_waiter() {
    let (low, high) = hlp_pip_tasks();
    let (trace, warnings) = simulate(vec![low, high], Schedule::Window { start: 0.0, end: 6.0 }, AccessProtocol::Hlp);
    assert!(warnings.is_empty());
    let records = trace.records();

    // L starts its first (non-critical) section at t=0.
    assert_eq!(records[0], rec(0.0, 0.5, 1, 1, 0));
    // L holds resource 1 from t=0.5, already elevated to the ceiling by HLP
    // before H is even released at t=1, so H cannot preempt it.
    assert_eq!(records[1], rec(0.5, 2.5, 1, 1, 1));
    // H then runs to completion.
    assert_eq!(records[2], rec(2.5, 3.5, 2, 1, 1));
    // L finishes its trailing non-critical section.
    assert_eq!(records[3], rec(3.5, 4.5, 1, 1, 0));
    // Nothing else is ready until L's next period.
    assert_eq!(records[4], rec(4.5, 6.0, 0, 0, 0));
}

#[test]
fn pip_prevents_medium_priority_preemption() {
    let (low, high) = hlp_pip_tasks();
    // M: medium priority, no resource use, released at t=2; must not
    // preempt L while PIP has L running at H's inherited priority.
    let medium = task(3, 20.0, 1.0, 10.0, 2.0, vec![(0, 1.0)]);

    let (trace, warnings) = simulate(
        vec![low, high, medium],
        Schedule::Window { start: 0.0, end: 6.0 },
        AccessProtocol::Pip,
    );
    assert!(warnings.is_empty());
    let records = trace.records();

    assert_eq!(records[0], rec(0.0, 0.5, 1, 1, 0));
    assert_eq!(records[1], rec(0.5, 2.5, 1, 1, 1)); // L holds resource 1; PIP elevates it once H blocks at t=1
    assert_eq!(records[2], rec(2.5, 3.5, 2, 1, 1)); // H runs once L signals
    assert_eq!(records[3], rec(3.5, 4.5, 3, 1, 0)); // M runs only after L reverts to its base priority
    assert_eq!(records[4], rec(4.5, 5.5, 1, 1, 0)); // L's trailing section
    assert_eq!(records[5], rec(5.5, 6.0, 0, 0, 0));
}

#[test]
fn deadline_miss_aborts_with_remaining_work() {
    let tasks = vec![task(1, 4.0, 5.0, 4.0, 0.0, vec![(0, 5.0)])];
    let (trace, warnings) = simulate(tasks, Schedule::Window { start: 0.0, end: 8.0 }, AccessProtocol::Simple);
    assert!(warnings.is_empty());

    let records = trace.records();
    assert_eq!(records[0], rec(0.0, 4.0, 1, 1, 0));
    // No further progress is ever attributed to job 1: the second job
    // (release at t=4) also runs 1 tick before hitting schedule_end-derived
    // windows, but job 1's own record never reappears.
    assert!(!records.iter().skip(1).any(|r| r.task_id == 1 && r.job_id == 1));
}

#[test]
fn sporadic_releases_drive_job_creation_exclusively() {
    let tasks = vec![task(1, 10.0, 1.0, 10.0, 0.0, vec![(0, 1.0)])];
    let releases = vec![
        ReleaseSpec { time_instant: 0.0, task_id: 1 },
        ReleaseSpec { time_instant: 7.0, task_id: 1 },
    ];
    let (trace, warnings) = simulate(
        tasks,
        Schedule::Releases { releases, start: 0.0, end: 10.0 },
        AccessProtocol::Simple,
    );
    assert!(warnings.is_empty());

    let records = trace.records();
    let job_records: Vec<_> = records.iter().filter(|r| r.task_id == 1).collect();
    assert_eq!(job_records.len(), 2);
    assert_eq!(job_records[0].job_id, 1);
    assert_eq!(job_records[1].job_id, 2);
    assert_eq!(job_records[0].start, 0.0);
    assert_eq!(job_records[1].start, 7.0);
}

#[test]
fn duplicate_task_id_is_reported_and_skipped_not_fatal() {
    let tasks = vec![
        task(1, 10.0, 1.0, 10.0, 0.0, vec![]),
        task(1, 5.0, 1.0, 5.0, 0.0, vec![]),
    ];
    let (_trace, warnings) = simulate(tasks, Schedule::Window { start: 0.0, end: 10.0 }, AccessProtocol::Simple);
    assert_eq!(warnings.len(), 1);
}
