//! The discrete-event time-advance loop that ties the rest of the core
//! together into a single schedule trace.
//!
//! Walks the event index pairwise, one window at a time, generalizing
//! a single fixed-priority run queue into the ready/waiting split and
//! per-instant RELEASE/DEADLINE handling the locking protocols need.

use std::collections::BTreeMap;

use tracing::{debug, debug_span};

use crate::job::Jobs;
use crate::protocol::{highest_lockers, AccessProtocol};
use crate::queue::Queues;
use crate::semaphore_set::SemaphoreSet;
use crate::task::Task;
use crate::taskset::{EventIndex, EventKind, ExpandedTaskSet};
use crate::trace::Trace;

/// Runs the scheduler over an already-expanded task set and returns the
/// resulting trace. Consumes `expanded.jobs`/`expanded.events` in place;
/// `expanded.tasks` is only read, to build the HLP priority ceilings.
pub fn run(expanded: ExpandedTaskSet, protocol: AccessProtocol) -> Trace {
    let ExpandedTaskSet { tasks, resources, mut jobs, events } = expanded;
    let lockers = match protocol {
        AccessProtocol::Hlp => highest_lockers(&tasks_as_slice(&tasks)),
        _ => Default::default(),
    };
    let mut semaphores = SemaphoreSet::new(resources, protocol, lockers);
    let mut queues = Queues::default();
    let mut trace = Trace::new();

    advance(&events, &mut jobs, &mut queues, &mut semaphores, &mut trace);
    trace
}

fn tasks_as_slice(tasks: &BTreeMap<i64, Task>) -> Vec<Task> {
    tasks.values().cloned().collect()
}

/// The pairwise walk over `events.times()`: apply every RELEASE/DEADLINE
/// due at `event_time`, then run jobs from `event_time` to
/// `next_event_time`, re-selecting the ready queue's head after every
/// block or completion. The final instant (always `schedule_end`) is
/// never itself "applied", since there is nothing past it to advance
/// toward.
fn advance(
    events: &EventIndex,
    jobs: &mut Jobs,
    queues: &mut Queues,
    semaphores: &mut SemaphoreSet,
    trace: &mut Trace,
) {
    let times = events.times();
    for window in times.windows(2) {
        let event_time = window[0];
        let next_event_time = window[1];
        let _span = debug_span!("instant", t = event_time).entered();

        for entry in events.at(event_time) {
            match entry.kind {
                EventKind::Release => {
                    jobs.release(entry.job, queues);
                    debug!(job = entry.job.0, "release");
                }
                EventKind::Deadline => {
                    jobs.end(entry.job, queues, semaphores);
                    if jobs.get(entry.job).state == crate::job::JobState::Aborted {
                        debug!(job = entry.job.0, "deadline reached, job aborted");
                    }
                }
            }
        }

        let mut curr_time = event_time;
        while curr_time < next_event_time {
            let Some(head) = queues.ready.peek_head() else {
                trace.record_idle(curr_time, next_event_time);
                curr_time = next_event_time;
                continue;
            };

            let (task_id, job_seq) = {
                let job = jobs.get(head);
                (job.task_id, job.job_seq)
            };
            let (progression, resource) = jobs.execute(head, next_event_time - curr_time, queues, semaphores);

            if progression > 0.0 {
                trace.record(curr_time, curr_time + progression, task_id, job_seq, resource);
                curr_time += progression;
            }
            // progression == 0 means the job just blocked; loop again and
            // re-select without advancing curr_time.
        }
    }
}
