//! `edfsim`: a discrete-event simulator for uniprocessor EDF scheduling
//! of periodic, sporadic and aperiodic tasks under SIMPLE, HLP or PIP
//! resource-access control.
//!
//! The core pipeline is [`build_tasks`] -> [`expand`] -> [`scheduler::run`];
//! [`simulate`] wires those three stages into one call for the common
//! case of a fixed `[schedule_start, schedule_end)` window.

pub mod error;
pub mod job;
pub mod priority;
pub mod protocol;
pub mod queue;
pub mod scheduler;
pub mod semaphore;
pub mod semaphore_set;
pub mod task;
pub mod taskset;
pub mod time;
pub mod trace;

pub mod cli;
pub mod input;
pub mod output;

use error::ValidationWarning;
use protocol::AccessProtocol;
use task::Task;
use taskset::{build_tasks, collect_resources, expand, ExpandedTaskSet, ReleaseSpec};
use trace::Trace;

/// How job releases are driven: a fixed window of periodic/aperiodic
/// expansion, or an explicit, caller-supplied release list.
pub enum Schedule {
    Window { start: f64, end: f64 },
    Releases { releases: Vec<ReleaseSpec>, start: f64, end: f64 },
}

/// Validates and expands `tasks`, then runs the scheduler under
/// `protocol`. Returns the trace plus every validation warning raised
/// along the way (duplicate ids, bad release times, and so on); a
/// non-empty warning list is not itself an error.
pub fn simulate(tasks: Vec<Task>, schedule: Schedule, protocol: AccessProtocol) -> (Trace, Vec<ValidationWarning>) {
    let (tasks, mut warnings) = build_tasks(tasks);
    let resources = collect_resources(&tasks);

    let (start, end, releases) = match &schedule {
        Schedule::Window { start, end } => (*start, *end, None),
        Schedule::Releases { releases, start, end } => (*start, *end, Some(releases.as_slice())),
    };
    let (jobs, events, expand_warnings) = expand(&tasks, start, end, releases);
    warnings.extend(expand_warnings);

    let expanded = ExpandedTaskSet { tasks, resources, jobs, events };
    let trace = scheduler::run(expanded, protocol);
    (trace, warnings)
}
