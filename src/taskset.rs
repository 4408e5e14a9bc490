//! Task-set expansion: tasks -> concrete jobs -> event index.

use std::collections::BTreeMap;

use crate::error::{ValidationError, ValidationWarning};
use crate::job::{JobId, Jobs};
use crate::task::{ResourceId, Task, NO_RESOURCE};
use crate::time::SimTime;

/// One entry the caller supplies for a sporadic/explicit release.
#[derive(Clone, Copy, Debug)]
pub struct ReleaseSpec {
    pub time_instant: f64,
    pub task_id: i64,
}

/// Everything the core needs to run a simulation: the tasks, the
/// distinct resource ids they touch, the jobs already expanded from
/// them, and the time-sorted event index.
pub struct ExpandedTaskSet {
    pub tasks: BTreeMap<i64, Task>,
    pub resources: Vec<ResourceId>,
    pub jobs: Jobs,
    pub events: EventIndex,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Release,
    Deadline,
}

#[derive(Clone, Copy, Debug)]
pub struct EventEntry {
    pub kind: EventKind,
    pub job: JobId,
}

/// Time-sorted distinct instants at which at least one RELEASE or
/// DEADLINE occurs, plus `schedule_end` so the time-advance loop always
/// has a final instant to walk toward.
#[derive(Default)]
pub struct EventIndex {
    by_time: BTreeMap<TimeBits, Vec<EventEntry>>,
}

/// `f64` bit pattern used as a `BTreeMap` key; simulation instants are
/// never NaN, and `to_bits` preserves the ordering of non-negative
/// finite floats, which release/deadline instants always are.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct TimeBits(u64);

impl TimeBits {
    fn from_f64(t: f64) -> Self {
        TimeBits(t.to_bits())
    }
    fn to_f64(self) -> f64 {
        f64::from_bits(self.0)
    }
}

impl EventIndex {
    fn push(&mut self, time: f64, entry: EventEntry) {
        self.by_time.entry(TimeBits::from_f64(time)).or_default().push(entry);
    }

    fn ensure(&mut self, time: f64) {
        self.by_time.entry(TimeBits::from_f64(time)).or_default();
    }

    /// The time-sorted sequence of distinct event instants.
    pub fn times(&self) -> Vec<f64> {
        self.by_time.keys().map(|k| k.to_f64()).collect()
    }

    pub fn at(&self, time: f64) -> &[EventEntry] {
        self.by_time
            .get(&TimeBits::from_f64(time))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

/// Parses tasks from a flat input list, skipping duplicates.
pub fn build_tasks(input: Vec<Task>) -> (BTreeMap<i64, Task>, Vec<ValidationWarning>) {
    let mut tasks = BTreeMap::new();
    let mut warnings = Vec::new();

    for task in input {
        if tasks.contains_key(&task.id) {
            warnings.push(ValidationWarning::new(ValidationError::DuplicateTaskId(task.id)));
            continue;
        }
        if task.is_aperiodic() && task.relative_deadline < 0.0 {
            warnings.push(ValidationWarning::new(ValidationError::NegativeAperiodicDeadline(task.id)));
            continue;
        }
        if let Some(section) = task.sections.iter().find(|s| s.resource < 0) {
            warnings.push(ValidationWarning::new(ValidationError::NegativeResourceId {
                task_id: task.id,
                resource_id: section.resource,
            }));
            continue;
        }
        tasks.insert(task.id, task);
    }

    (tasks, warnings)
}

/// The union of every task's resource ids, `0` removed, ascending.
pub fn collect_resources(tasks: &BTreeMap<i64, Task>) -> Vec<ResourceId> {
    let mut ids: Vec<ResourceId> = tasks
        .values()
        .flat_map(|t| t.resources())
        .filter(|&r| r != NO_RESOURCE)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Per-task release bookkeeping, kept outside `Task` so the task
/// descriptor itself stays immutable after construction.
struct ReleaseCursor {
    last_job_seq: u32,
    last_release: Option<f64>,
}

impl ReleaseCursor {
    fn new() -> Self {
        ReleaseCursor { last_job_seq: 0, last_release: None }
    }

    /// Rejects a release earlier than the previous one, or closer to it
    /// than the task's period; returns the new job's sequence number.
    fn try_spawn(&mut self, task: &Task, release_time: f64) -> Result<u32, ()> {
        if let Some(last) = self.last_release {
            if release_time < last {
                return Err(());
            }
            if release_time < last + task.period {
                return Err(());
            }
        }
        self.last_job_seq += 1;
        self.last_release = Some(release_time);
        Ok(self.last_job_seq)
    }
}

/// Expands tasks into jobs and builds the event index.
///
/// Either `release_times` (sporadic/explicit releases) drives which jobs
/// exist, or periodic expansion from `[schedule_start, schedule_end)`
/// does; `schedule_start`/`schedule_end` always bound the event index.
pub fn expand(
    tasks: &BTreeMap<i64, Task>,
    schedule_start: f64,
    schedule_end: f64,
    release_times: Option<&[ReleaseSpec]>,
) -> (Jobs, EventIndex, Vec<ValidationWarning>) {
    let mut jobs = Jobs::new();
    let mut events = EventIndex::default();
    let mut warnings = Vec::new();
    let mut cursors: BTreeMap<i64, ReleaseCursor> = tasks.keys().map(|&id| (id, ReleaseCursor::new())).collect();

    let mut spawn = |task_id: i64, release_time: f64, jobs: &mut Jobs, events: &mut EventIndex, warnings: &mut Vec<ValidationWarning>| {
        let Some(task) = tasks.get(&task_id) else { return };
        if release_time < schedule_start {
            return;
        }
        let cursor = cursors.get_mut(&task_id).expect("cursor exists for every known task");
        match cursor.try_spawn(task, release_time) {
            Ok(job_seq) => {
                let id = jobs.insert(task, job_seq, SimTime(release_time));
                events.push(release_time, EventEntry { kind: EventKind::Release, job: id });
                let deadline = jobs.get(id).absolute_deadline.0;
                if deadline <= schedule_end {
                    events.push(deadline, EventEntry { kind: EventKind::Deadline, job: id });
                }
            }
            Err(()) => {
                warnings.push(ValidationWarning::new(ValidationError::NonMonotonicRelease {
                    task_id,
                    release_time,
                }));
            }
        }
    };

    if let Some(releases) = release_times {
        for r in releases {
            spawn(r.task_id, r.time_instant, &mut jobs, &mut events, &mut warnings);
        }
    } else {
        for task in tasks.values() {
            let mut t = task.offset.max(schedule_start);
            while t < schedule_end {
                spawn(task.id, t, &mut jobs, &mut events, &mut warnings);
                if task.is_aperiodic() {
                    t = schedule_end;
                } else {
                    t += task.period;
                }
            }
        }
    }

    events.ensure(schedule_end);
    (jobs, events, warnings)
}
