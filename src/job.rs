//! Jobs: one release of a task, with a finite-state lifecycle and a
//! cursor into its private, deep-copied section list.
//!
//! Jobs are stored in a flat arena (`Jobs`) and referenced everywhere
//! else by `JobId`. Nothing holds an owning pointer to a `Job` — the
//! arena owns them, the ready/waiting priority queues and the
//! semaphores' wait queues hold only `JobId`s, and a job's `location`
//! field is the only back-reference it carries, so that a priority
//! change can be pushed into whichever queue the job is currently
//! sitting in without chasing owning pointers through the queues.

use crate::priority::Priority;
use crate::queue::Queues;
use crate::semaphore_set::SemaphoreSet;
use crate::task::{ResourceId, Section, Task};
use crate::time::{Duration, SimTime, EPS};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JobId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    Created,
    Ready,
    Running,
    Blocked,
    Suspended,
    Ended,
    Aborted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    None,
    Ready,
    Waiting,
}

#[derive(Clone, Debug)]
pub struct Job {
    pub id: JobId,
    pub task_id: i64,
    /// Monotonic within its task.
    pub job_seq: u32,
    pub release_time: SimTime,
    pub absolute_deadline: SimTime,
    pub remaining_execution_time: Duration,
    /// Private deep copy of the task's sections; durations decremented in place.
    sections: Vec<Section>,
    current_section_index: usize,
    pub state: JobState,
    pub original_priority: Priority,
    pub priority: Priority,
    pub got_lock: bool,
    pub(crate) location: Location,
}

impl Job {
    pub fn new(id: JobId, task: &Task, job_seq: u32, release_time: SimTime) -> Self {
        let original_priority = task.original_priority();
        Job {
            id,
            task_id: task.id,
            job_seq,
            release_time,
            absolute_deadline: release_time + task.relative_deadline,
            remaining_execution_time: task.wcet,
            sections: task.sections.clone(),
            current_section_index: 0,
            state: JobState::Created,
            original_priority,
            priority: original_priority,
            got_lock: false,
            location: Location::None,
        }
    }

    pub fn current_section(&self) -> Section {
        self.sections[self.current_section_index]
    }

    pub fn is_done(&self) -> bool {
        self.remaining_execution_time <= EPS
    }

    /// Elevate toward `candidate` only if it is actually better: priority
    /// is only ever elevated downward, never worsened.
    pub fn elevate_priority(&mut self, candidate: Priority) {
        if candidate.is_better_than(self.priority) {
            self.priority = candidate;
        }
    }

    /// Restore priority to `to`. The reversion target is computed by the
    /// caller — the task's own original priority for a per-caller revert,
    /// or the semaphore's current effective priority for a bulk
    /// `revert_priorities`.
    pub fn revert_priority(&mut self, to: Priority) {
        debug_assert!(to <= self.original_priority);
        self.priority = to;
    }
}

/// Flat arena owning every job for the lifetime of the simulation.
#[derive(Default)]
pub struct Jobs {
    items: Vec<Job>,
}

impl Jobs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, task: &Task, job_seq: u32, release_time: SimTime) -> JobId {
        let id = JobId(self.items.len() as u32);
        self.items.push(Job::new(id, task, job_seq, release_time));
        id
    }

    pub fn get(&self, id: JobId) -> &Job {
        &self.items[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: JobId) -> &mut Job {
        &mut self.items[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.items.iter()
    }

    /// CREATED -> READY.
    pub fn release(&mut self, id: JobId, queues: &mut Queues) {
        let priority = {
            let job = self.get_mut(id);
            job.state = JobState::Ready;
            job.location = Location::Ready;
            job.priority
        };
        queues.ready.push(id, priority);
    }

    /// READY/BLOCKED -> ENDED or ABORTED.
    pub fn end(&mut self, id: JobId, queues: &mut Queues, semaphores: &mut SemaphoreSet) {
        let (state, resource) = {
            let job = self.get(id);
            (job.state, job.current_section().resource)
        };
        match state {
            JobState::Ready => {
                queues.ready.remove(id);
            }
            JobState::Blocked => {
                queues.waiting.remove(id);
                semaphores.abandon(resource, id, self, queues);
            }
            _ => {}
        }
        let job = self.get_mut(id);
        job.location = Location::None;
        job.state = if job.remaining_execution_time > EPS {
            JobState::Aborted
        } else {
            JobState::Ended
        };
    }

    /// BLOCKED -> READY, triggered by a semaphore signal.
    pub fn unblock(&mut self, id: JobId, queues: &mut Queues) {
        queues.waiting.remove(id);
        let priority = {
            let job = self.get_mut(id);
            job.state = JobState::Ready;
            job.location = Location::Ready;
            job.got_lock = true;
            job.priority
        };
        queues.ready.push(id, priority);
    }

    /// Run the job's current section for up to `budget` time units.
    ///
    /// Returns `(progression, resource)`; `progression == 0` means the job
    /// just blocked and the scheduler must re-select.
    pub fn execute(
        &mut self,
        id: JobId,
        budget: Duration,
        queues: &mut Queues,
        semaphores: &mut SemaphoreSet,
    ) -> (Duration, ResourceId) {
        let section = self.get(id).current_section();
        let resource = section.resource;
        let mut progression = section.duration.min(budget).max(0.0);

        let already_holds = self.get(id).got_lock;
        let acquired = already_holds || semaphores.wait(resource, id, self, queues) == 0;

        if acquired {
            let job = self.get_mut(id);
            job.got_lock = true;
            job.remaining_execution_time = (job.remaining_execution_time - progression).max(0.0);
            let idx = job.current_section_index;
            job.sections[idx].duration -= progression;
            let section_done = job.sections[idx].duration <= EPS;
            if section_done {
                job.current_section_index += 1;
                let res = semaphores.signal(resource, id, self, queues);
                if res < 0 {
                    tracing::error!(job = id.0, resource, "signal on a semaphore this job did not hold");
                }
                self.get_mut(id).got_lock = false;
            }
        } else {
            queues.ready.remove(id);
            let priority = self.get(id).priority;
            queues.waiting.push(id, priority);
            let job = self.get_mut(id);
            job.state = JobState::Blocked;
            job.location = Location::Waiting;
            progression = 0.0;
        }

        if self.get(id).is_done() {
            self.end(id, queues, semaphores);
        }

        (progression, resource)
    }

    pub fn elevate_priority(&mut self, id: JobId, candidate: Priority, queues: &mut Queues) {
        self.get_mut(id).elevate_priority(candidate);
        self.resync_location(id, queues);
    }

    pub fn revert_priority(&mut self, id: JobId, to: Priority, queues: &mut Queues) {
        self.get_mut(id).revert_priority(to);
        self.resync_location(id, queues);
    }

    fn resync_location(&self, id: JobId, queues: &mut Queues) {
        let job = self.get(id);
        match job.location {
            Location::Ready => queues.ready.change_priority(id, job.priority),
            Location::Waiting => queues.waiting.change_priority(id, job.priority),
            Location::None => {}
        }
    }
}
