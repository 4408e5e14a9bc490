//! A single binary mutex over one resource id.
//!
//! Mechanics only: `Semaphore` knows how to order its wait queue by
//! priority and how to hand the lock off, but the decision of *whether*
//! and *whose* priority to elevate belongs one level up, in
//! [`crate::semaphore_set::SemaphoreSet`] — the set knows the protocol,
//! the semaphore knows only queue mechanics.

use crate::job::{JobId, Jobs};
use crate::priority::Priority;
use crate::queue::Queues;
use crate::task::ResourceId;

pub struct Semaphore {
    pub resource: ResourceId,
    queue: Vec<JobId>,
    owner: Option<JobId>,
    taken: bool,
    priority: Priority,
    elevated_priority: Priority,
}

impl Semaphore {
    pub fn new(resource: ResourceId) -> Self {
        Semaphore {
            resource,
            queue: Vec::new(),
            owner: None,
            taken: false,
            priority: Priority::LOWEST,
            elevated_priority: Priority::LOWEST,
        }
    }

    pub fn is_taken(&self) -> bool {
        self.taken
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Appends `job`, re-sorts by priority, and either hands it the lock
    /// immediately (returns `0`) or reports that it must block (`-1`).
    pub fn wait(&mut self, job: JobId, jobs: &Jobs) -> i32 {
        self.queue.push(job);
        self.queue.sort_by_key(|&id| jobs.get(id).priority);
        self.priority = jobs.get(self.queue[0]).priority;

        if self.taken {
            -1
        } else {
            self.taken = true;
            self.owner = Some(job);
            0
        }
    }

    /// Removes `job`. If it was the owner, hands the lock to the new
    /// head (unblocking it) or frees the semaphore. Returns `1` when a
    /// successor took over, `0` when the semaphore went free, `-1` if
    /// `job` was not the owner.
    pub fn signal(&mut self, job: JobId, jobs: &mut Jobs, queues: &mut Queues) -> i32 {
        self.remove_from_queue(job);

        if self.owner != Some(job) {
            return -1;
        }

        if let Some(&head) = self.queue.first() {
            self.owner = Some(head);
            self.priority = jobs.get(head).priority;
            jobs.unblock(head, queues);
            1
        } else {
            self.owner = None;
            self.priority = Priority::LOWEST;
            self.taken = false;
            0
        }
    }

    /// Used when a job ends while still queued on this resource.
    pub fn abandon(&mut self, job: JobId, jobs: &mut Jobs, queues: &mut Queues) -> i32 {
        if self.owner == Some(job) {
            return self.signal(job, jobs, queues);
        }
        if !self.queue.contains(&job) {
            return -1;
        }
        self.remove_from_queue(job);
        if let Some(&head) = self.queue.first() {
            self.priority = jobs.get(head).priority;
        }
        1
    }

    /// PIP: when a waiter's priority has raised this semaphore's effective
    /// priority below the floor reached so far, elevate every queued job
    /// (including the owner) to that new floor.
    pub fn elevate_priorities(&mut self, jobs: &mut Jobs, queues: &mut Queues) {
        if self.priority.is_better_than(self.elevated_priority) {
            self.elevated_priority = self.priority;
            for id in self.queue.clone() {
                jobs.elevate_priority(id, self.priority, queues);
            }
        }
    }

    /// PIP: symmetric reversion once the floor has risen (higher-priority
    /// waiters left, or the owner changed).
    pub fn revert_priorities(&mut self, jobs: &mut Jobs, queues: &mut Queues) {
        if self.elevated_priority.is_better_than(self.priority) {
            self.elevated_priority = self.priority;
            for id in self.queue.clone() {
                jobs.revert_priority(id, self.priority, queues);
            }
        }
    }

    fn remove_from_queue(&mut self, job: JobId) {
        if let Some(pos) = self.queue.iter().position(|&id| id == job) {
            self.queue.remove(pos);
        }
    }
}
