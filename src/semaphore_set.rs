//! The collection of semaphores, parameterized by access protocol; the
//! façade through which jobs acquire and release resources.
//!
//! Resource id `0` is an identity case: `wait`/`signal` succeed
//! immediately with no state change. Protocol hooks fire around the
//! underlying [`Semaphore`] call:
//!
//! | Protocol | on wait() | on signal()/abandon() |
//! |---|---|---|
//! | SIMPLE | none | none |
//! | HLP | elevate caller to the resource's highest locker | revert caller to original |
//! | PIP | if blocked, elevate the owner's chain | if it succeeded, revert caller + the chain |

use std::collections::HashMap;

use crate::job::{JobId, Jobs};
use crate::priority::Priority;
use crate::protocol::AccessProtocol;
use crate::queue::Queues;
use crate::semaphore::Semaphore;
use crate::task::{ResourceId, NO_RESOURCE};

pub struct SemaphoreSet {
    semaphores: HashMap<ResourceId, Semaphore>,
    protocol: AccessProtocol,
    highest_lockers: HashMap<ResourceId, Priority>,
}

impl SemaphoreSet {
    pub fn new(
        resources: Vec<ResourceId>,
        protocol: AccessProtocol,
        highest_lockers: HashMap<ResourceId, Priority>,
    ) -> Self {
        let semaphores = resources
            .into_iter()
            .map(|r| (r, Semaphore::new(r)))
            .collect();
        SemaphoreSet {
            semaphores,
            protocol,
            highest_lockers,
        }
    }

    pub fn wait(&mut self, resource: ResourceId, job: JobId, jobs: &mut Jobs, queues: &mut Queues) -> i32 {
        if resource == NO_RESOURCE {
            return 0;
        }
        let Some(sem) = self.semaphores.get_mut(&resource) else {
            tracing::error!(resource, "wait on unknown resource id, treated as null lock");
            return -1;
        };
        let res = sem.wait(job, jobs);

        match self.protocol {
            AccessProtocol::Simple => {}
            AccessProtocol::Hlp => {
                let ceiling = *self.highest_lockers.get(&resource).unwrap_or(&Priority::LOWEST);
                jobs.elevate_priority(job, ceiling, queues);
            }
            AccessProtocol::Pip => {
                if res == -1 {
                    sem.elevate_priorities(jobs, queues);
                }
            }
        }

        res
    }

    pub fn signal(&mut self, resource: ResourceId, job: JobId, jobs: &mut Jobs, queues: &mut Queues) -> i32 {
        if resource == NO_RESOURCE {
            return 0;
        }
        let Some(sem) = self.semaphores.get_mut(&resource) else {
            return -1;
        };
        let res = sem.signal(job, jobs, queues);
        self.revert_caller(job, resource, res, jobs, queues);
        res
    }

    pub fn abandon(&mut self, resource: ResourceId, job: JobId, jobs: &mut Jobs, queues: &mut Queues) -> i32 {
        if resource == NO_RESOURCE {
            return 0;
        }
        let Some(sem) = self.semaphores.get_mut(&resource) else {
            return -1;
        };
        let res = sem.abandon(job, jobs, queues);
        self.revert_caller(job, resource, res, jobs, queues);
        res
    }

    fn revert_caller(
        &mut self,
        job: JobId,
        resource: ResourceId,
        res: i32,
        jobs: &mut Jobs,
        queues: &mut Queues,
    ) {
        match self.protocol {
            AccessProtocol::Simple => {}
            AccessProtocol::Hlp => {
                let original = jobs.get(job).original_priority;
                jobs.revert_priority(job, original, queues);
            }
            AccessProtocol::Pip => {
                if res >= 0 {
                    let original = jobs.get(job).original_priority;
                    jobs.revert_priority(job, original, queues);
                    if let Some(sem) = self.semaphores.get_mut(&resource) {
                        sem.revert_priorities(jobs, queues);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{JobState, Location};
    use crate::task::{Section, Task};
    use crate::time::SimTime;

    fn task(id: i64, deadline: f64, resource: i64) -> Task {
        Task {
            id,
            period: 20.0,
            wcet: 4.0,
            relative_deadline: deadline,
            offset: 0.0,
            sections: vec![Section { resource, duration: 4.0 }],
        }
    }

    #[test]
    fn hlp_elevates_on_every_successful_wait() {
        let mut jobs = Jobs::new();
        let mut queues = Queues::default();
        let low = jobs.insert(&task(1, 20.0, 1), 1, SimTime(0.0));
        jobs.release(low, &mut queues);

        let mut highest = HashMap::new();
        highest.insert(1, Priority(5.0));
        let mut sems = SemaphoreSet::new(vec![1], AccessProtocol::Hlp, highest);

        let res = sems.wait(1, low, &mut jobs, &mut queues);
        assert_eq!(res, 0);
        assert_eq!(jobs.get(low).priority, Priority(5.0));
    }

    #[test]
    fn hlp_reverts_on_signal() {
        let mut jobs = Jobs::new();
        let mut queues = Queues::default();
        let low = jobs.insert(&task(1, 20.0, 1), 1, SimTime(0.0));
        jobs.release(low, &mut queues);

        let mut highest = HashMap::new();
        highest.insert(1, Priority(5.0));
        let mut sems = SemaphoreSet::new(vec![1], AccessProtocol::Hlp, highest);

        sems.wait(1, low, &mut jobs, &mut queues);
        assert_eq!(jobs.get(low).priority, Priority(5.0));
        sems.signal(1, low, &mut jobs, &mut queues);
        assert_eq!(jobs.get(low).priority, Priority(20.0));
    }

    #[test]
    fn pip_elevates_owner_when_blocked() {
        let mut jobs = Jobs::new();
        let mut queues = Queues::default();
        let low = jobs.insert(&task(1, 20.0, 1), 1, SimTime(0.0));
        let high = jobs.insert(&task(2, 5.0, 1), 1, SimTime(1.0));
        jobs.release(low, &mut queues);
        jobs.release(high, &mut queues);

        let mut sems = SemaphoreSet::new(vec![1], AccessProtocol::Pip, HashMap::new());

        assert_eq!(sems.wait(1, low, &mut jobs, &mut queues), 0);
        // high blocks; PIP elevates the owner (low) to high's priority.
        jobs.get_mut(high).location = Location::Ready; // pretend it's in the ready queue pre-block
        let res = sems.wait(1, high, &mut jobs, &mut queues);
        assert_eq!(res, -1);
        assert_eq!(jobs.get(low).priority, Priority(5.0));
        assert_eq!(jobs.get(high).state, JobState::Created); // wait() alone doesn't transition state
    }

    #[test]
    fn zero_resource_is_a_noop() {
        let mut jobs = Jobs::new();
        let mut queues = Queues::default();
        let job = jobs.insert(&task(1, 20.0, 0), 1, SimTime(0.0));
        let mut sems = SemaphoreSet::new(vec![], AccessProtocol::Pip, HashMap::new());
        assert_eq!(sems.wait(0, job, &mut jobs, &mut queues), 0);
        assert_eq!(sems.signal(0, job, &mut jobs, &mut queues), 0);
    }
}
