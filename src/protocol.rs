//! The pluggable resource-access protocol.

use std::collections::HashMap;

use crate::priority::Priority;
use crate::task::{ResourceId, Task};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessProtocol {
    Simple,
    Hlp,
    Pip,
}

impl std::str::FromStr for AccessProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(AccessProtocol::Simple),
            "hlp" => Ok(AccessProtocol::Hlp),
            "pip" => Ok(AccessProtocol::Pip),
            other => Err(format!("unknown access protocol: {other}")),
        }
    }
}

/// For each resource, the best (smallest) `original_priority` among all
/// tasks that ever lock it; `Priority::LOWEST` if none do.
pub fn highest_lockers(tasks: &[Task]) -> HashMap<ResourceId, Priority> {
    let mut best: HashMap<ResourceId, Priority> = HashMap::new();
    for task in tasks {
        let priority = task.original_priority();
        for resource in task.resources() {
            let entry = best.entry(resource).or_insert(Priority::LOWEST);
            if priority.is_better_than(*entry) {
                *entry = priority;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Section;

    fn task(id: i64, deadline: f64, resource: i64) -> Task {
        Task {
            id,
            period: 10.0,
            wcet: 1.0,
            relative_deadline: deadline,
            offset: 0.0,
            sections: vec![Section { resource, duration: 1.0 }],
        }
    }

    #[test]
    fn picks_best_locker_per_resource() {
        let tasks = vec![task(1, 20.0, 1), task(2, 5.0, 1), task(3, 8.0, 2)];
        let best = highest_lockers(&tasks);
        assert_eq!(best[&1], Priority(5.0));
        assert_eq!(best[&2], Priority(8.0));
    }

    #[test]
    fn resource_with_no_lockers_defaults_to_lowest() {
        let best = highest_lockers(&[]);
        assert!(best.is_empty());
    }
}
