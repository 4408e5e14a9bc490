//! The schedule trace: the simulator's sole observable output.

use crate::task::ResourceId;

/// `task_id == 0 && job_id == 0` denotes idle or non-critical execution
/// with no owning job.
pub const IDLE_TASK_ID: i64 = 0;
pub const IDLE_JOB_ID: u32 = 0;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TraceRecord {
    pub start: f64,
    pub end: f64,
    pub task_id: i64,
    pub job_id: u32,
    pub resource: ResourceId,
}

impl TraceRecord {
    fn same_run(&self, task_id: i64, job_id: u32, resource: ResourceId) -> bool {
        self.task_id == task_id && self.job_id == job_id && self.resource == resource
    }
}

/// Ordered sequence of trace records; adjacent records with identical
/// `(task_id, job_id, resource_id)` and touching endpoints are merged
/// as they're appended, rather than in a separate post-processing pass.
#[derive(Default)]
pub struct Trace {
    records: Vec<TraceRecord>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, start: f64, end: f64, task_id: i64, job_id: u32, resource: ResourceId) {
        if end <= start {
            return;
        }
        if let Some(last) = self.records.last_mut() {
            if last.same_run(task_id, job_id, resource) && last.end == start {
                last.end = end;
                return;
            }
        }
        self.records.push(TraceRecord { start, end, task_id, job_id, resource });
    }

    pub fn record_idle(&mut self, start: f64, end: f64) {
        self.record(start, end, IDLE_TASK_ID, IDLE_JOB_ID, 0);
    }

    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TraceRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_same_run_records_merge() {
        let mut trace = Trace::new();
        trace.record(0.0, 2.0, 1, 1, 0);
        trace.record(2.0, 5.0, 1, 1, 0);
        assert_eq!(trace.records(), &[TraceRecord { start: 0.0, end: 5.0, task_id: 1, job_id: 1, resource: 0 }]);
    }

    #[test]
    fn different_resource_does_not_merge() {
        let mut trace = Trace::new();
        trace.record(0.0, 2.0, 1, 1, 1);
        trace.record(2.0, 3.0, 1, 1, 2);
        assert_eq!(trace.records().len(), 2);
    }

    #[test]
    fn gap_prevents_merge() {
        let mut trace = Trace::new();
        trace.record(0.0, 2.0, 1, 1, 0);
        trace.record(3.0, 4.0, 1, 1, 0);
        assert_eq!(trace.records().len(), 2);
    }

    #[test]
    fn zero_length_progression_is_dropped() {
        let mut trace = Trace::new();
        trace.record(2.0, 2.0, 1, 1, 0);
        assert!(trace.records().is_empty());
    }
}
