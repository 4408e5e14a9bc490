//! Parses a task-set JSON file into the core's `Task`/`ReleaseSpec`
//! types: a `taskset` array, plus either a `startTime`/`endTime`
//! window or an explicit `releaseTimes` list.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::SimError;
use crate::task::{Section, Task};
use crate::taskset::ReleaseSpec;

#[derive(Deserialize)]
struct TaskRecord {
    #[serde(rename = "taskId")]
    task_id: i64,
    period: f64,
    wcet: f64,
    deadline: Option<f64>,
    #[serde(default)]
    offset: f64,
    #[serde(default)]
    sections: Vec<(i64, f64)>,
}

#[derive(Deserialize)]
struct ReleaseRecord {
    #[serde(rename = "timeInstant")]
    time_instant: f64,
    #[serde(rename = "taskId")]
    task_id: i64,
}

#[derive(Deserialize)]
struct TaskSetFile {
    taskset: Vec<TaskRecord>,
    #[serde(rename = "startTime")]
    start_time: Option<f64>,
    #[serde(rename = "endTime")]
    end_time: Option<f64>,
    #[serde(rename = "releaseTimes")]
    release_times: Option<Vec<ReleaseRecord>>,
}

/// The two ways a file can drive job creation: a fixed window (periodic
/// expansion) or an explicit release list (sporadic). A release list
/// still carries `start`/`end`: when both `startTime`/`endTime` and
/// `releaseTimes` are supplied, the release list wins for which jobs
/// exist, but start/end still bound the event index (start still
/// discards releases below `schedule_start`).
pub enum ReleasePlan {
    Window { start: f64, end: f64 },
    Releases { releases: Vec<ReleaseSpec>, start: f64, end: f64 },
}

pub struct ParsedTaskSet {
    pub tasks: Vec<Task>,
    pub plan: ReleasePlan,
}

pub fn load(path: &Path) -> Result<ParsedTaskSet, SimError> {
    let text = fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse(&text, path)
}

fn parse(text: &str, path: &Path) -> Result<ParsedTaskSet, SimError> {
    let file: TaskSetFile = serde_json::from_str(text).map_err(|source| SimError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    let tasks = file.taskset.into_iter().map(|r| Task {
        id: r.task_id,
        period: r.period,
        wcet: r.wcet,
        relative_deadline: r.deadline.unwrap_or(r.period),
        offset: r.offset,
        sections: r.sections.into_iter().map(|(resource, duration)| Section { resource, duration }).collect(),
    }).collect();

    let plan = match file.release_times {
        Some(records) => {
            let end = file.end_time.unwrap_or_else(|| {
                records.iter().map(|r| r.time_instant).fold(0.0, f64::max)
            });
            let start = file.start_time.unwrap_or(0.0);
            let releases = records
                .into_iter()
                .map(|r| ReleaseSpec { time_instant: r.time_instant, task_id: r.task_id })
                .collect();
            ReleasePlan::Releases { releases, start, end }
        }
        None => ReleasePlan::Window {
            start: file.start_time.unwrap_or(0.0),
            end: file.end_time.unwrap_or(0.0),
        },
    };

    Ok(ParsedTaskSet { tasks, plan })
}
