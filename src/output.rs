//! Renders a trace and its validation warnings, human-readable or JSON.

use std::collections::BTreeMap;

use crate::error::ValidationWarning;
use crate::job::Jobs;
use crate::task::Task;
use crate::trace::TraceRecord;

pub fn print_warnings(warnings: &[ValidationWarning]) {
    for warning in warnings {
        eprintln!("{warning}");
    }
}

pub fn print_tasks(tasks: &BTreeMap<i64, Task>) {
    println!("Tasks:");
    for task in tasks.values() {
        let kind = if task.is_aperiodic() { "aperiodic" } else { "periodic" };
        println!(
            "  task {} ({}): wcet={:.3} deadline={:.3} period={:.3} offset={:.3}",
            task.id, kind, task.wcet, task.relative_deadline, task.period, task.offset
        );
    }
}

pub fn print_jobs(jobs: &Jobs) {
    println!("Jobs:");
    for job in jobs.iter() {
        println!(
            "  task {} job {}: release={:.3} deadline={:.3}",
            job.task_id, job.job_seq, job.release_time, job.absolute_deadline
        );
    }
}

pub fn print_human(records: &[TraceRecord]) {
    println!("\nSchedule:");
    for r in records {
        if r.task_id == crate::trace::IDLE_TASK_ID {
            println!("  [{:>8.3}, {:>8.3}) idle", r.start, r.end);
        } else {
            println!(
                "  [{:>8.3}, {:>8.3}) task {} job {}{}",
                r.start,
                r.end,
                r.task_id,
                r.job_id,
                if r.resource == 0 { String::new() } else { format!(" (holding resource {})", r.resource) }
            );
        }
    }
}

pub fn print_json(records: &[TraceRecord]) -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(records)?;
    println!("{json}");
    Ok(())
}
