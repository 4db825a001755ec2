use crate::data::{ScheduleRequest, ScheduledDefense};
use crate::domain::{self, DefenseProblem};
use crate::engine::{self, SolveOutcome, SolveStatus};
use crate::error::SolveError;
use crate::model;
use log::{debug, info};
use std::time::Duration;

/// Outcome of one solve request, ready for the boundary to serialize.
pub struct SolveReport {
    pub status: SolveStatus,
    pub total_students: usize,
    pub schedule: Vec<ScheduledDefense>,
}

/// runs the full pipeline: validate, build, encode, solve, extract.
pub fn solve(request: ScheduleRequest) -> Result<SolveReport, SolveError> {
    domain::validate_request(&request)?;
    let budget = Duration::from_secs(request.max_time_seconds);
    let problem = DefenseProblem::build(request)?;

    info!(
        "scheduling {} students with {} faculty over {} sessions and {} rooms",
        problem.students.len(),
        problem.faculty.len(),
        problem.sessions.len(),
        problem.rooms.len()
    );

    let encoded = model::encode(&problem);
    debug!(
        "encoded {} variables and {} constraints",
        encoded.variable_count,
        encoded.constraints.len()
    );

    let total_students = problem.students.len();
    if encoded.decisions.assign.is_empty() {
        info!("no candidate placements survived availability filtering; skipping the solver");
        return Ok(SolveReport {
            status: SolveStatus::NoSolution,
            total_students,
            schedule: Vec::new(),
        });
    }

    let SolveOutcome { status, schedule } = engine::solve(&problem, encoded, budget)?;
    Ok(SolveReport {
        status,
        total_students,
        schedule,
    })
}
