use crate::data::ScheduledDefense;
use crate::domain::DefenseProblem;
use crate::error::SolveError;
use crate::extract::{SolvedValues, extract_schedule};
use crate::model::EncodedModel;
use good_lp::{ResolutionError, SolverModel, default_solver};
use log::info;
use std::time::{Duration, Instant};

/// How a solve run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The schedule reaches the static per-student bound, so no schedule
    /// places more students.
    Optimal,
    /// A schedule below the bound; the bound ignores cross-student
    /// contention, so this may still be the best possible.
    Feasible,
    /// The backend proved that no assignment satisfies the constraints.
    Infeasible,
    /// No candidate placement survived availability filtering; the backend
    /// was never invoked.
    NoSolution,
}

pub struct SolveOutcome {
    pub status: SolveStatus,
    pub schedule: Vec<ScheduledDefense>,
}

/// runs the HiGHS MIP solver on an encoded model under a wall-clock budget.
pub fn solve(
    problem: &DefenseProblem,
    encoded: EncodedModel,
    budget: Duration,
) -> Result<SolveOutcome, SolveError> {
    let EncodedModel {
        pool,
        decisions,
        constraints,
        objective,
        ..
    } = encoded;

    let start = Instant::now();
    let mut model = pool
        .maximise(objective)
        .using(default_solver)
        .set_option("time_limit", budget.as_secs_f64())
        // single thread and a fixed seed keep repeated solves reproducible
        .set_option("threads", 1)
        .set_option("random_seed", 1234)
        .set_option("log_to_console", "false");
    for row in constraints {
        model.add_constraint(row);
    }

    match model.solve() {
        Ok(solution) => {
            let schedule = extract_schedule(problem, &decisions, &SolvedValues(solution));
            // good_lp does not surface the backend's optimality proof, so
            // only claim optimal when the static bound is met
            let status = if schedule.len() >= problem.schedulable_bound() {
                SolveStatus::Optimal
            } else {
                SolveStatus::Feasible
            };
            info!(
                "solver finished in {:.2?}: {} of {} students scheduled ({:?})",
                start.elapsed(),
                schedule.len(),
                problem.students.len(),
                status
            );
            Ok(SolveOutcome { status, schedule })
        }
        Err(ResolutionError::Infeasible) => {
            info!("solver proved infeasibility in {:.2?}", start.elapsed());
            Ok(SolveOutcome {
                status: SolveStatus::Infeasible,
                schedule: Vec::new(),
            })
        }
        Err(e) => Err(SolveError::Solver(e.to_string())),
    }
}
