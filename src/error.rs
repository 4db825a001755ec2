use thiserror::Error;

/// Input problems detected before any model is built.
///
/// These never reach the solver; the HTTP boundary maps them to a 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("student list must not be empty")]
    NoStudents,
    #[error("faculty list must not be empty")]
    NoFaculty,
    #[error("room list must not be empty")]
    NoRooms,
    #[error("duplicate faculty name '{0}'")]
    DuplicateFaculty(String),
    #[error("max time must be a positive number of seconds")]
    NonPositiveTimeBudget,
    #[error("advisor '{advisor}' of student '{student}' is not in the faculty roster")]
    UnknownAdvisor { student: String, advisor: String },
}

/// Anything that can abort a solve request.
///
/// Infeasibility is not an error: a proven-infeasible or empty schedule
/// is a regular outcome callers branch on, not a fault.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("solver failure: {0}")]
    Solver(String),
}
