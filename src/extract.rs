use crate::data::ScheduledDefense;
use crate::domain::DefenseProblem;
use crate::model::DecisionVars;
use good_lp::{Solution, Variable};

/// Placeholder examiner name for a seat the solver left empty. The seat
/// constraints rule this out for scheduled students; it exists so a record
/// can always be rendered instead of aborting extraction.
pub const UNASSIGNED: &str = "unassigned";

/// Read access to solved variable values.
///
/// The engine adapts real solver solutions via [`SolvedValues`]; tests feed
/// the extractor hand-built value tables instead of running a solver.
pub trait VariableValues {
    fn value_of(&self, var: Variable) -> f64;
}

/// Adapter exposing a `good_lp` solution through [`VariableValues`].
pub struct SolvedValues<S: Solution>(pub S);

impl<S: Solution> VariableValues for SolvedValues<S> {
    fn value_of(&self, var: Variable) -> f64 {
        self.0.value(var)
    }
}

/// rebuilds one schedule record per scheduled student from variable values.
///
/// Records come out in student input order. Students whose scheduled
/// indicator is off produce no record.
pub fn extract_schedule<V: VariableValues>(
    problem: &DefenseProblem,
    decisions: &DecisionVars,
    values: &V,
) -> Vec<ScheduledDefense> {
    let mut schedule = Vec::new();

    for (s, student) in problem.students.iter().enumerate() {
        if values.value_of(decisions.scheduled[s]) < 0.9 {
            continue;
        }
        let placement = (0..problem.sessions.len())
            .flat_map(|e| (0..problem.rooms.len()).map(move |r| (e, r)))
            .find(|&(e, r)| {
                decisions
                    .assign
                    .get(&(s, e, r))
                    .is_some_and(|&var| values.value_of(var) > 0.9)
            });
        let Some((e, r)) = placement else {
            continue;
        };

        // seat 0 renders as examiner1, seat 1 as examiner2
        let seat_name = |k: usize| {
            problem.eligible[s]
                .iter()
                .find(|&&f| values.value_of(decisions.examiner[&(s, f, k)]) > 0.9)
                .map(|&f| problem.faculty[f].name.clone())
                .unwrap_or_else(|| UNASSIGNED.to_string())
        };

        schedule.push(ScheduledDefense {
            student: student.name.clone(),
            title: student.title.clone(),
            field: student.field.clone(),
            advisor1: student.advisor1.clone(),
            advisor2: student.advisor2.clone(),
            examiner1: seat_name(0),
            examiner2: seat_name(1),
            session: problem.sessions[e].clone(),
            room: problem.rooms[r].clone(),
        });
    }

    schedule
}
