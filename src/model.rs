use crate::data::{FacultyIdx, RoomIdx, SessionIdx, StudentIdx};
use crate::domain::DefenseProblem;
use good_lp::{Constraint, Expression, ProblemVariables, Variable, constraint, variable};
use log::trace;
use std::collections::HashMap;

/// Number of examiner seats on a defense committee.
pub const EXAMINER_SLOTS: usize = 2;

/// The binary decision variables of one encoded instance.
///
/// Both maps are sparse: assignment variables exist only for sessions where
/// the student's advisors are both available, examiner variables only for
/// faculty eligible for the student's field. Combinations without a variable
/// are impossible by construction.
pub struct DecisionVars {
    /// x[(s, e, r)] = 1 iff student s defends at session e in room r.
    pub assign: HashMap<(StudentIdx, SessionIdx, RoomIdx), Variable>,
    /// y[(s, f, k)] = 1 iff faculty f fills examiner seat k for student s.
    pub examiner: HashMap<(StudentIdx, FacultyIdx, usize), Variable>,
    /// z[s] = 1 iff student s is placed at all; the objective counts these.
    pub scheduled: Vec<Variable>,
}

/// Everything the solving engine needs: the variable pool, the decision
/// maps for extraction, the constraint rows, and the objective.
pub struct EncodedModel {
    pub pool: ProblemVariables,
    pub decisions: DecisionVars,
    pub constraints: Vec<Constraint>,
    pub objective: Expression,
    pub variable_count: usize,
}

/// encodes a defense problem as a 0-1 integer linear program.
pub fn encode(problem: &DefenseProblem) -> EncodedModel {
    let n_students = problem.students.len();
    let n_faculty = problem.faculty.len();
    let n_sessions = problem.sessions.len();
    let n_rooms = problem.rooms.len();

    let mut pool = ProblemVariables::new();

    // assignment candidates; sessions where either advisor is unavailable
    // are filtered out up front rather than constrained to zero later
    let mut assign_candidates = Vec::new();
    for s in 0..n_students {
        for e in 0..n_sessions {
            if !problem.advisors_available(s, e) {
                continue;
            }
            for r in 0..n_rooms {
                assign_candidates.push((s, e, r));
            }
        }
    }
    trace!(
        "generated {} assignment variables out of a theoretical maximum of {}",
        assign_candidates.len(),
        n_students * n_sessions * n_rooms
    );

    let assign_vec = pool.add_vector(variable().binary(), assign_candidates.len());
    let mut assign: HashMap<(StudentIdx, SessionIdx, RoomIdx), Variable> = HashMap::new();
    for (i, key) in assign_candidates.iter().enumerate() {
        assign.insert(*key, assign_vec[i]);
    }

    // examiner seat candidates, keyed by field eligibility
    let mut examiner_candidates = Vec::new();
    for s in 0..n_students {
        for &f in &problem.eligible[s] {
            for k in 0..EXAMINER_SLOTS {
                examiner_candidates.push((s, f, k));
            }
        }
    }
    let examiner_vec = pool.add_vector(variable().binary(), examiner_candidates.len());
    let mut examiner: HashMap<(StudentIdx, FacultyIdx, usize), Variable> = HashMap::new();
    for (i, key) in examiner_candidates.iter().enumerate() {
        examiner.insert(*key, examiner_vec[i]);
    }

    let scheduled = pool.add_vector(variable().binary(), n_students);

    // conjunction helpers: one per (assignment var, examiner var) pair that
    // the double-booking rows must reason about jointly
    let mut serving_candidates = Vec::new();
    for s in 0..n_students {
        for e in 0..n_sessions {
            for r in 0..n_rooms {
                if !assign.contains_key(&(s, e, r)) {
                    continue;
                }
                for &f in &problem.eligible[s] {
                    for k in 0..EXAMINER_SLOTS {
                        serving_candidates.push((s, e, r, f, k));
                    }
                }
            }
        }
    }
    let serving_vec = pool.add_vector(variable().binary(), serving_candidates.len());
    let mut serving: HashMap<(StudentIdx, SessionIdx, RoomIdx, FacultyIdx, usize), Variable> =
        HashMap::new();
    for (i, key) in serving_candidates.iter().enumerate() {
        serving.insert(*key, serving_vec[i]);
    }
    trace!(
        "generated {} examiner-seat variables and {} conjunction helpers",
        examiner_candidates.len(),
        serving_candidates.len()
    );

    let mut constraints: Vec<Constraint> = Vec::new();

    // each student sits at most once; the scheduled indicator tracks the
    // assignment sum exactly so the objective can count placements
    for s in 0..n_students {
        let placements: Expression = (0..n_sessions)
            .flat_map(|e| (0..n_rooms).map(move |r| (e, r)))
            .filter_map(|(e, r)| assign.get(&(s, e, r)))
            .copied()
            .sum();
        let indicator = scheduled[s];
        constraints.push(constraint!(placements == indicator));
    }

    // at most one defense per room and session
    for e in 0..n_sessions {
        for r in 0..n_rooms {
            let occupants: Vec<Variable> = (0..n_students)
                .filter_map(|s| assign.get(&(s, e, r)).copied())
                .collect();
            if occupants.is_empty() {
                continue;
            }
            let occupied: Expression = occupants.into_iter().sum();
            constraints.push(constraint!(occupied <= 1));
        }
    }

    // every examiner seat of a scheduled student is filled by exactly one
    // eligible faculty member; a student with no eligible faculty gets an
    // empty sum here, which pins their scheduled indicator to zero
    for s in 0..n_students {
        for k in 0..EXAMINER_SLOTS {
            let seat_filled: Expression =
                problem.eligible[s].iter().map(|&f| examiner[&(s, f, k)]).sum();
            let indicator = scheduled[s];
            constraints.push(constraint!(seat_filled == indicator));
        }
    }

    // advisors never examine their own student
    for s in 0..n_students {
        for &f in &problem.eligible[s] {
            if !problem.is_advisor(s, f) {
                continue;
            }
            for k in 0..EXAMINER_SLOTS {
                let seat = examiner[&(s, f, k)];
                constraints.push(constraint!(seat == 0));
            }
        }
    }

    // the examiner seats of one student name distinct faculty
    for s in 0..n_students {
        for &f in &problem.eligible[s] {
            let seats: Expression = (0..EXAMINER_SLOTS).map(|k| examiner[&(s, f, k)]).sum();
            constraints.push(constraint!(seats <= 1));
        }
    }

    // advisor availability needs no rows: assignment variables for sessions
    // with an unavailable advisor were never created

    // an examiner must be free at the session their student sits
    for s in 0..n_students {
        for e in 0..n_sessions {
            for &f in &problem.eligible[s] {
                if problem.is_available(f, e) {
                    continue;
                }
                for k in 0..EXAMINER_SLOTS {
                    for r in 0..n_rooms {
                        let Some(&placed) = assign.get(&(s, e, r)) else {
                            continue;
                        };
                        let seat = examiner[&(s, f, k)];
                        constraints.push(constraint!(placed + seat <= 1));
                    }
                }
            }
        }
    }

    // tie each conjunction helper to its assignment/examiner pair
    for (i, &(s, e, r, f, k)) in serving_candidates.iter().enumerate() {
        let joint = serving_vec[i];
        let placed = assign[&(s, e, r)];
        let seat = examiner[&(s, f, k)];
        constraints.push(constraint!(joint <= placed));
        constraints.push(constraint!(joint <= seat));
        constraints.push(constraint!(joint >= placed + seat - 1));
    }

    // no faculty member is in two places at once: per session, the advisor
    // and examiner involvements of each faculty member sum to at most one.
    // a person advising both sides of one defense still counts once
    for e in 0..n_sessions {
        for f in 0..n_faculty {
            let mut involvement: Vec<Variable> = Vec::new();
            for s in 0..n_students {
                if problem.is_advisor(s, f) {
                    for r in 0..n_rooms {
                        if let Some(&placed) = assign.get(&(s, e, r)) {
                            involvement.push(placed);
                        }
                    }
                }
                for k in 0..EXAMINER_SLOTS {
                    for r in 0..n_rooms {
                        if let Some(&joint) = serving.get(&(s, e, r, f, k)) {
                            involvement.push(joint);
                        }
                    }
                }
            }
            if involvement.is_empty() {
                continue;
            }
            let busy: Expression = involvement.into_iter().sum();
            constraints.push(constraint!(busy <= 1));
        }
    }

    let objective: Expression = scheduled.iter().copied().sum();

    let variable_count =
        assign.len() + examiner.len() + scheduled.len() + serving_candidates.len();

    EncodedModel {
        pool,
        decisions: DecisionVars {
            assign,
            examiner,
            scheduled,
        },
        constraints,
        objective,
        variable_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FacultyAvailability, FacultyMember, ScheduleRequest, Student};

    fn request() -> ScheduleRequest {
        let faculty = |name: &str, expertise: &[&str]| FacultyMember {
            name: name.to_string(),
            expertise: expertise.iter().map(|s| s.to_string()).collect(),
        };
        let free_at = |name: &str, labels: &[&str]| FacultyAvailability {
            name: name.to_string(),
            available: labels.iter().map(|s| s.to_string()).collect(),
        };
        ScheduleRequest {
            students: vec![Student {
                name: "Ana".to_string(),
                title: "Mesh routing".to_string(),
                field: "networks".to_string(),
                advisor1: "Dr. Klein".to_string(),
                advisor2: "Dr. Osei".to_string(),
            }],
            faculty: vec![
                faculty("Dr. Klein", &["networks"]),
                faculty("Dr. Osei", &["security"]),
                faculty("Dr. Vidal", &["networks"]),
                faculty("Dr. Mora", &["networks"]),
            ],
            availability: vec![
                free_at(
                    "Dr. Klein",
                    &["Monday 08:00-10:00", "Monday 10:00-12:00"],
                ),
                free_at("Dr. Osei", &["Monday 08:00-10:00"]),
                free_at("Dr. Vidal", &["Monday 08:00-10:00"]),
                // Dr. Mora has no availability record
            ],
            rooms: vec!["Room A".to_string()],
            days: vec!["Monday".to_string()],
            time_slots: vec!["08:00-10:00".to_string(), "10:00-12:00".to_string()],
            max_time_seconds: 10,
        }
    }

    fn problem() -> DefenseProblem {
        DefenseProblem::build(request()).unwrap()
    }

    #[test]
    fn assignment_variables_respect_advisor_availability() {
        let encoded = encode(&problem());
        // Dr. Osei is free only Monday morning, so of the 2 sessions x 1
        // room only one assignment variable survives.
        assert_eq!(encoded.decisions.assign.len(), 1);
        assert!(encoded.decisions.assign.contains_key(&(0, 0, 0)));
    }

    #[test]
    fn examiner_variables_exist_only_for_eligible_faculty() {
        let encoded = encode(&problem());
        // networks experts: Dr. Klein (0), Dr. Vidal (2), Dr. Mora (3),
        // two seats each.
        assert_eq!(encoded.decisions.examiner.len(), 6);
        for k in 0..EXAMINER_SLOTS {
            assert!(encoded.decisions.examiner.contains_key(&(0, 0, k)));
            assert!(
                !encoded.decisions.examiner.contains_key(&(0, 1, k)),
                "Dr. Osei is a security expert, not eligible for networks"
            );
        }
    }

    #[test]
    fn model_size_on_fixed_instance() {
        let encoded = encode(&problem());
        // 1 assign + 6 examiner + 1 scheduled + 6 conjunction helpers
        assert_eq!(encoded.variable_count, 14);
        // placement link 1, room occupancy 1, seat sums 2, advisor
        // exclusion 2 (Dr. Klein is eligible), seat distinctness 3,
        // examiner availability 2 (Dr. Mora, 2 seats, 1 placement),
        // conjunction ties 18, per-session faculty load 4
        assert_eq!(encoded.constraints.len(), 33);
    }

    #[test]
    fn unplaceable_student_still_gets_indicator_row() {
        let mut req = request();
        // no session has both advisors: Dr. Osei free only in a slot that
        // does not exist
        req.availability[1] = FacultyAvailability {
            name: "Dr. Osei".to_string(),
            available: vec![],
        };
        let encoded = encode(&DefenseProblem::build(req).unwrap());
        assert!(encoded.decisions.assign.is_empty());
        assert_eq!(encoded.decisions.scheduled.len(), 1);
        // placement link still emitted, pinning the indicator to zero
        assert!(!encoded.constraints.is_empty());
    }
}
