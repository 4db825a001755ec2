use crate::data::{
    FacultyIdx, FacultyMember, ScheduleRequest, SessionIdx, Student, StudentIdx,
};
use crate::error::ValidationError;
use itertools::Itertools;
use log::debug;
use std::collections::{HashMap, HashSet};

/// Checks the request-level preconditions that must hold before any model
/// is built: non-empty rosters, unique faculty names, a positive budget.
///
/// Advisor references are resolved later by [`DefenseProblem::build`].
pub fn validate_request(request: &ScheduleRequest) -> Result<(), ValidationError> {
    if request.students.is_empty() {
        return Err(ValidationError::NoStudents);
    }
    if request.faculty.is_empty() {
        return Err(ValidationError::NoFaculty);
    }
    if request.rooms.is_empty() {
        return Err(ValidationError::NoRooms);
    }
    if request.max_time_seconds == 0 {
        return Err(ValidationError::NonPositiveTimeBudget);
    }

    let mut seen = HashSet::new();
    for member in &request.faculty {
        if !seen.insert(member.name.as_str()) {
            return Err(ValidationError::DuplicateFaculty(member.name.clone()));
        }
    }

    Ok(())
}

/// One scheduling instance, normalized into zero-based index spaces.
///
/// Everything downstream (encoder, engine, extractor) works on indices;
/// names and labels only reappear when the extractor emits records. Built
/// fresh per request and dropped with it, so nothing here survives a solve.
#[derive(Debug)]
pub struct DefenseProblem {
    pub students: Vec<Student>,
    pub faculty: Vec<FacultyMember>,
    pub rooms: Vec<String>,
    /// Session universe: day-major cross product of days and time slots,
    /// materialized as `"<day> <time-range>"` labels.
    pub sessions: Vec<String>,
    /// Both advisors of each student, resolved to faculty indices.
    pub advisors: Vec<(FacultyIdx, FacultyIdx)>,
    /// Per student, the ascending list of faculty eligible to examine them
    /// (expertise contains the student's field). Advisors are not excluded
    /// here; the encoder forbids them per constraint.
    pub eligible: Vec<Vec<FacultyIdx>>,
    /// Per faculty member, the set of sessions at which they are free.
    pub available: Vec<HashSet<SessionIdx>>,
}

impl DefenseProblem {
    /// Normalizes a request into an indexed problem instance.
    ///
    /// Fails if any advisor name does not resolve in the faculty roster;
    /// the encoder relies on every advisor reference being an index.
    pub fn build(request: ScheduleRequest) -> Result<Self, ValidationError> {
        let ScheduleRequest {
            students,
            faculty,
            availability,
            rooms,
            days,
            time_slots,
            ..
        } = request;

        let faculty_index: HashMap<&str, FacultyIdx> = faculty
            .iter()
            .enumerate()
            .map(|(f, member)| (member.name.as_str(), f))
            .collect();

        let sessions: Vec<String> = days
            .iter()
            .cartesian_product(time_slots.iter())
            .map(|(day, slot)| format!("{day} {slot}"))
            .collect();
        let session_index: HashMap<&str, SessionIdx> = sessions
            .iter()
            .enumerate()
            .map(|(e, label)| (label.as_str(), e))
            .collect();

        // Later records for the same name replace earlier ones. Names and
        // labels that resolve to nothing are skipped, which leaves faculty
        // without a usable record available nowhere.
        let mut available = vec![HashSet::new(); faculty.len()];
        for record in &availability {
            let Some(&f) = faculty_index.get(record.name.as_str()) else {
                debug!(
                    "ignoring availability for '{}': not in the faculty roster",
                    record.name
                );
                continue;
            };
            available[f] = record
                .available
                .iter()
                .filter_map(|label| session_index.get(label.as_str()).copied())
                .collect();
        }

        let mut advisors = Vec::with_capacity(students.len());
        for student in &students {
            let resolve = |advisor: &str| {
                faculty_index.get(advisor).copied().ok_or_else(|| {
                    ValidationError::UnknownAdvisor {
                        student: student.name.clone(),
                        advisor: advisor.to_string(),
                    }
                })
            };
            advisors.push((resolve(&student.advisor1)?, resolve(&student.advisor2)?));
        }

        // Derived per request, never cached: expertise-to-field matching is
        // the sole eligibility criterion.
        let eligible = students
            .iter()
            .map(|student| {
                faculty
                    .iter()
                    .enumerate()
                    .filter(|(_, member)| member.expertise.contains(&student.field))
                    .map(|(f, _)| f)
                    .collect()
            })
            .collect();

        Ok(Self {
            students,
            faculty,
            rooms,
            sessions,
            advisors,
            eligible,
            available,
        })
    }

    pub fn is_available(&self, f: FacultyIdx, e: SessionIdx) -> bool {
        self.available[f].contains(&e)
    }

    pub fn is_advisor(&self, s: StudentIdx, f: FacultyIdx) -> bool {
        let (a1, a2) = self.advisors[s];
        f == a1 || f == a2
    }

    pub fn advisors_available(&self, s: StudentIdx, e: SessionIdx) -> bool {
        let (a1, a2) = self.advisors[s];
        self.is_available(a1, e) && self.is_available(a2, e)
    }

    /// Static upper bound on how many students any schedule can place.
    ///
    /// A student only counts if some session has both advisors free and at
    /// least two distinct eligible non-advisor faculty free. The bound
    /// ignores cross-student contention, so it can overestimate, never
    /// underestimate.
    pub fn schedulable_bound(&self) -> usize {
        (0..self.students.len())
            .filter(|&s| {
                (0..self.sessions.len()).any(|e| {
                    self.advisors_available(s, e)
                        && self.eligible[s]
                            .iter()
                            .filter(|&&f| !self.is_advisor(s, f) && self.is_available(f, e))
                            .count()
                            >= 2
                })
            })
            .count()
    }
}
