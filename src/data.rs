use serde::{Deserialize, Serialize};

// Internal zero-based index spaces, derived per request by the domain builder
pub type StudentIdx = usize;
pub type FacultyIdx = usize;
pub type SessionIdx = usize;
pub type RoomIdx = usize;

/// A student awaiting a defense slot.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub name: String,
    pub title: String,
    /// Research-field tag of the thesis; examiners must cover it.
    pub field: String,
    pub advisor1: String,
    pub advisor2: String,
}

/// A faculty member and the research fields they can examine.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyMember {
    pub name: String,
    pub expertise: Vec<String>,
}

/// Sessions at which one faculty member is free.
///
/// Faculty without a record are available nowhere. Labels must match the
/// `"<day> <time-range>"` session universe; anything else is ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyAvailability {
    pub name: String,
    pub available: Vec<String>,
}

/// The complete input for one scheduling request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub students: Vec<Student>,
    pub faculty: Vec<FacultyMember>,
    #[serde(default)]
    pub availability: Vec<FacultyAvailability>,
    #[serde(default = "default_rooms")]
    pub rooms: Vec<String>,
    #[serde(default = "default_days")]
    pub days: Vec<String>,
    #[serde(default = "default_time_slots")]
    pub time_slots: Vec<String>,
    /// Wall-clock ceiling for the solver, in seconds.
    #[serde(default = "default_max_time_seconds")]
    pub max_time_seconds: u64,
}

fn default_rooms() -> Vec<String> {
    vec!["Room A".to_string(), "Room B".to_string()]
}

fn default_days() -> Vec<String> {
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_time_slots() -> Vec<String> {
    ["08:00-10:00", "10:00-12:00", "13:00-15:00", "15:00-17:00"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_max_time_seconds() -> u64 {
    60
}

/// One scheduled defense: the student's own fields plus the resolved
/// session, room, and examiner pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledDefense {
    pub student: String,
    pub title: String,
    pub field: String,
    pub advisor1: String,
    pub advisor2: String,
    pub examiner1: String,
    pub examiner2: String,
    pub session: String,
    pub room: String,
}

/// Caller-visible outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Infeasible,
}

/// The final output of a scheduling request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub total_students: usize,
    pub scheduled_students: usize,
    pub schedule: Vec<ScheduledDefense>,
}
