use serde::{Deserialize, Serialize};
use std::fmt;

use crate::grid::Schedule;

// Type aliases for clarity
pub type RoomId = String;
pub type CourseCode = String;
pub type InstructorId = String;

/// Represents a physical classroom with a given seating capacity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Classroom {
    pub id: RoomId,
    #[serde(default)]
    pub name: String,
    pub capacity: u32,
}

/// Represents a course to be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub code: CourseCode,
    #[serde(default)]
    pub instructor_id: InstructorId,
    pub students: u32,
    #[serde(default)]
    pub is_lab: bool,
    /// Class year, only consulted when a year filter is requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
}

impl Course {
    pub fn new(code: impl Into<String>, instructor_id: impl Into<String>, students: u32) -> Self {
        Self {
            code: code.into(),
            instructor_id: instructor_id.into(),
            students,
            is_lab: false,
            year: None,
        }
    }
}

impl Classroom {
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            capacity,
        }
    }
}

/// Represents an instructor. Courses refer to instructors by id only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Instructor {
    pub id: InstructorId,
    #[serde(default)]
    pub name: String,
}

/// The complete, already-normalized input for one allocation run.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInput {
    pub courses: Vec<Course>,
    pub rooms: Vec<Classroom>,
    #[serde(default)]
    pub instructors: Vec<Instructor>,
}

/// A course bound to one slot of the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub course_code: CourseCode,
    pub instructor_id: InstructorId,
    pub room_id: RoomId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    InstructorOverlap,
    RoomOverlap,
    Capacity,
    Unscheduled,
}

impl DiagnosticKind {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::InstructorOverlap | Self::RoomOverlap)
    }

    pub fn is_warning(&self) -> bool {
        !self.is_conflict()
    }
}

/// One conflict or warning observed during allocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub const NO_ISSUES_LINE: &str = "No conflicts or warnings found.";

/// The output of one allocation run. Read-only once returned.
///
/// Deserializing rebuilds counts and report lines from `diagnostics`, so a
/// submitted result can never carry counts that disagree with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", from = "RawScheduleResult")]
pub struct ScheduleResult {
    pub schedule: Schedule,
    pub diagnostics: Vec<Diagnostic>,
    /// Diagnostic messages in emission order, or a single
    /// [`NO_ISSUES_LINE`] when nothing was reported.
    pub report: Vec<String>,
    pub conflict_count: usize,
    pub warning_count: usize,
}

/// Wire form of a submitted [`ScheduleResult`]; derived fields are ignored.
#[derive(Deserialize)]
struct RawScheduleResult {
    #[serde(default)]
    schedule: Schedule,
    #[serde(default)]
    diagnostics: Vec<Diagnostic>,
}

impl From<RawScheduleResult> for ScheduleResult {
    fn from(raw: RawScheduleResult) -> Self {
        Self::new(raw.schedule, raw.diagnostics)
    }
}

impl ScheduleResult {
    /// Builds the result from a finished schedule and its diagnostics,
    /// deriving counts and the report lines.
    pub fn new(schedule: Schedule, diagnostics: Vec<Diagnostic>) -> Self {
        let conflict_count = diagnostics.iter().filter(|d| d.kind.is_conflict()).count();
        let warning_count = diagnostics.len() - conflict_count;
        let report = if diagnostics.is_empty() {
            vec![NO_ISSUES_LINE.to_string()]
        } else {
            diagnostics.iter().map(|d| d.message.clone()).collect()
        };

        Self {
            schedule,
            diagnostics,
            report,
            conflict_count,
            warning_count,
        }
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.kind.is_conflict())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.kind.is_warning())
    }

    pub fn scheduled_courses(&self) -> usize {
        self.schedule.len()
    }
}
