//! Greedy timetable allocation.
//!
//! Courses are taken in ascending code order and each one lands in the first
//! free cell of the scan order (see [`grid::scan_order`]). A placement is never
//! revisited. Occupied cells passed on the way are checked for instructor and
//! room overlaps, which are reported but never resolved.

use itertools::Itertools;
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::data::{Classroom, Course, Diagnostic, DiagnosticKind, Placement, ScheduleInput, ScheduleResult};
use crate::error::{SchedulerError, SchedulerResult};
use crate::grid::{self, Schedule, SlotKey};
use crate::rooms::pick_room;
use crate::solver;

/// Allocation backend behind [`allocate_input`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Single deterministic first-fit pass.
    #[default]
    Greedy,
    /// Integer program over the same grid, solved with HiGHS.
    Ilp,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Greedy => f.write_str("greedy"),
            Self::Ilp => f.write_str("ilp"),
        }
    }
}

impl FromStr for Strategy {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(Self::Greedy),
            "ilp" => Ok(Self::Ilp),
            other => Err(SchedulerError::invalid_config(
                "strategy",
                format!("unknown strategy '{}', expected 'greedy' or 'ilp'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocateOptions {
    pub strategy: Strategy,
    /// Only allocate courses of this class year.
    pub year_filter: Option<u32>,
}

/// Allocates `courses` to the weekly grid with the greedy strategy.
pub fn allocate(courses: &[Course], rooms: &[Classroom]) -> SchedulerResult<ScheduleResult> {
    validate(courses, rooms)?;
    Ok(allocate_greedy(courses, rooms))
}

/// Full entry point for a loaded input bundle: validation, year filter,
/// instructor cross-check and strategy dispatch.
pub fn allocate_input(input: &ScheduleInput, options: AllocateOptions) -> SchedulerResult<ScheduleResult> {
    validate(&input.courses, &input.rooms)?;

    let courses: Vec<Course> = match options.year_filter {
        Some(year) => input
            .courses
            .iter()
            .filter(|c| c.year == Some(year))
            .cloned()
            .collect(),
        None => input.courses.clone(),
    };

    if !input.instructors.is_empty() {
        let known: HashSet<&str> = input.instructors.iter().map(|i| i.id.as_str()).collect();
        for course in &courses {
            if !course.instructor_id.is_empty() && !known.contains(course.instructor_id.as_str()) {
                warn!(
                    "Course {} references unknown instructor '{}'",
                    course.code, course.instructor_id
                );
            }
        }
    }

    match options.strategy {
        Strategy::Greedy => Ok(allocate_greedy(&courses, &input.rooms)),
        Strategy::Ilp => solver::solve(&courses, &input.rooms),
    }
}

/// Rejects records the allocator cannot reason about.
pub fn validate(courses: &[Course], rooms: &[Classroom]) -> SchedulerResult<()> {
    if courses.iter().any(|c| c.code.trim().is_empty()) {
        return Err(SchedulerError::invalid_input("course code must not be empty"));
    }
    if let Some(code) = courses.iter().map(|c| c.code.as_str()).duplicates().next() {
        return Err(SchedulerError::invalid_input(format!(
            "course code '{}' appears more than once",
            code
        )));
    }
    if rooms.iter().any(|r| r.id.trim().is_empty()) {
        return Err(SchedulerError::invalid_input("classroom id must not be empty"));
    }
    if let Some(id) = rooms.iter().map(|r| r.id.as_str()).duplicates().next() {
        return Err(SchedulerError::invalid_input(format!(
            "classroom id '{}' appears more than once",
            id
        )));
    }
    Ok(())
}

fn allocate_greedy(courses: &[Course], rooms: &[Classroom]) -> ScheduleResult {
    let start_time = Instant::now();
    info!(
        "Allocating {} courses over {} rooms and {} open slots...",
        courses.len(),
        rooms.len(),
        grid::open_slot_count()
    );

    let mut schedule = Schedule::new();
    let mut diagnostics = Vec::new();

    for course in sorted_by_code(courses) {
        let Some(room) = pick_room(course, rooms) else {
            warn!("No room fits {} ({} students)", course.code, course.students);
            diagnostics.push(capacity_warning(course));
            continue;
        };

        let mut placed = false;
        for key in grid::scan_order() {
            if let Some(occupant) = schedule.get(key) {
                trace!("{} is taken by {}", key, occupant.course_code);
                diagnostics.extend(overlaps(key, occupant, course, room));
                continue;
            }
            if schedule.place(key, placement_for(course, room)) {
                debug!("Placed {} at {} in room {}", course.code, key, room.id);
                placed = true;
                break;
            }
        }

        if !placed {
            warn!("Could not place {}: every open slot is taken", course.code);
            diagnostics.push(unscheduled_warning(course));
        }
    }

    let result = ScheduleResult::new(schedule, diagnostics);
    info!(
        "Allocation finished in {:.2?}: {} placed, {} conflicts, {} warnings",
        start_time.elapsed(),
        result.scheduled_courses(),
        result.conflict_count,
        result.warning_count
    );
    result
}

/// Courses in ascending code order. Codes are unique after validation, so
/// the order is total.
pub(crate) fn sorted_by_code(courses: &[Course]) -> Vec<&Course> {
    courses.iter().sorted_by(|a, b| a.code.cmp(&b.code)).collect()
}

pub(crate) fn placement_for(course: &Course, room: &Classroom) -> Placement {
    Placement {
        course_code: course.code.clone(),
        instructor_id: course.instructor_id.clone(),
        room_id: room.id.clone(),
    }
}

fn overlaps(key: SlotKey, occupant: &Placement, course: &Course, room: &Classroom) -> Vec<Diagnostic> {
    let mut found = Vec::new();

    // an empty instructor id is "unassigned", not a shared identity
    if !course.instructor_id.is_empty() && occupant.instructor_id == course.instructor_id {
        found.push(Diagnostic {
            kind: DiagnosticKind::InstructorOverlap,
            message: format!(
                "CONFLICT: Instructor overlap at {} ({} vs {}) instructor={}",
                key, occupant.course_code, course.code, course.instructor_id
            ),
        });
    }
    if occupant.room_id == room.id {
        found.push(Diagnostic {
            kind: DiagnosticKind::RoomOverlap,
            message: format!(
                "CONFLICT: Room overlap at {} room={} ({} vs {})",
                key, room.id, occupant.course_code, course.code
            ),
        });
    }
    found
}

pub(crate) fn capacity_warning(course: &Course) -> Diagnostic {
    Diagnostic {
        kind: DiagnosticKind::Capacity,
        message: format!(
            "WARNING: Capacity - No room fits {} ({} students).",
            course.code, course.students
        ),
    }
}

pub(crate) fn unscheduled_warning(course: &Course) -> Diagnostic {
    Diagnostic {
        kind: DiagnosticKind::Unscheduled,
        message: format!(
            "WARNING: Unscheduled - Could not place {} (no available slot).",
            course.code
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Instructor, NO_ISSUES_LINE};

    #[test]
    fn test_first_course_lands_monday_morning() {
        let result = allocate(&[Course::new("CENG101", "i1", 30)], &[Classroom::new("r1", 40)]).unwrap();
        assert_eq!(result.schedule.slot_of("CENG101"), Some(SlotKey::new(0, 0)));
        assert_eq!(result.report, vec![NO_ISSUES_LINE.to_string()]);
    }

    #[test]
    fn test_courses_processed_in_code_order() {
        let courses = vec![
            Course::new("C", "i3", 10),
            Course::new("A", "i1", 10),
            Course::new("B", "i2", 10),
        ];
        let rooms = vec![Classroom::new("r1", 10), Classroom::new("r2", 20), Classroom::new("r3", 30)];
        let result = allocate(&courses, &rooms).unwrap();
        assert_eq!(result.schedule.slot_of("A"), Some(SlotKey::new(0, 0)));
        assert_eq!(result.schedule.slot_of("B"), Some(SlotKey::new(1, 0)));
        assert_eq!(result.schedule.slot_of("C"), Some(SlotKey::new(2, 0)));
    }

    #[test]
    fn test_shared_room_reports_room_overlap() {
        let courses = vec![Course::new("A", "i1", 10), Course::new("B", "i2", 10)];
        let rooms = vec![Classroom::new("r1", 20)];
        let result = allocate(&courses, &rooms).unwrap();
        assert_eq!(result.conflict_count, 1);
        assert_eq!(
            result.report,
            vec!["CONFLICT: Room overlap at Monday 09:20 room=r1 (A vs B)".to_string()]
        );
        assert_eq!(result.schedule.slot_of("B"), Some(SlotKey::new(1, 0)));
    }

    #[test]
    fn test_shared_instructor_and_room_reports_both() {
        let courses = vec![Course::new("A", "i1", 10), Course::new("B", "i1", 10)];
        let rooms = vec![Classroom::new("r1", 20)];
        let result = allocate(&courses, &rooms).unwrap();
        assert_eq!(result.conflict_count, 2);
        assert_eq!(
            result.report[0],
            "CONFLICT: Instructor overlap at Monday 09:20 (A vs B) instructor=i1"
        );
    }

    #[test]
    fn test_conflicts_accumulate_over_every_occupied_slot() {
        let courses = vec![
            Course::new("A", "i1", 10),
            Course::new("B", "i1", 20),
            Course::new("C", "i1", 30),
        ];
        let rooms = vec![Classroom::new("r10", 10), Classroom::new("r20", 20), Classroom::new("r30", 30)];
        let result = allocate(&courses, &rooms).unwrap();
        // B passes A, C passes A and B
        assert_eq!(result.conflict_count, 3);
        assert_eq!(result.warning_count, 0);
        assert_eq!(result.schedule.len(), 3);
    }

    #[test]
    fn test_empty_instructor_ids_never_overlap() {
        let courses = vec![Course::new("A", "", 10), Course::new("B", "", 20)];
        let rooms = vec![Classroom::new("r10", 10), Classroom::new("r20", 20)];
        let result = allocate(&courses, &rooms).unwrap();
        assert_eq!(result.conflict_count, 0);
    }

    #[test]
    fn test_capacity_warning_skips_course() {
        let courses = vec![Course::new("BIG", "i1", 500)];
        let result = allocate(&courses, &[Classroom::new("r1", 100)]).unwrap();
        assert!(result.schedule.is_empty());
        assert_eq!(result.warning_count, 1);
        assert_eq!(
            result.report,
            vec!["WARNING: Capacity - No room fits BIG (500 students).".to_string()]
        );
    }

    #[test]
    fn test_rejects_empty_code() {
        let err = allocate(&[Course::new("  ", "i1", 10)], &[]).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidInput { .. }));
    }

    #[test]
    fn test_rejects_duplicate_codes_and_rooms() {
        let courses = vec![Course::new("A", "i1", 10), Course::new("A", "i2", 10)];
        assert!(allocate(&courses, &[]).is_err());

        let rooms = vec![Classroom::new("r1", 10), Classroom::new("r1", 20)];
        let err = allocate(&[Course::new("A", "i1", 10)], &rooms).unwrap_err();
        assert!(err.to_string().contains("r1"));
    }

    #[test]
    fn test_year_filter_limits_courses() {
        let mut first = Course::new("A", "i1", 10);
        first.year = Some(1);
        let mut second = Course::new("B", "i2", 10);
        second.year = Some(2);
        let input = ScheduleInput {
            courses: vec![first, second],
            rooms: vec![Classroom::new("r1", 10), Classroom::new("r2", 10)],
            instructors: vec![Instructor {
                id: "i1".to_string(),
                name: "Ada".to_string(),
            }],
        };
        let options = AllocateOptions {
            strategy: Strategy::Greedy,
            year_filter: Some(2),
        };
        let result = allocate_input(&input, options).unwrap();
        assert_eq!(result.schedule.len(), 1);
        assert!(result.schedule.slot_of("B").is_some());
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("greedy".parse::<Strategy>().unwrap(), Strategy::Greedy);
        assert_eq!(" ILP ".parse::<Strategy>().unwrap(), Strategy::Ilp);
        assert!("annealing".parse::<Strategy>().is_err());
        assert_eq!(Strategy::Ilp.to_string(), "ilp");
    }
}
