//! Compliance summary for a finished allocation.

use serde::{Deserialize, Serialize};

use crate::data::ScheduleResult;
use crate::grid::{DAYS, SlotKey, TIMES};

/// Size of the notional rule checklist the compliance figure is measured on.
pub const RULES_TOTAL: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub critical_count: usize,
    pub warning_count: usize,
    pub rules_passed: usize,
    pub rules_total: usize,
    pub compliance_percent: u32,
    pub scheduled_courses: usize,
    pub compliance_lines: Vec<String>,
}

/// Summarizes `result`. Every conflict costs one rule; the figure is a coarse
/// proxy, not a per-rule check.
pub fn build_summary(result: &ScheduleResult) -> Summary {
    let rules_passed = RULES_TOTAL.saturating_sub(result.conflict_count);
    let compliance_percent = (rules_passed as f64 / RULES_TOTAL as f64 * 100.0).round() as u32;
    let scheduled_courses = result.scheduled_courses();

    let mut lines = vec!["CRITICAL ISSUES:".to_string()];
    push_section(&mut lines, result.conflicts().map(|d| d.message.clone()).collect());
    lines.push(String::new());
    lines.push("WARNINGS:".to_string());
    push_section(&mut lines, result.warnings().map(|d| d.message.clone()).collect());
    lines.push(String::new());
    lines.push("SUMMARY:".to_string());
    lines.push(format!("Scheduled Courses: {}", scheduled_courses));
    lines.push(format!("Rules Passed: {}/{}", rules_passed, RULES_TOTAL));
    lines.push(format!("Compliance: {}%", compliance_percent));

    Summary {
        critical_count: result.conflict_count,
        warning_count: result.warning_count,
        rules_passed,
        rules_total: RULES_TOTAL,
        compliance_percent,
        scheduled_courses,
        compliance_lines: lines,
    }
}

fn push_section(lines: &mut Vec<String>, items: Vec<String>) {
    if items.is_empty() {
        lines.push("None".to_string());
    } else {
        lines.extend(items);
    }
}

/// Renders the placement grid one time row per line, e.g.
/// `09:20: Monday=CENG101@r1 | Tuesday=- | ...`.
pub fn render_grid(result: &ScheduleResult) -> Vec<String> {
    (0..TIMES.len())
        .map(|time| {
            let cells: Vec<String> = (0..DAYS.len())
                .map(|day| {
                    let key = SlotKey::new(day, time);
                    let cell = match result.schedule.get(key) {
                        Some(p) => format!("{}@{}", p.course_code, p.room_id),
                        None if key.is_blocked() => "EXAM".to_string(),
                        None => "-".to_string(),
                    };
                    format!("{}={}", DAYS[day], cell)
                })
                .collect();
            format!("{}: {}", TIMES[time], cells.join(" | "))
        })
        .collect()
}

/// Full plain-text report: titled grid, blank line, then the summary lines.
pub fn render_text(title: &str, result: &ScheduleResult, summary: &Summary) -> Vec<String> {
    let mut lines = vec![format!("=== {} ===", title)];
    lines.extend(render_grid(result));
    lines.push(String::new());
    lines.extend(summary.compliance_lines.iter().cloned());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Diagnostic, DiagnosticKind, Placement};
    use crate::grid::Schedule;

    fn conflict(message: &str) -> Diagnostic {
        Diagnostic {
            kind: DiagnosticKind::RoomOverlap,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_clean_result_is_fully_compliant() {
        let summary = build_summary(&ScheduleResult::new(Schedule::new(), Vec::new()));
        assert_eq!(summary.rules_passed, 6);
        assert_eq!(summary.compliance_percent, 100);
        assert_eq!(summary.compliance_lines[0], "CRITICAL ISSUES:");
        assert_eq!(summary.compliance_lines[1], "None");
        assert!(summary.compliance_lines.contains(&"Rules Passed: 6/6".to_string()));
    }

    #[test]
    fn test_compliance_rounds_to_nearest() {
        let diagnostics = vec![conflict("c1"), conflict("c2")];
        let summary = build_summary(&ScheduleResult::new(Schedule::new(), diagnostics));
        assert_eq!(summary.critical_count, 2);
        assert_eq!(summary.rules_passed, 4);
        // 4 / 6 = 66.67
        assert_eq!(summary.compliance_percent, 67);
    }

    #[test]
    fn test_rules_passed_floors_at_zero() {
        let diagnostics = (0..9).map(|i| conflict(&format!("c{}", i))).collect();
        let summary = build_summary(&ScheduleResult::new(Schedule::new(), diagnostics));
        assert_eq!(summary.rules_passed, 0);
        assert_eq!(summary.compliance_percent, 0);
    }

    #[test]
    fn test_sections_split_conflicts_and_warnings() {
        let diagnostics = vec![
            Diagnostic {
                kind: DiagnosticKind::Unscheduled,
                message: "w1".to_string(),
            },
            conflict("c1"),
        ];
        let summary = build_summary(&ScheduleResult::new(Schedule::new(), diagnostics));
        let lines = &summary.compliance_lines;
        let warnings_at = lines.iter().position(|l| l == "WARNINGS:").unwrap();
        assert_eq!(lines[1], "c1");
        assert_eq!(lines[warnings_at + 1], "w1");
    }

    #[test]
    fn test_render_grid_marks_exam_block() {
        let mut schedule = Schedule::new();
        schedule.place(
            SlotKey::new(0, 0),
            Placement {
                course_code: "CENG101".to_string(),
                instructor_id: "i1".to_string(),
                room_id: "r1".to_string(),
            },
        );
        let rows = render_grid(&ScheduleResult::new(schedule, Vec::new()));
        assert_eq!(rows.len(), 8);
        assert!(rows[0].starts_with("09:20: Monday=CENG101@r1 | Tuesday=-"));
        assert!(rows[4].ends_with("Friday=EXAM"));
    }

    #[test]
    fn test_render_text_puts_grid_before_summary() {
        let diagnostics = vec![Diagnostic {
            kind: DiagnosticKind::Capacity,
            message: "WARNING: Capacity - No room fits BIG (500 students).".to_string(),
        }];
        let result = ScheduleResult::new(Schedule::new(), diagnostics);
        let summary = build_summary(&result);
        let lines = render_text("Timetable (greedy)", &result, &summary);

        assert_eq!(lines[0], "=== Timetable (greedy) ===");
        assert!(lines[1].starts_with("09:20: Monday=-"));
        assert_eq!(lines[9], "");
        assert_eq!(lines[10], "CRITICAL ISSUES:");
        assert!(lines.contains(&"WARNING: Capacity - No room fits BIG (500 students).".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("Compliance: 100%"));
    }
}
