use good_lp::variable;
use good_lp::{
    Expression, ProblemVariables, Solution, SolverModel, Variable, constraint, default_solver,
};
use log::{info, trace, warn};
use std::time::Instant;

use crate::allocator::{capacity_warning, placement_for, sorted_by_code, unscheduled_warning};
use crate::data::{Classroom, Course, ScheduleResult};
use crate::error::{SchedulerError, SchedulerResult};
use crate::grid::{self, Schedule, SlotKey};
use crate::rooms::pick_room;

/// Allocates courses with the HiGHS ILP solver.
///
/// Rooms come from the same tightest-fit selector as the greedy pass, so
/// capacity warnings are identical. The model then places as many roomed
/// courses as possible, one per open slot, preferring earlier courses in
/// earlier slots of the scan order. Each slot holds one course, so no overlap
/// conflicts can arise.
pub fn solve(courses: &[Course], rooms: &[Classroom]) -> SchedulerResult<ScheduleResult> {
    let start_time = Instant::now();
    let ordered = sorted_by_code(courses);
    let slots: Vec<SlotKey> = grid::scan_order().collect();

    let choices: Vec<(&Course, Option<&Classroom>)> = ordered
        .iter()
        .map(|course| (*course, pick_room(course, rooms)))
        .collect();
    let roomed: Vec<(usize, &Course, &Classroom)> = choices
        .iter()
        .enumerate()
        .filter_map(|(i, (course, room))| room.map(|r| (i, *course, r)))
        .collect();

    //model setup
    info!(
        "Setting up ILP model with {} roomed courses and {} open slots...",
        roomed.len(),
        slots.len()
    );
    let mut placed_at: Vec<Option<SlotKey>> = vec![None; choices.len()];

    if !roomed.is_empty() {
        let mut problem = ProblemVariables::new();
        // x_cs = 1 if roomed course c sits in open slot s
        let x: Vec<Variable> = problem.add_vector(variable().binary(), roomed.len() * slots.len());
        let var = |c: usize, s: usize| x[c * slots.len() + s];
        trace!("Generated {} assignment variables.", x.len());

        // weight R*S + (R - c)(S - s): every placement outweighs any preference
        // difference, and the rank product makes the in-order pairing (course c
        // in slot c) the unique optimum
        let (course_count, slot_count) = (roomed.len() as f64, slots.len() as f64);
        let objective: Expression = (0..roomed.len())
            .flat_map(|c| (0..slots.len()).map(move |s| (c, s)))
            .map(|(c, s)| {
                let preference = (course_count - c as f64) * (slot_count - s as f64);
                (course_count * slot_count + preference) * var(c, s)
            })
            .sum();

        let mut model = problem
            .maximise(objective)
            .using(default_solver)
            .set_option("threads", 1) // limit to 1 thread for reproducibility
            .set_option("random_seed", 1234)
            .set_option("mip_rel_gap", 0.0)
            .set_option("log_to_console", "false");

        // a course sits in at most one slot
        for c in 0..roomed.len() {
            let placed: Expression = (0..slots.len()).map(|s| var(c, s)).sum();
            model.add_constraint(constraint!(placed <= 1));
        }

        // a slot holds at most one course
        for s in 0..slots.len() {
            let occupied: Expression = (0..roomed.len()).map(|c| var(c, s)).sum();
            model.add_constraint(constraint!(occupied <= 1));
        }

        info!("Starting ILP solver...");
        let solution = model
            .solve()
            .map_err(|e| SchedulerError::solver_failed(e.to_string()))?;

        for (c, (index, _, _)) in roomed.iter().enumerate() {
            placed_at[*index] = (0..slots.len())
                .find(|&s| solution.value(var(c, s)) > 0.9)
                .map(|s| slots[s]);
        }
    }

    let result = assemble(&choices, placed_at);
    info!(
        "Solution found in {:.2?}: {} placed, {} warnings",
        start_time.elapsed(),
        result.scheduled_courses(),
        result.warning_count
    );
    Ok(result)
}

/// Turns per-course room choices and solved slots into a result, with
/// diagnostics in course order to match the greedy pass.
fn assemble(
    choices: &[(&Course, Option<&Classroom>)],
    placed_at: Vec<Option<SlotKey>>,
) -> ScheduleResult {
    let mut schedule = Schedule::new();
    let mut diagnostics = Vec::new();
    for ((course, room), slot) in choices.iter().zip(placed_at) {
        match (room, slot) {
            (None, _) => {
                warn!("No room fits {} ({} students)", course.code, course.students);
                diagnostics.push(capacity_warning(course));
            }
            (Some(room), Some(key)) if schedule.place(key, placement_for(course, room)) => {}
            (Some(_), _) => {
                warn!("Could not place {}: every open slot is taken", course.code);
                diagnostics.push(unscheduled_warning(course));
            }
        }
    }
    ScheduleResult::new(schedule, diagnostics)
}
