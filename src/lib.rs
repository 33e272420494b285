//! Weekly university timetable allocation.
//!
//! Courses are bound to `(day, time)` cells of a fixed five-day grid and to
//! the tightest classroom that seats them. [`allocate`] runs the greedy
//! first-fit pass; [`build_summary`] turns its result into a compliance
//! report.

pub mod allocator;
pub mod config;
pub mod data;
pub mod error;
pub mod grid;
pub mod report;
pub mod rooms;
pub mod server;
pub mod solver;

pub use allocator::{AllocateOptions, Strategy, allocate, allocate_input};
pub use data::{Classroom, Course, Instructor, Placement, ScheduleInput, ScheduleResult};
pub use error::{SchedulerError, SchedulerResult};
pub use report::{Summary, build_summary};
pub use rooms::pick_room;
