//! The fixed weekly slot grid.
//!
//! Five teaching days by eight start times. Two Friday afternoon cells form a
//! recurring exam block and never accept a placement.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data::Placement;

pub const DAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];
pub const TIMES: [&str; 8] = [
    "09:20", "10:20", "11:20", "12:20", "13:20", "14:20", "15:20", "16:20",
];

pub const DAY_COUNT: usize = DAYS.len();
pub const TIME_COUNT: usize = TIMES.len();

/// Friday 13:20 and Friday 14:20.
pub const BLOCKED: [SlotKey; 2] = [SlotKey { day: 4, time: 4 }, SlotKey { day: 4, time: 5 }];

/// A `(day, time)` cell of the grid, both zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct SlotKey {
    pub day: usize,
    pub time: usize,
}

impl SlotKey {
    pub const fn new(day: usize, time: usize) -> Self {
        Self { day, time }
    }

    pub fn in_bounds(&self) -> bool {
        self.day < DAY_COUNT && self.time < TIME_COUNT
    }

    pub fn is_blocked(&self) -> bool {
        BLOCKED.contains(self)
    }

    pub fn day_name(&self) -> &'static str {
        DAYS[self.day]
    }

    pub fn time_label(&self) -> &'static str {
        TIMES[self.time]
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day_name(), self.time_label())
    }
}

/// Every open slot in placement order: time-major, day-minor, blocked cells
/// skipped. Monday 09:20, Tuesday 09:20, ..., Friday 09:20, Monday 10:20, ...
pub fn scan_order() -> impl Iterator<Item = SlotKey> {
    (0..TIME_COUNT)
        .flat_map(|time| (0..DAY_COUNT).map(move |day| SlotKey::new(day, time)))
        .filter(|key| !key.is_blocked())
}

pub fn open_slot_count() -> usize {
    DAY_COUNT * TIME_COUNT - BLOCKED.len()
}

/// Serialized form of one occupied cell.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotEntry {
    pub slot: SlotKey,
    #[serde(default)]
    pub label: String,
    pub placement: Placement,
}

/// Array-backed mapping from slot to at most one placement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(into = "Vec<SlotEntry>", try_from = "Vec<SlotEntry>")]
pub struct Schedule {
    cells: [[Option<Placement>; TIME_COUNT]; DAY_COUNT],
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: SlotKey) -> Option<&Placement> {
        if !key.in_bounds() {
            return None;
        }
        self.cells[key.day][key.time].as_ref()
    }

    pub fn is_free(&self, key: SlotKey) -> bool {
        key.in_bounds() && !key.is_blocked() && self.cells[key.day][key.time].is_none()
    }

    /// Binds `placement` to `key`. Returns `false` without touching the grid
    /// when the cell is blocked, out of range, or already taken.
    pub fn place(&mut self, key: SlotKey, placement: Placement) -> bool {
        if !self.is_free(key) {
            return false;
        }
        self.cells[key.day][key.time] = Some(placement);
        true
    }

    /// Occupied cells in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotKey, &Placement)> + '_ {
        scan_order().filter_map(move |key| self.get(key).map(|p| (key, p)))
    }

    pub fn slot_of(&self, course_code: &str) -> Option<SlotKey> {
        self.iter()
            .find(|(_, p)| p.course_code == course_code)
            .map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Schedule> for Vec<SlotEntry> {
    fn from(schedule: Schedule) -> Self {
        schedule
            .iter()
            .map(|(slot, placement)| SlotEntry {
                slot,
                label: slot.to_string(),
                placement: placement.clone(),
            })
            .collect()
    }
}

impl TryFrom<Vec<SlotEntry>> for Schedule {
    type Error = String;

    fn try_from(entries: Vec<SlotEntry>) -> Result<Self, Self::Error> {
        let mut schedule = Schedule::new();
        for entry in entries {
            let slot = entry.slot;
            if !slot.in_bounds() {
                return Err(format!("slot ({}, {}) is outside the grid", slot.day, slot.time));
            }
            if slot.is_blocked() {
                return Err(format!("slot {} is in the exam block", slot));
            }
            if !schedule.place(slot, entry.placement) {
                return Err(format!("slot {} holds more than one placement", slot));
            }
        }
        Ok(schedule)
    }
}
