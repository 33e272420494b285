use crate::data::{Classroom, Course};

/// Picks the smallest classroom that seats every student of `course`.
///
/// Ties on capacity keep input order. `None` means no room is large enough,
/// which callers record as a capacity warning rather than an error.
pub fn pick_room<'a>(course: &Course, rooms: &'a [Classroom]) -> Option<&'a Classroom> {
    // min_by_key returns the first minimum, so equal capacities resolve by input order
    rooms
        .iter()
        .filter(|room| room.capacity >= course.students)
        .min_by_key(|room| room.capacity)
}
