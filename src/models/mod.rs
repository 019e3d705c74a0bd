//! Timetabling domain models.
//!
//! Provides the reference data consumed by a run and the records it
//! produces. Reference data is read-only during a run; placements and
//! conflicts are created exclusively by the engine.
//!
//! # Domain Mappings
//!
//! | u-timetable | u-schedule | Meaning |
//! |-------------|------------|---------|
//! | TeachingObligation | Task | Course × teacher × cohort × term |
//! | Room, Teacher, Cohort | Resource | Entities that cannot be double-booked |
//! | Slot × week | Time window | Recurring weekly position |
//! | Timetable | Schedule | Placements + conflicts |

mod course;
mod obligation;
mod preference;
mod resource;
mod schedule;
mod slot;
mod snapshot;
mod term;

pub use course::{Course, CourseCategory};
pub use obligation::TeachingObligation;
pub use preference::{AvoidPreference, PreferenceStatus};
pub use resource::{Cohort, Room, RoomCategory, Teacher};
pub use schedule::{Conflict, ConflictKind, Placement, Timetable};
pub use slot::{Slot, Weekday};
pub use snapshot::{AvoidIndex, Snapshot};
pub use term::Term;
