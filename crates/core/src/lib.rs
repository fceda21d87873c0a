pub mod credentials;
pub mod metrics;
pub mod notify;
pub mod store;
pub mod validate;
pub mod writer;

use rand::RngCore;
use thiserror::Error;

pub use store::{DomainStore, EntryFilter, StoreError, StoreResult};
pub use types::{
    Classroom, Constraint, CourseKey, Day, Preference, PreferenceKind, ScheduleEntry, Subject,
    Teacher, TimeSlot,
};
pub use validate::ValidationError;

/// No legal (teacher, day, slot, classroom) tuple was left for a lesson.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot generate the timetable: active hard constraints prevent placing \"{subject}\"")]
pub struct PlacementError {
    pub subject: String,
}

/// Read-once snapshot of everything a generation run needs.
#[derive(Clone, Debug, Default)]
pub struct GenerationInput {
    pub subjects: Vec<Subject>,
    pub teachers: Vec<Teacher>,
    pub classrooms: Vec<Classroom>,
    pub constraints: Vec<Constraint>,
    pub preferences: Vec<Preference>,
    /// All persisted entries, including the target course's own.
    pub existing: Vec<ScheduleEntry>,
}

#[derive(Clone, Debug)]
pub struct GenerationOptions {
    pub course: CourseKey,
    pub optimization_type: String,
    pub respect_preferences: bool,
}

impl GenerationOptions {
    pub fn new(course: CourseKey) -> Self {
        Self {
            course,
            optimization_type: String::new(),
            respect_preferences: false,
        }
    }
}

pub trait Solver: Send + Sync + 'static {
    /// Builds the full set of entries for `opts.course`, or fails on the first
    /// lesson that has no legal slot. Nothing is persisted here.
    fn solve(
        &self,
        input: &GenerationInput,
        opts: &GenerationOptions,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ScheduleEntry>, PlacementError>;
}
