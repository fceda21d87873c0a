//! Randomized greedy timetable builder.
//!
//! Lessons are placed one at a time in shuffled order. For each lesson every
//! legal (teacher, day, slot, classroom) tuple is scored, and one of the
//! near-best tuples is picked at random. There is no backtracking: the first
//! lesson without a legal tuple fails the whole run.

pub mod lessons;
pub mod occupancy;
pub mod rules;
pub mod search;

use rand::RngCore;
use sched_core::{GenerationInput, GenerationOptions, PlacementError, Solver};
use tracing::{debug, info, warn};
use types::{EntryId, EntryStatus, ScheduleEntry};

use crate::occupancy::Occupancy;
use crate::rules::RuleSet;
use crate::search::SearchContext;

#[derive(Clone, Copy, Debug, Default)]
pub struct HeurSolver;

impl HeurSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for HeurSolver {
    fn solve(
        &self,
        input: &GenerationInput,
        opts: &GenerationOptions,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ScheduleEntry>, PlacementError> {
        let rules = RuleSet::from_constraints(&input.constraints);
        let preferences = search::preference_map(&input.preferences);
        let mut occ = Occupancy::seed(&opts.course, &input.existing);
        let queue = lessons::build_queue(&opts.course, &input.subjects, &mut *rng);

        info!(
            course = %opts.course.name,
            year = opts.course.year,
            optimization = %opts.optimization_type,
            respect_preferences = opts.respect_preferences,
            lessons = queue.len(),
            rules = ?rules.active().collect::<Vec<_>>(),
            "greedy generation started"
        );

        let ctx = SearchContext {
            rules: &rules,
            teachers: &input.teachers,
            classrooms: &input.classrooms,
            preferences: &preferences,
            respect_preferences: opts.respect_preferences,
        };

        let mut placed = Vec::with_capacity(queue.len());
        for lesson in &queue {
            let found = search::candidates(&ctx, lesson, &occ, &mut *rng);
            let considered = found.len();
            let Some(pick) = search::select(found, &mut *rng) else {
                warn!(subject = %lesson.subject, placed = placed.len(), "no legal slot left");
                return Err(PlacementError {
                    subject: lesson.subject.clone(),
                });
            };
            debug!(
                subject = %lesson.subject,
                teacher = pick.teacher,
                day = %pick.day,
                slot = %pick.slot,
                considered,
                "lesson placed"
            );

            let entry = ScheduleEntry {
                id: EntryId::generate(),
                course_name: opts.course.name.clone(),
                course_year: opts.course.year,
                day: pick.day,
                time_slot: pick.slot,
                subject_name: lesson.subject.clone(),
                teacher_name: pick.teacher.to_string(),
                classroom_name: pick.classroom.to_string(),
                status: EntryStatus::Pending,
            };
            occ.record(&entry);
            placed.push(entry);
        }

        info!(course = %opts.course, lessons = placed.len(), "greedy generation finished");
        Ok(placed)
    }
}
