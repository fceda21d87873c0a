use std::collections::{HashMap, HashSet};
use types::{CourseKey, Day, ScheduleEntry, TimeSlot};

/// Who and what is busy when, for one generation run.
///
/// Classroom and teacher slots start from the commitments of every *other*
/// course; the course being generated starts empty and grows as lessons are
/// placed.
#[derive(Clone, Debug, Default)]
pub struct Occupancy {
    classrooms: HashMap<(Day, TimeSlot), HashSet<String>>,
    teachers: HashMap<(Day, TimeSlot), HashSet<String>>,
    course: HashSet<(Day, TimeSlot)>,
    course_load: [u32; 5],
    subject_load: [HashMap<String, u32>; 5],
    teacher_days: HashMap<String, HashSet<Day>>,
}

impl Occupancy {
    pub fn seed(course: &CourseKey, existing: &[ScheduleEntry]) -> Self {
        let mut occ = Self::default();
        for e in existing.iter().filter(|e| !e.belongs_to(course)) {
            occ.mark_global(e);
        }
        occ
    }

    fn mark_global(&mut self, e: &ScheduleEntry) {
        self.classrooms
            .entry((e.day, e.time_slot))
            .or_default()
            .insert(e.classroom_name.clone());
        self.teachers
            .entry((e.day, e.time_slot))
            .or_default()
            .insert(e.teacher_name.clone());
        self.teacher_days
            .entry(e.teacher_name.clone())
            .or_default()
            .insert(e.day);
    }

    pub fn is_classroom_free(&self, day: Day, slot: TimeSlot, classroom: &str) -> bool {
        !self
            .classrooms
            .get(&(day, slot))
            .is_some_and(|s| s.contains(classroom))
    }

    pub fn is_teacher_free(&self, day: Day, slot: TimeSlot, teacher: &str) -> bool {
        !self
            .teachers
            .get(&(day, slot))
            .is_some_and(|s| s.contains(teacher))
    }

    pub fn is_course_slot_free(&self, day: Day, slot: TimeSlot) -> bool {
        !self.course.contains(&(day, slot))
    }

    /// Lessons already placed for the course on `day`.
    pub fn course_load(&self, day: Day) -> u32 {
        self.course_load[day.index()]
    }

    /// Lessons of `subject` already placed for the course on `day`.
    pub fn subject_load(&self, day: Day, subject: &str) -> u32 {
        self.subject_load[day.index()]
            .get(subject)
            .copied()
            .unwrap_or(0)
    }

    pub fn teacher_works_on(&self, teacher: &str, day: Day) -> bool {
        self.teacher_days
            .get(teacher)
            .is_some_and(|days| days.contains(&day))
    }

    pub fn teacher_day_count(&self, teacher: &str) -> usize {
        self.teacher_days.get(teacher).map_or(0, HashSet::len)
    }

    /// Records a lesson placed for the course being generated.
    pub fn record(&mut self, e: &ScheduleEntry) {
        self.mark_global(e);
        self.course.insert((e.day, e.time_slot));
        self.course_load[e.day.index()] += 1;
        *self.subject_load[e.day.index()]
            .entry(e.subject_name.clone())
            .or_default() += 1;
    }
}
