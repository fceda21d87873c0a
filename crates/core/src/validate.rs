//! Normalisation and checks applied before anything reaches the store.

use thiserror::Error;
use types::{
    Classroom, ClassroomId, ClassroomInput, Constraint, ConstraintId, ConstraintInput, Course,
    CourseId, CourseInput, CourseKey, EntryId, EntryInput, GenerateRequest, Preference, PreferenceId,
    PreferenceInput, ScheduleEntry, Subject, SubjectId, SubjectInput, SubjectList, Teacher,
    TeacherId, TeacherInput, DEFAULT_MAX_WEEKLY_HOURS, HOURS_PER_SLOT,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid input: {0}")]
    Msg(String),
}

fn finish<T>(value: T, errors: Vec<String>) -> Result<T, ValidationError> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(ValidationError::Msg(errors.join("; ")))
    }
}

fn require(name: &str, value: &str, errors: &mut Vec<String>) {
    if value.trim().is_empty() {
        errors.push(format!("{name} is empty"));
    }
}

/// Lower-cases `s` and upper-cases the first ASCII word character after every
/// word boundary.
pub fn title_case(s: &str) -> String {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    let mut out = String::with_capacity(s.len());
    let mut prev_word = false;
    for c in s.chars() {
        let word = is_word(c);
        if word && !prev_word {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        prev_word = word;
    }
    out
}

/// Parses a `"Name - Year"` composite reference.
pub fn parse_course_ref(s: &str) -> Option<CourseKey> {
    let (name, year) = s.rsplit_once(" - ")?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    year.trim().parse().ok().map(|y| CourseKey::new(name, y))
}

/// Splits comma-separated text, trims each name and drops empties.
pub fn subject_names(list: SubjectList) -> Vec<String> {
    match list {
        SubjectList::List(v) => v
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        SubjectList::Text(t) => t
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    }
}

pub fn subject(input: SubjectInput, id: SubjectId) -> Result<Subject, ValidationError> {
    let mut errors = Vec::new();
    require("subject name", &input.name, &mut errors);
    require("subject code", &input.code, &mut errors);
    if input.weekly_hours == 0 || input.weekly_hours % HOURS_PER_SLOT != 0 {
        errors.push(format!(
            "weekly_hours must be a positive multiple of {HOURS_PER_SLOT}, got {}",
            input.weekly_hours
        ));
    }
    if parse_course_ref(&input.course_ref).is_none() {
        errors.push(format!(
            "course_ref must look like \"Name - Year\", got {:?}",
            input.course_ref
        ));
    }
    finish(
        Subject {
            id,
            name: title_case(input.name.trim()),
            code: input.code.trim().to_uppercase(),
            is_lab: input.is_lab,
            weekly_hours: input.weekly_hours,
            course_ref: input.course_ref.trim().to_string(),
        },
        errors,
    )
}

pub fn teacher(input: TeacherInput, id: TeacherId) -> Result<Teacher, ValidationError> {
    let mut errors = Vec::new();
    require("teacher name", &input.name, &mut errors);
    let email = input.email.trim().to_string();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => errors.push(format!("invalid email {email:?}")),
    }
    let max_weekly_hours = input.max_weekly_hours.unwrap_or(DEFAULT_MAX_WEEKLY_HOURS);
    if max_weekly_hours == 0 {
        errors.push("max_weekly_hours must be positive".into());
    }
    finish(
        Teacher {
            id,
            name: input.name.trim().to_string(),
            email,
            subjects: subject_names(input.subjects),
            max_weekly_hours,
        },
        errors,
    )
}

pub fn classroom(input: ClassroomInput, id: ClassroomId) -> Result<Classroom, ValidationError> {
    let mut errors = Vec::new();
    require("classroom name", &input.name, &mut errors);
    finish(
        Classroom {
            id,
            name: input.name.trim().to_string(),
            floor: input.floor,
            capacity: input.capacity,
            has_projector: input.has_projector.unwrap_or(true),
            has_pc: input.has_pc.unwrap_or(false),
        },
        errors,
    )
}

pub fn course(input: CourseInput, id: CourseId) -> Result<Course, ValidationError> {
    let mut errors = Vec::new();
    require("course name", &input.name, &mut errors);
    if input.year == 0 {
        errors.push("course year must be positive".into());
    }
    finish(
        Course {
            id,
            name: input.name.trim().to_string(),
            year: input.year,
            students_count: input.students_count,
        },
        errors,
    )
}

pub fn constraint(input: ConstraintInput, id: ConstraintId) -> Result<Constraint, ValidationError> {
    let mut errors = Vec::new();
    require("constraint name", &input.name, &mut errors);
    require("constraint tag", &input.tag, &mut errors);
    finish(
        Constraint {
            id,
            name: input.name.trim().to_string(),
            description: input.description,
            kind: input.kind,
            tag: input.tag.trim().to_string(),
        },
        errors,
    )
}

pub fn preference(input: PreferenceInput, id: PreferenceId) -> Result<Preference, ValidationError> {
    let mut errors = Vec::new();
    require("teacher_id", &input.teacher_id.0, &mut errors);
    finish(
        Preference {
            id,
            teacher_id: input.teacher_id,
            day: input.day,
            time_slot: input.time_slot,
            kind: input.kind,
        },
        errors,
    )
}

pub fn entry(input: EntryInput, id: EntryId) -> Result<ScheduleEntry, ValidationError> {
    let mut errors = Vec::new();
    require("course_name", &input.course_name, &mut errors);
    require("subject_name", &input.subject_name, &mut errors);
    require("teacher_name", &input.teacher_name, &mut errors);
    require("classroom_name", &input.classroom_name, &mut errors);
    finish(
        ScheduleEntry {
            id,
            course_name: input.course_name.trim().to_string(),
            course_year: input.course_year,
            day: input.day,
            time_slot: input.time_slot,
            subject_name: input.subject_name.trim().to_string(),
            teacher_name: input.teacher_name.trim().to_string(),
            classroom_name: input.classroom_name.trim().to_string(),
            status: input.status.unwrap_or_default(),
        },
        errors,
    )
}

/// Target course of a generation request.
pub fn generate_request(req: &GenerateRequest) -> Result<CourseKey, ValidationError> {
    let mut errors = Vec::new();
    require("course", &req.course, &mut errors);
    if req.year == 0 {
        errors.push("year must be positive".into());
    }
    finish(CourseKey::new(req.course.trim(), req.year), errors)
}
