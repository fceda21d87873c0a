//! Document-store seam.
//!
//! Everything the scheduler persists goes through [`DomainStore`]: plain
//! find/insert/update/delete calls keyed by ids or simple field filters.
//! Unique indexes (subject name and code, classroom name, teacher email,
//! username) are the store's job; cascades are not.

use async_trait::async_trait;
use thiserror::Error;
use types::{
    Classroom, ClassroomId, Constraint, ConstraintId, Course, CourseId, CourseKey, EntryId,
    Notification, NotificationId, Preference, PreferenceId, ReportSnapshot, Role, ScheduleEntry,
    Subject, SubjectId, Teacher, TeacherId, User, UserId,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("duplicate value for unique field {0}")]
    Duplicate(&'static str),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Field filter over schedule entries; `None` fields match anything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub course_name: Option<String>,
    pub course_year: Option<u32>,
    pub subject_name: Option<String>,
    pub teacher_name: Option<String>,
    pub classroom_name: Option<String>,
}

impl EntryFilter {
    pub fn course(key: &CourseKey) -> Self {
        Self {
            course_name: Some(key.name.clone()),
            course_year: Some(key.year),
            ..Self::default()
        }
    }

    pub fn subject(name: impl Into<String>) -> Self {
        Self {
            subject_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn teacher(name: impl Into<String>) -> Self {
        Self {
            teacher_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn classroom(name: impl Into<String>) -> Self {
        Self {
            classroom_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, e: &ScheduleEntry) -> bool {
        self.course_name.as_ref().map_or(true, |v| *v == e.course_name)
            && self.course_year.map_or(true, |v| v == e.course_year)
            && self.subject_name.as_ref().map_or(true, |v| *v == e.subject_name)
            && self.teacher_name.as_ref().map_or(true, |v| *v == e.teacher_name)
            && self
                .classroom_name
                .as_ref()
                .map_or(true, |v| *v == e.classroom_name)
    }
}

#[async_trait]
pub trait DomainStore: Send + Sync + 'static {
    async fn list_courses(&self) -> StoreResult<Vec<Course>>;
    async fn insert_course(&self, course: Course) -> StoreResult<Course>;
    async fn update_course(&self, course: Course) -> StoreResult<Course>;
    async fn delete_course(&self, id: &CourseId) -> StoreResult<Course>;

    async fn list_subjects(&self) -> StoreResult<Vec<Subject>>;
    async fn subjects_for_course(&self, course_ref: &str) -> StoreResult<Vec<Subject>>;
    async fn insert_subject(&self, subject: Subject) -> StoreResult<Subject>;
    async fn update_subject(&self, subject: Subject) -> StoreResult<Subject>;
    async fn delete_subject(&self, id: &SubjectId) -> StoreResult<Subject>;
    async fn delete_subjects_for_course(&self, course_ref: &str) -> StoreResult<usize>;

    async fn list_teachers(&self) -> StoreResult<Vec<Teacher>>;
    async fn insert_teacher(&self, teacher: Teacher) -> StoreResult<Teacher>;
    async fn update_teacher(&self, teacher: Teacher) -> StoreResult<Teacher>;
    async fn delete_teacher(&self, id: &TeacherId) -> StoreResult<Teacher>;
    /// Removes `subject` from every teacher's subject list.
    async fn pull_subject_from_teachers(&self, subject: &str) -> StoreResult<usize>;

    async fn list_classrooms(&self) -> StoreResult<Vec<Classroom>>;
    async fn insert_classroom(&self, classroom: Classroom) -> StoreResult<Classroom>;
    async fn update_classroom(&self, classroom: Classroom) -> StoreResult<Classroom>;
    async fn delete_classroom(&self, id: &ClassroomId) -> StoreResult<Classroom>;

    async fn list_constraints(&self) -> StoreResult<Vec<Constraint>>;
    async fn insert_constraint(&self, constraint: Constraint) -> StoreResult<Constraint>;
    async fn update_constraint(&self, constraint: Constraint) -> StoreResult<Constraint>;
    async fn delete_constraint(&self, id: &ConstraintId) -> StoreResult<Constraint>;

    async fn list_preferences(&self) -> StoreResult<Vec<Preference>>;
    async fn preferences_for_teacher(&self, teacher: &TeacherId) -> StoreResult<Vec<Preference>>;
    async fn insert_preference(&self, preference: Preference) -> StoreResult<Preference>;
    async fn delete_preference(&self, id: &PreferenceId) -> StoreResult<Preference>;

    async fn find_entries(&self, filter: &EntryFilter) -> StoreResult<Vec<ScheduleEntry>>;
    async fn get_entry(&self, id: &EntryId) -> StoreResult<ScheduleEntry>;
    async fn insert_entry(&self, entry: ScheduleEntry) -> StoreResult<ScheduleEntry>;
    async fn update_entry(&self, entry: ScheduleEntry) -> StoreResult<ScheduleEntry>;
    async fn delete_entry(&self, id: &EntryId) -> StoreResult<ScheduleEntry>;
    async fn delete_entries(&self, filter: &EntryFilter) -> StoreResult<usize>;
    /// Swaps every entry of `course` for `entries` in one step, so readers
    /// never observe the course without a timetable.
    async fn replace_course_entries(
        &self,
        course: &CourseKey,
        entries: Vec<ScheduleEntry>,
    ) -> StoreResult<Vec<ScheduleEntry>>;

    async fn find_user_by_name(&self, name: &str) -> StoreResult<Option<User>>;
    async fn users_with_role(&self, role: Role) -> StoreResult<Vec<User>>;
    async fn insert_user(&self, user: User) -> StoreResult<User>;

    async fn insert_notification(&self, notification: Notification) -> StoreResult<Notification>;
    /// Unread first, then newest first.
    async fn notifications_for(&self, user: &UserId) -> StoreResult<Vec<Notification>>;
    async fn mark_notification_read(&self, id: &NotificationId) -> StoreResult<Notification>;
    async fn mark_all_read(&self, user: &UserId) -> StoreResult<usize>;
    async fn delete_notification(&self, id: &NotificationId) -> StoreResult<Notification>;
    async fn delete_notifications_for(&self, user: &UserId) -> StoreResult<usize>;

    async fn append_snapshot(&self, snapshot: ReportSnapshot) -> StoreResult<ReportSnapshot>;
    /// The second-most-recent snapshot, the baseline for trends.
    async fn previous_snapshot(&self) -> StoreResult<Option<ReportSnapshot>>;
}
