//! Validated CRUD over the domain collections, with the cascades the
//! store itself does not perform.

use crate::error::ServiceResult;
use sched_core::credentials::{hash_password, username_from_email, DEFAULT_TEACHER_PASSWORD};
use sched_core::notify::{notify_schedule_change, notify_status_change, ScheduleChange};
use sched_core::{validate, DomainStore, EntryFilter, StoreError};
use std::sync::Arc;
use tracing::{info, warn};
use types::{
    Classroom, ClassroomId, ClassroomInput, Constraint, ConstraintId, ConstraintInput, Course,
    CourseId, CourseInput, EntryId, EntryInput, EntryPatch, EntryStatus, Notification,
    NotificationId, Preference, PreferenceId, PreferenceInput, Role, ScheduleEntry, Subject,
    SubjectId, SubjectInput, Teacher, TeacherId, TeacherInput, User, UserId,
};

pub struct Catalog<S: DomainStore> {
    store: Arc<S>,
}

impl<S: DomainStore> Clone for Catalog<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: DomainStore> Catalog<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    // courses

    pub async fn courses(&self) -> ServiceResult<Vec<Course>> {
        Ok(self.store.list_courses().await?)
    }

    pub async fn create_course(&self, input: CourseInput) -> ServiceResult<Course> {
        let course = validate::course(input, CourseId::generate())?;
        Ok(self.store.insert_course(course).await?)
    }

    pub async fn update_course(&self, id: CourseId, input: CourseInput) -> ServiceResult<Course> {
        let course = validate::course(input, id)?;
        Ok(self.store.update_course(course).await?)
    }

    /// Deletes the course, its subjects and its timetable.
    pub async fn delete_course(&self, id: &CourseId) -> ServiceResult<Course> {
        let course = self.store.delete_course(id).await?;
        let key = course.key();
        let subjects = self.store.delete_subjects_for_course(&key.reference()).await?;
        let entries = self.store.delete_entries(&EntryFilter::course(&key)).await?;
        info!(course = %key, subjects, entries, "course deleted");
        Ok(course)
    }

    // subjects

    pub async fn subjects(&self) -> ServiceResult<Vec<Subject>> {
        Ok(self.store.list_subjects().await?)
    }

    pub async fn create_subject(&self, input: SubjectInput) -> ServiceResult<Subject> {
        let subject = validate::subject(input, SubjectId::generate())?;
        Ok(self.store.insert_subject(subject).await?)
    }

    pub async fn update_subject(&self, id: SubjectId, input: SubjectInput) -> ServiceResult<Subject> {
        let subject = validate::subject(input, id)?;
        Ok(self.store.update_subject(subject).await?)
    }

    /// Deletes the subject, drops it from every teacher and removes its lessons.
    pub async fn delete_subject(&self, id: &SubjectId) -> ServiceResult<Subject> {
        let subject = self.store.delete_subject(id).await?;
        let teachers = self.store.pull_subject_from_teachers(&subject.name).await?;
        let entries = self
            .store
            .delete_entries(&EntryFilter::subject(subject.name.clone()))
            .await?;
        info!(subject = %subject.name, teachers, entries, "subject deleted");
        Ok(subject)
    }

    // classrooms

    pub async fn classrooms(&self) -> ServiceResult<Vec<Classroom>> {
        Ok(self.store.list_classrooms().await?)
    }

    pub async fn create_classroom(&self, input: ClassroomInput) -> ServiceResult<Classroom> {
        let classroom = validate::classroom(input, ClassroomId::generate())?;
        Ok(self.store.insert_classroom(classroom).await?)
    }

    pub async fn update_classroom(&self, id: ClassroomId, input: ClassroomInput) -> ServiceResult<Classroom> {
        let classroom = validate::classroom(input, id)?;
        Ok(self.store.update_classroom(classroom).await?)
    }

    pub async fn delete_classroom(&self, id: &ClassroomId) -> ServiceResult<Classroom> {
        let classroom = self.store.delete_classroom(id).await?;
        let entries = self
            .store
            .delete_entries(&EntryFilter::classroom(classroom.name.clone()))
            .await?;
        info!(classroom = %classroom.name, entries, "classroom deleted");
        Ok(classroom)
    }

    // teachers

    /// All teachers, or those whose name, email or any subject contains
    /// `search` (case-insensitive).
    pub async fn teachers(&self, search: Option<&str>) -> ServiceResult<Vec<Teacher>> {
        let teachers = self.store.list_teachers().await?;
        let Some(needle) = search.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(teachers);
        };
        let needle = needle.to_lowercase();
        let hit = |s: &str| s.to_lowercase().contains(&needle);
        Ok(teachers
            .into_iter()
            .filter(|t| hit(&t.name) || hit(&t.email) || t.subjects.iter().any(|s| hit(s)))
            .collect())
    }

    /// Creates the teacher and a linked `docente` login whose username is the
    /// local part of the email.
    pub async fn create_teacher(&self, input: TeacherInput) -> ServiceResult<Teacher> {
        let teacher = validate::teacher(input, TeacherId::generate())?;
        let password_hash = hash_password(DEFAULT_TEACHER_PASSWORD)?;
        let teacher = self.store.insert_teacher(teacher).await?;
        let user = User {
            id: UserId::generate(),
            username: username_from_email(&teacher.email),
            password_hash,
            role: Role::Docente,
            name: teacher.name.clone(),
        };
        let username = user.username.clone();
        if let Err(e) = self.store.insert_user(user).await {
            // A teacher always has a login.
            warn!(?e, %username, "user creation failed, rolling back teacher");
            self.store.delete_teacher(&teacher.id).await?;
            return Err(e.into());
        }
        info!(teacher = %teacher.name, %username, "teacher created");
        Ok(teacher)
    }

    pub async fn update_teacher(&self, id: TeacherId, input: TeacherInput) -> ServiceResult<Teacher> {
        let teacher = validate::teacher(input, id)?;
        Ok(self.store.update_teacher(teacher).await?)
    }

    pub async fn delete_teacher(&self, id: &TeacherId) -> ServiceResult<Teacher> {
        let teacher = self.store.delete_teacher(id).await?;
        let entries = self
            .store
            .delete_entries(&EntryFilter::teacher(teacher.name.clone()))
            .await?;
        info!(teacher = %teacher.name, entries, "teacher deleted");
        Ok(teacher)
    }

    // constraints

    pub async fn constraints(&self) -> ServiceResult<Vec<Constraint>> {
        Ok(self.store.list_constraints().await?)
    }

    pub async fn create_constraint(&self, input: ConstraintInput) -> ServiceResult<Constraint> {
        let constraint = validate::constraint(input, ConstraintId::generate())?;
        Ok(self.store.insert_constraint(constraint).await?)
    }

    pub async fn update_constraint(&self, id: ConstraintId, input: ConstraintInput) -> ServiceResult<Constraint> {
        let constraint = validate::constraint(input, id)?;
        Ok(self.store.update_constraint(constraint).await?)
    }

    pub async fn delete_constraint(&self, id: &ConstraintId) -> ServiceResult<Constraint> {
        Ok(self.store.delete_constraint(id).await?)
    }

    // preferences

    pub async fn preferences_for(&self, teacher: &TeacherId) -> ServiceResult<Vec<Preference>> {
        Ok(self.store.preferences_for_teacher(teacher).await?)
    }

    pub async fn create_preference(&self, input: PreferenceInput) -> ServiceResult<Preference> {
        let preference = validate::preference(input, PreferenceId::generate())?;
        let teachers = self.store.list_teachers().await?;
        if !teachers.iter().any(|t| t.id == preference.teacher_id) {
            return Err(StoreError::not_found("teacher", &preference.teacher_id).into());
        }
        Ok(self.store.insert_preference(preference).await?)
    }

    pub async fn delete_preference(&self, id: &PreferenceId) -> ServiceResult<Preference> {
        Ok(self.store.delete_preference(id).await?)
    }

    // schedule entries

    /// Entries of an optional course and/or year, ordered by day then slot.
    pub async fn schedule(&self, course: Option<String>, year: Option<u32>) -> ServiceResult<Vec<ScheduleEntry>> {
        let filter = EntryFilter {
            course_name: course,
            course_year: year,
            ..EntryFilter::default()
        };
        let mut entries = self.store.find_entries(&filter).await?;
        entries.sort_by_key(|e| (e.day, e.time_slot));
        Ok(entries)
    }

    pub async fn entry(&self, id: &EntryId) -> ServiceResult<ScheduleEntry> {
        Ok(self.store.get_entry(id).await?)
    }

    pub async fn create_entry(&self, input: EntryInput) -> ServiceResult<ScheduleEntry> {
        let entry = validate::entry(input, EntryId::generate())?;
        let entry = self.store.insert_entry(entry).await?;
        notify_schedule_change(self.store.as_ref(), &entry, ScheduleChange::Created).await;
        Ok(entry)
    }

    pub async fn update_entry(&self, id: &EntryId, patch: EntryPatch) -> ServiceResult<ScheduleEntry> {
        let mut entry = self.store.get_entry(id).await?;
        patch.apply(&mut entry);
        let entry = self.store.update_entry(entry).await?;
        notify_schedule_change(self.store.as_ref(), &entry, ScheduleChange::Updated).await;
        Ok(entry)
    }

    pub async fn delete_entry(&self, id: &EntryId) -> ServiceResult<ScheduleEntry> {
        let entry = self.store.delete_entry(id).await?;
        notify_schedule_change(self.store.as_ref(), &entry, ScheduleChange::Deleted).await;
        Ok(entry)
    }

    /// A teacher confirming or flagging a lesson; every admin is told.
    pub async fn set_entry_status(&self, id: &EntryId, status: EntryStatus) -> ServiceResult<ScheduleEntry> {
        let mut entry = self.store.get_entry(id).await?;
        entry.status = status;
        let entry = self.store.update_entry(entry).await?;
        notify_status_change(self.store.as_ref(), &entry).await;
        Ok(entry)
    }

    // notifications

    pub async fn notifications(&self, user: &UserId) -> ServiceResult<Vec<Notification>> {
        Ok(self.store.notifications_for(user).await?)
    }

    pub async fn mark_read(&self, id: &NotificationId) -> ServiceResult<Notification> {
        Ok(self.store.mark_notification_read(id).await?)
    }

    pub async fn mark_all_read(&self, user: &UserId) -> ServiceResult<usize> {
        Ok(self.store.mark_all_read(user).await?)
    }

    pub async fn delete_notification(&self, id: &NotificationId) -> ServiceResult<Notification> {
        Ok(self.store.delete_notification(id).await?)
    }

    pub async fn delete_notifications(&self, user: &UserId) -> ServiceResult<usize> {
        Ok(self.store.delete_notifications_for(user).await?)
    }
}
