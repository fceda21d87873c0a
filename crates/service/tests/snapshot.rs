use async_trait::async_trait;
use sched_core::{DomainStore, EntryFilter, StoreError, StoreResult};
use service::{RngSource, Scheduler};
use solver_heur::HeurSolver;
use std::sync::Arc;
use store::InMemStore;
use types::{
    Classroom, ClassroomId, Constraint, ConstraintId, Course, CourseId, CourseKey, EntryId,
    GenerateRequest, Notification, NotificationId, Preference, PreferenceId, ReportSnapshot, Role,
    ScheduleEntry, Subject, SubjectId, Teacher, TeacherId, User, UserId,
};

/// Demo store whose report history rejects every append.
struct NoHistory(InMemStore);

#[async_trait]
impl DomainStore for NoHistory {
    async fn list_courses(&self) -> StoreResult<Vec<Course>> {
        self.0.list_courses().await
    }

    async fn insert_course(&self, course: Course) -> StoreResult<Course> {
        self.0.insert_course(course).await
    }

    async fn update_course(&self, course: Course) -> StoreResult<Course> {
        self.0.update_course(course).await
    }

    async fn delete_course(&self, id: &CourseId) -> StoreResult<Course> {
        self.0.delete_course(id).await
    }

    async fn list_subjects(&self) -> StoreResult<Vec<Subject>> {
        self.0.list_subjects().await
    }

    async fn subjects_for_course(&self, course_ref: &str) -> StoreResult<Vec<Subject>> {
        self.0.subjects_for_course(course_ref).await
    }

    async fn insert_subject(&self, subject: Subject) -> StoreResult<Subject> {
        self.0.insert_subject(subject).await
    }

    async fn update_subject(&self, subject: Subject) -> StoreResult<Subject> {
        self.0.update_subject(subject).await
    }

    async fn delete_subject(&self, id: &SubjectId) -> StoreResult<Subject> {
        self.0.delete_subject(id).await
    }

    async fn delete_subjects_for_course(&self, course_ref: &str) -> StoreResult<usize> {
        self.0.delete_subjects_for_course(course_ref).await
    }

    async fn list_teachers(&self) -> StoreResult<Vec<Teacher>> {
        self.0.list_teachers().await
    }

    async fn insert_teacher(&self, teacher: Teacher) -> StoreResult<Teacher> {
        self.0.insert_teacher(teacher).await
    }

    async fn update_teacher(&self, teacher: Teacher) -> StoreResult<Teacher> {
        self.0.update_teacher(teacher).await
    }

    async fn delete_teacher(&self, id: &TeacherId) -> StoreResult<Teacher> {
        self.0.delete_teacher(id).await
    }

    async fn pull_subject_from_teachers(&self, subject: &str) -> StoreResult<usize> {
        self.0.pull_subject_from_teachers(subject).await
    }

    async fn list_classrooms(&self) -> StoreResult<Vec<Classroom>> {
        self.0.list_classrooms().await
    }

    async fn insert_classroom(&self, classroom: Classroom) -> StoreResult<Classroom> {
        self.0.insert_classroom(classroom).await
    }

    async fn update_classroom(&self, classroom: Classroom) -> StoreResult<Classroom> {
        self.0.update_classroom(classroom).await
    }

    async fn delete_classroom(&self, id: &ClassroomId) -> StoreResult<Classroom> {
        self.0.delete_classroom(id).await
    }

    async fn list_constraints(&self) -> StoreResult<Vec<Constraint>> {
        self.0.list_constraints().await
    }

    async fn insert_constraint(&self, constraint: Constraint) -> StoreResult<Constraint> {
        self.0.insert_constraint(constraint).await
    }

    async fn update_constraint(&self, constraint: Constraint) -> StoreResult<Constraint> {
        self.0.update_constraint(constraint).await
    }

    async fn delete_constraint(&self, id: &ConstraintId) -> StoreResult<Constraint> {
        self.0.delete_constraint(id).await
    }

    async fn list_preferences(&self) -> StoreResult<Vec<Preference>> {
        self.0.list_preferences().await
    }

    async fn preferences_for_teacher(&self, teacher: &TeacherId) -> StoreResult<Vec<Preference>> {
        self.0.preferences_for_teacher(teacher).await
    }

    async fn insert_preference(&self, preference: Preference) -> StoreResult<Preference> {
        self.0.insert_preference(preference).await
    }

    async fn delete_preference(&self, id: &PreferenceId) -> StoreResult<Preference> {
        self.0.delete_preference(id).await
    }

    async fn find_entries(&self, filter: &EntryFilter) -> StoreResult<Vec<ScheduleEntry>> {
        self.0.find_entries(filter).await
    }

    async fn get_entry(&self, id: &EntryId) -> StoreResult<ScheduleEntry> {
        self.0.get_entry(id).await
    }

    async fn insert_entry(&self, entry: ScheduleEntry) -> StoreResult<ScheduleEntry> {
        self.0.insert_entry(entry).await
    }

    async fn update_entry(&self, entry: ScheduleEntry) -> StoreResult<ScheduleEntry> {
        self.0.update_entry(entry).await
    }

    async fn delete_entry(&self, id: &EntryId) -> StoreResult<ScheduleEntry> {
        self.0.delete_entry(id).await
    }

    async fn delete_entries(&self, filter: &EntryFilter) -> StoreResult<usize> {
        self.0.delete_entries(filter).await
    }

    async fn replace_course_entries(
        &self,
        course: &CourseKey,
        entries: Vec<ScheduleEntry>,
    ) -> StoreResult<Vec<ScheduleEntry>> {
        self.0.replace_course_entries(course, entries).await
    }

    async fn find_user_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        self.0.find_user_by_name(name).await
    }

    async fn users_with_role(&self, role: Role) -> StoreResult<Vec<User>> {
        self.0.users_with_role(role).await
    }

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        self.0.insert_user(user).await
    }

    async fn insert_notification(&self, notification: Notification) -> StoreResult<Notification> {
        self.0.insert_notification(notification).await
    }

    async fn notifications_for(&self, user: &UserId) -> StoreResult<Vec<Notification>> {
        self.0.notifications_for(user).await
    }

    async fn mark_notification_read(&self, id: &NotificationId) -> StoreResult<Notification> {
        self.0.mark_notification_read(id).await
    }

    async fn mark_all_read(&self, user: &UserId) -> StoreResult<usize> {
        self.0.mark_all_read(user).await
    }

    async fn delete_notification(&self, id: &NotificationId) -> StoreResult<Notification> {
        self.0.delete_notification(id).await
    }

    async fn delete_notifications_for(&self, user: &UserId) -> StoreResult<usize> {
        self.0.delete_notifications_for(user).await
    }

    async fn append_snapshot(&self, _snapshot: ReportSnapshot) -> StoreResult<ReportSnapshot> {
        Err(StoreError::Unavailable("report history offline".into()))
    }

    async fn previous_snapshot(&self) -> StoreResult<Option<ReportSnapshot>> {
        self.0.previous_snapshot().await
    }
}

#[tokio::test]
async fn snapshot_failure_after_commit_still_reports_success() {
    let sched = Scheduler::new(
        Arc::new(NoHistory(InMemStore::with_demo_data())),
        HeurSolver::new(),
        RngSource::seeded(11),
    );
    let req = GenerateRequest {
        course: "Informatica".into(),
        year: 1,
        optimization_type: "balanced".into(),
        respect_preferences: true,
    };

    let out = sched.generate(&req).await.unwrap();
    assert_eq!(out.entries.len(), 6);
    assert!(out.metrics.is_none());

    let stored = sched
        .store()
        .find_entries(&EntryFilter::course(&CourseKey::new("Informatica", 1)))
        .await
        .unwrap();
    assert_eq!(stored.len(), 6);
}
