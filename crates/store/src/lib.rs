//! In-memory document store.
//!
//! Collections are plain vectors behind one lock, kept in insertion order.
//! Unique indexes are checked on insert and update; cascades belong to the
//! caller.

mod seed;

use async_trait::async_trait;
use parking_lot::RwLock;
use sched_core::{DomainStore, EntryFilter, StoreError, StoreResult};
use std::cmp::Reverse;
use std::sync::Arc;
use types::{
    Classroom, ClassroomId, Constraint, ConstraintId, Course, CourseId, CourseKey, EntryId,
    Notification, NotificationId, Preference, PreferenceId, ReportSnapshot, Role, ScheduleEntry,
    Subject, SubjectId, Teacher, TeacherId, User, UserId,
};

pub use seed::SeedSummary;

#[derive(Default)]
struct Inner {
    courses: Vec<Course>,
    subjects: Vec<Subject>,
    teachers: Vec<Teacher>,
    classrooms: Vec<Classroom>,
    constraints: Vec<Constraint>,
    preferences: Vec<Preference>,
    entries: Vec<ScheduleEntry>,
    users: Vec<User>,
    notifications: Vec<Notification>,
    snapshots: Vec<ReportSnapshot>,
}

#[derive(Clone, Default)]
pub struct InMemStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn ensure_unique<T>(items: &[T], field: &'static str, clash: impl Fn(&T) -> bool) -> StoreResult<()> {
    if items.iter().any(clash) {
        return Err(StoreError::Duplicate(field));
    }
    Ok(())
}

fn replace<T: Clone>(
    items: &mut [T],
    kind: &'static str,
    id: &str,
    is_target: impl Fn(&T) -> bool,
    value: T,
) -> StoreResult<T> {
    let slot = items
        .iter_mut()
        .find(|item| is_target(item))
        .ok_or_else(|| StoreError::not_found(kind, id))?;
    *slot = value.clone();
    Ok(value)
}

fn remove<T>(items: &mut Vec<T>, kind: &'static str, id: &str, is_target: impl Fn(&T) -> bool) -> StoreResult<T> {
    let pos = items
        .iter()
        .position(is_target)
        .ok_or_else(|| StoreError::not_found(kind, id))?;
    Ok(items.remove(pos))
}

fn remove_all<T>(items: &mut Vec<T>, is_target: impl Fn(&T) -> bool) -> usize {
    let before = items.len();
    items.retain(|item| !is_target(item));
    before - items.len()
}

#[async_trait]
impl DomainStore for InMemStore {
    async fn list_courses(&self) -> StoreResult<Vec<Course>> {
        Ok(self.inner.read().courses.clone())
    }

    async fn insert_course(&self, course: Course) -> StoreResult<Course> {
        let mut g = self.inner.write();
        ensure_unique(&g.courses, "name+year", |c| c.name == course.name && c.year == course.year)?;
        g.courses.push(course.clone());
        Ok(course)
    }

    async fn update_course(&self, course: Course) -> StoreResult<Course> {
        let mut g = self.inner.write();
        ensure_unique(&g.courses, "name+year", |c| {
            c.id != course.id && c.name == course.name && c.year == course.year
        })?;
        let id = course.id.clone();
        replace(&mut g.courses, "course", &id.0, |c| c.id == id, course)
    }

    async fn delete_course(&self, id: &CourseId) -> StoreResult<Course> {
        remove(&mut self.inner.write().courses, "course", &id.0, |c| c.id == *id)
    }

    async fn list_subjects(&self) -> StoreResult<Vec<Subject>> {
        Ok(self.inner.read().subjects.clone())
    }

    async fn subjects_for_course(&self, course_ref: &str) -> StoreResult<Vec<Subject>> {
        Ok(self
            .inner
            .read()
            .subjects
            .iter()
            .filter(|s| s.course_ref == course_ref)
            .cloned()
            .collect())
    }

    async fn insert_subject(&self, subject: Subject) -> StoreResult<Subject> {
        let mut g = self.inner.write();
        ensure_unique(&g.subjects, "name", |s| s.name == subject.name)?;
        ensure_unique(&g.subjects, "code", |s| s.code == subject.code)?;
        g.subjects.push(subject.clone());
        Ok(subject)
    }

    async fn update_subject(&self, subject: Subject) -> StoreResult<Subject> {
        let mut g = self.inner.write();
        ensure_unique(&g.subjects, "name", |s| s.id != subject.id && s.name == subject.name)?;
        ensure_unique(&g.subjects, "code", |s| s.id != subject.id && s.code == subject.code)?;
        let id = subject.id.clone();
        replace(&mut g.subjects, "subject", &id.0, |s| s.id == id, subject)
    }

    async fn delete_subject(&self, id: &SubjectId) -> StoreResult<Subject> {
        remove(&mut self.inner.write().subjects, "subject", &id.0, |s| s.id == *id)
    }

    async fn delete_subjects_for_course(&self, course_ref: &str) -> StoreResult<usize> {
        Ok(remove_all(&mut self.inner.write().subjects, |s| s.course_ref == course_ref))
    }

    async fn list_teachers(&self) -> StoreResult<Vec<Teacher>> {
        Ok(self.inner.read().teachers.clone())
    }

    async fn insert_teacher(&self, teacher: Teacher) -> StoreResult<Teacher> {
        let mut g = self.inner.write();
        ensure_unique(&g.teachers, "email", |t| t.email == teacher.email)?;
        g.teachers.push(teacher.clone());
        Ok(teacher)
    }

    async fn update_teacher(&self, teacher: Teacher) -> StoreResult<Teacher> {
        let mut g = self.inner.write();
        ensure_unique(&g.teachers, "email", |t| t.id != teacher.id && t.email == teacher.email)?;
        let id = teacher.id.clone();
        replace(&mut g.teachers, "teacher", &id.0, |t| t.id == id, teacher)
    }

    async fn delete_teacher(&self, id: &TeacherId) -> StoreResult<Teacher> {
        remove(&mut self.inner.write().teachers, "teacher", &id.0, |t| t.id == *id)
    }

    async fn pull_subject_from_teachers(&self, subject: &str) -> StoreResult<usize> {
        let mut g = self.inner.write();
        let mut touched = 0;
        for t in g.teachers.iter_mut().filter(|t| t.teaches(subject)) {
            t.subjects.retain(|s| s != subject);
            touched += 1;
        }
        Ok(touched)
    }

    async fn list_classrooms(&self) -> StoreResult<Vec<Classroom>> {
        Ok(self.inner.read().classrooms.clone())
    }

    async fn insert_classroom(&self, classroom: Classroom) -> StoreResult<Classroom> {
        let mut g = self.inner.write();
        ensure_unique(&g.classrooms, "name", |c| c.name == classroom.name)?;
        g.classrooms.push(classroom.clone());
        Ok(classroom)
    }

    async fn update_classroom(&self, classroom: Classroom) -> StoreResult<Classroom> {
        let mut g = self.inner.write();
        ensure_unique(&g.classrooms, "name", |c| c.id != classroom.id && c.name == classroom.name)?;
        let id = classroom.id.clone();
        replace(&mut g.classrooms, "classroom", &id.0, |c| c.id == id, classroom)
    }

    async fn delete_classroom(&self, id: &ClassroomId) -> StoreResult<Classroom> {
        remove(&mut self.inner.write().classrooms, "classroom", &id.0, |c| c.id == *id)
    }

    async fn list_constraints(&self) -> StoreResult<Vec<Constraint>> {
        Ok(self.inner.read().constraints.clone())
    }

    async fn insert_constraint(&self, constraint: Constraint) -> StoreResult<Constraint> {
        self.inner.write().constraints.push(constraint.clone());
        Ok(constraint)
    }

    async fn update_constraint(&self, constraint: Constraint) -> StoreResult<Constraint> {
        let id = constraint.id.clone();
        replace(
            &mut self.inner.write().constraints,
            "constraint",
            &id.0,
            |c| c.id == id,
            constraint,
        )
    }

    async fn delete_constraint(&self, id: &ConstraintId) -> StoreResult<Constraint> {
        remove(&mut self.inner.write().constraints, "constraint", &id.0, |c| c.id == *id)
    }

    async fn list_preferences(&self) -> StoreResult<Vec<Preference>> {
        Ok(self.inner.read().preferences.clone())
    }

    async fn preferences_for_teacher(&self, teacher: &TeacherId) -> StoreResult<Vec<Preference>> {
        Ok(self
            .inner
            .read()
            .preferences
            .iter()
            .filter(|p| p.teacher_id == *teacher)
            .cloned()
            .collect())
    }

    async fn insert_preference(&self, preference: Preference) -> StoreResult<Preference> {
        self.inner.write().preferences.push(preference.clone());
        Ok(preference)
    }

    async fn delete_preference(&self, id: &PreferenceId) -> StoreResult<Preference> {
        remove(&mut self.inner.write().preferences, "preference", &id.0, |p| p.id == *id)
    }

    async fn find_entries(&self, filter: &EntryFilter) -> StoreResult<Vec<ScheduleEntry>> {
        Ok(self
            .inner
            .read()
            .entries
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    async fn get_entry(&self, id: &EntryId) -> StoreResult<ScheduleEntry> {
        self.inner
            .read()
            .entries
            .iter()
            .find(|e| e.id == *id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("schedule entry", id))
    }

    async fn insert_entry(&self, entry: ScheduleEntry) -> StoreResult<ScheduleEntry> {
        self.inner.write().entries.push(entry.clone());
        Ok(entry)
    }

    async fn update_entry(&self, entry: ScheduleEntry) -> StoreResult<ScheduleEntry> {
        let id = entry.id.clone();
        replace(&mut self.inner.write().entries, "schedule entry", &id.0, |e| e.id == id, entry)
    }

    async fn delete_entry(&self, id: &EntryId) -> StoreResult<ScheduleEntry> {
        remove(&mut self.inner.write().entries, "schedule entry", &id.0, |e| e.id == *id)
    }

    async fn delete_entries(&self, filter: &EntryFilter) -> StoreResult<usize> {
        Ok(remove_all(&mut self.inner.write().entries, |e| filter.matches(e)))
    }

    async fn replace_course_entries(
        &self,
        course: &CourseKey,
        entries: Vec<ScheduleEntry>,
    ) -> StoreResult<Vec<ScheduleEntry>> {
        let mut g = self.inner.write();
        g.entries.retain(|e| !e.belongs_to(course));
        g.entries.extend(entries.iter().cloned());
        Ok(entries)
    }

    async fn find_user_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        Ok(self.inner.read().users.iter().find(|u| u.name == name).cloned())
    }

    async fn users_with_role(&self, role: Role) -> StoreResult<Vec<User>> {
        Ok(self
            .inner
            .read()
            .users
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let mut g = self.inner.write();
        ensure_unique(&g.users, "username", |u| u.username == user.username)?;
        g.users.push(user.clone());
        Ok(user)
    }

    async fn insert_notification(&self, notification: Notification) -> StoreResult<Notification> {
        self.inner.write().notifications.push(notification.clone());
        Ok(notification)
    }

    async fn notifications_for(&self, user: &UserId) -> StoreResult<Vec<Notification>> {
        let mut out: Vec<Notification> = self
            .inner
            .read()
            .notifications
            .iter()
            .filter(|n| n.target_user_id == *user)
            .cloned()
            .collect();
        out.sort_by_key(|n| (n.is_read, Reverse(n.created_at)));
        Ok(out)
    }

    async fn mark_notification_read(&self, id: &NotificationId) -> StoreResult<Notification> {
        let mut g = self.inner.write();
        let n = g
            .notifications
            .iter_mut()
            .find(|n| n.id == *id)
            .ok_or_else(|| StoreError::not_found("notification", id))?;
        n.is_read = true;
        Ok(n.clone())
    }

    async fn mark_all_read(&self, user: &UserId) -> StoreResult<usize> {
        let mut g = self.inner.write();
        let mut changed = 0;
        for n in g
            .notifications
            .iter_mut()
            .filter(|n| n.target_user_id == *user && !n.is_read)
        {
            n.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete_notification(&self, id: &NotificationId) -> StoreResult<Notification> {
        remove(&mut self.inner.write().notifications, "notification", &id.0, |n| n.id == *id)
    }

    async fn delete_notifications_for(&self, user: &UserId) -> StoreResult<usize> {
        Ok(remove_all(&mut self.inner.write().notifications, |n| n.target_user_id == *user))
    }

    async fn append_snapshot(&self, snapshot: ReportSnapshot) -> StoreResult<ReportSnapshot> {
        self.inner.write().snapshots.push(snapshot.clone());
        Ok(snapshot)
    }

    async fn previous_snapshot(&self) -> StoreResult<Option<ReportSnapshot>> {
        let g = self.inner.read();
        Ok(g.snapshots.len().checked_sub(2).map(|i| g.snapshots[i].clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use types::{Day, EntryStatus, ReportMetrics, Severity, SnapshotId, TimeSlot};

    fn entry(course: &str, year: u32, slot: TimeSlot) -> ScheduleEntry {
        ScheduleEntry {
            id: EntryId::generate(),
            course_name: course.into(),
            course_year: year,
            day: Day::Monday,
            time_slot: slot,
            subject_name: "Fisica".into(),
            teacher_name: "Mario Rossi".into(),
            classroom_name: "A1".into(),
            status: EntryStatus::Pending,
        }
    }

    fn classroom(name: &str) -> Classroom {
        Classroom {
            id: ClassroomId::generate(),
            name: name.into(),
            floor: 1,
            capacity: 30,
            has_projector: true,
            has_pc: false,
        }
    }

    fn notification(user: &UserId, read: bool, age_mins: i64) -> Notification {
        Notification {
            id: NotificationId::generate(),
            target_user_id: user.clone(),
            target_role: Role::Admin,
            title: format!("t{age_mins}"),
            message: String::new(),
            severity: Severity::Info,
            is_read: read,
            created_at: Utc::now() - Duration::minutes(age_mins),
            ref_id: None,
            ref_model: None,
        }
    }

    #[tokio::test]
    async fn unique_name_is_enforced_on_insert_and_update() {
        let store = InMemStore::new();
        store.insert_classroom(classroom("A1")).await.unwrap();
        let b4 = store.insert_classroom(classroom("B4")).await.unwrap();

        assert_eq!(
            store.insert_classroom(classroom("A1")).await.unwrap_err(),
            StoreError::Duplicate("name")
        );
        let renamed = Classroom {
            name: "A1".into(),
            ..b4.clone()
        };
        assert_eq!(
            store.update_classroom(renamed).await.unwrap_err(),
            StoreError::Duplicate("name")
        );
        // Updating a record without changing its own unique field is fine.
        let bigger = Classroom { capacity: 120, ..b4 };
        assert_eq!(store.update_classroom(bigger).await.unwrap().capacity, 120);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = InMemStore::new();
        let err = store.delete_entry(&EntryId("nope".into())).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "schedule entry", .. }));
    }

    #[tokio::test]
    async fn replace_course_entries_leaves_other_courses_alone() {
        let store = InMemStore::new();
        store.insert_entry(entry("Informatica", 1, TimeSlot::Nine)).await.unwrap();
        store.insert_entry(entry("Informatica", 2, TimeSlot::Nine)).await.unwrap();

        let key = CourseKey::new("Informatica", 1);
        let fresh = vec![entry("Informatica", 1, TimeSlot::Eleven), entry("Informatica", 1, TimeSlot::Sixteen)];
        store.replace_course_entries(&key, fresh).await.unwrap();

        let mine = store.find_entries(&EntryFilter::course(&key)).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|e| e.time_slot != TimeSlot::Nine));
        let all = store.find_entries(&EntryFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn notifications_list_unread_first_then_newest() {
        let store = InMemStore::new();
        let me = UserId::generate();
        for (read, age) in [(true, 1), (false, 30), (false, 5), (true, 60)] {
            store.insert_notification(notification(&me, read, age)).await.unwrap();
        }
        store
            .insert_notification(notification(&UserId::generate(), false, 0))
            .await
            .unwrap();

        let titles: Vec<_> = store
            .notifications_for(&me)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["t5", "t30", "t1", "t60"]);

        assert_eq!(store.mark_all_read(&me).await.unwrap(), 2);
        assert_eq!(store.mark_all_read(&me).await.unwrap(), 0);
        assert_eq!(store.delete_notifications_for(&me).await.unwrap(), 4);
        assert!(store.notifications_for(&me).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn previous_snapshot_is_second_most_recent() {
        let store = InMemStore::new();
        let snap = |efficiency| ReportSnapshot {
            id: SnapshotId::generate(),
            timestamp: Utc::now(),
            metrics: ReportMetrics {
                efficiency,
                ..ReportMetrics::default()
            },
        };
        assert!(store.previous_snapshot().await.unwrap().is_none());
        store.append_snapshot(snap(10)).await.unwrap();
        assert!(store.previous_snapshot().await.unwrap().is_none());
        store.append_snapshot(snap(20)).await.unwrap();
        store.append_snapshot(snap(30)).await.unwrap();
        assert_eq!(store.previous_snapshot().await.unwrap().unwrap().metrics.efficiency, 20);
    }

    #[tokio::test]
    async fn pulling_a_subject_touches_only_its_teachers() {
        let store = InMemStore::new();
        for (email, subjects) in [("a@x.it", vec!["Fisica", "Statistica"]), ("b@x.it", vec!["Statistica"])] {
            store
                .insert_teacher(Teacher {
                    id: TeacherId::generate(),
                    name: email.into(),
                    email: email.into(),
                    subjects: subjects.into_iter().map(String::from).collect(),
                    max_weekly_hours: 18,
                })
                .await
                .unwrap();
        }
        assert_eq!(store.pull_subject_from_teachers("Fisica").await.unwrap(), 1);
        let teachers = store.list_teachers().await.unwrap();
        assert!(teachers.iter().all(|t| !t.teaches("Fisica")));
        assert!(teachers.iter().all(|t| t.teaches("Statistica")));
    }
}
