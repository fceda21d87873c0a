use sched_core::{DomainStore, EntryFilter};
use service::{RngSource, Scheduler, ServiceError};
use solver_heur::HeurSolver;
use std::collections::HashSet;
use std::sync::Arc;
use store::InMemStore;
use types::{
    Constraint, ConstraintId, ConstraintKind, CourseKey, EntryStatus, GenerateRequest, Role,
    ScheduleEntry, Trends,
};

fn scheduler(seed: u64) -> Scheduler<InMemStore, HeurSolver> {
    Scheduler::new(
        Arc::new(InMemStore::with_demo_data()),
        HeurSolver::new(),
        RngSource::seeded(seed),
    )
}

fn request(course: &str, year: u32) -> GenerateRequest {
    GenerateRequest {
        course: course.into(),
        year,
        optimization_type: "balanced".into(),
        respect_preferences: true,
    }
}

async fn course_entries(store: &InMemStore, course: &str, year: u32) -> Vec<ScheduleEntry> {
    store
        .find_entries(&EntryFilter::course(&CourseKey::new(course, year)))
        .await
        .unwrap()
}

#[tokio::test]
async fn generates_and_commits_six_lessons_for_informatica_1() {
    let sched = scheduler(1);
    let out = sched.generate(&request("Informatica", 1)).await.unwrap();

    assert_eq!(out.entries.len(), 6);
    assert_eq!(out.message(), "Orario generato con successo (6 lezioni).");
    let stored = course_entries(sched.store(), "Informatica", 1).await;
    assert_eq!(stored.len(), 6);
    assert!(stored.iter().all(|e| e.status == EntryStatus::Pending));

    let slots: HashSet<_> = stored.iter().map(|e| (e.day, e.time_slot)).collect();
    assert_eq!(slots.len(), 6);
}

#[tokio::test]
async fn commit_notifies_admin_and_teachers() {
    let sched = scheduler(2);
    let store = sched.store().clone();
    let admin = store.find_user_by_name("Amministratore").await.unwrap().unwrap();
    let before = store.notifications_for(&admin.id).await.unwrap().len();

    let out = sched.generate(&request("Informatica", 1)).await.unwrap();

    let admin_notes = store.notifications_for(&admin.id).await.unwrap();
    assert_eq!(admin_notes.len(), before + out.entries.len());
    assert!(admin_notes.iter().any(|n| n.title == "Nuova Lezione Creata"));

    let teacher_name = &out.entries[0].teacher_name;
    let teacher = store.find_user_by_name(teacher_name).await.unwrap().unwrap();
    assert_eq!(teacher.role, Role::Docente);
    let teacher_notes = store.notifications_for(&teacher.id).await.unwrap();
    assert!(teacher_notes.iter().all(|n| n.title == "Nuovo Incarico di Lezione"));
    let expected = out
        .entries
        .iter()
        .filter(|e| &e.teacher_name == teacher_name)
        .count();
    assert_eq!(teacher_notes.len(), expected);
}

#[tokio::test]
async fn regenerating_replaces_instead_of_appending() {
    let sched = scheduler(3);
    let first = sched.generate(&request("Informatica", 1)).await.unwrap();
    let second = sched.generate(&request("Informatica", 1)).await.unwrap();

    assert_eq!(first.entries.len(), second.entries.len());
    let stored = course_entries(sched.store(), "Informatica", 1).await;
    let ids: HashSet<_> = stored.iter().map(|e| e.id.clone()).collect();
    assert_eq!(stored.len(), 6);
    assert!(second.entries.iter().all(|e| ids.contains(&e.id)));
    assert!(first.entries.iter().all(|e| !ids.contains(&e.id)));
}

#[tokio::test]
async fn placement_failure_writes_nothing_and_keeps_the_old_timetable() {
    let sched = scheduler(4);
    sched.generate(&request("Informatica", 1)).await.unwrap();
    let old = course_entries(sched.store(), "Informatica", 1).await;

    // With both lab rooms gone, Programmazione I has nowhere to go.
    let store = sched.store().clone();
    for room in store.list_classrooms().await.unwrap().into_iter().filter(|c| c.has_pc) {
        store.delete_classroom(&room.id).await.unwrap();
    }

    let err = sched.generate(&request("Informatica", 1)).await.unwrap_err();
    match err {
        ServiceError::Placement(p) => assert_eq!(p.subject, "Programmazione I"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(course_entries(&store, "Informatica", 1).await, old);
}

#[tokio::test]
async fn other_courses_never_share_teachers_or_rooms() {
    let sched = scheduler(5);
    for (course, year) in [
        ("Informatica", 1),
        ("Informatica", 2),
        ("Ingegneria Informatica", 1),
        ("Economia Aziendale", 1),
        ("Ingegneria Gestionale", 1),
    ] {
        sched.generate(&request(course, year)).await.unwrap();
    }
    let all = sched.store().find_entries(&EntryFilter::default()).await.unwrap();
    assert_eq!(all.len(), 6 + 3 + 2 + 12 + 6);

    let teachers: HashSet<_> = all.iter().map(|e| (e.day, e.time_slot, e.teacher_name.clone())).collect();
    let rooms: HashSet<_> = all.iter().map(|e| (e.day, e.time_slot, e.classroom_name.clone())).collect();
    assert_eq!(teachers.len(), all.len());
    assert_eq!(rooms.len(), all.len());
}

#[tokio::test]
async fn unknown_course_generates_nothing() {
    let sched = scheduler(6);
    let out = sched.generate(&request("Fisica Teorica", 3)).await.unwrap();
    assert!(out.entries.is_empty());
}

#[tokio::test]
async fn empty_course_name_is_a_validation_error() {
    let sched = scheduler(7);
    let err = sched.generate(&request("  ", 1)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn trends_are_zero_until_two_snapshots_exist() {
    let sched = scheduler(8);
    let empty = sched.report_data().await.unwrap();
    assert_eq!(empty.metrics.efficiency, 0);
    assert_eq!(empty.metrics.total_required, 58);
    assert_eq!(empty.trends, Trends::default());

    sched.generate(&request("Informatica", 1)).await.unwrap();
    let one = sched.report_data().await.unwrap();
    assert_eq!(one.metrics.total_hours, 12);
    assert_eq!(one.trends.hours_diff, 0);

    sched.generate(&request("Informatica", 2)).await.unwrap();
    let two = sched.report_data().await.unwrap();
    assert_eq!(two.metrics.total_hours, 18);
    // Baseline is the snapshot taken after the first run.
    assert_eq!(two.trends.hours_diff, 6);
    assert_eq!(two.classroom_usage.len(), 6);
    assert_eq!(two.teacher_workload.len(), 6);
}

#[tokio::test]
async fn soft_constraints_still_enforce_their_tag() {
    let sched = scheduler(9);
    let store = sched.store().clone();
    for c in store.list_constraints().await.unwrap() {
        store.delete_constraint(&c.id).await.unwrap();
    }
    store
        .insert_constraint(Constraint {
            id: ConstraintId::generate(),
            name: "Solo mattina".into(),
            description: String::new(),
            kind: ConstraintKind::Soft,
            tag: "preferred_mornings".into(),
        })
        .await
        .unwrap();

    let out = sched.generate(&request("Informatica", 1)).await.unwrap();
    assert!(out.entries.iter().all(|e| !e.time_slot.is_afternoon()));
}

#[tokio::test]
async fn only_the_requested_course_subjects_are_scheduled() {
    let sched = scheduler(10);
    let store = sched.store().clone();
    let own: HashSet<_> = store
        .subjects_for_course("Informatica - 2")
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert!(!own.is_empty());

    let out = sched.generate(&request("Informatica", 2)).await.unwrap();
    assert!(!out.entries.is_empty());
    assert!(out.entries.iter().all(|e| own.contains(&e.subject_name)));
}
