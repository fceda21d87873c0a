use std::collections::{HashMap, HashSet};
use types::{
    Classroom, ClassroomUsage, EntryStatus, Preference, PreferenceKind, ReportMetrics,
    ScheduleEntry, Subject, Teacher, TeacherId, TeacherWorkload, Trends, WorkloadStatus,
    CLASSROOM_WEEKLY_SLOTS, HOURS_PER_SLOT,
};

pub fn compute_metrics(
    subjects: &[Subject],
    teachers: &[Teacher],
    preferences: &[Preference],
    schedule: &[ScheduleEntry],
) -> ReportMetrics {
    let total_required: u32 = subjects.iter().map(|s| s.weekly_hours).sum();
    let total_hours = schedule.len() as u32 * HOURS_PER_SLOT;

    let (efficiency, coverage_percent) = if total_required > 0 {
        let ratio = f64::from(total_hours) / f64::from(total_required) * 100.0;
        ((ratio.round() as i64).min(100), (ratio * 10.0).round() / 10.0)
    } else {
        (0, 0.0)
    };

    ReportMetrics {
        efficiency,
        satisfaction: satisfaction(teachers, preferences, schedule),
        total_hours,
        total_required,
        coverage_percent,
        conflicts: schedule
            .iter()
            .filter(|e| e.status == EntryStatus::Conflict)
            .count() as u32,
    }
}

/// Share of `Preferito` slots that some entry of the same teacher occupies.
/// With no preferred slots at all the answer is 100.
pub fn satisfaction(
    teachers: &[Teacher],
    preferences: &[Preference],
    schedule: &[ScheduleEntry],
) -> i64 {
    let names: HashMap<&TeacherId, &str> =
        teachers.iter().map(|t| (&t.id, t.name.as_str())).collect();
    let taken: HashSet<_> = schedule
        .iter()
        .map(|e| (e.teacher_name.as_str(), e.day, e.time_slot))
        .collect();

    let preferred: Vec<&Preference> = preferences
        .iter()
        .filter(|p| p.kind == PreferenceKind::Preferred)
        .collect();
    if preferred.is_empty() {
        return 100;
    }
    let satisfied = preferred
        .iter()
        .filter(|p| {
            names
                .get(&p.teacher_id)
                .is_some_and(|name| taken.contains(&(*name, p.day, p.time_slot)))
        })
        .count();
    (satisfied as f64 / preferred.len() as f64 * 100.0).round() as i64
}

/// Deltas against the baseline snapshot; all zero without one.
pub fn trends(current: &ReportMetrics, previous: Option<&ReportMetrics>) -> Trends {
    let Some(prev) = previous else {
        return Trends::default();
    };
    Trends {
        efficiency: current.efficiency - prev.efficiency,
        satisfaction: current.satisfaction - prev.satisfaction,
        hours_diff: i64::from(current.total_hours) - i64::from(prev.total_hours),
        conflicts_diff: i64::from(current.conflicts) - i64::from(prev.conflicts),
    }
}

pub fn classroom_usage(classrooms: &[Classroom], schedule: &[ScheduleEntry]) -> Vec<ClassroomUsage> {
    let mut lessons: HashMap<&str, u32> = HashMap::new();
    for e in schedule {
        *lessons.entry(e.classroom_name.as_str()).or_default() += 1;
    }
    classrooms
        .iter()
        .map(|room| {
            let n = lessons.get(room.name.as_str()).copied().unwrap_or(0);
            ClassroomUsage {
                name: room.name.clone(),
                percent: (f64::from(n) / f64::from(CLASSROOM_WEEKLY_SLOTS) * 100.0).round() as u32,
            }
        })
        .collect()
}

pub fn workload_status(hours: u32, max_hours: u32) -> WorkloadStatus {
    if hours > max_hours {
        WorkloadStatus::Overloaded
    } else if i64::from(hours) < i64::from(max_hours) - 2 {
        WorkloadStatus::Underloaded
    } else {
        WorkloadStatus::Optimal
    }
}

pub fn teacher_workload(teachers: &[Teacher], schedule: &[ScheduleEntry]) -> Vec<TeacherWorkload> {
    let mut lessons: HashMap<&str, u32> = HashMap::new();
    for e in schedule {
        *lessons.entry(e.teacher_name.as_str()).or_default() += 1;
    }
    teachers
        .iter()
        .map(|t| {
            let hours = lessons.get(t.name.as_str()).copied().unwrap_or(0) * HOURS_PER_SLOT;
            TeacherWorkload {
                name: t.name.clone(),
                hours,
                max_hours: t.max_weekly_hours,
                status: workload_status(hours, t.max_weekly_hours),
            }
        })
        .collect()
}
