use crate::notify::{notify_schedule_change, ScheduleChange};
use crate::store::{DomainStore, StoreResult};
use tracing::info;
use types::{CourseKey, ScheduleEntry};

/// Replaces the course's timetable with `entries` and announces each new lesson.
///
/// The swap goes through [`DomainStore::replace_course_entries`], so a failed
/// commit leaves the previous timetable in place.
pub async fn commit_schedule<S: DomainStore + ?Sized>(
    store: &S,
    course: &CourseKey,
    entries: Vec<ScheduleEntry>,
) -> StoreResult<Vec<ScheduleEntry>> {
    let saved = store.replace_course_entries(course, entries).await?;
    info!(course = %course, lessons = saved.len(), "timetable committed");
    for entry in &saved {
        notify_schedule_change(store, entry, ScheduleChange::Created).await;
    }
    Ok(saved)
}
