//! Orchestration around the engine: per-course serialization, store
//! snapshot, commit, report history, and the validated catalog operations.

pub mod catalog;
pub mod error;
pub mod locks;
pub mod rng;

use chrono::Utc;
use sched_core::metrics;
use sched_core::validate;
use sched_core::writer::commit_schedule;
use sched_core::{DomainStore, EntryFilter, GenerationInput, GenerationOptions, Solver};
use std::sync::Arc;
use tracing::{info, warn};
use types::{
    CourseKey, GenerateRequest, ReportData, ReportMetrics, ReportSnapshot, ScheduleEntry,
    SnapshotId,
};

pub use catalog::Catalog;
pub use error::{ServiceError, ServiceResult};
pub use locks::CourseLocks;
pub use rng::RngSource;

/// Result of a committed generation run.
#[derive(Clone, Debug)]
pub struct Generated {
    pub course: CourseKey,
    pub entries: Vec<ScheduleEntry>,
    /// `None` when the report snapshot could not be appended; the
    /// timetable is committed regardless.
    pub metrics: Option<ReportMetrics>,
}

impl Generated {
    pub fn message(&self) -> String {
        format!("Orario generato con successo ({} lezioni).", self.entries.len())
    }
}

pub struct Scheduler<S: DomainStore, V: Solver> {
    store: Arc<S>,
    solver: V,
    locks: CourseLocks,
    rng: RngSource,
}

impl<S: DomainStore, V: Solver> Scheduler<S, V> {
    pub fn new(store: Arc<S>, solver: V, rng: RngSource) -> Self {
        Self {
            store,
            solver,
            locks: CourseLocks::new(),
            rng,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Rebuilds the timetable of one course+year.
    ///
    /// Runs for the same course are serialized. On placement failure nothing
    /// is written and the previous timetable stays. On success the new
    /// entries replace the old ones and a report snapshot is appended. A
    /// failed snapshot is logged and does not fail the run.
    pub async fn generate(&self, req: &GenerateRequest) -> ServiceResult<Generated> {
        let course = validate::generate_request(req)?;
        let _guard = self.locks.acquire(&course).await;

        let input = self.load_input(&course).await?;
        let opts = GenerationOptions {
            course: course.clone(),
            optimization_type: req.optimization_type.clone(),
            respect_preferences: req.respect_preferences,
        };
        let mut rng = self.rng.next_rng();
        let entries = self.solver.solve(&input, &opts, &mut rng).map_err(|e| {
            warn!(course = %course, subject = %e.subject, "generation failed");
            e
        })?;

        let entries = commit_schedule(self.store.as_ref(), &course, entries).await?;
        let metrics = match self.record_snapshot().await {
            Ok(m) => {
                info!(course = %course, lessons = entries.len(), efficiency = m.efficiency, "generation complete");
                Some(m)
            }
            Err(e) => {
                warn!(course = %course, lessons = entries.len(), error = %e, "generation committed, report snapshot failed");
                None
            }
        };
        Ok(Generated {
            course,
            entries,
            metrics,
        })
    }

    async fn load_input(&self, course: &CourseKey) -> ServiceResult<GenerationInput> {
        let s = self.store.as_ref();
        Ok(GenerationInput {
            subjects: s.subjects_for_course(&course.reference()).await?,
            teachers: s.list_teachers().await?,
            classrooms: s.list_classrooms().await?,
            constraints: s.list_constraints().await?,
            preferences: s.list_preferences().await?,
            existing: s.find_entries(&EntryFilter::default()).await?,
        })
    }

    async fn current_metrics(&self) -> ServiceResult<ReportMetrics> {
        let s = self.store.as_ref();
        let schedule = s.find_entries(&EntryFilter::default()).await?;
        Ok(metrics::compute_metrics(
            &s.list_subjects().await?,
            &s.list_teachers().await?,
            &s.list_preferences().await?,
            &schedule,
        ))
    }

    /// Computes metrics over the whole store and appends them to the history.
    pub async fn record_snapshot(&self) -> ServiceResult<ReportMetrics> {
        let metrics = self.current_metrics().await?;
        self.store
            .append_snapshot(ReportSnapshot {
                id: SnapshotId::generate(),
                timestamp: Utc::now(),
                metrics: metrics.clone(),
            })
            .await?;
        Ok(metrics)
    }

    pub async fn report_data(&self) -> ServiceResult<ReportData> {
        let s = self.store.as_ref();
        let metrics = self.current_metrics().await?;
        let previous = s.previous_snapshot().await?;
        let schedule = s.find_entries(&EntryFilter::default()).await?;
        Ok(ReportData {
            trends: metrics::trends(&metrics, previous.as_ref().map(|p| &p.metrics)),
            classroom_usage: metrics::classroom_usage(&s.list_classrooms().await?, &schedule),
            teacher_workload: metrics::teacher_workload(&s.list_teachers().await?, &schedule),
            metrics,
        })
    }
}
