use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use types::CourseKey;

/// One async mutex per course+year, created on first use and dropped again
/// once nobody holds or waits for it.
#[derive(Default)]
pub struct CourseLocks {
    inner: Mutex<HashMap<CourseKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl CourseLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, course: &CourseKey) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock();
        // Guards and waiters each keep a clone; the map's own is the last one.
        map.retain(|_, m| Arc::strong_count(m) > 1);
        map.entry(course.clone()).or_default().clone()
    }

    /// Waits until no other run holds `course`.
    pub async fn acquire(&self, course: &CourseKey) -> OwnedMutexGuard<()> {
        self.slot(course).lock_owned().await
    }
}

#[cfg(test)]
impl CourseLocks {
    fn try_acquire(&self, course: &CourseKey) -> Option<OwnedMutexGuard<()>> {
        self.slot(course).try_lock_owned().ok()
    }

    fn len(&self) -> usize {
        self.inner.lock().len()
    }
}
