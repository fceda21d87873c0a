use service::{Catalog, RngSource, Scheduler};
use solver_heur::HeurSolver;
use std::sync::Arc;
use store::InMemStore;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<Scheduler<InMemStore, HeurSolver>>,
    pub catalog: Catalog<InMemStore>,
}

impl AppState {
    pub fn new(store: Arc<InMemStore>, rng: RngSource) -> Self {
        Self {
            scheduler: Arc::new(Scheduler::new(store.clone(), HeurSolver::new(), rng)),
            catalog: Catalog::new(store),
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        let store = InMemStore::new();
        if cfg.seed_demo_data {
            store.seed_demo();
        }
        Self::new(Arc::new(store), RngSource::from_seed(cfg.rng_seed))
    }
}
