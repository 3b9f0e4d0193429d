use intellipark_core::engine::LifecycleEngine;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<LifecycleEngine>,
}
