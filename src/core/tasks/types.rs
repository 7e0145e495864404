use std::sync::Arc;

use crate::{
    content::{
        ContentSource,
        ContentStore,
    },
    core::LectioError,
};

/// Wakes the UI loop after a background result or tick has been queued.
pub type RepaintHook = Arc<dyn Fn() + Send + Sync>;

/// Catalog results carry the number of the load that produced them.
#[derive(Debug)]
pub enum TaskResult {
    CatalogLoaded {
        generation: u64,
        source: ContentSource,
        result: Result<ContentStore, LectioError>,
    },
    LoadingMessage { generation: u64, message: String },
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::CatalogLoaded { .. } => "catalog_loaded",
            TaskResult::LoadingMessage { .. } => "loading_message",
        }
    }

    pub fn generation(&self) -> u64 {
        match self {
            TaskResult::CatalogLoaded { generation, .. }
            | TaskResult::LoadingMessage { generation, .. } => *generation,
        }
    }
}
