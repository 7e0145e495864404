use std::{
    sync::{
        mpsc,
        Arc,
    },
    thread,
};

use tokio::runtime::{
    Handle,
    Runtime,
};
use tracing::{
    debug,
    info,
    warn,
};

use super::{
    RepaintHook,
    TaskResult,
};
use crate::{
    content::{
        ContentSource,
        ContentStore,
    },
    core::LectioError,
};

pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
    repaint: Option<RepaintHook>,
    // Bumped by every `load_catalog`; results of earlier loads are dropped.
    catalog_generation: u64,
}

impl TaskManager {
    pub fn new() -> Result<Self, LectioError> {
        let runtime = Arc::new(Runtime::new()?);

        let (sender, receiver) = mpsc::channel();

        Ok(Self { runtime, receiver, sender, repaint: None, catalog_generation: 0 })
    }

    pub fn with_repaint(mut self, repaint: RepaintHook) -> Self {
        self.repaint = Some(repaint);
        self
    }

    /// Handle for tasks owned elsewhere, such as the skim ticker.
    pub fn runtime_handle(&self) -> Handle {
        self.runtime.handle().clone()
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            if result.generation() != self.catalog_generation {
                debug!(
                    task = result.task_type(),
                    generation = result.generation(),
                    current = self.catalog_generation,
                    "stale catalog result dropped"
                );
                continue;
            }
            results.push(result);
        }

        results
    }

    fn task_context(&self) -> (mpsc::Sender<TaskResult>, Arc<Runtime>, Option<RepaintHook>) {
        (self.sender.clone(), self.runtime.clone(), self.repaint.clone())
    }

    /// Starts loading `source`. Supersedes any load still in flight.
    pub fn load_catalog(&mut self, source: ContentSource) {
        self.catalog_generation = self.catalog_generation.wrapping_add(1);
        let generation = self.catalog_generation;
        let (sender, runtime, repaint) = self.task_context();

        thread::spawn(move || {
            let _ = sender.send(TaskResult::LoadingMessage {
                generation,
                message: format!("Loading {}...", source),
            });
            notify(&repaint);

            let result = runtime.block_on(ContentStore::fetch(&source));

            match &result {
                Ok(store) => info!(source = %source, books = store.books().len(), "catalog ready"),
                Err(e) => warn!(source = %source, error = %e, "catalog load failed"),
            }

            let _ = sender.send(TaskResult::CatalogLoaded { generation, source, result });
            notify(&repaint);
        });
    }
}

fn notify(repaint: &Option<RepaintHook>) {
    if let Some(repaint) = repaint {
        repaint();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        path::PathBuf,
        time::{
            Duration,
            Instant,
        },
    };

    use uuid::Uuid;

    use super::*;
    use crate::content::tests::SAMPLE_CATALOG;

    fn missing_source() -> ContentSource {
        ContentSource::File(PathBuf::from("/nonexistent/lectio/books.json"))
    }

    fn next_catalog(manager: &mut TaskManager) -> Option<Result<ContentStore, LectioError>> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            for result in manager.poll_results() {
                if let TaskResult::CatalogLoaded { result, .. } = result {
                    return Some(result);
                }
            }
            thread::sleep(Duration::from_millis(10));
        }
        None
    }

    #[test]
    fn test_failed_load_is_reported() {
        let mut manager = TaskManager::new().unwrap();
        manager.load_catalog(missing_source());

        let loaded = next_catalog(&mut manager);
        assert!(matches!(loaded, Some(Err(LectioError::ContentFetchFailed(_)))));
    }

    #[test]
    fn test_superseded_load_is_dropped() {
        let path = std::env::temp_dir().join(format!("lectio-{}.json", Uuid::new_v4()));
        fs::write(&path, SAMPLE_CATALOG).unwrap();

        let mut manager = TaskManager::new().unwrap();
        manager.load_catalog(missing_source());
        manager.load_catalog(ContentSource::File(path.clone()));

        let loaded = next_catalog(&mut manager);
        fs::remove_file(&path).unwrap();

        let store = loaded.unwrap().unwrap();
        assert_eq!(store.books().len(), 2);
        assert!(manager.poll_results().is_empty());
    }
}
