use std::sync::Arc;

use rescue_core::Catalog;
use storage::repository::Storage;

use crate::Clock;
use crate::assessment::AssessmentService;
use crate::checklist_service::ChecklistService;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;
use crate::scenarios::ScenarioService;

/// Assembles app-facing services over one catalog and one storage backend.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    progress: Arc<ProgressService>,
    assessment: Arc<AssessmentService>,
    scenarios: Arc<ScenarioService>,
    checklist: Arc<ChecklistService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// bundled content is invalid.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(Catalog::builtin()?);
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(catalog, &storage, clock).await)
    }

    /// Build services backed by in-memory storage and the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Catalog` if the bundled content is invalid.
    pub async fn in_memory(clock: Clock) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(Catalog::builtin()?);
        let storage = Storage::in_memory();
        Ok(Self::from_storage(catalog, &storage, clock).await)
    }

    /// Wire services over an existing catalog and storage.
    pub async fn from_storage(catalog: Arc<Catalog>, storage: &Storage, clock: Clock) -> Self {
        let progress = Arc::new(
            ProgressService::load(Arc::clone(&catalog), Arc::clone(&storage.progress)).await,
        );
        let checklist = Arc::new(
            ChecklistService::load(Arc::clone(&catalog), Arc::clone(&storage.checklist)).await,
        );
        let assessment = Arc::new(AssessmentService::new(
            clock,
            Arc::clone(&catalog),
            Arc::clone(&progress),
        ));
        let scenarios = Arc::new(ScenarioService::new(
            clock,
            Arc::clone(&catalog),
            Arc::clone(&progress),
        ));

        Self {
            catalog,
            progress,
            assessment,
            scenarios,
            checklist,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn assessment(&self) -> Arc<AssessmentService> {
        Arc::clone(&self.assessment)
    }

    #[must_use]
    pub fn scenarios(&self) -> Arc<ScenarioService> {
        Arc::clone(&self.scenarios)
    }

    #[must_use]
    pub fn checklist(&self) -> Arc<ChecklistService> {
        Arc::clone(&self.checklist)
    }
}
