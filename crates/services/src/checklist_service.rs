use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;

use rescue_core::Catalog;
use rescue_core::model::{EquipmentChecklist, EquipmentId};
use storage::repository::{ChecklistRecord, ChecklistRepository};

use crate::error::ChecklistError;

/// Counts for the equipment checklist screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistSummary {
    pub checked: usize,
    pub total: usize,
    pub essential_checked: usize,
    pub essential_total: usize,
}

impl ChecklistSummary {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.checked == self.total
    }

    #[must_use]
    pub fn essentials_complete(&self) -> bool {
        self.essential_checked == self.essential_total
    }
}

/// Owns the equipment checklist, persisted separately from progress.
pub struct ChecklistService {
    catalog: Arc<Catalog>,
    repo: Arc<dyn ChecklistRepository>,
    state: Mutex<EquipmentChecklist>,
    /// Held from mutation through persist.
    write_gate: AsyncMutex<()>,
}

impl ChecklistService {
    /// Load the persisted checklist. Corrupt or missing data yields an empty one.
    pub async fn load(catalog: Arc<Catalog>, repo: Arc<dyn ChecklistRepository>) -> Self {
        let mut checklist = match repo.load_checklist().await {
            Ok(record) => record
                .map(ChecklistRecord::into_checklist)
                .unwrap_or_default(),
            Err(err) => {
                log::warn!("failed to load equipment checklist, starting empty: {err}");
                EquipmentChecklist::new()
            }
        };
        let dropped = checklist.retain_known(|id| catalog.equipment_item(id).is_some());
        if dropped > 0 {
            log::debug!("dropped {dropped} unknown equipment ids");
        }

        Self {
            catalog,
            repo,
            state: Mutex::new(checklist),
            write_gate: AsyncMutex::new(()),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> EquipmentChecklist {
        self.lock().clone()
    }

    #[must_use]
    pub fn is_checked(&self, item: &EquipmentId) -> bool {
        self.lock().is_checked(item)
    }

    /// Flip an item and return whether it is now checked.
    ///
    /// # Errors
    ///
    /// Returns `ChecklistError::UnknownItem` if the catalog has no such item.
    pub async fn toggle(&self, item: &EquipmentId) -> Result<bool, ChecklistError> {
        if self.catalog.equipment_item(item).is_none() {
            return Err(ChecklistError::UnknownItem(item.clone()));
        }
        let _gate = self.write_gate.lock().await;
        let (checked, record) = {
            let mut guard = self.lock();
            let checked = guard.toggle(item.clone());
            (checked, ChecklistRecord::from_checklist(&guard))
        };
        log::debug!("equipment {item} checked: {checked}");
        self.persist(&record).await;
        Ok(checked)
    }

    /// Uncheck every item.
    pub async fn reset(&self) {
        let _gate = self.write_gate.lock().await;
        let record = {
            let mut guard = self.lock();
            guard.clear();
            ChecklistRecord::from_checklist(&guard)
        };
        self.persist(&record).await;
    }

    #[must_use]
    pub fn summary(&self) -> ChecklistSummary {
        let checklist = self.lock();
        let items = self.catalog.equipment();
        let essentials = || items.iter().filter(|item| item.essential);
        ChecklistSummary {
            checked: items.iter().filter(|i| checklist.is_checked(&i.id)).count(),
            total: items.len(),
            essential_checked: essentials().filter(|i| checklist.is_checked(&i.id)).count(),
            essential_total: essentials().count(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EquipmentChecklist> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn persist(&self, record: &ChecklistRecord) {
        if let Err(err) = self.repo.save_checklist(record).await {
            log::warn!("failed to persist equipment checklist: {err}");
        }
    }
}
