use std::collections::BTreeSet;

use crate::model::ids::EquipmentId;

/// Which equipment items the user has ticked off. Independent of `UserProgress`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EquipmentChecklist {
    checked: BTreeSet<EquipmentId>,
}

impl EquipmentChecklist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_persisted(checked: impl IntoIterator<Item = EquipmentId>) -> Self {
        Self {
            checked: checked.into_iter().collect(),
        }
    }

    /// Flips the item and returns whether it is now checked.
    pub fn toggle(&mut self, item: EquipmentId) -> bool {
        if self.checked.remove(&item) {
            false
        } else {
            self.checked.insert(item);
            true
        }
    }

    pub fn clear(&mut self) {
        self.checked.clear();
    }

    #[must_use]
    pub fn is_checked(&self, item: &EquipmentId) -> bool {
        self.checked.contains(item)
    }

    #[must_use]
    pub fn checked(&self) -> &BTreeSet<EquipmentId> {
        &self.checked
    }

    #[must_use]
    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    pub fn retain_known(&mut self, is_known: impl Fn(&EquipmentId) -> bool) -> usize {
        let before = self.checked.len();
        self.checked.retain(|id| is_known(id));
        before - self.checked.len()
    }
}
