use serde::{Deserialize, Serialize};

use crate::model::ids::EquipmentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentCategory {
    /// Worn or carried by each person on the ice.
    Personal,
    /// Used to reach or test ice for someone else.
    Rescue,
    /// Needed after getting out of the water.
    Survival,
}

impl EquipmentCategory {
    pub const ALL: [EquipmentCategory; 3] = [
        EquipmentCategory::Personal,
        EquipmentCategory::Rescue,
        EquipmentCategory::Survival,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            EquipmentCategory::Personal => "Personal",
            EquipmentCategory::Rescue => "Rescue",
            EquipmentCategory::Survival => "Survival",
        }
    }
}

/// An item on the pre-trip equipment checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub id: EquipmentId,
    pub name: String,
    pub description: String,
    pub category: EquipmentCategory,
    pub essential: bool,
}
