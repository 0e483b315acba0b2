use serde::{Deserialize, Serialize};

use crate::actor_framework::Entity;
use super::RecordId;

/// A grouping of products, e.g. "Makanan".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: RecordId,
    pub name: String,
    pub description: String,
}

impl Category {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn seed() -> Vec<Self> {
        vec![
            Self {
                id: 1,
                name: "Makanan".into(),
                description: "Kategori makanan dan minuman".into(),
            },
            Self {
                id: 2,
                name: "Kebutuhan Rumah".into(),
                description: "Perlengkapan rumah tangga".into(),
            },
        ]
    }
}

impl Entity for Category {
    const KIND: &'static str = "category";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    /// Trims the name in place; a name that is blank after trimming is rejected.
    fn validate(&mut self) -> Result<(), String> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            return Err("name is required".to_string());
        }
        if trimmed.len() != self.name.len() {
            self.name = trimmed.to_string();
        }
        Ok(())
    }
}
