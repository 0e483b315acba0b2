use serde::{Deserialize, Serialize};

use crate::actor_framework::Entity;
use super::RecordId;

/// Represents a product on sale at the register.
///
/// `price` is expressed in the smallest currency unit and may be negative
/// (discount lines); `stock` may not. Fields missing from a
/// request body decode to zero values, and the Indonesian field names used by
/// older clients (`nama`, `harga`, `stok`) are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: RecordId,
    #[serde(alias = "nama")]
    pub name: String,
    #[serde(alias = "harga")]
    pub price: i64,
    #[serde(alias = "stok")]
    pub stock: i64,
}

impl Product {
    /// Creates a new Product. The id is left at zero and assigned by the store.
    pub fn new(name: impl Into<String>, price: i64, stock: i64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            price,
            stock,
        }
    }

    /// Catalog loaded at startup when seeding is enabled.
    pub fn seed() -> Vec<Self> {
        vec![
            Self { id: 1, name: "Indomie Godog".into(), price: 3500, stock: 10 },
            Self { id: 2, name: "Vit 1000ml".into(), price: 3000, stock: 40 },
            Self { id: 3, name: "kecap".into(), price: 12000, stock: 20 },
        ]
    }
}

impl Entity for Product {
    const KIND: &'static str = "product";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&mut self) -> Result<(), String> {
        if self.stock < 0 {
            return Err(format!("stock must not be negative, got {}", self.stock));
        }
        Ok(())
    }
}
