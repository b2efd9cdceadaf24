//! The fixed order collection the dashboard reads from.
//!
//! Orders are loaded once, validated as a whole, and then shared read-only.
//! Any integrity problem (unparseable date, duplicate id, zero quantity) is
//! reported at load time instead of surfacing later as an unsortable row.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use shared::domain::{parse_order_date, Order, OrderId, OrderStatus};
use thiserror::Error;
use tracing::debug;

const SAMPLE_ORDERS: &str = include_str!("../data/orders.toml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read order catalog '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse order catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("order at position {index} has an empty id")]
    EmptyId { index: usize },
    #[error("order id '{0}' appears more than once")]
    DuplicateId(String),
    #[error("order '{id}' has quantity {quantity}; quantity must be positive")]
    InvalidQuantity { id: String, quantity: i64 },
    #[error("order '{id}' has an unparseable order date '{value}'")]
    InvalidOrderDate { id: String, value: String },
}

/// One order as written in a catalog file, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: String,
    pub customer_name: String,
    pub pizza_type: String,
    pub quantity: i64,
    pub order_date: String,
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    orders: Vec<OrderRecord>,
}

#[derive(Debug, Clone)]
pub struct OrderCatalog {
    orders: Arc<[Order]>,
}

impl OrderCatalog {
    /// The ten-order seed set bundled with the crate.
    pub fn sample() -> Result<Self, CatalogError> {
        Self::from_toml_str(SAMPLE_ORDERS)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&raw)?;
        debug!(path = %path.display(), orders = catalog.len(), "loaded order catalog");
        Ok(catalog)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(raw)?;
        Self::from_records(file.orders)
    }

    pub fn from_records(records: Vec<OrderRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut orders = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            let id = record.id.trim().to_string();
            if id.is_empty() {
                return Err(CatalogError::EmptyId { index });
            }
            if !seen.insert(id.clone()) {
                return Err(CatalogError::DuplicateId(id));
            }
            let quantity = u32::try_from(record.quantity)
                .ok()
                .filter(|quantity| *quantity > 0)
                .ok_or_else(|| CatalogError::InvalidQuantity {
                    id: id.clone(),
                    quantity: record.quantity,
                })?;
            let order_date =
                parse_order_date(&record.order_date).ok_or_else(|| CatalogError::InvalidOrderDate {
                    id: id.clone(),
                    value: record.order_date.clone(),
                })?;

            orders.push(Order {
                id: OrderId(id),
                customer_name: record.customer_name,
                pizza_type: record.pizza_type,
                quantity,
                order_date,
                status: record.status,
            });
        }

        Ok(Self {
            orders: orders.into(),
        })
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.id.as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
