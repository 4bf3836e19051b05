//! Client-facing product entity.

use serde::{Deserialize, Serialize};

use crate::normalize::{FieldNormalizer, JsonRecord};

/// A catalog item as seen by clients.
///
/// Identity, name and description come from the catalog system; `stock`
/// comes exclusively from the stock system. Values are rebuilt on every
/// merge and never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    /// Stable identifier. Never empty for a product returned to a client.
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Quantity on hand, 0 when the stock system has no answer.
    #[serde(default)]
    pub stock: i64,
}

impl Product {
    /// Merge a raw catalog record with a stock level.
    ///
    /// Returns `None` when the record has no usable identifier; such records
    /// are dropped rather than defaulted. A missing name becomes empty.
    pub fn from_catalog_record<R>(record: &R, stock: i64) -> Option<Self>
    where
        R: JsonRecord + ?Sized,
    {
        let id = Self::catalog_id(record)?;
        Some(Self::with_identity(id, record, stock))
    }

    /// Build a product for a known identifier from a catalog record.
    pub fn with_identity<R>(id: impl Into<String>, record: &R, stock: i64) -> Self
    where
        R: JsonRecord + ?Sized,
    {
        Self {
            id: id.into(),
            name: FieldNormalizer::string(record, "name").unwrap_or_default(),
            description: FieldNormalizer::string(record, "description"),
            stock,
        }
    }

    /// Extract the catalog identifier from a raw record.
    pub fn catalog_id<R>(record: &R) -> Option<String>
    where
        R: JsonRecord + ?Sized,
    {
        FieldNormalizer::non_blank_string(record, "id")
    }
}
