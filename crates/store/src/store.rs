//! Template-config store boundary (PRD-40).

use async_trait::async_trait;
use inkpress_core::types::DbId;

use crate::error::StoreError;
use crate::record::{SaveTemplateConfig, TemplateConfigRecord};

/// Persistence boundary for template configurations.
///
/// Implementations keep one record per `(product_id, config_name)` pair.
/// The trait abstracts the backing store so the services and tests run
/// against [`MemoryTemplateConfigStore`](crate::memory::MemoryTemplateConfigStore).
#[async_trait]
pub trait TemplateConfigStore: Send + Sync {
    /// Insert or update the record for `(dto.product_id, dto.config_name)`.
    ///
    /// An update keeps the original `id` and `created_at` and bumps
    /// `updated_at`.
    async fn save(&self, dto: SaveTemplateConfig) -> Result<TemplateConfigRecord, StoreError>;

    /// Fetch one record. `None` when the product has no config under that
    /// name.
    async fn load(
        &self,
        product_id: DbId,
        config_name: &str,
    ) -> Result<Option<TemplateConfigRecord>, StoreError>;

    /// All records of one product, ordered by config name.
    async fn list_for_product(
        &self,
        product_id: DbId,
    ) -> Result<Vec<TemplateConfigRecord>, StoreError>;

    /// Remove all records of one product (product deletion cascade).
    ///
    /// Returns how many records were removed.
    async fn delete_for_product(&self, product_id: DbId) -> Result<u64, StoreError>;
}
