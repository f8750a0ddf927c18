//! In-memory template-config store.
//!
//! Reference implementation of [`TemplateConfigStore`] backed by a
//! mutex-guarded map. Used by tests and local tooling; ids are assigned
//! from a monotonic counter the way a serial column would.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use inkpress_core::types::DbId;

use crate::error::StoreError;
use crate::record::{SaveTemplateConfig, TemplateConfigRecord};
use crate::store::TemplateConfigStore;

type RecordMap = HashMap<(DbId, String), TemplateConfigRecord>;

#[derive(Debug)]
pub struct MemoryTemplateConfigStore {
    records: Mutex<RecordMap>,
    next_id: AtomicI64,
}

impl MemoryTemplateConfigStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, RecordMap>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Backend("memory store mutex poisoned".to_string()))
    }
}

impl Default for MemoryTemplateConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TemplateConfigStore for MemoryTemplateConfigStore {
    async fn save(&self, dto: SaveTemplateConfig) -> Result<TemplateConfigRecord, StoreError> {
        let mut records = self.lock()?;
        let key = (dto.product_id, dto.config_name.clone());
        let now = chrono::Utc::now();
        let record = match records.get(&key) {
            Some(existing) => TemplateConfigRecord {
                id: existing.id,
                product_id: dto.product_id,
                config_name: dto.config_name,
                config_data: dto.config_data,
                constraints: dto.constraints,
                created_at: existing.created_at,
                updated_at: now,
            },
            None => TemplateConfigRecord {
                id: self.next_id.fetch_add(1, Ordering::Relaxed),
                product_id: dto.product_id,
                config_name: dto.config_name,
                config_data: dto.config_data,
                constraints: dto.constraints,
                created_at: now,
                updated_at: now,
            },
        };
        records.insert(key, record.clone());
        Ok(record)
    }

    async fn load(
        &self,
        product_id: DbId,
        config_name: &str,
    ) -> Result<Option<TemplateConfigRecord>, StoreError> {
        let records = self.lock()?;
        Ok(records.get(&(product_id, config_name.to_string())).cloned())
    }

    async fn list_for_product(
        &self,
        product_id: DbId,
    ) -> Result<Vec<TemplateConfigRecord>, StoreError> {
        let records = self.lock()?;
        let mut result: Vec<TemplateConfigRecord> = records
            .values()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.config_name.cmp(&b.config_name));
        Ok(result)
    }

    async fn delete_for_product(&self, product_id: DbId) -> Result<u64, StoreError> {
        let mut records = self.lock()?;
        let before = records.len();
        records.retain(|_, r| r.product_id != product_id);
        Ok((before - records.len()) as u64)
    }
}
