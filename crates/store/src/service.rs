//! Simplified-config persistence services (PRD-12, PRD-40).
//!
//! Bridges the strict in-memory model and the stored JSON documents.
//! Outbound configs serialize as-is; inbound documents pass through the
//! legacy decoding adapter and the range reconciler before an editing
//! session ever sees them.

use inkpress_core::legacy::{self, LegacyReport};
use inkpress_core::ranges::{self, ReconcileReport};
use inkpress_core::simplified::SimplifiedConfig;
use inkpress_core::types::DbId;
use serde::Serialize;

use crate::error::StoreError;
use crate::record::{SaveTemplateConfig, TemplateConfigRecord};
use crate::store::TemplateConfigStore;

/// Config slot the simplified editor persists to.
pub const SIMPLIFIED_CONFIG_NAME: &str = "simplified";

/// What load-time normalization did to a stored document. All-zero for
/// documents written by the current model.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LoadOutcome {
    pub legacy: LegacyReport,
    pub reconciled: ReconcileReport,
}

impl LoadOutcome {
    pub fn is_clean(&self) -> bool {
        self.legacy.is_clean() && self.reconciled.is_clean()
    }
}

/// Persist a product's simplified config under the standard slot.
///
/// The sibling `constraints` document of an existing record is carried
/// over unchanged.
pub async fn save_simplified(
    store: &dyn TemplateConfigStore,
    product_id: DbId,
    config: &SimplifiedConfig,
) -> Result<TemplateConfigRecord, StoreError> {
    let config_data = serde_json::to_value(config)?;
    let constraints = store
        .load(product_id, SIMPLIFIED_CONFIG_NAME)
        .await?
        .and_then(|r| r.constraints);
    let record = store
        .save(SaveTemplateConfig {
            product_id,
            config_name: SIMPLIFIED_CONFIG_NAME.to_string(),
            config_data,
            constraints,
        })
        .await?;
    tracing::debug!(product_id, record_id = record.id, "Saved simplified config");
    Ok(record)
}

/// Load a product's simplified config, decoding legacy shapes and repairing
/// divergent price tables on the way in. `None` when the product has
/// nothing saved yet.
pub async fn load_simplified(
    store: &dyn TemplateConfigStore,
    product_id: DbId,
) -> Result<Option<(SimplifiedConfig, LoadOutcome)>, StoreError> {
    let record = match store.load(product_id, SIMPLIFIED_CONFIG_NAME).await? {
        Some(r) => r,
        None => return Ok(None),
    };
    let (mut config, legacy_report) = legacy::decode_simplified(&record.config_data)?;
    let reconciled = ranges::reconcile(&mut config);
    let outcome = LoadOutcome {
        legacy: legacy_report,
        reconciled,
    };
    if !outcome.legacy.is_clean() {
        tracing::warn!(
            product_id,
            finishing_tiers_dropped = outcome.legacy.finishing_tiers_dropped,
            options_strings_parsed = outcome.legacy.options_strings_parsed,
            "Decoded legacy shapes in stored config"
        );
    }
    if !outcome.reconciled.is_clean() {
        tracing::warn!(
            product_id,
            sizes_reconciled = outcome.reconciled.sizes_reconciled,
            defaults_repaired = outcome.reconciled.defaults_repaired,
            "Repaired divergent config during load"
        );
    }
    tracing::debug!(product_id, record_id = record.id, "Loaded simplified config");
    Ok(Some((config, outcome)))
}
