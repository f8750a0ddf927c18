//! Template-config records and DTOs (PRD-40).

use inkpress_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// A stored product template configuration.
///
/// `config_data` carries the configuration JSON document; `constraints`
/// optionally carries the external constraint document maintained alongside
/// it. One record exists per `(product_id, config_name)` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateConfigRecord {
    pub id: DbId,
    pub product_id: DbId,
    pub config_name: String,
    pub config_data: serde_json::Value,
    pub constraints: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for saving (insert or update) a template configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveTemplateConfig {
    pub product_id: DbId,
    pub config_name: String,
    pub config_data: serde_json::Value,
    pub constraints: Option<serde_json::Value>,
}
