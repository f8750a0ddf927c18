//! Inkpress persistence boundary.
//!
//! Stores product template configurations as JSON documents, one record
//! per `(product_id, config_name)` pair (PRD-40):
//!
//! - [`TemplateConfigStore`] — async store trait with upsert semantics.
//! - [`MemoryTemplateConfigStore`] — mutex-guarded in-memory
//!   implementation for tests and local tooling.
//! - [`service`] — save/load services bridging the strict model and the
//!   stored documents (legacy decode and range reconcile on load).

pub mod error;
pub mod memory;
pub mod record;
pub mod service;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryTemplateConfigStore;
pub use record::{SaveTemplateConfig, TemplateConfigRecord};
pub use service::{LoadOutcome, SIMPLIFIED_CONFIG_NAME};
pub use store::TemplateConfigStore;
