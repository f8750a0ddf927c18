//! Inkpress product-configuration core.
//!
//! This crate holds the pure domain logic behind the admin template
//! editor (PRD-12, PRD-18):
//!
//! - [`tier`] — quantity-tier range algebra shared by every price table.
//! - [`simplified`] — the simplified template data model and its wire
//!   format.
//! - [`ranges`] — common-range propagation across a size's price tables
//!   and divergence repair.
//! - [`editor`] — the in-memory editing session with the admin mutations.
//! - [`catalog`] — read-only print, paper, and finishing reference data.
//! - [`legacy`] — decoding adapter for historical records (PRD-35).
//!
//! Everything here is synchronous and I/O-free; persistence lives in
//! `inkpress-store`.

pub mod catalog;
pub mod editor;
pub mod error;
pub mod legacy;
pub mod ranges;
pub mod simplified;
pub mod tier;
pub mod types;
pub mod validate;

pub use editor::EditorSession;
pub use error::CoreError;
pub use simplified::SimplifiedConfig;
pub use tier::Tier;
