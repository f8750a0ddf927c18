/// All catalog primary keys (materials, paper types, finishing services)
/// are BIGSERIAL columns in the relational store.
pub type DbId = i64;

/// Order quantities and tier boundaries.
pub type Qty = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
