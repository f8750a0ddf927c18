//! Common-range propagation across a size's price tables (PRD-12).
//!
//! Every print-price variant of one size must expose the same set of
//! quantity breakpoints (the "common ranges") even though each variant
//! stores its own price per breakpoint. The common ranges are read from the
//! size's first print variant; changing them remaps every linked price table
//! onto the new boundaries, keeping prices where a boundary persists and
//! zero-filling new slices. Stored records that drifted from this invariant
//! are repaired on load by [`reconcile`].

use serde::Serialize;

use crate::simplified::{SimplifiedConfig, SizeConfig};
use crate::tier::{self, Tier};

// ---------------------------------------------------------------------------
// Common ranges
// ---------------------------------------------------------------------------

/// The shared boundary structure of a size: the normalized tiers of its
/// first print-price variant, or the default tier list when the size has no
/// print variants yet.
pub fn common_ranges(size: &SizeConfig) -> Vec<Tier> {
    match size.print_prices.first() {
        Some(variant) => tier::normalize(variant.tiers.clone()),
        None => tier::default_tiers(),
    }
}

/// Re-shape every price table of `size` onto the boundaries of `new_ranges`.
///
/// The operation is purely structural: prices inside `new_ranges` are not
/// copied anywhere. Each print variant and each non-empty material override
/// keeps the price it previously held for a surviving `min_qty` and gets
/// zero for a newly introduced one. A size without print variants has no
/// table to carry the boundaries, so nothing is stored.
pub fn update_size_ranges(size: &mut SizeConfig, new_ranges: &[Tier]) {
    let structure = tier::normalize(new_ranges.to_vec());
    for variant in &mut size.print_prices {
        variant.tiers = tier::remap(&structure, &variant.tiers);
    }
    for material in &mut size.material_prices {
        if !material.tiers.is_empty() {
            material.tiers = tier::remap(&structure, &material.tiers);
        }
    }
}

// ---------------------------------------------------------------------------
// Divergence detection & repair
// ---------------------------------------------------------------------------

/// Whether any price table of `size` is out of step with the common ranges:
/// a differing boundary set, or a tier list that is not in canonical
/// (sorted, contiguous, open-ended) form.
pub fn ranges_diverged(size: &SizeConfig) -> bool {
    if size.print_prices.is_empty() {
        return false;
    }
    let common = common_ranges(size);
    let bounds = tier::boundary_set(&common);
    let divergent_print = size
        .print_prices
        .iter()
        .any(|v| tier::boundary_set(&v.tiers) != bounds || tier::normalize(v.tiers.clone()) != v.tiers);
    let divergent_material = size
        .material_prices
        .iter()
        .filter(|m| !m.tiers.is_empty())
        .any(|m| tier::boundary_set(&m.tiers) != bounds || tier::normalize(m.tiers.clone()) != m.tiers);
    divergent_print || divergent_material
}

/// Repair a size whose price tables drifted apart by re-running the
/// propagation against the first print variant's boundaries. Returns `true`
/// when a repair was applied.
pub fn reconcile_size(size: &mut SizeConfig) -> bool {
    if !ranges_diverged(size) {
        return false;
    }
    let common = common_ranges(size);
    update_size_ranges(size, &common);
    true
}

/// Outcome of a whole-config reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Sizes whose price tables were re-propagated.
    pub sizes_reconciled: usize,
    /// Whether the exactly-one-default type invariant had to be repaired.
    pub defaults_repaired: bool,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.sizes_reconciled == 0 && !self.defaults_repaired
    }
}

/// Walk a freshly loaded configuration and repair every size (flat and
/// per-type) plus the default-type flag. Divergent boundary sets only occur
/// in stored data (e.g. a partially applied edit); in-memory mutation always
/// goes through [`update_size_ranges`].
pub fn reconcile(config: &mut SimplifiedConfig) -> ReconcileReport {
    let mut report = ReconcileReport::default();
    for size in &mut config.sizes {
        if reconcile_size(size) {
            report.sizes_reconciled += 1;
        }
    }
    for type_config in config.type_configs.values_mut() {
        for size in &mut type_config.sizes {
            if reconcile_size(size) {
                report.sizes_reconciled += 1;
            }
        }
    }
    report.defaults_repaired = config.ensure_single_default();
    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
