//! Quantity-tier range algebra (PRD-18).
//!
//! A tier list partitions order quantities into contiguous, non-overlapping
//! ranges, each carrying one unit price. Every operation here is a total pure
//! function over `Vec<Tier>`: invalid input (out-of-range index, colliding or
//! non-positive boundary, removal of the final tier) returns the list
//! unchanged instead of erroring, because callers are driven by live UI input
//! and a stray click must leave the prior valid state intact.

use serde::{Deserialize, Serialize};

use crate::types::Qty;

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// One contiguous quantity range with a unit price.
///
/// In a normalized list, tiers are sorted ascending by `min_qty`, every
/// non-final `max_qty` equals the next tier's `min_qty - 1`, and the final
/// tier is open-ended (`max_qty == None`, wire `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    #[serde(rename = "minQty")]
    pub min_qty: Qty,
    /// Inclusive upper bound; `None` means unbounded. Serialized as an
    /// explicit `null` so stored records keep the historical shape.
    #[serde(rename = "maxQty", default)]
    pub max_qty: Option<Qty>,
    #[serde(rename = "unitPrice", default)]
    pub unit_price: f64,
}

impl Tier {
    pub fn new(min_qty: Qty, max_qty: Option<Qty>, unit_price: f64) -> Self {
        Self {
            min_qty,
            max_qty,
            unit_price,
        }
    }

    /// Whether `qty` falls inside this tier's range.
    pub fn contains(&self, qty: Qty) -> bool {
        qty >= self.min_qty && self.max_qty.map_or(true, |max| qty <= max)
    }
}

/// The default tier list: a single open-ended range at price zero.
pub fn default_tiers() -> Vec<Tier> {
    vec![Tier::new(1, None, 0.0)]
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize a tier list into canonical form.
///
/// An empty list becomes the single default tier. Otherwise the list is
/// sorted ascending by `min_qty`, every non-final `max_qty` is rewritten to
/// the next tier's `min_qty - 1`, and the final tier is forced open-ended.
/// `min_qty` and `unit_price` values are never altered.
pub fn normalize(mut tiers: Vec<Tier>) -> Vec<Tier> {
    if tiers.is_empty() {
        return default_tiers();
    }
    tiers.sort_by_key(|t| t.min_qty);
    let last = tiers.len() - 1;
    for i in 0..last {
        let next_min = tiers[i + 1].min_qty;
        tiers[i].max_qty = Some(next_min - 1);
    }
    tiers[last].max_qty = None;
    tiers
}

// ---------------------------------------------------------------------------
// Boundary insertion
// ---------------------------------------------------------------------------

/// Insert a new breakpoint at `boundary`.
///
/// The tier containing `boundary` is split: the lower slice keeps its price,
/// the upper slice starts at price zero (it covers previously unpriced
/// territory). A boundary that collides with an existing `min_qty` is a
/// no-op; a boundary below the first tier becomes a new zero-priced first
/// slice. The returned list is always normalized.
pub fn add_range_boundary(tiers: Vec<Tier>, boundary: Qty) -> Vec<Tier> {
    if boundary < 1 {
        return tiers;
    }
    if tiers.is_empty() {
        if boundary == 1 {
            return default_tiers();
        }
        return vec![
            Tier::new(1, Some(boundary - 1), 0.0),
            Tier::new(boundary, None, 0.0),
        ];
    }

    let mut tiers = normalize(tiers);
    if tiers.iter().any(|t| t.min_qty == boundary) {
        return tiers;
    }

    match tiers
        .iter()
        .position(|t| t.min_qty < boundary && t.contains(boundary))
    {
        Some(i) => {
            let upper = Tier::new(boundary, tiers[i].max_qty, 0.0);
            tiers[i].max_qty = Some(boundary - 1);
            tiers.insert(i + 1, upper);
        }
        // Below the first tier. Normalization re-derives every bound, so
        // appending is enough to slot the new slice in front.
        None => tiers.push(Tier::new(boundary, None, 0.0)),
    }
    normalize(tiers)
}

// ---------------------------------------------------------------------------
// Boundary edit
// ---------------------------------------------------------------------------

/// Move the `min_qty` of the tier at `tier_index` (0-based, ascending order)
/// to `new_boundary`, patching the predecessor's upper bound to match.
///
/// No-op when the index is stale, the boundary is non-positive, or the
/// boundary collides with another tier's `min_qty`. Editing the first tier
/// is permitted and may leave the partition starting above 1 (quantities
/// below it then have no tier, which is how per-size minimum order
/// quantities surface). The returned list is always normalized; an edit
/// that crosses a neighbour simply re-sorts.
pub fn edit_range_boundary(tiers: Vec<Tier>, tier_index: usize, new_boundary: Qty) -> Vec<Tier> {
    if new_boundary < 1 {
        return tiers;
    }
    let mut tiers = normalize(tiers);
    if tier_index >= tiers.len() {
        return tiers;
    }
    if tiers
        .iter()
        .enumerate()
        .any(|(i, t)| i != tier_index && t.min_qty == new_boundary)
    {
        return tiers;
    }

    tiers[tier_index].min_qty = new_boundary;
    if tier_index > 0 {
        tiers[tier_index - 1].max_qty = Some(new_boundary - 1);
    }
    normalize(tiers)
}

// ---------------------------------------------------------------------------
// Range removal
// ---------------------------------------------------------------------------

/// Delete the tier at `tier_index` and close the gap.
///
/// Removing a non-first tier lets the predecessor absorb the removed upper
/// bound; removing the first tier re-anchors the successor at quantity 1.
/// The final remaining tier can never be removed (a list must never become
/// empty). The returned list is always normalized.
pub fn remove_range(tiers: Vec<Tier>, tier_index: usize) -> Vec<Tier> {
    let mut tiers = normalize(tiers);
    if tiers.len() <= 1 || tier_index >= tiers.len() {
        return tiers;
    }

    let removed = tiers.remove(tier_index);
    if tier_index > 0 {
        tiers[tier_index - 1].max_qty = removed.max_qty;
    } else {
        // The partition keeps covering quantities from the very start.
        tiers[0].min_qty = 1;
    }
    normalize(tiers)
}

// ---------------------------------------------------------------------------
// Lookup & remapping
// ---------------------------------------------------------------------------

/// Find the tier whose range contains `qty`.
///
/// This is the interpolation rule the pricing service applies when resolving
/// a concrete quantity against a price table: `min_qty <= qty <= (max_qty or
/// infinity)`. Returns `None` when `qty` lies below the first tier.
pub fn find_tier(tiers: &[Tier], qty: Qty) -> Option<&Tier> {
    tiers.iter().find(|t| t.contains(qty))
}

/// The ascending set of `min_qty` breakpoints in a tier list.
pub fn boundary_set(tiers: &[Tier]) -> Vec<Qty> {
    let mut bounds: Vec<Qty> = tiers.iter().map(|t| t.min_qty).collect();
    bounds.sort_unstable();
    bounds.dedup();
    bounds
}

/// Reshape a price table onto `structure`'s boundaries.
///
/// Every slice keeps the price `old` held for the same `min_qty`; newly
/// introduced boundaries start at zero. Prices inside `structure` are
/// ignored — remapping is purely structural.
pub fn remap(structure: &[Tier], old: &[Tier]) -> Vec<Tier> {
    structure
        .iter()
        .map(|t| {
            let price = old
                .iter()
                .find(|o| o.min_qty == t.min_qty)
                .map_or(0.0, |o| o.unit_price);
            Tier::new(t.min_qty, t.max_qty, price)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
