//! Simplified template editing session (PRD-12).
//!
//! `EditorSession` wraps one product's [`SimplifiedConfig`] together with
//! the UI selection state (active type, active size) and the per-size
//! interaction flags. Every mutation is an in-memory state transform applied
//! atomically between renders; invalid input (stale ids, colliding
//! boundaries, removal of a structure's last element) is absorbed as a
//! no-op. The return value says whether the requested edit applied, and a
//! rejected edit leaves the prior valid state untouched.

use std::collections::HashMap;

use serde::Deserialize;

use crate::catalog::PrintTechnology;
use crate::ranges;
use crate::simplified::{
    ColorMode, DefaultPrint, FinishingSelection, MaterialPrice, PagesConfig, PriceUnit, PrintKey,
    PrintPriceVariant, ProductTypeVariant, SidesMode, SimplifiedConfig, SimplifiedTypeConfig,
    SizeConfig, SubtypeInitialDefaults,
};
use crate::tier::{self, Tier};
use crate::types::{DbId, Qty};
use crate::validate;

/// Name of the type variant that receives a product's flat-mode
/// configuration when the first real type is added.
pub const MIGRATED_TYPE_NAME: &str = "Standard";

// ---------------------------------------------------------------------------
// Patch DTOs
// ---------------------------------------------------------------------------

/// Field patch for a type variant. `None` fields are left unchanged.
///
/// The description fields use `Option<Option<String>>` to allow clearing
/// the value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTypeVariant {
    pub name: Option<String>,
    pub image_url: Option<Option<String>>,
    pub brief_description: Option<Option<String>>,
    pub full_description: Option<Option<String>>,
    pub characteristics: Option<Vec<String>>,
    pub advantages: Option<Vec<String>>,
}

/// Field patch for a size config. `None` fields are left unchanged.
///
/// The quantity bounds use `Option<Option<Qty>>` to allow clearing a bound.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSizeConfig {
    pub label: Option<String>,
    pub width_mm: Option<f64>,
    pub height_mm: Option<f64>,
    pub min_qty: Option<Option<Qty>>,
    pub max_qty: Option<Option<Qty>>,
    pub default_print: Option<DefaultPrint>,
}

/// Field patch for a finishing selection. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFinishing {
    pub price_unit: Option<PriceUnit>,
    pub units_per_item: Option<f64>,
    pub subtype: Option<Option<String>>,
    pub variant_name: Option<Option<String>>,
    pub density: Option<Option<i64>>,
}

/// Patch for the root behavior toggles. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFlags {
    pub use_layout: Option<bool>,
    pub cutting: Option<bool>,
    pub duplex_as_single_x2: Option<bool>,
    pub include_material_cost: Option<bool>,
}

// ---------------------------------------------------------------------------
// Editor session
// ---------------------------------------------------------------------------

/// In-memory editing session for one product's simplified template.
#[derive(Debug, Clone)]
pub struct EditorSession {
    config: SimplifiedConfig,
    selected_type_id: Option<String>,
    selected_size_id: Option<String>,
    /// Sizes whose tier or price tables the user edited this session.
    touched: HashMap<String, bool>,
}

impl EditorSession {
    /// Open a session over a loaded configuration, selecting the default
    /// type and its first size.
    pub fn new(config: SimplifiedConfig) -> Self {
        let selected_type_id = config.default_type_id().map(str::to_string);
        let selected_size_id = config
            .effective_sizes(selected_type_id.as_deref())
            .first()
            .map(|s| s.id.clone());
        Self {
            config,
            selected_type_id,
            selected_size_id,
            touched: HashMap::new(),
        }
    }

    pub fn config(&self) -> &SimplifiedConfig {
        &self.config
    }

    /// Consume the session, returning the edited configuration.
    pub fn into_config(self) -> SimplifiedConfig {
        self.config
    }

    pub fn selected_type_id(&self) -> Option<&str> {
        self.selected_type_id.as_deref()
    }

    pub fn selected_size_id(&self) -> Option<&str> {
        self.selected_size_id.as_deref()
    }

    /// Sizes of the currently selected type (or the flat list).
    pub fn sizes(&self) -> &[SizeConfig] {
        self.config
            .effective_sizes(self.selected_type_id.as_deref())
    }

    pub fn selected_size(&self) -> Option<&SizeConfig> {
        let size_id = self.selected_size_id.as_deref()?;
        self.config
            .find_size(self.selected_type_id.as_deref(), size_id)
    }

    /// Whether the user edited this size's tier or price tables.
    pub fn is_touched(&self, size_id: &str) -> bool {
        self.touched.get(size_id).copied().unwrap_or(false)
    }

    /// Reset all interaction flags (after a successful save).
    pub fn clear_touched(&mut self) {
        self.touched.clear();
    }

    fn touch(&mut self, size_id: &str) {
        self.touched.insert(size_id.to_string(), true);
    }

    fn find_size(&self, size_id: &str) -> Option<&SizeConfig> {
        self.config
            .find_size(self.selected_type_id.as_deref(), size_id)
    }

    // Existence is checked read-only first so a stale id never allocates a
    // type-config entry as a side effect.
    fn find_size_mut(&mut self, size_id: &str) -> Option<&mut SizeConfig> {
        self.find_size(size_id)?;
        self.config
            .find_size_mut(self.selected_type_id.as_deref(), size_id)
    }

    fn first_size_id(&self) -> Option<String> {
        self.config
            .effective_sizes(self.selected_type_id.as_deref())
            .first()
            .map(|s| s.id.clone())
    }

    // -----------------------------------------------------------------------
    // Type variants
    // -----------------------------------------------------------------------

    /// Add a type variant and select it. A product moving out of flat mode
    /// first gets its existing sizes and pages migrated into a default type
    /// named "Standard" so nothing becomes unreachable. Returns the new id.
    pub fn add_type(&mut self, name: &str) -> Option<String> {
        if validate::validate_type_name(name).is_err() {
            return None;
        }
        if self.config.types.len() >= validate::MAX_TYPES_PER_PRODUCT {
            return None;
        }
        if !self.config.has_types()
            && (!self.config.sizes.is_empty() || self.config.pages.is_some())
        {
            let mut standard = ProductTypeVariant::new(MIGRATED_TYPE_NAME);
            standard.is_default = true;
            let standard_id = standard.id.clone();
            let sizes = std::mem::take(&mut self.config.sizes);
            let pages = self.config.pages.take();
            self.config.types.push(standard);
            self.config.type_configs.insert(
                standard_id,
                SimplifiedTypeConfig {
                    sizes,
                    pages,
                    initial: None,
                },
            );
        }
        let mut variant = ProductTypeVariant::new(name);
        variant.is_default = self.config.types.is_empty();
        let id = variant.id.clone();
        self.config.types.push(variant);
        self.selected_type_id = Some(id.clone());
        self.selected_size_id = self.first_size_id();
        Some(id)
    }

    /// Remove a type variant. The last remaining type cannot be removed;
    /// removing the default promotes the first remaining variant.
    pub fn remove_type(&mut self, type_id: &str) -> bool {
        if self.config.types.len() <= 1 {
            return false;
        }
        let index = match self.config.types.iter().position(|t| t.id == type_id) {
            Some(i) => i,
            None => return false,
        };
        self.config.types.remove(index);
        self.config.ensure_single_default();
        if let Some(dropped) = self.config.type_configs.remove(type_id) {
            for size in &dropped.sizes {
                self.touched.remove(&size.id);
            }
        }
        if self.selected_type_id.as_deref() == Some(type_id) {
            self.selected_type_id = self.config.default_type_id().map(str::to_string);
            self.selected_size_id = self.first_size_id();
        }
        true
    }

    /// Make `type_id` the default variant. Accepts the current default.
    pub fn set_default_type(&mut self, type_id: &str) -> bool {
        if self.config.type_by_id(type_id).is_none() {
            return false;
        }
        for variant in &mut self.config.types {
            variant.is_default = variant.id == type_id;
        }
        true
    }

    /// Merge a patch into a type variant.
    pub fn update_type(&mut self, type_id: &str, patch: UpdateTypeVariant) -> bool {
        if let Some(ref name) = patch.name {
            if validate::validate_type_name(name).is_err() {
                return false;
            }
        }
        let variant = match self.config.type_by_id_mut(type_id) {
            Some(v) => v,
            None => return false,
        };
        if let Some(name) = patch.name {
            variant.name = name;
        }
        if let Some(image_url) = patch.image_url {
            variant.image_url = image_url;
        }
        if let Some(brief) = patch.brief_description {
            variant.brief_description = brief;
        }
        if let Some(full) = patch.full_description {
            variant.full_description = full;
        }
        if let Some(characteristics) = patch.characteristics {
            variant.characteristics = characteristics;
        }
        if let Some(advantages) = patch.advantages {
            variant.advantages = advantages;
        }
        true
    }

    /// Switch the active type. Size selection re-anchors to the first size
    /// of the newly selected type.
    pub fn select_type(&mut self, type_id: &str) -> bool {
        if self.config.type_by_id(type_id).is_none() {
            return false;
        }
        self.selected_type_id = Some(type_id.to_string());
        self.selected_size_id = self.first_size_id();
        true
    }

    // -----------------------------------------------------------------------
    // Sizes
    // -----------------------------------------------------------------------

    /// Add a size to the effective config and select it. Returns the new id.
    pub fn add_size(&mut self, label: &str, width_mm: f64, height_mm: f64) -> Option<String> {
        if validate::validate_size_label(label).is_err()
            || validate::validate_dimension_mm(width_mm).is_err()
            || validate::validate_dimension_mm(height_mm).is_err()
        {
            return None;
        }
        let sizes = self
            .config
            .effective_sizes_mut(self.selected_type_id.as_deref())?;
        if sizes.len() >= validate::MAX_SIZES_PER_CONFIG {
            return None;
        }
        let size = SizeConfig::new(label, width_mm, height_mm);
        let id = size.id.clone();
        sizes.push(size);
        self.selected_size_id = Some(id.clone());
        Some(id)
    }

    /// Merge a patch into a size of the effective config. Sizes under other
    /// type variants are never touched.
    pub fn update_size(&mut self, size_id: &str, patch: UpdateSizeConfig) -> bool {
        if let Some(ref label) = patch.label {
            if validate::validate_size_label(label).is_err() {
                return false;
            }
        }
        if let Some(width) = patch.width_mm {
            if validate::validate_dimension_mm(width).is_err() {
                return false;
            }
        }
        if let Some(height) = patch.height_mm {
            if validate::validate_dimension_mm(height).is_err() {
                return false;
            }
        }
        let size = match self.find_size_mut(size_id) {
            Some(s) => s,
            None => return false,
        };
        let next_min = patch.min_qty.unwrap_or(size.min_qty);
        let next_max = patch.max_qty.unwrap_or(size.max_qty);
        if validate::validate_quantity_bounds(next_min, next_max).is_err() {
            return false;
        }
        if let Some(label) = patch.label {
            size.label = label;
        }
        if let Some(width) = patch.width_mm {
            size.width_mm = width;
        }
        if let Some(height) = patch.height_mm {
            size.height_mm = height;
        }
        size.min_qty = next_min;
        size.max_qty = next_max;
        if let Some(default_print) = patch.default_print {
            size.default_print = Some(default_print);
        }
        true
    }

    /// Remove a size from the effective config. Selection falls back to the
    /// first remaining size.
    pub fn remove_size(&mut self, size_id: &str) -> bool {
        if self.find_size(size_id).is_none() {
            return false;
        }
        let sizes = match self
            .config
            .effective_sizes_mut(self.selected_type_id.as_deref())
        {
            Some(s) => s,
            None => return false,
        };
        let index = match sizes.iter().position(|s| s.id == size_id) {
            Some(i) => i,
            None => return false,
        };
        sizes.remove(index);
        self.touched.remove(size_id);
        if self.selected_size_id.as_deref() == Some(size_id) {
            self.selected_size_id = self.first_size_id();
        }
        true
    }

    /// Deep-copy sizes from another type into the effective config under
    /// fresh ids. Returns how many sizes were copied.
    pub fn copy_sizes_from_type(&mut self, source_type_id: &str, size_ids: &[String]) -> usize {
        if !self.config.has_types() {
            return 0;
        }
        let target_type_id = match self
            .selected_type_id
            .clone()
            .or_else(|| self.config.default_type_id().map(str::to_string))
        {
            Some(id) => id,
            None => return 0,
        };
        if target_type_id == source_type_id {
            return 0;
        }
        let mut clones: Vec<SizeConfig> = match self.config.type_configs.get(source_type_id) {
            Some(tc) => tc
                .sizes
                .iter()
                .filter(|s| size_ids.contains(&s.id))
                .map(SizeConfig::clone_with_new_id)
                .collect(),
            None => return 0,
        };
        if clones.is_empty() {
            return 0;
        }
        let sizes = match self.config.effective_sizes_mut(Some(&target_type_id)) {
            Some(s) => s,
            None => return 0,
        };
        let room = validate::MAX_SIZES_PER_CONFIG.saturating_sub(sizes.len());
        clones.truncate(room);
        let count = clones.len();
        sizes.extend(clones);
        count
    }

    // -----------------------------------------------------------------------
    // Tier ranges
    // -----------------------------------------------------------------------

    /// The common quantity ranges of a size.
    pub fn size_ranges(&self, size_id: &str) -> Option<Vec<Tier>> {
        self.find_size(size_id).map(ranges::common_ranges)
    }

    /// Replace a size's boundary structure wholesale, re-mapping every price
    /// table. The size needs at least one print variant to carry the
    /// boundaries.
    pub fn set_size_ranges(&mut self, size_id: &str, new_ranges: &[Tier]) -> bool {
        let size = match self.find_size_mut(size_id) {
            Some(s) => s,
            None => return false,
        };
        if size.print_prices.is_empty() {
            return false;
        }
        ranges::update_size_ranges(size, new_ranges);
        self.touch(size_id);
        true
    }

    /// Insert a quantity breakpoint into a size's common ranges and
    /// propagate it to every price table.
    pub fn add_boundary(&mut self, size_id: &str, boundary: Qty) -> bool {
        self.apply_range_edit(size_id, |tiers| tier::add_range_boundary(tiers, boundary))
    }

    /// Move an existing breakpoint.
    pub fn edit_boundary(&mut self, size_id: &str, tier_index: usize, new_boundary: Qty) -> bool {
        self.apply_range_edit(size_id, |tiers| {
            tier::edit_range_boundary(tiers, tier_index, new_boundary)
        })
    }

    /// Delete a tier from a size's common ranges.
    pub fn remove_tier(&mut self, size_id: &str, tier_index: usize) -> bool {
        self.apply_range_edit(size_id, |tiers| tier::remove_range(tiers, tier_index))
    }

    /// Run one algebra operation against a size's common ranges and
    /// propagate the result. `false` when the operation did not change the
    /// structure (collision, stale index, floor rules).
    fn apply_range_edit(&mut self, size_id: &str, op: impl FnOnce(Vec<Tier>) -> Vec<Tier>) -> bool {
        let current = match self.find_size(size_id) {
            Some(size) if !size.print_prices.is_empty() => ranges::common_ranges(size),
            _ => return false,
        };
        let updated = op(current.clone());
        if updated == current {
            return false;
        }
        if let Some(size) = self.find_size_mut(size_id) {
            ranges::update_size_ranges(size, &updated);
        }
        self.touch(size_id);
        true
    }

    // -----------------------------------------------------------------------
    // Print technologies & modes
    // -----------------------------------------------------------------------

    /// Select a print technology for a size, generating its applicable
    /// (color, sides) variants seeded with the size's common ranges at price
    /// zero. Selecting an already-present technology is a no-op; selection
    /// is additive across technologies.
    pub fn select_technology(&mut self, size_id: &str, technology: &PrintTechnology) -> bool {
        if !technology.active {
            return false;
        }
        let size = match self.find_size_mut(size_id) {
            Some(s) => s,
            None => return false,
        };
        if size
            .print_prices
            .iter()
            .any(|v| v.technology_code == technology.code)
        {
            return false;
        }
        let modes = technology.applicable_modes();
        let seeded = tier::remap(&ranges::common_ranges(size), &[]);
        for &(color, sides) in &modes {
            size.print_prices.push(PrintPriceVariant::new(
                technology.code.clone(),
                color,
                sides,
                seeded.clone(),
            ));
        }
        if let Some((color, sides)) = modes.first().copied() {
            let default_print = size.default_print.get_or_insert_with(DefaultPrint::default);
            if default_print.technology_code.is_none() {
                default_print.technology_code = Some(technology.code.clone());
                default_print.color_mode = Some(color);
                default_print.sides_mode = Some(sides);
            }
        }
        self.touch(size_id);
        true
    }

    /// Enable a sides mode for a technology already selected on this size,
    /// generating the mode for every color the technology supports.
    /// Retained modes keep their entered prices.
    pub fn add_sides_mode(
        &mut self,
        size_id: &str,
        technology: &PrintTechnology,
        sides_mode: SidesMode,
    ) -> bool {
        let size = match self.find_size_mut(size_id) {
            Some(s) => s,
            None => return false,
        };
        if !size
            .print_prices
            .iter()
            .any(|v| v.technology_code == technology.code)
        {
            return false;
        }
        let seeded = tier::remap(&ranges::common_ranges(size), &[]);
        let mut added = false;
        for color in [ColorMode::Color, ColorMode::Bw] {
            if !technology.supports(color, sides_mode) {
                continue;
            }
            let key = PrintKey::new(technology.code.clone(), color, sides_mode);
            if size.find_print_variant(&key).is_some() {
                continue;
            }
            size.print_prices.push(PrintPriceVariant::new(
                technology.code.clone(),
                color,
                sides_mode,
                seeded.clone(),
            ));
            added = true;
        }
        if added {
            self.touch(size_id);
        }
        added
    }

    /// Disable a sides mode for a technology on this size. Refused when it
    /// would leave the technology without any variant.
    pub fn remove_sides_mode(
        &mut self,
        size_id: &str,
        technology_code: &str,
        sides_mode: SidesMode,
    ) -> bool {
        let size = match self.find_size_mut(size_id) {
            Some(s) => s,
            None => return false,
        };
        let total = size
            .print_prices
            .iter()
            .filter(|v| v.technology_code == technology_code)
            .count();
        let removing = size
            .print_prices
            .iter()
            .filter(|v| v.technology_code == technology_code && v.sides_mode == sides_mode)
            .count();
        if removing == 0 || removing == total {
            return false;
        }
        size.print_prices
            .retain(|v| !(v.technology_code == technology_code && v.sides_mode == sides_mode));
        self.touch(size_id);
        true
    }

    /// Set one price cell of a print variant.
    pub fn set_print_tier_price(
        &mut self,
        size_id: &str,
        key: &PrintKey,
        min_qty: Qty,
        price: f64,
    ) -> bool {
        if validate::validate_unit_price(price).is_err() {
            return false;
        }
        let size = match self.find_size_mut(size_id) {
            Some(s) => s,
            None => return false,
        };
        let variant = match size.find_print_variant_mut(key) {
            Some(v) => v,
            None => return false,
        };
        let cell = match variant.tiers.iter_mut().find(|t| t.min_qty == min_qty) {
            Some(t) => t,
            None => return false,
        };
        cell.unit_price = price;
        self.touch(size_id);
        true
    }

    // -----------------------------------------------------------------------
    // Materials
    // -----------------------------------------------------------------------

    /// Replace a size's allowed material list, deduplicated in the given
    /// order. Overrides for materials no longer allowed are dropped.
    pub fn set_allowed_materials(&mut self, size_id: &str, material_ids: &[DbId]) -> bool {
        let size = match self.find_size_mut(size_id) {
            Some(s) => s,
            None => return false,
        };
        let mut deduped: Vec<DbId> = Vec::with_capacity(material_ids.len());
        for &id in material_ids {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        size.material_prices
            .retain(|m| deduped.contains(&m.material_id));
        size.allowed_material_ids = deduped;
        true
    }

    pub fn add_allowed_material(&mut self, size_id: &str, material_id: DbId) -> bool {
        let size = match self.find_size_mut(size_id) {
            Some(s) => s,
            None => return false,
        };
        if size.allowed_material_ids.contains(&material_id) {
            return false;
        }
        size.allowed_material_ids.push(material_id);
        true
    }

    pub fn remove_allowed_material(&mut self, size_id: &str, material_id: DbId) -> bool {
        let size = match self.find_size_mut(size_id) {
            Some(s) => s,
            None => return false,
        };
        if !size.allowed_material_ids.contains(&material_id) {
            return false;
        }
        size.allowed_material_ids.retain(|&id| id != material_id);
        size.material_prices.retain(|m| m.material_id != material_id);
        true
    }

    /// Create or replace a material's tier override, aligned to the size's
    /// common boundary structure (prices matched by `min_qty`, new slices
    /// zero). The material must be allowed on the size.
    pub fn set_material_tiers(&mut self, size_id: &str, material_id: DbId, tiers: &[Tier]) -> bool {
        let size = match self.find_size_mut(size_id) {
            Some(s) => s,
            None => return false,
        };
        if !size.allowed_material_ids.contains(&material_id) {
            return false;
        }
        let aligned = tier::remap(&ranges::common_ranges(size), tiers);
        match size.material_price_mut(material_id) {
            Some(existing) => existing.tiers = aligned,
            None => size.material_prices.push(MaterialPrice {
                material_id,
                tiers: aligned,
            }),
        }
        self.touch(size_id);
        true
    }

    /// Set one price cell of a material override, creating a zero-seeded
    /// override on first edit.
    pub fn set_material_tier_price(
        &mut self,
        size_id: &str,
        material_id: DbId,
        min_qty: Qty,
        price: f64,
    ) -> bool {
        if validate::validate_unit_price(price).is_err() {
            return false;
        }
        let size = match self.find_size_mut(size_id) {
            Some(s) => s,
            None => return false,
        };
        if !size.allowed_material_ids.contains(&material_id) {
            return false;
        }
        let common = ranges::common_ranges(size);
        if !common.iter().any(|t| t.min_qty == min_qty) {
            return false;
        }
        if size.material_price(material_id).is_none() {
            size.material_prices.push(MaterialPrice {
                material_id,
                tiers: tier::remap(&common, &[]),
            });
        }
        let entry = match size.material_price_mut(material_id) {
            Some(m) => m,
            None => return false,
        };
        let cell = match entry.tiers.iter_mut().find(|t| t.min_qty == min_qty) {
            Some(t) => t,
            None => return false,
        };
        cell.unit_price = price;
        self.touch(size_id);
        true
    }

    /// Drop a material's tier override, reverting it to external pricing.
    pub fn clear_material_tiers(&mut self, size_id: &str, material_id: DbId) -> bool {
        let size = match self.find_size_mut(size_id) {
            Some(s) => s,
            None => return false,
        };
        let before = size.material_prices.len();
        size.material_prices.retain(|m| m.material_id != material_id);
        if size.material_prices.len() == before {
            return false;
        }
        self.touch(size_id);
        true
    }

    // -----------------------------------------------------------------------
    // Finishing
    // -----------------------------------------------------------------------

    /// Add a finishing selection. Duplicates (same service and service
    /// variant) are refused.
    pub fn add_finishing(&mut self, size_id: &str, selection: FinishingSelection) -> bool {
        if validate::validate_units_per_item(selection.units_per_item).is_err() {
            return false;
        }
        let size = match self.find_size_mut(size_id) {
            Some(s) => s,
            None => return false,
        };
        if size
            .finishing
            .iter()
            .any(|f| f.same_selection(selection.service_id, selection.variant_id))
        {
            return false;
        }
        size.finishing.push(selection);
        true
    }

    /// Merge a patch into a finishing selection.
    pub fn update_finishing(
        &mut self,
        size_id: &str,
        service_id: DbId,
        variant_id: Option<DbId>,
        patch: UpdateFinishing,
    ) -> bool {
        if let Some(units) = patch.units_per_item {
            if validate::validate_units_per_item(units).is_err() {
                return false;
            }
        }
        let size = match self.find_size_mut(size_id) {
            Some(s) => s,
            None => return false,
        };
        let entry = match size
            .finishing
            .iter_mut()
            .find(|f| f.same_selection(service_id, variant_id))
        {
            Some(f) => f,
            None => return false,
        };
        if let Some(price_unit) = patch.price_unit {
            entry.price_unit = price_unit;
        }
        if let Some(units) = patch.units_per_item {
            entry.units_per_item = units;
        }
        if let Some(subtype) = patch.subtype {
            entry.subtype = subtype;
        }
        if let Some(variant_name) = patch.variant_name {
            entry.variant_name = variant_name;
        }
        if let Some(density) = patch.density {
            entry.density = density;
        }
        true
    }

    pub fn remove_finishing(
        &mut self,
        size_id: &str,
        service_id: DbId,
        variant_id: Option<DbId>,
    ) -> bool {
        let size = match self.find_size_mut(size_id) {
            Some(s) => s,
            None => return false,
        };
        let before = size.finishing.len();
        size.finishing
            .retain(|f| !f.same_selection(service_id, variant_id));
        size.finishing.len() != before
    }

    // -----------------------------------------------------------------------
    // Pages, initial defaults & flags
    // -----------------------------------------------------------------------

    // Selected type when set, otherwise the default. Stale selections
    // resolve to `None`.
    fn effective_type_id(&self) -> Option<String> {
        let type_id = match self.selected_type_id.clone() {
            Some(id) => id,
            None => self.config.default_type_id()?.to_string(),
        };
        if self.config.type_by_id(&type_id).is_none() {
            return None;
        }
        Some(type_id)
    }

    fn pages_slot(&mut self) -> Option<&mut Option<PagesConfig>> {
        if !self.config.has_types() {
            return Some(&mut self.config.pages);
        }
        let type_id = self.effective_type_id()?;
        Some(&mut self.config.type_configs.entry(type_id).or_default().pages)
    }

    /// Set the page-count options of the effective config. Options are
    /// deduplicated and sorted ascending; the default must be a member.
    pub fn set_pages(&mut self, options: &[i64], default: Option<i64>) -> bool {
        if validate::validate_pages_options(options, default).is_err() {
            return false;
        }
        let mut normalized = options.to_vec();
        normalized.sort_unstable();
        normalized.dedup();
        let slot = match self.pages_slot() {
            Some(s) => s,
            None => return false,
        };
        *slot = Some(PagesConfig {
            options: normalized,
            default_option: default,
        });
        true
    }

    /// Remove the pages configuration of the effective config.
    pub fn clear_pages(&mut self) -> bool {
        if !self.config.has_types() {
            return self.config.pages.take().is_some();
        }
        let type_id = match self.effective_type_id() {
            Some(id) => id,
            None => return false,
        };
        match self.config.type_configs.get_mut(&type_id) {
            Some(tc) => tc.pages.take().is_some(),
            None => false,
        }
    }

    /// Set the storefront pre-selections of the selected type. Only typed
    /// mode carries initial defaults.
    pub fn set_initial_defaults(&mut self, initial: SubtypeInitialDefaults) -> bool {
        if !self.config.has_types() {
            return false;
        }
        if let Some(quantity) = initial.quantity {
            if quantity < 1 {
                return false;
            }
        }
        let type_id = match self.effective_type_id() {
            Some(id) => id,
            None => return false,
        };
        self.config.type_configs.entry(type_id).or_default().initial = Some(initial);
        true
    }

    /// Merge the root behavior toggles. `false` when the patch is empty.
    pub fn update_flags(&mut self, patch: UpdateFlags) -> bool {
        let UpdateFlags {
            use_layout,
            cutting,
            duplex_as_single_x2,
            include_material_cost,
        } = patch;
        if use_layout.is_none()
            && cutting.is_none()
            && duplex_as_single_x2.is_none()
            && include_material_cost.is_none()
        {
            return false;
        }
        if use_layout.is_some() {
            self.config.use_layout = use_layout;
        }
        if cutting.is_some() {
            self.config.cutting = cutting;
        }
        if duplex_as_single_x2.is_some() {
            self.config.duplex_as_single_x2 = duplex_as_single_x2;
        }
        if include_material_cost.is_some() {
            self.config.include_material_cost = include_material_cost;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
