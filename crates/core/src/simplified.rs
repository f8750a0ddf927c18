//! Simplified product template data model (PRD-12).
//!
//! The configuration tree behind a product's quantity-based pricing: type
//! variants, per-type size configs, print-price variants with their quantity
//! tiers, and per-size material and finishing selections. The serde shape
//! reproduces the historical stored-JSON field names (camelCase price-table
//! keys, snake_case root flags) so records written by earlier releases keep
//! decoding; unknown keys are ignored and absent collections default empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tier::Tier;
use crate::types::{DbId, Qty};

// ---------------------------------------------------------------------------
// Print mode enums
// ---------------------------------------------------------------------------

/// Color mode of a print-price variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    Color,
    Bw,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Bw => "bw",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "color" => Some(Self::Color),
            "bw" => Some(Self::Bw),
            _ => None,
        }
    }

    /// All valid color mode values.
    pub const ALL: &'static [&'static str] = &["color", "bw"];
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sides mode of a print-price variant.
///
/// `DuplexBwBack` is the mixed mode (color front, black-and-white back);
/// it is never auto-generated and only valid for duplex-capable
/// technologies that can also print black-and-white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidesMode {
    Single,
    Duplex,
    DuplexBwBack,
}

impl SidesMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Duplex => "duplex",
            Self::DuplexBwBack => "duplex_bw_back",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "single" => Some(Self::Single),
            "duplex" => Some(Self::Duplex),
            "duplex_bw_back" => Some(Self::DuplexBwBack),
            _ => None,
        }
    }

    /// All valid sides mode values.
    pub const ALL: &'static [&'static str] = &["single", "duplex", "duplex_bw_back"];
}

impl std::fmt::Display for SidesMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a finishing service is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceUnit {
    PerCut,
    PerItem,
}

impl PriceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerCut => "per_cut",
            Self::PerItem => "per_item",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "per_cut" => Some(Self::PerCut),
            "per_item" => Some(Self::PerItem),
            _ => None,
        }
    }

    /// All valid price unit values.
    pub const ALL: &'static [&'static str] = &["per_cut", "per_item"];
}

impl std::fmt::Display for PriceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Print-price variants
// ---------------------------------------------------------------------------

/// Lookup key of a print-price variant within one size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintKey {
    pub technology_code: String,
    pub color_mode: ColorMode,
    pub sides_mode: SidesMode,
}

impl PrintKey {
    pub fn new(technology_code: impl Into<String>, color_mode: ColorMode, sides_mode: SidesMode) -> Self {
        Self {
            technology_code: technology_code.into(),
            color_mode,
            sides_mode,
        }
    }
}

/// One price table of a size, keyed by technology, color mode, and sides
/// mode. All variants of the same size are kept on a shared boundary set by
/// the range propagation; each variant stores its own price per boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintPriceVariant {
    #[serde(rename = "technologyCode")]
    pub technology_code: String,
    #[serde(rename = "colorMode")]
    pub color_mode: ColorMode,
    #[serde(rename = "sidesMode")]
    pub sides_mode: SidesMode,
    #[serde(default)]
    pub tiers: Vec<Tier>,
}

impl PrintPriceVariant {
    pub fn new(
        technology_code: impl Into<String>,
        color_mode: ColorMode,
        sides_mode: SidesMode,
        tiers: Vec<Tier>,
    ) -> Self {
        Self {
            technology_code: technology_code.into(),
            color_mode,
            sides_mode,
            tiers,
        }
    }

    pub fn key(&self) -> PrintKey {
        PrintKey {
            technology_code: self.technology_code.clone(),
            color_mode: self.color_mode,
            sides_mode: self.sides_mode,
        }
    }

    pub fn matches(&self, key: &PrintKey) -> bool {
        self.technology_code == key.technology_code
            && self.color_mode == key.color_mode
            && self.sides_mode == key.sides_mode
    }
}

/// Partially specified default print selection for a size. Fields the admin
/// has not chosen yet stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultPrint {
    #[serde(
        rename = "technologyCode",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub technology_code: Option<String>,
    #[serde(rename = "colorMode", default, skip_serializing_if = "Option::is_none")]
    pub color_mode: Option<ColorMode>,
    #[serde(rename = "sidesMode", default, skip_serializing_if = "Option::is_none")]
    pub sides_mode: Option<SidesMode>,
}

// ---------------------------------------------------------------------------
// Material & finishing selections
// ---------------------------------------------------------------------------

/// Per-material tier override for a size. A material without an override is
/// priced from the external material catalog instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPrice {
    #[serde(rename = "materialId")]
    pub material_id: DbId,
    #[serde(default)]
    pub tiers: Vec<Tier>,
}

fn default_units_per_item() -> f64 {
    1.0
}

/// A post-processing service selected for a size.
///
/// Tier pricing for finishing is resolved externally by service id and is
/// not stored here; legacy records carrying an inline `tiers` array have it
/// stripped by the decoding adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishingSelection {
    #[serde(rename = "serviceId")]
    pub service_id: DbId,
    #[serde(rename = "priceUnit")]
    pub price_unit: PriceUnit,
    /// How many applications of the service one printed item needs
    /// (e.g. 4 cuts per business card).
    #[serde(rename = "unitsPerItem", default = "default_units_per_item")]
    pub units_per_item: f64,
    #[serde(rename = "variantId", default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(
        rename = "variantName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub variant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<i64>,
}

impl FinishingSelection {
    pub fn new(service_id: DbId, price_unit: PriceUnit, units_per_item: f64) -> Self {
        Self {
            service_id,
            price_unit,
            units_per_item,
            variant_id: None,
            subtype: None,
            variant_name: None,
            density: None,
        }
    }

    /// Identity within one size: service plus optional service variant.
    pub fn same_selection(&self, service_id: DbId, variant_id: Option<DbId>) -> bool {
        self.service_id == service_id && self.variant_id == variant_id
    }
}

// ---------------------------------------------------------------------------
// Size configs
// ---------------------------------------------------------------------------

/// One printable size of a product (or product type) with its full price
/// configuration. Identity is the opaque `id`, minted client-side and never
/// reused across copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeConfig {
    pub id: String,
    pub label: String,
    #[serde(rename = "widthMm")]
    pub width_mm: f64,
    #[serde(rename = "heightMm")]
    pub height_mm: f64,
    #[serde(rename = "minQty", default, skip_serializing_if = "Option::is_none")]
    pub min_qty: Option<Qty>,
    #[serde(rename = "maxQty", default, skip_serializing_if = "Option::is_none")]
    pub max_qty: Option<Qty>,
    #[serde(
        rename = "defaultPrint",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub default_print: Option<DefaultPrint>,
    #[serde(rename = "printPrices", default)]
    pub print_prices: Vec<PrintPriceVariant>,
    #[serde(rename = "allowedMaterialIds", default)]
    pub allowed_material_ids: Vec<DbId>,
    #[serde(rename = "materialPrices", default)]
    pub material_prices: Vec<MaterialPrice>,
    #[serde(default)]
    pub finishing: Vec<FinishingSelection>,
}

impl SizeConfig {
    /// A freshly minted size with no price configuration yet.
    pub fn new(label: impl Into<String>, width_mm: f64, height_mm: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: label.into(),
            width_mm,
            height_mm,
            min_qty: None,
            max_qty: None,
            default_print: None,
            print_prices: Vec::new(),
            allowed_material_ids: Vec::new(),
            material_prices: Vec::new(),
            finishing: Vec::new(),
        }
    }

    /// Deep copy under a fresh id. Copies between type variants must never
    /// share identity with their source.
    pub fn clone_with_new_id(&self) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4().to_string();
        copy
    }

    pub fn find_print_variant(&self, key: &PrintKey) -> Option<&PrintPriceVariant> {
        self.print_prices.iter().find(|v| v.matches(key))
    }

    pub fn find_print_variant_mut(&mut self, key: &PrintKey) -> Option<&mut PrintPriceVariant> {
        self.print_prices.iter_mut().find(|v| v.matches(key))
    }

    /// Distinct technology codes present in the print-price tables, in
    /// first-seen order.
    pub fn technology_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = Vec::new();
        for variant in &self.print_prices {
            if !codes.contains(&variant.technology_code) {
                codes.push(variant.technology_code.clone());
            }
        }
        codes
    }

    pub fn material_price(&self, material_id: DbId) -> Option<&MaterialPrice> {
        self.material_prices.iter().find(|m| m.material_id == material_id)
    }

    pub fn material_price_mut(&mut self, material_id: DbId) -> Option<&mut MaterialPrice> {
        self.material_prices
            .iter_mut()
            .find(|m| m.material_id == material_id)
    }
}

// ---------------------------------------------------------------------------
// Type variants
// ---------------------------------------------------------------------------

/// A named sub-variant of a product (e.g. "laminated") with its own size and
/// price configuration. Exactly one variant is the default whenever any
/// exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTypeVariant {
    pub id: String,
    pub name: String,
    #[serde(rename = "default", default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(
        rename = "briefDescription",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub brief_description: Option<String>,
    #[serde(
        rename = "fullDescription",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub full_description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub characteristics: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advantages: Vec<String>,
}

impl ProductTypeVariant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            is_default: false,
            image_url: None,
            brief_description: None,
            full_description: None,
            characteristics: Vec::new(),
            advantages: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pages & initial defaults
// ---------------------------------------------------------------------------

/// Page-count options for multi-page products (brochures, catalogs).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagesConfig {
    #[serde(default)]
    pub options: Vec<i64>,
    /// The pre-selected option; must be a member of `options`.
    #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
    pub default_option: Option<i64>,
}

/// Storefront pre-selections applied when a product type is first opened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubtypeInitialDefaults {
    #[serde(
        rename = "technologyCode",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub technology_code: Option<String>,
    #[serde(rename = "colorMode", default, skip_serializing_if = "Option::is_none")]
    pub color_mode: Option<ColorMode>,
    #[serde(rename = "sidesMode", default, skip_serializing_if = "Option::is_none")]
    pub sides_mode: Option<SidesMode>,
    #[serde(rename = "materialId", default, skip_serializing_if = "Option::is_none")]
    pub material_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Qty>,
}

// ---------------------------------------------------------------------------
// Configuration roots
// ---------------------------------------------------------------------------

/// The per-type configuration bundle. In flat mode (a product without type
/// variants) the same shape is assembled from the root-level fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedTypeConfig {
    #[serde(default)]
    pub sizes: Vec<SizeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<PagesConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<SubtypeInitialDefaults>,
}

/// Root of a product's simplified pricing configuration. Persisted whole as
/// JSON inside a template-config record; it has no identity of its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_layout: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplex_as_single_x2: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_material_cost: Option<bool>,
    /// Flat-mode sizes; unused once type variants exist.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<SizeConfig>,
    /// Flat-mode pages; unused once type variants exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<PagesConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<ProductTypeVariant>,
    #[serde(
        rename = "typeConfigs",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub type_configs: BTreeMap<String, SimplifiedTypeConfig>,
}

impl SimplifiedConfig {
    pub fn has_types(&self) -> bool {
        !self.types.is_empty()
    }

    /// Id of the default type variant, falling back to the first when no
    /// default flag is set.
    pub fn default_type_id(&self) -> Option<&str> {
        self.types
            .iter()
            .find(|t| t.is_default)
            .or_else(|| self.types.first())
            .map(|t| t.id.as_str())
    }

    pub fn type_by_id(&self, type_id: &str) -> Option<&ProductTypeVariant> {
        self.types.iter().find(|t| t.id == type_id)
    }

    pub fn type_by_id_mut(&mut self, type_id: &str) -> Option<&mut ProductTypeVariant> {
        self.types.iter_mut().find(|t| t.id == type_id)
    }

    /// Sizes of the currently effective configuration: the flat root list
    /// when no type variants exist, otherwise the selected (or default)
    /// type's list. A type without a stored config reads as empty.
    pub fn effective_sizes(&self, selected_type_id: Option<&str>) -> &[SizeConfig] {
        if !self.has_types() {
            return &self.sizes;
        }
        let type_id = match selected_type_id {
            Some(id) => id,
            None => match self.default_type_id() {
                Some(id) => id,
                None => return &[],
            },
        };
        match self.type_configs.get(type_id) {
            Some(tc) => &tc.sizes,
            None => &[],
        }
    }

    /// Mutable sizes of the effective configuration. In typed mode the
    /// config entry is created on demand, but only for an id naming an
    /// existing type variant; a stale id yields `None` instead of allocating
    /// a stray entry.
    pub fn effective_sizes_mut(
        &mut self,
        selected_type_id: Option<&str>,
    ) -> Option<&mut Vec<SizeConfig>> {
        if !self.has_types() {
            return Some(&mut self.sizes);
        }
        let type_id = match selected_type_id {
            Some(id) => id.to_string(),
            None => self.default_type_id()?.to_string(),
        };
        if self.type_by_id(&type_id).is_none() {
            return None;
        }
        Some(&mut self.type_configs.entry(type_id).or_default().sizes)
    }

    /// Owned snapshot of the effective configuration bundle.
    pub fn effective_config(&self, selected_type_id: Option<&str>) -> SimplifiedTypeConfig {
        if !self.has_types() {
            return SimplifiedTypeConfig {
                sizes: self.sizes.clone(),
                pages: self.pages.clone(),
                initial: None,
            };
        }
        let type_id = match selected_type_id {
            Some(id) => Some(id),
            None => self.default_type_id(),
        };
        type_id
            .and_then(|id| self.type_configs.get(id))
            .cloned()
            .unwrap_or_default()
    }

    pub fn find_size(&self, selected_type_id: Option<&str>, size_id: &str) -> Option<&SizeConfig> {
        self.effective_sizes(selected_type_id)
            .iter()
            .find(|s| s.id == size_id)
    }

    pub fn find_size_mut(
        &mut self,
        selected_type_id: Option<&str>,
        size_id: &str,
    ) -> Option<&mut SizeConfig> {
        self.effective_sizes_mut(selected_type_id)?
            .iter_mut()
            .find(|s| s.id == size_id)
    }

    /// Repair the type list so exactly one variant is default whenever any
    /// exist. The first flagged variant (or the first variant) wins.
    /// Returns `true` when a flag changed.
    pub fn ensure_single_default(&mut self) -> bool {
        if self.types.is_empty() {
            return false;
        }
        let defaults = self.types.iter().filter(|t| t.is_default).count();
        if defaults == 1 {
            return false;
        }
        let keep = self.types.iter().position(|t| t.is_default).unwrap_or(0);
        for (i, t) in self.types.iter_mut().enumerate() {
            t.is_default = i == keep;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::tier::Tier;

    fn size_with_prices() -> SizeConfig {
        let mut size = SizeConfig::new("90x50", 90.0, 50.0);
        size.print_prices.push(PrintPriceVariant::new(
            "digital",
            ColorMode::Color,
            SidesMode::Single,
            vec![Tier::new(1, Some(99), 12.0), Tier::new(100, None, 8.0)],
        ));
        size.allowed_material_ids = vec![3, 7];
        size.material_prices.push(MaterialPrice {
            material_id: 3,
            tiers: vec![Tier::new(1, None, 1.5)],
        });
        size.finishing
            .push(FinishingSelection::new(11, PriceUnit::PerCut, 4.0));
        size
    }

    // -- enum conversions ---------------------------------------------------

    #[test]
    fn color_mode_round_trips() {
        for s in ColorMode::ALL {
            assert_eq!(ColorMode::from_str(s).unwrap().as_str(), *s);
        }
        assert!(ColorMode::from_str("grayscale").is_none());
    }

    #[test]
    fn sides_mode_round_trips() {
        for s in SidesMode::ALL {
            assert_eq!(SidesMode::from_str(s).unwrap().as_str(), *s);
        }
        assert!(SidesMode::from_str("triplex").is_none());
    }

    #[test]
    fn price_unit_round_trips() {
        for s in PriceUnit::ALL {
            assert_eq!(PriceUnit::from_str(s).unwrap().as_str(), *s);
        }
        assert!(PriceUnit::from_str("per_sheet").is_none());
    }

    #[test]
    fn enums_serialize_snake_case() {
        assert_eq!(json!(ColorMode::Bw), json!("bw"));
        assert_eq!(json!(SidesMode::DuplexBwBack), json!("duplex_bw_back"));
        assert_eq!(json!(PriceUnit::PerCut), json!("per_cut"));
    }

    // -- wire shape ---------------------------------------------------------

    #[test]
    fn tier_wire_shape_keeps_explicit_null_max() {
        let value = serde_json::to_value(Tier::new(100, None, 8.0)).unwrap();
        assert_eq!(
            value,
            json!({"minQty": 100, "maxQty": null, "unitPrice": 8.0})
        );
    }

    #[test]
    fn size_wire_shape_uses_historical_names() {
        let size = size_with_prices();
        let value = serde_json::to_value(&size).unwrap();
        assert_eq!(value["widthMm"], json!(90.0));
        assert_eq!(value["heightMm"], json!(50.0));
        assert_eq!(value["allowedMaterialIds"], json!([3, 7]));
        assert_eq!(value["printPrices"][0]["technologyCode"], json!("digital"));
        assert_eq!(value["printPrices"][0]["colorMode"], json!("color"));
        assert_eq!(value["printPrices"][0]["sidesMode"], json!("single"));
        assert_eq!(value["materialPrices"][0]["materialId"], json!(3));
        assert_eq!(value["finishing"][0]["serviceId"], json!(11));
        assert_eq!(value["finishing"][0]["priceUnit"], json!("per_cut"));
        assert_eq!(value["finishing"][0]["unitsPerItem"], json!(4.0));
        // Unset optionals are omitted, not null.
        assert!(value.get("minQty").is_none());
        assert!(value.get("defaultPrint").is_none());
    }

    #[test]
    fn type_variant_default_flag_uses_wire_name() {
        let mut variant = ProductTypeVariant::new("Laminated");
        variant.is_default = true;
        let value = serde_json::to_value(&variant).unwrap();
        assert_eq!(value["default"], json!(true));
        assert!(value.get("is_default").is_none());
    }

    #[test]
    fn root_flags_stay_snake_case() {
        let config = SimplifiedConfig {
            use_layout: Some(true),
            duplex_as_single_x2: Some(false),
            ..Default::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["use_layout"], json!(true));
        assert_eq!(value["duplex_as_single_x2"], json!(false));
        assert!(value.get("cutting").is_none());
    }

    #[test]
    fn decode_ignores_unknown_keys_and_defaults_collections() {
        let raw = json!({
            "sizes": [{
                "id": "s1",
                "label": "A6",
                "widthMm": 105.0,
                "heightMm": 148.0,
                "someForgottenField": 42
            }],
            "legacyFlag": "yes"
        });
        let config: SimplifiedConfig = serde_json::from_value(raw).unwrap();
        assert_eq!(config.sizes.len(), 1);
        assert!(config.sizes[0].print_prices.is_empty());
        assert!(config.sizes[0].finishing.is_empty());
        assert!(config.types.is_empty());
    }

    #[test]
    fn decode_sparse_finishing_defaults_units_per_item() {
        let raw = json!({"serviceId": 5, "priceUnit": "per_item"});
        let finishing: FinishingSelection = serde_json::from_value(raw).unwrap();
        assert_eq!(finishing.units_per_item, 1.0);
    }

    // -- size helpers -------------------------------------------------------

    #[test]
    fn clone_with_new_id_mints_fresh_identity() {
        let source = size_with_prices();
        let copy = source.clone_with_new_id();
        assert_ne!(copy.id, source.id);
        assert_eq!(copy.label, source.label);
        assert_eq!(copy.print_prices, source.print_prices);
    }

    #[test]
    fn clone_edits_leave_source_untouched() {
        let source = size_with_prices();
        let mut copy = source.clone_with_new_id();
        copy.print_prices[0].tiers[0].unit_price = 99.0;
        copy.material_prices[0].tiers[0].unit_price = 42.0;
        assert_eq!(source.print_prices[0].tiers[0].unit_price, 12.0);
        assert_eq!(source.material_prices[0].tiers[0].unit_price, 1.5);
    }

    #[test]
    fn find_print_variant_by_key() {
        let size = size_with_prices();
        let key = PrintKey::new("digital", ColorMode::Color, SidesMode::Single);
        assert!(size.find_print_variant(&key).is_some());
        let missing = PrintKey::new("digital", ColorMode::Bw, SidesMode::Single);
        assert!(size.find_print_variant(&missing).is_none());
    }

    #[test]
    fn technology_codes_are_distinct_in_order() {
        let mut size = size_with_prices();
        size.print_prices.push(PrintPriceVariant::new(
            "digital",
            ColorMode::Color,
            SidesMode::Duplex,
            vec![],
        ));
        size.print_prices.push(PrintPriceVariant::new(
            "offset",
            ColorMode::Color,
            SidesMode::Single,
            vec![],
        ));
        assert_eq!(size.technology_codes(), vec!["digital", "offset"]);
    }

    // -- effective config resolution ----------------------------------------

    fn typed_config() -> (SimplifiedConfig, String, String) {
        let mut config = SimplifiedConfig::default();
        let mut a = ProductTypeVariant::new("Matte");
        a.is_default = true;
        let b = ProductTypeVariant::new("Glossy");
        let (a_id, b_id) = (a.id.clone(), b.id.clone());
        config.types = vec![a, b];
        config.type_configs.insert(
            a_id.clone(),
            SimplifiedTypeConfig {
                sizes: vec![SizeConfig::new("A6", 105.0, 148.0)],
                pages: None,
                initial: None,
            },
        );
        (config, a_id, b_id)
    }

    #[test]
    fn effective_sizes_flat_mode_uses_root() {
        let mut config = SimplifiedConfig::default();
        config.sizes.push(SizeConfig::new("A4", 210.0, 297.0));
        assert_eq!(config.effective_sizes(None).len(), 1);
    }

    #[test]
    fn effective_sizes_typed_mode_scopes_by_type() {
        let (config, a_id, b_id) = typed_config();
        assert_eq!(config.effective_sizes(Some(&a_id)).len(), 1);
        // No stored config for B yet.
        assert!(config.effective_sizes(Some(&b_id)).is_empty());
        // Unselected falls back to the default type.
        assert_eq!(config.effective_sizes(None).len(), 1);
    }

    #[test]
    fn effective_sizes_mut_creates_entry_for_real_type_only() {
        let (mut config, _a_id, b_id) = typed_config();
        assert!(config.effective_sizes_mut(Some(&b_id)).is_some());
        assert!(config.type_configs.contains_key(&b_id));
        assert!(config.effective_sizes_mut(Some("no-such-type")).is_none());
        assert!(!config.type_configs.contains_key("no-such-type"));
    }

    #[test]
    fn effective_config_missing_type_reads_as_empty_shell() {
        let (config, _a_id, b_id) = typed_config();
        let shell = config.effective_config(Some(&b_id));
        assert!(shell.sizes.is_empty());
        assert!(shell.pages.is_none());
    }

    // -- default-type repair -------------------------------------------------

    #[test]
    fn ensure_single_default_promotes_first_when_none() {
        let (mut config, a_id, _b_id) = typed_config();
        config.type_by_id_mut(&a_id).unwrap().is_default = false;
        assert!(config.ensure_single_default());
        assert_eq!(config.types.iter().filter(|t| t.is_default).count(), 1);
        assert!(config.types[0].is_default);
    }

    #[test]
    fn ensure_single_default_collapses_duplicates() {
        let (mut config, _a_id, b_id) = typed_config();
        config.type_by_id_mut(&b_id).unwrap().is_default = true;
        assert!(config.ensure_single_default());
        let defaults: Vec<_> = config.types.iter().filter(|t| t.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].name, "Matte");
    }

    #[test]
    fn ensure_single_default_noop_when_consistent() {
        let (mut config, _a, _b) = typed_config();
        assert!(!config.ensure_single_default());
    }
}
