//! Read-only reference catalogs (PRD-9).
//!
//! Print technologies, paper types, and finishing services are supplied by
//! external reference collaborators; this module holds their shapes and the
//! capability rules that drive print-variant generation. The core never
//! mutates catalog data.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::simplified::{ColorMode, PriceUnit, SidesMode};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Print technologies
// ---------------------------------------------------------------------------

/// A print technology with its capability flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintTechnology {
    /// Stable lookup code (e.g. "digital", "offset", "uv").
    pub code: String,
    pub name: String,
    /// Whether the technology can print both sides.
    pub duplex: bool,
    /// Whether the technology prints in color only (no black-and-white run).
    pub color_only: bool,
    pub active: bool,
}

impl PrintTechnology {
    /// Whether this technology can produce the given mode combination.
    ///
    /// The mixed `duplex_bw_back` mode needs a duplex-capable technology
    /// that can also print black-and-white, and only pairs with a color
    /// front.
    pub fn supports(&self, color_mode: ColorMode, sides_mode: SidesMode) -> bool {
        if color_mode == ColorMode::Bw && self.color_only {
            return false;
        }
        match sides_mode {
            SidesMode::Single => true,
            SidesMode::Duplex => self.duplex,
            SidesMode::DuplexBwBack => {
                self.duplex && !self.color_only && color_mode == ColorMode::Color
            }
        }
    }

    /// The mode combinations generated when this technology is selected for
    /// a size: the cartesian subset of color and sides capabilities, giving
    /// 1, 2, or 4 variants. `duplex_bw_back` is never auto-generated.
    pub fn applicable_modes(&self) -> Vec<(ColorMode, SidesMode)> {
        let colors: &[ColorMode] = if self.color_only {
            &[ColorMode::Color]
        } else {
            &[ColorMode::Color, ColorMode::Bw]
        };
        let sides: &[SidesMode] = if self.duplex {
            &[SidesMode::Single, SidesMode::Duplex]
        } else {
            &[SidesMode::Single]
        };
        let mut modes = Vec::with_capacity(colors.len() * sides.len());
        for &color in colors {
            for &side in sides {
                modes.push((color, side));
            }
        }
        modes
    }
}

/// Look up an active technology by code.
pub fn find_technology<'a>(
    catalog: &'a [PrintTechnology],
    code: &str,
) -> Option<&'a PrintTechnology> {
    catalog.iter().find(|t| t.active && t.code == code)
}

// ---------------------------------------------------------------------------
// Paper types
// ---------------------------------------------------------------------------

/// A paper stock entry linking a material to its density.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperType {
    pub id: DbId,
    pub name: String,
    /// Grammage in g/m².
    pub density: i64,
    pub material_id: DbId,
    pub active: bool,
}

/// Look up an active paper type by id.
pub fn find_paper_type(catalog: &[PaperType], id: DbId) -> Option<&PaperType> {
    catalog.iter().find(|p| p.active && p.id == id)
}

/// Active paper types available for a material.
pub fn paper_types_for_material(catalog: &[PaperType], material_id: DbId) -> Vec<&PaperType> {
    catalog
        .iter()
        .filter(|p| p.active && p.material_id == material_id)
        .collect()
}

// ---------------------------------------------------------------------------
// Finishing services
// ---------------------------------------------------------------------------

/// Cutting operations.
pub const OP_CUTTING: &str = "cutting";

/// Lamination operations.
pub const OP_LAMINATION: &str = "lamination";

/// Folding operations.
pub const OP_FOLDING: &str = "folding";

/// Binding operations (staple, spiral, perfect).
pub const OP_BINDING: &str = "binding";

/// Hole drilling operations.
pub const OP_DRILLING: &str = "drilling";

/// Mounting operations (frames, stands).
pub const OP_MOUNTING: &str = "mounting";

/// All valid operation-type tags.
pub const VALID_OPERATION_TYPES: &[&str] = &[
    OP_CUTTING,
    OP_LAMINATION,
    OP_FOLDING,
    OP_BINDING,
    OP_DRILLING,
    OP_MOUNTING,
];

/// Validate that `value` is one of the allowed operation-type tags.
pub fn validate_operation_type(value: &str) -> Result<(), CoreError> {
    if VALID_OPERATION_TYPES.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid operation type '{value}'. Must be one of: {}",
            VALID_OPERATION_TYPES.join(", ")
        )))
    }
}

/// A post-processing service offered by the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishingService {
    pub id: DbId,
    pub name: String,
    /// One of [`VALID_OPERATION_TYPES`].
    pub operation_type: String,
    pub default_price_unit: PriceUnit,
    pub active: bool,
}

/// Look up an active finishing service by id.
pub fn find_finishing_service(catalog: &[FinishingService], id: DbId) -> Option<&FinishingService> {
    catalog.iter().find(|s| s.active && s.id == id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
