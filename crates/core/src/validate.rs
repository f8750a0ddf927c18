//! Input validation for template editing (PRD-12).
//!
//! Malformed external input (empty labels, non-finite dimensions, absurd
//! boundaries) is rejected here before it reaches the range algebra or the
//! configuration tree. The editor consults these; the algebra itself stays
//! total and no-ops on whatever slips through.

use crate::error::CoreError;
use crate::types::Qty;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum length for a size label.
pub const MAX_SIZE_LABEL_LEN: usize = 200;

/// Maximum length for a type variant name.
pub const MAX_TYPE_NAME_LEN: usize = 200;

/// Maximum physical dimension in millimeters (large-format plotters top out
/// well below this).
pub const MAX_DIMENSION_MM: f64 = 10_000.0;

/// Maximum number of sizes per configuration bundle.
pub const MAX_SIZES_PER_CONFIG: usize = 50;

/// Maximum number of type variants per product.
pub const MAX_TYPES_PER_PRODUCT: usize = 20;

/// Maximum number of page-count options.
pub const MAX_PAGE_OPTIONS: usize = 50;

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate a size label: non-empty and within length limit.
pub fn validate_size_label(label: &str) -> Result<(), CoreError> {
    if label.trim().is_empty() {
        return Err(CoreError::Validation(
            "Size label must not be empty".to_string(),
        ));
    }
    if label.len() > MAX_SIZE_LABEL_LEN {
        return Err(CoreError::Validation(format!(
            "Size label too long: {} chars (max {MAX_SIZE_LABEL_LEN})",
            label.len()
        )));
    }
    Ok(())
}

/// Validate a type variant name: non-empty and within length limit.
pub fn validate_type_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Type name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_TYPE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Type name too long: {} chars (max {MAX_TYPE_NAME_LEN})",
            name.len()
        )));
    }
    Ok(())
}

/// Validate a physical dimension in millimeters.
pub fn validate_dimension_mm(value: f64) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::Validation(
            "Dimension must be a finite number".to_string(),
        ));
    }
    if value <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Dimension must be positive, got {value}"
        )));
    }
    if value > MAX_DIMENSION_MM {
        return Err(CoreError::Validation(format!(
            "Dimension too large: {value} mm (max {MAX_DIMENSION_MM})"
        )));
    }
    Ok(())
}

/// Validate a proposed tier boundary.
pub fn validate_boundary(boundary: Qty) -> Result<(), CoreError> {
    if boundary < 1 {
        return Err(CoreError::Validation(format!(
            "Tier boundary must be at least 1, got {boundary}"
        )));
    }
    Ok(())
}

/// Validate a size's optional order-quantity bounds.
pub fn validate_quantity_bounds(min: Option<Qty>, max: Option<Qty>) -> Result<(), CoreError> {
    if let Some(min) = min {
        if min < 1 {
            return Err(CoreError::Validation(format!(
                "Minimum quantity must be at least 1, got {min}"
            )));
        }
    }
    if let Some(max) = max {
        if max < 1 {
            return Err(CoreError::Validation(format!(
                "Maximum quantity must be at least 1, got {max}"
            )));
        }
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(CoreError::Validation(format!(
                "Minimum quantity ({min}) must not exceed maximum quantity ({max})"
            )));
        }
    }
    Ok(())
}

/// Validate a unit price: finite and non-negative.
pub fn validate_unit_price(price: f64) -> Result<(), CoreError> {
    if !price.is_finite() {
        return Err(CoreError::Validation(
            "Unit price must be a finite number".to_string(),
        ));
    }
    if price < 0.0 {
        return Err(CoreError::Validation(format!(
            "Unit price must not be negative, got {price}"
        )));
    }
    Ok(())
}

/// Validate a units-per-item factor: finite and strictly positive.
pub fn validate_units_per_item(value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Units per item must be positive, got {value}"
        )));
    }
    Ok(())
}

/// Validate page-count options and the pre-selected default.
pub fn validate_pages_options(options: &[i64], default: Option<i64>) -> Result<(), CoreError> {
    if options.is_empty() {
        return Err(CoreError::Validation(
            "Pages options must not be empty".to_string(),
        ));
    }
    if options.len() > MAX_PAGE_OPTIONS {
        return Err(CoreError::Validation(format!(
            "Too many pages options: {} (max {MAX_PAGE_OPTIONS})",
            options.len()
        )));
    }
    if let Some(bad) = options.iter().find(|&&o| o < 1) {
        return Err(CoreError::Validation(format!(
            "Pages options must be positive, got {bad}"
        )));
    }
    if let Some(default) = default {
        if !options.contains(&default) {
            return Err(CoreError::Validation(format!(
                "Default pages option {default} is not among the options"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- Labels and names ---

    #[test]
    fn size_label_accepts_valid() {
        assert!(validate_size_label("90 x 50 mm").is_ok());
    }

    #[test]
    fn size_label_rejects_empty_and_blank() {
        assert!(validate_size_label("").is_err());
        assert!(validate_size_label("   ").is_err());
    }

    #[test]
    fn size_label_rejects_too_long() {
        let long = "x".repeat(MAX_SIZE_LABEL_LEN + 1);
        let err = validate_size_label(&long).unwrap_err();
        assert!(err.to_string().contains("too long"));
    }

    #[test]
    fn type_name_rejects_empty() {
        assert!(validate_type_name("Laminated").is_ok());
        assert!(validate_type_name("").is_err());
    }

    // --- Dimensions ---

    #[test]
    fn dimension_accepts_valid_range() {
        assert!(validate_dimension_mm(0.1).is_ok());
        assert!(validate_dimension_mm(297.0).is_ok());
        assert!(validate_dimension_mm(MAX_DIMENSION_MM).is_ok());
    }

    #[test]
    fn dimension_rejects_nonpositive_and_nonfinite() {
        assert!(validate_dimension_mm(0.0).is_err());
        assert!(validate_dimension_mm(-5.0).is_err());
        assert!(validate_dimension_mm(f64::NAN).is_err());
        assert!(validate_dimension_mm(f64::INFINITY).is_err());
        assert!(validate_dimension_mm(MAX_DIMENSION_MM + 1.0).is_err());
    }

    // --- Boundaries and quantity bounds ---

    #[test]
    fn boundary_rejects_nonpositive() {
        assert!(validate_boundary(1).is_ok());
        assert!(validate_boundary(0).is_err());
        assert!(validate_boundary(-10).is_err());
    }

    #[test]
    fn quantity_bounds_accept_open_ends() {
        assert!(validate_quantity_bounds(None, None).is_ok());
        assert!(validate_quantity_bounds(Some(10), None).is_ok());
        assert!(validate_quantity_bounds(None, Some(5000)).is_ok());
        assert!(validate_quantity_bounds(Some(10), Some(10)).is_ok());
    }

    #[test]
    fn quantity_bounds_reject_inverted() {
        let err = validate_quantity_bounds(Some(100), Some(50)).unwrap_err();
        assert!(err.to_string().contains("must not exceed"));
        assert!(validate_quantity_bounds(Some(0), None).is_err());
    }

    // --- Prices ---

    #[test]
    fn unit_price_accepts_zero_and_positive() {
        assert!(validate_unit_price(0.0).is_ok());
        assert!(validate_unit_price(12.5).is_ok());
    }

    #[test]
    fn unit_price_rejects_negative_and_nan() {
        assert!(validate_unit_price(-0.01).is_err());
        assert!(validate_unit_price(f64::NAN).is_err());
    }

    #[test]
    fn units_per_item_must_be_positive() {
        assert!(validate_units_per_item(4.0).is_ok());
        assert!(validate_units_per_item(0.5).is_ok());
        assert!(validate_units_per_item(0.0).is_err());
        assert!(validate_units_per_item(-1.0).is_err());
    }

    // --- Pages options ---

    #[test]
    fn pages_options_accept_valid() {
        assert!(validate_pages_options(&[4, 8, 12], Some(8)).is_ok());
        assert!(validate_pages_options(&[4], None).is_ok());
    }

    #[test]
    fn pages_options_reject_empty_and_nonpositive() {
        assert!(validate_pages_options(&[], None).is_err());
        assert!(validate_pages_options(&[4, 0], None).is_err());
    }

    #[test]
    fn pages_options_reject_foreign_default() {
        let err = validate_pages_options(&[4, 8], Some(12)).unwrap_err();
        assert!(err.to_string().contains("not among the options"));
    }
}
