//! Legacy record decoding (PRD-35).
//!
//! Stored template configs written by earlier releases carry shapes the
//! strict in-memory model no longer has: inline `tiers` arrays on finishing
//! selections (finishing pricing moved to external resolution by service
//! id), and `pages.options` encoded as a single string (either a serialized
//! JSON array or a semicolon-delimited list, sometimes with `key:value`
//! items). This adapter runs at the persistence boundary, rewrites those
//! shapes, and reports what it had to touch so the caller can log it. The
//! core model itself stays legacy-free.

use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::simplified::SimplifiedConfig;

// ---------------------------------------------------------------------------
// Option string parsing
// ---------------------------------------------------------------------------

/// One `key:value` item from a legacy options string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueOption {
    pub key: String,
    pub value: String,
}

/// Classified content of a legacy options string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedOptions {
    /// Plain items ("4", "8", "glossy").
    StringList(Vec<String>),
    /// Every item had `key:value` form.
    KeyValueList(Vec<KeyValueOption>),
}

impl ParsedOptions {
    pub fn len(&self) -> usize {
        match self {
            Self::StringList(items) => items.len(),
            Self::KeyValueList(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric interpretation: each item (the value part for `key:value`
    /// items) parsed as an integer, non-numeric entries skipped.
    pub fn into_numbers(self) -> Vec<i64> {
        match self {
            Self::StringList(items) => items
                .iter()
                .filter_map(|item| item.trim().parse().ok())
                .collect(),
            Self::KeyValueList(pairs) => pairs
                .iter()
                .filter_map(|pair| pair.value.trim().parse().ok())
                .collect(),
        }
    }
}

/// Parse a legacy options string.
///
/// A string starting with `[` is tried as a serialized JSON array first;
/// anything else (or a failed parse) is split on semicolons. Items are
/// trimmed and empty items dropped. The result is a `KeyValueList` only
/// when every item contains a colon.
pub fn parse_options(raw: &str) -> ParsedOptions {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        if let Ok(Value::Array(values)) = serde_json::from_str(trimmed) {
            let items = values
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.trim().to_string(),
                    other => other.to_string(),
                })
                .filter(|s| !s.is_empty())
                .collect();
            return classify(items);
        }
    }
    let items = trimmed
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    classify(items)
}

fn classify(items: Vec<String>) -> ParsedOptions {
    let pairs: Option<Vec<KeyValueOption>> = items
        .iter()
        .map(|item| {
            item.split_once(':').map(|(key, value)| KeyValueOption {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
            })
        })
        .collect();
    match pairs {
        Some(pairs) if !pairs.is_empty() => ParsedOptions::KeyValueList(pairs),
        _ => ParsedOptions::StringList(items),
    }
}

// ---------------------------------------------------------------------------
// Config decoding
// ---------------------------------------------------------------------------

/// What the adapter had to rewrite while decoding a stored record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LegacyReport {
    /// Inline finishing tier tables removed.
    pub finishing_tiers_dropped: usize,
    /// `pages.options` fields rewritten from a legacy encoding.
    pub options_strings_parsed: usize,
}

impl LegacyReport {
    pub fn is_clean(&self) -> bool {
        self.finishing_tiers_dropped == 0 && self.options_strings_parsed == 0
    }
}

/// Decode a stored config value into the strict model, rewriting legacy
/// shapes first. Fails only when the cleaned value still does not match the
/// model (a genuinely corrupt record).
pub fn decode_simplified(raw: &Value) -> Result<(SimplifiedConfig, LegacyReport), CoreError> {
    let mut cleaned = raw.clone();
    let mut report = LegacyReport::default();

    if let Some(root) = cleaned.as_object_mut() {
        if let Some(sizes) = root.get_mut("sizes").and_then(Value::as_array_mut) {
            for size in sizes {
                report.finishing_tiers_dropped += strip_finishing_tiers(size);
            }
        }
        if let Some(pages) = root.get_mut("pages") {
            report.options_strings_parsed += rewrite_pages_options(pages);
        }
        if let Some(type_configs) = root.get_mut("typeConfigs").and_then(Value::as_object_mut) {
            for config in type_configs.values_mut() {
                if let Some(sizes) = config.get_mut("sizes").and_then(Value::as_array_mut) {
                    for size in sizes {
                        report.finishing_tiers_dropped += strip_finishing_tiers(size);
                    }
                }
                if let Some(pages) = config.get_mut("pages") {
                    report.options_strings_parsed += rewrite_pages_options(pages);
                }
            }
        }
    }

    let config = serde_json::from_value(cleaned)
        .map_err(|e| CoreError::InvalidConfig(format!("Cannot decode simplified config: {e}")))?;
    Ok((config, report))
}

fn strip_finishing_tiers(size: &mut Value) -> usize {
    let mut dropped = 0;
    if let Some(finishing) = size.get_mut("finishing").and_then(Value::as_array_mut) {
        for entry in finishing {
            if let Some(obj) = entry.as_object_mut() {
                if obj.remove("tiers").is_some() {
                    dropped += 1;
                }
            }
        }
    }
    dropped
}

fn rewrite_pages_options(pages: &mut Value) -> usize {
    let obj = match pages.as_object_mut() {
        Some(obj) => obj,
        None => return 0,
    };
    let options = match obj.get_mut("options") {
        Some(options) => options,
        None => return 0,
    };
    let numbers: Vec<i64> = match options {
        Value::String(raw) => parse_options(raw).into_numbers(),
        Value::Array(items) => {
            if !items.iter().any(Value::is_string) {
                return 0;
            }
            items
                .iter()
                .filter_map(|v| match v {
                    Value::String(s) => s.trim().parse().ok(),
                    Value::Number(n) => n.as_i64(),
                    _ => None,
                })
                .collect()
        }
        _ => return 0,
    };
    *options = Value::Array(numbers.into_iter().map(Value::from).collect());
    1
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    // -- parse_options ------------------------------------------------------

    #[test]
    fn parses_serialized_json_array() {
        let parsed = parse_options(r#"["4", "8", "12"]"#);
        assert_eq!(
            parsed,
            ParsedOptions::StringList(vec!["4".into(), "8".into(), "12".into()])
        );
        assert_eq!(parsed.into_numbers(), vec![4, 8, 12]);
    }

    #[test]
    fn parses_json_array_of_numbers() {
        let parsed = parse_options("[4, 8]");
        assert_eq!(parsed.into_numbers(), vec![4, 8]);
    }

    #[test]
    fn parses_semicolon_list_with_whitespace() {
        let parsed = parse_options("4; 8 ;12;");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.into_numbers(), vec![4, 8, 12]);
    }

    #[test]
    fn classifies_key_value_items() {
        let parsed = parse_options("Color: Red; Size:XL");
        assert_eq!(
            parsed,
            ParsedOptions::KeyValueList(vec![
                KeyValueOption {
                    key: "Color".into(),
                    value: "Red".into()
                },
                KeyValueOption {
                    key: "Size".into(),
                    value: "XL".into()
                },
            ])
        );
    }

    #[test]
    fn mixed_items_stay_a_string_list() {
        let parsed = parse_options("Color:Red;Plain");
        assert_matches!(parsed, ParsedOptions::StringList(_));
    }

    #[test]
    fn empty_input_is_an_empty_string_list() {
        let parsed = parse_options("   ");
        assert!(parsed.is_empty());
        assert!(parsed.into_numbers().is_empty());
    }

    #[test]
    fn numbers_skip_non_numeric_items() {
        assert_eq!(parse_options("4;glossy;8").into_numbers(), vec![4, 8]);
        assert_eq!(
            parse_options("pages:4;copies:two").into_numbers(),
            vec![4]
        );
    }

    // -- decode_simplified --------------------------------------------------

    fn legacy_record() -> Value {
        json!({
            "cutting": true,
            "sizes": [{
                "id": "s1",
                "label": "90x50",
                "widthMm": 90.0,
                "heightMm": 50.0,
                "finishing": [{
                    "serviceId": 11,
                    "priceUnit": "per_cut",
                    "unitsPerItem": 4.0,
                    "tiers": [{"minQty": 1, "maxQty": null, "unitPrice": 0.5}]
                }]
            }],
            "pages": {"options": "4;8;12", "default": 8},
            "types": [{"id": "t1", "name": "Standard", "default": true}],
            "typeConfigs": {
                "t1": {
                    "sizes": [{
                        "id": "s2",
                        "label": "A6",
                        "widthMm": 105.0,
                        "heightMm": 148.0,
                        "finishing": [
                            {"serviceId": 11, "priceUnit": "per_cut", "tiers": []},
                            {"serviceId": 12, "priceUnit": "per_item"}
                        ]
                    }],
                    "pages": {"options": ["4", "8"]}
                }
            }
        })
    }

    #[test]
    fn decode_strips_finishing_tiers_everywhere() {
        let (config, report) = decode_simplified(&legacy_record()).unwrap();
        assert_eq!(report.finishing_tiers_dropped, 2);
        assert_eq!(config.sizes[0].finishing[0].service_id, 11);
        assert_eq!(config.type_configs["t1"].sizes[0].finishing.len(), 2);
    }

    #[test]
    fn decode_rewrites_options_strings_root_and_per_type() {
        let (config, report) = decode_simplified(&legacy_record()).unwrap();
        assert_eq!(report.options_strings_parsed, 2);
        let root_pages = config.pages.unwrap();
        assert_eq!(root_pages.options, vec![4, 8, 12]);
        assert_eq!(root_pages.default_option, Some(8));
        let typed_pages = config.type_configs["t1"].pages.clone().unwrap();
        assert_eq!(typed_pages.options, vec![4, 8]);
    }

    #[test]
    fn decode_modern_record_is_clean() {
        let raw = json!({
            "sizes": [{
                "id": "s1",
                "label": "90x50",
                "widthMm": 90.0,
                "heightMm": 50.0,
                "finishing": [{"serviceId": 11, "priceUnit": "per_cut", "unitsPerItem": 4.0}]
            }],
            "pages": {"options": [4, 8]}
        });
        let (config, report) = decode_simplified(&raw).unwrap();
        assert!(report.is_clean());
        assert_eq!(config.pages.unwrap().options, vec![4, 8]);
    }

    #[test]
    fn decode_rejects_corrupt_record() {
        let raw = json!({"sizes": 42});
        let err = decode_simplified(&raw).unwrap_err();
        assert_matches!(err, CoreError::InvalidConfig(_));
    }

    #[test]
    fn decode_empty_object_yields_default_config() {
        let (config, report) = decode_simplified(&json!({})).unwrap();
        assert!(report.is_clean());
        assert_eq!(config, SimplifiedConfig::default());
    }
}
