//! Minimal typed schema validator.
//!
//! A real JSON-schema validator is unavailable in this stack (the teacher
//! pack does not carry one), so per §4.5 this covers booleans, enums,
//! integers, and pattern checks for the fields that matter: theme names,
//! font sizes, and the keyboard-shortcut grammar.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::error::ConfigError;

/// The type a single field in a category schema is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    Integer,
    Float,
    String,
}

/// Schema for one field within a settings category.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub ty: FieldType,
    pub enum_values: Option<&'static [&'static str]>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub pattern: Option<&'static str>,
}

impl FieldSchema {
    pub const fn new(ty: FieldType) -> Self {
        FieldSchema {
            ty,
            enum_values: None,
            minimum: None,
            maximum: None,
            pattern: None,
        }
    }

    pub const fn with_enum(mut self, values: &'static [&'static str]) -> Self {
        self.enum_values = Some(values);
        self
    }

    pub const fn with_range(mut self, min: f64, max: f64) -> Self {
        self.minimum = Some(min);
        self.maximum = Some(max);
        self
    }

    pub const fn with_pattern(mut self, pattern: &'static str) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

/// Schema for an entire category: `additionalProperties: false` — any key
/// not named here is rejected.
#[derive(Debug, Clone, Default)]
pub struct CategorySchema {
    pub fields: BTreeMap<&'static str, FieldSchema>,
}

/// The shortcut-sequence grammar, shared by the settings schema and the
/// keybinding parser's `validate`: zero or more `modifier+` prefixes
/// followed by a key name, optionally chained with spaces for chord
/// sequences, or empty to mean "disabled".
pub fn shortcut_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^$|^(?:(?:ctrl|shift|alt|meta)\+)*[a-z0-9]+(?: (?:(?:ctrl|shift|alt|meta)\+)*[a-z0-9]+)*$")
            .expect("static shortcut pattern is valid regex")
    })
}

/// Validate one field's value against its schema. Returns a dotted-path
/// error on failure; the caller discards the offending value and keeps the
/// default (per §7's Parse-error recovery policy).
pub fn validate_field(path: &str, value: &Value, schema: &FieldSchema) -> Result<(), ConfigError> {
    match schema.ty {
        FieldType::Bool => {
            if !value.is_boolean() {
                return Err(ConfigError::Validation {
                    path: path.to_string(),
                    message: "expected a boolean".into(),
                });
            }
        }
        FieldType::Integer => {
            let n = value.as_i64().ok_or_else(|| ConfigError::Validation {
                path: path.to_string(),
                message: "expected an integer".into(),
            })?;
            check_range(path, n as f64, schema)?;
        }
        FieldType::Float => {
            let n = value.as_f64().ok_or_else(|| ConfigError::Validation {
                path: path.to_string(),
                message: "expected a number".into(),
            })?;
            check_range(path, n, schema)?;
        }
        FieldType::String => {
            let s = value.as_str().ok_or_else(|| ConfigError::Validation {
                path: path.to_string(),
                message: "expected a string".into(),
            })?;
            if let Some(allowed) = schema.enum_values {
                if !allowed.contains(&s) {
                    return Err(ConfigError::Validation {
                        path: path.to_string(),
                        message: format!("{s:?} is not one of {allowed:?}"),
                    });
                }
            }
            if let Some(pattern) = schema.pattern {
                let re = Regex::new(pattern).map_err(|e| ConfigError::Validation {
                    path: path.to_string(),
                    message: format!("invalid pattern {pattern:?}: {e}"),
                })?;
                if !re.is_match(s) {
                    return Err(ConfigError::Validation {
                        path: path.to_string(),
                        message: format!("{s:?} does not match required pattern"),
                    });
                }
            }
        }
    }
    Ok(())
}

fn check_range(path: &str, n: f64, schema: &FieldSchema) -> Result<(), ConfigError> {
    if let Some(min) = schema.minimum {
        if n < min {
            return Err(ConfigError::Validation {
                path: path.to_string(),
                message: format!("{n} is below minimum {min}"),
            });
        }
    }
    if let Some(max) = schema.maximum {
        if n > max {
            return Err(ConfigError::Validation {
                path: path.to_string(),
                message: format!("{n} is above maximum {max}"),
            });
        }
    }
    Ok(())
}

/// Validate an entire category document against its schema:
/// `additionalProperties: false`, every known field type-checked.
pub fn validate_category(
    category: &str,
    doc: &serde_json::Map<String, Value>,
    schema: &CategorySchema,
) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    for (key, value) in doc {
        if value.is_null() {
            // Null marks an optional field as unset (e.g. terminal.shell
            // falling back to the platform default); schema types below
            // don't need to account for it explicitly.
            continue;
        }
        let path = format!("{category}.{key}");
        match schema.fields.get(key.as_str()) {
            Some(field_schema) => {
                if let Err(e) = validate_field(&path, value, field_schema) {
                    errors.push(e);
                }
            }
            None => errors.push(ConfigError::Validation {
                path,
                message: "unknown field (additionalProperties: false)".into(),
            }),
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcut_pattern_accepts_chords_and_empty() {
        let re = shortcut_pattern();
        assert!(re.is_match(""));
        assert!(re.is_match("ctrl+s"));
        assert!(re.is_match("ctrl+k ctrl+w"));
        assert!(!re.is_match("ctrl+"));
        assert!(!re.is_match("+s"));
    }

    #[test]
    fn font_size_range_is_enforced() {
        let schema = FieldSchema::new(FieldType::Integer).with_range(6.0, 96.0);
        assert!(validate_field("theme.font_size", &Value::from(12), &schema).is_ok());
        assert!(validate_field("theme.font_size", &Value::from(200), &schema).is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let schema = CategorySchema::default();
        let mut doc = serde_json::Map::new();
        doc.insert("mystery".into(), Value::from(1));
        let errors = validate_category("theme", &doc, &schema);
        assert_eq!(errors.len(), 1);
    }
}
