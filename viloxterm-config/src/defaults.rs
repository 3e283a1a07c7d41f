//! Default settings document and per-category schemas.

use crate::schema::{CategorySchema, FieldSchema, FieldType};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// The nine settings categories named in §4.5, plus the two meta fields.
pub const CATEGORIES: &[&str] = &[
    "command_palette",
    "keyboard_shortcuts",
    "theme",
    "ui",
    "workspace",
    "editor",
    "terminal",
    "performance",
    "privacy",
];

pub const SETTINGS_VERSION: &str = "1.0";

/// Build the default document: every category present with its defaults,
/// plus `settings_version` and `last_migration` meta fields.
pub fn default_document() -> Value {
    json!({
        "settings_version": SETTINGS_VERSION,
        "last_migration": Value::Null,
        "command_palette": {
            "show_recently_used": true,
            "max_recent_items": 10
        },
        "keyboard_shortcuts": {},
        "theme": {
            "theme": "dark",
            "font_size": 13
        },
        "ui": {
            "show_tab_bar": true,
            "show_status_bar": true
        },
        "workspace": {
            "restore_on_startup": true,
            "autosave_interval_secs": 30
        },
        "editor": {
            "tab_width": 4,
            "insert_spaces": true
        },
        "terminal": {
            "scrollback_lines": 10000,
            "shell": Value::Null
        },
        "performance": {
            "max_fps": 60
        },
        "privacy": {
            "telemetry_enabled": false
        }
    })
}

/// Build the schema for each category. `keyboard_shortcuts` has no fixed
/// field set (arbitrary `command_id -> sequence` pairs), so it is validated
/// separately via [`crate::schema::shortcut_pattern`] rather than through
/// `CategorySchema`.
pub fn category_schemas() -> BTreeMap<&'static str, CategorySchema> {
    let mut schemas = BTreeMap::new();

    schemas.insert(
        "command_palette",
        schema_of([
            ("show_recently_used", FieldSchema::new(FieldType::Bool)),
            (
                "max_recent_items",
                FieldSchema::new(FieldType::Integer).with_range(0.0, 100.0),
            ),
        ]),
    );

    schemas.insert(
        "theme",
        schema_of([
            (
                "theme",
                FieldSchema::new(FieldType::String).with_enum(&["dark", "light", "system"]),
            ),
            (
                "font_size",
                FieldSchema::new(FieldType::Integer).with_range(6.0, 96.0),
            ),
        ]),
    );

    schemas.insert(
        "ui",
        schema_of([
            ("show_tab_bar", FieldSchema::new(FieldType::Bool)),
            ("show_status_bar", FieldSchema::new(FieldType::Bool)),
        ]),
    );

    schemas.insert(
        "workspace",
        schema_of([
            ("restore_on_startup", FieldSchema::new(FieldType::Bool)),
            (
                "autosave_interval_secs",
                FieldSchema::new(FieldType::Integer).with_range(1.0, 3600.0),
            ),
        ]),
    );

    schemas.insert(
        "editor",
        schema_of([
            (
                "tab_width",
                FieldSchema::new(FieldType::Integer).with_range(1.0, 16.0),
            ),
            ("insert_spaces", FieldSchema::new(FieldType::Bool)),
        ]),
    );

    schemas.insert(
        "terminal",
        schema_of([
            (
                "scrollback_lines",
                FieldSchema::new(FieldType::Integer).with_range(0.0, 1_000_000.0),
            ),
            ("shell", FieldSchema::new(FieldType::String)),
        ]),
    );

    schemas.insert(
        "performance",
        schema_of([(
            "max_fps",
            FieldSchema::new(FieldType::Integer).with_range(1.0, 1000.0),
        )]),
    );

    schemas.insert(
        "privacy",
        schema_of([("telemetry_enabled", FieldSchema::new(FieldType::Bool))]),
    );

    schemas
}

fn schema_of<const N: usize>(fields: [(&'static str, FieldSchema); N]) -> CategorySchema {
    CategorySchema {
        fields: fields.into_iter().collect(),
    }
}
