//! The settings engine: resolves the effective settings location from
//! CLI/env/defaults, loads and validates the document, and exposes
//! save/reset/export/import/backup plus the keyboard-shortcut API.
//!
//! Grounded on `par-term-config::config::persistence` for the load/save
//! shape (atomic save, XDG path resolution, path/permission hardening)
//! translated from YAML to the INI-like format §6 prescribes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::cli::CliOverrides;
use crate::defaults::{category_schemas, default_document, CATEGORIES};
use crate::env::EnvOverrides;
use crate::error::ConfigError;
use crate::ini;
use crate::path_validation::{validate_settings_path, warn_if_insecure_permissions};
use crate::schema::{shortcut_pattern, validate_category};

/// Where the effective settings file lives, and why — tracked so
/// Scenario E ("effective settings file is X; Y is ignored with a log
/// line") can be reported accurately.
#[derive(Debug, Clone)]
pub struct ResolvedLocation {
    pub path: PathBuf,
    pub temporary: bool,
}

/// Resolve the effective settings file path from CLI overrides (highest),
/// then env overrides, then the default XDG location.
pub fn resolve_location(cli: &CliOverrides, env: &EnvOverrides) -> ResolvedLocation {
    if cli.temp_settings || env.temp_settings {
        let dir = tempfile_settings_dir();
        return ResolvedLocation {
            path: dir.join("settings.ini"),
            temporary: true,
        };
    }

    if let Some(file) = &cli.settings_file {
        log::info!("using --settings-file {file:?}; any settings-dir override is ignored");
        return ResolvedLocation {
            path: file.clone(),
            temporary: false,
        };
    }
    if let Some(dir) = &cli.settings_dir {
        return ResolvedLocation {
            path: dir.join("settings.ini"),
            temporary: false,
        };
    }

    if let Some(file) = &env.settings_file {
        log::info!(
            "using APP_SETTINGS_FILE={file:?}; APP_SETTINGS_DIR is ignored if also set"
        );
        return ResolvedLocation {
            path: file.clone(),
            temporary: false,
        };
    }
    if let Some(dir) = &env.settings_dir {
        return ResolvedLocation {
            path: dir.join("settings.ini"),
            temporary: false,
        };
    }

    if cli.portable || env.portable {
        return ResolvedLocation {
            path: PathBuf::from("settings").join("settings.ini"),
            temporary: false,
        };
    }

    ResolvedLocation {
        path: default_settings_dir().join("settings.ini"),
        temporary: false,
    }
}

fn default_settings_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("viloapp")
}

fn tempfile_settings_dir() -> PathBuf {
    std::env::temp_dir().join(format!("viloapp-settings-{}", std::process::id()))
}

/// The loaded, validated, merged settings document plus where it lives.
pub struct SettingsEngine {
    location: ResolvedLocation,
    document: Value,
}

impl SettingsEngine {
    /// Resolve the location from CLI/env, then load (or create default) and
    /// merge/validate the document.
    pub fn load(cli: &CliOverrides, env: &EnvOverrides) -> Result<Self> {
        let location = resolve_location(cli, env);

        if cli.reset_settings {
            log::info!("--reset-settings: clearing {:?} before load", location.path);
            let _ = fs::remove_file(&location.path);
        }

        let document = if location.path.exists() {
            let base = location
                .path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            validate_settings_path(&location.path, &base)
                .map_err(ConfigError::from)
                .context("settings path failed traversal validation")?;
            warn_if_insecure_permissions(&location.path);

            let text = fs::read_to_string(&location.path)
                .with_context(|| format!("reading settings file {:?}", location.path))?;
            let sections = ini::parse(&text).map_err(ConfigError::from)?;
            merge_onto_defaults(sections)
        } else {
            log::info!("no settings file at {:?}; using defaults", location.path);
            default_document()
        };

        let mut engine = SettingsEngine { location, document };
        engine.validate_and_recover();
        Ok(engine)
    }

    pub fn location(&self) -> &ResolvedLocation {
        &self.location
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Validate every category; any field that fails validation is
    /// discarded and replaced with its default, per §7's parse-error
    /// recovery policy ("offending value is discarded and the default is
    /// kept").
    fn validate_and_recover(&mut self) {
        let schemas = category_schemas();
        let defaults = default_document();
        for category in CATEGORIES {
            let category: &str = category;
            if category == "keyboard_shortcuts" {
                self.recover_shortcuts();
                continue;
            }
            let Some(schema) = schemas.get(category) else {
                continue;
            };
            let Some(doc_obj) = self.document.get(category).and_then(Value::as_object).cloned()
            else {
                continue;
            };
            let errors = validate_category(category, &doc_obj, schema);
            if errors.is_empty() {
                continue;
            }
            let default_obj = defaults[category].as_object().cloned().unwrap_or_default();
            let mut recovered = doc_obj;
            for error in errors {
                log::warn!("settings validation: {error}");
                if let crate::error::ConfigError::Validation { path, .. } = error {
                    if let Some(field) = path.rsplit('.').next() {
                        if let Some(default_value) = default_obj.get(field) {
                            recovered.insert(field.to_string(), default_value.clone());
                        } else {
                            recovered.remove(field);
                        }
                    }
                }
            }
            self.document[category] = Value::Object(recovered);
        }
    }

    fn recover_shortcuts(&mut self) {
        let re = shortcut_pattern();
        let Some(obj) = self
            .document
            .get("keyboard_shortcuts")
            .and_then(Value::as_object)
            .cloned()
        else {
            return;
        };
        let mut recovered = Map::new();
        for (command_id, value) in obj {
            match value.as_str() {
                Some(seq) if re.is_match(seq) => {
                    recovered.insert(command_id, value);
                }
                _ => {
                    log::warn!("discarding invalid shortcut for {command_id}: {value}");
                }
            }
        }
        self.document["keyboard_shortcuts"] = Value::Object(recovered);
    }

    /// Persist the document to its resolved location, atomically
    /// (write-to-temp-then-rename), creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.location.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating settings directory {parent:?}"))?;
        }
        let text = ini::format_document(&self.document);
        let temp_path = self.location.path.with_extension("ini.tmp");
        fs::write(&temp_path, &text)
            .with_context(|| format!("writing temp settings file {temp_path:?}"))?;
        fs::rename(&temp_path, &self.location.path)
            .with_context(|| format!("renaming temp settings file to {:?}", self.location.path))?;
        Ok(())
    }

    /// Reset the in-memory document to defaults (does not touch disk until
    /// `save` is called).
    pub fn reset(&mut self) {
        self.document = default_document();
    }

    pub fn export(&self, path: &Path) -> Result<()> {
        let text = ini::format_document(&self.document);
        fs::write(path, text).with_context(|| format!("exporting settings to {path:?}"))
    }

    /// Import a settings file, merging its values onto the current
    /// document. Returns the number of fields imported.
    pub fn import(&mut self, path: &Path) -> Result<usize> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading import file {path:?}"))?;
        let sections = ini::parse(&text).map_err(ConfigError::from)?;
        let count = sections.values().map(BTreeMap::len).sum();
        let merged = merge_onto_defaults(sections);
        for category in CATEGORIES {
            let category: &str = category;
            if let Some(incoming) = merged.get(category) {
                self.document[category] = incoming.clone();
            }
        }
        self.validate_and_recover();
        Ok(count)
    }

    pub fn backup(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("creating backup directory {dir:?}"))?;
        let dest = dir.join("settings.ini.bak");
        let text = ini::format_document(&self.document);
        fs::write(&dest, text).with_context(|| format!("writing backup {dest:?}"))?;
        Ok(dest)
    }

    /// Set a keyboard shortcut binding; the sequence must already match the
    /// grammar (callers should run it through the keybinding parser first,
    /// but this validates defensively too).
    pub fn set_shortcut(&mut self, command_id: &str, sequence: &str) -> Result<(), ConfigError> {
        if !shortcut_pattern().is_match(sequence) {
            return Err(ConfigError::Validation {
                path: format!("keyboard_shortcuts.{command_id}"),
                message: format!("{sequence:?} does not match the shortcut grammar"),
            });
        }
        self.document["keyboard_shortcuts"][command_id] = Value::String(sequence.to_string());
        Ok(())
    }

    pub fn unset_shortcut(&mut self, command_id: &str) {
        if let Some(obj) = self.document["keyboard_shortcuts"].as_object_mut() {
            obj.remove(command_id);
        }
    }

    /// Cycle `theme.theme` through its enum values (`dark` -> `light` ->
    /// `system` -> `dark`), returning the new value.
    pub fn toggle_theme(&mut self) -> String {
        let current = self.document["theme"]["theme"]
            .as_str()
            .unwrap_or("dark")
            .to_string();
        let next = match current.as_str() {
            "dark" => "light",
            "light" => "system",
            _ => "dark",
        };
        self.document["theme"]["theme"] = Value::String(next.to_string());
        next.to_string()
    }

    pub fn get_shortcuts(&self) -> BTreeMap<String, String> {
        self.document["keyboard_shortcuts"]
            .as_object()
            .map(|obj| {
                obj.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Merge parsed INI sections onto the default document: every category
/// present in defaults is kept, with any matching keys from the persisted
/// file overriding the default's value by (best-effort) type coercion.
fn merge_onto_defaults(sections: BTreeMap<String, BTreeMap<String, String>>) -> Value {
    let mut doc = default_document();
    for (section_name, pairs) in sections {
        let section_name = if section_name == "meta" {
            // meta fields were flattened into a synthetic section on save;
            // fold them back onto the document root.
            for (key, value) in pairs {
                doc[key.as_str()] = coerce(&value);
            }
            continue;
        } else {
            section_name
        };
        for (key, value) in pairs {
            doc[section_name.as_str()][key.as_str()] = coerce(&value);
        }
    }
    doc
}

fn coerce(raw: &str) -> Value {
    if let Ok(b) = raw.parse::<bool>() {
        return Value::Bool(b);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::from(f);
    }
    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn cli(settings_file: Option<PathBuf>) -> CliOverrides {
        CliOverrides {
            settings_file,
            ..Default::default()
        }
    }

    #[test]
    fn scenario_e_cli_settings_file_wins_over_env_settings_dir() {
        let env = EnvOverrides {
            settings_dir: Some(PathBuf::from("/tmp/a")),
            ..Default::default()
        };
        let overrides = cli(Some(PathBuf::from("/tmp/b.ini")));
        let location = resolve_location(&overrides, &env);
        assert_eq!(location.path, PathBuf::from("/tmp/b.ini"));
    }

    #[test]
    fn load_creates_defaults_when_file_absent() {
        let dir = tempdir().unwrap();
        let overrides = cli(Some(dir.path().join("settings.ini")));
        let env = EnvOverrides::default();
        let engine = SettingsEngine::load(&overrides, &env).unwrap();
        assert_eq!(engine.document()["theme"]["theme"], "dark");
    }

    #[test]
    fn save_then_load_round_trips_a_shortcut() {
        let dir = tempdir().unwrap();
        let overrides = cli(Some(dir.path().join("settings.ini")));
        let env = EnvOverrides::default();
        let mut engine = SettingsEngine::load(&overrides, &env).unwrap();
        engine.set_shortcut("file.save", "ctrl+s").unwrap();
        engine.save().unwrap();

        let reloaded = SettingsEngine::load(&overrides, &env).unwrap();
        assert_eq!(
            reloaded.get_shortcuts().get("file.save").map(String::as_str),
            Some("ctrl+s")
        );
    }

    #[test]
    fn invalid_shortcut_is_discarded_and_default_kept() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        std::fs::write(&path, "[keyboard_shortcuts]\nfile.save=+broken\n").unwrap();
        let overrides = cli(Some(path));
        let env = EnvOverrides::default();
        let engine = SettingsEngine::load(&overrides, &env).unwrap();
        assert!(engine.get_shortcuts().get("file.save").is_none());
    }

    #[test]
    fn font_size_out_of_range_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        std::fs::write(&path, "[theme]\nfont_size=999\n").unwrap();
        let overrides = cli(Some(path));
        let env = EnvOverrides::default();
        let engine = SettingsEngine::load(&overrides, &env).unwrap();
        assert_eq!(engine.document()["theme"]["font_size"], 13);
    }
}
