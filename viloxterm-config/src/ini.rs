//! INI-like document format: `[section]` headers, `key=value` pairs,
//! values quoted when they contain spaces. See §6 for the grammar and a
//! worked example.

use crate::error::ConfigError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Parse an INI-like document into a map of section name to its key/value
/// pairs, all values kept as raw strings — typing happens in the schema
/// layer, which knows each field's expected type.
pub fn parse(text: &str) -> Result<BTreeMap<String, BTreeMap<String, String>>, ConfigError> {
    let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    let mut current: Option<String> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') {
            let Some(end) = line.find(']') else {
                return Err(ConfigError::Parse {
                    line: line_no,
                    message: "unterminated section header".into(),
                });
            };
            let name = line[1..end].trim().to_string();
            if name.is_empty() {
                return Err(ConfigError::Parse {
                    line: line_no,
                    message: "empty section name".into(),
                });
            }
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }
        let Some(section) = current.as_ref() else {
            return Err(ConfigError::Parse {
                line: line_no,
                message: "key=value pair outside any section".into(),
            });
        };
        let Some((key, value)) = line.split_once('=') else {
            return Err(ConfigError::Parse {
                line: line_no,
                message: format!("expected key=value, got {line:?}"),
            });
        };
        let key = key.trim().to_string();
        if key.is_empty() {
            return Err(ConfigError::Parse {
                line: line_no,
                message: "empty key".into(),
            });
        }
        let value = unquote(value.trim());
        sections.get_mut(section).unwrap().insert(key, value);
    }

    Ok(sections)
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}

fn quote_if_needed(value: &str) -> String {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

/// Render a settings document (as produced by [`crate::defaults::default_document`]
/// merged with overrides) to INI text. Nested objects become sections; scalar
/// values are stringified; `keyboard_shortcuts` and other object-of-string
/// categories render one `key=value` line per entry.
pub fn format_document(doc: &Value) -> String {
    let mut out = String::new();
    let Some(obj) = doc.as_object() else {
        return out;
    };

    // Meta fields have no section; emit them as a leading `[meta]` block so
    // every line in the file lives under a header, matching §6's grammar.
    let mut meta = Map::new();
    let mut sections: Vec<(&String, &Map<String, Value>)> = Vec::new();
    for (key, value) in obj {
        match value.as_object() {
            Some(section) => sections.push((key, section)),
            None => {
                meta.insert(key.clone(), value.clone());
            }
        }
    }

    if !meta.is_empty() {
        out.push_str("[meta]\n");
        for (key, value) in &meta {
            out.push_str(&format!("{key}={}\n", scalar_to_string(value)));
        }
        out.push('\n');
    }

    for (name, section) in sections {
        out.push_str(&format!("[{name}]\n"));
        for (key, value) in section {
            out.push_str(&format!(
                "{key}={}\n",
                quote_if_needed(&scalar_to_string(value))
            ));
        }
        out.push('\n');
    }

    out
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_theme_section() {
        let text = "[theme]\ntheme=dark\nfont_size=12\n";
        let parsed = parse(text).unwrap();
        assert_eq!(parsed["theme"]["theme"], "dark");
        assert_eq!(parsed["theme"]["font_size"], "12");
    }

    #[test]
    fn quotes_values_with_spaces() {
        let doc = serde_json::json!({ "keyboard_shortcuts": { "file.save": "ctrl+s" } });
        let text = format_document(&doc);
        assert!(text.contains("[keyboard_shortcuts]"));
        assert!(text.contains("file.save=ctrl+s"));
    }

    #[test]
    fn rejects_key_outside_section() {
        let err = parse("theme=dark\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 1, .. }));
    }

    #[test]
    fn rejects_unterminated_section() {
        let err = parse("[theme\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 1, .. }));
    }
}
