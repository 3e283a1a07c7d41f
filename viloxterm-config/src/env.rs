//! Environment-variable bindings, the second-highest precedence layer
//! (below CLI, above persisted values and defaults).

use std::path::PathBuf;

/// Environment-derived overrides, mirroring [`crate::cli::CliOverrides`]'s
/// shape so the engine can apply both through the same merge step.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub settings_dir: Option<PathBuf>,
    pub settings_file: Option<PathBuf>,
    pub portable: bool,
    pub temp_settings: bool,
    pub test_mode: bool,
    pub show_confirmations: Option<bool>,
    pub debug: bool,
    pub dev: bool,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub no_file_log: bool,
    pub production: bool,
}

fn truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Read the env vars named in §4.5 from the process environment.
pub fn read_from_env() -> EnvOverrides {
    read_from(|name| std::env::var(name).ok())
}

/// Testable variant: reads through a lookup function instead of the real
/// process environment.
pub fn read_from(lookup: impl Fn(&str) -> Option<String>) -> EnvOverrides {
    EnvOverrides {
        settings_dir: lookup("APP_SETTINGS_DIR").map(PathBuf::from),
        settings_file: lookup("APP_SETTINGS_FILE").map(PathBuf::from),
        portable: lookup("APP_PORTABLE").is_some_and(|v| truthy(&v)),
        temp_settings: lookup("APP_TEMP_SETTINGS").is_some_and(|v| truthy(&v)),
        test_mode: lookup("APP_TEST_MODE").is_some_and(|v| truthy(&v)),
        show_confirmations: lookup("APP_SHOW_CONFIRMATIONS").map(|v| truthy(&v)),
        debug: lookup("APP_DEBUG").is_some_and(|v| truthy(&v)),
        dev: lookup("APP_DEV").is_some_and(|v| truthy(&v)),
        log_level: lookup("APP_LOG_LEVEL"),
        log_dir: lookup("APP_LOG_DIR").map(PathBuf::from),
        no_file_log: lookup("APP_NO_FILE_LOG").is_some_and(|v| truthy(&v)),
        production: lookup("APP_PRODUCTION").is_some_and(|v| truthy(&v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn reads_known_vars_and_ignores_unset() {
        let mut vars = HashMap::new();
        vars.insert("APP_SETTINGS_DIR".to_string(), "/tmp/a".to_string());
        vars.insert("APP_DEBUG".to_string(), "true".to_string());
        let overrides = read_from(|name| vars.get(name).cloned());
        assert_eq!(overrides.settings_dir, Some(PathBuf::from("/tmp/a")));
        assert!(overrides.debug);
        assert!(overrides.settings_file.is_none());
    }
}
