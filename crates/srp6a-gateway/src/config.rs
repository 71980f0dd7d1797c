//! INI-style configuration with environment variable overrides, read the
//! way the teacher's own config module does it (a lazily-initialized
//! global `Mutex<Config>`) — kept as a hand-rolled parser rather than
//! pulled in from a crate, since the teacher's workspace already carries a
//! `configparser` dependency it never actually uses for this; this module
//! is its replacement, not a second implementation of the same idea.

use std::collections::HashMap;
use std::path::Path;

use parking_lot::Mutex;

static CONFIG: once_cell::sync::Lazy<Mutex<Config>> = once_cell::sync::Lazy::new(|| Mutex::new(Config::new()));

pub fn get_config() -> &'static Mutex<Config> {
    &CONFIG
}

pub struct Config {
    values: HashMap<String, String>,
    filename: String,
    env_prefix: String,
}

impl Config {
    pub fn new() -> Self {
        Config {
            values: HashMap::new(),
            filename: String::new(),
            env_prefix: String::new(),
        }
    }

    /// Load configuration from a file. `env_prefix` (e.g. `"Srp6a_"`) names
    /// the prefix environment variables use to override any key.
    pub fn set_source(&mut self, filename: &str, env_prefix: &str) -> bool {
        self.filename = filename.to_string();
        self.env_prefix = env_prefix.to_string();
        self.reload()
    }

    pub fn reload(&mut self) -> bool {
        self.values.clear();

        let content = match std::fs::read_to_string(Path::new(&self.filename)) {
            Ok(c) => c,
            Err(_) => return false,
        };

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') || trimmed.starts_with('[') {
                continue;
            }
            if let Some(eq_pos) = trimmed.find('=') {
                let key = trimmed[..eq_pos].trim().to_string();
                let mut value = trimmed[eq_pos + 1..].trim().to_string();
                if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
                    value = value[1..value.len() - 1].to_string();
                }
                self.values.insert(key, value);
            }
        }

        true
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.get_env_or_config(key).is_some()
    }

    pub fn get_string_default(&self, key: &str, default: &str) -> String {
        self.get_env_or_config(key).unwrap_or_else(|| default.to_string())
    }

    pub fn get_bool_default(&self, key: &str, default: bool) -> bool {
        match self.get_env_or_config(key) {
            Some(val) => matches!(val.to_lowercase().as_str(), "1" | "true" | "yes"),
            None => default,
        }
    }

    pub fn get_int_default(&self, key: &str, default: i64) -> i64 {
        match self.get_env_or_config(key) {
            Some(val) => val.parse().unwrap_or(default),
            None => default,
        }
    }

    fn get_env_or_config(&self, key: &str) -> Option<String> {
        if !self.env_prefix.is_empty() {
            let env_key = format!("{}{}", self.env_prefix, key.replace('.', "_"));
            if let Ok(val) = std::env::var(&env_key) {
                return Some(val);
            }
        }
        self.values.get(key).cloned()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fall_through_when_unset() {
        let config = Config::new();
        assert_eq!(config.get_int_default("nonexistent", 42), 42);
        assert_eq!(config.get_string_default("nonexistent", "hello"), "hello");
        assert!(config.get_bool_default("nonexistent", true));
    }

    #[test]
    fn env_override_takes_precedence_over_file() {
        let mut config = Config::new();
        config.env_prefix = "Srp6aTest_".to_string();
        config.values.insert("Port".to_string(), "1111".to_string());
        std::env::set_var("Srp6aTest_Port", "2222");
        assert_eq!(config.get_int_default("Port", 0), 2222);
        std::env::remove_var("Srp6aTest_Port");
    }
}
