//! API key resolution.
//!
//! Keys are looked up by environment variable name. [`EnvKeySource`] reads
//! the process environment; [`StaticKeySource`] holds a fixed map and is
//! used by tests and the diagnostic CLI.
//!
//! Resolved keys are returned as [`SecretString`] so they never show up in
//! `Debug` output or logs.

use std::collections::HashMap;

use secrecy::SecretString;

/// Looks up an API key by env var name.
pub trait KeySource: Send + Sync {
    /// Returns `None` when the key is unset or blank.
    fn get(&self, env_var: &str) -> Option<SecretString>;

    fn is_present(&self, env_var: &str) -> bool {
        self.get(env_var).is_some()
    }
}

/// Reads keys from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvKeySource;

impl EnvKeySource {
    pub fn new() -> Self {
        Self
    }
}

impl KeySource for EnvKeySource {
    fn get(&self, env_var: &str) -> Option<SecretString> {
        match std::env::var(env_var) {
            Ok(val) if !val.trim().is_empty() => Some(SecretString::from(val.trim().to_string())),
            // Unset, blank, or not valid Unicode.
            _ => None,
        }
    }
}

/// Fixed key map.
#[derive(Default)]
pub struct StaticKeySource {
    keys: HashMap<String, SecretString>,
}

impl StaticKeySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, env_var: impl Into<String>, key: impl Into<String>) -> Self {
        self.keys
            .insert(env_var.into(), SecretString::from(key.into()));
        self
    }
}

impl KeySource for StaticKeySource {
    fn get(&self, env_var: &str) -> Option<SecretString> {
        self.keys.get(env_var).cloned()
    }
}
