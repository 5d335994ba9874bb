//! Configuration access port trait.

use crate::domain::error::HighedgeError;

pub trait ConfigPort {
    /// Raw value of `key` in `section`, if present.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// A non-blank string value, or `ConfigMissing`.
    fn require_string(&self, section: &str, key: &str) -> Result<String, HighedgeError> {
        match self.get_string(section, key) {
            Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            _ => Err(HighedgeError::ConfigMissing {
                section: section.to_string(),
                key: key.to_string(),
            }),
        }
    }

    /// A non-blank string value, or `default`.
    fn get_string_or(&self, section: &str, key: &str, default: &str) -> String {
        self.require_string(section, key)
            .unwrap_or_else(|_| default.to_string())
    }
}
