//! Anchored name patterns.

use regex::Regex;

use crate::ConfigError;

/// A display-name pattern that must match the WHOLE name.
///
/// `Regex::is_match` finds a match anywhere in the haystack, so the
/// configured pattern is wrapped as `^(?:...)$` before compiling.
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    regex: Regex,
}

impl NamePattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    /// [`ConfigError::InvalidRegex`] if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
            ConfigError::InvalidRegex {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// `None` for an empty or whitespace-only pattern ("no policy").
    pub fn optional(pattern: Option<&str>) -> Result<Option<Self>, ConfigError> {
        match pattern {
            Some(p) if !p.trim().is_empty() => Self::new(p).map(Some),
            _ => Ok(None),
        }
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// The pattern as configured (without the added anchors).
    pub fn as_str(&self) -> &str {
        &self.source
    }
}
