//! Text validity filters for entities and documents.
//!
//! Each flag turns on one rejection rule. With every flag off (the default)
//! only empty strings and strings longer than `max_length` are rejected.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Characters counted as "special" unless listed in `accept_special_characters`.
const SPECIAL_CHARACTERS: &str = "@#$%^&*()-_=+[]{};:\"'<>,.?/\\|~`";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    /// Reject texts that are not purely alphanumeric
    pub alphanumeric: bool,
    /// Reject texts containing ASCII digits
    pub numbers: bool,
    /// Reject texts containing ASCII punctuation
    pub punctuation: bool,
    /// Reject texts containing special characters
    pub special_characters: bool,
    /// Special characters that are allowed anyway, e.g. ".,-"
    pub accept_special_characters: Option<String>,
    /// Minimum length in code points
    pub min_length: usize,
    /// Maximum length in code points
    pub max_length: usize,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            alphanumeric: false,
            numbers: false,
            punctuation: false,
            special_characters: false,
            accept_special_characters: None,
            min_length: 0,
            max_length: 1024,
        }
    }
}

impl Filters {
    /// The effective special character set after removing accepted ones.
    pub fn special_character_set(&self) -> HashSet<char> {
        let accepted: HashSet<char> = self
            .accept_special_characters
            .as_deref()
            .unwrap_or_default()
            .chars()
            .collect();
        SPECIAL_CHARACTERS
            .chars()
            .filter(|c| !accepted.contains(c))
            .collect()
    }

    pub fn is_valid(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        if self.alphanumeric && !text.chars().all(char::is_alphanumeric) {
            debug!(text, "rejected: not alphanumeric");
            return false;
        }
        if self.numbers && text.chars().any(|c| c.is_ascii_digit()) {
            debug!(text, "rejected: contains numbers");
            return false;
        }
        if self.punctuation && text.chars().any(|c| c.is_ascii_punctuation()) {
            debug!(text, "rejected: contains punctuation");
            return false;
        }
        if self.special_characters {
            let special = self.special_character_set();
            if text.chars().any(|c| special.contains(&c)) {
                debug!(text, "rejected: contains special characters");
                return false;
            }
        }
        let len = text.chars().count();
        if len < self.min_length || len > self.max_length {
            debug!(text, len, "rejected: length out of bounds");
            return false;
        }
        true
    }
}
