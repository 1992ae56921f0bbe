use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Length of the opaque content hash some pages use as a logo filename.
pub const HASH_LEN: usize = 32;

const BUILTIN_ENTRIES: &[(&str, &str)] = &[
    ("184a2d28553c2b50231eb421f7213e45", "Ray-Ban"),
    ("a430f9e1fecbe419bf26d3d5ab83664c", "Oakley"),
    ("bd96463ebd9344c16e97e38ffc5c809a", "Persol"),
    ("0739bc198727ccdaa4d67f3a9804b994", "Oliver Peoples"),
    ("0313db8d4b5a7e74c62f5296860f0960", "Vogue"),
    ("3496e0bc713159e26ff546d1e3cf1fcf", "Prada"),
    ("23d64653bd950dc6dfe0163a3af47ced", "Miu Miu"),
    ("385a4ed3d373b3b190a1914d120c0ff2", "Chanel"),
    ("54bb8edb32fac8ff6d9a4be510dc2b29", "Versace"),
    ("2739eddf39a5c605c95e43a5a926e24b", "Dolce & Gabbana"),
    ("468dda0e88295faf336d20648aade1c2", "Emporio Armani"),
    ("dca6f94c0ea028936a376c5efdc303ee", "Giorgio Armani"),
    ("4ad723a7958bf1829940cdaf74eeda72", "Bulgari"),
    ("1f27d097ebb95d16095b8b3e2b5871a7", "Tiffany & Co."),
    ("f85b2355911eddb9f3da0bd6fc7a562a", "Burberry"),
    ("eddf1fb9e920368b5297d95315dbb74e", "Coach"),
    ("e982d880e480f8fe8377760942371974", "Michael Kors"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameMapEntry {
    pub hash: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct NameMapFile {
    pub entries: Vec<NameMapEntry>,
}

/// Static lookup from a logo-filename hash to the brand's display name.
///
/// Hashes are stored lower-cased; lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMap {
    names: BTreeMap<String, String>,
}

impl NameMap {
    /// The hashes observed on the eyewear brands page.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_ENTRIES.iter().copied())
    }

    #[must_use]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let names = pairs
            .into_iter()
            .map(|(hash, name)| (hash.to_ascii_lowercase(), name.to_string()))
            .collect();
        Self { names }
    }

    #[must_use]
    pub fn resolve(&self, hash: &str) -> Option<&str> {
        if hash.is_empty() {
            return None;
        }
        self.names
            .get(&hash.to_ascii_lowercase())
            .map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Returns `true` if `s` is exactly [`HASH_LEN`] ASCII hex digits.
#[must_use]
pub fn is_content_hash(s: &str) -> bool {
    s.len() == HASH_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Load and validate a name map from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_name_map(path: &Path) -> Result<NameMap, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::NameMapIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: NameMapFile = serde_yaml::from_str(&content)?;

    validate_entries(&file.entries)?;

    Ok(NameMap::from_pairs(
        file.entries
            .iter()
            .map(|e| (e.hash.as_str(), e.name.trim())),
    ))
}

fn validate_entries(entries: &[NameMapEntry]) -> Result<(), ConfigError> {
    let mut seen_hashes = HashSet::new();

    for entry in entries {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "entry for hash '{}' has an empty name",
                entry.hash
            )));
        }

        if !is_content_hash(&entry.hash) {
            return Err(ConfigError::Validation(format!(
                "entry '{}' has invalid hash '{}'; must be {HASH_LEN} hex characters",
                entry.name, entry.hash
            )));
        }

        if !seen_hashes.insert(entry.hash.to_ascii_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate hash: '{}'",
                entry.hash
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "name_map_test.rs"]
mod tests;
