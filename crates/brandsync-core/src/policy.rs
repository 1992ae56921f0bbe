//! Run-mode policies that the extractor cannot infer on its own.
//!
//! Each policy is parsed from its snake_case name so it can be supplied via
//! environment variables or CLI flags.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identity key used when collapsing duplicate brand records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Case-insensitive name only. Two distinct logos sharing a cleaned name
    /// collapse into the first one seen.
    #[default]
    Name,
    /// Case-insensitive name plus the exact logo URL.
    NameAndLogo,
}

/// Final ordering of the extracted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Case-insensitive alphabetical order by name.
    #[default]
    Alphabetical,
    /// Selector order, i.e. the order candidates were first encountered.
    Insertion,
}

/// What an extraction that produced zero records should report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPolicy {
    /// Substitute the fixed placeholder records and report `fallback`.
    #[default]
    Fallback,
    /// Report `error`; the caller treats the run as failed.
    Fail,
}

macro_rules! impl_policy_str {
    ($ty:ty, $($variant:path => $name:literal),+ $(,)?) => {
        impl $ty {
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $($variant => $name,)+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($variant),)+
                    other => Err(format!(
                        "unknown value '{other}'; expected one of: {}",
                        [$($name),+].join(", ")
                    )),
                }
            }
        }
    };
}

impl_policy_str!(DedupPolicy, DedupPolicy::Name => "name", DedupPolicy::NameAndLogo => "name_and_logo");
impl_policy_str!(SortOrder, SortOrder::Alphabetical => "alphabetical", SortOrder::Insertion => "insertion");
impl_policy_str!(EmptyPolicy, EmptyPolicy::Fallback => "fallback", EmptyPolicy::Fail => "fail");
