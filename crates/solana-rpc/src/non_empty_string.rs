// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Non-empty string validation
//!
//! [`NonEmptyString`] rejects empty and whitespace-only input at construction,
//! so configuration structs holding one never need to re-check it.
//!
//! ```rust
//! use solana_rpc::NonEmptyString;
//!
//! let endpoint = NonEmptyString::new("https://api.mainnet-beta.solana.com").unwrap();
//! assert_eq!(endpoint.as_str(), "https://api.mainnet-beta.solana.com");
//!
//! assert!(NonEmptyString::new("").is_err());
//! assert!(NonEmptyString::new(" \t\n").is_err());
//! ```

use core::fmt;
use std::str::FromStr;

/// A string guaranteed to contain at least one non-whitespace character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyString(Box<str>);

impl NonEmptyString {
    /// Create a new `NonEmptyString`
    ///
    /// Leading and trailing whitespace is kept as given; only strings with no
    /// visible content are rejected.
    pub fn new(s: impl Into<String>) -> Result<Self, String> {
        let s = s.into();
        if s.trim().is_empty() {
            Err("String cannot be empty or whitespace-only".to_string())
        } else {
            Ok(NonEmptyString(s.into_boxed_str()))
        }
    }

    /// Get a string slice of the contained value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NonEmptyString {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_visible_content() {
        assert_eq!(NonEmptyString::new("a").unwrap().as_str(), "a");
        assert_eq!(NonEmptyString::new(" padded ").unwrap().as_str(), " padded ");
        assert_eq!("parsed".parse::<NonEmptyString>().unwrap().to_string(), "parsed");
    }

    #[test]
    fn rejects_blank_input() {
        let error = NonEmptyString::new("").unwrap_err();
        assert!(error.contains("String cannot be empty"));
        assert!(NonEmptyString::new("   ").is_err());
        assert!("\t\n".parse::<NonEmptyString>().is_err());
    }
}
