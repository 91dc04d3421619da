//! matcher.rs - Compiles watch terms into case-insensitive matchers.
//!
//! Raw terms are regular expressions tested against a single tag or field
//! name; a prebuilt [`Regex`] is passed through untouched. The compiled
//! [`WatchList`] answers "does any matcher fire for this name".
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use regex::{Regex, RegexBuilder};

use crate::errors::{Result, ScrubError};

/// Maximum allowed length for a raw watch term.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// A watch term as supplied by the caller.
#[derive(Debug, Clone)]
pub enum WatchTerm {
    /// Compiled case-insensitively.
    Raw(String),
    /// Used as-is.
    Pattern(Regex),
}

impl From<&str> for WatchTerm {
    fn from(term: &str) -> Self {
        WatchTerm::Raw(term.to_string())
    }
}

impl From<String> for WatchTerm {
    fn from(term: String) -> Self {
        WatchTerm::Raw(term)
    }
}

impl From<&String> for WatchTerm {
    fn from(term: &String) -> Self {
        WatchTerm::Raw(term.clone())
    }
}

impl From<Regex> for WatchTerm {
    fn from(pattern: Regex) -> Self {
        WatchTerm::Pattern(pattern)
    }
}

/// A single compiled matcher.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    /// The pattern text this matcher was built from.
    pub fn source(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// The full set of matchers, evaluated with any-match semantics.
#[derive(Debug, Clone, Default)]
pub struct WatchList {
    matchers: Vec<Matcher>,
}

impl WatchList {
    /// Compiles every term. Fails if any raw term is not a valid pattern.
    pub fn compile<I, T>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<WatchTerm>,
    {
        let mut matchers = Vec::new();
        let mut errors = Vec::new();

        for term in terms {
            match term.into() {
                WatchTerm::Pattern(regex) => matchers.push(Matcher { regex }),
                WatchTerm::Raw(raw) => {
                    if raw.is_empty() {
                        warn!("Empty watch term matches every tag and field name.");
                    }
                    match compile_raw(&raw) {
                        Ok(regex) => matchers.push(Matcher { regex }),
                        Err(e) => errors.push(e),
                    }
                }
            }
        }

        match errors.len() {
            0 => {
                debug!("Compiled {} watch term(s).", matchers.len());
                Ok(Self { matchers })
            }
            1 => Err(errors.remove(0)),
            n => {
                let report = errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<String>>()
                    .join("\n");
                Err(ScrubError::Compilation(format!(
                    "Failed to compile {} watch term(s):\n{}",
                    n, report
                )))
            }
        }
    }

    /// Returns every matcher that fires for `name`.
    pub fn matching<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Matcher> + 's {
        self.matchers.iter().filter(move |m| m.is_match(name))
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.matchers.iter().any(|m| m.is_match(name))
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

fn compile_raw(raw: &str) -> Result<Regex> {
    if raw.len() > MAX_PATTERN_LENGTH {
        return Err(ScrubError::PatternTooLong(
            raw.to_string(),
            raw.len(),
            MAX_PATTERN_LENGTH,
        ));
    }
    RegexBuilder::new(raw)
        .case_insensitive(true)
        .size_limit(10 * (1 << 20))
        .build()
        .map_err(|e| ScrubError::InvalidPattern(raw.to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_terms_are_case_insensitive_substrings() {
        let list = WatchList::compile(["password"]).unwrap();
        assert!(list.is_match("Password"));
        assert!(list.is_match("userPASSWORDHash"));
        assert!(!list.is_match("passphrase"));
    }

    #[test]
    fn test_prebuilt_pattern_passes_through() {
        let exact = Regex::new("^Token$").unwrap();
        let list = WatchList::compile(vec![WatchTerm::from(exact)]).unwrap();
        assert!(list.is_match("Token"));
        assert!(!list.is_match("token"));
        assert!(!list.is_match("AccessToken"));
    }

    #[test]
    fn test_raw_terms_are_patterns() {
        let list = WatchList::compile(["^secret_.*key$"]).unwrap();
        assert!(list.is_match("SECRET_api_KEY"));
        assert!(!list.is_match("my_secret_key"));
    }

    #[test]
    fn test_any_match_semantics_and_duplicates() {
        let list = WatchList::compile(["token", "token", "card"]).unwrap();
        assert_eq!(list.len(), 3);
        assert!(list.is_match("CreditCard"));
        assert_eq!(list.matching("accessToken").count(), 2);
    }

    #[test]
    fn test_empty_term_matches_every_name() {
        let list = WatchList::compile(["", "pin"]).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.is_match("anything"));
        assert_eq!(list.matching("Pin").count(), 2);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = WatchList::compile(["valid", "(unclosed"]).unwrap_err();
        assert!(matches!(err, ScrubError::InvalidPattern(ref term, _) if term == "(unclosed"));
    }

    #[test]
    fn test_several_invalid_patterns_are_collected() {
        let err = WatchList::compile(["(a", "[b"]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Failed to compile 2 watch term(s)"));
        assert!(message.contains("(a"));
        assert!(message.contains("[b"));
    }

    #[test]
    fn test_overlong_pattern_is_rejected() {
        let long = "x".repeat(MAX_PATTERN_LENGTH + 1);
        let err = WatchList::compile([long.as_str()]).unwrap_err();
        assert!(matches!(err, ScrubError::PatternTooLong(_, len, MAX_PATTERN_LENGTH) if len == MAX_PATTERN_LENGTH + 1));
    }
}
