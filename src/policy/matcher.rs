use crate::ConfigError;
use regex::Regex;

/// An include pattern paired with an optional exclude pattern
///
/// A candidate matches when the include pattern finds a match anywhere in it
/// and the exclude pattern (if any) does not. Patterns are unanchored; use
/// `^`/`$` in the pattern itself to anchor.
#[derive(Debug, Clone)]
pub struct Matcher {
    include: Regex,
    exclude: Option<Regex>,
}

impl Matcher {
    /// Compiles a matcher, naming the offending config field on failure
    pub fn new(
        include: &str,
        exclude: Option<&str>,
        include_field: &'static str,
        exclude_field: &'static str,
    ) -> Result<Self, ConfigError> {
        let include = compile(include, include_field)?;
        let exclude = exclude
            .map(|pattern| compile(pattern, exclude_field))
            .transpose()?;
        Ok(Self { include, exclude })
    }

    /// Returns true if the candidate is included and not excluded
    pub fn matches(&self, candidate: &str) -> bool {
        self.include.is_match(candidate)
            && !self
                .exclude
                .as_ref()
                .is_some_and(|exclude| exclude.is_match(candidate))
    }

    pub fn include(&self) -> &str {
        self.include.as_str()
    }

    pub fn exclude(&self) -> Option<&str> {
        self.exclude.as_ref().map(Regex::as_str)
    }
}

/// Compiles a single pattern for the given config field
pub fn compile(pattern: &str, field: &'static str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern { field, source })
}
