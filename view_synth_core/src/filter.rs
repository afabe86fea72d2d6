//! Include/exclude filtering of members across contributing requests.

use regex::Regex;

use crate::error::ViewError;
use crate::request::ViewRequest;

/// Union of the include and exclude rules of several requests.
///
/// Inclusion is opt-in: a member survives only when some request names it or
/// matches it with its include pattern. Exclusion is checked afterwards and
/// always wins. Patterns must match the whole member name.
#[derive(Debug, Default)]
pub struct MemberFilter {
    includes: Vec<String>,
    excludes: Vec<String>,
    include_patterns: Vec<Regex>,
    exclude_patterns: Vec<Regex>,
}

impl MemberFilter {
    /// Builds the filter for a set of contributing requests.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidPattern`] for a pattern that does not
    /// compile.
    pub fn from_requests<'a, I>(requests: I) -> Result<Self, ViewError>
    where
        I: IntoIterator<Item = &'a ViewRequest>,
    {
        let mut filter = Self::default();
        for request in requests {
            filter.includes.extend(request.includes.iter().cloned());
            filter.excludes.extend(request.excludes.iter().cloned());
            if let Some(pattern) = non_empty(request.include_pattern.as_deref()) {
                filter.include_patterns.push(compile(pattern)?);
            }
            if let Some(pattern) = non_empty(request.exclude_pattern.as_deref()) {
                filter.exclude_patterns.push(compile(pattern)?);
            }
        }
        Ok(filter)
    }

    /// Returns `true` when some request opts the member in.
    #[must_use]
    pub fn is_included(&self, name: &str) -> bool {
        self.includes.iter().any(|included| included == name)
            || self.include_patterns.iter().any(|re| re.is_match(name))
    }

    /// Returns `true` when some request opts the member out.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excludes.iter().any(|excluded| excluded == name)
            || self.exclude_patterns.iter().any(|re| re.is_match(name))
    }

    /// Final verdict: included and not excluded.
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        self.is_included(name) && !self.is_excluded(name)
    }
}

fn non_empty(pattern: Option<&str>) -> Option<&str> {
    pattern.filter(|p| !p.is_empty())
}

fn compile(pattern: &str) -> Result<Regex, ViewError> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|err| ViewError::InvalidPattern {
        pattern: pattern.to_owned(),
        source: Box::new(err),
    })
}
