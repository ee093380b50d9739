use regex::Regex;

use crate::error::AuditError;

/// Paths that are never audited.
#[derive(Debug, Clone, Default)]
pub struct ExemptionMatcher {
    patterns: Vec<Regex>,
}

impl ExemptionMatcher {
    /// Compile every pattern up front. An invalid pattern is a configuration
    /// error.
    pub fn new<I, S>(patterns: I) -> Result<Self, AuditError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p).map_err(|e| {
                    AuditError::Config(format!("invalid EXEMPT_URLS pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// True if any pattern matches anywhere in `path`.
    pub fn is_exempt(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(path))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
