//! Configuration for template resolution.

/// Limits and joining policy for one expansion run.
///
/// The depth and repetition bounds are kill switches: templates or candidate
/// lists that exceed them fail with a structured error instead of running
/// away.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandConfig {
    /// Maximum recursion depth across nested directives and candidate
    /// re-scanning.
    pub max_depth: u32,

    /// Upper bound on a single repetition count.
    pub max_repetitions: u32,

    /// Separator placed between repetition parts.
    pub separator: String,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            max_depth: 25,
            max_repetitions: 100,
            separator: " ".to_string(),
        }
    }
}

impl ExpandConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the recursion depth bound.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builder method to set the repetition count bound.
    #[must_use]
    pub fn with_max_repetitions(mut self, max_repetitions: u32) -> Self {
        self.max_repetitions = max_repetitions;
        self
    }

    /// Builder method to set the repetition separator.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}
