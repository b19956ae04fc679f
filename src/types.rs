//! Core types used throughout the project.

use std::fmt;

/// Which value of a unit a synchronization pass reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueSlot {
    /// Base-language text.
    Source,
    /// Translated text.
    Target,
}

impl fmt::Display for ValueSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// One key's source/target pair.
///
/// `None` means "nothing recorded", which is distinct from an explicit
/// empty string read from an interchange document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationUnit {
    pub source: Option<String>,
    pub target: Option<String>,
}

impl TranslationUnit {
    #[must_use]
    pub fn with_source(source: impl Into<String>) -> Self {
        Self { source: Some(source.into()), target: None }
    }

    #[must_use]
    pub fn get(&self, slot: ValueSlot) -> Option<&str> {
        match slot {
            ValueSlot::Source => self.source.as_deref(),
            ValueSlot::Target => self.target.as_deref(),
        }
    }

    pub fn set(&mut self, slot: ValueSlot, value: impl Into<String>) {
        let value = Some(value.into());
        match slot {
            ValueSlot::Source => self.source = value,
            ValueSlot::Target => self.target = value,
        }
    }

    /// Target if present, else source.
    #[must_use]
    pub fn best_value(&self) -> Option<&str> {
        self.target.as_deref().or(self.source.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::nothing(None, None, None)]
    #[case::source_only(Some("Hello"), None, Some("Hello"))]
    #[case::target_wins(Some("Hello"), Some("Hallo"), Some("Hallo"))]
    #[case::target_only(None, Some("Hallo"), Some("Hallo"))]
    fn test_best_value(
        #[case] source: Option<&str>,
        #[case] target: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let unit = TranslationUnit {
            source: source.map(str::to_string),
            target: target.map(str::to_string),
        };

        assert_that!(unit.best_value(), eq(expected));
    }

    #[rstest]
    fn test_set_only_touches_requested_slot() {
        let mut unit = TranslationUnit::with_source("Hello");
        unit.set(ValueSlot::Target, "Hallo");

        assert_that!(unit.get(ValueSlot::Source), some(eq("Hello")));
        assert_that!(unit.get(ValueSlot::Target), some(eq("Hallo")));
    }
}
