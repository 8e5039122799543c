//! Analysis configuration.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Immutable analysis configuration.
///
/// All sets hold namespace names and default to empty, which disables the
/// corresponding special-case behavior. Names not present in the analysed
/// tree are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisOptions {
    /// Namespaces in which missing inner class names are completed from the
    /// enclosing class's name.
    pub inner_class_name_completion_candidates: BTreeSet<String>,

    /// Namespaces whose method names identify an override when source names
    /// differ (typically a stable numeric naming scheme).
    pub inheritance_additional_namespaces: BTreeSet<String>,

    /// Namespaces never touched by inheritance correction.
    pub inheritance_error_exemptions: BTreeSet<String>,
}

impl AnalysisOptions {
    /// Options with every special case disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inner class name completion candidates.
    pub fn with_inner_class_name_completion_candidates<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner_class_name_completion_candidates = namespaces.into_iter().map(Into::into).collect();
        self
    }

    /// Set the alternate override identity namespaces.
    pub fn with_inheritance_additional_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inheritance_additional_namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    /// Set the namespaces exempt from inheritance correction.
    pub fn with_inheritance_error_exemptions<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inheritance_error_exemptions = namespaces.into_iter().map(Into::into).collect();
        self
    }

    /// Merge another option set into this one (set union per field).
    pub fn merge(mut self, other: AnalysisOptions) -> Self {
        self.inner_class_name_completion_candidates
            .extend(other.inner_class_name_completion_candidates);
        self.inheritance_additional_namespaces
            .extend(other.inheritance_additional_namespaces);
        self.inheritance_error_exemptions
            .extend(other.inheritance_error_exemptions);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_empty() {
        let options = AnalysisOptions::default();
        assert!(options.inner_class_name_completion_candidates.is_empty());
        assert!(options.inheritance_additional_namespaces.is_empty());
        assert!(options.inheritance_error_exemptions.is_empty());
    }

    #[test]
    fn builders_and_merge() {
        let options = AnalysisOptions::new()
            .with_inner_class_name_completion_candidates(["spigot"])
            .with_inheritance_additional_namespaces(vec!["searge".to_string()])
            .merge(AnalysisOptions::new().with_inheritance_error_exemptions(["yarn"]))
            .merge(AnalysisOptions::new().with_inner_class_name_completion_candidates(["mojang"]));

        assert_eq!(
            options.inner_class_name_completion_candidates,
            BTreeSet::from(["mojang".to_string(), "spigot".to_string()])
        );
        assert!(options.inheritance_additional_namespaces.contains("searge"));
        assert!(options.inheritance_error_exemptions.contains("yarn"));
    }

    #[test]
    fn deserializes_partial_tables() {
        let options: AnalysisOptions =
            serde_json::from_str(r#"{"inheritance_additional_namespaces":["searge"]}"#).unwrap();
        assert!(options.inner_class_name_completion_candidates.is_empty());
        assert!(options.inheritance_additional_namespaces.contains("searge"));
    }
}
