use std::collections::BTreeMap;

use tracing::debug;

/// Collapsed/expanded flags per section, independent of the Form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionExpansion {
    defaults: Vec<String>,
    sections: BTreeMap<String, bool>,
}

impl SectionExpansion {
    /// Starts with `defaults` expanded and everything else collapsed.
    pub fn new<I, S>(defaults: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let defaults: Vec<String> = defaults.into_iter().map(Into::into).collect();
        let mut expansion = Self {
            defaults,
            sections: BTreeMap::new(),
        };
        expansion.reset();
        expansion
    }

    pub fn is_expanded(&self, section: &str) -> bool {
        self.sections.get(section).copied().unwrap_or(false)
    }

    /// Flips the section and returns its new state.
    pub fn toggle(&mut self, section: &str) -> bool {
        let expanded = !self.is_expanded(section);
        self.set(section, expanded);
        expanded
    }

    pub fn set(&mut self, section: &str, expanded: bool) {
        self.sections.insert(section.to_string(), expanded);
        debug!(section, expanded, "section expansion changed");
    }

    /// Expanded sections in name order.
    pub fn expanded(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .filter(|(_, expanded)| **expanded)
            .map(|(section, _)| section.as_str())
    }

    pub fn reset(&mut self) {
        self.sections = self
            .defaults
            .iter()
            .map(|section| (section.clone(), true))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_start_expanded() {
        let expansion = SectionExpansion::new(["stammdaten", "symptomatik"]);
        assert!(expansion.is_expanded("stammdaten"));
        assert!(!expansion.is_expanded("befund"));
    }

    #[test]
    fn toggle_flips_and_reset_restores() {
        let mut expansion = SectionExpansion::new(["stammdaten"]);
        assert!(!expansion.toggle("stammdaten"));
        assert!(expansion.toggle("befund"));
        assert_eq!(expansion.expanded().collect::<Vec<_>>(), vec!["befund"]);
        expansion.reset();
        assert_eq!(expansion.expanded().collect::<Vec<_>>(), vec!["stammdaten"]);
    }
}
