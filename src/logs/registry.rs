use crate::config::is_plain_component;
use crate::error::{Result, RunlogError};
use std::collections::HashSet;

/// Logger names already bound to a file in the current run
#[derive(Debug, Default)]
pub struct NameRegistry {
    names: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name` for a new logger
    ///
    /// # Returns
    /// * `Ok(())` - The name was free and is now claimed
    /// * `Err(RunlogError::DuplicateLogger)` - Another logger already uses the name
    /// * `Err(RunlogError::InvalidLoggerName)` - The name cannot be used as a file stem
    pub fn claim(&mut self, name: &str) -> Result<()> {
        if !is_plain_component(name) {
            return Err(RunlogError::InvalidLoggerName(name.to_string()));
        }

        if !self.names.insert(name.to_string()) {
            return Err(RunlogError::DuplicateLogger(name.to_string()));
        }

        Ok(())
    }

    /// Give a name back, e.g. after its file could not be created
    pub fn release(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Claimed names in sorted order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.iter().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_and_duplicate() {
        let mut registry = NameRegistry::new();

        registry.claim("err").unwrap();
        assert!(registry.contains("err"));

        let result = registry.claim("err");
        assert!(matches!(result, Err(RunlogError::DuplicateLogger(ref n)) if n == "err"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_names_compare_literally() {
        let mut registry = NameRegistry::new();

        registry.claim("Stats").unwrap();
        registry.claim("stats").unwrap();
        registry.claim("stats2").unwrap();

        assert_eq!(registry.names(), vec!["Stats", "stats", "stats2"]);
    }

    #[test]
    fn test_invalid_names() {
        let mut registry = NameRegistry::new();

        for name in ["", ".", "..", "a/b", "a\\b"] {
            assert!(matches!(
                registry.claim(name),
                Err(RunlogError::InvalidLoggerName(_))
            ));
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_release() {
        let mut registry = NameRegistry::new();

        registry.claim("tmp").unwrap();
        assert!(registry.release("tmp"));
        assert!(!registry.release("tmp"));

        // Released names can be claimed again
        registry.claim("tmp").unwrap();
    }
}
