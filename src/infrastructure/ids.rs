/// Element id generators for graph nodes and clusters.

use crate::ports::IdGenerator;
use uuid::Uuid;

/// Random v4 uuids. Ids differ between runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// `n1`, `n2`, ... in creation order, for reproducible output.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::with_prefix("n")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Either generator, chosen at runtime from configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredIds {
    Uuid(UuidIds),
    Sequential(SequentialIds),
}

impl ConfiguredIds {
    pub fn new(stable: bool) -> Self {
        if stable {
            ConfiguredIds::Sequential(SequentialIds::default())
        } else {
            ConfiguredIds::Uuid(UuidIds)
        }
    }
}

impl IdGenerator for ConfiguredIds {
    fn next_id(&mut self) -> String {
        match self {
            ConfiguredIds::Uuid(ids) => ids.next_id(),
            ConfiguredIds::Sequential(ids) => ids.next_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::default();
        assert_eq!(ids.next_id(), "n1");
        assert_eq!(ids.next_id(), "n2");

        let mut prefixed = SequentialIds::with_prefix("g");
        assert_eq!(prefixed.next_id(), "g1");
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        let mut ids = UuidIds;
        let generated: HashSet<String> = (0..100).map(|_| ids.next_id()).collect();
        assert_eq!(generated.len(), 100);
        assert!(generated.iter().all(|id| Uuid::parse_str(id).is_ok()));
    }

    #[test]
    fn test_configured_ids() {
        let mut stable = ConfiguredIds::new(true);
        assert_eq!(stable.next_id(), "n1");

        let mut random = ConfiguredIds::new(false);
        assert!(Uuid::parse_str(&random.next_id()).is_ok());
    }
}
