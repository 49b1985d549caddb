//! Structured cache keys.

use super::ResourceKind;

/// Composite key for a cached resource: `(kind, fabric, identifier)`.
///
/// Immutable once built; equality and hashing derive from the full
/// triple. The `Display` form (`kind:fabric:identifier`) is for
/// diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: ResourceKind,
    fabric: String,
    identifier: String,
}

impl CacheKey {
    pub fn new(
        kind: ResourceKind,
        fabric: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            fabric: fabric.into(),
            identifier: identifier.into(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn fabric(&self) -> &str {
        &self.fabric
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.kind, self.fabric, self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn display_form() {
        let key = CacheKey::new(ResourceKind::Vrf, "fabric-1", "blue");
        assert_eq!(key.to_string(), "vrf:fabric-1:blue");
    }

    #[test]
    fn equality_covers_all_components() {
        let a = CacheKey::new(ResourceKind::Vrf, "f1", "blue");
        assert_eq!(a, CacheKey::new(ResourceKind::Vrf, "f1", "blue"));
        assert_ne!(a, CacheKey::new(ResourceKind::Vrf, "f2", "blue"));
        assert_ne!(a, CacheKey::new(ResourceKind::Vrf, "f1", "red"));
        assert_ne!(a, CacheKey::new(ResourceKind::VrfAttachment, "f1", "blue"));
    }

    #[test]
    fn usable_as_map_key() {
        let mut map = HashMap::new();
        map.insert(CacheKey::new(ResourceKind::Vrf, "f1", "blue"), 1);
        assert_eq!(
            map.get(&CacheKey::new(ResourceKind::Vrf, "f1", "blue")),
            Some(&1)
        );
    }
}
