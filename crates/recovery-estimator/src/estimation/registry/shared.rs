use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use super::super::domain::RulesetVersion;
use super::{RegistryLoadError, RuleRegistry, ScoringRule};

/// Read-only collection of every ruleset version loaded by the process.
#[derive(Debug, Clone, Default)]
pub struct RegistryCatalog {
    versions: BTreeMap<RulesetVersion, Arc<RuleRegistry>>,
}

impl RegistryCatalog {
    pub fn with_seed() -> Self {
        let mut catalog = Self::default();
        let seed = RuleRegistry::seed();
        catalog.versions.insert(seed.version().clone(), Arc::new(seed));
        catalog
    }

    pub fn register(
        &mut self,
        registry: RuleRegistry,
    ) -> Result<Arc<RuleRegistry>, RegistryLoadError> {
        if self.versions.contains_key(registry.version()) {
            return Err(RegistryLoadError::DuplicateVersion(
                registry.version().clone(),
            ));
        }

        let registry = Arc::new(registry);
        self.versions
            .insert(registry.version().clone(), registry.clone());
        Ok(registry)
    }

    pub fn get(&self, version: &RulesetVersion) -> Option<Arc<RuleRegistry>> {
        self.versions.get(version).cloned()
    }

    /// Ordered rules of a specific version.
    pub fn rules_for(&self, version: &RulesetVersion) -> Option<&[ScoringRule]> {
        self.versions.get(version).map(|registry| registry.rules())
    }

    pub fn versions(&self) -> impl Iterator<Item = &RulesetVersion> + '_ {
        self.versions.keys()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Process-wide handle on the active registry.
///
/// Readers take an [`Arc`] snapshot and keep evaluating against it even if a
/// newer version is swapped in meanwhile; the swap replaces the whole
/// reference, so nobody observes a partially updated rule set.
#[derive(Debug)]
pub struct SharedRegistry {
    current: RwLock<Arc<RuleRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: RuleRegistry) -> Self {
        Self::from_arc(Arc::new(registry))
    }

    pub fn from_arc(registry: Arc<RuleRegistry>) -> Self {
        Self {
            current: RwLock::new(registry),
        }
    }

    pub fn snapshot(&self) -> Arc<RuleRegistry> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Install a new registry version, returning the one it replaced.
    pub fn replace(&self, registry: RuleRegistry) -> Arc<RuleRegistry> {
        let next = Arc::new(registry);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *guard, next);
        info!(
            previous = %previous.version(),
            current = %guard.version(),
            "scoring ruleset replaced"
        );
        previous
    }
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new(RuleRegistry::seed())
    }
}
