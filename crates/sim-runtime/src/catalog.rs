//! Read-only catalog of star systems.

use sim_core::{validate_system, SystemDescriptor, SystemId, ValidationError};
use std::collections::BTreeMap;

/// Systems by id, validated on insertion.
#[derive(Clone, Debug, Default)]
pub struct SystemCatalog {
    systems: BTreeMap<SystemId, SystemDescriptor>,
}

impl SystemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_systems<I>(systems: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = SystemDescriptor>,
    {
        let mut catalog = Self::new();
        for s in systems {
            catalog.insert(s)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, system: SystemDescriptor) -> Result<(), ValidationError> {
        validate_system(&system)?;
        if self.systems.contains_key(&system.id) {
            return Err(ValidationError::DuplicateSystem(system.id));
        }
        self.systems.insert(system.id, system);
        Ok(())
    }

    pub fn get(&self, id: SystemId) -> Option<&SystemDescriptor> {
        self.systems.get(&id)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Systems in id order.
    pub fn iter(&self) -> impl Iterator<Item = &SystemDescriptor> {
        self.systems.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sys(id: u32, name: &str) -> SystemDescriptor {
        SystemDescriptor {
            id: SystemId(id),
            name: name.into(),
            position: [0.0, 0.0, 0.0],
            stellar_class: "G".into(),
            station_count: 1,
        }
    }

    #[test]
    fn rejects_duplicates_and_blank_names() {
        let mut c = SystemCatalog::from_systems([sys(2, "Vega"), sys(1, "Sol")]).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(
            c.insert(sys(1, "Again")),
            Err(ValidationError::DuplicateSystem(SystemId(1)))
        );
        assert_eq!(
            c.insert(sys(3, "  ")),
            Err(ValidationError::EmptyName(SystemId(3)))
        );
        let names: Vec<&str> = c.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Sol", "Vega"]);
        assert!(c.get(SystemId(9)).is_none());
    }
}
