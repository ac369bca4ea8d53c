use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::class::ClassModel;
use crate::identity::StableId;

/// Two distinct identities hashing to the same [`StableId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identity collision on {id}: {first:?} and {second:?}")]
pub struct IdentityCollision {
    pub id: StableId,
    pub first: String,
    pub second: String,
}

/// Final mapping from fully qualified class name to its model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassRegistry {
    classes: BTreeMap<String, ClassModel>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Insert a fully folded model, returning the model it replaced (if any).
    pub fn insert(&mut self, model: ClassModel) -> Option<ClassModel> {
        match self.classes.entry(model.full_name()) {
            Entry::Occupied(mut entry) => Some(entry.insert(model)),
            Entry::Vacant(entry) => {
                entry.insert(model);
                None
            }
        }
    }

    pub fn get(&self, full_name: &str) -> Option<&ClassModel> {
        self.classes.get(full_name)
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.classes.contains_key(full_name)
    }

    /// Models ordered by fully qualified name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassModel)> {
        self.classes.iter().map(|(name, model)| (name.as_str(), model))
    }

    /// Resolve an unqualified name to the single registered class with that simple
    /// name. Qualified names are returned as-is when registered. Ambiguous or unknown
    /// names yield `None`.
    pub fn resolve_simple_name(&self, name: &str) -> Option<&str> {
        if name.contains('.') {
            return self.classes.get_key_value(name).map(|(k, _)| k.as_str());
        }
        let mut candidates = self
            .classes
            .values()
            .filter(|model| model.simple_name() == name);
        let first = candidates.next()?;
        if candidates.next().is_some() {
            return None;
        }
        self.classes
            .get_key_value(&first.full_name())
            .map(|(k, _)| k.as_str())
    }

    /// Verify that no two distinct classes or members share a [`StableId`].
    pub fn check_identities(&self) -> Result<(), IdentityCollision> {
        find_collision(self.classes.iter().flat_map(|(name, model)| {
            std::iter::once((name.clone(), model.stable_id())).chain(model.member_ids())
        }))
    }
}

/// First id claimed by two different identity strings. Repeats of one identity are fine.
fn find_collision<I>(ids: I) -> Result<(), IdentityCollision>
where
    I: IntoIterator<Item = (String, StableId)>,
{
    let mut seen: HashMap<StableId, String> = HashMap::new();
    for (label, id) in ids {
        match seen.get(&id) {
            Some(existing) if *existing != label => {
                return Err(IdentityCollision {
                    id,
                    first: existing.clone(),
                    second: label,
                });
            }
            Some(_) => {}
            None => {
                seen.insert(id, label);
            }
        }
    }
    Ok(())
}

impl FromIterator<ClassModel> for ClassRegistry {
    fn from_iter<T: IntoIterator<Item = ClassModel>>(iter: T) -> Self {
        let mut registry = ClassRegistry::new();
        for model in iter {
            registry.insert(model);
        }
        registry
    }
}
