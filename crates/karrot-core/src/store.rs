//! Normalized entity storage.
//!
//! Records are kept in a map keyed by id, with a separate id sequence giving
//! display order. Every id in the sequence has an entry in the map and no id
//! appears twice: re-receiving a known record refreshes it where it already
//! sits instead of adding a second row.

use karrot_types::Entity;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct EntityStore<E: Entity> {
    entries: HashMap<E::Id, E>,
    order: Vec<E::Id>,
}

impl<E: Entity> Default for EntityStore<E> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<E: Entity> EntityStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole content with `entities`, in their order.
    pub fn replace(&mut self, entities: Vec<E>) {
        self.clear();
        self.extend(entities);
    }

    /// Appends `entities` at the end of the order.
    pub fn extend(&mut self, entities: Vec<E>) {
        for entity in entities {
            self.push(entity);
        }
    }

    /// Inserts or refreshes one record; new ids go to the end.
    pub fn push(&mut self, entity: E) {
        let id = entity.id();
        if self.entries.insert(id.clone(), entity).is_none() {
            self.order.push(id);
        }
    }

    /// Inserts or refreshes one record; new ids go to the front.
    pub fn prepend(&mut self, entity: E) {
        let id = entity.id();
        if self.entries.insert(id.clone(), entity).is_none() {
            self.order.insert(0, id);
        }
    }

    pub fn remove(&mut self, id: &E::Id) -> Option<E> {
        let removed = self.entries.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    pub fn get(&self, id: &E::Id) -> Option<&E> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &E::Id) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in display order
    pub fn ids(&self) -> &[E::Id] {
        &self.order
    }

    /// Records in display order
    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    pub fn to_vec(&self) -> Vec<E> {
        self.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
