//! Component Storage
//!
//! One `ComponentStorage<T>` exists per component type in a world. Values are
//! packed in a dense array that is swap-removed on deletion, with an
//! entity-to-slot index on the side, giving O(1) insert, remove and lookup.
//! The world keeps storages behind the type-erased [`ErasedStorage`] trait and
//! downcasts back to the concrete type on every typed operation.

use std::any::Any;

use slotmap::SecondaryMap;

use super::component::component_name;
use super::{Component, Entity};

/// Operations the world needs without knowing the component type
pub(crate) trait ErasedStorage: Send + Sync {
    /// Drop the component owned by `entity`, if any
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Whether `entity` owns a component in this storage
    fn contains(&self, entity: Entity) -> bool;

    /// Number of stored components
    fn len(&self) -> usize;

    /// Owners in dense order
    fn entities(&self) -> &[Entity];

    /// Drop every component
    fn clear(&mut self);

    /// Short name of the stored type
    fn component_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Dense storage for a single component type
pub(crate) struct ComponentStorage<T: Component> {
    dense: Vec<T>,
    owners: Vec<Entity>,
    index: SecondaryMap<Entity, usize>,
}

impl<T: Component> ComponentStorage<T> {
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            owners: Vec::new(),
            index: SecondaryMap::new(),
        }
    }

    /// Insert a component, returning the value it replaced
    pub fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        if let Some(&slot) = self.index.get(entity) {
            return Some(std::mem::replace(&mut self.dense[slot], component));
        }

        self.index.insert(entity, self.dense.len());
        self.dense.push(component);
        self.owners.push(entity);
        None
    }

    /// Remove a component, keeping the dense array packed
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.index.remove(entity)?;
        let removed = self.dense.swap_remove(slot);
        self.owners.swap_remove(slot);

        // The last element moved into the hole; repoint its index entry
        if let Some(&moved) = self.owners.get(slot) {
            self.index.insert(moved, slot);
        }
        Some(removed)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.index.get(entity).map(|&slot| &self.dense[slot])
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let slot = *self.index.get(entity)?;
        self.dense.get_mut(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.owners.iter().copied().zip(self.dense.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.owners.iter().copied().zip(self.dense.iter_mut())
    }
}

impl<T: Component> ErasedStorage for ComponentStorage<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains(&self, entity: Entity) -> bool {
        self.index.contains_key(entity)
    }

    fn len(&self) -> usize {
        self.dense.len()
    }

    fn entities(&self) -> &[Entity] {
        &self.owners
    }

    fn clear(&mut self) {
        self.dense.clear();
        self.owners.clear();
        self.index.clear();
    }

    fn component_name(&self) -> &'static str {
        component_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[derive(Debug, PartialEq)]
    struct Mass(f32);
    impl Component for Mass {}

    fn entities(count: usize) -> Vec<Entity> {
        let mut slots: SlotMap<Entity, ()> = SlotMap::with_key();
        (0..count).map(|_| slots.insert(())).collect()
    }

    #[test]
    fn test_insert_overwrites_existing_value() {
        let ids = entities(1);
        let mut storage = ComponentStorage::new();

        assert_eq!(storage.insert(ids[0], Mass(1.0)), None);
        assert_eq!(storage.insert(ids[0], Mass(2.0)), Some(Mass(1.0)));
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get(ids[0]), Some(&Mass(2.0)));
    }

    #[test]
    fn test_swap_remove_keeps_index_consistent() {
        let ids = entities(3);
        let mut storage = ComponentStorage::new();
        for (i, &id) in ids.iter().enumerate() {
            storage.insert(id, Mass(i as f32));
        }

        assert_eq!(storage.remove(ids[0]), Some(Mass(0.0)));
        assert_eq!(storage.len(), 2);
        assert!(!storage.contains(ids[0]));
        // The last entity was moved into slot 0 and must still resolve
        assert_eq!(storage.get(ids[2]), Some(&Mass(2.0)));
        assert_eq!(storage.get(ids[1]), Some(&Mass(1.0)));
        assert_eq!(storage.entities(), &[ids[2], ids[1]]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let ids = entities(2);
        let mut storage = ComponentStorage::new();
        storage.insert(ids[0], Mass(1.0));

        assert_eq!(storage.remove(ids[1]), None);
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_get_mut_writes_in_place() {
        let ids = entities(1);
        let mut storage = ComponentStorage::new();
        storage.insert(ids[0], Mass(1.0));

        storage.get_mut(ids[0]).unwrap().0 = 5.0;
        assert_eq!(storage.get(ids[0]), Some(&Mass(5.0)));
    }

    #[test]
    fn test_erased_downcast() {
        let ids = entities(1);
        let mut storage: Box<dyn ErasedStorage> = Box::new(ComponentStorage::<Mass>::new());
        storage
            .as_any_mut()
            .downcast_mut::<ComponentStorage<Mass>>()
            .unwrap()
            .insert(ids[0], Mass(3.0));

        assert!(storage.contains(ids[0]));
        assert_eq!(storage.component_name(), "Mass");
        assert!(storage.remove_entity(ids[0]));
        assert_eq!(storage.len(), 0);
    }
}
