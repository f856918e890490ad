use std::any::{Any, TypeId};
use std::collections::HashMap;

use dashmap::DashMap;

use crate::value_objects::EntityId;

type SlotMap = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// Per-entity state arena. Every check owns one slot type; a disconnect drops all
/// slots of the entity at once.
///
/// Slots are created lazily with `Default`. The closure passed to [`EntityStates::with`]
/// runs under the entity's shard lock, so it must stay short and must not call back
/// into the store.
#[derive(Default)]
pub struct EntityStates {
    entities: DashMap<EntityId, SlotMap>,
}

impl EntityStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<S, R>(&self, id: EntityId, f: impl FnOnce(&mut S) -> R) -> R
    where
        S: Default + Send + Sync + 'static,
    {
        let mut slots = self.entities.entry(id).or_default();
        let slot = slots
            .entry(TypeId::of::<S>())
            .or_insert_with(|| Box::new(S::default()));
        if let Some(state) = slot.downcast_mut::<S>() {
            return f(state);
        }
        let mut fresh = S::default();
        let out = f(&mut fresh);
        *slot = Box::new(fresh);
        out
    }

    pub fn peek<S>(&self, id: EntityId) -> Option<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let slots = self.entities.get(&id)?;
        slots.get(&TypeId::of::<S>())?.downcast_ref::<S>().cloned()
    }

    pub fn purge(&self, id: EntityId) -> bool {
        self.entities.remove(&id).is_some()
    }

    pub fn tracked(&self) -> usize {
        self.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Counter(u32);

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Label(String);

    #[test]
    fn slots_are_isolated_by_type_and_entity() {
        let states = EntityStates::new();
        let a = EntityId::from_u128(1);
        let b = EntityId::from_u128(2);

        states.with(a, |c: &mut Counter| c.0 += 2);
        states.with(a, |l: &mut Label| l.0.push_str("hello"));
        states.with(b, |c: &mut Counter| c.0 += 1);

        assert_eq!(states.peek::<Counter>(a), Some(Counter(2)));
        assert_eq!(states.peek::<Label>(a), Some(Label("hello".to_string())));
        assert_eq!(states.peek::<Counter>(b), Some(Counter(1)));
        assert_eq!(states.peek::<Label>(b), None);
        assert_eq!(states.tracked(), 2);
    }

    #[test]
    fn purge_drops_every_slot_for_the_entity() {
        let states = EntityStates::new();
        let a = EntityId::from_u128(1);
        states.with(a, |c: &mut Counter| c.0 = 7);
        states.with(a, |l: &mut Label| l.0 = "x".to_string());

        assert!(states.purge(a));
        assert!(!states.purge(a));
        assert_eq!(states.peek::<Counter>(a), None);
        assert_eq!(states.with(a, |c: &mut Counter| c.0), 0);
    }
}
