//! Bus - Request-Scoped Values
//!
//! Every request gets a fresh Bus. Pipeline steps use it to hand values to
//! later steps without widening their state types: the global header/footer
//! settings, the outcome of a form submission, and so on.
//!
//! Values are keyed by their type, so each type has at most one slot.

use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Type-keyed value container (TypeMap pattern).
#[derive(Default)]
pub struct Bus {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Box::new(value));
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref())
    }

    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.values
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_mut())
    }

    /// Get the value of type `T`, inserting `T::default()` first if absent.
    pub fn get_or_default<T: Default + Send + Sync + 'static>(&mut self) -> &mut T {
        self.values
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(T::default()))
            .downcast_mut()
            .unwrap_or_else(|| unreachable!("bus slot keyed by TypeId holds a foreign type"))
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    /// Remove the value of type `T`, returning it if present.
    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.values
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast().ok())
            .map(|boxed| *boxed)
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("value_count", &self.values.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FormKind, FormSlots, FormState};

    #[derive(Debug, PartialEq)]
    struct SiteTitle(&'static str);

    #[test]
    fn test_insert_replaces_same_type() {
        let mut bus = Bus::new();
        bus.insert(SiteTitle("Surf Camp"));
        bus.insert(SiteTitle("Tideline"));

        assert_eq!(bus.get::<SiteTitle>(), Some(&SiteTitle("Tideline")));
        assert!(bus.get::<String>().is_none());
    }

    #[test]
    fn test_get_or_default_keeps_form_slots() {
        let mut bus = Bus::new();
        bus.get_or_default::<FormSlots>()
            .set(FormKind::Newsletter, FormState::Pending);

        let slots = bus.get::<FormSlots>().expect("slots were inserted");
        assert!(slots.get(FormKind::Newsletter).is_pending());
        assert_eq!(slots.get(FormKind::EventSignup), &FormState::Idle);
    }

    #[test]
    fn test_remove_takes_value_out() {
        let mut bus = Bus::new();
        bus.insert(7u32);

        assert_eq!(bus.remove::<u32>(), Some(7));
        assert!(!bus.contains::<u32>());
    }
}
