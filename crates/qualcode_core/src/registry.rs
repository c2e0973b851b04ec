//! Ordered in-memory entity registries.
//!
//! # Invariants
//! - Registries never remove entries.
//! - Iteration order is insertion order (append) or reverse insertion order
//!   for entries added with `prepend`.

use crate::model::{Actor, ActorLink, Code, CodeRelation, Memo, TemporalCode};
use serde::Serialize;

/// Entity with a stable string identifier.
pub trait Entity {
    fn id(&self) -> &str;
}

macro_rules! impl_entity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> &str {
                    self.id.as_str()
                }
            }
        )+
    };
}

impl_entity!(Code, Memo, CodeRelation, Actor, ActorLink, TemporalCode);

/// Ordered collection of one entity kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Registry<T> {
    items: Vec<T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    /// Inserts at the front so the newest entry sorts first.
    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::{Entity, Registry};

    struct Item(&'static str);

    impl Entity for Item {
        fn id(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn prepend_puts_newest_first_and_append_keeps_order() {
        let mut registry = Registry::new();
        registry.append(Item("a"));
        registry.append(Item("b"));
        registry.prepend(Item("c"));
        let ids: Vec<&str> = registry.iter().map(Entity::id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert!(registry.contains("b"));
        assert!(registry.get("z").is_none());
    }
}
